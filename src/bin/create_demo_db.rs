use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, macros::date};

use veloboard::{Activity, ActivityBuilder, Sport, create_activity, initialize_db};

/// A utility for creating a demo database for the veloboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating demo activities...");

    for activity in demo_activities() {
        create_activity(activity, &connection)?;
    }

    println!("Success!");

    Ok(())
}

/// Two years of deterministic activities spread across sports and months.
fn demo_activities() -> Vec<ActivityBuilder> {
    let start = date!(2024 - 01 - 01);
    let mut activities = Vec::new();

    for months_forward in 0..24 {
        let year = start.year() + (months_forward / 12);
        let month = Month::try_from(1 + (months_forward % 12) as u8).expect("month in 1..=12");

        let ride_day = Date::from_calendar_date(year, month, 6).expect("valid demo date");
        activities.push(
            Activity::build("Weekday Ride", Sport::Ride, ride_day)
                .moving_time_seconds(3600 + 120 * months_forward as i64)
                .distance_meters(25_000.0 + 500.0 * months_forward as f64)
                .kilojoules(700.0 + 10.0 * months_forward as f64),
        );

        let run_day = Date::from_calendar_date(year, month, 14).expect("valid demo date");
        activities.push(
            Activity::build("Lunch Run", Sport::Run, run_day)
                .moving_time_seconds(2400)
                .distance_meters(8_000.0),
        );

        // Walks every other month keep the chart gaps interesting.
        if months_forward % 2 == 0 {
            let walk_day = Date::from_calendar_date(year, month, 21).expect("valid demo date");
            activities.push(
                Activity::build("Evening Walk", Sport::Walk, walk_day)
                    .moving_time_seconds(2700)
                    .distance_meters(4_000.0),
            );
        }
    }

    activities.push(
        Activity::build("Trainer Session", Sport::VirtualRide, date!(2024 - 07 - 10))
            .moving_time_seconds(3000)
            .distance_meters(20_000.0)
            .kilojoules(550.0),
    );
    activities.push(
        Activity::build("Pool Laps", Sport::Other("Swim".to_owned()), date!(2024 - 08 - 03))
            .moving_time_seconds(1800),
    );

    activities
}
