//! Database queries for the dashboard's record store.
//!
//! The dashboard never touches raw activities. It works from a rollup of the
//! activity table into one row per (month, sport) combination, loaded in full
//! on every request, plus the list of sports ordered by how often they occur
//! (which drives the type-filter checkboxes).

use rusqlite::Connection;

use crate::{Error, month::MonthKey, sport::Sport};

/// One month of one sport's activity, rolled up from the activity table.
///
/// The rollup's `GROUP BY` guarantees (month, sport) is unique within one
/// load, and the SQL coerces missing metrics to zero, so sums over these rows
/// never see NULL or NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// The calendar month.
    pub month: MonthKey,
    /// The kind of sport.
    pub sport: Sport,
    /// How many activities were recorded.
    pub activities: i64,
    /// Total distance in kilometers.
    pub distance_km: f64,
    /// Total moving time in hours.
    pub duration_hours: f64,
    /// Total work in kilojoules.
    pub total_kj: f64,
}

/// A sport and how many activities it has across all history.
#[derive(Debug, Clone, PartialEq)]
pub struct SportCount {
    /// The kind of sport.
    pub sport: Sport,
    /// The number of recorded activities of this sport.
    pub activity_count: i64,
}

/// Load the per-(month, sport) rollup of the whole activity history, in
/// chronological order.
///
/// A row whose start date cannot be reduced to a `YYYY-MM` key is skipped
/// with a warning rather than passed downstream, so one malformed date can
/// never corrupt the dashboard's totals.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn load_monthly_summaries(connection: &Connection) -> Result<Vec<MonthlySummary>, Error> {
    let mut stmt = connection.prepare(
        "SELECT
            substr(start_date, 1, 7) AS month,
            sport,
            COUNT(*) AS activities,
            COALESCE(SUM(distance_meters), 0) / 1000.0 AS distance_km,
            SUM(moving_time_seconds) / 3600.0 AS duration_hours,
            COALESCE(SUM(kilojoules), 0) AS total_kj
        FROM activity
        GROUP BY month, sport
        ORDER BY month ASC, sport ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, f64>(4)?,
            row.get::<_, f64>(5)?,
        ))
    })?;

    let mut summaries = Vec::new();

    for row in rows {
        let (month_text, sport, activities, distance_km, duration_hours, total_kj) = row?;

        let Ok(month) = month_text.parse::<MonthKey>() else {
            tracing::warn!("skipping rollup row with unparseable month {month_text:?}");
            continue;
        };

        summaries.push(MonthlySummary {
            month,
            sport: Sport::from(sport),
            activities,
            distance_km,
            duration_hours,
            total_kj,
        });
    }

    Ok(summaries)
}

/// The distinct sports in the activity table, most frequent first.
///
/// Ties break alphabetically so the checkbox order is stable between loads.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn sports_by_count(connection: &Connection) -> Result<Vec<SportCount>, Error> {
    let mut stmt = connection.prepare(
        "SELECT sport, COUNT(*) AS activity_count
        FROM activity
        GROUP BY sport
        ORDER BY activity_count DESC, sport ASC",
    )?;

    let sports = stmt
        .query_map([], |row| {
            let sport: String = row.get(0)?;

            Ok(SportCount {
                sport: Sport::from(sport),
                activity_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<SportCount>, rusqlite::Error>>()?;

    Ok(sports)
}

#[cfg(test)]
mod summary_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        activity::{Activity, create_activity},
        db::initialize,
        sport::Sport,
    };

    use super::{load_monthly_summaries, sports_by_count};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn rolls_up_by_month_and_sport() {
        let conn = get_test_connection();

        create_activity(
            Activity::build("Morning Ride", Sport::Ride, date!(2024 - 01 - 05))
                .moving_time_seconds(3_600)
                .distance_meters(30_000.0)
                .kilojoules(700.0),
            &conn,
        )
        .unwrap();
        create_activity(
            Activity::build("Evening Ride", Sport::Ride, date!(2024 - 01 - 20))
                .moving_time_seconds(1_800)
                .distance_meters(10_000.0)
                .kilojoules(300.0),
            &conn,
        )
        .unwrap();
        create_activity(
            Activity::build("Trail Run", Sport::Run, date!(2024 - 02 - 02))
                .moving_time_seconds(2_700)
                .distance_meters(8_000.0),
            &conn,
        )
        .unwrap();

        let summaries = load_monthly_summaries(&conn).unwrap();

        assert_eq!(summaries.len(), 2);

        let january_rides = &summaries[0];
        assert_eq!(january_rides.month.to_string(), "2024-01");
        assert_eq!(january_rides.sport, Sport::Ride);
        assert_eq!(january_rides.activities, 2);
        assert_eq!(january_rides.distance_km, 40.0);
        assert_eq!(january_rides.duration_hours, 1.5);
        assert_eq!(january_rides.total_kj, 1_000.0);

        let february_runs = &summaries[1];
        assert_eq!(february_runs.month.to_string(), "2024-02");
        assert_eq!(february_runs.sport, Sport::Run);
    }

    #[test]
    fn missing_metrics_coerce_to_zero() {
        let conn = get_test_connection();

        // No distance or kilojoules recorded at all.
        create_activity(
            Activity::build("Pool Session", Sport::from("Swim"), date!(2024 - 03 - 10))
                .moving_time_seconds(1_800),
            &conn,
        )
        .unwrap();

        let summaries = load_monthly_summaries(&conn).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].distance_km, 0.0);
        assert_eq!(summaries[0].total_kj, 0.0);
        assert!(summaries[0].distance_km.is_finite());
    }

    #[test]
    fn skips_rows_with_unparseable_months() {
        let conn = get_test_connection();

        create_activity(
            Activity::build("Morning Ride", Sport::Ride, date!(2024 - 01 - 05)),
            &conn,
        )
        .unwrap();
        // Bypass the model to simulate a corrupted date from an old import.
        conn.execute(
            "INSERT INTO activity
                (name, sport, start_date, moving_time_seconds, distance_meters, kilojoules)
             VALUES ('Bad Row', 'Ride', 'not-a-date', 60, NULL, NULL)",
            (),
        )
        .unwrap();

        let summaries = load_monthly_summaries(&conn).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].month.to_string(), "2024-01");
    }

    #[test]
    fn sports_order_by_descending_count() {
        let conn = get_test_connection();

        for day in 1u8..=3 {
            create_activity(
                Activity::build("Ride", Sport::Ride, date!(2024 - 01 - 01).replace_day(day).unwrap()),
                &conn,
            )
            .unwrap();
        }
        create_activity(Activity::build("Run", Sport::Run, date!(2024 - 01 - 10)), &conn).unwrap();

        let sports = sports_by_count(&conn).unwrap();

        assert_eq!(sports.len(), 2);
        assert_eq!(sports[0].sport, Sport::Ride);
        assert_eq!(sports[0].activity_count, 3);
        assert_eq!(sports[1].sport, Sport::Run);
    }
}
