//! Defines the core data model and database queries for recorded activities.
//!
//! An activity is one recorded outing: a ride, run, walk and so on, with the
//! raw units the tracker reports (seconds, meters, kilojoules). The dashboard
//! never shows raw activities directly; it rolls them up by month via
//! [crate::dashboard::summary] and drills down to single days via
//! [crate::month_detail].

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, sport::Sport};

/// One recorded activity, as stored in the database.
///
/// To create a new `Activity`, use [Activity::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// The ID of the activity.
    pub id: i64,
    /// The name the athlete gave the activity, e.g. "Morning Ride".
    pub name: String,
    /// The kind of sport.
    pub sport: Sport,
    /// The local date the activity started on.
    pub start_date: Date,
    /// Moving time in seconds.
    pub moving_time_seconds: i64,
    /// Distance covered in meters. Trainer sessions may not record one.
    pub distance_meters: Option<f64>,
    /// Work done in kilojoules. Absent without a power meter.
    pub kilojoules: Option<f64>,
}

impl Activity {
    /// Create a new activity.
    ///
    /// Shortcut for [ActivityBuilder] for discoverability.
    pub fn build(name: &str, sport: Sport, start_date: Date) -> ActivityBuilder {
        ActivityBuilder {
            name: name.to_owned(),
            sport,
            start_date,
            moving_time_seconds: 0,
            distance_meters: None,
            kilojoules: None,
        }
    }
}

/// A builder for creating [Activity] instances.
///
/// The metric fields default to zero seconds of moving time and no recorded
/// distance or energy; set the ones the tracker reported, then insert the
/// activity with [create_activity].
#[derive(Debug, PartialEq, Clone)]
pub struct ActivityBuilder {
    /// The name the athlete gave the activity.
    pub name: String,
    /// The kind of sport.
    pub sport: Sport,
    /// The local date the activity started on.
    pub start_date: Date,
    /// Moving time in seconds.
    pub moving_time_seconds: i64,
    /// Distance covered in meters, if recorded.
    pub distance_meters: Option<f64>,
    /// Work done in kilojoules, if recorded.
    pub kilojoules: Option<f64>,
}

impl ActivityBuilder {
    /// Set the moving time in seconds.
    pub fn moving_time_seconds(mut self, seconds: i64) -> Self {
        self.moving_time_seconds = seconds;
        self
    }

    /// Set the recorded distance in meters.
    pub fn distance_meters(mut self, meters: f64) -> Self {
        self.distance_meters = Some(meters);
        self
    }

    /// Set the recorded energy in kilojoules.
    pub fn kilojoules(mut self, kilojoules: f64) -> Self {
        self.kilojoules = Some(kilojoules);
        self
    }
}

/// Create a new activity in the database from a builder.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_activity(
    builder: ActivityBuilder,
    connection: &Connection,
) -> Result<Activity, Error> {
    let activity = connection
        .prepare(
            "INSERT INTO activity
                (name, sport, start_date, moving_time_seconds, distance_meters, kilojoules)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, sport, start_date, moving_time_seconds, distance_meters,
                kilojoules",
        )?
        .query_row(
            (
                builder.name,
                builder.sport.as_str(),
                builder.start_date,
                builder.moving_time_seconds,
                builder.distance_meters,
                builder.kilojoules,
            ),
            map_activity_row,
        )?;

    Ok(activity)
}

/// Get the total number of activities in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_activities(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM activity;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the activity table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_activity_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS activity (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                sport TEXT NOT NULL,
                start_date TEXT NOT NULL,
                moving_time_seconds INTEGER NOT NULL,
                distance_meters REAL,
                kilojoules REAL
                )",
        (),
    )?;

    // Composite index used by the monthly rollup and the per-month drill-down.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_activity_date_sport ON activity(start_date, sport);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Activity.
pub fn map_activity_row(row: &Row) -> Result<Activity, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let sport: String = row.get(2)?;
    let start_date = row.get(3)?;
    let moving_time_seconds = row.get(4)?;
    let distance_meters = row.get(5)?;
    let kilojoules = row.get(6)?;

    Ok(Activity {
        id,
        name,
        sport: Sport::from(sport),
        start_date,
        moving_time_seconds,
        distance_meters,
        kilojoules,
    })
}
