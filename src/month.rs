//! Calendar month keys used to group and filter activities.

use std::{fmt, str::FromStr};

use time::Date;

use crate::Error;

/// A calendar month identified by its `YYYY-MM` key, e.g. `2024-03`.
///
/// Keys order chronologically and are stable across requests, so they are
/// used in URLs, chart click payloads and CSV exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    // 1-12, checked on construction.
    month: u8,
}

impl MonthKey {
    /// The month that contains `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// The calendar month `months` whole months before this one.
    ///
    /// Works at month granularity, so the day of month never shifts the
    /// result. Subtracting across January borrows from the year.
    pub fn months_back(self, months: u32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 - i64::from(months);

        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u8,
        }
    }

    /// A human readable label such as "Mar 2024".
    pub fn label(self) -> String {
        format!("{} {}", month_abbrev(self.month), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(text.to_owned());

        let Some((year_text, month_text)) = text.split_once('-') else {
            return Err(invalid());
        };
        let year = year_text.parse::<i32>().map_err(|_| invalid())?;
        let month = month_text.parse::<u8>().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }
}

fn month_abbrev(month: u8) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => panic!("invalid month number {month}"),
    }
}
