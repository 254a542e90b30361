//! Resolves the configured timezone to a UTC offset.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in the given canonical timezone.
pub fn current_local_date(canonical_timezone: &str) -> Result<Date, Error> {
    let local_timezone = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(local_timezone).date())
}

#[cfg(test)]
mod timezone_tests {
    use time::UtcOffset;

    use super::get_local_offset;

    #[test]
    fn resolves_utc() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
    }
}
