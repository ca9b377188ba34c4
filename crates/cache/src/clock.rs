use std::fmt;
use std::time::Duration;
use time::UtcDateTime;

/// Whole seconds since the Unix epoch.
///
/// This is the resolution records are stored with, so keeping timestamps in
/// this form end to end means a decoded record compares exactly like the one
/// that was encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTime(u64);
impl UnixTime {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Current wall-clock time. Clocks set before 1970 read as the epoch.
    pub fn now() -> Self {
        UtcDateTime::now().into()
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self + duration`, rounded down to whole seconds and clamped at the
    /// end of time instead of overflowing.
    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_secs()))
    }
}
impl From<UtcDateTime> for UnixTime {
    fn from(datetime: UtcDateTime) -> Self {
        Self(u64::try_from(datetime.unix_timestamp()).unwrap_or_default())
    }
}
impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let datetime = i64::try_from(self.0).ok().and_then(|secs| UtcDateTime::from_unix_timestamp(secs).ok());
        match datetime {
            Some(datetime) => write!(f, "{datetime}"),
            None => write!(f, "@{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::utc_datetime;

    #[test]
    fn test_from_datetime() {
        assert_eq!(UnixTime::from(utc_datetime!(1970-01-01 0:00)), UnixTime::from_secs(0));
        assert_eq!(UnixTime::from(utc_datetime!(2023-11-14 22:13:20)), UnixTime::from_secs(1_700_000_000));
        // Pre-epoch clamps.
        assert_eq!(UnixTime::from(utc_datetime!(1969-12-31 23:59:59)), UnixTime::from_secs(0));
    }

    #[test]
    fn test_saturating_add() {
        let now = UnixTime::from_secs(100);
        assert_eq!(now.saturating_add(Duration::from_secs(60)), UnixTime::from_secs(160));
        // Sub-second parts are dropped.
        assert_eq!(now.saturating_add(Duration::from_millis(1_999)), UnixTime::from_secs(101));
        assert_eq!(UnixTime::from_secs(u64::MAX).saturating_add(Duration::from_secs(1)), UnixTime::from_secs(u64::MAX));
    }

    #[test]
    fn test_now_is_after_epoch() {
        assert!(UnixTime::now() > UnixTime::from_secs(1_700_000_000));
    }

    #[test]
    fn test_display() {
        assert_eq!(UnixTime::from_secs(u64::MAX).to_string(), format!("@{}", u64::MAX));
        assert!(UnixTime::from_secs(0).to_string().starts_with("1970-01-01"));
    }
}
