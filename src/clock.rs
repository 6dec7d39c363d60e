//! All things time-related.

pub use chrono::{DateTime, Local, Utc};

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Marks a thing that has a creation date.
pub trait HasAge {
    /// The date the item was created, in UTC.
    fn created_utc(&self) -> DateTime<Utc>;

    /// The date the item was created, in local time.
    fn created_local(&self) -> DateTime<Local> {
        self.created_utc().with_timezone(&Local)
    }

    /// True if the item was created strictly after `instant`.
    fn is_newer_than(&self, instant: DateTime<Utc>) -> bool {
        self.created_utc() > instant
    }
}

/// Converts seconds since the Unix epoch into a UTC date.
///
/// Fractional seconds are discarded. Missing, non-finite, or out-of-range
/// timestamps become the Unix epoch itself.
///
/// # Examples
///
/// ```
/// use subscout::clock::from_epoch_seconds;
/// let date = from_epoch_seconds(Some(1735732800.0));
/// assert_eq!(date.to_rfc3339(), "2025-01-01T12:00:00+00:00");
/// assert_eq!(from_epoch_seconds(None).timestamp(), 0);
/// assert_eq!(from_epoch_seconds(Some(f64::NAN)).timestamp(), 0);
/// ```
pub fn from_epoch_seconds(seconds: Option<f64>) -> DateTime<Utc> {
    seconds
        .filter(|s| s.is_finite())
        .and_then(|s| DateTime::from_timestamp(s.trunc() as i64, 0))
        .unwrap_or_default()
}
