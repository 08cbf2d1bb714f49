//! Instant formatting in the reader's timezone.

use crate::types::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// RFC 1123 layout, e.g. `Mon, 02 Jan 2006 15:04:05 MST`.
const RFC1123: &str = "%a, %d %b %Y %H:%M:%S %Z";

/// RFC 822 layout, e.g. `02 Jan 06 15:04 MST`.
const RFC822: &str = "%d %b %y %H:%M %Z";

/// Formats instants for the person reading the digest.
///
/// Resolved once from configuration and handed to every stage that shows a
/// time, so nothing looks the zone up while a run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerClock {
    zone: Tz,
}

impl ViewerClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn utc() -> Self {
        Self { zone: Tz::UTC }
    }

    /// Resolves an IANA zone name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ValidationError::InvalidTimezone(name.to_string()))
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Long form used inside property values.
    pub fn pretty(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.zone).format(RFC1123).to_string()
    }

    /// Same layout as [`pretty`](Self::pretty), but in the zone a date value
    /// was pinned to. Unknown zone names fall back to the viewer's zone.
    pub fn pretty_in(&self, instant: DateTime<Utc>, zone_name: &str) -> String {
        match zone_name.parse::<Tz>() {
            Ok(zone) => instant.with_timezone(&zone).format(RFC1123).to_string(),
            Err(_) => {
                log::debug!("Unknown timezone '{}' on date value", zone_name);
                self.pretty(instant)
            }
        }
    }

    /// Short form used next to an item in the digest.
    pub fn short(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.zone).format(RFC822).to_string()
    }

    /// The viewer's current calendar day.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.zone).date_naive()
    }
}

impl Default for ViewerClock {
    fn default() -> Self {
        Self::utc()
    }
}
