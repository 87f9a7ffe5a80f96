//! Trailing time-window tokens for the period filter.

use chrono::{DateTime, Days, Duration, Utc};

/// A recognized trailing time window.
///
/// Unknown tokens are not an error; they simply mean "no time constraint",
/// so parsing returns an `Option` rather than a `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The last 24 hours.
    Last24Hours,
    /// The last 7 calendar days.
    Last7Days,
    /// The last 30 calendar days.
    Last30Days,
}

impl Period {
    /// Parses a period token. Anything other than `24h`, `7d`, or `30d`
    /// (including the empty string) yields `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "24h" => Some(Self::Last24Hours),
            "7d" => Some(Self::Last7Days),
            "30d" => Some(Self::Last30Days),
            _ => None,
        }
    }

    /// Computes the cutoff instant for this window: occurrences created at
    /// or after the cutoff fall inside the window.
    ///
    /// The day-based windows use calendar-day arithmetic rather than fixed
    /// 86400-second multiples, matching civil-time semantics.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Last24Hours => now
                .checked_sub_signed(Duration::hours(24))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Self::Last7Days => now
                .checked_sub_days(Days::new(7))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Self::Last30Days => now
                .checked_sub_days(Days::new(30))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}
