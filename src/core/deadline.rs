//! Optional wall-clock end time (`YYYY-MM-DDThh:mm`, local time).

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
use regex::Regex;

use crate::core::errors::{Result, WatchdogError};

const DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DEADLINE_EXAMPLE: &str = "'YYYY-MM-DDThh:mm' such as '2025-06-30T18:00'";

// chrono alone tolerates unpadded fields; the shape is pinned down first.
static DEADLINE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}$").expect("deadline shape is valid")
});

/// Absolute local instant after which the capture service must be stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: DateTime<Local>,
}

impl Deadline {
    /// Parse an exact `YYYY-MM-DDThh:mm` local timestamp.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant;
    /// times inside a DST gap do not exist and are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || WatchdogError::InvalidFormat {
            input: text.to_string(),
            example: DEADLINE_EXAMPLE,
        };

        if !DEADLINE_SHAPE.is_match(text) {
            return Err(invalid());
        }
        let naive = NaiveDateTime::parse_from_str(text, DEADLINE_FORMAT).map_err(|_| invalid())?;
        match Local.from_local_datetime(&naive) {
            LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => Ok(Self { at }),
            LocalResult::None => Err(invalid()),
        }
    }

    /// Wrap an already-resolved instant.
    #[must_use]
    pub const fn at(at: DateTime<Local>) -> Self {
        Self { at }
    }

    /// The instant itself.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Local> {
        self.at
    }

    /// Whether `now` is at or past the deadline.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        now >= self.at
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format("%Y-%m-%d %H:%M:%S"))
    }
}
