//! Human-readable size limits ("2MB", "3.5TB") parsed into exact byte counts.
//!
//! Units are binary: KB = 2^10, MB = 2^20, GB = 2^30, TB = 2^40. A fractional
//! number can yield a fractional byte count (3.5TB = 3848290697625.6 bytes), so
//! the threshold is kept as an exact decimal rather than rounded.

#![allow(missing_docs)]

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{Result, WatchdogError};

const SIZE_EXAMPLE: &str = "'2MB', '1GB', '3.5TB'";

/// Most significant fractional digits a threshold keeps exactly; with it,
/// `u64::MAX * 10^scale` still fits in a `u128`.
const MAX_SCALE: u32 = 19;

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)(?:\.([0-9]+))?([KMGT]B)$").expect("size pattern is valid")
});

/// Binary size unit accepted by [`SizeThreshold::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
}

impl SizeUnit {
    /// Number of bytes in one unit.
    #[must_use]
    pub const fn multiplier(self) -> u64 {
        match self {
            Self::Kilobytes => 1 << 10,
            Self::Megabytes => 1 << 20,
            Self::Gigabytes => 1 << 30,
            Self::Terabytes => 1 << 40,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "KB" => Some(Self::Kilobytes),
            "MB" => Some(Self::Megabytes),
            "GB" => Some(Self::Gigabytes),
            "TB" => Some(Self::Terabytes),
            _ => None,
        }
    }
}

/// Byte count at which the capture service must be stopped.
///
/// Stored as `numerator / 10^scale` bytes so that fractional limits compare
/// exactly against integral scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeThreshold {
    numerator: u128,
    scale: u32,
}

impl SizeThreshold {
    /// Parse a limit such as `"2MB"`, `" 1gb "` or `"3.5TB"`.
    pub fn parse(text: &str) -> Result<Self> {
        let normalized = text.trim().to_ascii_uppercase();
        let invalid = || WatchdogError::InvalidFormat {
            input: text.to_string(),
            example: SIZE_EXAMPLE,
        };

        let caps = SIZE_PATTERN.captures(&normalized).ok_or_else(invalid)?;
        let whole = caps[1].trim_start_matches('0');
        // Padding zeros carry no value: "2.50000MB" is "2.5MB".
        let fraction = caps.get(2).map_or("", |m| m.as_str().trim_end_matches('0'));
        let unit = SizeUnit::from_suffix(&caps[3]).ok_or_else(invalid)?;

        let scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        if scale > MAX_SCALE {
            return Err(invalid());
        }
        let digits = format!("{whole}{fraction}");
        let digits: u128 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| invalid())?
        };
        let numerator = digits
            .checked_mul(u128::from(unit.multiplier()))
            .ok_or_else(invalid)?;

        Ok(Self { numerator, scale })
    }

    /// An exact, whole-byte threshold.
    #[must_use]
    pub fn from_bytes(bytes: u64) -> Self {
        Self {
            numerator: u128::from(bytes),
            scale: 0,
        }
    }

    /// Whether a scanned size has reached (or passed) this threshold.
    #[must_use]
    pub fn is_reached_by(&self, size_bytes: u64) -> bool {
        u128::from(size_bytes) * self.denominator() >= self.numerator
    }

    /// Smallest whole byte count that reaches the threshold.
    #[must_use]
    pub fn ceil_bytes(&self) -> u128 {
        self.numerator.div_ceil(self.denominator())
    }

    fn denominator(&self) -> u128 {
        10u128.pow(self.scale)
    }
}

/// Exact decimal byte count, trailing fractional zeros trimmed.
impl fmt::Display for SizeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let denominator = self.denominator();
        let whole = self.numerator / denominator;
        let rest = self.numerator % denominator;
        if rest == 0 {
            return write!(f, "{whole}");
        }
        let width = self.scale as usize;
        let fraction = format!("{rest:0width$}");
        write!(f, "{whole}.{}", fraction.trim_end_matches('0'))
    }
}
