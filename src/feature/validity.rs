use std::fmt;

use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Closed date interval `[start, end]` during which a boundary version is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Validity {
    start: NaiveDate,
    end: NaiveDate,
}

impl Validity {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            bail!("Validity interval ends ({end}) before it starts ({start})");
        }
        Ok(Self { start, end })
    }

    #[inline] pub fn start(&self) -> NaiveDate { self.start }

    #[inline] pub fn end(&self) -> NaiveDate { self.end }

    /// Both ends inclusive.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    #[inline]
    pub fn overlaps(&self, other: &Validity) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Length of the interval in days (a single-day interval has length 0).
    #[inline]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Parse a source date in either `YYYY/MM/DD` or `YYYY-MM-DD` form.
    pub fn parse_date(text: &str) -> Result<NaiveDate> {
        let text = text.trim();
        for format in ["%Y/%m/%d", "%Y-%m-%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Ok(date);
            }
        }
        bail!("Unrecognized date '{text}' (expected YYYY/MM/DD or YYYY-MM-DD)")
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}
