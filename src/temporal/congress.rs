use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::{feature::{CongressSpan, Validity}, identity::ordinal};

const FIRST_CONGRESS_START_YEAR: i32 = 1789;

/// A two-year session of the U.S. Congress. The nth Congress started in
/// `1789 + 2 * (n - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Congress {
    number: u16,
}

impl Congress {
    pub fn new(number: u16) -> Result<Self> {
        if number == 0 {
            bail!("Congress number must be positive");
        }
        Ok(Self { number })
    }

    #[inline] pub fn number(&self) -> u16 { self.number }

    #[inline]
    pub fn start_year(&self) -> i32 {
        FIRST_CONGRESS_START_YEAR + 2 * (self.number as i32 - 1)
    }

    /// e.g. "115th Congress"
    pub fn name(&self) -> String {
        format!("{} Congress", ordinal(self.number as u32))
    }

    /// The Congress that started in `year`, or was in session during it.
    pub fn for_year(year: i32) -> Option<Self> {
        if year < FIRST_CONGRESS_START_YEAR {
            return None;
        }
        let year = if year % 2 == 0 { year - 1 } else { year };
        let number = (year - FIRST_CONGRESS_START_YEAR) / 2 + 1;
        u16::try_from(number).ok().map(|number| Self { number })
    }

    /// Dates covered by a span of congresses: January 1 of the first one's
    /// start year through December 31 before the next Congress begins.
    pub fn span_validity(span: CongressSpan) -> Option<Validity> {
        let first = Self::new(span.first).ok()?;
        let after = Self::new(span.last.checked_add(1)?).ok()?;
        let start = NaiveDate::from_ymd_opt(first.start_year(), 1, 1)?;
        let end = NaiveDate::from_ymd_opt(after.start_year() - 1, 12, 31)?;
        Validity::new(start, end).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_years_follow_two_year_cycle() {
        assert_eq!(Congress::new(1).unwrap().start_year(), 1789);
        assert_eq!(Congress::new(2).unwrap().start_year(), 1791);
        assert_eq!(Congress::new(115).unwrap().start_year(), 2017);
        assert!(Congress::new(0).is_err());
    }

    #[test]
    fn names_use_ordinals() {
        assert_eq!(Congress::new(1).unwrap().name(), "1st Congress");
        assert_eq!(Congress::new(112).unwrap().name(), "112th Congress");
    }

    #[test]
    fn for_year_maps_both_session_years() {
        assert_eq!(Congress::for_year(1788), None);
        assert_eq!(Congress::for_year(1789).unwrap().number(), 1);
        assert_eq!(Congress::for_year(1790).unwrap().number(), 1);
        assert_eq!(Congress::for_year(2017).unwrap().number(), 115);
        assert_eq!(Congress::for_year(2018).unwrap().number(), 115);
    }

    #[test]
    fn span_validity_covers_whole_sessions() {
        let v = Congress::span_validity(CongressSpan { first: 1, last: 1 }).unwrap();
        assert_eq!(v.start().to_string(), "1789-01-01");
        assert_eq!(v.end().to_string(), "1790-12-31");
        assert!(Congress::span_validity(CongressSpan { first: 0, last: 3 }).is_none());
    }
}
