use std::sync::Arc;

use super::{Identity, Validity};

/// Raw source attributes, kept in source order.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// District number within a jurisdiction. Every source-specific at-large
/// sentinel ("00", "98", 0) resolves to the single `AtLarge` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DistrictNumber {
    AtLarge,
    Numbered(u16),
}

impl DistrictNumber {
    /// Numeric form used in keys and output, with 0 for at-large.
    pub fn as_u16(&self) -> u16 {
        match self {
            DistrictNumber::AtLarge => 0,
            DistrictNumber::Numbered(n) => *n,
        }
    }

    #[inline] pub fn is_at_large(&self) -> bool { matches!(self, DistrictNumber::AtLarge) }
}

/// Range of Congress numbers (inclusive) during which a district shape was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CongressSpan {
    pub first: u16,
    pub last: u16,
}

impl CongressSpan {
    #[inline]
    pub fn contains(&self, congress: u16) -> bool {
        self.first <= congress && congress <= self.last
    }
}

/// Metadata carried by every feature.
///
/// `Clone` is a full structural copy: label points get their own record, and
/// editing one afterwards never shows through in the other. Shared `Arc<str>`
/// text inside `Identity` and `state` is immutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub identity: Option<Identity>,
    pub title_short: Option<String>,
    pub title_long: Option<String>,
    pub validity: Option<Validity>,
    pub color_class: Option<u8>,

    pub state: Option<Arc<str>>,       // Jurisdiction abbreviation, e.g. "OH"
    pub state_fips: Option<u16>,
    pub district: Option<DistrictNumber>,
    pub congress: Option<CongressSpan>,
    pub version: Option<String>,       // Boundary version label, state datasets only

    pub source: Properties,
}

impl Metadata {
    pub fn from_source(source: Properties) -> Self {
        Self { source, ..Default::default() }
    }

    /// Look up a raw source attribute as text. Numbers are rendered in their
    /// JSON form so that `1` and `"1"` read the same.
    pub fn source_str(&self, field: &str) -> Option<String> {
        match self.source.get(field)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
