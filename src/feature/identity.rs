use std::{cmp::Ordering, fmt, sync::Arc};

use super::{CongressSpan, DistrictNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    District,   // Congressional district, keyed by state + number
    State,      // State or territory boundary version, keyed by jurisdiction
}

impl EntityType {
    pub fn to_str(&self) -> &'static str {
        match self {
            EntityType::District => "district",
            EntityType::State => "state",
        }
    }
}

/// Stable key for a boundary across pipeline stages.
/// Cheap to clone; the key text is shared, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    ty: EntityType,
    key: Arc<str>, // e.g. "CA12", "AK00@086-087", "ala_state"
}

impl Identity {
    pub fn new(ty: EntityType, key: impl Into<Arc<str>>) -> Self {
        Self { ty, key: key.into() }
    }

    /// District key: state abbreviation + two-digit number ("00" is at-large),
    /// suffixed with the congress span when the source carries one.
    pub fn district(abbreviation: &str, number: DistrictNumber, span: Option<CongressSpan>) -> Self {
        let key = match span {
            Some(span) => format!("{abbreviation}{:02}@{:03}-{:03}", number.as_u16(), span.first, span.last),
            None => format!("{abbreviation}{:02}", number.as_u16()),
        };
        Self::new(EntityType::District, key)
    }

    pub fn state(key: &str) -> Self {
        Self::new(EntityType::State, key)
    }

    #[inline] pub fn ty(&self) -> EntityType { self.ty }

    #[inline] pub fn as_str(&self) -> &str { &self.key }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

// Total order on the key text first, so tie-breaking by identity string is
// the same whichever dataset the identity came from.
impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).then_with(|| self.ty.cmp(&other.ty))
    }
}

impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
