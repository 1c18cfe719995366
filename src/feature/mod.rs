mod feature;
mod identity;
mod metadata;
mod validity;

pub use feature::{Feature, FeatureKind, Shape};
pub use identity::{EntityType, Identity};
pub use metadata::{CongressSpan, DistrictNumber, Metadata, Properties};
pub use validity::Validity;
