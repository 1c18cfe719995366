mod codes;
mod error;
mod ordinal;
mod resolve;
mod scheme;

pub use codes::{CodeTable, Jurisdiction};
pub use error::IdentityError;
pub use ordinal::ordinal;
pub use resolve::{resolve, resolve_all, Resolution, ResolveOutcome};
pub use scheme::IdentityScheme;
