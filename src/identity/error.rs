/// Why a single feature could not be given an identity. Recoverable: the
/// feature is dropped and the error is reported with the run summary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("no identity scheme recognizes this dataset (expected one of: {expected})")]
    UnknownScheme { expected: &'static str },

    #[error("feature {feature}: missing field '{field}'")]
    MissingField { feature: String, field: String },

    #[error("feature {feature}: malformed {field} '{value}'")]
    Malformed { feature: String, field: &'static str, value: String },

    #[error("feature {feature}: no jurisdiction with code {code}")]
    UnknownJurisdiction { feature: String, code: u16 },
}
