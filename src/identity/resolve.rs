use crate::feature::{DistrictNumber, Feature, Identity};

use super::{ordinal, scheme::{describe, ParsedId}, CodeTable, IdentityError, IdentityScheme};
use crate::temporal::Congress;

/// Result of resolving one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Feature),
    /// The source marks this record as outside any district; it is not an error.
    NotADistrict,
}

/// Aggregate result of resolving a whole dataset.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    pub features: Vec<Feature>,
    pub skipped: usize,
    pub failures: Vec<IdentityError>,
}

/// Populate identity, titles and jurisdiction fields of `feature`.
pub fn resolve(mut feature: Feature, scheme: IdentityScheme, codes: &CodeTable) -> Result<Resolution, IdentityError> {
    let parsed = scheme.parse(&feature)?;

    match parsed {
        ParsedId::NotADistrict => return Ok(Resolution::NotADistrict),
        ParsedId::District { code, number, span } => {
            let jurisdiction = codes.get(code)
                .ok_or_else(|| IdentityError::UnknownJurisdiction { feature: describe(&feature), code })?;
            let meta = &mut feature.metadata;

            let (short, long) = match number {
                DistrictNumber::AtLarge => (
                    format!("{} At Large", jurisdiction.abbreviation),
                    format!("{}'s At-Large Congressional District", jurisdiction.name),
                ),
                DistrictNumber::Numbered(n) => (
                    format!("{} {n}", jurisdiction.abbreviation),
                    format!("{}'s {} Congressional District", jurisdiction.name, ordinal(n as u32)),
                ),
            };

            meta.identity = Some(Identity::district(&jurisdiction.abbreviation, number, span));
            meta.title_short = Some(short);
            meta.title_long = Some(long);
            meta.state = Some(jurisdiction.abbreviation.clone());
            meta.state_fips = Some(code);
            meta.district = Some(number);
            meta.congress = span;
            if let Some(span) = span {
                meta.validity = Congress::span_validity(span);
            }
        }
        ParsedId::StateVersion { key, version, title_short, title_long, validity } => {
            let meta = &mut feature.metadata;
            if let Some(jurisdiction) = codes.by_abbreviation(title_short.trim()) {
                meta.state = Some(jurisdiction.abbreviation.clone());
                meta.state_fips = Some(jurisdiction.code);
            }
            meta.identity = Some(Identity::state(&key));
            meta.title_short = Some(title_short);
            meta.title_long = Some(title_long);
            meta.version = version;
            meta.validity = validity;
        }
        ParsedId::Prepared(prepared) => {
            let meta = &mut feature.metadata;
            let source = std::mem::take(&mut meta.source);
            *meta = *prepared;
            meta.source = source;
        }
    }

    Ok(Resolution::Resolved(feature))
}

/// Resolve every feature, collecting failures instead of stopping at the first.
pub fn resolve_all(features: Vec<Feature>, scheme: IdentityScheme, codes: &CodeTable) -> ResolveOutcome {
    let mut outcome = ResolveOutcome { features: Vec::with_capacity(features.len()), ..Default::default() };

    for feature in features {
        match resolve(feature, scheme, codes) {
            Ok(Resolution::Resolved(feature)) => outcome.features.push(feature),
            Ok(Resolution::NotADistrict) => outcome.skipped += 1,
            Err(error) => {
                tracing::debug!(%error, "dropping feature");
                outcome.failures.push(error);
            }
        }
    }

    outcome
}
