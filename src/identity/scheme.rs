use std::{fmt, str::FromStr};

use anyhow::bail;
use serde_json::Value;

use crate::feature::{CongressSpan, DistrictNumber, EntityType, Feature, Identity, Metadata, Validity};

use super::IdentityError;

const SCHEME_NAMES: &str = "composite, census, states, prepared";

/// How raw identifiers are laid out in a dataset. Chosen once per dataset,
/// either explicitly or by `detect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityScheme {
    /// `ID` = `SSSBBBEEEDD[D]`: state code, first congress, last congress, district.
    CompositeCode,
    /// Census TIGER fields: `STATEFP`, `CDSESSN` and the session-named `CD{CDSESSN}FP`.
    CensusFields,
    /// Historical state/territory versions: `ID`, `VERSION`, `FULL_NAME`,
    /// `ABBR_NAME`, `START_DATE`, `END_DATE`.
    StateVersions,
    /// Output of an earlier run: `id`, `titleShort`, `titleLong`, ...
    Prepared,
}

/// What a scheme's parser extracted from one feature.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedId {
    District { code: u16, number: DistrictNumber, span: Option<CongressSpan> },
    StateVersion {
        key: String,
        version: Option<String>,
        title_short: String,
        title_long: String,
        validity: Option<Validity>,
    },
    Prepared(Box<Metadata>),
    /// Area the source marks as outside any district (e.g. "ZZ" water areas,
    /// negative numbers for tribal lands). Filtered at ingestion.
    NotADistrict,
}

impl IdentityScheme {
    pub fn to_str(&self) -> &'static str {
        match self {
            IdentityScheme::CompositeCode => "composite",
            IdentityScheme::CensusFields => "census",
            IdentityScheme::StateVersions => "states",
            IdentityScheme::Prepared => "prepared",
        }
    }

    /// Pick the scheme from the attributes of the first feature that has any.
    pub fn detect(features: &[Feature]) -> Result<Self, IdentityError> {
        let unknown = IdentityError::UnknownScheme { expected: SCHEME_NAMES };
        let meta = features.iter()
            .map(|f| &f.metadata)
            .find(|m| !m.source.is_empty())
            .ok_or(unknown.clone())?;

        let has = |field: &str| meta.source.contains_key(field);
        if has("CDSESSN") && has("STATEFP") {
            Ok(IdentityScheme::CensusFields)
        } else if has("FULL_NAME") && has("ABBR_NAME") {
            Ok(IdentityScheme::StateVersions)
        } else if has("id") && has("titleShort") {
            Ok(IdentityScheme::Prepared)
        } else if meta.source_str("ID").is_some_and(|id| composite::looks_like(&id)) {
            Ok(IdentityScheme::CompositeCode)
        } else {
            Err(unknown)
        }
    }

    pub(crate) fn parse(&self, feature: &Feature) -> Result<ParsedId, IdentityError> {
        match self {
            IdentityScheme::CompositeCode => composite::parse(feature),
            IdentityScheme::CensusFields => census::parse(feature),
            IdentityScheme::StateVersions => states::parse(feature),
            IdentityScheme::Prepared => prepared::parse(feature),
        }
    }
}

impl fmt::Display for IdentityScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for IdentityScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "composite" => Ok(IdentityScheme::CompositeCode),
            "census" => Ok(IdentityScheme::CensusFields),
            "states" => Ok(IdentityScheme::StateVersions),
            "prepared" => Ok(IdentityScheme::Prepared),
            other => bail!("Unknown identity scheme '{other}' (expected one of: {SCHEME_NAMES})"),
        }
    }
}

/// Human-readable handle for a feature in error messages.
pub(crate) fn describe(feature: &Feature) -> String {
    feature.raw_id.clone()
        .or_else(|| feature.metadata.source_str("NAMELSAD"))
        .or_else(|| feature.metadata.source_str("NAME"))
        .unwrap_or_else(|| "<no id>".to_string())
}

fn required(feature: &Feature, field: &str) -> Result<String, IdentityError> {
    feature.metadata.source_str(field)
        .ok_or_else(|| IdentityError::MissingField { feature: describe(feature), field: field.to_string() })
}

fn malformed(feature: &Feature, field: &'static str, value: &str) -> IdentityError {
    IdentityError::Malformed { feature: describe(feature), field, value: value.to_string() }
}

mod composite {
    use super::*;

    /// Byte ranges of the fixed-width code.
    const STATE: std::ops::Range<usize> = 0..3;
    const FIRST_CONGRESS: std::ops::Range<usize> = 3..6;
    const LAST_CONGRESS: std::ops::Range<usize> = 6..9;
    const NUMBER_START: usize = 9;

    pub(super) fn looks_like(id: &str) -> bool {
        (11..=12).contains(&id.len())
            && id.is_ascii()
            && id[..NUMBER_START].bytes().all(|b| b.is_ascii_digit())
    }

    pub(super) fn parse(feature: &Feature) -> Result<ParsedId, IdentityError> {
        let id = match &feature.raw_id {
            Some(id) => id.trim().to_string(),
            None => required(feature, "ID")?,
        };
        if !looks_like(&id) {
            return Err(malformed(feature, "composite ID", &id));
        }

        let field = |range: std::ops::Range<usize>, name: &'static str| {
            id[range].parse::<u16>().map_err(|_| malformed(feature, name, &id))
        };
        let code = field(STATE, "state code")?;
        let first = field(FIRST_CONGRESS, "first congress")?;
        let last = field(LAST_CONGRESS, "last congress")?;
        if first == 0 || last < first {
            return Err(malformed(feature, "congress span", &id));
        }

        let number = id[NUMBER_START..].trim().parse::<i32>()
            .map_err(|_| malformed(feature, "district number", &id))?;
        let number = match number {
            n if n < 0 => return Ok(ParsedId::NotADistrict),
            0 => DistrictNumber::AtLarge,
            n => DistrictNumber::Numbered(u16::try_from(n).map_err(|_| malformed(feature, "district number", &id))?),
        };

        Ok(ParsedId::District { code, number, span: Some(CongressSpan { first, last }) })
    }
}

mod census {
    use super::*;

    /// Sentinel for area not assigned to any district (usually water).
    const UNASSIGNED: &str = "ZZ";
    /// Delegate districts of the island territories, at-large in practice.
    const TERRITORY_AT_LARGE: &str = "98";

    pub(super) fn parse(feature: &Feature) -> Result<ParsedId, IdentityError> {
        let state = required(feature, "STATEFP")?;
        let code = state.trim().parse::<u16>().map_err(|_| malformed(feature, "STATEFP", &state))?;

        let session = required(feature, "CDSESSN")?;
        let number_field = format!("CD{}FP", session.trim());
        let raw = feature.metadata.source_str(&number_field)
            .ok_or_else(|| IdentityError::MissingField { feature: describe(feature), field: number_field })?;

        let number = match raw.trim() {
            UNASSIGNED => return Ok(ParsedId::NotADistrict),
            TERRITORY_AT_LARGE => DistrictNumber::AtLarge,
            text => match text.parse::<u16>() {
                Ok(0) => DistrictNumber::AtLarge,
                Ok(n) => DistrictNumber::Numbered(n),
                Err(_) => return Err(malformed(feature, "district number", text)),
            },
        };

        Ok(ParsedId::District { code, number, span: None })
    }
}

mod states {
    use super::*;

    pub(super) fn parse(feature: &Feature) -> Result<ParsedId, IdentityError> {
        let key = required(feature, "ID")?;
        let title_long = required(feature, "FULL_NAME")?;
        let title_short = required(feature, "ABBR_NAME")?;
        let version = feature.metadata.source_str("VERSION");

        let start = feature.metadata.source_str("START_DATE").filter(|s| !s.trim().is_empty());
        let end = feature.metadata.source_str("END_DATE").filter(|s| !s.trim().is_empty());
        let validity = match (start, end) {
            (Some(start), Some(end)) => {
                let start = Validity::parse_date(&start).map_err(|_| malformed(feature, "START_DATE", &start))?;
                let end_date = Validity::parse_date(&end).map_err(|_| malformed(feature, "END_DATE", &end))?;
                Some(Validity::new(start, end_date).map_err(|_| malformed(feature, "END_DATE", &end))?)
            }
            _ => None,
        };

        Ok(ParsedId::StateVersion { key: key.trim().to_string(), version, title_short, title_long, validity })
    }
}

mod prepared {
    use super::*;

    pub(super) fn parse(feature: &Feature) -> Result<ParsedId, IdentityError> {
        let key = required(feature, "id")?;
        let meta = &feature.metadata;
        let ty = match meta.source_str("entity").as_deref() {
            Some("state") => EntityType::State,
            Some("district") | None => EntityType::District,
            Some(other) => return Err(malformed(feature, "entity", other)),
        };

        let mut out = Metadata::default();
        out.identity = Some(Identity::new(ty, key.as_str()));
        out.title_short = meta.source_str("titleShort");
        out.title_long = meta.source_str("titleLong");
        out.color_class = meta.source.get("colorClass").and_then(Value::as_u64).and_then(|c| u8::try_from(c).ok());
        out.state = meta.source_str("state").map(Into::into);
        out.state_fips = meta.source.get("stateFips").and_then(Value::as_u64).and_then(|c| u16::try_from(c).ok());
        out.district = meta.source.get("district").and_then(Value::as_u64).and_then(|n| match n {
            0 => Some(DistrictNumber::AtLarge),
            n => u16::try_from(n).ok().map(DistrictNumber::Numbered),
        });
        let congress = |field: &str| meta.source.get(field).and_then(Value::as_u64).and_then(|n| u16::try_from(n).ok());
        out.congress = match (congress("congressFirst"), congress("congressLast")) {
            (Some(first), Some(last)) => Some(CongressSpan { first, last }),
            _ => None,
        };
        out.version = meta.source_str("version");

        let date = |field: &str| meta.source_str(field).and_then(|s| Validity::parse_date(&s).ok());
        out.validity = match (date("startDate"), date("endDate")) {
            (Some(start), Some(end)) => Validity::new(start, end).ok(),
            _ => None,
        };

        Ok(ParsedId::Prepared(Box::new(out)))
    }
}
