use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::feature::{Feature, Identity};

/// What to do when more than one version's interval covers the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Report the overlap as `AmbiguousVersion`.
    #[default]
    Reject,
    /// Take the uniquely narrowest covering interval; a tie is still ambiguous.
    Narrowest,
}

/// Temporal selection failure. Fatal for the jurisdiction (and the run).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemporalError {
    #[error("{jurisdiction}: no boundary version is valid on {as_of}")]
    NoActiveVersion { jurisdiction: String, as_of: NaiveDate },

    #[error("{jurisdiction}: {} boundary versions are valid on {as_of} ({})", .versions.len(), .versions.join(", "))]
    AmbiguousVersion { jurisdiction: String, as_of: NaiveDate, versions: Vec<String> },
}

/// Boundary versions chosen for one reference date.
#[derive(Debug, Default)]
pub struct Selection {
    pub features: Vec<Feature>,
    /// Jurisdictions with no version at all around the date (not yet formed, or dissolved).
    pub omitted: Vec<Identity>,
    /// Reference date after clamping to the data's coverage.
    pub as_of: Option<NaiveDate>,
}

fn jurisdiction_name(candidates: &[&Feature]) -> String {
    candidates.first()
        .and_then(|f| f.identity())
        .map(|id| id.to_string())
        .unwrap_or_else(|| "<unknown jurisdiction>".to_string())
}

fn version_label(feature: &Feature) -> String {
    match (&feature.metadata.version, &feature.metadata.validity) {
        (Some(version), Some(validity)) => format!("version {version} {validity}"),
        (Some(version), None) => format!("version {version}"),
        (None, Some(validity)) => validity.to_string(),
        (None, None) => "undated version".to_string(),
    }
}

/// Pick the one candidate valid on `as_of`. Dates past the latest covered
/// date are clamped to it, so later years reuse the newest boundary.
/// An undated candidate is chosen only when no dated one covers the date.
pub fn select_active<'a>(candidates: &[&'a Feature], as_of: NaiveDate, policy: OverlapPolicy) -> Result<&'a Feature, TemporalError> {
    let latest = candidates.iter()
        .filter_map(|f| f.metadata.validity)
        .map(|v| v.end())
        .max();
    let as_of = match latest {
        Some(latest) if as_of > latest => latest,
        _ => as_of,
    };

    // Undated versions only stand in when no dated version covers the date.
    let dated = candidates.iter()
        .copied()
        .filter(|f| f.metadata.validity.is_some_and(|v| v.contains(as_of)))
        .collect::<Vec<_>>();
    let covering = if dated.is_empty() {
        candidates.iter().copied().filter(|f| f.metadata.validity.is_none()).collect()
    } else {
        dated
    };

    match covering.as_slice() {
        [] => Err(TemporalError::NoActiveVersion { jurisdiction: jurisdiction_name(candidates), as_of }),
        [only] => Ok(*only),
        many => {
            let ambiguous = || TemporalError::AmbiguousVersion {
                jurisdiction: jurisdiction_name(candidates),
                as_of,
                versions: many.iter().map(|f| version_label(f)).collect(),
            };
            if policy == OverlapPolicy::Reject {
                return Err(ambiguous());
            }

            let width = |f: &Feature| f.metadata.validity.map_or(i64::MAX, |v| v.span_days());
            let narrowest = many.iter().map(|f| width(*f)).min().ok_or_else(|| ambiguous())?;
            let mut best = many.iter().filter(|f| width(**f) == narrowest);
            match (best.next(), best.next()) {
                (Some(only), None) => Ok(*only),
                _ => Err(ambiguous()),
            }
        }
    }
}

/// Choose, for every jurisdiction in `features`, the boundary version in force
/// on `as_of`. The date is first clamped to the latest date any version covers.
/// Jurisdictions whose versions all begin after or all end before that date are
/// omitted; a gap inside a jurisdiction's coverage is an error.
///
/// Label points are dropped: they belong to whichever version they were made for.
pub fn select_for_date(features: Vec<Feature>, as_of: NaiveDate, policy: OverlapPolicy) -> Result<Selection, TemporalError> {
    let latest = features.iter()
        .filter(|f| f.is_boundary())
        .filter_map(|f| f.metadata.validity)
        .map(|v| v.end())
        .max();
    let as_of = match latest {
        Some(latest) if as_of > latest => {
            debug!(requested = %as_of, clamped = %latest, "reference date past available boundaries");
            latest
        }
        _ => as_of,
    };

    let mut groups: BTreeMap<&Identity, Vec<usize>> = BTreeMap::new();
    for (i, feature) in features.iter().enumerate() {
        if let (true, Some(identity)) = (feature.is_boundary(), feature.identity()) {
            groups.entry(identity).or_default().push(i);
        }
    }

    let mut chosen = Vec::with_capacity(groups.len());
    let mut omitted = Vec::new();
    for (identity, indices) in &groups {
        let candidates = indices.iter().map(|&i| &features[i]).collect::<Vec<_>>();

        let always = candidates.iter().any(|f| f.metadata.validity.is_none());
        let first = candidates.iter().filter_map(|f| f.metadata.validity).map(|v| v.start()).min();
        let last = candidates.iter().filter_map(|f| f.metadata.validity).map(|v| v.end()).max();
        let extant = always || matches!((first, last), (Some(first), Some(last)) if first <= as_of && as_of <= last);
        if !extant {
            debug!(jurisdiction = %identity, %as_of, "jurisdiction has no boundary at this date");
            omitted.push((*identity).clone());
            continue;
        }

        let selected = select_active(&candidates, as_of, policy)?;
        let index = indices.iter()
            .copied()
            .find(|&i| std::ptr::eq(&features[i], selected))
            .ok_or_else(|| TemporalError::NoActiveVersion { jurisdiction: identity.to_string(), as_of })?;
        chosen.push(index);
    }
    chosen.sort_unstable();

    let mut slots = features.into_iter().map(Some).collect::<Vec<_>>();
    let features = chosen.into_iter().filter_map(|i| slots[i].take()).collect();

    Ok(Selection { features, omitted, as_of: Some(as_of) })
}
