use std::collections::BTreeMap;

use ahash::AHashSet;
use geo::{Area, Centroid, Contains, InteriorPoint, MultiPolygon, Point};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::feature::{Feature, Identity};

/// Where a generated label point goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPlacement {
    /// Area-weighted center of mass, even when it falls outside the shape.
    #[default]
    CenterOfMass,
    /// Center of mass, or an interior point when the center lies outside.
    InteriorFallback,
}

/// A boundary that cannot carry a label. Recoverable: the boundary is still
/// emitted, only its label is missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{identity}: cannot place a label ({reason})")]
pub struct DegenerateGeometry {
    pub identity: String,
    pub reason: &'static str,
}

/// Labels produced for a dataset, plus the boundaries that were passed over.
#[derive(Debug, Default)]
pub struct LabelBatch {
    pub labels: Vec<Feature>,
    pub degenerate: Vec<DegenerateGeometry>,
}

/// Compute a label anchor for `shape`.
pub fn label_point(shape: &MultiPolygon<f64>, placement: LabelPlacement) -> Result<Point<f64>, &'static str> {
    if shape.0.is_empty() {
        return Err("empty geometry");
    }
    if !(shape.unsigned_area() > 0.0) {
        return Err("zero area");
    }

    let center = shape.centroid().ok_or("no center of mass")?;
    if !center.x().is_finite() || !center.y().is_finite() {
        return Err("non-finite center of mass");
    }

    match placement {
        LabelPlacement::InteriorFallback if !shape.contains(&center) => {
            shape.interior_point().ok_or("no interior point")
        }
        _ => Ok(center),
    }
}

/// Generate one label per identity that does not already have one.
///
/// Every boundary part sharing an identity contributes to a single combined
/// center of mass. The label copies the metadata of the first part. Output is
/// ordered by identity.
pub fn generate_labels(
    boundaries: &[Feature],
    existing: &AHashSet<Identity>,
    placement: LabelPlacement,
    parallel: bool,
) -> LabelBatch {
    let mut groups: BTreeMap<&Identity, Vec<&Feature>> = BTreeMap::new();
    for feature in boundaries.iter().filter(|f| f.is_boundary()) {
        let Some(identity) = feature.identity() else { continue };
        if existing.contains(identity) {
            continue;
        }
        groups.entry(identity).or_default().push(feature);
    }
    let groups = groups.into_iter().collect::<Vec<_>>();

    let place = |(identity, parts): &(&Identity, Vec<&Feature>)| -> Result<Feature, DegenerateGeometry> {
        let degenerate = |reason| DegenerateGeometry { identity: identity.to_string(), reason };

        let areas = parts.iter().filter_map(|f| f.area()).collect::<Vec<_>>();
        if areas.is_empty() {
            return Err(degenerate("null geometry"));
        }
        let combined = match areas.as_slice() {
            [only] => label_point(only, placement),
            many => {
                let merged = MultiPolygon(many.iter().flat_map(|mp| mp.0.iter().cloned()).collect());
                label_point(&merged, placement)
            }
        };
        combined.map(|point| Feature::label_for(parts[0], point)).map_err(degenerate)
    };

    let placed: Vec<_> = if parallel {
        groups.par_iter().map(place).collect()
    } else {
        groups.iter().map(place).collect()
    };

    let mut batch = LabelBatch::default();
    for result in placed {
        match result {
            Ok(label) => batch.labels.push(label),
            Err(skip) => {
                debug!(identity = %skip.identity, reason = skip.reason, "no label generated");
                batch.degenerate.push(skip);
            }
        }
    }
    batch
}
