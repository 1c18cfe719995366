use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Value};
use shapefile::{self as shp, dbase::FieldValue, Reader};
use tracing::warn;

use crate::feature::{Feature, FeatureKind, Metadata, Properties, Shape};

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>, grouping each
/// outer ring with the holes that follow it.
fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>();
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0]);
        }
        let ls = LineString(coords);

        match ring {
            shp::PolygonRing::Outer(_) => {
                if let Some(ext) = current_exterior.replace(ls) {
                    polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
            }
            shp::PolygonRing::Inner(_) => current_holes.push(ls),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

/// Attribute value as JSON. Whole numbers become integers so that codes
/// such as 39 read back as "39", not "39.0".
fn field_to_value(value: FieldValue) -> Value {
    fn number(n: f64) -> Value {
        if n.fract() == 0.0 && n.abs() < 9.0e15 { json!(n as i64) } else { json!(n) }
    }

    match value {
        FieldValue::Character(Some(s)) => json!(s.trim()),
        FieldValue::Memo(s) => json!(s),
        FieldValue::Numeric(Some(n)) => number(n),
        FieldValue::Float(Some(n)) => number(n as f64),
        FieldValue::Double(n) | FieldValue::Currency(n) => number(n),
        FieldValue::Integer(n) => json!(n),
        FieldValue::Logical(Some(b)) => json!(b),
        FieldValue::Date(Some(d)) => json!(format!("{:04}/{:02}/{:02}", d.year(), d.month(), d.day())),
        _ => Value::Null,
    }
}

/// Read every shape and attribute record of a `.shp` file (with its `.dbf`).
pub fn read_shapefile(path: &Path) -> Result<Vec<Feature>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("Error reading shape+record")?;

        let properties = record.into_iter()
            .map(|(field, value)| (field, field_to_value(value)))
            .collect::<Properties>();
        let raw_id = match properties.get("ID") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let (kind, geometry) = match shape {
            shp::Shape::Polygon(polygon) => (FeatureKind::Boundary, Some(Shape::Area(shp_to_geo(&polygon)))),
            shp::Shape::Point(pt) => (FeatureKind::Label, Some(Shape::Point(Point::new(pt.x, pt.y)))),
            shp::Shape::NullShape => (FeatureKind::Boundary, None),
            other => {
                warn!(shape = ?other.shapetype(), "unsupported shape type; treating as null");
                (FeatureKind::Boundary, None)
            }
        };

        features.push(Feature { kind, raw_id, geometry, metadata: Metadata::from_source(properties) });
    }
    Ok(features)
}
