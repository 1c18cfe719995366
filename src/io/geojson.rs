use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::feature::{Feature, FeatureKind, Metadata, Properties, Shape};

use super::properties::output_properties;

/// Read features from GeoJSON FeatureCollection bytes.
pub fn read_collection(bytes: &[u8]) -> Result<Vec<Feature>> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    if value["type"].as_str() != Some("FeatureCollection") {
        bail!("expected a GeoJSON FeatureCollection, found type {}", value["type"]);
    }

    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("FeatureCollection has no \"features\" array"))?;
    features.iter()
        .enumerate()
        .map(|(i, feature)| parse_feature(feature).with_context(|| format!("feature #{i}")))
        .collect()
}

/// Read features from line-delimited GeoJSON, one Feature per line.
/// Blank lines and ASCII record separators are ignored.
pub fn read_lines(text: &str) -> Result<Vec<Feature>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n, line.trim_matches(|c: char| c == '\u{1e}' || c.is_whitespace())))
        .filter(|(_, line)| !line.is_empty())
        .map(|(n, line)| {
            let value: Value = serde_json::from_str(line)
                .with_context(|| format!("line {}: invalid JSON", n + 1))?;
            parse_feature(&value).with_context(|| format!("line {}", n + 1))
        })
        .collect()
}

/// Write features as a GeoJSON FeatureCollection.
pub fn write_collection(features: &[Feature], keep_source: bool) -> Result<Vec<u8>> {
    let collection = json!({
        "type": "FeatureCollection",
        "features": features.iter().map(|f| feature_to_value(f, keep_source)).collect::<Vec<_>>(),
    });
    serde_json::to_vec(&collection).context("Failed to serialize GeoJSON to bytes")
}

/// Write features as line-delimited GeoJSON.
pub fn write_lines(features: &[Feature], keep_source: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for feature in features {
        serde_json::to_writer(&mut out, &feature_to_value(feature, keep_source))
            .context("Failed to serialize GeoJSON feature")?;
        out.push(b'\n');
    }
    Ok(out)
}

/// Convert one GeoJSON Feature object into a `Feature`.
pub fn parse_feature(value: &Value) -> Result<Feature> {
    if value["type"].as_str() != Some("Feature") {
        bail!("expected a GeoJSON Feature, found type {}", value["type"]);
    }

    let properties: Properties = match &value["properties"] {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => bail!("\"properties\" must be an object, found {other}"),
    };

    let raw_id = match properties.get("ID").or_else(|| value.get("id")).or_else(|| properties.get("id")) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let geometry = parse_geometry(&value["geometry"])?;
    let is_label = properties.get("group").and_then(Value::as_str) == Some("label")
        || matches!(geometry, Some(Shape::Point(_)));

    Ok(Feature {
        kind: if is_label { FeatureKind::Label } else { FeatureKind::Boundary },
        raw_id,
        geometry,
        metadata: Metadata::from_source(properties),
    })
}

/// Parse a GeoJSON geometry. Null and unsupported geometry types yield `None`.
fn parse_geometry(geometry: &Value) -> Result<Option<Shape>> {
    if geometry.is_null() {
        return Ok(None);
    }
    let coords = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Some(Shape::Area(MultiPolygon(vec![parse_polygon_coords(coords)?])))),
        Some("MultiPolygon") => Ok(Some(Shape::Area(parse_multipolygon_coords(coords)?))),
        Some("Point") => Ok(Some(Shape::Point(Point::from(parse_position(coords)?)))),
        other => {
            warn!(geometry = ?other, "unsupported geometry type; treating as null");
            Ok(None)
        }
    }
}

/// Parse GeoJSON MultiPolygon coordinates: [polygon, ...].
fn parse_multipolygon_coords(coords: &Value) -> Result<MultiPolygon<f64>> {
    let polygons = coords.as_array()
        .ok_or_else(|| anyhow!("Invalid MultiPolygon: coordinates must be an array"))?;
    Ok(MultiPolygon(polygons.iter().map(parse_polygon_coords).collect::<Result<_>>()?))
}

/// Parse GeoJSON Polygon coordinates: [exterior, hole, hole, ...].
fn parse_polygon_coords(coords: &Value) -> Result<Polygon<f64>> {
    let rings = coords.as_array()
        .ok_or_else(|| anyhow!("Invalid Polygon: coordinates must be an array"))?;
    let (exterior, interiors) = rings.split_first()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;

    Ok(Polygon::new(
        parse_ring_coords(exterior)?,
        interiors.iter().map(parse_ring_coords).collect::<Result<_>>()?,
    ))
}

/// Parse a ring (exterior or interior). Open rings are closed.
fn parse_ring_coords(coords: &Value) -> Result<LineString<f64>> {
    let positions = coords.as_array()
        .ok_or_else(|| anyhow!("Invalid ring: must be an array of positions"))?;
    let mut points = positions.iter().map(parse_position).collect::<Result<Vec<_>>>()?;

    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    Ok(LineString(points))
}

/// Parse a position [x, y, ...]; extra ordinates are ignored.
fn parse_position(coords: &Value) -> Result<Coord<f64>> {
    match coords.as_array().map(Vec::as_slice) {
        Some([x, y, ..]) => Ok(Coord {
            x: x.as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?,
            y: y.as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?,
        }),
        _ => bail!("Invalid position: expected [x, y]"),
    }
}

fn ring_to_value(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

fn polygon_to_value(polygon: &Polygon<f64>) -> Value {
    Value::Array(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_to_value)
            .collect()
    )
}

fn geometry_to_value(shape: Option<&Shape>) -> Value {
    match shape {
        None => Value::Null,
        Some(Shape::Point(p)) => json!({ "type": "Point", "coordinates": [p.x(), p.y()] }),
        Some(Shape::Area(mp)) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_to_value).collect::<Vec<_>>(),
        }),
    }
}

/// Convert a `Feature` into a GeoJSON Feature object.
pub fn feature_to_value(feature: &Feature, keep_source: bool) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry_to_value(feature.geometry.as_ref()),
        "properties": Value::Object(output_properties(feature, keep_source)),
    })
}
