use geo::{MultiPolygon, Point};

use super::{Identity, Metadata, Properties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Boundary,   // Polygon to render
    Label,      // Point for text placement
}

impl FeatureKind {
    /// Value of the `group` output property.
    pub fn group(&self) -> &'static str {
        match self {
            FeatureKind::Boundary => "boundary",
            FeatureKind::Label => "label",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Area(MultiPolygon<f64>),
    Point(Point<f64>),
}

/// One geometric record plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub kind: FeatureKind,
    pub raw_id: Option<String>,
    pub geometry: Option<Shape>,  // None marks an unusable shape
    pub metadata: Metadata,
}

impl Feature {
    pub fn boundary(raw_id: Option<String>, geometry: Option<MultiPolygon<f64>>, source: Properties) -> Self {
        Self {
            kind: FeatureKind::Boundary,
            raw_id,
            geometry: geometry.map(Shape::Area),
            metadata: Metadata::from_source(source),
        }
    }

    /// A label point for `boundary`, carrying its own copy of the boundary's metadata.
    pub fn label_for(boundary: &Feature, point: Point<f64>) -> Self {
        Self {
            kind: FeatureKind::Label,
            raw_id: boundary.raw_id.clone(),
            geometry: Some(Shape::Point(point)),
            metadata: boundary.metadata.clone(),
        }
    }

    #[inline] pub fn is_boundary(&self) -> bool { self.kind == FeatureKind::Boundary }

    #[inline] pub fn is_label(&self) -> bool { self.kind == FeatureKind::Label }

    #[inline] pub fn identity(&self) -> Option<&Identity> { self.metadata.identity.as_ref() }

    /// Polygonal geometry, if this feature has any.
    pub fn area(&self) -> Option<&MultiPolygon<f64>> {
        match &self.geometry {
            Some(Shape::Area(mp)) => Some(mp),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<&Point<f64>> {
        match &self.geometry {
            Some(Shape::Point(pt)) => Some(pt),
            _ => None,
        }
    }
}
