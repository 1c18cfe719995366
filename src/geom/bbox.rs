use geo::{BoundingRect, MultiPolygon, Rect};
use rstar::{RTree, RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a MultiPolygon by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding MultiPolygon in the caller's slice
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding MultiPolygon.
    pub(crate) fn idx(&self) -> usize { self.idx }

    /// Search envelope around this box, grown by `pad` on every side.
    pub(crate) fn search_envelope(&self, pad: f64) -> AABB<[f64; 2]> {
        AABB::from_corners(
            [self.bbox.min().x - pad, self.bbox.min().y - pad],
            [self.bbox.max().x + pad, self.bbox.max().y + pad],
        )
    }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Bulk-load an R-tree over `shapes`. Empty shapes have no bounding
/// rectangle and are left out of the tree.
pub(crate) fn build_rtree(shapes: &[MultiPolygon<f64>]) -> RTree<BoundingBox> {
    RTree::bulk_load(
        shapes.iter().enumerate()
            .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
            .collect()
    )
}
