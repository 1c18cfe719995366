use geo::{Coord, MapCoords, MultiPolygon, Point};

use crate::feature::Shape;

#[inline]
fn round_to(value: f64, factor: f64) -> f64 {
    (value * factor).round() / factor
}

/// Round every coordinate of a multipolygon to `decimals` places.
pub(crate) fn round_multipolygon(shape: &MultiPolygon<f64>, decimals: u32) -> MultiPolygon<f64> {
    let factor = 10f64.powi(decimals as i32);
    shape.map_coords(move |c: Coord<f64>| Coord { x: round_to(c.x, factor), y: round_to(c.y, factor) })
}

/// Round a point to `decimals` places.
pub(crate) fn round_point(point: &Point<f64>, decimals: u32) -> Point<f64> {
    let factor = 10f64.powi(decimals as i32);
    Point::new(round_to(point.x(), factor), round_to(point.y(), factor))
}

/// Round the coordinates of any feature geometry.
pub fn round_shape(shape: &Shape, decimals: u32) -> Shape {
    match shape {
        Shape::Area(area) => Shape::Area(round_multipolygon(area, decimals)),
        Shape::Point(point) => Shape::Point(round_point(point, decimals)),
    }
}
