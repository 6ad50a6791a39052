//! Adapter over the planar geometry engine (`geo-types` values with `geo` algorithms) and the structural mapping
//! format (GeoJSON geometry objects).
//!
//! Everything in this module is CRS-agnostic: coordinates are plain numbers here.

use std::fmt::{Display, Formatter};

use geo::orient::Direction;
use geo::{
    Area, BooleanOps, EuclideanLength, HasDimensions, InteriorPoint, LineInterpolatePoint, Orient,
    Relate,
};
use geo_types::{Coord, Geometry, GeometryCollection, LineString, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod buffer;

pub use buffer::buffer;

/// Structural kind of a planar geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum GeometryKind {
    /// Single point.
    Point,
    /// Single segment.
    Line,
    /// Open or closed chain of segments.
    LineString,
    /// Polygon with optional holes.
    Polygon,
    /// Set of points.
    MultiPoint,
    /// Set of line strings.
    MultiLineString,
    /// Set of polygons.
    MultiPolygon,
    /// Heterogeneous set of geometries.
    GeometryCollection,
    /// Axis-aligned rectangle.
    Rect,
    /// Triangle.
    Triangle,
}

impl GeometryKind {
    /// Kind of the given geometry.
    pub fn of(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Line(_) => GeometryKind::Line,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
            Geometry::Rect(_) => GeometryKind::Rect,
            Geometry::Triangle(_) => GeometryKind::Triangle,
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Structural (GeoJSON) mapping of the geometry.
pub fn to_mapping(geometry: &Geometry) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(geometry))
}

/// Concrete geometry described by the structural mapping.
pub fn from_mapping(mapping: geojson::Geometry) -> Result<Geometry> {
    Ok(Geometry::try_from(mapping)?)
}

/// A point guaranteed to lie inside or on the geometry. `None` for empty geometries.
pub fn representative_point(geometry: &Geometry) -> Option<Point> {
    geometry.interior_point()
}

/// Point at the given fraction (`0.0..=1.0`) of the line length.
pub fn interpolate(line: &LineString, fraction: f64) -> Option<Point> {
    line.line_interpolate_point(fraction)
}

/// Planar length of the linear components of the geometry. Polygons contribute the length of their rings, points
/// contribute nothing.
pub fn length(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
        Geometry::Line(line) => line.euclidean_length(),
        Geometry::LineString(line) => line.euclidean_length(),
        Geometry::MultiLineString(lines) => lines.euclidean_length(),
        Geometry::Polygon(polygon) => rings_length(polygon),
        Geometry::MultiPolygon(polygons) => polygons.iter().map(rings_length).sum(),
        Geometry::GeometryCollection(collection) => collection.iter().map(length).sum(),
        Geometry::Rect(rect) => rings_length(&rect.to_polygon()),
        Geometry::Triangle(triangle) => rings_length(&triangle.to_polygon()),
    }
}

fn rings_length(polygon: &Polygon) -> f64 {
    polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>()
}

/// Planar area of the geometry.
pub fn area(geometry: &Geometry) -> f64 {
    geometry.unsigned_area()
}

/// Returns true if the geometries represent the same point set, regardless of how their coordinates are listed.
pub fn topo_equals(a: &Geometry, b: &Geometry) -> bool {
    if a == b {
        return true;
    }

    match (a.is_empty(), b.is_empty()) {
        (true, true) => true,
        (false, false) => {
            let matrix = GeometryCollection(vec![a.clone()])
                .relate(&GeometryCollection(vec![b.clone()]));
            matrix.is_within() && matrix.is_contains()
        }
        _ => false,
    }
}

/// Same geometry with polygon rings listed in a fixed way: exteriors counter-clockwise, interiors clockwise, every
/// ring starting at its lowest vertex (by x, then y).
///
/// Polygons that differ only in ring orientation or starting vertex have equal canonical forms. Other equivalent
/// representations, such as redundant collinear vertices, are left as they are.
pub fn canonical_rings(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Polygon(polygon) => Geometry::Polygon(canonical_polygon(polygon)),
        Geometry::MultiPolygon(multi) => {
            Geometry::MultiPolygon(MultiPolygon::new(multi.iter().map(canonical_polygon).collect()))
        }
        Geometry::GeometryCollection(collection) => Geometry::GeometryCollection(GeometryCollection(
            collection.iter().map(canonical_rings).collect(),
        )),
        other => other.clone(),
    }
}

fn canonical_polygon(polygon: &Polygon) -> Polygon {
    let (exterior, interiors) = polygon.orient(Direction::Default).into_inner();
    Polygon::new(
        rotate_ring(exterior),
        interiors.into_iter().map(rotate_ring).collect(),
    )
}

fn rotate_ring(ring: LineString) -> LineString {
    if ring.0.len() < 4 || !ring.is_closed() {
        return ring;
    }

    let mut coords = ring.0;
    coords.pop();
    let lowest = coords
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)))
        .map(|(index, _)| index)
        .unwrap_or(0);
    coords.rotate_left(lowest);

    let first: Coord = coords[0];
    coords.push(first);
    LineString::new(coords)
}

/// Union of all the given polygons.
pub fn union_all(polygons: impl IntoIterator<Item = Polygon>) -> MultiPolygon {
    union_multi(
        polygons
            .into_iter()
            .map(|polygon| MultiPolygon::new(vec![polygon]))
            .collect(),
    )
}

pub(crate) fn union_multi(mut parts: Vec<MultiPolygon>) -> MultiPolygon {
    parts.retain(|part| !part.0.is_empty());

    while parts.len() > 1 {
        let mut merged = Vec::with_capacity(parts.len() / 2 + 1);
        let mut iter = parts.into_iter();
        while let Some(first) = iter.next() {
            match iter.next() {
                Some(second) => merged.push(first.union(&second)),
                None => merged.push(first),
            }
        }

        parts = merged;
    }

    parts.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo_types::{line_string, point, polygon};

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]
    }

    #[test]
    fn canonical_rings_ignore_orientation_and_start() {
        let a: Geometry = square(0.0, 0.0, 1.0).into();
        let b: Geometry = polygon![
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 1.0, y: 1.0),
        ]
        .into();

        assert_ne!(a, b);
        assert_eq!(canonical_rings(&a), canonical_rings(&b));

        let Geometry::Polygon(canonical) = canonical_rings(&b) else {
            panic!("kind changed");
        };
        assert_eq!(canonical.exterior().0[0], Coord { x: 0.0, y: 0.0 });

        let line: Geometry = line_string![(x: 1.0, y: 1.0), (x: 0.0, y: 0.0)].into();
        assert_eq!(canonical_rings(&line), line);
    }

    #[test]
    fn kinds() {
        assert_eq!(GeometryKind::of(&point!(x: 1.0, y: 2.0).into()), GeometryKind::Point);
        assert_eq!(
            GeometryKind::of(&line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into()),
            GeometryKind::LineString
        );
        assert_eq!(
            GeometryKind::of(&Geometry::MultiPolygon(MultiPolygon::new(vec![]))),
            GeometryKind::MultiPolygon
        );
    }

    #[test]
    fn mapping_round_trip() {
        let geometry: Geometry = square(0.0, 0.0, 2.0).into();
        let mapping = to_mapping(&geometry);
        assert_eq!(
            serde_json::to_value(&mapping).unwrap()["type"],
            serde_json::json!("Polygon")
        );
        assert_eq!(from_mapping(mapping).unwrap(), geometry);
    }

    #[test]
    fn measures() {
        let line: Geometry = line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0), (x: 3.0, y: 6.0)].into();
        assert_abs_diff_eq!(length(&line), 7.0);
        assert_abs_diff_eq!(area(&line), 0.0);

        let square: Geometry = square(0.0, 0.0, 2.0).into();
        assert_abs_diff_eq!(length(&square), 8.0);
        assert_abs_diff_eq!(area(&square), 4.0);
    }

    #[test]
    fn interpolation() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0)];
        assert_eq!(interpolate(&line, 0.5), Some(point!(x: 2.0, y: 0.0)));
    }

    #[test]
    fn representative_point_is_inside() {
        let geometry: Geometry = square(10.0, 10.0, 1.0).into();
        let point = representative_point(&geometry).unwrap();
        assert!(point.x() >= 10.0 && point.x() <= 11.0);
        assert!(point.y() >= 10.0 && point.y() <= 11.0);

        let empty = Geometry::MultiPoint(geo_types::MultiPoint::new(vec![]));
        assert_eq!(representative_point(&empty), None);
    }

    #[test]
    fn topological_equality() {
        let a: Geometry = square(0.0, 0.0, 1.0).into();
        let b: Geometry = polygon![
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
        ]
        .into();
        let c: Geometry = square(0.0, 0.0, 2.0).into();

        assert!(topo_equals(&a, &b));
        assert!(!topo_equals(&a, &c));
        assert!(!topo_equals(&a, &Geometry::MultiPolygon(MultiPolygon::new(vec![]))));
    }

    #[test]
    fn union_dissolves_overlaps() {
        let union = union_all(vec![
            square(0.0, 0.0, 2.0),
            square(1.0, 0.0, 2.0),
            square(10.0, 0.0, 1.0),
        ]);
        assert_eq!(union.0.len(), 2);
        assert_abs_diff_eq!(union.unsigned_area(), 7.0, epsilon = 1e-9);
        assert!(union_all(vec![]).0.is_empty());
    }
}
