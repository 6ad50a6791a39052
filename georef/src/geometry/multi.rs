use geo_types::{MultiLineString, MultiPoint, MultiPolygon};

use crate::engine;
use crate::geometry::{HasArea, HasLength, SrGeometry, SrShape};

/// A set of points bound to a spatial reference.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SrMultiPoint(SrGeometry);

sr_variant!(SrMultiPoint, MultiPoint, multipoint, MultiPoint, {});

/// A set of line strings bound to a spatial reference.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SrMultiPolyline(SrGeometry);

/// Alternative name of [`SrMultiPolyline`].
pub type SrMultiLinestring = SrMultiPolyline;

sr_variant!(SrMultiPolyline, MultiLineString, multilinestring, MultiLineString, {
    fn as_linear(&self) -> Option<&dyn HasLength> {
        Some(self)
    }
});

impl HasLength for SrMultiPolyline {}

/// A set of polygons bound to a spatial reference.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SrMultiPolygon(SrGeometry);

sr_variant!(SrMultiPolygon, MultiPolygon, multipolygon, MultiPolygon, {
    fn as_areal(&self) -> Option<&dyn HasArea> {
        Some(self)
    }
});

impl HasArea for SrMultiPolygon {}

impl SrMultiPolygon {
    /// Merges overlapping and touching member polygons.
    pub fn dissolve(&self) -> SrMultiPolygon {
        let union = engine::union_all(self.multipolygon().iter().cloned());
        SrMultiPolygon::new(union, self.sr().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Units;
    use crate::sr::{MetricProjection, Sr, WGS_84};
    use approx::assert_abs_diff_eq;
    use geo_types::{line_string, point, polygon, Polygon};

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    #[test]
    fn multipoint_location_is_a_member() {
        let points = SrMultiPoint::new(
            MultiPoint::new(vec![point!(x: 0.0, y: 0.0), point!(x: 2.0, y: 0.0), point!(x: 10.0, y: 0.0)]),
            WGS_84,
        );
        let location = points.location().unwrap();
        assert!(points.multipoint().iter().any(|p| *p == *location.point()));
        assert!(points.as_linear().is_none());
        assert!(points.as_areal().is_none());
    }

    #[test]
    fn multipolyline_length() {
        let lines = SrMultiPolyline::new(
            MultiLineString::new(vec![
                line_string![(x: 400_000.0, y: 5_000_000.0), (x: 400_100.0, y: 5_000_000.0)],
                line_string![(x: 400_000.0, y: 5_000_100.0), (x: 400_000.0, y: 5_000_300.0)],
            ]),
            Sr::epsg(32615),
        );
        let length = lines.length(Units::Meters, MetricProjection::Utm).unwrap();
        assert_abs_diff_eq!(length, 300.0, epsilon = 1e-6);
    }

    #[test]
    fn multipolygon_area() {
        let polygons = SrMultiPolygon::new(
            MultiPolygon::new(vec![
                square(400_000.0, 5_000_000.0, 100.0),
                square(400_500.0, 5_000_000.0, 10.0),
            ]),
            Sr::epsg(32615),
        );
        assert_abs_diff_eq!(polygons.area(Units::Meters).unwrap(), 10_100.0, epsilon = 1e-6);
    }

    #[test]
    fn dissolve_merges_overlaps() {
        let polygons = SrMultiPolygon::new(
            MultiPolygon::new(vec![
                square(0.0, 0.0, 2.0),
                square(1.0, 0.0, 2.0),
                square(10.0, 0.0, 1.0),
            ]),
            Sr::epsg(32615),
        );

        let dissolved = polygons.dissolve();
        assert_eq!(dissolved.sr(), polygons.sr());
        assert_eq!(dissolved.multipolygon().0.len(), 2);
        assert_abs_diff_eq!(engine::area(dissolved.base_geometry()), 7.0, epsilon = 1e-9);
    }
}
