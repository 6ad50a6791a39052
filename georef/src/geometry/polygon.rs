use geo_types::Polygon;

use crate::geometry::{HasArea, SrGeometry};

/// A polygon bound to a spatial reference.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SrPolygon(SrGeometry);

sr_variant!(SrPolygon, Polygon, polygon, Polygon, {
    fn as_areal(&self) -> Option<&dyn HasArea> {
        Some(self)
    }
});

impl HasArea for SrPolygon {}
