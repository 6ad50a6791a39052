use geo_types::LineString;

use crate::engine;
use crate::error::{Result, ShapeError};
use crate::geometry::{HasLength, SrGeometry, SrPoint, SrShape};

/// A line string bound to a spatial reference.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SrPolyline(SrGeometry);

/// Alternative name of [`SrPolyline`].
pub type SrLinestring = SrPolyline;

sr_variant!(SrPolyline, LineString, linestring, LineString, {
    /// Point in the middle of the line length.
    fn location(&self) -> Result<SrPoint> {
        engine::interpolate(self.linestring(), 0.5)
            .map(|point| SrPoint::new(point, self.sr().clone()))
            .ok_or(ShapeError::EmptyGeometry)
    }

    fn as_linear(&self) -> Option<&dyn HasLength> {
        Some(self)
    }
});

impl HasLength for SrPolyline {}
