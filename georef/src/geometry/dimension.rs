//! Measuring capabilities of the geometry variants.
//!
//! Measurements are always taken in a metric spatial reference, so the planar length or area reported by the engine
//! is in meters (or square meters) before it is converted into the requested units.

use crate::engine;
use crate::error::Result;
use crate::geometry::SrShape;
use crate::measure::{convert, Units};
use crate::sr::MetricProjection;

/// Geometries that have length.
pub trait HasLength: SrShape {
    /// Length of the geometry measured in the metric spatial reference selected by `metric`.
    fn length(&self, units: Units, metric: MetricProjection) -> Result<f64> {
        let projected = self.as_metric(metric)?;
        convert(engine::length(projected.base_geometry()), Units::Meters, units, 1)
    }
}

/// Geometries that have area.
pub trait HasArea: SrShape {
    /// Area of the geometry measured in the UTM zone containing it.
    fn area(&self, units: Units) -> Result<f64> {
        self.area_with(units, MetricProjection::Utm)
    }

    /// Area of the geometry measured in the metric spatial reference selected by `metric`.
    fn area_with(&self, units: Units, metric: MetricProjection) -> Result<f64> {
        let projected = self.as_metric(metric)?;
        convert(engine::area(projected.base_geometry()), Units::Meters, units, 2)
    }
}
