use geo_types::{point, Point};

use crate::error::Result;
use crate::geometry::{SrGeometry, SrShape, SrVariant};
use crate::sr::{LatLon, SrRef, WGS_84};

/// A point bound to a spatial reference.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct SrPoint(SrGeometry);

sr_variant!(SrPoint, Point, point, Point, {
    fn location(&self) -> Result<SrPoint> {
        Ok(self.clone())
    }
});

impl SrPoint {
    /// Point with the given latitude and longitude (in degrees) in WGS-84.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self::new(point!(x: lon, y: lat), WGS_84)
    }

    /// Point with the given coordinates in the spatial reference `sr`.
    ///
    /// A bare identifier given as `sr` is validated.
    pub fn from_coords(x: f64, y: f64, sr: impl Into<SrRef>) -> Result<Self> {
        Ok(Self::new(point!(x: x, y: y), sr.into().resolve()?))
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.point().x()
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.point().y()
    }

    /// Latitude and longitude of the point in WGS-84.
    pub fn lat_lon(&self) -> Result<LatLon> {
        let geographic = Self::from_geometry(self.geometry().reproject(&WGS_84)?)?;
        Ok(LatLon::new(geographic.y(), geographic.x()))
    }
}
