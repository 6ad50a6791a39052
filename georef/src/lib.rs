//! Georef binds planar geometries to the spatial reference (coordinate reference system) their coordinates are
//! expressed in. It lets you move geometries between spatial references and measure or buffer them in meters without
//! thinking about which projection is accurate for the place the geometry is at.
//!
//! # Quick start
//!
//! ```no_run
//! use georef::{HasArea, MetricProjection, SrPoint, SrPolygon, SrShape, Units};
//!
//! let point = SrPoint::from_lat_lon(45.553670, -94.142430);
//!
//! // Buffer is built in the UTM zone of the point and returned in WGS-84.
//! let buffer = point.buffer(5.0, Units::Meters, 64, MetricProjection::Utm)?;
//! let area = buffer.as_areal().map(|areal| areal.area(Units::Meters)).transpose()?;
//!
//! // Export can be stored and loaded back into the same variant.
//! let data = serde_json::to_value(point.export())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Main components
//!
//! * [`Sr`] is a lightweight spatial reference key. [`sr`](sr()) and [`by_srid`] produce canonical values, and the
//!   [`sr` module](mod@sr) keeps process-wide caches of projections and transformation functions.
//! * [`SrGeometry`] and its variants ([`SrPoint`], [`SrPolyline`], [`SrPolygon`], [`SrMultiPoint`],
//!   [`SrMultiPolyline`], [`SrMultiPolygon`]) are the geometries. Common operations live in the [`SrShape`] trait,
//!   measuring in [`HasLength`] and [`HasArea`].
//! * [`sr_shape`] wraps a raw `geo-types` geometry or a GeoJSON geometry into the variant registered for its kind.
//!   The table of variants can be extended, see [`geometry::registry`].
//! * [`xchg`] exports geometries into a self-describing structure and loads them back.
//! * [`measure`] converts lengths, areas and volumes between units.
//!
//! The crate does not install a logger. It reports cache population and registry changes through the `log` facade.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod measure;
pub mod sr;
pub mod xchg;

pub use error::{Result, ShapeError};
pub use geometry::{
    sr_shape, ContentHash, GeometryKind, GeometrySource, HasArea, HasLength, SrGeometry, SrLinestring,
    SrMultiLinestring, SrMultiPoint, SrMultiPolygon, SrMultiPolyline, SrPoint, SrPolygon, SrPolyline,
    SrShape, SrVariant, DEFAULT_BUFFER_RESOLUTION,
};
pub use measure::{convert, to_meters, Units};
pub use sr::{
    by_srid, sr, utm_zone, Authority, LatLon, MetricProjection, Sr, SrRef, US_NATIONAL_ATLAS,
    WEB_MERCATOR, WGS_84,
};
pub use xchg::{load_shape, ExportData, Exportable};

pub use geo_types;
pub use geojson;
