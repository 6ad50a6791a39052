//! Spatially-referenced geometries.
//!
//! [`SrGeometry`] binds a planar geometry to the [`Sr`] its coordinates are expressed in. Concrete variants
//! ([`SrPoint`], [`SrPolyline`], [`SrPolygon`], [`SrMultiPoint`], [`SrMultiPolyline`], [`SrMultiPolygon`]) wrap an
//! `SrGeometry` of the matching kind. All of them implement [`SrShape`], which carries the operations shared by every
//! variant: transformation between spatial references, metric buffering and export.
//!
//! Operations never modify a geometry in place. Every transforming operation returns a new value, which is a plain
//! copy of the original when the operation turns out to be a no-op.
//!
//! Use [`sr_shape`] to wrap a raw geometry into the variant registered for its kind (see [`registry`]).

use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use geo::MapCoords;
use geo_types::Geometry;
use serde::Serialize;
use sha2::{Digest, Sha512};

use crate::engine;
use crate::error::{Result, ShapeError};
use crate::measure::{to_meters, Units};
use crate::sr::{
    transform_fn, utm_zone, MetricProjection, Sr, SrRef, US_NATIONAL_ATLAS, WEB_MERCATOR, WGS_84,
};
use crate::xchg::ExportData;

pub use crate::engine::GeometryKind;

/// Generates the boilerplate shared by the concrete geometry variants: constructor, typed accessor, [`SrShape`] and
/// [`SrVariant`] impls and conversions from/to [`SrGeometry`].
///
/// Additional [`SrShape`] methods can be given in the trailing block.
macro_rules! sr_variant {
    ($name:ident, $kind:ident, $accessor:ident, $inner:ty, { $($shape:tt)* }) => {
        impl $name {
            /// Creates a new instance bound to the spatial reference `sr`.
            pub fn new(geometry: $inner, sr: $crate::sr::Sr) -> Self {
                Self($crate::geometry::SrGeometry::new(
                    geo_types::Geometry::$kind(geometry),
                    sr,
                ))
            }

            #[doc = concat!("Underlying `", stringify!($kind), "`.")]
            pub fn $accessor(&self) -> &$inner {
                match self.0.base_geometry() {
                    geo_types::Geometry::$kind(geometry) => geometry,
                    _ => unreachable!(concat!(stringify!($name), " always wraps a ", stringify!($kind))),
                }
            }
        }

        impl $crate::geometry::SrShape for $name {
            fn geometry(&self) -> &$crate::geometry::SrGeometry {
                &self.0
            }

            fn type_tag(&self) -> &'static str {
                <Self as $crate::geometry::SrVariant>::TYPE_TAG
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn clone_shape(&self) -> Box<dyn $crate::geometry::SrShape> {
                Box::new(self.clone())
            }

            $($shape)*
        }

        impl $crate::geometry::SrVariant for $name {
            const TYPE_TAG: &'static str = concat!(env!("CARGO_PKG_NAME"), "::", stringify!($name));
            const KIND: Option<$crate::geometry::GeometryKind> =
                Some($crate::geometry::GeometryKind::$kind);

            fn from_geometry(geometry: $crate::geometry::SrGeometry) -> $crate::error::Result<Self> {
                let actual = $crate::geometry::GeometryKind::of(geometry.base_geometry());
                if actual == $crate::geometry::GeometryKind::$kind {
                    Ok(Self(geometry))
                } else {
                    Err($crate::error::ShapeError::WrongGeometryKind {
                        expected: $crate::geometry::GeometryKind::$kind,
                        actual,
                    })
                }
            }

            fn into_geometry(self) -> $crate::geometry::SrGeometry {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt_named(f, stringify!($name))
            }
        }

        impl From<$name> for $crate::geometry::SrGeometry {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<$crate::geometry::SrGeometry> for $name {
            type Error = $crate::error::ShapeError;

            fn try_from(value: $crate::geometry::SrGeometry) -> $crate::error::Result<Self> {
                <Self as $crate::geometry::SrVariant>::from_geometry(value)
            }
        }
    };
}

mod dimension;
mod multi;
mod point;
mod polygon;
mod polyline;
pub mod registry;

pub use dimension::{HasArea, HasLength};
pub use multi::{SrMultiLinestring, SrMultiPoint, SrMultiPolygon, SrMultiPolyline};
pub use point::SrPoint;
pub use polygon::SrPolygon;
pub use polyline::{SrLinestring, SrPolyline};

/// Number of segments per quarter circle used by buffering when the caller has no preference.
pub const DEFAULT_BUFFER_RESOLUTION: u32 = 64;

/// SHA-512 digest of the canonical export of a geometry.
///
/// Displayed as a hexadecimal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 64]);

impl ContentHash {
    /// Raw digest bytes, most significant first.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct HashInput<'a> {
    base_geometry: geojson::Geometry,
    sr: &'a Sr,
}

/// A planar geometry bound to a spatial reference.
///
/// This is the base value every variant wraps, and the wrapper used for geometry kinds that have no registered
/// variant.
///
/// Two geometries are equal if their spatial references are equal and their geometries represent the same point set
/// (the order of coordinates does not matter). The hash is computed from the content hash, which is taken over
/// polygon rings in a canonical orientation and starting vertex. Geometries that are equal but differ in other ways,
/// such as redundant vertices or the order of parts, may still hash differently.
#[derive(Clone)]
pub struct SrGeometry {
    base_geometry: Geometry,
    sr: Sr,
    content_hash: OnceLock<ContentHash>,
}

impl SrGeometry {
    /// Creates a new instance bound to the spatial reference `sr`.
    pub fn new(geometry: impl Into<Geometry>, sr: Sr) -> Self {
        Self {
            base_geometry: geometry.into(),
            sr,
            content_hash: OnceLock::new(),
        }
    }

    /// Underlying planar geometry.
    pub fn base_geometry(&self) -> &Geometry {
        &self.base_geometry
    }

    /// Spatial reference of the coordinates.
    pub fn sr(&self) -> &Sr {
        &self.sr
    }

    /// Identifier of the spatial reference.
    pub fn srid(&self) -> i32 {
        self.sr.srid()
    }

    /// Kind of the underlying geometry.
    pub fn kind(&self) -> GeometryKind {
        GeometryKind::of(&self.base_geometry)
    }

    /// Structural (GeoJSON) mapping of the underlying geometry.
    pub fn mapping(&self) -> geojson::Geometry {
        engine::to_mapping(&self.base_geometry)
    }

    /// Same geometry with every coordinate mapped into the `target` spatial reference.
    pub fn reproject(&self, target: &Sr) -> Result<SrGeometry> {
        if target == &self.sr {
            return Ok(self.clone());
        }

        let transform = transform_fn(&self.sr, target)?;
        let transform = transform.as_ref();
        let geometry = self
            .base_geometry
            .try_map_coords(|coord| transform.apply(coord))?;

        Ok(SrGeometry::new(geometry, target.clone()))
    }

    /// A point that lies inside or on the geometry, in the same spatial reference.
    pub fn representative_point(&self) -> Result<SrPoint> {
        engine::representative_point(&self.base_geometry)
            .map(|point| SrPoint::new(point, self.sr.clone()))
            .ok_or(ShapeError::EmptyGeometry)
    }

    /// Digest of the geometry mapping and the spatial reference. Computed once per instance.
    ///
    /// Polygon rings are hashed in their canonical form (see [`engine::canonical_rings`]).
    pub fn content_hash(&self) -> ContentHash {
        *self.content_hash.get_or_init(|| {
            let input = HashInput {
                base_geometry: engine::to_mapping(&engine::canonical_rings(&self.base_geometry)),
                sr: &self.sr,
            };
            // Plain geometry mappings always serialize.
            let bytes = serde_json::to_vec(&input).unwrap_or_default();

            let mut digest = [0; 64];
            digest.copy_from_slice(&Sha512::digest(&bytes));
            ContentHash(digest)
        })
    }

    pub(crate) fn fmt_named(&self, f: &mut Formatter<'_>, name: &str) -> std::fmt::Result {
        let mapping = serde_json::to_string(&self.mapping()).map_err(|_| std::fmt::Error)?;
        write!(
            f,
            "{name}(base_geometry={mapping}, sr=Sr(srid={}, authority={}))",
            self.sr.srid(),
            self.sr.authority()
        )
    }
}

impl Debug for SrGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrGeometry")
            .field("base_geometry", &self.base_geometry)
            .field("sr", &self.sr)
            .finish_non_exhaustive()
    }
}

impl Display for SrGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_named(f, "SrGeometry")
    }
}

impl PartialEq for SrGeometry {
    fn eq(&self, other: &Self) -> bool {
        self.sr == other.sr && engine::topo_equals(&self.base_geometry, &other.base_geometry)
    }
}

impl Hash for SrGeometry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content_hash().hash(state);
    }
}

/// Geometry in the WGS-84 geographic spatial reference.
impl From<Geometry> for SrGeometry {
    fn from(value: Geometry) -> Self {
        SrGeometry::new(value, WGS_84)
    }
}

impl SrShape for SrGeometry {
    fn geometry(&self) -> &SrGeometry {
        self
    }

    fn type_tag(&self) -> &'static str {
        <Self as SrVariant>::TYPE_TAG
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_shape(&self) -> Box<dyn SrShape> {
        Box::new(self.clone())
    }
}

impl SrVariant for SrGeometry {
    const TYPE_TAG: &'static str = concat!(env!("CARGO_PKG_NAME"), "::SrGeometry");
    const KIND: Option<GeometryKind> = None;

    fn from_geometry(geometry: SrGeometry) -> Result<Self> {
        Ok(geometry)
    }

    fn into_geometry(self) -> SrGeometry {
        self
    }
}

/// Operations shared by every spatially-referenced geometry.
///
/// The trait is object safe: operations that may produce a different variant return `Box<dyn SrShape>`, and the
/// concrete type can be recovered with [`downcast_ref`](#method.downcast_ref).
pub trait SrShape: Debug + Display + Send + Sync + 'static {
    /// Base geometry value.
    fn geometry(&self) -> &SrGeometry;

    /// Fully qualified name of the variant, used to reconstruct it from exported data.
    fn type_tag(&self) -> &'static str;

    /// Upcast used for downcasting to the concrete variant.
    fn as_any(&self) -> &dyn Any;

    /// Boxed copy of the value.
    fn clone_shape(&self) -> Box<dyn SrShape>;

    /// Single point summarising the geometry.
    ///
    /// Unless a variant defines otherwise, this is the representative point of the geometry.
    fn location(&self) -> Result<SrPoint> {
        self.geometry().representative_point()
    }

    /// Length capability of the variant, if it has one.
    fn as_linear(&self) -> Option<&dyn HasLength> {
        None
    }

    /// Area capability of the variant, if it has one.
    fn as_areal(&self) -> Option<&dyn HasArea> {
        None
    }

    /// Spatial reference of the coordinates.
    fn sr(&self) -> &Sr {
        self.geometry().sr()
    }

    /// Identifier of the spatial reference.
    fn srid(&self) -> i32 {
        self.geometry().srid()
    }

    /// Underlying planar geometry.
    fn base_geometry(&self) -> &Geometry {
        self.geometry().base_geometry()
    }

    /// Content hash of the geometry. See [`SrGeometry::content_hash`].
    fn content_hash(&self) -> ContentHash {
        self.geometry().content_hash()
    }

    /// Structure that can be loaded back into an equal geometry of the same variant.
    fn export(&self) -> ExportData {
        ExportData {
            type_tag: self.type_tag().to_string(),
            base_geometry: self.geometry().mapping(),
            sr: self.sr().clone(),
        }
    }

    /// Transforms the geometry into the `target` spatial reference.
    ///
    /// The result is wrapped into the variant registered for its kind. If the geometry is already in `target`, a
    /// copy is returned.
    fn transform(&self, target: SrRef) -> Result<Box<dyn SrShape>> {
        let target = target.resolve()?;
        if &target == self.sr() {
            return Ok(self.clone_shape());
        }

        registry::wrap(self.geometry().reproject(&target)?)
    }

    /// The geometry in WGS-84 geographic coordinates.
    fn as_wgs84(&self) -> Result<Box<dyn SrShape>> {
        self.transform(WGS_84.into())
    }

    /// The geometry in the US National Atlas Equal Area projection.
    fn as_usm(&self) -> Result<Box<dyn SrShape>> {
        self.transform(US_NATIONAL_ATLAS.into())
    }

    /// The geometry in the Web Mercator projection.
    fn as_wm(&self) -> Result<Box<dyn SrShape>> {
        self.transform(WEB_MERCATOR.into())
    }

    /// The geometry in the UTM zone containing its representative point.
    fn as_utm(&self) -> Result<Box<dyn SrShape>> {
        let point = if self.sr().is_geographic() {
            self.geometry().representative_point()?
        } else {
            self.geometry().reproject(&WGS_84)?.representative_point()?
        };

        self.transform(utm_zone(point.y(), point.x()).into())
    }

    /// The geometry in the metric spatial reference selected by `metric`.
    fn as_metric(&self, metric: MetricProjection) -> Result<Box<dyn SrShape>> {
        match metric {
            MetricProjection::Utm => self.as_utm(),
            MetricProjection::UsNationalAtlas => self.as_usm(),
            MetricProjection::WebMercator => self.as_wm(),
        }
    }

    /// Area within `distance` of the geometry, in the spatial reference of the geometry.
    ///
    /// The buffer is built in the metric spatial reference selected by `metric`, with `resolution` segments per
    /// quarter circle. The result is a [`SrPolygon`] if the buffer is one polygon and a [`SrMultiPolygon`] otherwise.
    fn buffer(
        &self,
        distance: f64,
        units: Units,
        resolution: u32,
        metric: MetricProjection,
    ) -> Result<Box<dyn SrShape>> {
        let meters = to_meters(distance, units, 1)?;
        let projected = self.as_metric(metric)?;
        let metric_sr = projected.sr().clone();

        let mut buffered = engine::buffer(projected.base_geometry(), meters, resolution);
        let shape: Box<dyn SrShape> = match buffered.0.len() {
            1 => Box::new(SrPolygon::new(buffered.0.remove(0), metric_sr)),
            _ => Box::new(SrMultiPolygon::new(buffered, metric_sr)),
        };

        shape.transform(self.sr().into())
    }
}

impl dyn SrShape {
    /// Returns the concrete variant if it is `T`.
    pub fn downcast_ref<T: SrShape>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Returns true if the concrete variant is `T`.
    pub fn is<T: SrShape>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl PartialEq for dyn SrShape {
    fn eq(&self, other: &Self) -> bool {
        self.geometry() == other.geometry()
    }
}

impl Clone for Box<dyn SrShape> {
    fn clone(&self) -> Self {
        self.clone_shape()
    }
}

/// A variant of [`SrGeometry`] with a fixed type tag.
pub trait SrVariant: SrShape + Clone + Sized {
    /// Fully qualified name of the variant.
    const TYPE_TAG: &'static str;

    /// Geometry kind the variant wraps. `None` if it accepts any kind.
    const KIND: Option<GeometryKind>;

    /// Wraps the geometry, checking that it has the right kind.
    fn from_geometry(geometry: SrGeometry) -> Result<Self>;

    /// Unwraps the base geometry value.
    fn into_geometry(self) -> SrGeometry;
}

/// Raw geometry accepted by [`sr_shape`]: either a concrete planar geometry or its structural mapping.
#[derive(Debug, Clone)]
pub enum GeometrySource {
    /// Concrete geometry.
    Geometry(Geometry),
    /// GeoJSON geometry object.
    Mapping(geojson::Geometry),
}

macro_rules! geometry_source_from {
    ($($ty:ident),*) => {
        $(
            impl From<geo_types::$ty> for GeometrySource {
                fn from(value: geo_types::$ty) -> Self {
                    Self::Geometry(value.into())
                }
            }
        )*
    };
}

geometry_source_from!(
    Geometry,
    Point,
    Line,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    Rect,
    Triangle
);

impl From<geo_types::GeometryCollection> for GeometrySource {
    fn from(value: geo_types::GeometryCollection) -> Self {
        Self::Geometry(Geometry::GeometryCollection(value))
    }
}

impl From<geojson::Geometry> for GeometrySource {
    fn from(value: geojson::Geometry) -> Self {
        Self::Mapping(value)
    }
}

/// Wraps a raw geometry into the variant registered for its kind.
///
/// Structural mappings are converted into concrete geometries first. A bare identifier given as `sr` is validated.
pub fn sr_shape(source: impl Into<GeometrySource>, sr: impl Into<SrRef>) -> Result<Box<dyn SrShape>> {
    let geometry = match source.into() {
        GeometrySource::Geometry(geometry) => geometry,
        GeometrySource::Mapping(mapping) => engine::from_mapping(mapping)?,
    };
    let sr = sr.into().resolve()?;

    registry::wrap(SrGeometry::new(geometry, sr))
}
