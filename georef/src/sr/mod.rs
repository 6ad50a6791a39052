//! Spatial references (SR): identifiers of coordinate reference systems, their projections and transformations
//! between them.
//!
//! An [`Sr`] is a lightweight value key. Everything expensive hangs off process-wide caches keyed by it:
//! * interned [`Sr`] values ([`sr`], [`by_srid`]),
//! * projection handles ([`projection_handle`]),
//! * transformation functions between pairs of spatial references ([`transform_fn`]).
//!
//! The caches are populated lazily and are never evicted.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod definitions;
mod metric;
mod projection;
mod transform;

pub use definitions::{definition, register_definition, CrsDefinition};
pub use metric::MetricProjection;
pub use projection::{projection_handle, ProjectionHandle};
pub use transform::{transform_fn, TransformFn};

/// Spatial reference authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    /// European Petroleum Survey Group.
    Epsg,
}

impl Authority {
    /// Canonical (lower case) name of the authority.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Authority::Epsg => "epsg",
        }
    }
}

impl AsRef<str> for Authority {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A spatial reference: a coordinate reference system identifier and the authority that issued it.
///
/// Two values are equal if both the identifier and the authority are equal. Deserialized values go through [`sr`],
/// so the authority is matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "SrFields")]
pub struct Sr {
    srid: i32,
    authority: Cow<'static, str>,
}

#[derive(Deserialize)]
struct SrFields {
    srid: i32,
    authority: String,
}

impl From<SrFields> for Sr {
    fn from(fields: SrFields) -> Self {
        sr(fields.srid, fields.authority)
    }
}

/// WGS-84 geographic coordinates (longitude and latitude in degrees).
pub const WGS_84: Sr = Sr::epsg(4326);

/// US National Atlas Equal Area projection.
pub const US_NATIONAL_ATLAS: Sr = Sr::epsg(2163);

/// Web Mercator projection.
pub const WEB_MERCATOR: Sr = Sr::epsg(3857);

impl Sr {
    /// Spatial reference issued by EPSG.
    pub const fn epsg(srid: i32) -> Self {
        Self {
            srid,
            authority: Cow::Borrowed(Authority::Epsg.as_str()),
        }
    }

    /// Spatial reference identifier.
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// Authority (lower case).
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Projection handle of the spatial reference.
    pub fn projection(&self) -> Result<std::sync::Arc<ProjectionHandle>> {
        projection_handle(self)
    }

    /// Returns true if the coordinates of the spatial reference are longitude and latitude in degrees.
    pub fn is_geographic(&self) -> bool {
        matches!(definition(self), Some(CrsDefinition::Geographic))
    }
}

impl Default for Sr {
    fn default() -> Self {
        WGS_84
    }
}

impl Display for Sr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.authority, self.srid)
    }
}

/// Latitude and longitude pair in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct LatLon {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl LatLon {
    /// Creates a new instance.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A spatial reference given either as a ready [`Sr`] or as a bare EPSG identifier.
///
/// Bare identifiers are resolved with [`by_srid`] and are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrRef {
    /// A spatial reference value.
    Sr(Sr),
    /// An EPSG identifier.
    Srid(i32),
}

impl SrRef {
    /// Resolves the reference to a canonical spatial reference.
    pub fn resolve(self) -> Result<Sr> {
        match self {
            SrRef::Sr(sr) => Ok(sr),
            SrRef::Srid(srid) => by_srid(srid, Authority::Epsg, true),
        }
    }
}

impl From<Sr> for SrRef {
    fn from(value: Sr) -> Self {
        Self::Sr(value)
    }
}

impl From<&Sr> for SrRef {
    fn from(value: &Sr) -> Self {
        Self::Sr(value.clone())
    }
}

impl From<i32> for SrRef {
    fn from(value: i32) -> Self {
        Self::Srid(value)
    }
}

type SrCache = RwLock<HashMap<(i32, String), Sr>>;

static SR_CACHE: OnceLock<SrCache> = OnceLock::new();

/// Returns the canonical spatial reference for the identifier and the authority.
///
/// The authority is case-insensitive. This function never checks that the spatial reference can be projected, use
/// [`by_srid`] for that.
pub fn sr(srid: i32, authority: impl AsRef<str>) -> Sr {
    let authority = authority.as_ref().to_ascii_lowercase();
    let cache = SR_CACHE.get_or_init(Default::default);

    let key = (srid, authority);
    if let Some(sr) = cache.read().get(&key) {
        return sr.clone();
    }

    let value = if key.1 == Authority::Epsg.as_str() {
        Sr::epsg(srid)
    } else {
        Sr {
            srid,
            authority: Cow::Owned(key.1.clone()),
        }
    };

    log::debug!("Interning spatial reference {value}");
    cache.write().entry(key).or_insert(value).clone()
}

/// Returns the spatial reference for the identifier and the authority.
///
/// If `validate` is true, the projection of the spatial reference is resolved eagerly, and
/// [`ShapeError::InvalidSr`](crate::ShapeError::InvalidSr) is returned if it cannot be.
pub fn by_srid(srid: i32, authority: impl AsRef<str>, validate: bool) -> Result<Sr> {
    let sr = sr(srid, authority);
    if validate {
        projection_handle(&sr)?;
    }

    Ok(sr)
}

/// Number (1 to 60) of the UTM zone that contains the longitude.
pub fn utm_zone_number(lon: f64) -> i32 {
    ((lon + 180.0) / 6.0).floor().rem_euclid(60.0) as i32 + 1
}

/// Spatial reference of the UTM zone that contains a geographic coordinate.
///
/// Northern hemisphere zones (`lat >= 0`) are EPSG:326xx, southern ones are EPSG:327xx.
pub fn utm_zone(lat: f64, lon: f64) -> Sr {
    let family = if lat >= 0.0 { 32600 } else { 32700 };
    sr(family + utm_zone_number(lon), Authority::Epsg)
}
