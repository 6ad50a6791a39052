//! Export and import of spatially-referenced geometries.
//!
//! [`SrShape::export`] produces [`ExportData`]: the type tag of the variant, the GeoJSON mapping of the geometry and
//! the spatial reference. Loading it back gives a geometry equal to the exported one, with the same content hash:
//!
//! ```ignore
//! let data = serde_json::to_value(point.export())?;
//! let loaded = SrPoint::load(&data)?;
//! assert_eq!(loaded, Some(point));
//! ```
//!
//! Empty input (`null`, `{}` or `""`) loads as `None` rather than as an error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::engine;
use crate::error::{Result, ShapeError};
use crate::geometry::registry;
use crate::geometry::{
    SrGeometry, SrMultiPoint, SrMultiPolygon, SrMultiPolyline, SrPoint, SrPolygon, SrPolyline,
    SrShape, SrVariant,
};
use crate::sr::Sr;

/// Exported form of a geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    /// Type tag of the exported variant.
    #[serde(rename = "__type__")]
    pub type_tag: String,
    /// GeoJSON mapping of the geometry.
    pub base_geometry: geojson::Geometry,
    /// Spatial reference of the coordinates.
    pub sr: Sr,
}

impl ExportData {
    /// Parses the exported data. Returns `None` for empty input.
    ///
    /// Fails with [`ShapeError::MalformedExport`] if the value is not an object.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            Value::String(text) if text.is_empty() => Ok(None),
            Value::Object(_) => Ok(Some(serde_json::from_value(value.clone())?)),
            other => Err(ShapeError::MalformedExport(format!(
                "expected an object, got {other}"
            ))),
        }
    }

    /// Exported data as a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Base geometry described by the data.
    pub fn into_geometry(self) -> Result<SrGeometry> {
        let geometry = engine::from_mapping(self.base_geometry)?;
        Ok(SrGeometry::new(geometry, self.sr))
    }
}

/// Loading of exported data into a concrete variant.
///
/// Implemented for every [`SrVariant`].
pub trait Exportable: SrVariant {
    /// Loads the exported data as this variant. Returns `None` for empty input.
    ///
    /// Fails with [`ShapeError::WrongGeometryKind`](crate::ShapeError::WrongGeometryKind) if the exported geometry
    /// cannot be wrapped into this variant.
    fn load(value: &Value) -> Result<Option<Self>> {
        match ExportData::from_value(value)? {
            Some(data) => Ok(Some(Self::from_export(data)?)),
            None => Ok(None),
        }
    }

    /// Builds the variant from parsed exported data.
    fn from_export(data: ExportData) -> Result<Self> {
        if data.type_tag != Self::TYPE_TAG {
            log::debug!(
                "Loading data exported as {} into {}",
                data.type_tag,
                Self::TYPE_TAG
            );
        }

        Self::from_geometry(data.into_geometry()?)
    }
}

impl<T: SrVariant> Exportable for T {}

/// Loads the exported data into the variant named by its type tag. Returns `None` for empty input.
///
/// Data with a tag that is not registered is loaded into the variant registered for the kind of its geometry.
pub fn load_shape(value: &Value) -> Result<Option<Box<dyn SrShape>>> {
    let Some(data) = ExportData::from_value(value)? else {
        return Ok(None);
    };

    let constructor = registry::resolve_tag(&data.type_tag);
    let geometry = data.into_geometry()?;
    let shape = match constructor {
        Some(constructor) => constructor(geometry)?,
        None => registry::wrap(geometry)?,
    };

    Ok(Some(shape))
}

macro_rules! impl_serde {
    ($($name:ident),*) => {
        $(
            impl Serialize for $name {
                fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                    self.export().serialize(serializer)
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                    let data = ExportData::deserialize(deserializer)?;
                    Self::from_export(data).map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

impl_serde!(
    SrGeometry,
    SrPoint,
    SrPolyline,
    SrPolygon,
    SrMultiPoint,
    SrMultiPolyline,
    SrMultiPolygon
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sr::{WEB_MERCATOR, WGS_84};
    use assert_matches::assert_matches;
    use geo_types::{line_string, point, polygon, Line, MultiPolygon};
    use serde_json::json;

    fn minneapolis() -> SrPoint {
        SrPoint::from_lat_lon(45.553670, -94.142430)
    }

    #[test]
    fn export_layout() {
        let value = minneapolis().export().to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "__type__": "georef::SrPoint",
                "base_geometry": {"type": "Point", "coordinates": [-94.142430, 45.553670]},
                "sr": {"srid": 4326, "authority": "epsg"},
            })
        );
    }

    #[test]
    fn point_round_trip() {
        let point = minneapolis();
        let text = serde_json::to_string(&point.export()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        let loaded = SrPoint::load(&value).unwrap().unwrap();
        assert_eq!(loaded, point);
        assert_eq!(loaded.content_hash(), point.content_hash());
    }

    #[test]
    fn polymorphic_round_trip() {
        let shapes: Vec<Box<dyn SrShape>> = vec![
            Box::new(minneapolis()),
            Box::new(SrPolyline::new(
                line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
                WEB_MERCATOR,
            )),
            Box::new(SrPolygon::new(
                polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
                Sr::epsg(32615),
            )),
            Box::new(SrMultiPolygon::new(MultiPolygon::new(vec![]), WGS_84)),
            Box::new(SrGeometry::new(Line::new((0.0, 0.0), (1.0, 1.0)), WGS_84)),
        ];

        for shape in shapes {
            let value = shape.export().to_value().unwrap();
            let loaded = load_shape(&value).unwrap().unwrap();
            assert_eq!(loaded.type_tag(), shape.type_tag());
            assert!(*loaded == *shape, "{shape} did not survive export");
            assert_eq!(loaded.content_hash(), shape.content_hash());
        }
    }

    #[test]
    fn empty_input_loads_nothing() {
        for value in [Value::Null, json!({}), json!("")] {
            assert!(SrPoint::load(&value).unwrap().is_none());
            assert!(load_shape(&value).unwrap().is_none());
        }
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert_matches!(SrPoint::load(&json!({"foo": 1})), Err(ShapeError::Json(_)));
        assert_matches!(load_shape(&json!([1, 2])), Err(ShapeError::MalformedExport(_)));
        assert_matches!(SrPoint::load(&json!("georef::SrPoint")), Err(ShapeError::MalformedExport(_)));
        assert_matches!(
            load_shape(&json!({
                "__type__": "georef::SrPoint",
                "base_geometry": {"type": "Blob", "coordinates": [1.0, 2.0]},
                "sr": {"srid": 4326, "authority": "epsg"},
            })),
            Err(ShapeError::Json(_))
        );
    }

    #[test]
    fn unknown_tag_falls_back_to_kind() {
        let value = json!({
            "__type__": "elsewhere::Location",
            "base_geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
            "sr": {"srid": 3857, "authority": "EPSG"},
        });

        let loaded = load_shape(&value).unwrap().unwrap();
        assert!(loaded.is::<SrPoint>());
        assert_eq!(loaded.sr(), &WEB_MERCATOR);

        let typed = SrPoint::load(&value).unwrap().unwrap();
        assert_eq!(typed.sr(), &WEB_MERCATOR);
    }

    #[test]
    fn typed_load_checks_kind() {
        let value = SrPolyline::new(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)], WGS_84)
            .export()
            .to_value()
            .unwrap();

        assert_matches!(
            SrPoint::load(&value),
            Err(ShapeError::WrongGeometryKind { .. })
        );
        assert!(SrGeometry::load(&value).unwrap().is_some());
    }

    #[test]
    fn serde_embedding() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Site {
            name: String,
            location: SrPoint,
            area: Option<SrPolygon>,
        }

        let site = Site {
            name: "depot".to_string(),
            location: SrPoint::new(point!(x: 1.0, y: 2.0), WEB_MERCATOR),
            area: None,
        };

        let text = serde_json::to_string(&site).unwrap();
        let parsed: Site = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, site);
    }
}
