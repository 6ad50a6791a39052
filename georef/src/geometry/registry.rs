//! Registry of geometry variants.
//!
//! The registry maps the structural kind of a planar geometry to the constructor of the variant that wraps it, and
//! the type tag of every variant to its constructor. [`sr_shape`](super::sr_shape), [`SrShape::transform`] and
//! [`load_shape`](crate::xchg::load_shape) resolve variants only through this table, so a new variant becomes
//! available everywhere by registering it:
//!
//! ```ignore
//! georef::geometry::registry::register_variant::<MyCollection>();
//! ```
//!
//! Kinds without a registered variant are wrapped into the base [`SrGeometry`].

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use super::{
    GeometryKind, SrGeometry, SrMultiPoint, SrMultiPolygon, SrMultiPolyline, SrPoint, SrPolygon,
    SrPolyline, SrShape, SrVariant,
};
use crate::error::Result;

/// Function wrapping a base geometry into a variant.
pub type ShapeConstructor = fn(SrGeometry) -> Result<Box<dyn SrShape>>;

fn construct<T: SrVariant>(geometry: SrGeometry) -> Result<Box<dyn SrShape>> {
    Ok(Box::new(T::from_geometry(geometry)?))
}

#[derive(Default)]
struct VariantRegistry {
    by_kind: HashMap<GeometryKind, ShapeConstructor>,
    by_tag: HashMap<String, ShapeConstructor>,
}

impl VariantRegistry {
    fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.insert::<SrGeometry>();
        registry.insert::<SrPoint>();
        registry.insert::<SrPolyline>();
        registry.insert::<SrPolygon>();
        registry.insert::<SrMultiPoint>();
        registry.insert::<SrMultiPolyline>();
        registry.insert::<SrMultiPolygon>();

        registry
    }

    fn insert<T: SrVariant>(&mut self) {
        if let Some(kind) = T::KIND {
            self.by_kind.insert(kind, construct::<T>);
        }

        self.by_tag.insert(T::TYPE_TAG.to_string(), construct::<T>);
    }
}

static REGISTRY: OnceLock<RwLock<VariantRegistry>> = OnceLock::new();

fn registry() -> &'static RwLock<VariantRegistry> {
    REGISTRY.get_or_init(|| RwLock::new(VariantRegistry::with_defaults()))
}

/// Sets the constructor used for geometries of the given kind. Returns the constructor it replaces.
pub fn register(kind: GeometryKind, constructor: ShapeConstructor) -> Option<ShapeConstructor> {
    let previous = registry().write().by_kind.insert(kind, constructor);
    if previous.is_some() {
        log::warn!("Replaced geometry variant registered for {kind}");
    }

    previous
}

/// Sets the constructor used when loading exported data with the given type tag. Returns the constructor it
/// replaces.
pub fn register_type(tag: impl Into<String>, constructor: ShapeConstructor) -> Option<ShapeConstructor> {
    let tag = tag.into();
    let previous = registry().write().by_tag.insert(tag.clone(), constructor);
    if previous.is_some() {
        log::warn!("Replaced geometry variant registered for type tag {tag}");
    }

    previous
}

/// Registers the variant both for its kind (if it has one) and for its type tag.
pub fn register_variant<T: SrVariant>() {
    if let Some(kind) = T::KIND {
        register(kind, construct::<T>);
    }

    register_type(T::TYPE_TAG, construct::<T>);
}

/// Constructor for the geometries of the given kind. Falls back to the base [`SrGeometry`].
pub fn resolve(kind: GeometryKind) -> ShapeConstructor {
    registry()
        .read()
        .by_kind
        .get(&kind)
        .copied()
        .unwrap_or(construct::<SrGeometry>)
}

/// Constructor registered for the type tag, if any.
pub fn resolve_tag(tag: &str) -> Option<ShapeConstructor> {
    registry().read().by_tag.get(tag).copied()
}

/// Wraps the geometry into the variant registered for its kind.
pub fn wrap(geometry: SrGeometry) -> Result<Box<dyn SrShape>> {
    let constructor = resolve(geometry.kind());
    constructor(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::sr_shape;
    use crate::sr::WGS_84;
    use crate::xchg::load_shape;
    use geo_types::{point, Geometry, GeometryCollection, LineString};
    use std::any::Any;
    use std::fmt::{Display, Formatter};

    /// Collection of geometries of any kind.
    #[derive(Debug, Clone, PartialEq)]
    struct SrCollection(SrGeometry);

    impl SrCollection {
        fn len(&self) -> usize {
            match self.0.base_geometry() {
                Geometry::GeometryCollection(collection) => collection.len(),
                _ => 0,
            }
        }
    }

    impl Display for SrCollection {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            self.0.fmt_named(f, "SrCollection")
        }
    }

    impl SrShape for SrCollection {
        fn geometry(&self) -> &SrGeometry {
            &self.0
        }

        fn type_tag(&self) -> &'static str {
            Self::TYPE_TAG
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn clone_shape(&self) -> Box<dyn SrShape> {
            Box::new(self.clone())
        }
    }

    impl SrVariant for SrCollection {
        const TYPE_TAG: &'static str = "tests::SrCollection";
        const KIND: Option<GeometryKind> = Some(GeometryKind::GeometryCollection);

        fn from_geometry(geometry: SrGeometry) -> Result<Self> {
            Ok(Self(geometry))
        }

        fn into_geometry(self) -> SrGeometry {
            self.0
        }
    }

    fn collection() -> GeometryCollection {
        GeometryCollection(vec![
            point!(x: 1.0, y: 2.0).into(),
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]).into(),
        ])
    }

    #[test]
    fn default_variants() {
        assert!(resolve_tag(SrPoint::TYPE_TAG).is_some());
        assert!(resolve_tag(SrGeometry::TYPE_TAG).is_some());
        assert!(resolve_tag("georef::SrUnknown").is_none());

        let point = resolve(GeometryKind::Point)(SrGeometry::new(point!(x: 1.0, y: 2.0), WGS_84)).unwrap();
        assert!(point.is::<SrPoint>());
    }

    #[test]
    fn unregistered_kind_resolves_to_base() {
        let rect = geo_types::Rect::new((0.0, 0.0), (1.0, 1.0));
        let shape = wrap(SrGeometry::new(rect, WGS_84)).unwrap();
        assert!(shape.is::<SrGeometry>());
    }

    #[test]
    fn custom_variant_extends_dispatch() {
        register_variant::<SrCollection>();

        let shape = sr_shape(collection(), WGS_84).unwrap();
        let custom = shape.downcast_ref::<SrCollection>().unwrap();
        assert_eq!(custom.len(), 2);

        let value = serde_json::to_value(shape.export()).unwrap();
        let loaded = load_shape(&value).unwrap().unwrap();
        assert!(loaded.is::<SrCollection>());
        assert!(*loaded == *shape);

        // Existing variants are not affected.
        assert!(sr_shape(point!(x: 1.0, y: 2.0), WGS_84).unwrap().is::<SrPoint>());
    }
}
