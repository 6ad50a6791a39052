use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::error::{Result, ShapeError};
use crate::sr::{Authority, Sr};

/// Definition of a coordinate reference system as understood by the projection engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CrsDefinition {
    /// Longitude and latitude in degrees. Geographic references on datums other than WGS-84 are treated as WGS-84.
    Geographic,
    /// Projected coordinates, given as a `geodesy` operator definition, e.g. `utm zone=32`.
    Projected(Cow<'static, str>),
}

impl CrsDefinition {
    /// Creates a projected definition.
    pub fn projected(definition: impl Into<Cow<'static, str>>) -> Self {
        Self::Projected(definition.into())
    }
}

const LAEA_US_NATIONAL_ATLAS: &str = "laea lat_0=45 lon_0=-100 ellps=clrk66";
const LAEA_EUROPE: &str = "laea lat_0=52 lon_0=10 x_0=4321000 y_0=3210000 ellps=GRS80";
const BRITISH_NATIONAL_GRID: &str = "cart ellps=WGS84 \
    | helmert x=-446.448 y=125.157 z=-542.060 rx=-0.1502 ry=-0.2470 rz=-0.8421 s=20.4894 convention=position_vector \
    | cart inv ellps=airy \
    | tmerc lat_0=49 lon_0=-2 k_0=0.9996012717 x_0=400000 y_0=-100000 ellps=airy";

fn builtin(sr: &Sr) -> Option<CrsDefinition> {
    if sr.authority() != Authority::Epsg.as_str() {
        return None;
    }

    let definition = match sr.srid() {
        // WGS 84, NAD83, ETRS89
        4326 | 4269 | 4258 => CrsDefinition::Geographic,
        3857 | 900913 => CrsDefinition::projected("webmerc"),
        3395 => CrsDefinition::projected("merc ellps=WGS84"),
        2163 | 9311 => CrsDefinition::projected(LAEA_US_NATIONAL_ATLAS),
        3035 => CrsDefinition::projected(LAEA_EUROPE),
        27700 => CrsDefinition::projected(BRITISH_NATIONAL_GRID),
        // NAD83 and ETRS89 UTM zones.
        srid @ 26901..=26923 => {
            CrsDefinition::projected(format!("utm zone={} ellps=GRS80", srid - 26900))
        }
        srid @ 25828..=25838 => {
            CrsDefinition::projected(format!("utm zone={} ellps=GRS80", srid - 25800))
        }
        srid @ 32601..=32660 => {
            CrsDefinition::projected(format!("utm zone={} ellps=WGS84", srid - 32600))
        }
        srid @ 32701..=32760 => {
            CrsDefinition::projected(format!("utm zone={} south ellps=WGS84", srid - 32700))
        }
        _ => return None,
    };

    Some(definition)
}

static REGISTERED: OnceLock<RwLock<HashMap<Sr, CrsDefinition>>> = OnceLock::new();

fn registered() -> &'static RwLock<HashMap<Sr, CrsDefinition>> {
    REGISTERED.get_or_init(Default::default)
}

/// Returns the definition of the spatial reference, if one is known.
pub fn definition(sr: &Sr) -> Option<CrsDefinition> {
    builtin(sr).or_else(|| registered().read().get(sr).cloned())
}

/// Makes a spatial reference that has no built-in definition resolvable.
///
/// A spatial reference can be defined only once: a second definition would leave already cached projection
/// handles inconsistent with it, so it is rejected with [`ShapeError::DefinitionConflict`].
pub fn register_definition(sr: &Sr, definition: CrsDefinition) -> Result<()> {
    if builtin(sr).is_some() {
        return Err(ShapeError::DefinitionConflict(sr.clone()));
    }

    let mut registered = registered().write();
    if registered.contains_key(sr) {
        return Err(ShapeError::DefinitionConflict(sr.clone()));
    }

    log::debug!("Registering definition {definition:?} for {sr}");
    registered.insert(sr.clone(), definition);

    Ok(())
}
