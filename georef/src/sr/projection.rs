use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};

use geo_types::{coord, Coord};
use geodesy::prelude::*;
use parking_lot::RwLock;

use crate::error::{Result, ShapeError};
use crate::sr::definitions::{definition, CrsDefinition};
use crate::sr::Sr;

struct GeodesyOp {
    context: Minimal,
    op: OpHandle,
}

impl GeodesyOp {
    fn new(sr: &Sr, definition: &str) -> Result<Self> {
        let mut context = Minimal::new();
        let op = context.op(definition).map_err(|err| ShapeError::InvalidSr {
            sr: sr.clone(),
            message: format!("projection engine rejected definition '{definition}'"),
            source: Some(Box::new(err)),
        })?;

        Ok(Self { context, op })
    }

    // Pipelines with datum shifts pass through three-dimensional cartesian coordinates, so the operands always
    // carry a height.
    fn project(&self, lon: f64, lat: f64) -> Option<Coord> {
        let mut data = [Coor4D::geo(lat, lon, 0.0, 0.0)];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        finite(data[0].0[0], data[0].0[1])
    }

    fn unproject(&self, x: f64, y: f64) -> Option<Coord> {
        let mut data = [Coor4D([x, y, 0.0, 0.0])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        finite(data[0].0[0].to_degrees(), data[0].0[1].to_degrees())
    }
}

fn finite(x: f64, y: f64) -> Option<Coord> {
    if x.is_finite() && y.is_finite() {
        Some(coord! { x: x, y: y })
    } else {
        None
    }
}

/// Projection of one spatial reference.
///
/// The handle converts coordinates between the spatial reference and geographic longitude/latitude in degrees.
/// For geographic spatial references both directions are identity.
pub struct ProjectionHandle {
    sr: Sr,
    definition: CrsDefinition,
    op: Option<GeodesyOp>,
}

impl ProjectionHandle {
    fn new(sr: &Sr) -> Result<Self> {
        let definition = definition(sr)
            .ok_or_else(|| ShapeError::invalid_sr(sr, "no projection is defined"))?;
        let op = match &definition {
            CrsDefinition::Geographic => None,
            CrsDefinition::Projected(definition) => Some(GeodesyOp::new(sr, definition)?),
        };

        Ok(Self {
            sr: sr.clone(),
            definition,
            op,
        })
    }

    /// Spatial reference of the projection.
    pub fn sr(&self) -> &Sr {
        &self.sr
    }

    /// Definition the projection was built from.
    pub fn definition(&self) -> &CrsDefinition {
        &self.definition
    }

    /// Projects a geographic coordinate (`x` is longitude, `y` is latitude) into the spatial reference.
    ///
    /// Returns `None` if the coordinate is outside of the projection domain.
    pub fn project(&self, geographic: Coord) -> Option<Coord> {
        match &self.op {
            Some(op) => op.project(geographic.x, geographic.y),
            None => finite(geographic.x, geographic.y),
        }
    }

    /// Converts a coordinate in the spatial reference into a geographic one (`x` is longitude, `y` is latitude).
    pub fn unproject(&self, projected: Coord) -> Option<Coord> {
        match &self.op {
            Some(op) => op.unproject(projected.x, projected.y),
            None => finite(projected.x, projected.y),
        }
    }
}

impl Debug for ProjectionHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionHandle")
            .field("sr", &self.sr)
            .field("definition", &self.definition)
            .finish()
    }
}

static HANDLES: OnceLock<RwLock<HashMap<Sr, Arc<ProjectionHandle>>>> = OnceLock::new();

/// Returns the projection of the spatial reference.
///
/// Projections are constructed once per spatial reference and cached for the lifetime of the process. A spatial
/// reference without a resolvable projection results in [`ShapeError::InvalidSr`], which is not cached.
pub fn projection_handle(sr: &Sr) -> Result<Arc<ProjectionHandle>> {
    let handles = HANDLES.get_or_init(Default::default);
    if let Some(handle) = handles.read().get(sr) {
        return Ok(handle.clone());
    }

    let handle = Arc::new(ProjectionHandle::new(sr)?);
    log::debug!("Created projection for {sr}: {:?}", handle.definition());

    Ok(handles.write().entry(sr.clone()).or_insert(handle).clone())
}
