use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use geo_types::Coord;
use parking_lot::RwLock;

use crate::error::{Result, ShapeError};
use crate::sr::projection::{projection_handle, ProjectionHandle};
use crate::sr::Sr;

/// Function that maps coordinates from one spatial reference to another.
///
/// The mapping goes through geographic coordinates: the source projection is inverted and the target one applied.
#[derive(Debug, Clone)]
pub struct TransformFn {
    from: Arc<ProjectionHandle>,
    to: Arc<ProjectionHandle>,
}

impl TransformFn {
    /// Source spatial reference.
    pub fn from_sr(&self) -> &Sr {
        self.from.sr()
    }

    /// Target spatial reference.
    pub fn to_sr(&self) -> &Sr {
        self.to.sr()
    }

    /// Maps one coordinate.
    pub fn apply(&self, coord: Coord) -> Result<Coord> {
        let failed = || ShapeError::ProjectionFailed {
            from: self.from_sr().clone(),
            to: self.to_sr().clone(),
            x: coord.x,
            y: coord.y,
        };

        let geographic = self.from.unproject(coord).ok_or_else(failed)?;
        self.to.project(geographic).ok_or_else(failed)
    }
}

type TransformCache = RwLock<HashMap<(Sr, Sr), Arc<TransformFn>>>;

static TRANSFORMS: OnceLock<TransformCache> = OnceLock::new();

/// Returns the function transforming coordinates from `from` to `to`.
///
/// Functions are cached per ordered pair, so `(a, b)` and `(b, a)` are separate entries. There is no point in
/// requesting a function for `from == to`; callers are expected to skip the transformation instead.
pub fn transform_fn(from: &Sr, to: &Sr) -> Result<Arc<TransformFn>> {
    let transforms = TRANSFORMS.get_or_init(Default::default);
    let key = (from.clone(), to.clone());
    if let Some(transform) = transforms.read().get(&key) {
        return Ok(transform.clone());
    }

    let transform = Arc::new(TransformFn {
        from: projection_handle(from)?,
        to: projection_handle(to)?,
    });
    log::debug!("Created transformation from {from} to {to}");

    Ok(transforms.write().entry(key).or_insert(transform).clone())
}
