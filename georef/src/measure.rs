//! Linear distance units and dimension-aware conversion between them.
//!
//! Areas and volumes are converted by reducing the quantity to the length of one side, converting that length and
//! raising the result back to the original dimension. Multiplying an area by a linear factor would count the scale
//! only once instead of twice.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};

/// Common distance units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    /// Meters.
    #[default]
    Meters,
    /// Kilometers.
    Kilometers,
    /// International feet.
    Feet,
    /// International statute miles.
    Miles,
    /// International nautical miles.
    NauticalMiles,
}

impl Units {
    /// How many meters one unit is.
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            Units::Meters => 1.0,
            Units::Kilometers => 1000.0,
            Units::Feet => 0.3048,
            Units::Miles => 1609.344,
            Units::NauticalMiles => 1852.0,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Units::Meters => "meters",
            Units::Kilometers => "kilometers",
            Units::Feet => "feet",
            Units::Miles => "miles",
            Units::NauticalMiles => "nautical_miles",
        }
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown unit name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown units: {0}")]
pub struct UnknownUnits(pub String);

impl FromStr for Units {
    type Err = UnknownUnits;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(Units::Meters),
            "km" | "kilometer" | "kilometers" => Ok(Units::Kilometers),
            "ft" | "foot" | "feet" => Ok(Units::Feet),
            "mi" | "mile" | "miles" => Ok(Units::Miles),
            "nmi" | "nautical_mile" | "nautical_miles" => Ok(Units::NauticalMiles),
            _ => Err(UnknownUnits(s.to_string())),
        }
    }
}

fn check_dimension(dimension: i32) -> Result<()> {
    if (1..=3).contains(&dimension) {
        Ok(())
    } else {
        Err(ShapeError::InvalidDimension(dimension))
    }
}

/// Converts a quantity expressed in `units` to meters (square meters for `dimension == 2`, cubic meters for
/// `dimension == 3`).
pub fn to_meters(n: f64, units: Units, dimension: i32) -> Result<f64> {
    check_dimension(dimension)?;
    Ok(n * units.meters_per_unit().powi(dimension))
}

/// Converts a quantity from one unit to another.
///
/// `dimension` is `1` for lengths, `2` for areas and `3` for volumes. If both units are the same, `n` is returned
/// as is, whatever the dimension.
pub fn convert(n: f64, from: Units, to: Units, dimension: i32) -> Result<f64> {
    if from == to {
        return Ok(n);
    }

    check_dimension(dimension)?;

    // Negative quantities keep their sign.
    let side = if dimension == 1 {
        n.abs()
    } else {
        n.abs().powf(1.0 / dimension as f64)
    };
    let side = side * from.meters_per_unit() / to.meters_per_unit();

    Ok(n.signum() * side.powi(dimension))
}
