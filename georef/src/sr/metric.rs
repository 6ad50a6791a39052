use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Projections with meters as units that can be used for measuring and buffering geometries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricProjection {
    /// UTM zone containing the geometry.
    #[default]
    Utm,
    /// US National Atlas Equal Area.
    #[serde(rename = "us_naea")]
    UsNationalAtlas,
    /// Web Mercator.
    WebMercator,
}

impl Display for MetricProjection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MetricProjection::Utm => "utm",
            MetricProjection::UsNationalAtlas => "us_naea",
            MetricProjection::WebMercator => "web_mercator",
        };
        f.write_str(name)
    }
}

impl FromStr for MetricProjection {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utm" => Ok(MetricProjection::Utm),
            "us_naea" | "usm" => Ok(MetricProjection::UsNationalAtlas),
            "web_mercator" | "wm" => Ok(MetricProjection::WebMercator),
            _ => Err(ShapeError::UnsupportedMetricProjection(s.to_string())),
        }
    }
}
