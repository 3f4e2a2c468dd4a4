use geojson::{FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::geometry::LatLon;

/// A point of interest inside the travelshed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: JsonValue,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub point: Option<Geometry>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Destination {
    pub fn location(&self) -> Option<LatLon> {
        match &self.point.as_ref()?.value {
            Value::Point(position) if position.len() >= 2 => {
                Some(LatLon::new(position[1], position[0]))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reachable {
    /// `None` when nothing is reachable within the cutoff.
    pub isochrone: Option<FeatureCollection>,
    pub matched: Vec<Destination>,
}
