use geojson::FeatureCollection;
use serde::Deserialize;
use serde_json::Value;
use waymark_core::routing::reachable::{Destination, Reachable};

use crate::error::OtpError;

#[derive(Deserialize, Debug)]
pub struct ReachableResponse {
    #[serde(default)]
    pub isochrone: Value,
    #[serde(default)]
    pub matched: Vec<Destination>,
}

impl ReachableResponse {
    pub fn into_reachable(self) -> Result<Reachable, OtpError> {
        Ok(Reachable {
            isochrone: parse_isochrone(self.isochrone)?,
            matched: self.matched,
        })
    }
}

/// The endpoint answers `{}` rather than an empty collection when nothing is reachable.
fn parse_isochrone(value: Value) -> Result<Option<FeatureCollection>, OtpError> {
    match &value {
        Value::Null => Ok(None),
        Value::Object(object) if object.is_empty() => Ok(None),
        _ => Ok(Some(serde_json::from_value(value)?)),
    }
}
