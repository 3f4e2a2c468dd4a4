use std::time::Duration;

use anyhow::Context;
use waymark_core::coordinator::request_coordinator::{CoordinatorParams, DEFAULT_REQUEST_TIMEOUT};

pub const OTP_URL_ENV_VAR: &str = "WAYMARK_OTP_URL";
pub const REACHABLE_URL_ENV_VAR: &str = "WAYMARK_REACHABLE_URL";
pub const GEOCODER_URL_ENV_VAR: &str = "WAYMARK_GEOCODER_URL";
pub const REQUEST_TIMEOUT_ENV_VAR: &str = "WAYMARK_REQUEST_TIMEOUT_SECS";

const DEFAULT_OTP_URL: &str = "http://localhost:8080/otp/routers/default";
const DEFAULT_REACHABLE_URL: &str = "http://localhost:8080/map/reachable";
const DEFAULT_GEOCODER_URL: &str =
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/reverseGeocode";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub otp_url: String,
    pub reachable_url: String,
    pub geocoder_url: String,
    pub request_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let request_timeout = match lookup(REQUEST_TIMEOUT_ENV_VAR) {
            Some(seconds) => Duration::from_secs(
                seconds
                    .trim()
                    .parse()
                    .with_context(|| format!("{REQUEST_TIMEOUT_ENV_VAR} must be whole seconds"))?,
            ),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            otp_url: lookup(OTP_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_OTP_URL.to_string()),
            reachable_url: lookup(REACHABLE_URL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_REACHABLE_URL.to_string()),
            geocoder_url: lookup(GEOCODER_URL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            request_timeout,
        })
    }

    pub fn coordinator_params(&self) -> CoordinatorParams {
        CoordinatorParams {
            request_timeout: self.request_timeout,
            ..CoordinatorParams::default()
        }
    }
}
