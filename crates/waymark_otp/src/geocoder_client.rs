use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use waymark_core::geometry::LatLon;

#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub const DEFAULT_REVERSE_GEOCODE_DISTANCE: f64 = 100.0;

pub struct GeocoderClientParams {
    pub geocoder_url: String,
    /// Search radius in meters
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReverseGeocode {
    pub address: String,
    pub city: Option<String>,
    pub location: LatLon,
}

#[derive(Deserialize)]
struct ReverseGeocodeResponse {
    address: Option<ReverseGeocodeAddress>,
    location: Option<ReverseGeocodeLocation>,
}

#[derive(Deserialize)]
struct ReverseGeocodeAddress {
    #[serde(rename = "Match_addr")]
    match_addr: Option<String>,
    #[serde(rename = "Address")]
    street: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
}

#[derive(Deserialize)]
struct ReverseGeocodeLocation {
    x: f64,
    y: f64,
}

pub struct GeocoderClient {
    params: GeocoderClientParams,
    client: reqwest::Client,
}

impl GeocoderClient {
    pub fn new(params: GeocoderClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Nearest address to `point`, `None` when the service has nothing within range.
    pub async fn reverse(&self, point: &LatLon) -> Result<Option<ReverseGeocode>, GeocoderError> {
        debug!("GeocoderClient: Reverse geocoding {}", point);

        let response = self
            .client
            .get(&self.params.geocoder_url)
            .query(&[
                ("location", point.to_lon_lat_string()),
                ("distance", self.params.distance.to_string()),
                ("f", String::from("pjson")),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GeocoderError::Api { status, message });
        }

        let body = response.text().await?;
        parse_reverse_geocode(&body, point)
    }
}

fn parse_reverse_geocode(body: &str, point: &LatLon) -> Result<Option<ReverseGeocode>, GeocoderError> {
    let response: ReverseGeocodeResponse = serde_json::from_str(body)?;

    let Some(address) = response.address else {
        return Ok(None);
    };
    let Some(label) = address.match_addr.or(address.street) else {
        return Ok(None);
    };

    let location = response
        .location
        .map_or(*point, |location| LatLon::new(location.y, location.x));

    Ok(Some(ReverseGeocode {
        address: label,
        city: address.city,
        location,
    }))
}
