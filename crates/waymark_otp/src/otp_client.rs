use tracing::debug;
use waymark_core::{
    error::RoutingError,
    routing::{
        isochrone_params::IsochroneParams,
        itinerary::Itinerary,
        planner::{IsochroneProvider, TripPlanner},
        reachable::Reachable,
        routing_params::RoutingParams,
    },
};

use crate::{
    error::OtpError, plan_response::PlanResponse, reachable_response::ReachableResponse,
};

pub const OTP_PLAN_API_PATH: &str = "/plan";

pub struct OtpClientParams {
    /// Router base, e.g. `http://localhost:8080/otp/routers/default`.
    pub otp_url: String,
    pub reachable_url: String,
}

pub struct OtpClient {
    params: OtpClientParams,
    client: reqwest::Client,
}

impl OtpClient {
    pub fn new(params: OtpClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_plan(&self, params: &RoutingParams) -> Result<Vec<Itinerary>, OtpError> {
        let mut url = self.params.otp_url.trim_end_matches('/').to_string();
        url.push_str(OTP_PLAN_API_PATH);

        debug!(
            "OtpClient: Planning {} -> {} with {} waypoints",
            params.from,
            params.to,
            params.effective_waypoints().len()
        );

        let body = self.get(&url, &params.query_pairs()).await?;
        let response: PlanResponse = serde_json::from_str(&body)?;

        response.into_itineraries(params)
    }

    pub async fn fetch_reachable(&self, params: &IsochroneParams) -> Result<Reachable, OtpError> {
        debug!(
            "OtpClient: Fetching travelshed from {} within {}s",
            params.from,
            params.cutoff_seconds()
        );

        let body = self
            .get(&self.params.reachable_url, &params.query_pairs())
            .await?;
        let response: ReachableResponse = serde_json::from_str(&body)?;

        response.into_reachable()
    }

    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, OtpError> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OtpError::Api { status, message });
        }

        Ok(response.text().await?)
    }
}

impl TripPlanner for OtpClient {
    async fn plan(&self, params: &RoutingParams) -> Result<Vec<Itinerary>, RoutingError> {
        Ok(self.fetch_plan(params).await?)
    }
}

impl IsochroneProvider for OtpClient {
    async fn reachable(&self, params: &IsochroneParams) -> Result<Reachable, RoutingError> {
        Ok(self.fetch_reachable(params).await?)
    }
}
