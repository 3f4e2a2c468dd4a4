use thiserror::Error;
use waymark_core::error::RoutingError;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Planner error {id}: {message}")]
    Plan { id: i64, message: String },

    #[error("Planner returned no itineraries")]
    NoItineraries,

    #[error("Incomplete response")]
    IncompleteResponse,

    #[error("Invalid leg geometry: {0}")]
    Polyline(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] jiff::Error),
}

impl From<OtpError> for RoutingError {
    fn from(error: OtpError) -> Self {
        match error {
            OtpError::Plan { message, .. } => RoutingError::NoRouteFound(message),
            OtpError::NoItineraries => {
                RoutingError::NoRouteFound(String::from("no itineraries returned"))
            }
            other => RoutingError::BackendUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_errors_mean_no_route() {
        let error = OtpError::Plan {
            id: 404,
            message: String::from("PATH_NOT_FOUND"),
        };
        assert_eq!(
            RoutingError::from(error),
            RoutingError::NoRouteFound(String::from("PATH_NOT_FOUND"))
        );

        let error = OtpError::Api {
            status: 502,
            message: String::from("Bad Gateway"),
        };
        assert!(matches!(
            RoutingError::from(error),
            RoutingError::BackendUnavailable(_)
        ));
    }
}
