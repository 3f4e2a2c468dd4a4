use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RoutingError {
    #[error("Routing backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("No route found: {0}")]
    NoRouteFound(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl RoutingError {
    /// Message suitable for showing in place of the itinerary list.
    pub fn user_message(&self) -> &'static str {
        match self {
            RoutingError::BackendUnavailable(_) | RoutingError::Timeout(_) => {
                "The trip planner is unavailable right now. Please try again."
            }
            RoutingError::NoRouteFound(_) => "Could not find a route between these locations.",
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Waypoint index {index} out of range for {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No itinerary accepts waypoint edits")]
    NoFocusedItinerary,

    #[error("Waypoints are locked until the edited route is planned")]
    ReplanPending,

    #[error("A waypoint is being dragged")]
    GestureInProgress,
}
