use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::{geometry::LatLon, waypoints::waypoint_editor::RouteEndpoints};

use super::trip_options::TripOptions;

/// The exact parameters of a trip plan request.
///
/// Kept on every itinerary so that a live update can replay the request with only the
/// waypoint list changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingParams {
    pub from: LatLon,
    pub to: LatLon,
    pub when: DateTime,
    pub options: TripOptions,
    pub waypoints: Vec<LatLon>,
}

impl RoutingParams {
    pub fn new(from: LatLon, to: LatLon, when: DateTime) -> Self {
        Self {
            from,
            to,
            when,
            options: TripOptions::default(),
            waypoints: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: TripOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<LatLon>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn endpoints(&self) -> RouteEndpoints {
        RouteEndpoints {
            origin: self.from,
            destination: self.to,
        }
    }

    /// Waypoints only apply to depart-at trips; the planner cannot honour them for arrive-by.
    pub fn effective_waypoints(&self) -> &[LatLon] {
        if self.options.arrive_by {
            &[]
        } else {
            &self.waypoints
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("fromPlace", self.from.to_string()),
            ("toPlace", self.to.to_string()),
            ("time", self.when.strftime("%I:%M%P").to_string()),
            ("date", self.when.strftime("%m-%d-%Y").to_string()),
        ];

        pairs.extend(self.options.query_pairs());

        for waypoint in self.effective_waypoints() {
            pairs.push(("intermediatePlaces", waypoint.to_string()));
        }

        pairs
    }
}
