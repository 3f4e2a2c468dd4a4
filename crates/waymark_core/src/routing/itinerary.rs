use std::sync::atomic::{AtomicU64, Ordering};

use geo::BoundingRect;
use geo_types::{LineString, Rect, coord};
use jiff::Timestamp;
use serde::Serialize;

use crate::geometry::LatLon;

use super::{
    routing_params::RoutingParams, travel_mode::TravelMode, trip_options::METERS_PER_MILE,
};

/// Position of an itinerary within the plan response that produced it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ItineraryId(usize);

impl ItineraryId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for ItineraryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the map layer drawn for one particular itinerary instance.
///
/// A live update produces a new itinerary with the same `ItineraryId` but a fresh
/// `LayerId`, so stale layers can be removed precisely.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

impl LayerId {
    pub fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Place {
    pub name: Option<String>,
    pub location: LatLon,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Step {
    pub street_name: String,
    /// Meters
    pub distance: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Leg {
    pub mode: TravelMode,
    pub from: Place,
    pub to: Place,
    pub geometry: LineString<f64>,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub route: Option<String>,
    pub steps: Vec<Step>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub id: ItineraryId,
    pub layer_id: LayerId,
    pub legs: Vec<Leg>,
    pub from: Place,
    pub to: Place,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Seconds
    pub duration: f64,
    pub waypoints: Vec<LatLon>,
    pub routing_params: RoutingParams,
}

impl Itinerary {
    pub fn new(
        id: ItineraryId,
        legs: Vec<Leg>,
        start_time: Timestamp,
        end_time: Timestamp,
        duration: f64,
        routing_params: RoutingParams,
    ) -> Self {
        let from = legs.first().map_or_else(
            || Place {
                name: None,
                location: routing_params.from,
            },
            |leg| leg.from.clone(),
        );
        let to = legs.last().map_or_else(
            || Place {
                name: None,
                location: routing_params.to,
            },
            |leg| leg.to.clone(),
        );

        Self {
            id,
            layer_id: LayerId::next(),
            legs,
            from,
            to,
            start_time,
            end_time,
            duration,
            waypoints: routing_params.effective_waypoints().to_vec(),
            routing_params,
        }
    }

    /// Unique modes in the order they are first used.
    pub fn modes(&self) -> Vec<TravelMode> {
        let mut modes: Vec<TravelMode> = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            if !modes.contains(&leg.mode) {
                modes.push(leg.mode);
            }
        }
        modes
    }

    pub fn distance_miles(&self) -> f64 {
        let meters: f64 = self.legs.iter().map(|leg| leg.distance).sum();
        ((meters / METERS_PER_MILE) * 100.0).round() / 100.0
    }

    pub fn duration_minutes(&self) -> u64 {
        (self.duration / 60.0) as u64
    }

    /// Street name of the longest step, used to label the itinerary.
    pub fn via(&self) -> Option<&str> {
        self.legs
            .iter()
            .flat_map(|leg| leg.steps.iter())
            .max_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|step| step.street_name.as_str())
    }

    /// Bounds of the drawn route, padded on each side by `buffer_ratio` of its size.
    pub fn bounds(&self, buffer_ratio: f64) -> Rect<f64> {
        let mut coords: Vec<geo_types::Coord<f64>> = vec![
            geo::Point::from(self.from.location).into(),
            geo::Point::from(self.to.location).into(),
        ];
        coords.extend(self.legs.iter().flat_map(|leg| leg.geometry.coords().copied()));

        let rect = LineString::new(coords)
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 }));

        let pad_x = rect.width() * buffer_ratio;
        let pad_y = rect.height() * buffer_ratio;

        Rect::new(
            coord! { x: rect.min().x - pad_x, y: rect.min().y - pad_y },
            coord! { x: rect.max().x + pad_x, y: rect.max().y + pad_y },
        )
    }

    /// Copy of this itinerary whose request replays with a different waypoint list.
    pub fn with_requested_waypoints(&self, waypoints: Vec<LatLon>) -> Self {
        let mut itinerary = self.clone();
        itinerary.routing_params.waypoints = waypoints;
        itinerary
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_summaries() {
        let itinerary = test_utils::create_itinerary(
            0,
            vec![
                test_utils::create_leg(TravelMode::Walk, (0.0, 0.0), (0.0, 0.01), 500.0),
                test_utils::create_leg(TravelMode::Bus, (0.0, 0.01), (0.0, 0.05), 4000.0),
                test_utils::create_leg(TravelMode::Walk, (0.0, 0.05), (0.0, 0.06), 312.0),
            ],
            vec![],
        );

        assert_eq!(itinerary.modes(), vec![TravelMode::Walk, TravelMode::Bus]);
        assert_eq!(itinerary.distance_miles(), 2.99);
        assert_eq!(itinerary.from.location, LatLon::new(0.0, 0.0));
        assert_eq!(itinerary.to.location, LatLon::new(0.0, 0.06));
        assert_eq!(itinerary.via(), Some("Bus leg street"));
    }

    #[test]
    fn every_instance_gets_its_own_layer() {
        let first = test_utils::create_itinerary(0, vec![], vec![]);
        let second = test_utils::create_itinerary(0, vec![], vec![]);

        assert_eq!(first.id, second.id);
        assert_ne!(first.layer_id, second.layer_id);
    }

    #[test]
    fn bounds_include_padding() {
        let itinerary = test_utils::create_itinerary(
            0,
            vec![test_utils::create_leg(
                TravelMode::Walk,
                (0.0, 0.0),
                (1.0, 2.0),
                100.0,
            )],
            vec![],
        );

        let bounds = itinerary.bounds(0.5);

        assert_eq!(bounds.min().x, -1.0);
        assert_eq!(bounds.max().y, 1.5);
    }
}
