use std::{collections::VecDeque, fmt::Debug, sync::Arc};

use futures::FutureExt;
use geo_types::LineString;
use geojson::{FeatureCollection, Geometry, Value};
use jiff::{Timestamp, civil::date};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::{
    coordinator::latest_wins_queue::FetchFn,
    error::RoutingError,
    geometry::LatLon,
    map_view::MapView,
    routing::{
        isochrone_params::IsochroneParams,
        itinerary::{Itinerary, ItineraryId, LayerId, Leg, Place, Step},
        planner::{IsochroneProvider, TripPlanner},
        reachable::{Destination, Reachable},
        routing_params::RoutingParams,
        travel_mode::TravelMode,
    },
};

const DEPARTURE_SECONDS: i64 = 1_421_843_400;

/// Leg with straight line geometry, travelled at one metre per second.
pub fn create_leg(mode: TravelMode, from: (f64, f64), to: (f64, f64), distance: f64) -> Leg {
    let start_time = Timestamp::from_second(DEPARTURE_SECONDS).unwrap();
    let end_time = Timestamp::from_second(DEPARTURE_SECONDS + distance as i64).unwrap();

    Leg {
        mode,
        from: Place {
            name: None,
            location: LatLon::new(from.0, from.1),
        },
        to: Place {
            name: None,
            location: LatLon::new(to.0, to.1),
        },
        geometry: LineString::from(vec![(from.1, from.0), (to.1, to.0)]),
        distance,
        duration: distance,
        start_time,
        end_time,
        route: None,
        steps: vec![Step {
            street_name: format!("{mode:?} leg street"),
            distance,
        }],
    }
}

pub fn create_itinerary(id: usize, legs: Vec<Leg>, waypoints: Vec<LatLon>) -> Itinerary {
    let from = legs
        .first()
        .map_or(LatLon::new(0.0, 0.0), |leg| leg.from.location);
    let to = legs
        .last()
        .map_or(LatLon::new(0.0, 10.0), |leg| leg.to.location);
    let params =
        RoutingParams::new(from, to, date(2015, 1, 21).at(7, 30, 0, 0)).with_waypoints(waypoints);

    itinerary_for(id, legs, params)
}

fn itinerary_for(id: usize, legs: Vec<Leg>, params: RoutingParams) -> Itinerary {
    let duration: f64 = legs.iter().map(|leg| leg.duration).sum();
    let start_time = Timestamp::from_second(DEPARTURE_SECONDS).unwrap();
    let end_time = Timestamp::from_second(DEPARTURE_SECONDS + duration as i64).unwrap();

    Itinerary::new(
        ItineraryId::new(id),
        legs,
        start_time,
        end_time,
        duration,
        params,
    )
}

pub fn create_destination(id: u64, name: &str, location: LatLon) -> Destination {
    Destination {
        id: serde_json::Value::from(id),
        name: name.to_string(),
        description: None,
        website_url: None,
        point: Some(Geometry::new(Value::Point(vec![location.lon, location.lat]))),
        extra: serde_json::Map::new(),
    }
}

/// Lets everything that can make progress run before continuing.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
}

/// A fetch function whose calls only complete when the test releases them.
pub struct Gate<P, R> {
    dispatched: Arc<Mutex<Vec<P>>>,
    waiting: Arc<Mutex<Vec<(P, oneshot::Sender<Result<R, RoutingError>>)>>>,
}

impl<P, R> Gate<P, R>
where
    P: Clone + PartialEq + Debug + Send + 'static,
    R: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            dispatched: Arc::new(Mutex::new(Vec::new())),
            waiting: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fetch_fn(&self) -> FetchFn<P, R> {
        let dispatched = Arc::clone(&self.dispatched);
        let waiting = Arc::clone(&self.waiting);

        Arc::new(move |params: P| {
            let (sender, receiver) = oneshot::channel();
            dispatched.lock().push(params.clone());
            waiting.lock().push((params, sender));

            async move {
                receiver.await.unwrap_or_else(|_| {
                    Err(RoutingError::BackendUnavailable(String::from("gate dropped")))
                })
            }
            .boxed()
        })
    }

    /// Every params value fetched so far, in dispatch order.
    pub fn dispatched(&self) -> Vec<P> {
        self.dispatched.lock().clone()
    }

    pub fn release(&self, params: &P, result: Result<R, RoutingError>) {
        let mut waiting = self.waiting.lock();
        let position = waiting
            .iter()
            .position(|(waiting_params, _)| waiting_params == params)
            .unwrap_or_else(|| panic!("{params:?} was never dispatched"));
        let (_, sender) = waiting.remove(position);
        let _ = sender.send(result);
    }
}

/// Answers every plan with walking itineraries that honour the requested waypoints,
/// unless a failure was queued. Only one itinerary unless alternatives are offered.
#[derive(Default)]
pub struct FakePlanner {
    requests: Mutex<Vec<RoutingParams>>,
    failures: Mutex<VecDeque<RoutingError>>,
    alternatives: Mutex<usize>,
}

impl FakePlanner {
    pub fn offer_alternatives(&self, count: usize) {
        *self.alternatives.lock() = count;
    }

    pub fn fail_next(&self, error: RoutingError) {
        self.failures.lock().push_back(error);
    }

    pub fn requests(&self) -> Vec<RoutingParams> {
        self.requests.lock().clone()
    }
}

impl TripPlanner for FakePlanner {
    async fn plan(&self, params: &RoutingParams) -> Result<Vec<Itinerary>, RoutingError> {
        self.requests.lock().push(params.clone());

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }

        let alternatives = *self.alternatives.lock();
        let itineraries = (0..=alternatives)
            .map(|id| {
                let leg = create_leg(
                    TravelMode::Walk,
                    (params.from.lat, params.from.lon),
                    (params.to.lat, params.to.lon),
                    1000.0 + id as f64 * 100.0,
                );
                itinerary_for(id, vec![leg], params.clone())
            })
            .collect();
        Ok(itineraries)
    }
}

#[derive(Default)]
pub struct FakeIsochrones {
    requests: Mutex<Vec<IsochroneParams>>,
    failures: Mutex<VecDeque<RoutingError>>,
}

impl FakeIsochrones {
    pub fn fail_next(&self, error: RoutingError) {
        self.failures.lock().push_back(error);
    }

    pub fn requests(&self) -> Vec<IsochroneParams> {
        self.requests.lock().clone()
    }
}

impl IsochroneProvider for FakeIsochrones {
    async fn reachable(&self, params: &IsochroneParams) -> Result<Reachable, RoutingError> {
        self.requests.lock().push(params.clone());

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }

        Ok(Reachable {
            isochrone: Some(FeatureCollection {
                bbox: None,
                features: vec![],
                foreign_members: None,
            }),
            matched: vec![create_destination(
                1,
                "Bartram's Garden",
                LatLon::new(39.9321, -75.2125),
            )],
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    PlotItinerary(LayerId),
    HighlightItinerary(LayerId),
    RemoveItineraryLayer(LayerId),
    RemoveAllItineraryLayers,
    ShowWaypoints(LayerId),
    ClearWaypointInteractivity(LayerId),
    DrawIsochrone,
    DrawDestinations(usize),
    ClearIsochrone,
    ClearDestinations,
    ShowError(String),
}

#[derive(Default)]
pub struct RecordingMap {
    calls: Mutex<Vec<MapCall>>,
}

impl RecordingMap {
    pub fn calls(&self) -> Vec<MapCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: MapCall) {
        self.calls.lock().push(call);
    }
}

impl MapView for RecordingMap {
    fn plot_itinerary(&self, itinerary: &Itinerary, _fit_bounds: bool) {
        self.record(MapCall::PlotItinerary(itinerary.layer_id));
    }

    fn highlight_itinerary(&self, itinerary: &Itinerary) {
        self.record(MapCall::HighlightItinerary(itinerary.layer_id));
    }

    fn remove_itinerary_layer(&self, layer_id: LayerId) {
        self.record(MapCall::RemoveItineraryLayer(layer_id));
    }

    fn remove_all_itinerary_layers(&self) {
        self.record(MapCall::RemoveAllItineraryLayers);
    }

    fn show_waypoints(&self, itinerary: &Itinerary) {
        self.record(MapCall::ShowWaypoints(itinerary.layer_id));
    }

    fn clear_waypoint_interactivity(&self, itinerary: &Itinerary) {
        self.record(MapCall::ClearWaypointInteractivity(itinerary.layer_id));
    }

    fn draw_isochrone(&self, _isochrone: &FeatureCollection) {
        self.record(MapCall::DrawIsochrone);
    }

    fn draw_destinations(&self, destinations: &[Destination]) {
        self.record(MapCall::DrawDestinations(destinations.len()));
    }

    fn clear_isochrone(&self) {
        self.record(MapCall::ClearIsochrone);
    }

    fn clear_destinations(&self) {
        self.record(MapCall::ClearDestinations);
    }

    fn show_error(&self, message: &str) {
        self.record(MapCall::ShowError(message.to_string()));
    }
}
