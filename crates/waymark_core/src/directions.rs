use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    coordinator::{latest_wins_queue::RequestOutcome, request_coordinator::RequestCoordinator},
    error::RoutingError,
    map_view::MapView,
    routing::{
        itinerary::{Itinerary, ItineraryId},
        routing_params::RoutingParams,
    },
    waypoints::route_edit_session::{GestureId, ItineraryEvent, RouteEditSession},
};

#[derive(Debug, Clone, PartialEq)]
pub enum PlanState {
    Planned(Vec<Itinerary>),
    /// A newer plan request replaced this one before it finished.
    Superseded,
    /// The directions view was closed before the plan arrived.
    Discarded,
    Failed(RoutingError),
}

struct DirectionsState {
    active: bool,
    itineraries: Vec<Itinerary>,
    last_params: Option<RoutingParams>,
}

/// Plans trips, shows the results and reacts to waypoint edits on the focused itinerary.
pub struct DirectionsController<V> {
    coordinator: RequestCoordinator,
    map: Arc<V>,
    session: RouteEditSession<V>,
    state: Mutex<DirectionsState>,
}

impl<V: MapView> DirectionsController<V> {
    pub fn new(
        coordinator: RequestCoordinator,
        map: Arc<V>,
    ) -> (Self, mpsc::UnboundedReceiver<ItineraryEvent>) {
        let (session, events) =
            RouteEditSession::new(Arc::clone(&map), coordinator.params().throttle_interval);

        let controller = Self {
            coordinator,
            map,
            session,
            state: Mutex::new(DirectionsState {
                active: true,
                itineraries: Vec::new(),
                last_params: None,
            }),
        };

        (controller, events)
    }

    pub fn session(&self) -> &RouteEditSession<V> {
        &self.session
    }

    pub fn itineraries(&self) -> Vec<Itinerary> {
        self.state.lock().itineraries.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Leaving the directions view drops everything it showed.
    pub fn set_active(&self, active: bool) {
        self.state.lock().active = active;
        if !active {
            self.clear_itineraries();
        }
    }

    pub async fn plan_trip(&self, params: RoutingParams) -> PlanState {
        self.state.lock().last_params = Some(params.clone());

        let itineraries = match self.coordinator.submit_plan(params.clone()).await {
            Ok(RequestOutcome::Completed(itineraries)) if itineraries.is_empty() => {
                Err(RoutingError::NoRouteFound(String::from("no itineraries returned")))
            }
            Ok(RequestOutcome::Completed(itineraries)) => Ok(itineraries),
            Ok(RequestOutcome::Superseded) => {
                debug!("Plan superseded by a newer request");
                return PlanState::Superseded;
            }
            Err(error) => Err(error),
        };

        if !self.is_active() {
            return PlanState::Discarded;
        }

        self.clear_itineraries();

        match itineraries {
            Ok(itineraries) => {
                info!(count = itineraries.len(), "Planned trip");
                self.show_itineraries(&itineraries, &params);
                self.state.lock().itineraries = itineraries.clone();
                PlanState::Planned(itineraries)
            }
            Err(planning_error) => {
                error!(error = %planning_error, "Trip planning failed");
                self.map.show_error(planning_error.user_message());
                PlanState::Failed(planning_error)
            }
        }
    }

    /// Highlights the chosen itinerary. Unless the trip is arrive-by it also becomes the
    /// one that accepts waypoint edits. Returns `None` for an unknown id.
    pub fn select_itinerary(&self, id: ItineraryId) -> Option<Itinerary> {
        let selected = self
            .state
            .lock()
            .itineraries
            .iter()
            .find(|itinerary| itinerary.id == id)
            .cloned()?;

        debug!(%id, "Selected itinerary");
        self.map.highlight_itinerary(&selected);

        let already_focused = self
            .session
            .focused_itinerary()
            .is_some_and(|focused| focused.layer_id == selected.layer_id);
        if !selected.routing_params.options.arrive_by && !already_focused {
            self.session.focus(selected.clone());
        }

        Some(selected)
    }

    /// Returns the state of the replan for `WaypointsSet`, `None` for live updates.
    pub async fn handle_event(&self, event: ItineraryEvent) -> Option<PlanState> {
        match event {
            ItineraryEvent::WaypointMoved { gesture, itinerary } => {
                self.live_update(gesture, itinerary).await;
                None
            }
            ItineraryEvent::WaypointsSet { waypoints } => {
                let params = self.state.lock().last_params.clone()?;
                Some(self.plan_trip(params.with_waypoints(waypoints)).await)
            }
        }
    }

    /// Handles itinerary events until the session is dropped.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<ItineraryEvent>) {
        while let Some(event) = events.recv().await {
            let controller = Arc::clone(&self);
            tokio::spawn(async move {
                controller.handle_event(event).await;
            });
        }
    }

    async fn live_update(&self, gesture: GestureId, dragged: Itinerary) {
        let old_layer = dragged.layer_id;
        let outcome = self
            .coordinator
            .submit_live_update(dragged.routing_params.clone())
            .await;

        match outcome {
            Ok(RequestOutcome::Completed(itineraries)) => {
                let Some(mut preview) = itineraries.into_iter().next() else {
                    self.session.live_update_failed(
                        gesture,
                        &RoutingError::NoRouteFound(String::from("no itineraries returned")),
                    );
                    return;
                };
                preview.id = dragged.id;
                self.session.apply_live_update(gesture, old_layer, preview);
            }
            Ok(RequestOutcome::Superseded) => {}
            Err(error) => self.session.live_update_failed(gesture, &error),
        }
    }

    fn show_itineraries(&self, itineraries: &[Itinerary], params: &RoutingParams) {
        for (index, itinerary) in itineraries.iter().enumerate() {
            self.map.plot_itinerary(itinerary, index == 0);
        }

        if let Some(first) = itineraries.first() {
            self.map.highlight_itinerary(first);
        }

        // With waypoints only one itinerary comes back, which keeps it editable.
        if let [only] = itineraries
            && !params.options.arrive_by
        {
            self.session.focus(only.clone());
        }
    }

    fn clear_itineraries(&self) {
        self.session.clear();
        self.map.remove_all_itinerary_layers();
        self.state.lock().itineraries.clear();
    }
}
