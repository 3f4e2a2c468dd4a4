use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    coordinator::throttle::{Throttle, ThrottleOptions},
    error::{EditError, RoutingError},
    geometry::LatLon,
    map_view::MapView,
    routing::itinerary::{Itinerary, LayerId},
};

use super::waypoint_editor::{
    compute_insertion_index, insert_waypoint, move_waypoint, remove_waypoint,
};

/// Identifies one drag gesture. Live updates are only applied to the gesture that
/// requested them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureId(u64);

impl GestureId {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryEvent {
    /// A throttled drag tick. The itinerary's routing params carry the previewed
    /// waypoints and its `layer_id` is the layer currently shown for it.
    WaypointMoved {
        gesture: GestureId,
        itinerary: Itinerary,
    },
    /// The edit is final and the trip should be planned again with these waypoints.
    WaypointsSet { waypoints: Vec<LatLon> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    Idle,
    DraggingNew { index: usize },
    DraggingExisting { index: usize },
    /// An edit was committed. Nothing else is accepted until the replanned itinerary
    /// is focused or the session is cleared.
    Released,
}

impl DragGesture {
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            DragGesture::DraggingNew { .. } | DragGesture::DraggingExisting { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct DragTick {
    id: GestureId,
    gesture: DragGesture,
    point: LatLon,
}

struct FocusedItinerary {
    /// The itinerary as last planned. Edits are always made against its waypoints.
    itinerary: Itinerary,
    /// Layer on the map for this itinerary, replaced by every applied live update.
    displayed_layer: LayerId,
}

struct EditState {
    focused: Option<FocusedItinerary>,
    gesture: DragGesture,
    gesture_id: GestureId,
    /// A preview for `gesture_id` is in flight.
    live_updating: bool,
}

impl EditState {
    fn editable(&self) -> Result<&FocusedItinerary, EditError> {
        if self.gesture == DragGesture::Released {
            return Err(EditError::ReplanPending);
        }
        self.focused.as_ref().ok_or(EditError::NoFocusedItinerary)
    }

    fn start_gesture(&mut self, gesture: DragGesture) {
        self.gesture = gesture;
        self.gesture_id = self.gesture_id.next();
        self.live_updating = false;
    }

    fn reset(&mut self) {
        self.gesture = DragGesture::Idle;
        self.live_updating = false;
    }
}

/// Owns waypoint editing for the one itinerary that currently accepts drags.
pub struct RouteEditSession<V> {
    map: Arc<V>,
    state: Arc<Mutex<EditState>>,
    events: mpsc::UnboundedSender<ItineraryEvent>,
    throttle: Throttle<DragTick>,
}

impl<V: MapView> RouteEditSession<V> {
    pub fn new(
        map: Arc<V>,
        throttle_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ItineraryEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(EditState {
            focused: None,
            gesture: DragGesture::Idle,
            gesture_id: GestureId(0),
            live_updating: false,
        }));

        let throttle = {
            let state = Arc::clone(&state);
            let events = events.clone();
            Throttle::new(
                throttle_interval,
                ThrottleOptions::default(),
                move |tick: DragTick| preview_drag(&state, &events, tick),
            )
        };

        let session = Self {
            map,
            state,
            events,
            throttle,
        };

        (session, receiver)
    }

    /// Makes `itinerary` the draggable one, detaching whichever had focus before.
    pub fn focus(&self, itinerary: Itinerary) {
        self.throttle.cancel();

        let previous = {
            let mut state = self.state.lock();
            state.reset();
            state.focused.replace(FocusedItinerary {
                displayed_layer: itinerary.layer_id,
                itinerary: itinerary.clone(),
            })
        };

        if let Some(previous) = previous {
            self.map.clear_waypoint_interactivity(&previous.itinerary);
        }
        self.map.show_waypoints(&itinerary);
    }

    pub fn clear(&self) {
        self.throttle.cancel();

        let previous = {
            let mut state = self.state.lock();
            state.reset();
            state.focused.take()
        };

        if let Some(previous) = previous {
            self.map.clear_waypoint_interactivity(&previous.itinerary);
        }
    }

    pub fn focused_itinerary(&self) -> Option<Itinerary> {
        self.state
            .lock()
            .focused
            .as_ref()
            .map(|focused| focused.itinerary.clone())
    }

    pub fn displayed_layer(&self) -> Option<LayerId> {
        self.state
            .lock()
            .focused
            .as_ref()
            .map(|focused| focused.displayed_layer)
    }

    pub fn gesture(&self) -> DragGesture {
        self.state.lock().gesture
    }

    pub fn is_live_updating(&self) -> bool {
        self.state.lock().live_updating
    }

    /// Starts dragging a new waypoint off the route line and returns where it will be
    /// inserted.
    pub fn begin_new_waypoint_drag(&self, point: LatLon) -> Result<usize, EditError> {
        let mut state = self.state.lock();
        debug_assert!(!state.gesture.is_dragging(), "drag started during another drag");

        let focused = state.editable()?;
        let index = compute_insertion_index(
            &focused.itinerary.routing_params.endpoints(),
            &focused.itinerary.waypoints,
            &point,
        );

        state.start_gesture(DragGesture::DraggingNew { index });
        Ok(index)
    }

    pub fn begin_existing_waypoint_drag(&self, index: usize) -> Result<(), EditError> {
        let mut state = self.state.lock();
        debug_assert!(!state.gesture.is_dragging(), "drag started during another drag");

        let len = state.editable()?.itinerary.waypoints.len();
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }

        state.start_gesture(DragGesture::DraggingExisting { index });
        Ok(())
    }

    pub fn drag_to(&self, point: LatLon) {
        let (id, gesture) = {
            let state = self.state.lock();
            (state.gesture_id, state.gesture)
        };
        if !gesture.is_dragging() {
            debug!("Ignoring drag without an active gesture");
            return;
        }

        self.throttle.call(DragTick { id, gesture, point });
    }

    /// Finishes the gesture at `point` and asks for an authoritative replan.
    ///
    /// Any live update still in flight is disowned, its result will be discarded.
    pub fn end_drag(&self, point: LatLon) -> Result<(), EditError> {
        self.throttle.cancel();

        let waypoints = {
            let mut state = self.state.lock();
            let gesture = state.gesture;
            let Some(edited) = state.focused.as_ref().and_then(|focused| {
                edited_waypoints(&focused.itinerary.waypoints, gesture, point)
            }) else {
                debug!("Drag ended without an active gesture");
                return Ok(());
            };

            state.live_updating = false;
            match edited {
                Ok(waypoints) => {
                    state.gesture = DragGesture::Released;
                    waypoints
                }
                Err(error) => {
                    state.gesture = DragGesture::Idle;
                    return Err(error);
                }
            }
        };

        self.map.remove_all_itinerary_layers();
        self.emit(ItineraryEvent::WaypointsSet { waypoints });
        Ok(())
    }

    pub fn remove_waypoint(&self, index: usize) -> Result<(), EditError> {
        let waypoints = {
            let mut state = self.state.lock();
            if state.gesture.is_dragging() {
                return Err(EditError::GestureInProgress);
            }

            let waypoints = remove_waypoint(&state.editable()?.itinerary.waypoints, index)?;
            state.gesture = DragGesture::Released;
            waypoints
        };

        self.emit(ItineraryEvent::WaypointsSet { waypoints });
        Ok(())
    }

    /// Swaps the previewed route in for `old_layer`. The old layer is removed either
    /// way, the new one is only drawn while `gesture` is still live.
    pub fn apply_live_update(
        &self,
        gesture: GestureId,
        old_layer: LayerId,
        itinerary: Itinerary,
    ) -> bool {
        self.map.remove_itinerary_layer(old_layer);

        let mut state = self.state.lock();
        if state.gesture_id != gesture || !state.live_updating {
            debug!(layer = ?old_layer, ?gesture, "Discarding stale live update");
            return false;
        }
        state.live_updating = false;

        if let Some(focused) = state.focused.as_mut() {
            focused.displayed_layer = itinerary.layer_id;
        }
        drop(state);

        self.map.plot_itinerary(&itinerary, false);
        true
    }

    /// The previous preview stays on the map.
    pub fn live_update_failed(&self, gesture: GestureId, error: &RoutingError) {
        warn!(%error, "Live update failed, keeping last route");

        let mut state = self.state.lock();
        if state.gesture_id == gesture {
            state.live_updating = false;
        }
    }

    fn emit(&self, event: ItineraryEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for itinerary events");
        }
    }
}

fn edited_waypoints(
    waypoints: &[LatLon],
    gesture: DragGesture,
    point: LatLon,
) -> Option<Result<Vec<LatLon>, EditError>> {
    match gesture {
        DragGesture::DraggingNew { index } => Some(insert_waypoint(waypoints, point, index)),
        DragGesture::DraggingExisting { index } => Some(move_waypoint(waypoints, index, point)),
        DragGesture::Idle | DragGesture::Released => None,
    }
}

fn preview_drag(
    state: &Mutex<EditState>,
    events: &mpsc::UnboundedSender<ItineraryEvent>,
    tick: DragTick,
) {
    let moved = {
        let mut state = state.lock();
        // One preview at a time, and none once the gesture is over.
        if state.live_updating || state.gesture_id != tick.id || !state.gesture.is_dragging() {
            return;
        }

        let Some(focused) = state.focused.as_ref() else {
            return;
        };

        let waypoints = match edited_waypoints(&focused.itinerary.waypoints, tick.gesture, tick.point)
        {
            Some(Ok(waypoints)) => waypoints,
            Some(Err(error)) => {
                warn!(%error, "Ignoring drag tick");
                return;
            }
            None => return,
        };

        let mut moved = focused.itinerary.with_requested_waypoints(waypoints);
        moved.layer_id = focused.displayed_layer;
        state.live_updating = true;
        moved
    };

    let event = ItineraryEvent::WaypointMoved {
        gesture: tick.id,
        itinerary: moved,
    };
    if events.send(event).is_err() {
        debug!("No listener for itinerary events");
    }
}
