use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::civil::DateTime;
use tracing::{debug, error};

use crate::{
    coordinator::{latest_wins_queue::RequestOutcome, request_coordinator::RequestCoordinator},
    error::RoutingError,
    geometry::LatLon,
    map_view::MapView,
    routing::{isochrone_params::IsochroneParams, reachable::Destination, trip_options::TripOptions},
};

/// Travelshed queries for the explore view.
pub struct ExploreController<V> {
    coordinator: RequestCoordinator,
    map: Arc<V>,
    active: AtomicBool,
}

impl<V: MapView> ExploreController<V> {
    pub fn new(coordinator: RequestCoordinator, map: Arc<V>) -> Self {
        Self {
            coordinator,
            map,
            active: AtomicBool::new(true),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Fetches and draws what is reachable from `origin` within `travel_minutes`.
    ///
    /// Returns the matched destinations, or `None` when the result was superseded by a
    /// newer query or the explore view was left in the meantime.
    pub async fn fetch_isochrone(
        &self,
        origin: LatLon,
        when: DateTime,
        travel_minutes: u32,
        options: TripOptions,
    ) -> Result<Option<Vec<Destination>>, RoutingError> {
        self.map.clear_isochrone();
        self.map.clear_destinations();

        let params = IsochroneParams::new(origin, when, travel_minutes, options);
        let reachable = match self.coordinator.submit_isochrone(params).await {
            Ok(RequestOutcome::Completed(reachable)) => reachable,
            Ok(RequestOutcome::Superseded) => return Ok(None),
            Err(fetch_error) => {
                error!(error = %fetch_error, "Isochrone request failed");
                return Err(fetch_error);
            }
        };

        if !self.is_active() {
            debug!("Explore view closed, not drawing isochrone");
            return Ok(None);
        }

        if let Some(isochrone) = &reachable.isochrone {
            self.map.draw_isochrone(isochrone);
        }
        self.map.draw_destinations(&reachable.matched);

        Ok(Some(reachable.matched))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        coordinator::request_coordinator::CoordinatorParams,
        test_utils::{FakeIsochrones, FakePlanner, MapCall, RecordingMap},
    };

    use super::*;

    fn controller(
        isochrones: Arc<FakeIsochrones>,
    ) -> (ExploreController<RecordingMap>, Arc<RecordingMap>) {
        let coordinator = RequestCoordinator::new(
            Arc::new(FakePlanner::default()),
            isochrones,
            CoordinatorParams::default(),
        );
        let map = Arc::new(RecordingMap::default());
        (
            ExploreController::new(coordinator, Arc::clone(&map)),
            map,
        )
    }

    async fn fetch(
        controller: &ExploreController<RecordingMap>,
    ) -> Result<Option<Vec<Destination>>, RoutingError> {
        controller
            .fetch_isochrone(
                LatLon::new(39.95, -75.16),
                date(2015, 1, 21).at(7, 30, 0, 0),
                30,
                TripOptions::default(),
            )
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn draws_isochrone_and_destinations() {
        let isochrones = Arc::new(FakeIsochrones::default());
        let (controller, map) = controller(Arc::clone(&isochrones));

        let matched = fetch(&controller).await.unwrap().unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(
            map.calls(),
            vec![
                MapCall::ClearIsochrone,
                MapCall::ClearDestinations,
                MapCall::DrawIsochrone,
                MapCall::DrawDestinations(1),
            ]
        );
        assert_eq!(isochrones.requests()[0].cutoff_seconds(), 1800);
    }

    #[tokio::test(start_paused = true)]
    async fn inactive_view_does_not_draw() {
        let (controller, map) = controller(Arc::new(FakeIsochrones::default()));
        controller.set_active(false);

        assert_eq!(fetch(&controller).await, Ok(None));
        assert!(!map.calls().contains(&MapCall::DrawIsochrone));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_returned_and_slot_freed() {
        let isochrones = Arc::new(FakeIsochrones::default());
        let (controller, _map) = controller(Arc::clone(&isochrones));
        let unavailable = RoutingError::BackendUnavailable(String::from("503"));
        isochrones.fail_next(unavailable.clone());

        assert_eq!(fetch(&controller).await, Err(unavailable));
        assert!(fetch(&controller).await.unwrap().is_some());
    }
}
