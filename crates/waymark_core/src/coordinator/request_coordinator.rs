use std::{sync::Arc, time::Duration};

use futures::FutureExt;

use crate::{
    error::RoutingError,
    routing::{
        isochrone_params::IsochroneParams,
        itinerary::Itinerary,
        planner::{IsochroneProvider, TripPlanner},
        reachable::Reachable,
        routing_params::RoutingParams,
    },
};

use super::latest_wins_queue::{FetchFn, LatestWinsQueue, RequestKind, RequestOutcome};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorParams {
    pub request_timeout: Duration,
    /// Minimum spacing of live updates while dragging.
    pub throttle_interval: Duration,
}

impl Default for CoordinatorParams {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
        }
    }
}

/// One latest-wins queue per kind of request. Kinds do not wait on each other.
#[derive(Clone)]
pub struct RequestCoordinator {
    params: CoordinatorParams,
    plans: LatestWinsQueue<RoutingParams, Vec<Itinerary>>,
    live_updates: LatestWinsQueue<RoutingParams, Vec<Itinerary>>,
    isochrones: LatestWinsQueue<IsochroneParams, Reachable>,
}

impl RequestCoordinator {
    pub fn new<T, I>(planner: Arc<T>, isochrones: Arc<I>, params: CoordinatorParams) -> Self
    where
        T: TripPlanner,
        I: IsochroneProvider,
    {
        Self {
            params,
            plans: LatestWinsQueue::new(
                RequestKind::Plan,
                plan_fetch(Arc::clone(&planner)),
                params.request_timeout,
            ),
            live_updates: LatestWinsQueue::new(
                RequestKind::LiveUpdate,
                plan_fetch(planner),
                params.request_timeout,
            ),
            isochrones: LatestWinsQueue::new(
                RequestKind::Isochrone,
                isochrone_fetch(isochrones),
                params.request_timeout,
            ),
        }
    }

    pub fn params(&self) -> &CoordinatorParams {
        &self.params
    }

    pub async fn submit_plan(
        &self,
        params: RoutingParams,
    ) -> Result<RequestOutcome<Vec<Itinerary>>, RoutingError> {
        self.plans.submit(params).await
    }

    pub async fn submit_live_update(
        &self,
        params: RoutingParams,
    ) -> Result<RequestOutcome<Vec<Itinerary>>, RoutingError> {
        self.live_updates.submit(params).await
    }

    pub async fn submit_isochrone(
        &self,
        params: IsochroneParams,
    ) -> Result<RequestOutcome<Reachable>, RoutingError> {
        self.isochrones.submit(params).await
    }

    pub fn is_busy(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Plan => self.plans.is_busy(),
            RequestKind::LiveUpdate => self.live_updates.is_busy(),
            RequestKind::Isochrone => self.isochrones.is_busy(),
        }
    }
}

fn plan_fetch<T: TripPlanner>(planner: Arc<T>) -> FetchFn<RoutingParams, Vec<Itinerary>> {
    Arc::new(move |params: RoutingParams| {
        let planner = Arc::clone(&planner);
        async move { planner.plan(&params).await }.boxed()
    })
}

fn isochrone_fetch<I: IsochroneProvider>(provider: Arc<I>) -> FetchFn<IsochroneParams, Reachable> {
    Arc::new(move |params: IsochroneParams| {
        let provider = Arc::clone(&provider);
        async move { provider.reachable(&params).await }.boxed()
    })
}
