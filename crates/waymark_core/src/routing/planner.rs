use std::future::Future;

use crate::error::RoutingError;

use super::{
    isochrone_params::IsochroneParams, itinerary::Itinerary, reachable::Reachable,
    routing_params::RoutingParams,
};

/// A trip planning backend.
pub trait TripPlanner: Send + Sync + 'static {
    fn plan(
        &self,
        params: &RoutingParams,
    ) -> impl Future<Output = Result<Vec<Itinerary>, RoutingError>> + Send;
}

/// A backend answering "what can I reach from here within N minutes".
pub trait IsochroneProvider: Send + Sync + 'static {
    fn reachable(
        &self,
        params: &IsochroneParams,
    ) -> impl Future<Output = Result<Reachable, RoutingError>> + Send;
}
