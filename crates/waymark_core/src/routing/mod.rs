pub mod isochrone_params;
pub mod itinerary;
pub mod planner;
pub mod reachable;
pub mod routing_params;
pub mod travel_mode;
pub mod trip_options;
