use geojson::FeatureCollection;

use crate::routing::{
    itinerary::{Itinerary, LayerId},
    reachable::Destination,
};

/// Rendering side of the map. Implementations draw and remove layers; they hold no
/// routing state of their own.
pub trait MapView: Send + Sync + 'static {
    fn plot_itinerary(&self, itinerary: &Itinerary, fit_bounds: bool);

    fn highlight_itinerary(&self, itinerary: &Itinerary);

    fn remove_itinerary_layer(&self, layer_id: LayerId);

    fn remove_all_itinerary_layers(&self);

    /// Makes the itinerary's waypoints draggable and its route line accept new ones.
    fn show_waypoints(&self, itinerary: &Itinerary);

    fn clear_waypoint_interactivity(&self, itinerary: &Itinerary);

    fn draw_isochrone(&self, isochrone: &FeatureCollection);

    fn draw_destinations(&self, destinations: &[Destination]);

    fn clear_isochrone(&self);

    fn clear_destinations(&self);

    fn show_error(&self, message: &str);
}
