use geojson::FeatureCollection;
use tracing::{debug, info};
use waymark_core::{
    map_view::MapView,
    routing::{
        itinerary::{Itinerary, LayerId},
        reachable::Destination,
    },
};

/// Stands in for a map by logging what would be drawn.
pub struct ConsoleMap;

impl MapView for ConsoleMap {
    fn plot_itinerary(&self, itinerary: &Itinerary, fit_bounds: bool) {
        debug!(
            "Plot itinerary {} on layer {:?} ({} legs)",
            itinerary.id,
            itinerary.layer_id,
            itinerary.legs.len()
        );
        if fit_bounds {
            let bounds = itinerary.bounds(0.1);
            debug!(
                "Fit map to ({:.5}, {:.5}) - ({:.5}, {:.5})",
                bounds.min().y,
                bounds.min().x,
                bounds.max().y,
                bounds.max().x
            );
        }
    }

    fn highlight_itinerary(&self, itinerary: &Itinerary) {
        debug!("Highlight itinerary {}", itinerary.id);
    }

    fn remove_itinerary_layer(&self, layer_id: LayerId) {
        debug!("Remove layer {:?}", layer_id);
    }

    fn remove_all_itinerary_layers(&self) {
        debug!("Remove all itinerary layers");
    }

    fn show_waypoints(&self, itinerary: &Itinerary) {
        info!(
            "Itinerary {} is editable with {} waypoints",
            itinerary.id,
            itinerary.waypoints.len()
        );
    }

    fn clear_waypoint_interactivity(&self, itinerary: &Itinerary) {
        debug!("Itinerary {} is no longer editable", itinerary.id);
    }

    fn draw_isochrone(&self, isochrone: &FeatureCollection) {
        debug!("Draw isochrone with {} features", isochrone.features.len());
    }

    fn draw_destinations(&self, destinations: &[Destination]) {
        debug!("Draw {} destinations", destinations.len());
    }

    fn clear_isochrone(&self) {
        debug!("Clear isochrone");
    }

    fn clear_destinations(&self) {
        debug!("Clear destinations");
    }

    fn show_error(&self, message: &str) {
        info!("{}", message);
    }
}
