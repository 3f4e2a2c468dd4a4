pub mod lat_lon;
pub mod leg_geometry;
pub mod nearest;

pub use lat_lon::LatLon;
