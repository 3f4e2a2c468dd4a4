use std::{fmt::Display, str::FromStr};

use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn haversine_distance(&self, to: &LatLon) -> f64 {
        let haversine = Haversine;
        haversine.distance(geo::Point::from(self), geo::Point::from(to))
    }

    /// `"lon,lat"`, the ordering ArcGIS-style services expect.
    pub fn to_lon_lat_string(&self) -> String {
        format!("{},{}", self.lon, self.lat)
    }
}

/// Formats as `"lat,lon"`, the ordering trip planner place parameters use.
impl Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for LatLon {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = input
            .split_once(',')
            .ok_or_else(|| format!("Expected \"lat,lon\", got \"{input}\""))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude \"{lat}\""))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude \"{lon}\""))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude {lat} out of range"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("Longitude {lon} out of range"));
        }

        Ok(LatLon { lat, lon })
    }
}

impl From<&LatLon> for geo::Point<f64> {
    fn from(value: &LatLon) -> Self {
        geo::Point::new(value.lon, value.lat)
    }
}

impl From<LatLon> for geo::Point<f64> {
    fn from(value: LatLon) -> Self {
        geo::Point::new(value.lon, value.lat)
    }
}

impl From<geo::Point<f64>> for LatLon {
    fn from(point: geo::Point<f64>) -> Self {
        LatLon {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

impl From<geo::Coord<f64>> for LatLon {
    fn from(coord: geo::Coord<f64>) -> Self {
        LatLon {
            lat: coord.y,
            lon: coord.x,
        }
    }
}
