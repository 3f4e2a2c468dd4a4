use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::travel_mode::{TravelMode, mode_string};

pub const METERS_PER_MILE: f64 = 1609.34;

/// Walking limit applied to bicycle trips, which allows long rides when mixed with transit.
pub const MAX_WALK_BIKE_MILES: f64 = 300.0;

/// Preset weights for the trip planner's bicycle "triangle" optimisation.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BikeOptimize {
    #[default]
    Any,
    Flat,
    Fast,
    Safe,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BikeTriangle {
    pub safety: f64,
    pub slope: f64,
    pub time: f64,
}

impl BikeOptimize {
    /// The three factors always sum to 1, otherwise the trip planner refuses to plan.
    pub fn triangle(&self) -> BikeTriangle {
        match self {
            BikeOptimize::Any => BikeTriangle {
                safety: 0.34,
                slope: 0.33,
                time: 0.33,
            },
            BikeOptimize::Flat => BikeTriangle {
                safety: 0.17,
                slope: 0.66,
                time: 0.17,
            },
            BikeOptimize::Fast => BikeTriangle {
                safety: 0.17,
                slope: 0.17,
                time: 0.66,
            },
            BikeOptimize::Safe => BikeTriangle {
                safety: 0.66,
                slope: 0.17,
                time: 0.17,
            },
        }
    }
}

impl FromStr for BikeOptimize {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(BikeOptimize::Any),
            "flat" => Ok(BikeOptimize::Flat),
            "fast" => Ok(BikeOptimize::Fast),
            "safe" => Ok(BikeOptimize::Safe),
            other => Err(format!("Unknown bike optimization \"{other}\"")),
        }
    }
}

/// Options shared by trip plans and isochrone queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripOptions {
    pub modes: Vec<TravelMode>,
    pub arrive_by: bool,
    /// Meters
    pub max_walk_distance: Option<f64>,
    pub bike_optimize: BikeOptimize,
    pub wheelchair: bool,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            modes: vec![TravelMode::Transit, TravelMode::Walk],
            arrive_by: false,
            max_walk_distance: None,
            bike_optimize: BikeOptimize::default(),
            wheelchair: false,
        }
    }
}

impl TripOptions {
    pub fn has_bicycle(&self) -> bool {
        self.modes.contains(&TravelMode::Bicycle)
    }

    pub fn with_max_walk_miles(mut self, miles: f64) -> Self {
        self.max_walk_distance = Some(miles * METERS_PER_MILE);
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("mode", mode_string(&self.modes)),
            ("arriveBy", self.arrive_by.to_string()),
        ];

        if self.has_bicycle() {
            let triangle = self.bike_optimize.triangle();
            let max_walk = self
                .max_walk_distance
                .unwrap_or(MAX_WALK_BIKE_MILES * METERS_PER_MILE);

            pairs.push(("maxWalkDistance", max_walk.to_string()));
            pairs.push(("optimize", String::from("TRIANGLE")));
            pairs.push(("triangleSafetyFactor", triangle.safety.to_string()));
            pairs.push(("triangleSlopeFactor", triangle.slope.to_string()));
            pairs.push(("triangleTimeFactor", triangle.time.to_string()));
        } else {
            if let Some(max_walk) = self.max_walk_distance {
                pairs.push(("maxWalkDistance", max_walk.to_string()));
            }
            pairs.push(("wheelchair", self.wheelchair.to_string()));
        }

        pairs
    }
}
