use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Walk,
    Bicycle,
    Car,
    Transit,
    Bus,
    Subway,
    Rail,
    Tram,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    #[serde(other)]
    Other,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walk => "WALK",
            TravelMode::Bicycle => "BICYCLE",
            TravelMode::Car => "CAR",
            TravelMode::Transit => "TRANSIT",
            TravelMode::Bus => "BUS",
            TravelMode::Subway => "SUBWAY",
            TravelMode::Rail => "RAIL",
            TravelMode::Tram => "TRAM",
            TravelMode::Ferry => "FERRY",
            TravelMode::CableCar => "CABLE_CAR",
            TravelMode::Gondola => "GONDOLA",
            TravelMode::Funicular => "FUNICULAR",
            TravelMode::Other => "OTHER",
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_uppercase().as_str() {
            "WALK" => Ok(TravelMode::Walk),
            "BICYCLE" => Ok(TravelMode::Bicycle),
            "CAR" => Ok(TravelMode::Car),
            "TRANSIT" => Ok(TravelMode::Transit),
            "BUS" => Ok(TravelMode::Bus),
            "SUBWAY" => Ok(TravelMode::Subway),
            "RAIL" => Ok(TravelMode::Rail),
            "TRAM" => Ok(TravelMode::Tram),
            "FERRY" => Ok(TravelMode::Ferry),
            "CABLE_CAR" => Ok(TravelMode::CableCar),
            "GONDOLA" => Ok(TravelMode::Gondola),
            "FUNICULAR" => Ok(TravelMode::Funicular),
            other => Err(format!("Unknown travel mode \"{other}\"")),
        }
    }
}

/// Joins modes into the comma separated form the trip planner expects.
pub fn mode_string(modes: &[TravelMode]) -> String {
    modes
        .iter()
        .map(TravelMode::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
