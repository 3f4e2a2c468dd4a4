use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::geometry::LatLon;

use super::{travel_mode::TravelMode, trip_options::TripOptions};

/// Coarser than the planner default of 200m, which improves response times for
/// non-transit travelsheds.
const NON_TRANSIT_PRECISION_METERS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneParams {
    pub from: LatLon,
    pub when: DateTime,
    pub travel_minutes: u32,
    pub options: TripOptions,
}

impl IsochroneParams {
    pub fn new(from: LatLon, when: DateTime, travel_minutes: u32, options: TripOptions) -> Self {
        Self {
            from,
            when,
            travel_minutes,
            options,
        }
    }

    pub fn cutoff_seconds(&self) -> u32 {
        self.travel_minutes.saturating_mul(60)
    }

    fn precision_meters(&self) -> Option<u32> {
        match self.options.modes.as_slice() {
            [TravelMode::Walk] | [TravelMode::Bicycle] => Some(NON_TRANSIT_PRECISION_METERS),
            _ => None,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("fromPlace", self.from.to_string()),
            ("time", self.when.strftime("%I:%M%P").to_string()),
            ("date", self.when.strftime("%Y/%m/%d").to_string()),
            ("cutoffSec", self.cutoff_seconds().to_string()),
        ];

        pairs.extend(self.options.query_pairs());

        if let Some(precision) = self.precision_meters() {
            pairs.push(("precisionMeters", precision.to_string()));
        }

        pairs
    }
}
