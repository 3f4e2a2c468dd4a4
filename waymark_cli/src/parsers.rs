use jiff::civil::DateTime;
use waymark_core::{
    geometry::LatLon,
    routing::{travel_mode::TravelMode, trip_options::BikeOptimize},
};

pub fn parse_lat_lon(input: &str) -> Result<LatLon, String> {
    input.parse()
}

pub fn parse_travel_mode(input: &str) -> Result<TravelMode, String> {
    input.parse()
}

pub fn parse_bike_optimize(input: &str) -> Result<BikeOptimize, String> {
    input.parse()
}

/// Accepts a civil datetime such as `2015-01-21T07:30`, or `now`.
pub fn parse_date_time(input: &str) -> Result<DateTime, String> {
    if input.eq_ignore_ascii_case("now") {
        return Ok(jiff::Zoned::now().datetime());
    }

    input
        .parse::<DateTime>()
        .map_err(|_| String::from("Invalid date time, expected e.g. 2015-01-21T07:30"))
}
