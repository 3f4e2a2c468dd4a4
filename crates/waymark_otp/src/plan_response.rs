use jiff::Timestamp;
use serde::Deserialize;
use waymark_core::{
    geometry::{LatLon, leg_geometry::decode_leg_geometry},
    routing::{
        itinerary::{Itinerary, ItineraryId, Leg, Place, Step},
        routing_params::RoutingParams,
        travel_mode::TravelMode,
    },
};

use crate::error::OtpError;

#[derive(Deserialize, Debug)]
pub struct PlanResponse {
    pub plan: Option<OtpPlan>,
    pub error: Option<OtpPlanError>,
}

#[derive(Deserialize, Debug)]
pub struct OtpPlanError {
    pub id: i64,
    pub msg: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct OtpPlan {
    #[serde(default)]
    pub itineraries: Vec<OtpItinerary>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OtpItinerary {
    /// Seconds
    pub duration: f64,
    /// Milliseconds since the epoch
    pub start_time: i64,
    pub end_time: i64,
    pub legs: Vec<OtpLeg>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OtpLeg {
    pub mode: TravelMode,
    pub start_time: i64,
    pub end_time: i64,
    /// Meters
    pub distance: f64,
    pub duration: Option<f64>,
    pub from: OtpPlace,
    pub to: OtpPlace,
    pub leg_geometry: OtpEncodedPolyline,
    pub route: Option<String>,
    #[serde(default)]
    pub steps: Vec<OtpStep>,
}

#[derive(Deserialize, Debug)]
pub struct OtpPlace {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize, Debug)]
pub struct OtpEncodedPolyline {
    pub points: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OtpStep {
    pub distance: f64,
    pub street_name: String,
}

impl PlanResponse {
    /// Itineraries in response order, each carrying the params that produced it.
    pub fn into_itineraries(self, params: &RoutingParams) -> Result<Vec<Itinerary>, OtpError> {
        if let Some(error) = self.error {
            return Err(OtpError::Plan {
                id: error.id,
                message: error.msg.or(error.message).unwrap_or_default(),
            });
        }

        let plan = self.plan.ok_or(OtpError::IncompleteResponse)?;
        if plan.itineraries.is_empty() {
            return Err(OtpError::NoItineraries);
        }

        plan.itineraries
            .into_iter()
            .enumerate()
            .map(|(index, itinerary)| itinerary.into_itinerary(ItineraryId::new(index), params))
            .collect()
    }
}

impl OtpItinerary {
    fn into_itinerary(self, id: ItineraryId, params: &RoutingParams) -> Result<Itinerary, OtpError> {
        let legs = self
            .legs
            .into_iter()
            .map(OtpLeg::into_leg)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Itinerary::new(
            id,
            legs,
            Timestamp::from_millisecond(self.start_time)?,
            Timestamp::from_millisecond(self.end_time)?,
            self.duration,
            params.clone(),
        ))
    }
}

impl OtpLeg {
    fn into_leg(self) -> Result<Leg, OtpError> {
        let start_time = Timestamp::from_millisecond(self.start_time)?;
        let end_time = Timestamp::from_millisecond(self.end_time)?;
        let duration = self
            .duration
            .unwrap_or_else(|| (self.end_time - self.start_time) as f64 / 1000.0);

        Ok(Leg {
            mode: self.mode,
            from: self.from.into(),
            to: self.to.into(),
            geometry: decode_leg_geometry(&self.leg_geometry.points).map_err(OtpError::Polyline)?,
            distance: self.distance,
            duration,
            start_time,
            end_time,
            route: self.route.filter(|route| !route.is_empty()),
            steps: self
                .steps
                .into_iter()
                .map(|step| Step {
                    street_name: step.street_name,
                    distance: step.distance,
                })
                .collect(),
        })
    }
}

impl From<OtpPlace> for Place {
    fn from(place: OtpPlace) -> Self {
        Place {
            name: place.name,
            location: LatLon::new(place.lat, place.lon),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use waymark_core::error::RoutingError;

    use super::*;

    fn params() -> RoutingParams {
        RoutingParams::new(
            LatLon::new(38.5, -120.2),
            LatLon::new(43.252, -126.453),
            date(2015, 1, 21).at(7, 30, 0, 0),
        )
        .with_waypoints(vec![LatLon::new(40.7, -120.95)])
    }

    const PLAN: &str = r#"{
        "requestParameters": {"mode": "TRANSIT,WALK"},
        "plan": {
            "itineraries": [{
                "duration": 1500,
                "startTime": 1421843400000,
                "endTime": 1421844900000,
                "legs": [
                    {
                        "mode": "WALK",
                        "startTime": 1421843400000,
                        "endTime": 1421843700000,
                        "distance": 400.5,
                        "route": "",
                        "from": {"name": "Origin", "lat": 38.5, "lon": -120.2},
                        "to": {"name": "Market St", "lat": 40.7, "lon": -120.95},
                        "legGeometry": {"points": "_p~iF~ps|U_ulLnnqC", "length": 2},
                        "steps": [{"distance": 400.5, "streetName": "Chestnut Street"}]
                    },
                    {
                        "mode": "BUS",
                        "startTime": 1421843700000,
                        "endTime": 1421844900000,
                        "distance": 5200.0,
                        "duration": 1200,
                        "route": "21",
                        "from": {"name": "Market St", "lat": 40.7, "lon": -120.95},
                        "to": {"name": "Destination", "lat": 43.252, "lon": -126.453},
                        "legGeometry": {"points": "_ulLnnqC_mqNvxq`@", "length": 2}
                    }
                ]
            }]
        }
    }"#;

    #[test]
    fn test_into_itineraries() {
        let response: PlanResponse = serde_json::from_str(PLAN).unwrap();

        let itineraries = response.into_itineraries(&params()).unwrap();

        assert_eq!(itineraries.len(), 1);
        let itinerary = &itineraries[0];
        assert_eq!(itinerary.modes(), vec![TravelMode::Walk, TravelMode::Bus]);
        assert_eq!(itinerary.duration_minutes(), 25);
        assert_eq!(itinerary.via(), Some("Chestnut Street"));
        assert_eq!(itinerary.waypoints, vec![LatLon::new(40.7, -120.95)]);
        assert_eq!(itinerary.from.name.as_deref(), Some("Origin"));

        let walk = &itinerary.legs[0];
        assert_eq!(walk.route, None);
        assert_eq!(walk.duration, 300.0);
        assert_eq!(walk.geometry.0.len(), 2);
        assert_eq!(itinerary.legs[1].route.as_deref(), Some("21"));
        assert_eq!(
            itinerary.start_time,
            Timestamp::from_second(1_421_843_400).unwrap()
        );
    }

    #[test]
    fn planner_error_is_no_route() {
        let response: PlanResponse = serde_json::from_str(
            r#"{"error": {"id": 404, "msg": "No trip found.", "message": "PATH_NOT_FOUND"}}"#,
        )
        .unwrap();

        let error = response.into_itineraries(&params()).unwrap_err();

        assert_eq!(
            RoutingError::from(error),
            RoutingError::NoRouteFound(String::from("No trip found."))
        );
    }

    #[test]
    fn empty_plan_is_no_route() {
        let response: PlanResponse =
            serde_json::from_str(r#"{"plan": {"itineraries": []}}"#).unwrap();

        assert!(matches!(
            response.into_itineraries(&params()),
            Err(OtpError::NoItineraries)
        ));
    }
}
