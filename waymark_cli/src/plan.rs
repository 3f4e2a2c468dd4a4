use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Args;
use comfy_table::Table;
use jiff::{civil::DateTime, tz::TimeZone};
use tracing::info;
use waymark_core::{
    coordinator::request_coordinator::RequestCoordinator,
    directions::{DirectionsController, PlanState},
    geometry::LatLon,
    routing::{
        itinerary::{Itinerary, ItineraryId},
        routing_params::RoutingParams,
        travel_mode::{TravelMode, mode_string},
        trip_options::{BikeOptimize, TripOptions},
    },
};
use waymark_otp::otp_client::{OtpClient, OtpClientParams};

use crate::{config::ServiceConfig, console_map::ConsoleMap, parsers};

#[derive(Args)]
pub struct TripArgs {
    /// Comma separated travel modes
    #[arg(long, value_delimiter = ',', default_value = "TRANSIT,WALK", value_parser = parsers::parse_travel_mode)]
    modes: Vec<TravelMode>,

    #[arg(long)]
    arrive_by: bool,

    /// Maximum walking distance in miles
    #[arg(long)]
    max_walk_miles: Option<f64>,

    /// One of any, flat, fast or safe. Only used with BICYCLE.
    #[arg(long, value_parser = parsers::parse_bike_optimize, default_value = "any")]
    bike_optimize: BikeOptimize,

    #[arg(long)]
    wheelchair: bool,

    /// Departure (or arrival with --arrive-by), e.g. "2015-01-21T07:30"
    #[arg(long, value_parser = parsers::parse_date_time, default_value = "now")]
    pub at: DateTime,
}

impl TripArgs {
    pub fn trip_options(&self) -> TripOptions {
        let options = TripOptions {
            modes: self.modes.clone(),
            arrive_by: self.arrive_by,
            bike_optimize: self.bike_optimize,
            wheelchair: self.wheelchair,
            ..TripOptions::default()
        };

        match self.max_walk_miles {
            Some(miles) => options.with_max_walk_miles(miles),
            None => options,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    from: LatLon,

    #[arg(long, value_parser = parsers::parse_lat_lon)]
    to: LatLon,

    /// Waypoint to pass through, can be repeated
    #[arg(long = "via", value_parser = parsers::parse_lat_lon)]
    waypoints: Vec<LatLon>,

    /// Itinerary to show and edit when several come back
    #[arg(long)]
    select: Option<usize>,

    /// Drag a new waypoint off the route starting at this point...
    #[arg(long, value_parser = parsers::parse_lat_lon, requires = "drag_to")]
    drag_from: Option<LatLon>,

    /// ...and drop it here, then plan again
    #[arg(long, value_parser = parsers::parse_lat_lon, requires = "drag_from")]
    drag_to: Option<LatLon>,

    #[command(flatten)]
    trip: TripArgs,
}

pub async fn run(args: PlanArgs, config: &ServiceConfig) -> Result<(), anyhow::Error> {
    let otp = Arc::new(OtpClient::new(OtpClientParams {
        otp_url: config.otp_url.clone(),
        reachable_url: config.reachable_url.clone(),
    }));
    let coordinator =
        RequestCoordinator::new(Arc::clone(&otp), otp, config.coordinator_params());
    let (directions, mut events) = DirectionsController::new(coordinator, Arc::new(ConsoleMap));

    let options = args.trip.trip_options();
    info!(
        "Planning {} -> {} by {}",
        args.from,
        args.to,
        mode_string(&options.modes)
    );
    let params = RoutingParams::new(args.from, args.to, args.trip.at)
        .with_options(options)
        .with_waypoints(args.waypoints);

    match directions.plan_trip(params).await {
        PlanState::Planned(itineraries) => print_itineraries(&itineraries),
        PlanState::Failed(error) => bail!("{}: {}", error.user_message(), error),
        PlanState::Superseded | PlanState::Discarded => return Ok(()),
    }

    if let Some(id) = args.select {
        let selected = directions
            .select_itinerary(ItineraryId::new(id))
            .with_context(|| format!("No itinerary #{id}"))?;
        info!("Selected itinerary {} via {}", selected.id, selected.via().unwrap_or("-"));
    }

    let (Some(drag_from), Some(drag_to)) = (args.drag_from, args.drag_to) else {
        return Ok(());
    };

    let session = directions.session();
    let index = session
        .begin_new_waypoint_drag(drag_from)
        .context("Only a depart-at itinerary can be edited, pick one with --select")?;
    info!("Dragging new waypoint {} to {}", index, drag_to);

    session.drag_to(drag_to);
    if let Ok(preview) = events.try_recv() {
        directions.handle_event(preview).await;
        if let Some(layer) = session.displayed_layer() {
            info!("Previewed route on layer {:?}", layer);
        }
    }

    session.end_drag(drag_to)?;
    let waypoints_set = events
        .recv()
        .await
        .context("Waypoint edit did not produce a replan")?;

    match directions.handle_event(waypoints_set).await {
        Some(PlanState::Planned(itineraries)) => print_itineraries(&itineraries),
        Some(PlanState::Failed(error)) => bail!("{}: {}", error.user_message(), error),
        _ => {}
    }

    Ok(())
}

fn print_itineraries(itineraries: &[Itinerary]) {
    let time_zone = TimeZone::system();
    let mut table = Table::new();
    table.set_header(vec![
        "#", "Modes", "Via", "Miles", "Minutes", "Depart", "Arrive", "Waypoints",
    ]);

    for itinerary in itineraries {
        table.add_row(vec![
            itinerary.id.to_string(),
            mode_string(&itinerary.modes()),
            itinerary.via().unwrap_or("-").to_string(),
            format!("{:.2}", itinerary.distance_miles()),
            itinerary.duration_minutes().to_string(),
            itinerary
                .start_time
                .to_zoned(time_zone.clone())
                .strftime("%I:%M%P")
                .to_string(),
            itinerary
                .end_time
                .to_zoned(time_zone.clone())
                .strftime("%I:%M%P")
                .to_string(),
            itinerary.waypoints.len().to_string(),
        ]);
    }

    println!("{table}");
}
