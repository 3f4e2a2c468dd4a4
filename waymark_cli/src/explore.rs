use std::sync::Arc;

use clap::Args;
use comfy_table::Table;
use tracing::info;
use waymark_core::{
    coordinator::request_coordinator::RequestCoordinator, explore::ExploreController,
    geometry::LatLon,
};
use waymark_otp::otp_client::{OtpClient, OtpClientParams};

use crate::{config::ServiceConfig, console_map::ConsoleMap, parsers, plan::TripArgs};

#[derive(Args)]
pub struct ExploreArgs {
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    from: LatLon,

    /// Travel time budget, up to a day
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=1440))]
    minutes: u32,

    #[command(flatten)]
    trip: TripArgs,
}

pub async fn run(args: ExploreArgs, config: &ServiceConfig) -> Result<(), anyhow::Error> {
    let otp = Arc::new(OtpClient::new(OtpClientParams {
        otp_url: config.otp_url.clone(),
        reachable_url: config.reachable_url.clone(),
    }));
    let coordinator =
        RequestCoordinator::new(Arc::clone(&otp), otp, config.coordinator_params());
    let explore = ExploreController::new(coordinator, Arc::new(ConsoleMap));

    info!("Exploring {} minutes from {}", args.minutes, args.from);
    let destinations = explore
        .fetch_isochrone(
            args.from,
            args.trip.at,
            args.minutes,
            args.trip.trip_options(),
        )
        .await?
        .unwrap_or_default();

    if destinations.is_empty() {
        info!("No destinations reachable");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Location", "Website"]);
    for destination in &destinations {
        table.add_row(vec![
            destination.name.clone(),
            destination
                .location()
                .map_or_else(|| String::from("-"), |location| location.to_string()),
            destination.website_url.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
    Ok(())
}
