use clap::Args;
use tracing::info;
use waymark_core::geometry::LatLon;
use waymark_otp::geocoder_client::{
    DEFAULT_REVERSE_GEOCODE_DISTANCE, GeocoderClient, GeocoderClientParams,
};

use crate::{config::ServiceConfig, parsers};

#[derive(Args)]
pub struct ReverseArgs {
    /// "lat,lon"
    #[arg(value_parser = parsers::parse_lat_lon)]
    point: LatLon,

    /// Search radius in meters
    #[arg(short, long, default_value_t = DEFAULT_REVERSE_GEOCODE_DISTANCE)]
    distance: f64,
}

pub async fn run(args: ReverseArgs, config: &ServiceConfig) -> Result<(), anyhow::Error> {
    let client = GeocoderClient::new(GeocoderClientParams {
        geocoder_url: config.geocoder_url.clone(),
        distance: args.distance,
    });

    match client.reverse(&args.point).await? {
        Some(result) => println!("{} ({})", result.address, result.location),
        None => info!("No address within {}m of {}", args.distance, args.point),
    }

    Ok(())
}
