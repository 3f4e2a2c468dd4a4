use clap::Args;
use waymark_core::{
    geometry::LatLon,
    waypoints::waypoint_editor::{RouteEndpoints, compute_insertion_index},
};

use crate::parsers;

#[derive(Args)]
pub struct InsertIndexArgs {
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    origin: LatLon,

    #[arg(long, value_parser = parsers::parse_lat_lon)]
    destination: LatLon,

    /// Existing waypoint in route order, can be repeated
    #[arg(long = "waypoint", value_parser = parsers::parse_lat_lon)]
    waypoints: Vec<LatLon>,

    /// Where the drag off the route line started
    #[arg(long, value_parser = parsers::parse_lat_lon)]
    drag: LatLon,
}

pub fn run(args: InsertIndexArgs) {
    let endpoints = RouteEndpoints {
        origin: args.origin,
        destination: args.destination,
    };

    println!(
        "{}",
        compute_insertion_index(&endpoints, &args.waypoints, &args.drag)
    );
}
