use clap::{CommandFactory, Parser, Subcommand};

use crate::{
    config::ServiceConfig, explore::ExploreArgs, insert_index::InsertIndexArgs, plan::PlanArgs,
    reverse::ReverseArgs,
};

mod config;
mod console_map;
mod explore;
mod insert_index;
mod parsers;
mod plan;
mod reverse;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip, optionally editing it by dragging in a new waypoint
    #[command(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        args: PlanArgs,
    },
    /// List destinations reachable within a travel time
    Explore {
        #[command(flatten)]
        args: ExploreArgs,
    },
    /// Find the address closest to a point
    Reverse {
        #[command(flatten)]
        args: ReverseArgs,
    },
    /// Where a waypoint dragged off the route would be inserted
    InsertIndex {
        #[command(flatten)]
        args: InsertIndexArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = ServiceConfig::from_env()?;

    match cli.command {
        Some(Commands::Plan { args }) => plan::run(args, &config).await?,
        Some(Commands::Explore { args }) => explore::run(args, &config).await?,
        Some(Commands::Reverse { args }) => reverse::run(args, &config).await?,
        Some(Commands::InsertIndex { args }) => insert_index::run(args),
        None => Cli::command().print_help()?,
    }

    Ok(())
}
