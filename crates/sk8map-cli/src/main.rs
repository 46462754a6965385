mod console;
mod find;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sk8map-cli")]
#[command(about = "Find skateparks near a location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Locate skateparks around a position and list them nearest first.
    Find {
        /// Latitude of the search origin. Without it the position is unavailable.
        #[arg(long, env = "SK8MAP_HOME_LAT", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of the search origin.
        #[arg(long, env = "SK8MAP_HOME_LON", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Override `SK8MAP_SEARCH_RADIUS_MILES`.
        #[arg(long)]
        radius_miles: Option<f64>,
        /// Hide parks tagged `indoor=yes`.
        #[arg(long)]
        hide_indoor: bool,
        /// Hide parks not tagged as indoor.
        #[arg(long)]
        hide_outdoor: bool,
        /// Center the map on this park id after listing.
        #[arg(long)]
        focus: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let radius_miles = match &cli.command {
        Some(Commands::Find { radius_miles, .. }) => *radius_miles,
        None => None,
    };
    let config = find::load_config(radius_miles)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Find {
            lat,
            lon,
            hide_indoor,
            hide_outdoor,
            focus,
            ..
        }) => {
            let args = find::FindArgs {
                origin: lat.zip(lon).map(sk8map_core::Coordinate::from),
                hide_indoor,
                hide_outdoor,
                focus,
            };
            find::run_find(&config, &args).await?;
        }
        None => println!("sk8map-cli ready; run `sk8map-cli find --help`"),
    }

    Ok(())
}
