mod browse;
mod layers;
mod output;

use clap::{Parser, Subcommand};
use latte_core::{dynamic_radius_km, BoundingBox, LatLng, MapConfig};
use latte_map::{LocalStore, MapSession, ShopFeedClient, Viewport};
use tracing_subscriber::EnvFilter;

use crate::layers::LayersCommands;

#[derive(Debug, Parser)]
#[command(name = "latte")]
#[command(about = "Crypto-friendly coffee shop map from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the search radius the map would use for a viewport
    Radius {
        /// Viewport as south,west,north,east
        #[arg(long, allow_hyphen_values = true)]
        bbox: BoundingBox,
    },
    /// List user-submitted shops near a point
    Shops {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in km
        #[arg(long, default_value_t = latte_core::DEFAULT_RADIUS_KM)]
        radius: f64,
    },
    /// List OpenStreetMap shops inside a bounding box
    Osm {
        /// Bounding box as south,west,north,east
        #[arg(long, allow_hyphen_values = true)]
        bbox: BoundingBox,
    },
    /// Fetch both feeds for a viewport and print what the map would draw
    Visible {
        /// Viewport as south,west,north,east
        #[arg(long, allow_hyphen_values = true)]
        bbox: BoundingBox,
    },
    /// Show or change persisted layer toggles
    Layers {
        #[command(subcommand)]
        command: LayersCommands,
    },
    /// Stream viewports from stdin (one bbox per line) through the debounced map session
    Browse,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = latte_core::load_map_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Radius { bbox } => {
            let bounds = bbox.to_bounds();
            let center = bounds.center();
            println!(
                "center {:.5},{:.5} radius {:.2} km",
                center.lat,
                center.lng,
                dynamic_radius_km(&bounds)
            );
        }
        Commands::Shops { lat, lng, radius } => {
            let shops = feed_client(&config)?
                .nearby_shops(LatLng::new(lat, lng), radius)
                .await?;
            output::print_shops(&shops);
        }
        Commands::Osm { bbox } => {
            let shops = feed_client(&config)?.osm_shops(&bbox).await?;
            output::print_shops(&shops);
        }
        Commands::Visible { bbox } => {
            let session = MapSession::new(feed_client(&config)?, store(&config));
            let visible = session
                .refresh(&Viewport::from_bounds(bbox.to_bounds()))
                .await;
            output::print_shops(&visible);
            println!("{}", output::summary(&visible));
        }
        Commands::Layers { command } => layers::run(&store(&config), command)?,
        Commands::Browse => browse::run(&config, feed_client(&config)?, store(&config)).await?,
    }

    Ok(())
}

fn feed_client(config: &MapConfig) -> anyhow::Result<ShopFeedClient> {
    Ok(ShopFeedClient::new(
        &config.api_base_url,
        config.http_timeout_secs,
        &config.user_agent,
    )?)
}

fn store(config: &MapConfig) -> LocalStore {
    LocalStore::new(config.local_store_path.clone())
}

#[cfg(test)]
mod tests;
