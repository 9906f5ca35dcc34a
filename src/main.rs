use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use tripcarbon::maps::MapsProvider;
use tripcarbon::resolver::ResolverSettings;
use tripcarbon::{
    DistanceResolver, GoogleMapsClient, OfflineRouteTable, StaticMaps, TripCalculator,
    TripCarbonConfig, TripList, TripRequest, logging, report,
};

/// Multi-modal travel distance and CO2 emission estimator
#[derive(Debug, Parser)]
#[command(name = "tripcarbon", version, about)]
struct Cli {
    /// Configuration file (defaults to <config dir>/tripcarbon/config.toml)
    #[arg(long, global = true, env = "TRIPCARBON_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate distance and emissions for one or more trips
    Estimate {
        /// Trip as ORIGIN,DESTINATION,MODE[,VEHICLE]; repeat for more trips
        #[arg(long = "trip", required = true)]
        trips: Vec<TripRequest>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Answer maps lookups from a JSON fixture instead of the live service
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Airport-to-airport distance from the offline route table
    AirDistance { origin: String, destination: String },
    /// Print the emission factor table
    Factors,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TripCarbonConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Factors => {
            print!("{}", report::render_factors());
        }
        Command::AirDistance {
            origin,
            destination,
        } => {
            let offline = load_offline_table(&config)
                .with_context(|| "The air-distance command needs the offline route table")?;
            match offline.air_distance_by_city(&origin, &destination) {
                Some(km) => println!("{origin} → {destination}: {km:.2} km"),
                None => bail!("Air distance data not available for {origin} → {destination}"),
            }
        }
        Command::Estimate {
            trips,
            json,
            fixture,
        } => {
            let offline = load_offline_table(&config).unwrap_or_else(|e| {
                warn!("{e}; air distances will use airport coordinates only");
                OfflineRouteTable::default()
            });

            let maps: Box<dyn MapsProvider> = match fixture {
                Some(path) => Box::new(StaticMaps::from_json_file(&path)?),
                None => Box::new(GoogleMapsClient::new(&config.maps)?),
            };

            let resolver =
                DistanceResolver::new(maps.as_ref(), &offline, ResolverSettings::from(&config));
            let trips: TripList = trips.into_iter().collect();
            let result = TripCalculator::new(resolver).calculate(&trips).await;

            if json {
                println!("{}", report::render_json(&result)?);
            } else {
                print!("{}", report::render_text(&result));
            }
        }
    }

    Ok(())
}

fn load_offline_table(config: &TripCarbonConfig) -> Result<OfflineRouteTable> {
    let table = OfflineRouteTable::from_paths(
        Path::new(&config.data.airports_csv),
        Path::new(&config.data.routes_csv),
    )?;
    Ok(table)
}
