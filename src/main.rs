use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use landslide_risk::sources::Location;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch live data for a point and predict landslide risk
    Predict {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Simulated precipitation in mm, replacing the live reading
        #[arg(long)]
        rain: Option<f64>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
        /// Skip the prediction cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Run the engine on a feature set JSON file (stdin when omitted)
    Evaluate {
        file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve POST /predict over HTTP
    Serve {
        /// Bind address (defaults to server.host from config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (defaults to server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Skip the prediction cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Write a config file interactively
    Init,
    /// Remove all cached predictions
    ClearCache,
}

#[derive(Parser, Debug)]
#[command(name = "landslide-risk")]
#[command(about = "Landslide risk from live weather, soil and terrain data", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/landslide-risk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn read_features(file: Option<PathBuf>) -> anyhow::Result<landslide_risk::risk::FeatureSet> {
    use anyhow::Context;

    let content = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid feature set JSON")
}

fn print_json<T: serde::Serialize>(value: &T) {
    match landslide_risk::output::format_json(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

/// Load and validate config, exiting with EXIT_CONFIG on any problem
fn load_validated_config(path: Option<PathBuf>) -> landslide_risk::config::Config {
    let config = match landslide_risk::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = landslide_risk::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    landslide_risk::debug_eprintln!(
        "Sources: weather {}, soil {}, elevation {} (timeout {}, {} retries)",
        config.sources.weather_url,
        config.sources.soil_url,
        config.sources.elevation_url,
        config.sources.timeout,
        config.sources.retries
    );

    config
}

fn predict_context(
    config: &landslide_risk::config::Config,
    use_cache: bool,
) -> landslide_risk::service::PredictContext {
    match landslide_risk::service::PredictContext::new(config, use_cache) {
        Ok(ctx) => {
            landslide_risk::debug_eprintln!(
                "Cache: {}",
                if ctx.cache_enabled() { "enabled" } else { "disabled" }
            );
            ctx
        }
        Err(e) => {
            eprintln!("Failed to set up prediction: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    landslide_risk::diag::set_verbose(cli.verbose);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Predict {
            lat,
            lng,
            rain,
            json,
            no_cache,
        } => {
            let config = load_validated_config(config_path);
            let ctx = predict_context(&config, !no_cache);

            let response =
                match landslide_risk::service::predict(&ctx, Location { lat, lng }, rain).await {
                    Ok(r) => r,
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                };

            if json {
                print_json(&response);
            } else {
                let use_colors = landslide_risk::output::should_use_colors();
                println!(
                    "{}",
                    landslide_risk::output::format_response(&response, use_colors)
                );
            }

            landslide_risk::debug_eprintln!("Done in {:?}", start_time.elapsed());
        }
        Commands::Evaluate { file, json } => {
            let features = match read_features(file) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            let prediction = landslide_risk::risk::evaluate(&features);
            if json {
                print_json(&prediction);
            } else {
                let use_colors = landslide_risk::output::should_use_colors();
                println!(
                    "{}",
                    landslide_risk::output::format_prediction(&prediction, use_colors)
                );
            }
        }
        Commands::Serve {
            host,
            port,
            no_cache,
        } => {
            let config = load_validated_config(config_path);
            let ctx = predict_context(&config, !no_cache);
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            if let Err(e) = landslide_risk::server::serve(ctx, &host, port).await {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_NETWORK);
            }
        }
        Commands::Init => {
            if let Err(e) = landslide_risk::config::init::run_init_wizard(config_path) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::ClearCache => {
            let path = landslide_risk::cache::get_cache_path();
            if let Err(e) = landslide_risk::cache::clear_cache(&path) {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Cleared {}", path.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
