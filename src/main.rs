// Dashboard Configuration Engine - Main executable
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use log::{error, info, warn};

use dashboard_config_engine::{
    api::{AppState, Server, ServerConfig},
    dashboard::{calculate_next_position, validate_config, Dashboard, DashboardFormConfig, LayoutItem, ValidationMessages, GRID_COLS},
    format::{self, PreferenceSync, StoragePreferenceSink},
    storage::{DraftStorage, FileStorage, MemoryStorage},
    style::{generate_accessible_colors, get_contrast_ratio, has_good_contrast, has_good_contrast_large_text},
    utils::{init_logging, validate_color, Config, StorageType},
};

const DEFAULT_DRAFT_DIR: &str = "./drafts";

fn cli() -> Command<'static> {
    Command::new("Dashboard Configuration Engine")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Widget configuration and layout engine for dashboard builders")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .subcommand(
            Command::new("server")
                .about("Run the API server")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Sets the server host")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Sets the server port")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("contrast")
                .about("Contrast ratio between two colors")
                .arg(Arg::new("foreground").required(true).help("Text color"))
                .arg(Arg::new("background").required(true).help("Background color")),
        )
        .subcommand(
            Command::new("palette")
                .about("Readable chart colors for a background")
                .arg(Arg::new("background").required(true).help("Background color")),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a dashboard JSON file")
                .arg(Arg::new("dashboard").required(true).value_name("DASHBOARD_JSON")),
        )
        .subcommand(
            Command::new("next-position")
                .about("Next free grid position for a layout JSON file")
                .arg(Arg::new("layout").required(true).value_name("LAYOUT_JSON"))
                .arg(
                    Arg::new("cols")
                        .long("cols")
                        .value_name("COLS")
                        .help("Number of grid columns")
                        .takes_value(true),
                ),
        )
}

fn build_storage(config: &Config) -> Arc<dyn DraftStorage + Send + Sync> {
    match config.storage.type_ {
        StorageType::File => {
            let path = config
                .storage
                .path
                .clone()
                .unwrap_or_else(|| DEFAULT_DRAFT_DIR.to_string());

            match FileStorage::new(&path) {
                Ok(storage) => Arc::new(storage),
                Err(err) => {
                    error!("Error creating file storage at {}: {}", path, err);
                    Arc::new(MemoryStorage::new())
                }
            }
        }
        StorageType::Memory => Arc::new(MemoryStorage::new()),
    }
}

async fn run_server(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let host = matches.value_of("host").unwrap_or(&config.server.host);
    let port = match matches.value_of("port") {
        Some(port) => port
            .parse::<u16>()
            .with_context(|| format!("Invalid port '{}'", port))?,
        None => config.server.port,
    };

    let storage = build_storage(config);
    let provider = format::global();
    provider.set(config.format.clone());

    let sink = Arc::new(StoragePreferenceSink::new(storage.clone()));
    let sync = Arc::new(
        PreferenceSync::new(provider.clone(), sink.clone())
            .with_delay(config.preferences.debounce()),
    );
    match sink.load() {
        Ok(Some(saved)) => sync.apply_remote(saved),
        Ok(None) => {}
        Err(err) => warn!("Could not load saved preferences: {}", err),
    }
    sync.watch();

    let server_config = ServerConfig {
        host: host.to_string(),
        port,
        workers: config.server.workers.unwrap_or_else(num_cpus::get),
        enable_cors: config.server.enable_cors,
    };

    info!("Starting server at {}:{}", host, port);
    let server = Server::new(AppState::new(storage, provider), server_config);
    server.run().await?;

    if let Err(err) = sync.flush() {
        error!("Final preference push failed: {}", err);
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let contents = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Cannot read {}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    // Load configuration
    let config = match matches.value_of("config") {
        Some(config_path) => match Config::from_file(config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading config file: {}", err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    // Initialize logging
    let log_file = config.logging.file.as_deref().map(Path::new);
    if let Err(err) = init_logging(config.log_level_filter(), log_file) {
        eprintln!("Error initializing logger: {}", err);
    }

    match matches.subcommand() {
        Some(("server", sub)) => run_server(&config, sub).await?,
        Some(("contrast", sub)) => {
            let foreground = sub.value_of("foreground").unwrap_or_default();
            let background = sub.value_of("background").unwrap_or_default();
            for (name, color) in [("foreground", foreground), ("background", background)] {
                validate_color(color, name).map_err(anyhow::Error::msg)?;
            }

            println!("Contrast ratio: {:.2}:1", get_contrast_ratio(foreground, background));
            println!("AA normal text: {}", if has_good_contrast(foreground, background) { "pass" } else { "fail" });
            println!("AA large text:  {}", if has_good_contrast_large_text(foreground, background) { "pass" } else { "fail" });
        }
        Some(("palette", sub)) => {
            let background = sub.value_of("background").unwrap_or_default();
            validate_color(background, "background").map_err(anyhow::Error::msg)?;

            let palette = generate_accessible_colors(background);
            println!("{}", serde_json::to_string_pretty(&palette)?);
        }
        Some(("validate", sub)) => {
            let dashboard: Dashboard = read_json(sub.value_of("dashboard").unwrap_or_default())?;
            let form = DashboardFormConfig::from_dashboard(&dashboard);
            let errors = validate_config(&form, &ValidationMessages::default());

            if !errors.is_empty() {
                for (field, message) in &errors {
                    println!("{}: {}", field, message);
                }
                bail!("dashboard has {} invalid field(s)", errors.len());
            }
            println!("Dashboard is valid");
        }
        Some(("next-position", sub)) => {
            let layout: Vec<LayoutItem> = read_json(sub.value_of("layout").unwrap_or_default())?;
            let cols = match sub.value_of("cols") {
                Some(cols) => cols
                    .parse::<u32>()
                    .with_context(|| format!("Invalid column count '{}'", cols))?,
                None => GRID_COLS,
            };

            let position = calculate_next_position(&layout, cols);
            println!("{}", serde_json::to_string(&position)?);
        }
        _ => println!("No subcommand specified. Use --help for usage information."),
    }

    Ok(())
}
