// API server example
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use dashboard_config_engine::{
    api::{AppState, Server, ServerConfig},
    format,
    storage::MemoryStorage,
    utils::init_logging,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    if let Err(err) = init_logging(log::LevelFilter::Info, None) {
        eprintln!("Error initializing logger: {}", err);
    }

    // Drafts live in memory; preferences use the process-wide provider
    let state = AppState::new(Arc::new(MemoryStorage::new()), format::global());

    // Create server config
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        workers: num_cpus::get(),
        enable_cors: true,
    };

    // Create and run server
    println!("Starting API server at http://{}:{}", config.host, config.port);
    println!("Try: curl http://{}:{}/api/v1/widgets/types", config.host, config.port);
    println!("Press Ctrl+C to stop");

    let server = Server::new(state, config);
    server.run().await
}
