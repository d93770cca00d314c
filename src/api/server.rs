// API server implementation
// Author: Gabriel Demetrios Lafis

use std::net::SocketAddr;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;

use super::routes;
use crate::format::FormatConfigProvider;
use crate::storage::DraftStorage;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn DraftStorage + Send + Sync>,
    pub format: Arc<FormatConfigProvider>,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn DraftStorage + Send + Sync>,
        format: Arc<FormatConfigProvider>,
    ) -> Self {
        AppState { storage, format }
    }
}

/// API server configuration
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            enable_cors: false,
        }
    }
}

/// API server
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new API server
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        Server { config, state }
    }

    /// Run the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let addr = addr.parse::<SocketAddr>().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid address '{}': {}", addr, e),
            )
        })?;

        let state = self.state.clone();
        let enable_cors = self.config.enable_cors;

        info!("Starting server at http://{}", addr);

        HttpServer::new(move || {
            let cors = if enable_cors {
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600)
            } else {
                Cors::default()
            };

            App::new()
                .app_data(web::Data::new(state.clone()))
                .wrap(cors)
                .configure(routes::configure)
        })
        .workers(self.config.workers.max(1))
        .bind(addr)?
        .run()
        .await
    }
}
