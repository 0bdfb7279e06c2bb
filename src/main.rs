//! Main entry point for the relay server.
//!
//! Initializes the actor system, resolves configuration from the environment,
//! and launches the HTTP server with the WebSocket relay endpoint.

use std::time::{Duration, Instant};

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use config::server::ServerConfig;
use server::relay::server::RelayServer;

pub mod config;
mod server;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (RUST_LOG).
    env_logger::init();

    let cfg = ServerConfig::from_env();

    // Start the relay server actor (owns the session registry).
    let relay_addr = RelayServer::new().start();

    // Shared application state for the WebSocket handler.
    let state = web::Data::new(server::state::AppState::new(relay_addr));

    // Periodic liveness log, unrelated to the game core.
    let started = Instant::now();
    let heartbeat_secs = cfg.heartbeat_secs;
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(heartbeat_secs));
        // The first tick completes immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!("[App] Alive for {}s", started.elapsed().as_secs());
        }
    });

    let cors_origin = cfg.cors_origin.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", cors_origin.as_str()))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(server::router::config)
    })
    .bind(("0.0.0.0", cfg.port));

    let server = match server {
        Ok(server) => {
            info!("[App] Server started on port {}", cfg.port);
            server
        }
        Err(e) => {
            error!("[App] Could not bind port {}: {}", cfg.port, e);
            return Err(e);
        }
    };

    server.run().await
}
