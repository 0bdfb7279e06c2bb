//! HTTP and WebSocket routing configuration.
//!
//! The single WebSocket endpoint is the whole public surface; every game
//! action travels over it as a JSON frame.

use actix_web::web;
use crate::server::relay::session::ws_relay;

/// Configure the application's routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ws")
            .to(ws_relay)
    );
}
