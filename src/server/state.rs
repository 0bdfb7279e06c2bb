// src/server/state.rs

//! Application state for the relay server.
//!
//! Holds the address of the relay server actor. Used to share state between
//! the HTTP layer and the actor system.

use actix::Addr;
use crate::server::relay::server::RelayServer;

/// Shared application state, injected into the WebSocket handler.
pub struct AppState {
    /// Address of the relay server actor (owns the session registry).
    pub relay_addr: Addr<RelayServer>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(relay_addr: Addr<RelayServer>) -> Self {
        AppState { relay_addr }
    }
}
