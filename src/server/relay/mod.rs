/// Relay module: session registry, game state machine, and the WebSocket
/// actors that feed them.

pub mod types;
pub mod game;
pub mod registry;
pub mod messages;
pub mod server;
pub mod session;
