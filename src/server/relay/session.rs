/// WebSocket session handler for one relay connection.
///
/// This actor owns a single client's connection: it assigns the opaque
/// connection identifier, registers with the relay server on startup,
/// relays client actions inward, and serializes server messages out to the
/// socket.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::error;
use uuid::Uuid;

use super::messages::{ClientWsMessage, ServerWsMessage};
use super::server::{Connect, CreateGame, Disconnect, JoinGame, LeaveGame, RelayServer, SubmitPlay};
use super::types::ConnId;
use crate::server::ws_error::ws_error_message;

pub struct RelaySession {
    pub conn_id: ConnId,
    pub relay_addr: Addr<RelayServer>,
}

impl Actor for RelaySession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. Registers the connection with the
    /// relay server, which answers with the current session list.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.relay_addr.do_send(Connect {
            conn_id: self.conn_id,
            addr: ctx.address(),
        });
    }

    /// Called on teardown, clean or abrupt. Feeds the registry's disconnect
    /// path, which also tears down any session the connection belonged to.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.relay_addr.do_send(Disconnect {
            conn_id: self.conn_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RelaySession {
    /// Handles incoming WebSocket messages from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                // Parse the client message as JSON and forward the action.
                match serde_json::from_str::<ClientWsMessage>(&text) {
                    Ok(ClientWsMessage::CreateGame) => {
                        self.relay_addr.do_send(CreateGame {
                            conn_id: self.conn_id,
                        });
                    }
                    Ok(ClientWsMessage::JoinGame { target }) => {
                        self.relay_addr.do_send(JoinGame {
                            conn_id: self.conn_id,
                            target,
                        });
                    }
                    Ok(ClientWsMessage::LeaveGame) => {
                        self.relay_addr.do_send(LeaveGame {
                            conn_id: self.conn_id,
                        });
                    }
                    Ok(ClientWsMessage::Play { grid }) => {
                        self.relay_addr.do_send(SubmitPlay {
                            conn_id: self.conn_id,
                            grid,
                        });
                    }
                    Ok(ClientWsMessage::Ping) => {
                        // Liveness probe; nothing to forward.
                    }
                    Err(_e) => {
                        ctx.text(ws_error_message(
                            "INVALID_MESSAGE",
                            "Invalid client message",
                            None,
                        ));
                    }
                }
            }
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for RelaySession {
    type Result = ();

    /// Handles messages sent from the relay server to this session.
    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                // Serialization error: notify client and close connection.
                error!(
                    "[Relay] Failed to serialize server message for {}: {}",
                    self.conn_id, e
                );
                ctx.text(ws_error_message("INTERNAL", "Internal server error", None));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for the relay.
///
/// The connection identifier is assigned here and lives exactly as long as
/// the socket; clients never choose their own.
pub async fn ws_relay(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(
        RelaySession {
            conn_id: Uuid::new_v4(),
            relay_addr: data.relay_addr.clone(),
        },
        &req,
        stream,
    )
}
