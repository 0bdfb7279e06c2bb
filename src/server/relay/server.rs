/// Relay server actor.
///
/// Owns the session registry and the map from connection id to live
/// WebSocket session. One actor message per inbound connection event; the
/// actor mailbox serializes them, so each event's lookup, mutation, and
/// delivery-list construction runs to completion before the next one starts.
/// The sends themselves happen after mutation and are fire-and-forget.

use actix::prelude::*;
use std::collections::HashMap;

use super::registry::{Delivery, GameRegistry};
use super::session::RelaySession;
use super::types::{ConnId, Grid};

type SessionAddr = Addr<RelaySession>;

pub struct RelayServer {
    registry: GameRegistry,
    sessions: HashMap<ConnId, SessionAddr>,
}

impl RelayServer {
    pub fn new() -> Self {
        Self {
            registry: GameRegistry::new(),
            sessions: HashMap::new(),
        }
    }

    /// Perform the sends a registry operation produced. A delivery addressed
    /// to an id whose session is already gone is dropped silently.
    fn dispatch(&self, deliveries: Vec<Delivery>) {
        for (conn_id, msg) in deliveries {
            if let Some(addr) = self.sessions.get(&conn_id) {
                addr.do_send(msg);
            }
        }
    }
}

/// Message: a WebSocket session came up.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub conn_id: ConnId,
    pub addr: SessionAddr,
}

/// Message: a WebSocket session went down.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub conn_id: ConnId,
}

/// Message: the client asked to create a game.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CreateGame {
    pub conn_id: ConnId,
}

/// Message: the client asked to join the pending game of `target`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct JoinGame {
    pub conn_id: ConnId,
    pub target: ConnId,
}

/// Message: the client asked to leave its game.
#[derive(Message)]
#[rtype(result = "()")]
pub struct LeaveGame {
    pub conn_id: ConnId,
}

/// Message: the client submitted a board update.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SubmitPlay {
    pub conn_id: ConnId,
    pub grid: Grid,
}

impl Actor for RelayServer {
    type Context = Context<Self>;
}

impl Handler<Connect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        self.sessions.insert(msg.conn_id, msg.addr);
        let deliveries = self.registry.connect(msg.conn_id);
        self.dispatch(deliveries);
    }
}

impl Handler<Disconnect> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        let deliveries = self.registry.disconnect(msg.conn_id);
        self.sessions.remove(&msg.conn_id);
        self.dispatch(deliveries);
    }
}

impl Handler<CreateGame> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: CreateGame, _ctx: &mut Self::Context) -> Self::Result {
        let deliveries = self.registry.create(msg.conn_id);
        self.dispatch(deliveries);
    }
}

impl Handler<JoinGame> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: JoinGame, _ctx: &mut Self::Context) -> Self::Result {
        let deliveries = self.registry.join(msg.conn_id, msg.target);
        self.dispatch(deliveries);
    }
}

impl Handler<LeaveGame> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: LeaveGame, _ctx: &mut Self::Context) -> Self::Result {
        let deliveries = self.registry.leave(msg.conn_id);
        self.dispatch(deliveries);
    }
}

impl Handler<SubmitPlay> for RelayServer {
    type Result = ();

    fn handle(&mut self, msg: SubmitPlay, _ctx: &mut Self::Context) -> Self::Result {
        let deliveries = self.registry.play(msg.conn_id, msg.grid);
        self.dispatch(deliveries);
    }
}
