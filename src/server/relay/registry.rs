//! Session registry: the single source of truth for "who is playing what".
//!
//! Plain data, no actor machinery. Every inbound connection event maps to one
//! method; each runs lookup, mutation, and delivery-list construction to
//! completion before the next event is applied (the owning actor's mailbox
//! provides that serialization). Methods return the deliveries the transport
//! must perform instead of sending anything themselves, which lets tests
//! drive the registry directly.

use log::{debug, info};

use super::game::GameSession;
use super::messages::{GameSnapshot, ServerWsMessage};
use super::types::{ConnId, Grid};

/// One outbound send the caller must perform.
pub type Delivery = (ConnId, ServerWsMessage);

pub struct GameRegistry {
    /// Currently connected connection ids.
    connections: Vec<ConnId>,
    /// Live sessions. A connection id appears in at most one member list.
    games: Vec<GameSession>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            connections: Vec::new(),
            games: Vec::new(),
        }
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Snapshot of every live session.
    pub fn snapshot(&self) -> Vec<GameSnapshot> {
        self.games.iter().map(GameSnapshot::from).collect()
    }

    /// Linear scan for the session containing `id`. The membership invariant
    /// guarantees at most one match, so ordering among sessions is
    /// irrelevant. O(sessions); session counts stay small here.
    fn position_of(&self, id: &ConnId) -> Option<usize> {
        self.games.iter().position(|g| g.contains(id))
    }

    /// Append an updated-games broadcast for every connected id.
    fn push_games_broadcast(&self, deliveries: &mut Vec<Delivery>) {
        let games = self.snapshot();
        for conn in &self.connections {
            deliveries.push((
                *conn,
                ServerWsMessage::UpdatedGames {
                    games: games.clone(),
                },
            ));
        }
    }

    /// Tear down the session at `index`: drop it from the live set, notify
    /// every former member, and re-broadcast the session list.
    fn end_game(&mut self, index: usize, deliveries: &mut Vec<Delivery>) {
        let game = self.games.remove(index);
        info!(
            "[Relay] Game {} ended. Live games: {}",
            game.id,
            self.games.len()
        );
        for member in game.end() {
            deliveries.push((member, ServerWsMessage::LeftGame));
        }
        self.push_games_broadcast(deliveries);
    }

    /// A connection came up: record it and send it the current session list.
    /// Re-registration of a live id is not expected from the transport but
    /// leaves the connected set unchanged.
    pub fn connect(&mut self, id: ConnId) -> Vec<Delivery> {
        if !self.connections.contains(&id) {
            self.connections.push(id);
        }
        info!(
            "[Relay] New connection {}. Live connections: {}",
            id,
            self.connections.len()
        );
        vec![(
            id,
            ServerWsMessage::UpdatedGames {
                games: self.snapshot(),
            },
        )]
    }

    /// Create a pending session owned by `id`, unless it already has one.
    pub fn create(&mut self, id: ConnId) -> Vec<Delivery> {
        if self.position_of(&id).is_some() {
            debug!("[Relay] Create denied for {}: already in a game", id);
            return vec![(id, ServerWsMessage::DeniedCreate)];
        }
        let game = GameSession::new(id);
        let game_id = game.id;
        self.games.push(game);
        info!(
            "[Relay] Game {} created by {}. Live games: {}",
            game_id,
            id,
            self.games.len()
        );
        let mut deliveries = vec![(id, ServerWsMessage::CreateSuccess)];
        self.push_games_broadcast(&mut deliveries);
        deliveries
    }

    /// Seat `id` in the pending session that has `target` as a member and
    /// start the game. `target == id` is allowed: the caller joins its own
    /// pending session and plays both sides.
    ///
    /// The session list is re-broadcast whether the join succeeds or not.
    pub fn join(&mut self, id: ConnId, target: ConnId) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        let found = self
            .games
            .iter()
            .position(|g| !g.in_progress && g.contains(&target));
        // A joiner already seated in a different session would end up in two
        // member lists at once; deny instead. Joining one's own pending
        // session stays allowed.
        let seated_elsewhere = self.position_of(&id).is_some_and(|p| Some(p) != found);
        match found {
            Some(index) if !seated_elsewhere => {
                let game = &mut self.games[index];
                let members = game.start(id);
                let snapshot = GameSnapshot::from(&*game);
                info!(
                    "[Relay] {} joined game {} of {}. Starting",
                    id, snapshot.id, target
                );
                for member in members {
                    deliveries.push((member, ServerWsMessage::StartGame));
                    deliveries.push((
                        member,
                        ServerWsMessage::UpdateGameState {
                            game: snapshot.clone(),
                        },
                    ));
                }
            }
            _ => {
                debug!("[Relay] Join denied for {}: no joinable game of {}", id, target);
                deliveries.push((id, ServerWsMessage::DeniedGame));
            }
        }
        self.push_games_broadcast(&mut deliveries);
        deliveries
    }

    /// Voluntary leave: tears down the whole session `id` belongs to. A
    /// sender with no session is a no-op.
    pub fn leave(&mut self, id: ConnId) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        if let Some(index) = self.position_of(&id) {
            self.end_game(index, &mut deliveries);
        }
        deliveries
    }

    /// Relay a play to the sender's session.
    ///
    /// The sender is not checked against the turn holder: any member may
    /// submit, and the turn flips to the non-holding member afterwards. A
    /// sender with no session gets a lone forced leave-game directive and
    /// nothing is mutated.
    pub fn play(&mut self, id: ConnId, grid: Grid) -> Vec<Delivery> {
        let game = match self.position_of(&id) {
            Some(index) => &mut self.games[index],
            None => {
                debug!("[Relay] Play from {} with no game; redirecting out", id);
                return vec![(id, ServerWsMessage::LeaveGame)];
            }
        };
        let members = game.submit_play(grid);
        let snapshot = GameSnapshot::from(&*game);
        debug!(
            "[Relay] Play by {} in game {}. Turn passes to {:?}",
            id, snapshot.id, snapshot.turn
        );
        members
            .into_iter()
            .map(|member| {
                (
                    member,
                    ServerWsMessage::UpdateGameState {
                        game: snapshot.clone(),
                    },
                )
            })
            .collect()
    }

    /// A connection went down: same teardown as `leave`, then forget the id.
    pub fn disconnect(&mut self, id: ConnId) -> Vec<Delivery> {
        let deliveries = self.leave(id);
        self.connections.retain(|c| c != &id);
        info!(
            "[Relay] Disconnection by {}. Live connections: {}",
            id,
            self.connections.len()
        );
        deliveries
    }
}
