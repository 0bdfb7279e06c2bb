use actix::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::GameSession;
use super::types::{ConnId, Grid};

/// Public view of one session, as carried by the session list and state
/// updates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub members: Vec<ConnId>,
    pub in_progress: bool,
    pub turn: Option<ConnId>,
    pub piece: i8,
    pub grid: Option<Grid>,
}

impl From<&GameSession> for GameSnapshot {
    fn from(game: &GameSession) -> Self {
        Self {
            id: game.id,
            members: game.members.clone(),
            in_progress: game.in_progress,
            turn: game.turn,
            piece: game.piece,
            grid: game.grid.clone(),
        }
    }
}

// Message client -> serveur
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ClientWsMessage {
    CreateGame,
    JoinGame { target: ConnId },
    LeaveGame,
    Play { grid: Grid },
    Ping,
}

// Message serveur -> client
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    /// Full list of live sessions; sent to one connection right after it
    /// comes up and broadcast whenever membership changes.
    UpdatedGames { games: Vec<GameSnapshot> },
    /// Create refused: the sender already belongs to a session.
    DeniedCreate,
    /// Create accepted; the pending session is waiting for an opponent.
    CreateSuccess,
    /// Join refused: no pending session has the target as a member.
    DeniedGame,
    /// The sender's session has started.
    StartGame,
    /// Current state of the sender's session.
    UpdateGameState { game: GameSnapshot },
    /// The sender's session has ended.
    LeftGame,
    /// Directive: the sender has no session and should leave the game view.
    LeaveGame,
}
