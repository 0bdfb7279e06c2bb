//! Game session state machine.
//!
//! One match between up to two connections. Plain data: transitions are only
//! ever invoked from within a registry operation, so the struct carries no
//! locking or actor machinery of its own.

use uuid::Uuid;

use super::types::{ConnId, Grid};
use crate::config::game::STARTING_PIECE;

pub struct GameSession {
    /// Server-assigned tag, used in logs and the public session list.
    pub id: Uuid,
    /// Member connection ids, creator first. Length 1 until the game starts.
    pub members: Vec<ConnId>,
    /// True once a second member has joined. Never reverts; an ended session
    /// is destroyed by the registry instead.
    pub in_progress: bool,
    /// Connection expected to submit the next play. Unset before start.
    pub turn: Option<ConnId>,
    /// Alternating token (+1/-1) for the mark of the next play.
    pub piece: i8,
    /// Last submitted board, verbatim from the client.
    pub grid: Option<Grid>,
}

impl GameSession {
    /// Create a pending session with `creator` as its only member.
    pub fn new(creator: ConnId) -> Self {
        Self {
            id: Uuid::new_v4(),
            members: vec![creator],
            in_progress: false,
            turn: None,
            piece: STARTING_PIECE,
            grid: None,
        }
    }

    /// Whether `id` is currently a member.
    pub fn contains(&self, id: &ConnId) -> bool {
        self.members.iter().any(|m| m == id)
    }

    /// Start the game by seating a second member.
    ///
    /// The registry only calls this on a pending session with exactly one
    /// member. The turn goes to the creator and the piece resets to the
    /// starting token. Returns both members so the caller can notify them.
    pub fn start(&mut self, joiner: ConnId) -> Vec<ConnId> {
        self.members.push(joiner);
        self.in_progress = true;
        self.turn = Some(self.members[0]);
        self.piece = STARTING_PIECE;
        self.members.clone()
    }

    /// Accept a play: overwrite the board, hand the turn to the other
    /// member, flip the piece. The registry checks sender membership before
    /// delegating here. Returns the members to notify.
    pub fn submit_play(&mut self, grid: Grid) -> Vec<ConnId> {
        self.grid = Some(grid);
        self.turn = Some(self.next_turn_holder());
        self.piece = -self.piece;
        self.members.clone()
    }

    /// End of life: returns every member to notify. Removal from the live
    /// set is the registry's job, not the session's.
    pub fn end(&self) -> Vec<ConnId> {
        self.members.clone()
    }

    /// The member who does not currently hold the turn.
    ///
    /// Computed by position rather than identifier inequality so a session
    /// whose two seats hold the same identifier (self-join) keeps a defined
    /// turn holder. An unset turn hands the first play to the creator.
    fn next_turn_holder(&self) -> ConnId {
        match self.turn {
            Some(current) if current == self.members[0] && self.members.len() > 1 => {
                self.members[1]
            }
            _ => self.members[0],
        }
    }
}
