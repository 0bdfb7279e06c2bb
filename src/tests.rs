use serde_json::json;
use uuid::Uuid;

use crate::config::game::STARTING_PIECE;
use crate::server::relay::game::GameSession;
use crate::server::relay::messages::ServerWsMessage;
use crate::server::relay::registry::{Delivery, GameRegistry};
use crate::server::relay::types::{ConnId, Grid};

fn conn() -> ConnId {
    Uuid::new_v4()
}

fn board(mark: i8) -> Grid {
    json!([[mark, 0, 0], [0, -mark, 0], [0, 0, 0]])
}

/// Deliveries addressed to `id`, messages only.
fn sent_to(deliveries: &[Delivery], id: ConnId) -> Vec<&ServerWsMessage> {
    deliveries
        .iter()
        .filter(|(to, _)| *to == id)
        .map(|(_, msg)| msg)
        .collect()
}

fn started_pair(registry: &mut GameRegistry) -> (ConnId, ConnId) {
    let (a, b) = (conn(), conn());
    registry.connect(a);
    registry.connect(b);
    registry.create(a);
    registry.join(b, a);
    (a, b)
}

#[test]
fn test_connect_delivers_session_list_to_newcomer_only() {
    let mut registry = GameRegistry::new();
    let a = conn();
    registry.connect(a);
    registry.create(a);

    let b = conn();
    let deliveries = registry.connect(b);
    assert_eq!(deliveries.len(), 1);
    match &deliveries[0] {
        (to, ServerWsMessage::UpdatedGames { games }) => {
            assert_eq!(*to, b);
            assert_eq!(games.len(), 1);
            assert_eq!(games[0].members, vec![a]);
            assert!(!games[0].in_progress);
        }
        other => panic!("unexpected delivery {:?}", other),
    }
}

#[test]
fn test_connect_twice_does_not_duplicate() {
    let mut registry = GameRegistry::new();
    let a = conn();
    registry.connect(a);
    registry.connect(a);
    assert_eq!(registry.connection_count(), 1);
}

#[test]
fn test_create_registers_pending_game() {
    let mut registry = GameRegistry::new();
    let a = conn();
    registry.connect(a);

    let deliveries = registry.create(a);
    assert!(sent_to(&deliveries, a).contains(&&ServerWsMessage::CreateSuccess));
    // Membership change is broadcast to every connected id.
    assert!(sent_to(&deliveries, a)
        .iter()
        .any(|msg| matches!(msg, ServerWsMessage::UpdatedGames { games } if games.len() == 1)));

    let games = registry.snapshot();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].members, vec![a]);
    assert!(!games[0].in_progress);
    assert_eq!(games[0].turn, None);
}

#[test]
fn test_create_denied_when_already_in_game() {
    let mut registry = GameRegistry::new();
    let a = conn();
    registry.connect(a);
    registry.create(a);

    let deliveries = registry.create(a);
    assert_eq!(deliveries, vec![(a, ServerWsMessage::DeniedCreate)]);
    // Idempotent failure: the session set is untouched.
    assert_eq!(registry.game_count(), 1);
}

#[test]
fn test_join_starts_pending_game() {
    let mut registry = GameRegistry::new();
    let (a, b) = (conn(), conn());
    registry.connect(a);
    registry.connect(b);
    registry.create(a);

    let deliveries = registry.join(b, a);
    for id in [a, b] {
        let msgs = sent_to(&deliveries, id);
        assert!(msgs.contains(&&ServerWsMessage::StartGame));
        assert!(msgs
            .iter()
            .any(|msg| matches!(msg, ServerWsMessage::UpdateGameState { .. })));
    }

    let games = registry.snapshot();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].members, vec![a, b]);
    assert!(games[0].in_progress);
    // The creator opens the game.
    assert_eq!(games[0].turn, Some(a));
    assert_eq!(games[0].piece, STARTING_PIECE);
}

#[test]
fn test_join_denied_without_pending_target() {
    let mut registry = GameRegistry::new();
    let (a, b) = (conn(), conn());
    registry.connect(a);
    registry.connect(b);

    let deliveries = registry.join(b, a);
    assert!(sent_to(&deliveries, b).contains(&&ServerWsMessage::DeniedGame));
    // The session list goes out even on denial.
    assert!(sent_to(&deliveries, a)
        .iter()
        .any(|msg| matches!(msg, ServerWsMessage::UpdatedGames { .. })));
    assert_eq!(registry.game_count(), 0);
}

#[test]
fn test_join_denied_for_in_progress_game() {
    let mut registry = GameRegistry::new();
    let (a, _b) = started_pair(&mut registry);

    let c = conn();
    registry.connect(c);
    let deliveries = registry.join(c, a);
    assert!(sent_to(&deliveries, c).contains(&&ServerWsMessage::DeniedGame));
    assert_eq!(registry.snapshot()[0].members.len(), 2);
}

#[test]
fn test_join_denied_when_joiner_seated_elsewhere() {
    let mut registry = GameRegistry::new();
    let (a, b) = (conn(), conn());
    registry.connect(a);
    registry.connect(b);
    registry.create(a);
    registry.create(b);

    // Seating b in a's game would put b in two member lists at once.
    let deliveries = registry.join(b, a);
    assert!(sent_to(&deliveries, b).contains(&&ServerWsMessage::DeniedGame));
    let games = registry.snapshot();
    assert_eq!(games.len(), 2);
    assert!(games.iter().all(|g| !g.in_progress));
}

#[test]
fn test_self_join_starts_solo_game() {
    let mut registry = GameRegistry::new();
    let a = conn();
    registry.connect(a);
    registry.create(a);

    // Joining one's own pending session is allowed; both seats hold a.
    let deliveries = registry.join(a, a);
    assert!(sent_to(&deliveries, a).contains(&&ServerWsMessage::StartGame));
    let games = registry.snapshot();
    assert_eq!(games[0].members, vec![a, a]);
    assert!(games[0].in_progress);
    assert_eq!(games[0].turn, Some(a));

    // The turn holder stays defined even with duplicate seats.
    registry.play(a, board(1));
    assert_eq!(registry.snapshot()[0].turn, Some(a));
}

#[test]
fn test_play_alternates_turn_and_piece() {
    let mut registry = GameRegistry::new();
    let (a, b) = started_pair(&mut registry);

    let first = board(1);
    let deliveries = registry.play(a, first.clone());
    assert_eq!(deliveries.len(), 2);
    for id in [a, b] {
        match sent_to(&deliveries, id)[..] {
            [ServerWsMessage::UpdateGameState { game }] => {
                assert_eq!(game.grid.as_ref(), Some(&first));
                assert_eq!(game.turn, Some(b));
                assert_eq!(game.piece, -STARTING_PIECE);
            }
            ref other => panic!("unexpected messages {:?}", other),
        }
    }

    registry.play(b, board(-1));
    let games = registry.snapshot();
    assert_eq!(games[0].turn, Some(a));
    assert_eq!(games[0].piece, STARTING_PIECE);
}

#[test]
fn test_play_does_not_check_turn_holder() {
    let mut registry = GameRegistry::new();
    let (a, b) = started_pair(&mut registry);

    // Turn is a's, but b submits. Accepted; the turn simply flips to the
    // member not holding it.
    assert_eq!(registry.snapshot()[0].turn, Some(a));
    let deliveries = registry.play(b, board(-1));
    assert_eq!(deliveries.len(), 2);
    assert_eq!(registry.snapshot()[0].turn, Some(b));
}

#[test]
fn test_play_without_session_redirects_sender_only() {
    let mut registry = GameRegistry::new();
    let (a, b) = (conn(), conn());
    registry.connect(a);
    registry.connect(b);

    let deliveries = registry.play(a, board(1));
    // Lone forced leave-game directive, no broadcast, no mutation.
    assert_eq!(deliveries, vec![(a, ServerWsMessage::LeaveGame)]);
    assert_eq!(registry.game_count(), 0);
}

#[test]
fn test_leave_tears_down_whole_session() {
    let mut registry = GameRegistry::new();
    let (a, b) = started_pair(&mut registry);

    let deliveries = registry.leave(a);
    // The whole session goes, and every former member hears about it.
    assert!(sent_to(&deliveries, a).contains(&&ServerWsMessage::LeftGame));
    assert!(sent_to(&deliveries, b).contains(&&ServerWsMessage::LeftGame));
    assert_eq!(registry.game_count(), 0);
    assert_eq!(registry.connection_count(), 2);
}

#[test]
fn test_leave_without_session_is_noop() {
    let mut registry = GameRegistry::new();
    let a = conn();
    registry.connect(a);
    assert!(registry.leave(a).is_empty());
}

#[test]
fn test_disconnect_tears_down_session_and_forgets_connection() {
    let mut registry = GameRegistry::new();
    let (a, b) = started_pair(&mut registry);

    let deliveries = registry.disconnect(b);
    assert!(sent_to(&deliveries, a).contains(&&ServerWsMessage::LeftGame));
    assert_eq!(registry.game_count(), 0);
    assert_eq!(registry.connection_count(), 1);

    // The departed id no longer receives the membership broadcast.
    let deliveries = registry.create(a);
    assert!(sent_to(&deliveries, b).is_empty());
}

#[test]
fn test_member_in_at_most_one_session() {
    let mut registry = GameRegistry::new();
    let (a, b) = (conn(), conn());
    registry.connect(a);
    registry.connect(b);
    registry.create(a);
    registry.create(b);
    registry.join(b, a);
    registry.join(a, b);

    for id in [a, b] {
        let holding = registry
            .snapshot()
            .iter()
            .filter(|g| g.members.contains(&id))
            .count();
        assert_eq!(holding, 1);
    }
}

#[test]
fn test_full_match_lifecycle() {
    let mut registry = GameRegistry::new();
    let (a, b) = (conn(), conn());

    registry.connect(a);
    let deliveries = registry.create(a);
    assert!(sent_to(&deliveries, a).contains(&&ServerWsMessage::CreateSuccess));
    assert_eq!(registry.snapshot()[0].members, vec![a]);

    registry.connect(b);
    let deliveries = registry.join(b, a);
    for id in [a, b] {
        assert!(sent_to(&deliveries, id).contains(&&ServerWsMessage::StartGame));
    }
    let games = registry.snapshot();
    assert_eq!(games[0].members, vec![a, b]);
    assert!(games[0].in_progress);
    assert_eq!(games[0].turn, Some(a));

    let first = board(1);
    let deliveries = registry.play(a, first.clone());
    for (_, msg) in &deliveries {
        match msg {
            ServerWsMessage::UpdateGameState { game } => {
                assert_eq!(game.grid.as_ref(), Some(&first));
                assert_eq!(game.turn, Some(b));
                assert_eq!(game.piece, -STARTING_PIECE);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    let deliveries = registry.disconnect(b);
    assert!(sent_to(&deliveries, a).contains(&&ServerWsMessage::LeftGame));
    assert_eq!(registry.game_count(), 0);
    assert_eq!(registry.connection_count(), 1);
}

#[test]
fn test_session_turn_flip_from_unset_goes_to_creator() {
    // A play against a session that has not started (creator alone) hands
    // the turn to the creator instead of leaving it unset.
    let a = conn();
    let mut game = GameSession::new(a);
    game.submit_play(board(1));
    assert_eq!(game.turn, Some(a));
    assert_eq!(game.piece, -STARTING_PIECE);
}

#[test]
fn test_session_start_seats_joiner_and_resets_state() {
    let (a, b) = (conn(), conn());
    let mut game = GameSession::new(a);
    assert!(!game.in_progress);

    let members = game.start(b);
    assert_eq!(members, vec![a, b]);
    assert!(game.in_progress);
    assert_eq!(game.turn, Some(a));
    assert_eq!(game.piece, STARTING_PIECE);
    assert!(game.contains(&a) && game.contains(&b));
}

#[test]
fn test_session_end_reports_all_members() {
    let (a, b) = (conn(), conn());
    let mut game = GameSession::new(a);
    game.start(b);
    assert_eq!(game.end(), vec![a, b]);
}
