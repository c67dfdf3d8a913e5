//! The between-round flood update is sequential, not simultaneous: both
//! stations feed the track first, then the already-updated track level
//! feeds back to the stations. These drives construct levels whose outcome
//! differs under any other ordering.

use floodline_game::{
    Decision, Difficulty, GameConfig, GameMode, GameSession, GameType, NodeId,
};

/// Session with flat terrain, no failure points, and hand-set levels, so an
/// advance performs pure propagation with no random draws.
fn quiet_session(levels: [f64; 3]) -> GameSession {
    let mut session = GameSession::new(GameConfig {
        difficulty: Difficulty::Medium,
        game_type: GameType::Punishment,
        mode: GameMode::Fixed,
        seed: Some(1),
    });
    session.release_timer();
    let state = session.state_mut();
    for id in NodeId::ALL {
        let node = state.node_mut(id);
        node.elevation = 5;
        node.is_failure_point = false;
        node.flood_level = levels[id.index()];
    }
    session
}

fn advance(session: &mut GameSession) {
    session.submit_prediction(0.0).unwrap();
    session.submit_decision(Decision::Deny).unwrap();
    session.advance_round().unwrap();
}

#[test]
fn stations_feed_the_track_in_declaration_order() {
    // Medium on flat terrain: elevation factor 1.0, flood factor 0.2.
    // A(50) feeds track first: +ceil(50 * 0.2) = 10.
    // B(30) then feeds the raised track: +ceil(20 * 0.2) = 4.
    // Feeding in the reverse order would leave the track at 15.
    let mut session = quiet_session([50.0, 0.0, 30.0]);
    advance(&mut session);
    let state = session.state();
    assert_eq!(state.track_node.flood_level, 14.0);
    assert_eq!(state.track_node.increase_this_round, 14.0);
    assert_eq!(state.station_a.flood_level, 50.0);
    assert_eq!(state.station_b.flood_level, 30.0);
}

#[test]
fn return_leg_uses_the_updated_track_level() {
    // A(80) raises the track from 20 to 32. The track then feeds B with
    // ceil(32 * 0.2) = 7; the stale pre-update level would only give 4.
    let mut session = quiet_session([80.0, 20.0, 0.0]);
    advance(&mut session);
    let state = session.state();
    assert_eq!(state.track_node.flood_level, 32.0);
    assert_eq!(state.station_b.flood_level, 7.0);
    assert_eq!(state.station_b.increase_this_round, 7.0);
    // The track sits below A, so nothing returns to A.
    assert_eq!(state.station_a.flood_level, 80.0);
}

#[test]
fn previous_levels_snapshot_the_pre_advance_state() {
    let mut session = quiet_session([50.0, 0.0, 30.0]);
    advance(&mut session);
    let state = session.state();
    assert_eq!(state.station_a.previous_flood_level, 50.0);
    assert_eq!(state.track_node.previous_flood_level, 0.0);
    assert_eq!(state.station_b.previous_flood_level, 30.0);
}

#[test]
fn below_threshold_levels_do_not_move() {
    let mut session = quiet_session([9.0, 0.0, 5.0]);
    advance(&mut session);
    let state = session.state();
    assert_eq!(state.station_a.flood_level, 9.0);
    assert_eq!(state.track_node.flood_level, 0.0);
    assert_eq!(state.station_b.flood_level, 5.0);
    assert_eq!(state.track_node.increase_this_round, 0.0);
}
