//! Black-box scenarios against the public API only, one per named scenario
//! in the specification (S1-S6).

use std::time::{Duration, Instant};

use lib_mastergoal::agent::mcts::{MctsAgent, MctsConfig};
use lib_mastergoal::agent::minimax::weights::Weights;
use lib_mastergoal::agent::minimax::MinimaxAgent;
use lib_mastergoal::board::Position;
use lib_mastergoal::prelude::*;

/// S1: the canonical Level-1 opening move is present and legal.
#[test]
fn s1_level_one_opener_is_legal() {
    let state = GameState::new_game(Level::One);
    let moves = legal_moves(&state);
    let opener = Move::mv(Position::new(4, 5).unwrap(), Position::new(6, 5).unwrap());
    assert!(moves.contains(&opener));
}

/// S2: a kick that would pass through an opposing player is excluded from
/// the legal set, while a shorter kick stopping short of the blocker
/// remains legal.
#[test]
fn s2_illegal_kick_through_opponent_is_excluded() {
    let mut state = GameState::new_game(Level::One);
    state.players[0].position = Position::new(7, 5).unwrap();
    state.players[1].position = Position::new(7, 7).unwrap();
    state.ball.position = Position::new(7, 5).unwrap();

    let moves = legal_moves(&state);
    let blocked = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 9).unwrap());
    let allowed = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 6).unwrap());
    assert!(!moves.contains(&blocked));
    assert!(moves.contains(&allowed));
}

/// S3: a kick landing in the opponent's goal mouth scores and resets the
/// board to the canonical opening, with the scoring side conceding the
/// restart kickoff to the other side.
#[test]
fn s3_goal_resets_board_and_flips_possession() {
    let mut state = GameState::new_game(Level::One);
    state.players[0].position = Position::new(13, 5).unwrap();
    state.ball.position = Position::new(13, 5).unwrap();
    let mv = Move::kick(Position::new(13, 5).unwrap(), Position::new(14, 5).unwrap());

    execute(&mut state, mv).unwrap();

    assert_eq!(state.left_goals, 1);
    assert_eq!(state.current_team, Team::Right);
    assert_eq!(state.ball.position, lib_mastergoal::state::CENTER);
    state.check_invariants().unwrap();
}

/// S4: consecutive passes beyond a level's cap are excluded from the legal
/// set, without disabling kicking altogether.
#[test]
fn s4_pass_cap_excludes_only_the_capped_pass() {
    let mut state = GameState::new_game(Level::Two);
    state.passes_count = state.rules().pass_cap;
    state.players[0].position = Position::new(7, 5).unwrap();
    state.players[1].position = Position::new(7, 6).unwrap();
    state.ball.position = Position::new(7, 5).unwrap();

    let moves = legal_moves(&state);
    let pass_to_teammate = Move::kick(Position::new(7, 5).unwrap(), Position::new(7, 6).unwrap());
    assert!(!moves.contains(&pass_to_teammate));
    assert!(moves.iter().any(|m| m.kind == MoveKind::Kick));
}

/// S5: with a single thread and a fixed seed, MCTS move selection is
/// reproducible.
#[test]
fn s5_single_threaded_mcts_is_deterministic_under_a_fixed_seed() {
    let state = GameState::new_game(Level::One);
    let deadline = Instant::now() + Duration::from_secs(5);
    let config = MctsConfig {
        iterations: 32,
        thread_count: 1,
        use_opening_book: false,
        seed: Some(99),
        ..MctsConfig::default()
    };

    let mut first = MctsAgent::new("a", config.clone());
    let mv1 = first.choose(&state, deadline).unwrap();

    let mut second = MctsAgent::new("b", config);
    let mv2 = second.choose(&state, deadline).unwrap();

    assert_eq!(mv1, mv2);
}

/// S6: robust-child, max-child, and robust-max-child final-move strategies
/// can disagree on a constructed two-child root, each picking the child
/// its definition favors.
#[test]
fn s6_final_move_strategies_diverge_on_a_constructed_root() {
    use lib_mastergoal::agent::mcts::final_move::{FinalMoveStrategy, MaxChildStrategy, RobustChildStrategy, RobustMaxChildStrategy};
    use lib_mastergoal::agent::mcts::node::MctsTree;

    let state = GameState::new_game(Level::One);
    let mut tree = MctsTree::new(state);
    let moves = legal_moves(&tree.nodes[MctsTree::ROOT].state);

    let heavily_visited_but_mediocre = tree.add_child(MctsTree::ROOT, moves[0]).unwrap();
    let lightly_visited_but_excellent = tree.add_child(MctsTree::ROOT, moves[1]).unwrap();

    tree.nodes[heavily_visited_but_mediocre].visits = 50;
    tree.nodes[heavily_visited_but_mediocre].total_reward = 5.0; // avg 0.1

    tree.nodes[lightly_visited_but_excellent].visits = 2;
    tree.nodes[lightly_visited_but_excellent].total_reward = 1.8; // avg 0.9

    let robust = RobustChildStrategy.select_move(&tree, MctsTree::ROOT).unwrap();
    assert_eq!(robust, moves[0]);

    let max_child = MaxChildStrategy.select_move(&tree, MctsTree::ROOT).unwrap();
    assert_eq!(max_child, moves[1]);

    // Top 50% by average reward is just the excellent child; robust-max
    // then has only one candidate to pick from.
    let robust_max = RobustMaxChildStrategy::new(0.5).select_move(&tree, MctsTree::ROOT).unwrap();
    assert_eq!(robust_max, moves[1]);
}

/// Minimax always returns a legal move even at shallow depth.
#[test]
fn minimax_agent_plays_a_legal_move_from_the_opening() {
    let state = GameState::new_game(Level::One);
    let mut agent = MinimaxAgent::new("minimax", Weights::uniform(2));
    let deadline = Instant::now() + Duration::from_secs(2);
    let mv = agent.choose(&state, deadline).unwrap();
    assert!(legal_moves(&state).contains(&mv));
}

/// The decisive-move wrapper short-circuits to an immediate goal kick when
/// one is among the root's children, regardless of its visit/reward stats.
#[test]
fn decisive_move_strategy_prefers_an_immediate_goal_kick() {
    use lib_mastergoal::agent::mcts::final_move::{DecisiveMoveStrategy, FinalMoveStrategy, RobustChildStrategy};
    use lib_mastergoal::agent::mcts::node::MctsTree;

    let mut state = GameState::new_game(Level::One);
    state.players[0].position = Position::new(13, 5).unwrap();
    state.ball.position = Position::new(13, 5).unwrap();
    let mut tree = MctsTree::new(state);

    let goal_kick = Move::kick(Position::new(13, 5).unwrap(), Position::new(14, 5).unwrap());
    let decoy = legal_moves(&tree.nodes[MctsTree::ROOT].state)
        .into_iter()
        .find(|m| *m != goal_kick)
        .unwrap();

    let goal_child = tree.add_child(MctsTree::ROOT, goal_kick).unwrap();
    let decoy_child = tree.add_child(MctsTree::ROOT, decoy).unwrap();
    tree.nodes[goal_child].visits = 1;
    tree.nodes[decoy_child].visits = 1000;

    let strategy = DecisiveMoveStrategy::new(Box::new(RobustChildStrategy));
    let chosen = strategy.select_move(&tree, MctsTree::ROOT).unwrap();
    assert_eq!(chosen, goal_kick);
}

/// A freshly snapshotted state reconstructs an equivalent, invariant-valid
/// [`GameState`], equal to the original on every observable field.
#[test]
fn snapshot_law_round_trips_every_level() {
    for level in [Level::One, Level::Two, Level::Three] {
        let state = GameState::new_game(level);
        let snapshot = Snapshot::of(&state);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        let rebuilt = back.to_game_state().unwrap();
        rebuilt.check_invariants().unwrap();
        assert_eq!(rebuilt, state);
    }
}
