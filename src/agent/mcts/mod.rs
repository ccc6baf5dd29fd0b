//! Root-parallel Monte Carlo Tree Search. Component H.
//!
//! Grounded on `mcts_AI.py`'s `RootParallelMCTSAI`: each worker thread runs
//! its own search tree to completion, trees are merged at the root (and
//! only the root's immediate children -- deeper statistics are not
//! reconciled, matching the original), and the whole worker pool is spun
//! up and torn down inside a single [`Agent::choose`] call rather than kept
//! alive across moves.

pub mod backprop;
pub mod expansion;
pub mod final_move;
pub mod node;
pub mod selection;
pub mod simulation;

use std::time::Instant;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::Agent;
use crate::error::{MastergoalError, Result};
use crate::movegen::{legal_moves, Move};
use crate::state::{GameState, Level, Team};

use expansion::{ExpansionStrategy, RandomExpansion};
use final_move::{DecisiveMoveStrategy, FinalMoveStrategy, MaxChildStrategy, RobustChildStrategy, RobustMaxChildStrategy};
use node::MctsTree;
use selection::{ProgressiveBiasSelection, ProgressiveHistorySelection, SelectionStrategy, UctSelection};
use simulation::{RandomPlayout, SimulationStrategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionKind {
    Uct,
    ProgressiveBias,
    ProgressiveHistory,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FinalMoveKind {
    RobustChild,
    MaxChild,
    RobustMaxChild { top_percentage: f64 },
    Decisive { fallback: Box<FinalMoveKind> },
}

#[derive(Clone, Debug)]
pub struct MctsConfig {
    pub iterations: u32,
    pub exploration_constant: f64,
    pub heuristic_bias_magnitude: f64,
    pub thread_count: u32,
    pub use_opening_book: bool,
    pub selection: SelectionKind,
    pub final_move: FinalMoveKind,
    pub win_goals: u32,
    pub max_turns: Option<u32>,
    /// When set, worker RNGs are deterministically derived as `seed +
    /// thread_id`; with `thread_count == 1` this makes `choose` fully
    /// reproducible, the property under test in the spec's determinism
    /// scenario.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> MctsConfig {
        MctsConfig {
            iterations: 400,
            exploration_constant: 2.0,
            heuristic_bias_magnitude: 5.0,
            thread_count: 2,
            use_opening_book: true,
            selection: SelectionKind::Uct,
            final_move: FinalMoveKind::RobustChild,
            win_goals: 3,
            max_turns: None,
            seed: None,
        }
    }
}

fn build_selection(kind: SelectionKind, config: &MctsConfig) -> Box<dyn SelectionStrategy + Send> {
    match kind {
        SelectionKind::Uct => Box::new(UctSelection::new(config.exploration_constant)),
        SelectionKind::ProgressiveBias => {
            Box::new(ProgressiveBiasSelection::new(config.exploration_constant, config.heuristic_bias_magnitude))
        }
        SelectionKind::ProgressiveHistory => Box::new(ProgressiveHistorySelection::new(config.exploration_constant)),
    }
}

fn build_final_move(kind: &FinalMoveKind) -> Box<dyn FinalMoveStrategy + Send> {
    match kind {
        FinalMoveKind::RobustChild => Box::new(RobustChildStrategy),
        FinalMoveKind::MaxChild => Box::new(MaxChildStrategy),
        FinalMoveKind::RobustMaxChild { top_percentage } => Box::new(RobustMaxChildStrategy::new(*top_percentage)),
        FinalMoveKind::Decisive { fallback } => Box::new(DecisiveMoveStrategy::new(build_final_move(fallback))),
    }
}

/// Statistics merged at the root: one entry per distinct move tried by any
/// worker thread.
struct MergedChild {
    mv: Move,
    visits: u32,
    total_reward: f64,
}

/// Runs up to `iterations` playouts, polling `deadline` once per completed
/// iteration: a worker that finds the deadline already passed finishes the
/// iteration in flight and then exits, never starting another, so the
/// coordinator can merge whatever trees are available rather than wait on
/// a slow thread.
fn run_worker_thread(root_state: GameState, iterations: u32, config: &MctsConfig, seed: u64, deadline: Instant) -> Result<MctsTree> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = MctsTree::new(root_state);
    let mut selection = build_selection(config.selection, config);
    let expansion = RandomExpansion;
    let ai_team = tree.nodes[MctsTree::ROOT].state.current_team;
    let simulation = RandomPlayout::new(ai_team, config.win_goals, config.max_turns);

    for i in 0..iterations {
        if i > 0 && Instant::now() >= deadline {
            break;
        }
        let leaf = select_to_leaf(&mut tree, &*selection, &expansion, &mut rng, config)?;
        let reward = simulation.simulate(&tree.nodes[leaf].state, &mut rng);
        backprop::backpropagate(&mut tree, leaf, reward, &mut *selection);
    }

    Ok(tree)
}

/// Descends from the root via `selection` while a node is fully expanded,
/// and expands the first node found that is not -- matching the original's
/// "select, then expand-or-descend" loop.
fn select_to_leaf(
    tree: &mut MctsTree,
    selection: &dyn SelectionStrategy,
    expansion: &RandomExpansion,
    rng: &mut StdRng,
    config: &MctsConfig,
) -> Result<usize> {
    let mut current = MctsTree::ROOT;
    loop {
        if tree.nodes[current].state.is_game_over(config.win_goals, config.max_turns).is_some() {
            return Ok(current);
        }
        if !tree.is_fully_expanded(current) {
            return expansion.expand(tree, current, rng);
        }
        current = selection.select(tree, current);
    }
}

/// Root-parallel MCTS agent. Spins up `config.thread_count` scoped worker
/// threads per [`Agent::choose`] call and tears them down before
/// returning -- no thread pool persists between moves.
pub struct MctsAgent {
    name: String,
    config: MctsConfig,
}

impl MctsAgent {
    pub fn new(name: impl Into<String>, config: MctsConfig) -> MctsAgent {
        MctsAgent { name: name.into(), config }
    }

    fn opening_book_move(&self, state: &GameState) -> Option<Move> {
        if state.turn_count != 0 || state.current_team != Team::Left {
            return None;
        }
        let legal = legal_moves(state);
        match state.level {
            Level::One | Level::Two => {
                let opener = Move::mv(
                    crate::board::Position::new(4, 5).ok()?,
                    crate::board::Position::new(6, 5).ok()?,
                );
                legal.contains(&opener).then_some(opener)
            }
            Level::Three => {
                let options = [
                    Move::mv(crate::board::Position::new(4, 3).ok()?, crate::board::Position::new(6, 5).ok()?),
                    Move::mv(crate::board::Position::new(4, 7).ok()?, crate::board::Position::new(6, 5).ok()?),
                ];
                let valid: Vec<Move> = options.into_iter().filter(|m| legal.contains(m)).collect();
                use rand::seq::SliceRandom;
                valid.choose(&mut rand::thread_rng()).copied()
            }
        }
    }

    fn merge(&self, trees: Vec<MctsTree>) -> Vec<MergedChild> {
        use std::collections::HashMap;
        let mut merged: HashMap<Move, MergedChild> = HashMap::new();
        for tree in &trees {
            for &child_idx in &tree.nodes[MctsTree::ROOT].children {
                let child = &tree.nodes[child_idx];
                let mv = child.mv.expect("root's children always carry the move that produced them");
                let entry = merged.entry(mv).or_insert(MergedChild { mv, visits: 0, total_reward: 0.0 });
                entry.visits += child.visits;
                entry.total_reward += child.total_reward;
            }
        }
        // HashMap iteration order is randomized per-process; sort by move
        // so that a tie between two children resolves the same way on
        // every call, which the single-threaded determinism guarantee
        // depends on.
        merged.into_values().sorted_by_key(|c| c.mv).collect()
    }
}

impl Agent for MctsAgent {
    fn choose(&mut self, state: &GameState, deadline: Instant) -> Result<Move> {
        let legal = legal_moves(state);
        if legal.is_empty() {
            return Err(MastergoalError::invalid_input("no legal moves available"));
        }

        if self.config.use_opening_book {
            if let Some(mv) = self.opening_book_move(state) {
                return Ok(mv);
            }
        }

        let thread_count = self.config.thread_count.max(1);
        let per_thread = self.config.iterations / thread_count;
        let remainder = self.config.iterations % thread_count;
        let agent_name = self.name.clone();

        let config = &self.config;
        let spawn_worker_pool = std::panic::AssertUnwindSafe(|| {
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..thread_count)
                    .map(|thread_id| {
                        let iterations = per_thread + if thread_id < remainder { 1 } else { 0 };
                        let root_state = state.clone();
                        let seed = config.seed.map(|s| s.wrapping_add(thread_id as u64)).unwrap_or_else(|| {
                            use rand::RngCore;
                            rand::thread_rng().next_u64()
                        });
                        scope.spawn(move || run_worker_thread(root_state, iterations, config, seed, deadline))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|_| Err(MastergoalError::agent_failure(agent_name.as_str(), "worker thread panicked"))))
                    .collect::<Vec<Result<MctsTree>>>()
            })
        });

        // Kind 6 (resource exhaustion): the OS failing to start the worker
        // pool is reported as a panic inside `thread::scope`; catch it and
        // degrade to a single sequential search on the calling thread
        // rather than failing the whole move.
        let trees: Vec<Result<MctsTree>> = match std::panic::catch_unwind(spawn_worker_pool) {
            Ok(trees) => trees,
            Err(_) => {
                let err = MastergoalError::resource_exhaustion("worker pool failed to start; falling back to sequential search");
                log::warn!("{err}");
                let seed = config.seed.unwrap_or_else(|| {
                    use rand::RngCore;
                    rand::thread_rng().next_u64()
                });
                vec![run_worker_thread(state.clone(), config.iterations, config, seed, deadline)]
            }
        };

        if Instant::now() >= deadline {
            let overrun_ms = Instant::now().saturating_duration_since(deadline).as_millis() as u64;
            let err = MastergoalError::timeout_exceeded(state.current_team, overrun_ms);
            log::warn!("{err}, proceeding with whatever search trees are available");
        }

        let trees: Vec<MctsTree> = trees.into_iter().collect::<Result<Vec<_>>>()?;
        let merged = self.merge(trees);
        if merged.is_empty() {
            return crate::agent::random_legal_move(state, &mut rand::thread_rng());
        }

        let strategy = build_final_move(&self.config.final_move);
        let mut scratch = MctsTree::new(state.clone());
        for child in &merged {
            let idx = scratch.add_child(MctsTree::ROOT, child.mv)?;
            scratch.nodes[idx].visits = child.visits;
            scratch.nodes[idx].total_reward = child.total_reward;
        }

        strategy
            .select_move(&scratch, MctsTree::ROOT)
            .ok_or_else(|| MastergoalError::invalid_input("no candidate moves"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tiny_config(seed: u64) -> MctsConfig {
        MctsConfig {
            iterations: 20,
            thread_count: 1,
            use_opening_book: false,
            seed: Some(seed),
            ..MctsConfig::default()
        }
    }

    #[test]
    fn mcts_agent_always_picks_a_legal_move() {
        let state = GameState::new_game(Level::One);
        let mut agent = MctsAgent::new("mcts", tiny_config(42));
        let deadline = Instant::now() + Duration::from_secs(5);
        let mv = agent.choose(&state, deadline).unwrap();
        assert!(legal_moves(&state).contains(&mv));
    }

    #[test]
    fn single_threaded_fixed_seed_is_deterministic() {
        let state = GameState::new_game(Level::One);
        let deadline = Instant::now() + Duration::from_secs(5);

        let mut first = MctsAgent::new("mcts", tiny_config(7));
        let mv1 = first.choose(&state, deadline).unwrap();

        let mut second = MctsAgent::new("mcts", tiny_config(7));
        let mv2 = second.choose(&state, deadline).unwrap();

        assert_eq!(mv1, mv2);
    }

    #[test]
    fn opening_book_returns_canonical_opener_on_first_turn() {
        let state = GameState::new_game(Level::One);
        let mut config = tiny_config(1);
        config.use_opening_book = true;
        let mut agent = MctsAgent::new("mcts", config);
        let deadline = Instant::now() + Duration::from_secs(5);
        let mv = agent.choose(&state, deadline).unwrap();
        assert_eq!(mv, Move::mv(crate::board::Position::new(4, 5).unwrap(), crate::board::Position::new(6, 5).unwrap()));
    }
}
