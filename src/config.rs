//! Agent configuration and the factory that turns a config into a boxed
//! [`Agent`]. Component's ambient configuration layer, in the spirit of the
//! teacher's CLI option structs: one flat, `clap`-derivable struct per
//! agent kind, assembled into a single chooser here.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::agent::heuristics::{
    AdvancedHeuristicAgent, BasicHeuristicAgent, RoleBasedHeuristicAgent, TerritorialHeuristicAgent,
    TriangleHeuristicAgent,
};
use crate::agent::mcts::{FinalMoveKind, MctsAgent, MctsConfig, SelectionKind};
use crate::agent::minimax::weights::Weights;
use crate::agent::minimax::MinimaxAgent;
use crate::agent::{Agent, RandomAgent};
use crate::error::{MastergoalError, Result};
use crate::state::Level;

/// Which agent implementation to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    Random,
    HeuristicBasic,
    HeuristicAdvanced,
    HeuristicTerritorial,
    HeuristicRoleBased,
    HeuristicTriangle,
    Minimax,
    Mcts,
}

/// Which child strategy an MCTS agent uses to pick a move once search ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalMoveChoice {
    RobustChild,
    MaxChild,
    RobustMaxChild,
    Decisive,
}

/// Which selection strategy an MCTS agent uses while descending expanded
/// nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionChoice {
    Uct,
    ProgressiveBias,
    ProgressiveHistory,
}

impl From<SelectionChoice> for SelectionKind {
    fn from(value: SelectionChoice) -> SelectionKind {
        match value {
            SelectionChoice::Uct => SelectionKind::Uct,
            SelectionChoice::ProgressiveBias => SelectionKind::ProgressiveBias,
            SelectionChoice::ProgressiveHistory => SelectionKind::ProgressiveHistory,
        }
    }
}

fn final_move_kind(choice: FinalMoveChoice, top_percentage: f64) -> FinalMoveKind {
    match choice {
        FinalMoveChoice::RobustChild => FinalMoveKind::RobustChild,
        FinalMoveChoice::MaxChild => FinalMoveKind::MaxChild,
        FinalMoveChoice::RobustMaxChild => FinalMoveKind::RobustMaxChild { top_percentage },
        FinalMoveChoice::Decisive => FinalMoveKind::Decisive { fallback: Box::new(FinalMoveKind::RobustChild) },
    }
}

/// The full set of knobs needed to build any agent kind. Unused fields for
/// a given `kind` are simply ignored, the way a single flat CLI options
/// struct tends to carry fields that only some subcommands read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub kind: AgentKind,
    pub level: Level,

    pub seed: Option<u64>,

    pub mcts_iterations: u32,
    pub mcts_exploration_constant: f64,
    pub mcts_heuristic_bias_magnitude: f64,
    pub mcts_thread_count: u32,
    pub mcts_use_opening_book: bool,
    pub mcts_selection: SelectionChoice,
    pub mcts_final_move: FinalMoveChoice,
    pub mcts_robust_max_top_percentage: f64,
    pub mcts_win_goals: u32,
    pub mcts_max_turns: Option<u32>,

    pub minimax_weights_path: Option<String>,
    pub minimax_depth_override: Option<u8>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, kind: AgentKind, level: Level) -> AgentSpec {
        AgentSpec {
            name: name.into(),
            kind,
            level,
            seed: None,
            mcts_iterations: 400,
            mcts_exploration_constant: 2.0,
            mcts_heuristic_bias_magnitude: 5.0,
            mcts_thread_count: 2,
            mcts_use_opening_book: true,
            mcts_selection: SelectionChoice::Uct,
            mcts_final_move: FinalMoveChoice::RobustChild,
            mcts_robust_max_top_percentage: 0.3,
            mcts_win_goals: 3,
            mcts_max_turns: None,
            minimax_weights_path: None,
            minimax_depth_override: None,
        }
    }

    /// Builds the agent this spec describes.
    pub fn build(&self) -> Result<Box<dyn Agent>> {
        let agent: Box<dyn Agent> = match self.kind {
            AgentKind::Random => match self.seed {
                Some(seed) => Box::new(RandomAgent::with_seed(self.name.clone(), seed)),
                None => Box::new(RandomAgent::new(self.name.clone())),
            },
            AgentKind::HeuristicBasic => match self.seed {
                Some(seed) => Box::new(BasicHeuristicAgent::with_seed(self.name.clone(), seed)),
                None => Box::new(BasicHeuristicAgent::new(self.name.clone())),
            },
            AgentKind::HeuristicAdvanced => {
                let weights = Default::default();
                match self.seed {
                    Some(seed) => Box::new(AdvancedHeuristicAgent::with_seed(self.name.clone(), weights, seed)),
                    None => Box::new(AdvancedHeuristicAgent::new(self.name.clone(), weights)),
                }
            }
            AgentKind::HeuristicTerritorial => match self.seed {
                Some(seed) => Box::new(TerritorialHeuristicAgent::with_seed(self.name.clone(), seed)),
                None => Box::new(TerritorialHeuristicAgent::new(self.name.clone())),
            },
            AgentKind::HeuristicRoleBased => match self.seed {
                Some(seed) => Box::new(RoleBasedHeuristicAgent::with_seed(self.name.clone(), seed)),
                None => Box::new(RoleBasedHeuristicAgent::new(self.name.clone())),
            },
            AgentKind::HeuristicTriangle => match self.seed {
                Some(seed) => Box::new(TriangleHeuristicAgent::with_seed(self.name.clone(), seed)),
                None => Box::new(TriangleHeuristicAgent::new(self.name.clone())),
            },
            AgentKind::Minimax => {
                let mut weights = match &self.minimax_weights_path {
                    Some(path) => Weights::load(path)?,
                    None => Weights::uniform(3),
                };
                if let Some(depth) = self.minimax_depth_override {
                    weights.depth = depth;
                }
                Box::new(MinimaxAgent::new(self.name.clone(), weights))
            }
            AgentKind::Mcts => {
                let config = MctsConfig {
                    iterations: self.mcts_iterations,
                    exploration_constant: self.mcts_exploration_constant,
                    heuristic_bias_magnitude: self.mcts_heuristic_bias_magnitude,
                    thread_count: self.mcts_thread_count,
                    use_opening_book: self.mcts_use_opening_book,
                    selection: self.mcts_selection.into(),
                    final_move: final_move_kind(self.mcts_final_move, self.mcts_robust_max_top_percentage),
                    win_goals: self.mcts_win_goals,
                    max_turns: self.mcts_max_turns,
                    seed: self.seed,
                };
                Box::new(MctsAgent::new(self.name.clone(), config))
            }
        };
        Ok(agent)
    }
}

/// Parses a level CLI argument, shared by binaries that take `--level`.
pub fn parse_level(raw: &str) -> Result<Level> {
    let value: u8 = raw
        .parse()
        .map_err(|_| MastergoalError::invalid_input(format!("'{raw}' is not a valid level number")))?;
    Level::from_u8(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_agent_kind_without_error() {
        for kind in [
            AgentKind::Random,
            AgentKind::HeuristicBasic,
            AgentKind::HeuristicAdvanced,
            AgentKind::HeuristicTerritorial,
            AgentKind::HeuristicRoleBased,
            AgentKind::HeuristicTriangle,
            AgentKind::Minimax,
            AgentKind::Mcts,
        ] {
            let spec = AgentSpec::new("agent", kind, Level::Two);
            assert!(spec.build().is_ok());
        }
    }
}
