use std::time::{Duration, Instant};

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_mastergoal::prelude::*;

/// Drives a self-play match between two configured agents and prints each
/// resulting snapshot, for local inspection and manual testing of new
/// agent configurations -- the thin demo surface in place of a network
/// service, which is out of scope.
#[derive(Parser, Debug)]
#[command(name = "mastergoal", about = "Mastergoal self-play driver")]
struct Cli {
    /// Rule level: 1, 2, or 3.
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// LEFT agent kind.
    #[arg(long, value_enum, default_value = "random")]
    left: lib_mastergoal::config::AgentKind,

    /// RIGHT agent kind.
    #[arg(long, value_enum, default_value = "random")]
    right: lib_mastergoal::config::AgentKind,

    /// Goals required to end the match.
    #[arg(long, default_value_t = 3)]
    win_goals: u32,

    /// Turn cap overriding the engine's internal 200-turn draw rule.
    #[arg(long)]
    max_turns: Option<u32>,

    /// Per-move thinking budget, in milliseconds.
    #[arg(long, default_value_t = 500)]
    think_ms: u64,

    /// Seed shared by both agents' RNGs, for reproducible self-play.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level passed to `flexi_logger`.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print a snapshot after every move instead of only at game end.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_str(cli.log_level.as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            false => AdaptiveFormat::Default,
        })
        .start()?;

    let level = Level::from_u8(cli.level)?;

    let mut left_spec = lib_mastergoal::config::AgentSpec::new("left", cli.left, level);
    left_spec.seed = cli.seed;
    let mut right_spec = lib_mastergoal::config::AgentSpec::new("right", cli.right, level);
    right_spec.seed = cli.seed.map(|s| s.wrapping_add(1));

    let mut left_agent = left_spec.build()?;
    let mut right_agent = right_spec.build()?;

    let mut state = GameState::new_game(level);
    left_agent.on_game_start(Team::Left);
    right_agent.on_game_start(Team::Right);

    let think_budget = Duration::from_millis(cli.think_ms);

    let winner = loop {
        if let Some(winner) = state.is_game_over(cli.win_goals, cli.max_turns) {
            break winner;
        }

        let deadline = Instant::now() + think_budget;
        let agent: &mut dyn Agent = match state.current_team {
            Team::Left => left_agent.as_mut(),
            Team::Right => right_agent.as_mut(),
        };
        let mv = lib_mastergoal::agent::choose_or_fallback(agent, &state, deadline);
        execute(&mut state, mv?)?;

        if cli.verbose {
            let snapshot = Snapshot::of(&state);
            println!("{}", serde_json::to_string(&snapshot)?);
        }
    };

    left_agent.on_game_end();
    right_agent.on_game_end();

    match winner {
        Winner::Team(Team::Left) => println!("LEFT wins {}-{}", state.left_goals, state.right_goals),
        Winner::Team(Team::Right) => println!("RIGHT wins {}-{}", state.right_goals, state.left_goals),
        Winner::Draw => println!("draw {}-{}", state.left_goals, state.right_goals),
    }

    Ok(())
}
