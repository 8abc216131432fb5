//! Self-play executable.
//!
//! Plays a batch of games between two built-in agents and writes each game
//! as a YAML replay file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quoridor_engine::agents::{ActionSelector, RandomAgent, ShortestPathAgent};
use quoridor_engine::game_runner::play_game;
use quoridor_engine::game_state::{GameConfig, Player};
use quoridor_engine::replay_writer::{write_game_yaml, GameRecord};
use quoridor_engine::selfplay_config::load_config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Random,
    ShortestPath,
}

impl AgentKind {
    fn name(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::ShortestPath => "shortest-path",
        }
    }

    fn build(self, seed: Option<u64>) -> Box<dyn ActionSelector> {
        match (self, seed) {
            (AgentKind::Random, Some(seed)) => Box::new(RandomAgent::with_seed(seed)),
            (AgentKind::Random, None) => Box::new(RandomAgent::new()),
            (AgentKind::ShortestPath, _) => Box::new(ShortestPathAgent::new()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(
    about = "Play Quoridor games between built-in agents and save the replays",
    long_about = None
)]
#[command(version)]
struct Args {
    /// YAML config file; without it the default game settings are used
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of games to play (overrides the config file)
    #[arg(short = 'n', long)]
    games: Option<usize>,

    /// Base seed for the random agents (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the replay files are written to
    #[arg(short, long, default_value = "replays")]
    output_dir: PathBuf,

    /// Agent playing as player 1
    #[arg(long, value_enum, default_value_t = AgentKind::ShortestPath)]
    agent_one: AgentKind,

    /// Agent playing as player 2
    #[arg(long, value_enum, default_value_t = AgentKind::Random)]
    agent_two: AgentKind,

    /// Number of threads for the wall availability refresh (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    num_threads: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.num_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.num_threads)
            .build_global()
            .context("Failed to configure the thread pool")?;
    }

    let (game_config, run_config) = match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            (GameConfig::from(&config.quoridor), config.self_play.unwrap_or_default())
        }
        None => (GameConfig::default(), Default::default()),
    };
    let num_games = args.games.or(run_config.num_games).unwrap_or(1);
    let seed = args.seed.or(run_config.seed);

    info!(
        num_games,
        ?seed,
        agent_one = args.agent_one.name(),
        agent_two = args.agent_two.name(),
        output_dir = %args.output_dir.display(),
        "starting self-play"
    );

    let mut wins = [0usize; 2];
    let mut truncated = 0usize;
    for game_index in 0..num_games {
        let game_seed = seed.map(|seed| seed.wrapping_add(2 * game_index as u64));
        let mut agent_one = args.agent_one.build(game_seed);
        let mut agent_two = args.agent_two.build(game_seed.map(|seed| seed.wrapping_add(1)));

        let result = play_game(agent_one.as_mut(), agent_two.as_mut(), &game_config)
            .with_context(|| format!("Game {} failed", game_index))?;
        match result.winner {
            Some(player) => wins[player.index()] += 1,
            None => truncated += 1,
        }

        let record = GameRecord::new(
            &result,
            game_config,
            [args.agent_one.name(), args.agent_two.name()],
        );
        let path = args.output_dir.join(format!("game_{:04}.yaml", game_index));
        write_game_yaml(&path, &record)?;
        info!(
            game_index,
            winner = ?result.winner,
            turns = result.num_turns,
            path = %path.display(),
            "game saved"
        );
    }

    info!(
        player_one_wins = wins[Player::One.index()],
        player_two_wins = wins[Player::Two.index()],
        truncated,
        "self-play complete"
    );
    Ok(())
}
