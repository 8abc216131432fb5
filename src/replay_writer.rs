//! Writing finished games to disk.
//!
//! Each game becomes one YAML file holding some metadata and the full list
//! of turns, enough to replay the game on a fresh board.
//!
//! This module is only available behind the `binary` feature flag.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::game_runner::{GameResult, TurnRecord};
use crate::game_state::{GameConfig, Player};

/// Contents of one replay file.
#[derive(Debug, Serialize)]
pub struct GameRecord<'a> {
    /// Identifier of the process that generated this game.
    pub creator: String,
    pub agents: [&'a str; 2],
    pub config: GameConfig,
    pub winner: Option<Player>,
    pub game_length: usize,
    pub turns: &'a [TurnRecord],
}

impl<'a> GameRecord<'a> {
    pub fn new(result: &'a GameResult, config: GameConfig, agents: [&'a str; 2]) -> Self {
        Self {
            creator: format!("selfplay-{}", std::process::id()),
            agents,
            config,
            winner: result.winner,
            game_length: result.num_turns,
            turns: &result.actions,
        }
    }
}

/// Write a game record as YAML, creating parent directories as needed.
pub fn write_game_yaml<P: AsRef<Path>>(path: P, record: &GameRecord<'_>) -> Result<()> {
    if record.turns.is_empty() {
        anyhow::bail!("Cannot write an empty game");
    }
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = serde_yaml::to_string(record).context("Failed to serialize game record")?;
    fs::write(path.as_ref(), contents)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
    Ok(())
}
