//! Configuration for self-play runs.
//!
//! Unknown top-level sections are ignored (the serde default), so the file
//! may carry settings for other tools as well.
//!
//! This module is only available behind the `binary` feature flag.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::game_state::GameConfig;

/// Top-level config.
#[derive(Debug, Deserialize)]
pub struct SelfPlayConfig {
    /// Game parameters.
    pub quoridor: QuoridorConfig,

    /// Run parameters; all of them can also be given on the command line.
    #[serde(default)]
    pub self_play: Option<SelfPlayRunConfig>,
}

#[derive(Debug, Deserialize)]
pub struct QuoridorConfig {
    pub max_walls: u32,
    pub max_steps: usize,
}

impl From<&QuoridorConfig> for GameConfig {
    fn from(config: &QuoridorConfig) -> Self {
        GameConfig {
            max_walls: config.max_walls,
            max_steps: config.max_steps,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SelfPlayRunConfig {
    #[serde(default)]
    pub num_games: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Load a `SelfPlayConfig` from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SelfPlayConfig> {
    let contents = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
    let config: SelfPlayConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_ignores_other_sections() {
        let yaml = r#"
run_id: test-run
quoridor:
  max_walls: 3
  max_steps: 50
self_play:
  num_games: 4
  seed: 11
server:
  port: 8080
  room_timeout_secs: 60
"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(f.path()).unwrap();
        assert_eq!(config.quoridor.max_walls, 3);
        assert_eq!(config.quoridor.max_steps, 50);
        let run = config.self_play.unwrap();
        assert_eq!(run.num_games, Some(4));
        assert_eq!(run.seed, Some(11));
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
quoridor:
  max_walls: 10
  max_steps: 200
"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(f.path()).unwrap();
        assert!(config.self_play.is_none());
        assert_eq!(GameConfig::from(&config.quoridor), GameConfig::default());
    }

    #[test]
    fn test_load_config_missing_quoridor() {
        let yaml = r#"
self_play:
  num_games: 2
"#;
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();

        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let error = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read config file"));
    }
}
