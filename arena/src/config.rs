//! Configuration loading.
//!
//! Settings come from an optional TOML file with environment-variable
//! overrides on top; CLI flags are applied last by `main`. Priority,
//! highest first:
//!
//! 1. CLI flags
//! 2. `HALMA_<KEY>` environment variables
//! 3. The config file (`HALMA_CONFIG`, else the search path below)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use halma::Variant;
use mcts::MctsConfig;
use serde::Deserialize;
use tracing::warn;

use crate::player::PlayerKind;

/// Standard locations to search for the config file.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["halma.toml", "config.toml"];

/// Match settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaConfig {
    /// Board variant: "two" or "six".
    pub variant: String,

    /// Player kind per seat, in seat order.
    pub players: Vec<String>,

    /// Log level when RUST_LOG is not set.
    pub log_level: String,

    /// Base RNG seed; omit for a fresh seed per run.
    pub seed: Option<u64>,

    /// Stop the match after this many total moves; 0 disables the limit.
    pub move_limit: u32,

    pub mcts: MctsSection,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            variant: "two".to_string(),
            players: vec!["ai".to_string(), "greedy".to_string()],
            log_level: "info".to_string(),
            seed: None,
            move_limit: 0,
            mcts: MctsSection::default(),
        }
    }
}

/// Search parameters, mirroring [`MctsConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MctsSection {
    pub num_simulations: u32,
    pub c_puct: f32,
    pub dirichlet_alpha: f32,
    pub dirichlet_epsilon: f32,
    pub temperature: f32,
    pub temp_threshold: u32,
}

impl Default for MctsSection {
    fn default() -> Self {
        let base = MctsConfig::for_play();
        Self {
            num_simulations: base.num_simulations,
            c_puct: base.c_puct,
            dirichlet_alpha: base.dirichlet_alpha,
            dirichlet_epsilon: base.dirichlet_epsilon,
            temperature: base.temperature,
            temp_threshold: base.temp_threshold,
        }
    }
}

impl MctsSection {
    pub fn to_config(&self) -> MctsConfig {
        MctsConfig {
            num_simulations: self.num_simulations,
            c_puct: self.c_puct,
            dirichlet_alpha: self.dirichlet_alpha,
            dirichlet_epsilon: self.dirichlet_epsilon,
            temperature: self.temperature,
            temp_threshold: self.temp_threshold,
        }
    }
}

impl ArenaConfig {
    /// Parsed variant plus one player kind per seat; fails on anything
    /// inconsistent.
    pub fn validate(&self) -> Result<(Variant, Vec<PlayerKind>)> {
        let variant: Variant = self.variant.parse()?;
        let seats = variant.topology().seats() as usize;
        if self.players.len() != seats {
            bail!(
                "variant {:?} needs {} players, got {}",
                self.variant,
                seats,
                self.players.len()
            );
        }
        let kinds = self
            .players
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<PlayerKind>>>()?;
        Ok((variant, kinds))
    }
}

/// Load configuration, apply environment overrides, and return it.
///
/// An unreadable or unparsable file is reported and skipped rather than
/// aborting the run.
pub fn load_config(explicit: Option<&Path>) -> ArenaConfig {
    let config = if let Some(path) = explicit {
        load_from_path(path)
    } else if let Ok(path) = std::env::var("HALMA_CONFIG") {
        load_from_path(&PathBuf::from(path))
    } else {
        CONFIG_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .and_then(|p| try_load(&p))
            .unwrap_or_default()
    };

    apply_env_overrides(config)
}

fn load_from_path(path: &Path) -> ArenaConfig {
    if let Some(config) = try_load(path) {
        config
    } else {
        warn!("could not use config at {}, falling back to defaults", path.display());
        ArenaConfig::default()
    }
}

fn try_load(path: &Path) -> Option<ArenaConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))
        .map_err(|e| warn!("{e:#}"))
        .ok()?;
    toml::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))
        .map_err(|e| warn!("{e:#}"))
        .ok()
}

/// Apply `HALMA_*` environment variable overrides.
pub fn apply_env_overrides(mut config: ArenaConfig) -> ArenaConfig {
    override_var("HALMA_VARIANT", &mut config.variant);
    override_var("HALMA_LOG_LEVEL", &mut config.log_level);
    if let Ok(players) = std::env::var("HALMA_PLAYERS") {
        config.players = players.split(',').map(|s| s.trim().to_string()).collect();
    }
    override_parsed("HALMA_SEED", &mut config.seed);
    if let Some(limit) = parse_var("HALMA_MOVE_LIMIT") {
        config.move_limit = limit;
    }
    if let Some(sims) = parse_var("HALMA_SIMULATIONS") {
        config.mcts.num_simulations = sims;
    }
    if let Some(threshold) = parse_var("HALMA_TEMP_THRESHOLD") {
        config.mcts.temp_threshold = threshold;
    }
    config
}

fn override_var(key: &str, slot: &mut String) {
    if let Ok(value) = std::env::var(key) {
        *slot = value;
    }
}

fn override_parsed<T: FromStr>(key: &str, slot: &mut Option<T>) {
    if let Some(value) = parse_var(key) {
        *slot = Some(value);
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| match v.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring unparsable {key}={v:?}");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = ArenaConfig::default();
        let (variant, kinds) = config.validate().unwrap();
        assert_eq!(variant, Variant::TwoSeat);
        assert_eq!(kinds, vec![PlayerKind::Ai, PlayerKind::Greedy]);
    }

    #[test]
    fn test_seat_count_mismatch_is_rejected() {
        let config = ArenaConfig {
            variant: "six".to_string(),
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_player_kind_is_rejected() {
        let config = ArenaConfig {
            players: vec!["ai".to_string(), "wizard".to_string()],
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let text = r#"
            variant = "six"
            players = ["ai", "ai", "greedy", "greedy", "gs", "human"]
            log_level = "debug"
            seed = 7
            move_limit = 500

            [mcts]
            num_simulations = 64
            temp_threshold = 12
        "#;
        let config: ArenaConfig = toml::from_str(text).unwrap();
        assert_eq!(config.variant, "six");
        assert_eq!(config.players.len(), 6);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.mcts.num_simulations, 64);
        // Unset mcts fields keep their defaults.
        assert!((config.mcts.c_puct - 1.25).abs() < 1e-6);

        let (variant, kinds) = config.validate().unwrap();
        assert_eq!(variant, Variant::SixSeat);
        assert_eq!(kinds[5], PlayerKind::Human);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let text = r#"
            variant = "two"
            simulations = 64
        "#;
        assert!(toml::from_str::<ArenaConfig>(text).is_err());
    }
}
