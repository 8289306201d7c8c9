//! Table configuration.
//!
//! Values start from [`GameConfig::default`], are overlaid by an optional TOML
//! file and then by `DRAW_POKER_*` environment variables, and are validated
//! last.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "DRAW_POKER_CONFIG";

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{var} is not a valid number: {value:?}")]
    Env { var: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub starting_chips: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub ante: u64,
    pub max_rounds: Option<u32>,
    pub max_raises_per_round: u32,
    /// Smallest opening bet and raise increment; the big blind when unset.
    pub min_bet: Option<u64>,
    pub seed: Option<u64>,
    pub decision_timeout_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_chips: 1000,
            small_blind: 10,
            big_blind: 20,
            ante: 0,
            max_rounds: None,
            max_raises_per_round: 4,
            min_bet: None,
            seed: None,
            decision_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_chips: Option<u64>,
    #[serde(default)]
    small_blind: Option<u64>,
    #[serde(default)]
    big_blind: Option<u64>,
    #[serde(default)]
    ante: Option<u64>,
    #[serde(default)]
    max_rounds: Option<u32>,
    #[serde(default)]
    max_raises_per_round: Option<u32>,
    #[serde(default)]
    min_bet: Option<u64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    decision_timeout_ms: Option<u64>,
}

impl GameConfig {
    /// Resolve defaults, `path` (or `DRAW_POKER_CONFIG`), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()).map(PathBuf::from);
        let mut cfg = match path.map(Path::to_path_buf).or(from_env) {
            Some(p) => Self::from_path(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|var| std::env::var(var).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overlaid with a TOML file. Not validated.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&text)
    }

    /// Defaults overlaid with TOML text. Not validated.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let f: FileConfig = toml::from_str(text)?;
        let mut cfg = Self::default();
        if let Some(v) = f.starting_chips {
            cfg.starting_chips = v;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
        }
        if let Some(v) = f.ante {
            cfg.ante = v;
        }
        if let Some(v) = f.max_raises_per_round {
            cfg.max_raises_per_round = v;
        }
        if let Some(v) = f.decision_timeout_ms {
            cfg.decision_timeout_ms = v;
        }
        cfg.max_rounds = f.max_rounds.or(cfg.max_rounds);
        cfg.min_bet = f.min_bet.or(cfg.min_bet);
        cfg.seed = f.seed.or(cfg.seed);
        Ok(cfg)
    }

    /// Override fields from `DRAW_POKER_*` variables read through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let read = |var: &'static str| lookup(var).filter(|v| !v.is_empty()).map(|v| (var, v));
        if let Some((var, v)) = read("DRAW_POKER_STARTING_CHIPS") {
            self.starting_chips = parse_env(var, &v)?;
        }
        if let Some((var, v)) = read("DRAW_POKER_SMALL_BLIND") {
            self.small_blind = parse_env(var, &v)?;
        }
        if let Some((var, v)) = read("DRAW_POKER_BIG_BLIND") {
            self.big_blind = parse_env(var, &v)?;
        }
        if let Some((var, v)) = read("DRAW_POKER_ANTE") {
            self.ante = parse_env(var, &v)?;
        }
        if let Some((var, v)) = read("DRAW_POKER_MAX_ROUNDS") {
            self.max_rounds = Some(parse_env(var, &v)?);
        }
        if let Some((var, v)) = read("DRAW_POKER_MAX_RAISES") {
            self.max_raises_per_round = parse_env(var, &v)?;
        }
        if let Some((var, v)) = read("DRAW_POKER_SEED") {
            self.seed = Some(parse_env(var, &v)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_chips == 0 {
            return Err(ConfigError::Invalid("starting_chips must be > 0".into()));
        }
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigError::Invalid("blinds must be > 0".into()));
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::Invalid("big_blind must be >= small_blind".into()));
        }
        if self.max_raises_per_round == 0 {
            return Err(ConfigError::Invalid("max_raises_per_round must be >= 1".into()));
        }
        if let Some(min_bet) = self.min_bet {
            if min_bet < self.big_blind {
                return Err(ConfigError::Invalid("min_bet must be >= big_blind".into()));
            }
        }
        Ok(())
    }

    pub fn min_bet(&self) -> u64 {
        self.min_bet.unwrap_or(self.big_blind)
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env { var, value: value.to_string() })
}
