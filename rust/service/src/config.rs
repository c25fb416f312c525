use std::fs;
use std::path::Path;

use pokerroom_engine::rules::{BlindLevel, default_blind_schedule};
use pokerroom_engine::table::{MAX_SEATS, MIN_SEATS, TableConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "POKERROOM_CONFIG";
pub const STARTING_STACK_VAR: &str = "POKERROOM_STARTING_STACK";
pub const BOT_DELAY_VAR: &str = "POKERROOM_BOT_DELAY_MS";
pub const BOT_STRATEGY_VAR: &str = "POKERROOM_BOT_STRATEGY";
pub const ANALYTICS_VAR: &str = "POKERROOM_ANALYTICS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    pub starting_stack: u32,
    pub min_seats: usize,
    pub max_seats: usize,
    pub blind_schedule: Vec<BlindLevel>,
    pub bot_strategy: String,
    /// Pause before a scheduled bot move is applied
    pub bot_delay_ms: u64,
    /// Compute per-seat advisories on every street
    pub analytics: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            starting_stack: pokerroom_engine::player::STARTING_STACK,
            min_seats: MIN_SEATS,
            max_seats: MAX_SEATS,
            blind_schedule: default_blind_schedule(),
            bot_strategy: "heuristic".into(),
            bot_delay_ms: 800,
            analytics: true,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid("starting_stack must be >0".into()));
        }
        if self.min_seats < MIN_SEATS || self.max_seats > MAX_SEATS || self.min_seats > self.max_seats {
            return Err(ConfigError::Invalid(format!(
                "seat range {}..={} must lie within {MIN_SEATS}..={MAX_SEATS}",
                self.min_seats, self.max_seats
            )));
        }
        if self.blind_schedule.is_empty() {
            return Err(ConfigError::Invalid("blind_schedule must not be empty".into()));
        }
        if self.blind_schedule.iter().any(|l| l.small == 0 || l.small > l.big) {
            return Err(ConfigError::Invalid(
                "every blind level needs 0 < small <= big".into(),
            ));
        }
        if self.blind_schedule.windows(2).any(|w| w[1].big <= w[0].big || w[1].small < w[0].small) {
            return Err(ConfigError::Invalid("blind_schedule must be ascending".into()));
        }
        if !pokerroom_ai::STRATEGIES.contains(&self.bot_strategy.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown bot_strategy '{}'",
                self.bot_strategy
            )));
        }
        Ok(())
    }

    /// Engine configuration for one table.
    pub fn table_config(&self, seats: usize, seed: Option<u64>) -> TableConfig {
        TableConfig {
            seats,
            starting_stack: self.starting_stack,
            blinds: self.blind_schedule.clone(),
            seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSources {
    pub starting_stack: ValueSource,
    pub seats: ValueSource,
    pub blind_schedule: ValueSource,
    pub bot_strategy: ValueSource,
    pub bot_delay_ms: ValueSource,
    pub analytics: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_stack: ValueSource::Default,
            seats: ValueSource::Default,
            blind_schedule: ValueSource::Default,
            bot_strategy: ValueSource::Default,
            bot_delay_ms: ValueSource::Default,
            analytics: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: ServiceConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    min_seats: Option<usize>,
    #[serde(default)]
    max_seats: Option<usize>,
    #[serde(default)]
    blind_schedule: Option<Vec<BlindLevel>>,
    #[serde(default)]
    bot_strategy: Option<String>,
    #[serde(default)]
    bot_delay_ms: Option<u64>,
    #[serde(default)]
    analytics: Option<bool>,
}

pub fn load() -> Result<ServiceConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `POKERROOM_CONFIG`, then
/// individual environment overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = ServiceConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_PATH_VAR)
        && !path.is_empty()
    {
        apply_file(&mut cfg, &mut sources, read_file(Path::new(&path))?);
    }

    if let Ok(stack) = std::env::var(STARTING_STACK_VAR)
        && !stack.is_empty()
    {
        cfg.starting_stack = stack
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{STARTING_STACK_VAR}={stack} is not a chip count")))?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Ok(delay) = std::env::var(BOT_DELAY_VAR)
        && !delay.is_empty()
    {
        cfg.bot_delay_ms = delay
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{BOT_DELAY_VAR}={delay} is not a duration")))?;
        sources.bot_delay_ms = ValueSource::Env;
    }
    if let Ok(strategy) = std::env::var(BOT_STRATEGY_VAR)
        && !strategy.is_empty()
    {
        cfg.bot_strategy = strategy;
        sources.bot_strategy = ValueSource::Env;
    }
    if let Ok(flag) = std::env::var(ANALYTICS_VAR)
        && !flag.is_empty()
    {
        cfg.analytics =
            parse_bool(&flag).ok_or_else(|| ConfigError::Invalid(format!("{ANALYTICS_VAR}={flag} is not a boolean")))?;
        sources.analytics = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved { config: cfg, sources })
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

fn apply_file(cfg: &mut ServiceConfig, sources: &mut ConfigSources, file: FileConfig) {
    if let Some(v) = file.starting_stack {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::File;
    }
    if let Some(v) = file.min_seats {
        cfg.min_seats = v;
        sources.seats = ValueSource::File;
    }
    if let Some(v) = file.max_seats {
        cfg.max_seats = v;
        sources.seats = ValueSource::File;
    }
    if let Some(v) = file.blind_schedule {
        cfg.blind_schedule = v;
        sources.blind_schedule = ValueSource::File;
    }
    if let Some(v) = file.bot_strategy {
        cfg.bot_strategy = v;
        sources.bot_strategy = ValueSource::File;
    }
    if let Some(v) = file.bot_delay_ms {
        cfg.bot_delay_ms = v;
        sources.bot_delay_ms = ValueSource::File;
    }
    if let Some(v) = file.analytics {
        cfg.analytics = v;
        sources.analytics = ValueSource::File;
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
