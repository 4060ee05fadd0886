//! Configuration loading and typed config structures for Worldtap.
//!
//! The configuration lives in `worldtap-config.yaml` next to the binary's
//! working directory. Every field has a default, so a missing file or an
//! empty document is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside what the engine can run with.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Largest loaded region the engine holds, in tiles per side.
pub const MAX_SCENE_SIZE: u16 = 104;

/// Number of vertical planes in the world.
pub const MAX_PLANES: u8 = 4;

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorldtapConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Engine thread timing.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Reference world generation.
    #[serde(default)]
    pub world: WorldConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WorldtapConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the listener:
    /// - `WORLDTAP_HOST` overrides `server.host`
    /// - `WORLDTAP_PORT` overrides `server.port`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_yaml(yaml)?;
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the environment.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as null rather than an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the engine loop or size the region
    /// beyond what the engine holds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "engine.tick_interval_ms",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !(1..=MAX_SCENE_SIZE).contains(&self.world.scene_size) {
            return Err(ConfigError::Invalid {
                field: "world.scene_size",
                reason: format!("must be between 1 and {MAX_SCENE_SIZE}"),
            });
        }
        if !(1..=MAX_PLANES).contains(&self.world.planes) {
            return Err(ConfigError::Invalid {
                field: "world.planes",
                reason: format!("must be between 1 and {MAX_PLANES}"),
            });
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// Override the listener with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("WORLDTAP_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("WORLDTAP_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => warn!(value = %val, error = %e, "ignoring invalid WORLDTAP_PORT"),
            }
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Engine thread timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Upper bound on how long a request waits for the engine thread.
    /// Zero waits indefinitely.
    #[serde(default)]
    pub query_timeout_ms: u64,
}

impl EngineConfig {
    /// The tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The query timeout, `None` when unbounded.
    pub const fn query_timeout(&self) -> Option<Duration> {
        if self.query_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.query_timeout_ms))
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            query_timeout_ms: 0,
        }
    }
}

/// Reference world generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Tiles per side of the loaded region.
    #[serde(default = "default_scene_size")]
    pub scene_size: u16,

    /// Number of vertical planes.
    #[serde(default = "default_planes")]
    pub planes: u8,

    /// NPCs spawned around the player.
    #[serde(default = "default_npc_count")]
    pub npc_count: u16,

    /// Projectiles launched at start.
    #[serde(default = "default_projectile_count")]
    pub projectile_count: u16,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            scene_size: default_scene_size(),
            planes: default_planes(),
            npc_count: default_npc_count(),
            projectile_count: default_projectile_count(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit an info-level tick summary every N ticks (0 disables).
    #[serde(default = "default_tick_log_interval")]
    pub tick_log_interval: u64,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            tick_log_interval: default_tick_log_interval(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_tick_interval_ms() -> u64 {
    600
}

const fn default_seed() -> u64 {
    42
}

const fn default_scene_size() -> u16 {
    24
}

const fn default_planes() -> u8 {
    4
}

const fn default_npc_count() -> u16 {
    8
}

const fn default_projectile_count() -> u16 {
    3
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_tick_log_interval() -> u64 {
    100
}
