//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `marshal.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use marshal_app::scheduler::SchedulerConfig;
use marshal_domain::error::ValidationError;
use marshal_domain::plan::Template;
use marshal_domain::roster::Roster;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Action scheduler tunables.
    pub scheduler: SchedulerSection,
    /// What to automate at startup.
    pub automation: AutomationConfig,
    /// Simulated game settings.
    pub world: WorldConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Scheduler timings, in milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerSection {
    pub base_delay_ms: u64,
    pub idle_ticks: u32,
    pub idle_tick_ms: u64,
    pub watchdog_interval_ms: u64,
    pub watchdog_slack_ms: u64,
    pub evaluation_interval_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Template document selected at startup.
    pub template: Option<String>,
    /// Extra passes of the startup template.
    pub repeats: u32,
    /// Army the recruitment planner keeps topped up.
    pub recruit: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Game time advanced per ticker step.
    pub tick_ms: u64,
}

impl Config {
    /// Load configuration from `marshal.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("marshal.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MARSHAL_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("MARSHAL_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("MARSHAL_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("MARSHAL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("MARSHAL_TEMPLATE") {
            self.automation.template = Some(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.scheduler.idle_tick_ms == 0 || self.scheduler.watchdog_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "idle tick and watchdog interval must be non-zero".to_string(),
            ));
        }
        if self.world.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "world tick must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn scheduler_config(&self) -> SchedulerConfig {
        let s = &self.scheduler;
        SchedulerConfig {
            base_delay: Duration::from_millis(s.base_delay_ms),
            idle_ticks: s.idle_ticks,
            idle_tick: Duration::from_millis(s.idle_tick_ms),
            watchdog_interval: Duration::from_millis(s.watchdog_interval_ms),
            watchdog_slack: Duration::from_millis(s.watchdog_slack_ms),
            evaluation_interval: Duration::from_millis(s.evaluation_interval_ms),
        }
    }

    /// Target roster of the recruitment planner.
    #[must_use]
    pub fn recruit_target(&self) -> Roster {
        self.automation
            .recruit
            .iter()
            .map(|(unit, count)| (unit.as_str(), *count))
            .collect()
    }

    /// Read and validate the startup template, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Template`] when it is not a valid template.
    pub fn startup_template(&self) -> Result<Option<Template>, ConfigError> {
        let Some(path) = &self.automation.template else {
            return Ok(None);
        };
        let document = std::fs::read_to_string(path)?;
        Ok(Some(Template::parse(&document)?))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "marshald=info,marshal=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SchedulerSection {
    fn default() -> Self {
        let defaults = SchedulerConfig::default();
        Self {
            base_delay_ms: millis(defaults.base_delay),
            idle_ticks: defaults.idle_ticks,
            idle_tick_ms: millis(defaults.idle_tick),
            watchdog_interval_ms: millis(defaults.watchdog_interval),
            watchdog_slack_ms: millis(defaults.watchdog_slack),
            evaluation_interval_ms: millis(defaults.evaluation_interval),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { tick_ms: 250 }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// The startup template is not valid.
    #[error("invalid startup template")]
    Template(#[from] ValidationError),
}
