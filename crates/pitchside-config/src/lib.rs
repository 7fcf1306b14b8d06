//! Configuration for the pitchside monitor.
//!
//! TOML file + `PITCHSIDE_` environment overrides, merged with figment and
//! translated into `pitchside_core::ControllerConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pitchside_core::{ControllerConfig, CoreError, Key, KeyBindings, LinkConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub overlays: OverlayConfig,

    /// Single-character overrides for the default key bindings.
    #[serde(default)]
    pub keys: KeyOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Connect on startup and keep reconnecting.
    #[serde(default = "default_true")]
    pub auto_connect: bool,

    #[serde(default = "default_auto_connect_delay_ms")]
    pub auto_connect_delay_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auto_connect: true,
            auto_connect_delay_ms: default_auto_connect_delay_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    3200
}
fn default_true() -> bool {
    true
}
fn default_auto_connect_delay_ms() -> u64 {
    1000
}
fn default_connect_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OverlayConfig {
    /// Show the server speed overlay on startup.
    #[serde(default)]
    pub server_speed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill_server: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_off_left: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_off_right: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_menu: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_kick_left: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_kick_right: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_clock: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_state: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_ball: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_server_speed: Option<char>,
}

/// Keys the terminal host handles itself before bindings are consulted.
pub const RESERVED_KEYS: &[char] = &['q'];

impl KeyOverrides {
    /// Default bindings with every override applied.
    pub fn to_bindings(&self) -> Result<KeyBindings, ConfigError> {
        let defaults = KeyBindings::default();
        let pick = |name: &str, value: Option<char>, default: Key| -> Result<Key, ConfigError> {
            match value {
                None => Ok(default),
                Some(c) if RESERVED_KEYS.contains(&c.to_ascii_lowercase()) => {
                    Err(ConfigError::Validation {
                        field: format!("keys.{name}"),
                        reason: format!("{c:?} is reserved for quitting"),
                    })
                }
                Some(c) if c.is_ascii_alphanumeric() => Ok(Key::new(c)),
                Some(c) => Err(ConfigError::Validation {
                    field: format!("keys.{name}"),
                    reason: format!("expected a letter or digit, got {c:?}"),
                }),
            }
        };

        let bindings = KeyBindings {
            kill_server: pick("kill_server", self.kill_server, defaults.kill_server)?,
            kick_off_left: pick("kick_off_left", self.kick_off_left, defaults.kick_off_left)?,
            kick_off_right: pick("kick_off_right", self.kick_off_right, defaults.kick_off_right)?,
            open_menu: pick("open_menu", self.open_menu, defaults.open_menu)?,
            connect: pick("connect", self.connect, defaults.connect)?,
            free_kick_left: pick("free_kick_left", self.free_kick_left, defaults.free_kick_left)?,
            free_kick_right: pick(
                "free_kick_right",
                self.free_kick_right,
                defaults.free_kick_right,
            )?,
            reset_clock: pick("reset_clock", self.reset_clock, defaults.reset_clock)?,
            full_state: pick("full_state", self.full_state, defaults.full_state)?,
            drop_ball: pick("drop_ball", self.drop_ball, defaults.drop_ball)?,
            toggle_server_speed: pick(
                "toggle_server_speed",
                self.toggle_server_speed,
                defaults.toggle_server_speed,
            )?,
        };
        bindings.validate()?;
        Ok(bindings)
    }
}

// ── Translation to core config ──────────────────────────────────────

impl Config {
    pub fn to_link_config(&self) -> Result<LinkConfig, ConfigError> {
        let server = &self.server;
        let link = LinkConfig {
            host: server.host.trim().to_owned(),
            port: server.port,
            auto_connect: server.auto_connect,
            auto_connect_delay: Duration::from_millis(server.auto_connect_delay_ms),
            connect_timeout: Duration::from_millis(server.connect_timeout_ms),
        };
        link.validate()?;
        Ok(link)
    }

    pub fn to_controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        Ok(ControllerConfig {
            link: self.to_link_config()?,
            bindings: self.keys.to_bindings()?,
            show_server_speed: self.overlays.server_speed,
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "pitchside", "pitchside").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pitchside");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then `path`, then `PITCHSIDE_` environment variables with
/// `__` separating sections (`PITCHSIDE_SERVER__PORT=3300`).
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PITCHSIDE_").split("__"))
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load the full Config from the platform config file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}
