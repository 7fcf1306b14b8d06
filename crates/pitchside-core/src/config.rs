// ── Runtime configuration ──
//
// Validated values the controller and the monitor link are built from.
// Loading and merging config sources lives in `pitchside-config`.

use std::time::Duration;

use crate::dispatch::KeyBindings;
use crate::error::CoreError;

/// Where the match server lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub host: String,
    pub port: u16,
    pub auto_connect: bool,
    /// Wait before the first reconnect attempt.
    pub auto_connect_delay: Duration,
    pub connect_timeout: Duration,
}

impl LinkConfig {
    /// `host:port`, as shown to the user.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "server host must not be empty".into(),
            });
        }
        if self.port == 0 {
            return Err(CoreError::Config {
                message: "server port must not be 0".into(),
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(CoreError::Config {
                message: "connect timeout must be positive".into(),
            });
        }
        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3200,
            auto_connect: true,
            auto_connect_delay: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

/// Everything the live interaction controller is configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    pub link: LinkConfig,
    pub bindings: KeyBindings,
    /// Show the server speed overlay on startup.
    pub show_server_speed: bool,
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.link.validate()?;
        self.bindings.validate()
    }
}
