//! Event manager configuration.
//!
//! Controls whether the registry reports diagnostics and where the reports
//! go. Values are loaded from an INI file; missing keys keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [diagnostics]
//! enabled = true
//! sink = log
//! ```
//!
//! `sink` is one of `log`, `channel` or `none`.

use configparser::ini::Ini;
use log::info;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Diagnostics are on for debug builds and off for release builds unless
/// the configuration says otherwise.
const DEFAULT_DIAGNOSTICS: bool = cfg!(debug_assertions);
const DEFAULT_SINK: SinkKind = SinkKind::Log;
const DEFAULT_CONFIG_PATH: &str = "./events.ini";

/// Which [`DiagnosticSink`](crate::resources::diagnostics::DiagnosticSink)
/// the registry is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// [`LogSink`](crate::resources::diagnostics::LogSink)
    Log,
    /// [`ChannelSink`](crate::resources::diagnostics::ChannelSink)
    Channel,
    /// [`NoopSink`](crate::resources::diagnostics::NoopSink)
    None,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Log => "log",
            SinkKind::Channel => "channel",
            SinkKind::None => "none",
        }
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(SinkKind::Log),
            "channel" => Ok(SinkKind::Channel),
            "none" | "noop" => Ok(SinkKind::None),
            other => Err(format!("Unknown diagnostics sink: {}", other)),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings used by
/// [`EventManager::from_config`](crate::resources::eventmanager::EventManager::from_config).
#[derive(Debug, Clone)]
pub struct EventManagerConfig {
    /// Report null subscriptions and listener panics.
    pub diagnostics: bool,
    /// Where reports are sent.
    pub sink: SinkKind,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EventManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EventManagerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            diagnostics: DEFAULT_DIAGNOSTICS,
            sink: DEFAULT_SINK,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed, or if `sink` names an unknown sink.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [diagnostics] section, validated in full before anything is applied
        let enabled = config
            .getbool("diagnostics", "enabled")
            .map_err(|e| format!("Invalid diagnostics.enabled: {}", e))?;
        let sink = config
            .get("diagnostics", "sink")
            .map(|s| s.parse::<SinkKind>())
            .transpose()?;

        if let Some(enabled) = enabled {
            self.diagnostics = enabled;
        }
        if let Some(sink) = sink {
            self.sink = sink;
        }

        info!(
            "Loaded event config: diagnostics={}, sink={}",
            self.diagnostics, self.sink
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [diagnostics] section
        config.set("diagnostics", "enabled", Some(self.diagnostics.to_string()));
        config.set("diagnostics", "sink", Some(self.sink.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved event config to {:?}", self.config_path);

        Ok(())
    }
}
