use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::error::{LoggerError, LoggerResult};
use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Output format override.
pub const ENV_LOG_FORMAT: &str = "IEB_LOG_FORMAT";
/// Filter expression override, e.g. `ieb_core=debug,info`.
pub const ENV_LOG_LEVEL: &str = "IEB_LOG_LEVEL";
/// Timestamp zone override: `utc` or `local`.
pub const ENV_LOG_TZ: &str = "IEB_LOG_TZ";
/// Color switch: `true`/`false`, `1`/`0`, `on`/`off`.
pub const ENV_LOG_COLOR: &str = "IEB_LOG_COLOR";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` expression.
    pub level: LoggerLevel,
    /// Zone used for timestamps.
    pub tz: LoggerTimeZone,
    /// Print the event target (module path).
    pub with_targets: bool,
    /// Allow ANSI colors; still requires stdout to be a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by the `IEB_LOG_*` environment variables.
    pub fn from_env() -> LoggerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `IEB_LOG_*` keys.
    pub fn from_lookup<F>(lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_LOG_FORMAT) {
            cfg.format = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_LEVEL) {
            cfg.level = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_TZ) {
            cfg.tz = v.parse()?;
        }
        if let Some(v) = lookup(ENV_LOG_COLOR) {
            cfg.use_color = parse_switch(ENV_LOG_COLOR, &v)?;
        }
        Ok(cfg)
    }

    /// Colors only when enabled in config and stdout is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}

fn parse_switch(var: &'static str, value: &str) -> LoggerResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(LoggerError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = LoggerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.tz, LoggerTimeZone::Utc);
        assert_eq!(cfg.level.as_str(), "info");
        assert!(cfg.with_targets);
        assert!(cfg.use_color);
    }

    #[test]
    fn environment_overrides_fields() {
        let cfg = LoggerConfig::from_lookup(lookup(&[
            (ENV_LOG_FORMAT, "json"),
            (ENV_LOG_LEVEL, "ieb_core=debug,info"),
            (ENV_LOG_TZ, "LOCAL"),
            (ENV_LOG_COLOR, "off"),
        ]))
        .unwrap();

        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.level.as_str(), "ieb_core=debug,info");
        assert_eq!(cfg.tz, LoggerTimeZone::Local);
        assert!(!cfg.use_color);
    }

    #[test]
    fn bad_environment_value_is_reported() {
        let err = LoggerConfig::from_lookup(lookup(&[(ENV_LOG_COLOR, "maybe")])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidEnv { var: ENV_LOG_COLOR, .. }));

        let err = LoggerConfig::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidFormat(_)));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: LoggerConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();

        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.level.as_str(), LoggerLevel::default().as_str());
        assert!(cfg.use_color);
    }
}
