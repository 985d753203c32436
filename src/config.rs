//! Demo configuration: the reserved aggregate name and its auxiliary channels.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Channel name routed to the multi-channel aggregator.
pub const MULTI_CHANNEL_NAME: &str = "multi_channel";

/// Channels the aggregator samples.
pub const AUXILIARY_CHANNELS: [&str; 2] = ["long", "double"];

/// Names the dispatcher treats specially. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Reserved aggregate channel name; never looked up in the registry.
    pub multi_channel: String,
    /// Channels sampled by the aggregator, in write order.
    pub auxiliary_channels: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            multi_channel: MULTI_CHANNEL_NAME.to_string(),
            auxiliary_channels: AUXILIARY_CHANNELS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl DemoConfig {
    /// Loads and validates a JSON config file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Parse` if it is not valid JSON for
    /// this shape, `Invalid` if validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path.to_path_buf())
    }

    /// Parses and validates a JSON config held in memory.
    ///
    /// # Errors
    /// `Parse` or `Invalid`, as for [`DemoConfig::from_file`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, PathBuf::from("<inline>"))
    }

    fn parse(text: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse { path, source })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// `Invalid` for an empty name, or an auxiliary list that is empty,
    /// repeats a name, or contains the aggregate name itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid { reason });
        if self.multi_channel.trim().is_empty() {
            return invalid("multi_channel must not be empty".to_string());
        }
        if self.auxiliary_channels.is_empty() {
            return invalid("auxiliary_channels must not be empty".to_string());
        }
        for (i, name) in self.auxiliary_channels.iter().enumerate() {
            if name.trim().is_empty() {
                return invalid(format!("auxiliary_channels[{i}] is empty"));
            }
            if *name == self.multi_channel {
                return invalid(format!("'{name}' cannot be its own auxiliary channel"));
            }
            if self.auxiliary_channels[..i].contains(name) {
                return invalid(format!("auxiliary channel '{name}' listed twice"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let cfg = DemoConfig::default();
        assert_eq!(cfg.multi_channel, MULTI_CHANNEL_NAME);
        assert_eq!(cfg.auxiliary_channels, AUXILIARY_CHANNELS);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = DemoConfig::from_json_str(r#"{"auxiliary_channels": ["int"]}"#).unwrap();
        assert_eq!(cfg.multi_channel, "multi_channel");
        assert_eq!(cfg.auxiliary_channels, ["int"]);
    }

    #[test]
    fn test_invalid_configs() {
        for text in [
            r#"{"multi_channel": ""}"#,
            r#"{"auxiliary_channels": []}"#,
            r#"{"auxiliary_channels": ["long", "long"]}"#,
            r#"{"auxiliary_channels": ["multi_channel"]}"#,
        ] {
            let err = DemoConfig::from_json_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{text}");
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"multi_channel": "agg", "auxiliary_channels": ["a", "b"]}}"#).unwrap();
        let cfg = DemoConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.multi_channel, "agg");
        assert_eq!(cfg.auxiliary_channels, ["a", "b"]);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert!(matches!(
            DemoConfig::from_file(&missing).unwrap_err(),
            ConfigError::Io { .. }
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            DemoConfig::from_file(&bad).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
