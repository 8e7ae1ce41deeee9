//! Configuration management for keypad-gw
//!
//! Loads and validates the YAML application config. Every section is
//! optional; an absent file means the built-in layout and default tuning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::bindings::KeyBindingTable;
use crate::tuning::AnalogTuning;
use crate::vkey::Vkey;

/// Config file name looked up by [`discover`]
pub const CONFIG_FILE_NAME: &str = "keypad-gw.yaml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BindingsConfig>,
    #[serde(default)]
    pub tuning: AnalogTuning,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Directory of the loaded file, used to resolve relative paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Key binding configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BindingsConfig {
    /// Text binding table replacing the built-in layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Label → vkey name, applied on top of the file or built-in layout
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write logs to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document is a valid, all-default config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness
    pub fn validate(&self) -> Result<()> {
        self.tuning.validate().context("Invalid tuning")?;

        if let Some(bindings) = &self.bindings {
            if let Some(file) = &bindings.file {
                if file.trim().is_empty() {
                    anyhow::bail!("bindings.file cannot be empty");
                }
            }
            for (label, name) in &bindings.overrides {
                if label.trim().is_empty() {
                    anyhow::bail!("Binding override for '{}' has an empty key label", name);
                }
                name.parse::<Vkey>()
                    .with_context(|| format!("Invalid binding override '{}'", label))?;
            }
        }

        if let Some(logging) = &self.logging {
            if logging.level.trim().is_empty() {
                anyhow::bail!("logging.level cannot be empty");
            }
        }

        Ok(())
    }

    /// Configured log level, if any
    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().map(|l| l.level.as_str())
    }

    /// Configured log file, resolved against the config directory
    pub fn log_file(&self) -> Option<PathBuf> {
        let file = self.logging.as_ref()?.file.as_deref()?;
        Some(self.resolve_path(file))
    }

    /// Build the final binding table: file (or built-in layout), then overrides
    pub async fn build_bindings(&self) -> Result<KeyBindingTable> {
        let mut table = match self.bindings.as_ref().and_then(|b| b.file.as_deref()) {
            Some(file) => {
                let path = self.resolve_path(file);
                let text = fs::read_to_string(&path).await.with_context(|| {
                    format!("Failed to read binding file: {}", path.display())
                })?;
                KeyBindingTable::parse(&text)
                    .with_context(|| format!("Invalid binding file: {}", path.display()))?
            }
            None => KeyBindingTable::default_layout(),
        };

        if let Some(bindings) = &self.bindings {
            for (label, name) in &bindings.overrides {
                let vkey: Vkey = name
                    .parse()
                    .with_context(|| format!("Invalid binding override '{}'", label))?;
                if let Some(previous) = table.insert(label, vkey) {
                    debug!("Rebinding '{}': {} → {}", label, previous, vkey);
                }
            }
        }

        Ok(table)
    }

    fn resolve_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Find a config file when none was given on the command line.
///
/// Looks for `keypad-gw.yaml` in the working directory, then in the user
/// config directory (`~/.config/keypad-gw/config.yaml` or platform
/// equivalent).
pub fn discover() -> Option<PathBuf> {
    let cwd = PathBuf::from(CONFIG_FILE_NAME);
    if cwd.is_file() {
        return Some(cwd);
    }

    let user = dirs::config_dir()?.join("keypad-gw").join("config.yaml");
    user.is_file().then_some(user)
}

// Default value functions
fn default_log_level() -> String { "info".to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, Gain};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_yaml("").unwrap();
        assert!(config.bindings.is_none());
        assert_eq!(config.tuning, AnalogTuning::default());
        assert_eq!(config.log_level(), None);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
bindings:
  overrides:
    g: A
    "right ctrl": Mod1
tuning:
  trigger_r:
    amount: 0.5
    gain: 0.7
    modified_gain: { x: 0.2875, y: 0.9 }
  modifier:
    gain: { x: 0.3, y: 0.3 }
logging:
  level: debug
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tuning.trigger_r.amount, 0.5);
        assert_eq!(config.tuning.trigger_r.gain, Gain::Scalar(0.7));
        assert_eq!(
            config.tuning.trigger_r.modified_gain,
            Gain::Pairwise(Coord::new(0.2875, 0.9))
        );
        assert_eq!(config.tuning.modifier.gain, Gain::Pairwise(Coord::new(0.3, 0.3)));
        // Untouched sections keep their defaults
        assert_eq!(config.tuning.trigger_l, AnalogTuning::default().trigger_l);
        assert_eq!(config.tuning.modifier.uptilt_gain, Gain::Pairwise(Coord::new(0.0, 0.4)));
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_rejects_unknown_vkey_override() {
        let yaml = "bindings:\n  overrides:\n    g: Mod2\n";
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown vkey 'Mod2'"));
    }

    #[test]
    fn test_rejects_out_of_range_amount() {
        let yaml = "tuning:\n  trigger_l:\n    amount: 1.5\n    gain: 1.0\n    modified_gain: 1.0\n";
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file_with_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bindings:\n  overrides:\n    g: A\n    j: X").unwrap();

        let config = AppConfig::load(file.path()).await.unwrap();
        let table = config.build_bindings().await.unwrap();

        assert_eq!(table.get("g"), Some(Vkey::A));
        assert_eq!(table.get("j"), Some(Vkey::X));
        // Rest of the built-in layout is kept
        assert_eq!(table.get("ctrl"), Some(Vkey::Mod1));
    }

    #[tokio::test]
    async fn test_binding_file_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("binds.txt"), "f B\n# only one\n").unwrap();
        let config_path = dir.path().join("keypad-gw.yaml");
        std::fs::write(&config_path, "bindings:\n  file: binds.txt\n").unwrap();

        let config = AppConfig::load(&config_path).await.unwrap();
        let table = config.build_bindings().await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("f"), Some(Vkey::B));
        assert_eq!(table.get("j"), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = AppConfig::load("/nonexistent/keypad-gw.yaml").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");

        let mut config = AppConfig::default();
        config.tuning.trigger_r.amount = 0.6;
        config.save(&path).await.unwrap();

        let loaded = AppConfig::load(&path).await.unwrap();
        assert_eq!(loaded.tuning.trigger_r.amount, 0.6);
    }
}
