// Oyars Settings Module
// Optional TOML runtime settings, separate from the keymap file

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::holding::DEFAULT_HOLDING_WINDOW_MS;

/// Default name of the virtual output device
pub const DEFAULT_DEVICE_NAME: &str = "Oyars (virtual) Keyboard";

/// Runtime settings loaded from `~/.config/oyars/settings.toml`.
///
/// Everything here has a sensible default; the file is optional and the
/// keymap itself lives in its own format elsewhere.
#[derive(Debug, Clone)]
pub struct Settings {
    holding_window_ms: u64,
    devices: Vec<String>,
    grab: bool,
    device_name: String,
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    timing: Option<TimingSettings>,

    #[serde(default)]
    devices: Option<DevicesSettings>,

    #[serde(default)]
    output: Option<OutputSettings>,

    #[serde(default)]
    general: Option<GeneralSettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct TimingSettings {
    #[serde(default)]
    holding_window_ms: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct DevicesSettings {
    #[serde(default)]
    only: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct OutputSettings {
    #[serde(default)]
    device_name: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct GeneralSettings {
    #[serde(default)]
    grab: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Settings with every default in place
    pub fn new() -> Self {
        Self {
            holding_window_ms: DEFAULT_HOLDING_WINDOW_MS,
            devices: Vec::new(),
            grab: true,
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(timing) = parsed.timing {
            if let Some(window) = timing.holding_window_ms {
                settings.holding_window_ms = window;
            }
        }
        if let Some(devices) = parsed.devices {
            settings.devices = devices.only;
        }
        if let Some(output) = parsed.output {
            if let Some(name) = output.device_name {
                settings.device_name = name;
            }
        }
        if let Some(general) = parsed.general {
            if let Some(grab) = general.grab {
                settings.grab = grab;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("oyars").join("settings.toml"))
    }

    /// Load from the default location; absent file means defaults.
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    /// The tap-vs-chord disambiguation window
    pub fn holding_window(&self) -> Duration {
        Duration::from_millis(self.holding_window_ms)
    }

    /// Explicit device filters, empty means autodetect
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    /// Whether to take the exclusive grab on source devices
    pub fn grab(&self) -> bool {
        self.grab
    }

    /// Name the virtual output device registers with
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Where these settings were loaded from, if anywhere
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.holding_window(), Duration::from_millis(140));
        assert!(settings.devices().is_empty());
        assert!(settings.grab());
        assert_eq!(settings.device_name(), DEFAULT_DEVICE_NAME);
    }

    #[test]
    fn test_from_toml_full() {
        let settings = Settings::from_toml(
            r#"
            [timing]
            holding_window_ms = 180

            [devices]
            only = ["/dev/input/event3", "HHKB"]

            [output]
            device_name = "Test Device"

            [general]
            grab = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.holding_window(), Duration::from_millis(180));
        assert_eq!(settings.devices().len(), 2);
        assert_eq!(settings.device_name(), "Test Device");
        assert!(!settings.grab());
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let settings = Settings::from_toml("[timing]\nholding_window_ms = 100\n").unwrap();
        assert_eq!(settings.holding_window(), Duration::from_millis(100));
        assert!(settings.grab());
        assert_eq!(settings.device_name(), DEFAULT_DEVICE_NAME);
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(matches!(
            Settings::from_toml("timing = \"oops"),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_empty_toml() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.holding_window(), Duration::from_millis(140));
    }
}
