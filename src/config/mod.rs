// SPDX-License-Identifier: MPL-2.0
//! Global default toast options stored in a `toasts.toml` file.
//!
//! Every key is optional; missing keys fall through to the built-in defaults
//! when the options are handed to a registry.
//!
//! ```toml
//! duration_ms = 4000          # 0 disables auto-dismiss
//! position = "top"            # top | center | bottom
//! back_behavior = "pop"       # none | pop | clear
//! backdrop_opacity = 0.0      # [0, 1]
//! backdrop_color = [0.0, 0.0, 0.0]
//! backdrop_animation_ms = 300
//! disable_fling_gesture = false
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use iced_toasts::config;
//! use iced_toasts::ui::toasts::Position;
//!
//! let defaults = config::load("MyApp").unwrap_or_default();
//! let defaults = defaults.with_position(Position::Bottom);
//! config::save("MyApp", &defaults).expect("Failed to save toast defaults");
//! ```

pub mod defaults;

use crate::error::Result;
use crate::ui::toasts::{BackBehavior, Position, ToastOptions};
use iced::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "toasts.toml";

/// On-disk shape of the defaults file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_color: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_animation_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_fling_gesture: Option<bool>,
}

impl DefaultsFile {
    /// Converts the file into an option layer, validating every value.
    pub fn to_options(&self) -> Result<ToastOptions> {
        let options = ToastOptions {
            duration: self.duration_ms.map(Duration::from_millis),
            position: self
                .position
                .as_deref()
                .map(str::parse::<Position>)
                .transpose()?,
            back_behavior: self
                .back_behavior
                .as_deref()
                .map(str::parse::<BackBehavior>)
                .transpose()?,
            backdrop_opacity: self.backdrop_opacity,
            backdrop_color: self.backdrop_color.map(|[r, g, b]| Color::from_rgb(r, g, b)),
            backdrop_animation_duration: self.backdrop_animation_ms.map(Duration::from_millis),
            disable_fling_gesture: self.disable_fling_gesture,
            ..ToastOptions::default()
        };
        options.validate(CONFIG_FILE)?;
        Ok(options)
    }

    /// Keeps the keys the file format can express; function-valued options
    /// are dropped.
    #[must_use]
    pub fn from_options(options: &ToastOptions) -> Self {
        Self {
            duration_ms: options
                .duration
                .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
            position: options.position.map(|position| position.as_str().to_string()),
            back_behavior: options
                .back_behavior
                .map(|behavior| behavior.as_str().to_string()),
            backdrop_opacity: options.backdrop_opacity,
            backdrop_color: options.backdrop_color.map(|color| [color.r, color.g, color.b]),
            backdrop_animation_ms: options
                .backdrop_animation_duration
                .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
            disable_fling_gesture: options.disable_fling_gesture,
        }
    }
}

fn get_default_config_path(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(app_name);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the defaults of `app_name` from the platform config directory.
///
/// A missing file yields the built-in defaults.
pub fn load(app_name: &str) -> Result<ToastOptions> {
    if let Some(path) = get_default_config_path(app_name) {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(ToastOptions::builtin())
}

pub fn save(app_name: &str, options: &ToastOptions) -> Result<()> {
    if let Some(path) = get_default_config_path(app_name) {
        return save_to_path(options, &path);
    }
    Ok(())
}

pub fn from_toml_str(content: &str) -> Result<ToastOptions> {
    let file: DefaultsFile = toml::from_str(content)?;
    file.to_options()
}

pub fn load_from_path(path: &Path) -> Result<ToastOptions> {
    let content = fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn save_to_path(options: &ToastOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(&DefaultsFile::from_options(options))?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_values() {
        let options = ToastOptions::new()
            .with_position(Position::Bottom)
            .with_duration(Duration::from_millis(2500))
            .with_back_behavior(BackBehavior::Clear)
            .with_backdrop(Color::from_rgb(0.1, 0.2, 0.3), 0.4);
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        save_to_path(&options, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.position, Some(Position::Bottom));
        assert_eq!(loaded.duration, Some(Duration::from_millis(2500)));
        assert_eq!(loaded.back_behavior, Some(BackBehavior::Clear));
        assert_eq!(loaded.backdrop_opacity, Some(0.4));
        assert_eq!(loaded.backdrop_color, Some(Color::from_rgb(0.1, 0.2, 0.3)));
    }

    #[test]
    fn missing_keys_stay_unset() {
        let options = from_toml_str("position = \"center\"").expect("valid file");
        assert_eq!(options.position, Some(Position::Center));
        assert!(options.duration.is_none());
        assert!(options.back_behavior.is_none());
    }

    #[test]
    fn zero_duration_is_kept() {
        let options = from_toml_str("duration_ms = 0").expect("valid file");
        assert_eq!(options.duration, Some(Duration::ZERO));
    }

    #[test]
    fn invalid_position_is_a_configuration_error() {
        let result = from_toml_str("position = \"left\"");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn out_of_range_opacity_is_a_configuration_error() {
        let result = from_toml_str("backdrop_opacity = 1.5");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        assert!(matches!(
            load_from_path(&config_path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            from_toml_str("durations = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("deep").join("path").join(CONFIG_FILE);

        save_to_path(&ToastOptions::builtin(), &config_path)
            .expect("save should create directories");
        assert!(config_path.exists());
    }
}
