//! Reveal configuration (unveil.toml)

use crate::stagger::Stagger;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unveil_animation::VisualState;
use unveil_text::Granularity;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reveal config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize reveal config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Inputs of a split-text reveal
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SplitTextConfig {
    /// Source text
    #[serde(default)]
    pub text: String,
    /// Split granularity
    #[serde(default)]
    pub split: Granularity,
    /// Never re-animate after the first reveal, and never reset on exit
    #[serde(default)]
    pub animate_only_once: bool,
    /// Stagger step between consecutive fragments, in milliseconds
    #[serde(default = "default_delay")]
    pub delay: f32,
    /// Transition length of each fragment, in seconds
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Easing identifier handed to the tween engine
    #[serde(default = "default_ease")]
    pub ease: String,
    /// Class name for the host renderer's container element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_class: Option<String>,
    #[serde(default = "default_from")]
    pub from: VisualState,
    #[serde(default = "default_to")]
    pub to: VisualState,
}

fn default_delay() -> f32 {
    50.0
}

fn default_duration() -> f32 {
    2.0
}

fn default_ease() -> String {
    "elastic.out(1, 0.3)".to_string()
}

fn default_from() -> VisualState {
    VisualState::hidden_below(20.0)
}

fn default_to() -> VisualState {
    VisualState::shown()
}

impl Default for SplitTextConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            split: Granularity::default(),
            animate_only_once: false,
            delay: default_delay(),
            duration: default_duration(),
            ease: default_ease(),
            from: default_from(),
            to: default_to(),
            style_class: None,
        }
    }
}

impl SplitTextConfig {
    /// Default configuration for `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Builder: set split granularity
    pub fn split(mut self, split: Granularity) -> Self {
        self.split = split;
        self
    }

    /// Builder: reveal only on the first entry
    pub fn animate_only_once(mut self, once: bool) -> Self {
        self.animate_only_once = once;
        self
    }

    /// Builder: set stagger step in milliseconds
    pub fn delay_ms(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Builder: set per-fragment duration in seconds
    pub fn duration_secs(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: set easing identifier
    pub fn ease(mut self, ease: impl Into<String>) -> Self {
        self.ease = ease.into();
        self
    }

    /// Builder: set both visual endpoints
    pub fn from_to(mut self, from: VisualState, to: VisualState) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Builder: set container class name
    pub fn style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = Some(class.into());
        self
    }

    pub fn stagger(&self) -> Stagger {
        Stagger::new(self.delay)
    }

    /// Time from run start until the last of `count` fragments settles
    pub fn run_length_secs(&self, count: usize) -> f32 {
        self.stagger().run_length_secs(count, self.duration)
    }

    /// Parse from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SplitTextConfig::default();

        assert_eq!(config.split, Granularity::Characters);
        assert!(!config.animate_only_once);
        assert_eq!(config.delay, 50.0);
        assert_eq!(config.duration, 2.0);
        assert_eq!(config.ease, "elastic.out(1, 0.3)");
        assert_eq!(config.from, VisualState::new(0.0, 20.0));
        assert_eq!(config.to, VisualState::new(1.0, 0.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SplitTextConfig::from_toml_str(
            r#"
            text = "Hello"
            split = "words"
            animate_only_once = true
            from = { opacity = 0, vertical_offset = 40 }
            "#,
        )
        .unwrap();

        assert_eq!(config.text, "Hello");
        assert_eq!(config.split, Granularity::Words);
        assert!(config.animate_only_once);
        assert_eq!(config.from, VisualState::new(0.0, 40.0));
        assert_eq!(config.to, VisualState::shown());
        assert_eq!(config.duration, 2.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SplitTextConfig::new("Line one\nLine two")
            .split(Granularity::Lines)
            .delay_ms(120.0)
            .ease("power3.out")
            .style_class("hero-title");

        let toml = config.to_toml().unwrap();
        assert_eq!(SplitTextConfig::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_unknown_split_mode_is_a_parse_error() {
        let err = SplitTextConfig::from_toml_str(r#"split = "sentences""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SplitTextConfig::load_from_path(Path::new("/nonexistent/unveil.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
