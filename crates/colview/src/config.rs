#![forbid(unsafe_code)]

//! View configuration loadable from TOML or JSON.
//!
//! ```toml
//! # colview.toml
//! allow_reorder = true
//! animation_duration_ms = 180
//! easing = "ease_in_out"
//! drag_z_index = 10
//!
//! [logging]
//! filter = "colview=debug"
//! format = "json"
//! ```
//!
//! ```rust,ignore
//! let config = ViewConfig::from_toml_file("colview.toml")?;
//! ```
//!
//! Every field has a default, so an empty document is a valid config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::error::ConfigError;
use crate::logging::LoggingConfig;

/// Axis along which the header lays out its columns.
///
/// Layout arithmetic is axis-agnostic; the orientation is carried into
/// snapshots so hosts know which screen axis `left` maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Tunables for a [`ColumnView`](crate::ColumnView).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Whether drag-to-reorder gestures are honored.
    pub allow_reorder: bool,

    /// Duration of sibling slide transitions during a drag.
    pub animation_duration_ms: u64,

    /// Easing used by [`TweenAnimator::from_config`](crate::TweenAnimator::from_config)
    /// and [`ColumnView::with_tween`](crate::ColumnView::with_tween).
    pub easing: Easing,

    /// Z-order of columns at rest.
    pub base_z_index: i32,

    /// Z-order of the dragged column; must exceed `base_z_index`.
    pub drag_z_index: i32,

    pub orientation: Orientation,

    /// Minimum width for columns whose spec leaves it unset.
    pub default_min_width: f64,

    /// Maximum width for columns whose spec leaves it unset. `None` is
    /// unbounded.
    pub default_max_width: Option<f64>,

    pub logging: LoggingConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            allow_reorder: true,
            animation_duration_ms: 250,
            easing: Easing::EaseOut,
            base_z_index: 0,
            drag_z_index: 1,
            orientation: Orientation::Horizontal,
            default_min_width: 0.0,
            default_max_width: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is within range.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.animation_duration_ms > 10_000 {
            errors.push(format!(
                "animation_duration_ms must be <= 10000, got {}",
                self.animation_duration_ms
            ));
        }

        if self.drag_z_index <= self.base_z_index {
            errors.push(format!(
                "drag_z_index ({}) must be greater than base_z_index ({})",
                self.drag_z_index, self.base_z_index
            ));
        }

        if !self.default_min_width.is_finite() || self.default_min_width < 0.0 {
            errors.push(format!(
                "default_min_width must be finite and >= 0, got {}",
                self.default_min_width
            ));
        }

        if let Some(max) = self.default_max_width
            && (max.is_nan() || max < self.default_min_width)
        {
            errors.push(format!(
                "default_max_width ({max}) must be >= default_min_width ({})",
                self.default_min_width
            ));
        }

        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".into());
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing, else
    /// [`ConfigError::Invalid`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;

    #[test]
    fn default_validates_clean() {
        let errors = ViewConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn empty_documents_are_defaults() {
        assert_eq!(ViewConfig::from_toml_str("").unwrap(), ViewConfig::default());
        assert_eq!(ViewConfig::from_json_str("{}").unwrap(), ViewConfig::default());
    }

    #[test]
    fn toml_overrides() {
        let config = ViewConfig::from_toml_str(
            r#"
            allow_reorder = false
            animation_duration_ms = 120
            easing = "linear"
            drag_z_index = 5
            orientation = "vertical"
            default_max_width = 400.0

            [logging]
            filter = "colview=trace"
            format = "json"
            "#,
        )
        .unwrap();
        assert!(!config.allow_reorder);
        assert_eq!(config.animation_duration(), Duration::from_millis(120));
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(config.drag_z_index, 5);
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.default_max_width, Some(400.0));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn validate_catches_z_order() {
        let config = ViewConfig {
            drag_z_index: 0,
            ..ViewConfig::default()
        };
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("drag_z_index")));
    }

    #[test]
    fn validate_catches_inverted_width_bounds() {
        let config = ViewConfig {
            default_min_width: 50.0,
            default_max_width: Some(10.0),
            ..ViewConfig::default()
        };
        assert!(config.validate().iter().any(|e| e.contains("default_max_width")));
    }

    #[test]
    fn loaders_reject_invalid() {
        let err = ViewConfig::from_json_str(r#"{"default_min_width": -1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref e) if e.len() == 1), "{err}");

        let err = ViewConfig::from_toml_str("allow_reorder = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
