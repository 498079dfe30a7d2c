//! Viewer and renderer settings, loaded from TOML.

use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Environment variable naming the config file used by the gallery binary.
pub const CONFIG_ENV: &str = "YIELDCURVE_CHARTS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 800.0,
            min_width: 960.0,
            min_height: 600.0,
            title: "Yield Curve Charts".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Multiplier applied to each chart's layout size for static rendering.
    pub scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub viewer: ViewerConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> ChartResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ChartError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` when given, falling back to defaults on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    fn validate(&self) -> ChartResult<()> {
        if self.render.scale <= 0.0 || self.render.scale.is_nan() {
            return Err(ChartError::Config(format!(
                "render.scale must be positive, got {}",
                self.render.scale
            )));
        }
        if self.viewer.width <= 0.0 || self.viewer.height <= 0.0 {
            return Err(ChartError::Config(
                "viewer width and height must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [viewer]
            title = "Rates Desk"

            [render]
            scale = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.viewer.title, "Rates Desk");
        assert_eq!(config.viewer.width, 1400.0);
        assert_eq!(config.render.scale, 2.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = AppConfig::from_toml_str("[render]\nscale = 0.0").unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = AppConfig::load_or_default(Some(Path::new("/nonexistent/charts.toml")));
        assert_eq!(config, AppConfig::default());
    }
}
