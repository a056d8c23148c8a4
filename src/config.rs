use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "AnimationConfig::default_fps")]
    pub fps: f64,
    /// Most nominal frames a single late frame may catch up on.
    #[serde(default = "AnimationConfig::default_max_catch_up_frames")]
    pub max_catch_up_frames: f64,
    /// Seconds per parameter oscillation.
    #[serde(default = "AnimationConfig::default_parameter_period")]
    pub parameter_period: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// Scale applied to wheel, trackpad and pinch deltas.
    #[serde(default = "NavigationConfig::default_wheel_step")]
    pub wheel_step: f64,
    #[serde(default = "NavigationConfig::default_pixels_per_line")]
    pub pixels_per_line: f64,
    /// Draw reduced quality frames while the view is being dragged.
    #[serde(default = "NavigationConfig::default_dynamic_quality")]
    pub dynamic_quality: bool,
    /// Idle seconds after which a wheel or trackpad gesture starts a new undo step.
    #[serde(default = "NavigationConfig::default_coalesce_timeout")]
    pub coalesce_timeout: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterConfig {
    /// Minimum seconds between two keyboard edits of integer parameters.
    #[serde(default = "ParameterConfig::default_integer_edit_interval")]
    pub integer_edit_interval: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NavigatorConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub parameters: ParameterConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Plot Navigator".to_string(), width: 1280, height: 720 }
    }
}

impl AnimationConfig {
    const fn default_fps() -> f64 {
        90.0
    }

    const fn default_max_catch_up_frames() -> f64 {
        5.0
    }

    const fn default_parameter_period() -> f64 {
        4.0
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: Self::default_fps(),
            max_catch_up_frames: Self::default_max_catch_up_frames(),
            parameter_period: Self::default_parameter_period(),
        }
    }
}

impl NavigationConfig {
    const fn default_wheel_step() -> f64 {
        5.0
    }

    const fn default_pixels_per_line() -> f64 {
        20.0
    }

    const fn default_dynamic_quality() -> bool {
        true
    }

    const fn default_coalesce_timeout() -> f64 {
        0.5
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            wheel_step: Self::default_wheel_step(),
            pixels_per_line: Self::default_pixels_per_line(),
            dynamic_quality: Self::default_dynamic_quality(),
            coalesce_timeout: Self::default_coalesce_timeout(),
        }
    }
}

impl ParameterConfig {
    const fn default_integer_edit_interval() -> f64 {
        0.25
    }
}

impl Default for ParameterConfig {
    fn default() -> Self {
        Self { integer_edit_interval: Self::default_integer_edit_interval() }
    }
}

impl NavigatorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(fps) = overrides.fps {
            self.animation.fps = fps;
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.fps.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.fps.is_some() {
            fields.push("fps");
        }
        fields
    }
}
