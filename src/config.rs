//! Extraction configuration
//!
//! Settings are layered: compiled-in defaults from `default_config.toml`,
//! then an optional user TOML file, then CLI overrides applied by the
//! command layer. TOML values are walked by hand; unknown keys are
//! ignored, missing keys keep the layer below.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;

use crate::annotation::LabelPolicy;
use crate::slide::errors::{ExtractError, ExtractResult};

lazy_static! {
    // Parse the embedded defaults at startup
    static ref DEFAULTS: Config = {
        let content = include_str!("../default_config.toml");
        Config::overlay_str(content, Config::builtin()).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse built-in defaults: {}", e);
            Config::builtin()
        })
    };
}

/// Settings for one extraction run
#[derive(Debug, Clone)]
pub struct Config {
    /// Output directory for patch PNGs, created if absent
    pub patches_dir: PathBuf,
    /// Radius in pixels of the ground-truth disk
    pub context_mask_radius: u32,
    /// Output patch width in pixels
    pub patch_width: u32,
    /// Output patch height in pixels
    pub patch_height: u32,
    /// Ratio between native read size and output size
    pub resolution_scale: f64,
    /// Pyramid level for region reads
    pub pyramid_level: u32,
    /// Class-label strictness policy
    pub label_policy: LabelPolicy,
}

impl Default for Config {
    fn default() -> Self {
        DEFAULTS.clone()
    }
}

impl Config {
    /// Hard-coded fallback used when even the embedded defaults fail
    fn builtin() -> Self {
        Config {
            patches_dir: PathBuf::from("patches"),
            context_mask_radius: 30,
            patch_width: 256,
            patch_height: 256,
            resolution_scale: 1.0,
            pyramid_level: 0,
            label_policy: LabelPolicy::Strict,
        }
    }

    /// Load settings from a TOML file, layered over the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ExtractError::ConfigError(format!(
                "Cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::overlay_str(&content, Config::default())
    }

    /// Parse TOML settings layered over the defaults
    pub fn from_str(content: &str) -> ExtractResult<Self> {
        Self::overlay_str(content, Config::default())
    }

    /// Overlay TOML content onto a base configuration
    fn overlay_str(content: &str, base: Config) -> ExtractResult<Self> {
        let value: toml::Value = content
            .parse()
            .map_err(|e| ExtractError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let mut config = base;
        if let Some(dir) = value.get("patches_dir").and_then(|v| v.as_str()) {
            config.patches_dir = PathBuf::from(dir);
        }
        if let Some(radius) = value.get("context_mask_radius").and_then(|v| v.as_integer()) {
            config.context_mask_radius = radius as u32;
        }
        if let Some(width) = value.get("patch_width").and_then(|v| v.as_integer()) {
            config.patch_width = width as u32;
        }
        if let Some(height) = value.get("patch_height").and_then(|v| v.as_integer()) {
            config.patch_height = height as u32;
        }
        if let Some(scale) = value
            .get("resolution_scale")
            .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
        {
            config.resolution_scale = scale;
        }
        if let Some(level) = value.get("pyramid_level").and_then(|v| v.as_integer()) {
            config.pyramid_level = level as u32;
        }
        if let Some(policy) = value.get("label_policy").and_then(|v| v.as_str()) {
            config.label_policy = parse_label_policy(policy)?;
        }
        Ok(config)
    }
}

/// Parse a label-policy name from configuration
pub fn parse_label_policy(name: &str) -> ExtractResult<LabelPolicy> {
    match name.to_lowercase().as_str() {
        "strict" => Ok(LabelPolicy::Strict),
        "lenient" => Ok(LabelPolicy::Lenient),
        other => Err(ExtractError::ConfigError(format!(
            "Unknown label policy: {}",
            other
        ))),
    }
}
