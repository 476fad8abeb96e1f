//! Configuration persistence for pagemark settings

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Opaque RGB markup color, stored and serialized as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct InvalidColor(pub String);

impl MarkColor {
    pub const YELLOW: MarkColor = MarkColor::rgb(0xFF, 0xFF, 0x00);
    pub const RED: MarkColor = MarkColor::rgb(0xFF, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to RGBA bytes with the given alpha (0-255)
    pub fn to_rgba_u8(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for MarkColor {
    fn default() -> Self {
        Self::YELLOW
    }
}

impl FromStr for MarkColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for MarkColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarkColor> for String {
    fn from(c: MarkColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for MarkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagemarkConfig {
    /// Fixed scale at which document pages are rasterized once on load
    pub render_scale: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub zoom_step: f32,
    /// Eraser pick radius in display pixels
    pub erase_threshold: f32,
    pub highlight_colors: Vec<MarkColor>,
    pub default_highlight_color: MarkColor,
    pub line_colors: Vec<MarkColor>,
    pub default_line_color: MarkColor,
    /// Highlight alpha presets (0-255)
    pub transparency_options: Vec<u8>,
    pub default_alpha: u8,
    pub line_width_options: Vec<u32>,
    pub default_line_width: u32,
    /// A highlight drag must exceed this on both axes to be kept
    pub min_highlight_extent: f32,
    /// A line drag must exceed this on either axis to be kept
    pub min_line_extent: f32,
}

impl Default for PagemarkConfig {
    fn default() -> Self {
        Self {
            render_scale: 1.5,
            zoom_min: 0.5,
            zoom_max: 2.0,
            zoom_step: 0.25,
            erase_threshold: 10.0,
            highlight_colors: vec![
                MarkColor::YELLOW,
                MarkColor::rgb(0x00, 0xFF, 0x00),
                MarkColor::rgb(0xFF, 0x69, 0xB4),
                MarkColor::rgb(0x00, 0xFF, 0xFF),
                MarkColor::rgb(0xFF, 0xA5, 0x00),
            ],
            default_highlight_color: MarkColor::YELLOW,
            line_colors: vec![
                MarkColor::RED,
                MarkColor::rgb(0x00, 0x00, 0xFF),
                MarkColor::rgb(0x00, 0xAA, 0x00),
                MarkColor::rgb(0xFF, 0x66, 0x00),
                MarkColor::rgb(0x00, 0x00, 0x00),
            ],
            default_line_color: MarkColor::RED,
            // 30%, 50% and 70% opaque
            transparency_options: vec![77, 128, 179],
            default_alpha: 77,
            line_width_options: vec![2, 3, 5, 8],
            default_line_width: 3,
            min_highlight_extent: 5.0,
            min_line_extent: 3.0,
        }
    }
}

impl PagemarkConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "pagemark";

    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: PagemarkConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Replace values that would break zooming, rendering or hit-testing
    /// with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.zoom_min) || !positive(self.zoom_max) || self.zoom_min > self.zoom_max {
            log::warn!(
                "Invalid zoom range {}..{}, using {}..{}",
                self.zoom_min,
                self.zoom_max,
                defaults.zoom_min,
                defaults.zoom_max
            );
            self.zoom_min = defaults.zoom_min;
            self.zoom_max = defaults.zoom_max;
        }
        if !positive(self.zoom_step) {
            log::warn!("Invalid zoom_step {}, using {}", self.zoom_step, defaults.zoom_step);
            self.zoom_step = defaults.zoom_step;
        }
        if !positive(self.render_scale) {
            log::warn!(
                "Invalid render_scale {}, using {}",
                self.render_scale,
                defaults.render_scale
            );
            self.render_scale = defaults.render_scale;
        }
        if !(self.erase_threshold.is_finite() && self.erase_threshold >= 0.0) {
            log::warn!(
                "Invalid erase_threshold {}, using {}",
                self.erase_threshold,
                defaults.erase_threshold
            );
            self.erase_threshold = defaults.erase_threshold;
        }
        if self.default_line_width == 0 {
            self.default_line_width = 1;
        }
        self.line_width_options.retain(|&w| w > 0);
        self
    }

    /// Whether `alpha` is one of the offered highlight opacities
    pub fn allows_alpha(&self, alpha: u8) -> bool {
        self.transparency_options.is_empty() || self.transparency_options.contains(&alpha)
    }

    pub fn allows_line_width(&self, width: u32) -> bool {
        width > 0 && (self.line_width_options.is_empty() || self.line_width_options.contains(&width))
    }

    pub fn allows_highlight_color(&self, color: MarkColor) -> bool {
        self.highlight_colors.is_empty() || self.highlight_colors.contains(&color)
    }

    pub fn allows_line_color(&self, color: MarkColor) -> bool {
        self.line_colors.is_empty() || self.line_colors.contains(&color)
    }

    /// Clamp a zoom level into the configured range
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        // Not `f32::clamp`, which panics on an inverted or NaN range
        zoom.max(self.zoom_min).min(self.zoom_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let c: MarkColor = "#FF69B4".parse().unwrap();
        assert_eq!(c, MarkColor::rgb(0xFF, 0x69, 0xB4));
        assert_eq!(c.to_string(), "#FF69B4");
        assert_eq!("#00aa00".parse::<MarkColor>().unwrap(), MarkColor::rgb(0, 0xAA, 0));
    }

    #[test]
    fn test_reject_malformed_color() {
        assert!("FFFF00".parse::<MarkColor>().is_err());
        assert!("#FFF".parse::<MarkColor>().is_err());
        assert!("#GG0000".parse::<MarkColor>().is_err());
        assert!("#ÿÿÿ".parse::<MarkColor>().is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PagemarkConfig =
            serde_json::from_str(r##"{"erase_threshold": 4.0, "default_line_color": "#0000FF"}"##)
                .unwrap();
        assert_eq!(config.erase_threshold, 4.0);
        assert_eq!(config.default_line_color, MarkColor::rgb(0, 0, 0xFF));
        assert_eq!(config.zoom_max, 2.0);
        assert_eq!(config.default_alpha, 77);
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = PagemarkConfig::default();
        config.render_scale = 2.0;
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(PagemarkConfig::load_from(&path).unwrap(), config);
        assert!(PagemarkConfig::load_from(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_inverted_zoom_range_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"zoom_min": 2.0, "zoom_max": 0.5, "zoom_step": 0.0}"#).unwrap();

        let config = PagemarkConfig::load_from(&path).unwrap();
        assert_eq!((config.zoom_min, config.zoom_max), (0.5, 2.0));
        assert_eq!(config.zoom_step, 0.25);
        assert_eq!(config.clamp_zoom(1.0), 1.0);
    }

    #[test]
    fn test_clamp_zoom_never_panics() {
        let inverted: PagemarkConfig =
            serde_json::from_str(r#"{"zoom_min": 2.0, "zoom_max": 0.5}"#).unwrap();
        assert_eq!(inverted.clamp_zoom(1.0), 0.5);

        let mut nan = PagemarkConfig::default();
        nan.zoom_min = f32::NAN;
        assert_eq!(nan.clamp_zoom(3.0), 2.0);
    }

    #[test]
    fn test_sanitize_rejects_bad_scales() {
        let config: PagemarkConfig = serde_json::from_str(
            r#"{"render_scale": -1.0, "erase_threshold": -3.0, "default_line_width": 0,
                "line_width_options": [0, 4]}"#,
        )
        .unwrap();
        let config = config.sanitized();
        assert_eq!(config.render_scale, 1.5);
        assert_eq!(config.erase_threshold, 10.0);
        assert_eq!(config.default_line_width, 1);
        assert_eq!(config.line_width_options, vec![4]);
        assert_eq!(PagemarkConfig::default().sanitized(), PagemarkConfig::default());
    }

    #[test]
    fn test_presets() {
        let config = PagemarkConfig::default();
        assert!(config.allows_alpha(128));
        assert!(!config.allows_alpha(200));
        assert!(config.allows_line_width(8));
        assert!(!config.allows_line_width(4));
        assert!(config.allows_highlight_color(MarkColor::rgb(0xFF, 0x69, 0xB4)));
        assert!(!config.allows_highlight_color(MarkColor::RED));
        assert!(config.allows_line_color(MarkColor::rgb(0, 0, 0)));

        let open = PagemarkConfig {
            transparency_options: Vec::new(),
            ..PagemarkConfig::default()
        };
        assert!(open.allows_alpha(200));
    }

    #[test]
    fn test_clamp_zoom() {
        let config = PagemarkConfig::default();
        assert_eq!(config.clamp_zoom(3.0), 2.0);
        assert_eq!(config.clamp_zoom(0.1), 0.5);
        assert_eq!(config.clamp_zoom(1.25), 1.25);
    }
}
