//! Configuration file support for svgicon.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/svgicon/config.toml`. Settings include canvas sizes, document
//! placement, the background disc and user palettes.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{BackgroundConfig, PaletteConfig, RenderConfig};

use crate::document::ParseOptions;
use crate::draw::DecodePolicy;
use crate::geometry::Alignment;
use crate::icon::{BackgroundOptions, RenderOptions};
use crate::palette::{PaletteError, PaletteTable};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_RENDER_SIZE: u32 = 16384;
const MAX_RESOLUTION: usize = 4096;

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [render]
/// render_size = 1200
/// output_size = 400
/// document_fraction = 0.5
/// alignment = "MM"
///
/// [background]
/// enabled = true
/// disc_fraction = 0.8
/// angle_degrees = 45.0
/// start = "primary"
/// end = "extra1"
///
/// [palettes.sunset]
/// primary = "#e65100"
/// secondary = "white"
/// extra1 = [255, 214, 0]
/// extra2 = "#43a047"
/// extra3 = "#1e88e5"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Canvas and placement settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Gradient disc painted beneath re-styled icons
    #[serde(default)]
    pub background: BackgroundConfig,

    /// User palettes, added to (or replacing) the built-in ones by name
    #[serde(default)]
    pub palettes: BTreeMap<String, PaletteConfig>,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `render_size`: 1 - 16384
    /// - `output_size`: 1 - `render_size`
    /// - `document_fraction`, `disc_fraction`: 0.01 - 1.0
    /// - `alignment`: one of the nine anchor codes
    /// - `resolution`: 1 - 4096
    fn validate_and_clamp(&mut self) {
        let render = &mut self.render;

        if !(1..=MAX_RENDER_SIZE).contains(&render.render_size) {
            warn!(
                "Invalid render_size {}, clamping to 1-{MAX_RENDER_SIZE} range",
                render.render_size
            );
            render.render_size = render.render_size.clamp(1, MAX_RENDER_SIZE);
        }

        if !(1..=render.render_size).contains(&render.output_size) {
            warn!(
                "Invalid output_size {}, clamping to 1-{} range",
                render.output_size, render.render_size
            );
            render.output_size = render.output_size.clamp(1, render.render_size);
        }

        render.document_fraction = clamp_fraction("document_fraction", render.document_fraction, 0.5);

        if render.alignment.parse::<Alignment>().is_err() {
            warn!(
                "Invalid alignment '{}', falling back to 'MM'",
                render.alignment
            );
            render.alignment = "MM".to_string();
        }

        let background = &mut self.background;
        background.disc_fraction = clamp_fraction("disc_fraction", background.disc_fraction, 0.8);

        if !background.angle_degrees.is_finite() {
            warn!(
                "Invalid angle_degrees {}, falling back to 45",
                background.angle_degrees
            );
            background.angle_degrees = 45.0;
        }

        if !(1..=MAX_RESOLUTION).contains(&background.resolution) {
            warn!(
                "Invalid gradient resolution {}, clamping to 1-{MAX_RESOLUTION} range",
                background.resolution
            );
            background.resolution = background.resolution.clamp(1, MAX_RESOLUTION);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/svgicon/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("svgicon");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Built-in palettes with the user's palettes merged on top.
    ///
    /// # Errors
    /// Returns [`PaletteError::Color`] naming the first palette with an
    /// undecodable color.
    pub fn palette_table(&self) -> Result<PaletteTable, PaletteError> {
        let mut table = PaletteTable::builtin();
        for (name, spec) in &self.palettes {
            table.insert(name, spec.to_palette(name)?);
        }
        Ok(table)
    }

    /// Render options described by this configuration.
    pub fn render_options(&self) -> RenderOptions {
        let render = &self.render;
        let background = &self.background;

        RenderOptions {
            render_size: render.render_size,
            output_size: render.output_size,
            document_fraction: render.document_fraction,
            alignment: render.alignment.parse().unwrap_or_default(),
            parse: ParseOptions {
                policy: if render.strict_colors {
                    DecodePolicy::Strict
                } else {
                    DecodePolicy::Lenient
                },
            },
            background: background.enabled.then_some(BackgroundOptions {
                disc_fraction: background.disc_fraction,
                angle_degrees: background.angle_degrees,
                resolution: background.resolution,
                start: background.start,
                end: background.end,
            }),
        }
    }
}

fn clamp_fraction(name: &str, value: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        warn!("Invalid {name} {value}, falling back to {fallback}");
        return fallback;
    }
    if !(0.01..=1.0).contains(&value) {
        warn!("Invalid {name} {value:.3}, clamping to 0.01-1.0 range");
        return value.clamp(0.01, 1.0);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::WHITE;
    use crate::palette::{PaletteResolver, PaletteSlot};
    use tempfile::TempDir;

    fn load_str(text: &str) -> Config {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, text).unwrap();
        Config::load_from(&path).unwrap()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.render_size, 1200);
        assert_eq!(config.render.output_size, 400);
        assert!(config.background.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = load_str("[render]\noutput_size = 64\n\n[background]\nend = \"extra3\"\n");
        assert_eq!(config.render.output_size, 64);
        assert_eq!(config.render.render_size, 1200);
        assert_eq!(config.background.start, PaletteSlot::Primary);
        assert_eq!(config.background.end, PaletteSlot::Extra3);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = load_str(
            "[render]\nrender_size = 100\noutput_size = 500\ndocument_fraction = 3.0\nalignment = \"XX\"\n\n[background]\nresolution = 0\n",
        );
        assert_eq!(config.render.output_size, 100);
        assert_eq!(config.render.document_fraction, 1.0);
        assert_eq!(config.render.alignment, "MM");
        assert_eq!(config.background.resolution, 1);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn user_palettes_merge_over_builtins() {
        let config = load_str(
            "[palettes.Mono]\nprimary = \"black\"\nsecondary = \"#fff\"\nextra1 = [1, 2, 3]\nextra2 = \"red\"\nextra3 = \"blue\"\n",
        );
        let table = config.palette_table().unwrap();
        let mono = table.resolve("mono").unwrap();
        assert_eq!(mono.secondary, WHITE);
        assert_eq!(mono.extra1, crate::draw::Color::rgb(1, 2, 3));
        assert!(table.resolve("ruby").is_some());
    }

    #[test]
    fn bad_palette_color_names_the_palette() {
        let config = load_str(
            "[palettes.broken]\nprimary = \"nope\"\nsecondary = \"white\"\nextra1 = \"red\"\nextra2 = \"red\"\nextra3 = \"red\"\n",
        );
        let err = config.palette_table().unwrap_err();
        assert!(matches!(err, PaletteError::Color { palette, .. } if palette == "broken"));
    }

    #[test]
    fn render_options_follow_config() {
        let config = load_str(
            "[render]\nalignment = \"lt\"\nstrict_colors = true\n\n[background]\nenabled = false\n",
        );
        let options = config.render_options();
        assert_eq!(options.alignment.to_string(), "LT");
        assert_eq!(options.parse.policy, DecodePolicy::Strict);
        assert!(options.background.is_none());
    }

    #[test]
    fn schema_describes_sections() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        assert!(schema.contains("render_size"));
        assert!(schema.contains("disc_fraction"));
    }
}
