//! Configuration loader for the pdfy compiler.
//!
//! `defaults/pdfy.default.toml` is embedded into the library so that the documented defaults
//! and the analyzer's behavior stay in sync. It declares the registered fonts, the named
//! colors, the valid numeric ranges and every default value the semantic analyzer falls back
//! to. Applications layer user-specific files on top of those defaults via [`Loader`] before
//! deserializing into [`PdfyConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pdfy::model::PageNumberPosition;

const DEFAULT_TOML: &str = include_str!("../../defaults/pdfy.default.toml");

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid"));

/// Top-level configuration consumed by the semantic analyzer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PdfyConfig {
    pub fonts: FontsConfig,
    pub colors: ColorsConfig,
    pub limits: LimitsConfig,
    pub styles: BuiltinStylesConfig,
    pub page_number: PageNumberDefaults,
    pub title: TitleDefaults,
    pub numberize_title: NumberizeTitleDefaults,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FontsConfig {
    pub default: String,
    pub registered: Vec<String>,
}

/// Accepted colors: the named list (case-insensitive) plus `#rrggbb` hex literals.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorsConfig {
    pub default: String,
    pub named: Vec<String>,
}

/// An inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub fn contains(&self, value: i64) -> bool {
        i64::from(self.min) <= value && value <= i64::from(self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LimitsConfig {
    pub font_size: Bounds,
    pub title_level: Bounds,
    pub page_start: Bounds,
}

/// One built-in style.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StyleDefaults {
    pub name: String,
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
}

/// The two styles every document starts with.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BuiltinStylesConfig {
    pub section: StyleDefaults,
    pub title: StyleDefaults,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageNumberDefaults {
    pub position: PageNumberPosition,
    pub font: String,
    pub font_size: u32,
    pub font_color: String,
    pub start: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TitleDefaults {
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NumberizeTitleDefaults {
    pub start: u32,
}

impl PdfyConfig {
    pub fn is_registered_font(&self, font: &str) -> bool {
        self.fonts.registered.iter().any(|known| known == font)
    }

    pub fn is_known_color(&self, color: &str) -> bool {
        HEX_COLOR.is_match(color)
            || self
                .colors
                .named
                .iter()
                .any(|known| known.eq_ignore_ascii_case(color))
    }

    /// Reject configurations the analyzer cannot honor
    fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("limits.font_size", self.limits.font_size),
            ("limits.title_level", self.limits.title_level),
            ("limits.page_start", self.limits.page_start),
        ];
        for (key, bounds) in limits {
            if bounds.min > bounds.max {
                return Err(invalid(format!(
                    "{key}: min {} is greater than max {}",
                    bounds.min, bounds.max
                )));
            }
        }
        // Title levels index the numbering counters
        if self.limits.title_level.min == 0 {
            return Err(invalid("limits.title_level: levels start at 1".to_string()));
        }

        let in_range = [
            ("styles.section.font_size", self.styles.section.font_size, self.limits.font_size),
            ("styles.title.font_size", self.styles.title.font_size, self.limits.font_size),
            ("page_number.font_size", self.page_number.font_size, self.limits.font_size),
            ("page_number.start", self.page_number.start, self.limits.page_start),
            ("title.level", self.title.level, self.limits.title_level),
            ("numberize_title.start", self.numberize_title.start, self.limits.title_level),
        ];
        for (key, value, bounds) in in_range {
            if !bounds.contains(i64::from(value)) {
                return Err(invalid(format!(
                    "{key}: {value} is outside [{}, {}]",
                    bounds.min, bounds.max
                )));
            }
        }

        let fonts = [
            ("fonts.default", &self.fonts.default),
            ("styles.section.font", &self.styles.section.font),
            ("styles.title.font", &self.styles.title.font),
            ("page_number.font", &self.page_number.font),
        ];
        for (key, font) in fonts {
            if !self.is_registered_font(font) {
                return Err(invalid(format!("{key}: font '{font}' is not registered")));
            }
        }

        let colors = [
            ("colors.default", &self.colors.default),
            ("styles.section.font_color", &self.styles.section.font_color),
            ("styles.title.font_color", &self.styles.title.font_color),
            ("page_number.font_color", &self.page_number.font_color),
        ];
        for (key, color) in colors {
            if !self.is_known_color(color) {
                return Err(invalid(format!("{key}: color '{color}' is not known")));
            }
        }

        if self.styles.section.name == self.styles.title.name {
            return Err(invalid(
                "styles: the built-in section and title styles need distinct names".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Message(message)
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the resulting configuration.
    pub fn build(self) -> Result<PdfyConfig, ConfigError> {
        let config: PdfyConfig = self.builder.build()?.try_deserialize()?;
        config.validate()?;
        log::debug!(
            "config: {} fonts, {} colors, font sizes {}..={}",
            config.fonts.registered.len(),
            config.colors.named.len(),
            config.limits.font_size.min,
            config.limits.font_size.max
        );
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PdfyConfig, ConfigError> {
    Loader::new().build()
}
