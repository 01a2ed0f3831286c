//! Configuration loading.
//! Reads penguins.toml from the current directory or the path in the
//! PENGUINS_CONFIG env var.  Every field has a default, so the file is optional.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::loader::DataSource;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Dataset file; the bundled sample is used when unset.
    pub path: Option<PathBuf>,
}

/// Bounds of the body-mass slider, in grams.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "default_mass_min")]
    pub mass_min: f64,
    #[serde(default = "default_mass_max")]
    pub mass_max: f64,
    #[serde(default = "default_mass_step")]
    pub mass_step: f64,
    #[serde(default = "default_mass_max")]
    pub mass_default: f64,
}

fn default_mass_min() -> f64 { 2000.0 }
fn default_mass_max() -> f64 { 6000.0 }
fn default_mass_step() -> f64 { 100.0 }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mass_min: default_mass_min(),
            mass_max: default_mass_max(),
            mass_step: default_mass_step(),
            mass_default: default_mass_max(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 { 1280.0 }
fn default_height() -> f32 { 820.0 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DataConfig {
    pub fn source(&self) -> DataSource {
        match &self.path {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::Bundled,
        }
    }
}

impl Config {
    /// Load configuration from penguins.toml.
    /// Checks PENGUINS_CONFIG env var first, then the current directory.
    /// A missing file yields the defaults; an explicitly named one must exist.
    pub fn load() -> Result<Self> {
        match std::env::var("PENGUINS_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let path = Path::new("penguins.toml");
                if path.exists() {
                    Self::from_file(path)
                } else {
                    log::info!("No penguins.toml found, using default configuration");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.filter.validate()?;
        Ok(config)
    }
}

impl FilterConfig {
    fn validate(&self) -> Result<()> {
        let values = [self.mass_min, self.mass_max, self.mass_step, self.mass_default];
        if values.iter().any(|v| !v.is_finite()) {
            bail!("filter bounds must be finite numbers");
        }
        if self.mass_min < 0.0 || self.mass_min >= self.mass_max {
            bail!(
                "filter.mass_min ({}) must be non-negative and below filter.mass_max ({})",
                self.mass_min,
                self.mass_max
            );
        }
        if self.mass_step <= 0.0 {
            bail!("filter.mass_step must be positive, got {}", self.mass_step);
        }
        if !(self.mass_min..=self.mass_max).contains(&self.mass_default) {
            bail!(
                "filter.mass_default ({}) is outside [{}, {}]",
                self.mass_default,
                self.mass_min,
                self.mass_max
            );
        }
        Ok(())
    }
}
