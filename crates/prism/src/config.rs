use crate::geometry::MIN_FACETS;
use crate::timing::TimingCurve;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationMilliSeconds, serde_as};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(500);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Name of the scene the carousel mounts into.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct SceneTarget(String);

crate::impl_string_newtype!(SceneTarget);

/// Image location of a single facet.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct FacetSource(String);

crate::impl_string_newtype!(FacetSource);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Facet image painted as a cover-cropped background.
    #[default]
    #[strum(to_string = "background", serialize = "bg", serialize = "use-bg")]
    Background,
    /// Facet image stretched to the facet size.
    #[strum(to_string = "image", serialize = "img", serialize = "use-img")]
    Image,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CarouselConfig {
    #[serde(default)]
    pub target: SceneTarget,
    #[serde(default)]
    pub images: Vec<FacetSource>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub gap: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_animation_duration")]
    pub animation_duration: Duration,
    #[serde(default)]
    pub timing: TimingCurve,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub initial_slide: usize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_debounce")]
    pub debounce: Duration,
}

fn default_animation_duration() -> Duration {
    DEFAULT_ANIMATION_DURATION
}

fn default_debounce() -> Duration {
    DEFAULT_DEBOUNCE
}

impl CarouselConfig {
    pub fn new(
        target: impl Into<String>,
        images: impl IntoIterator<Item = impl Into<String>>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            target: SceneTarget::new(target),
            images: images.into_iter().map(FacetSource::new).collect(),
            width,
            height,
            gap: 0.0,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            timing: TimingCurve::default(),
            render_mode: RenderMode::default(),
            initial_slide: 0,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Checks everything the layout and the controller rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.is_blank() {
            return Err(ConfigError::MissingTarget);
        }

        let facets = self.images.len();
        match facets {
            0 => return Err(ConfigError::NoFacets),
            n if n < MIN_FACETS => return Err(ConfigError::TooFewFacets(n)),
            _ => {}
        }

        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        if !self.gap.is_finite() || self.width + self.gap <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                name: "gap",
                value: self.gap,
            });
        }

        if self.initial_slide >= facets {
            return Err(ConfigError::InitialSlideOutOfRange {
                slide: self.initial_slide,
                facets,
            });
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Please specify a target scene")]
    MissingTarget,
    #[error("Can not find target scene '{0}'")]
    TargetNotFound(SceneTarget),
    #[error("No facet images configured")]
    NoFacets,
    #[error("A prism needs at least 2 facets, got {0}")]
    TooFewFacets(usize),
    #[error("Invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },
    #[error("Initial slide {slide} is out of range for {facets} facets")]
    InitialSlideOutOfRange { slide: usize, facets: usize },
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "prism").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<CarouselConfig, ConfigError> {
    load_from(&get_config_path()?)
}

/// Reads `path` (if present) layered under `PRISM_*` environment variables.
pub fn load_from(path: &Path) -> Result<CarouselConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("PRISM"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn from_toml_str(toml: &str) -> Result<CarouselConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn default_config() -> Result<CarouselConfig, ConfigError> {
    from_toml_str(DEFAULT_CONFIG)
}

/// Seeds `path` with the bundled configuration. An existing file is left
/// alone; returns whether anything was written.
pub fn write_default_config(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
