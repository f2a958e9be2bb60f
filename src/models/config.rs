use crate::assets::AssetLoader;
use crate::error::ConfigError;
use palette_convolve::{Palette, Rgb, MAX_KERNEL_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration loaded from sketch.yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Ordered named colors; may contain repeats
    #[serde(default = "default_palette")]
    pub palette: Vec<NamedColor>,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub filters: FilterConfig,

    #[serde(default)]
    pub init: InitConfig,

    /// Fixed RNG seed; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Canvas dimensions and output scale
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default = "default_height")]
    pub height: usize,

    /// Nearest-neighbour upscale factor for PNG output
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_width() -> usize {
    240
}

fn default_height() -> usize {
    160
}

fn default_scale() -> u32 {
    4
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            scale: default_scale(),
        }
    }
}

/// A palette entry as written in the config file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NamedColor {
    pub name: String,
    /// `#rrggbb` (or `#rgb`)
    pub color: String,
}

impl NamedColor {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    pub fn rgb(&self) -> Result<Rgb, ConfigError> {
        self.color.parse().map_err(|_| ConfigError::Color {
            name: self.name.clone(),
            value: self.color.clone(),
        })
    }

    /// camelCase form of the kebab-case name (`dark-blue` -> `darkBlue`)
    pub fn camel_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut upper = false;
        for c in self.name.trim_start_matches('-').chars() {
            if c == '-' {
                upper = !out.is_empty();
            } else if upper {
                out.extend(c.to_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

fn default_palette() -> Vec<NamedColor> {
    [
        ("black", "#000000"),
        ("dark-blue", "#1d2b53"),
        ("dark-purple", "#7e2553"),
        ("dark-green", "#008751"),
        ("brown", "#ab5236"),
        ("dark-grey", "#5f574f"),
        ("light-grey", "#c2c3c7"),
        ("white", "#fff1e8"),
        ("red", "#ff004d"),
        ("orange", "#ffa300"),
        ("yellow", "#ffec27"),
        ("green", "#00e436"),
        ("blue", "#29adff"),
        ("lavender", "#83769c"),
        ("pink", "#ff77a8"),
        ("light-peach", "#ffccaa"),
    ]
    .iter()
    .map(|(name, color)| NamedColor::new(name, color))
    .collect()
}

/// When the draw step acts
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    /// Consider a filter every `interval` draw calls
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Chance of acting on a considered draw call
    #[serde(default = "default_probability")]
    pub probability: f64,
}

fn default_interval() -> u64 {
    20
}

fn default_probability() -> f64 {
    1.0
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            probability: default_probability(),
        }
    }
}

/// Filter choice probabilities and emboss sizing
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "default_blur")]
    pub blur: f64,

    /// Chance of sharpening once blur was not chosen
    #[serde(default = "default_sharpen")]
    pub sharpen: f64,

    /// Smallest emboss kernel; must be odd
    #[serde(default = "default_emboss_min_size")]
    pub emboss_min_size: usize,

    /// Emboss size grows with `count % emboss_size_cycle`
    #[serde(default = "default_emboss_size_cycle")]
    pub emboss_size_cycle: u64,
}

fn default_blur() -> f64 {
    0.1
}

fn default_sharpen() -> f64 {
    0.5
}

fn default_emboss_min_size() -> usize {
    5
}

fn default_emboss_size_cycle() -> u64 {
    11
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blur: default_blur(),
            sharpen: default_sharpen(),
            emboss_min_size: default_emboss_min_size(),
            emboss_size_cycle: default_emboss_size_cycle(),
        }
    }
}

/// Initial pattern choice
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct InitConfig {
    /// Chance of the striped grid; random pixels otherwise
    #[serde(default = "default_stripes")]
    pub stripes: f64,

    #[serde(default = "default_columns")]
    pub columns: usize,

    #[serde(default = "default_rows")]
    pub rows: usize,
}

fn default_stripes() -> f64 {
    0.8
}

fn default_columns() -> usize {
    6
}

fn default_rows() -> usize {
    2
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            stripes: default_stripes(),
            columns: default_columns(),
            rows: default_rows(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    ///
    /// Unreadable, unparsable or invalid configs are logged and replaced by
    /// the defaults.
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        width = config.canvas.width,
                        height = config.canvas.height,
                        colors = config.palette.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to load config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(msg: &str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        }
        fn probability(name: &str, p: f64) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be in [0, 1], got {p}")))
            }
        }

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return invalid("canvas width and height must be > 0");
        }
        if self.canvas.scale == 0 {
            return invalid("canvas.scale must be > 0");
        }
        if self.schedule.interval == 0 {
            return invalid("schedule.interval must be > 0");
        }
        probability("schedule.probability", self.schedule.probability)?;
        probability("filters.blur", self.filters.blur)?;
        probability("filters.sharpen", self.filters.sharpen)?;
        probability("init.stripes", self.init.stripes)?;
        if self.filters.emboss_min_size % 2 == 0 {
            return invalid("filters.emboss_min_size must be odd");
        }
        if self.filters.emboss_size_cycle == 0 {
            return invalid("filters.emboss_size_cycle must be > 0");
        }
        match self.largest_emboss_size() {
            Some(size) if size <= MAX_KERNEL_SIZE => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "filters.emboss_min_size + 2 * (filters.emboss_size_cycle - 1) must be <= {MAX_KERNEL_SIZE}"
                )))
            }
        }
        if self.init.columns == 0 || self.init.rows == 0 {
            return invalid("init.columns and init.rows must be > 0");
        }
        if self.palette.is_empty() {
            return invalid("palette must contain at least one color");
        }
        self.colors().map(|_| ())
    }

    /// Upper bound on the emboss kernel side length, `None` on overflow
    pub fn largest_emboss_size(&self) -> Option<usize> {
        let spread = usize::try_from(self.filters.emboss_size_cycle.checked_sub(1)?).ok()?;
        spread
            .checked_mul(2)?
            .checked_add(self.filters.emboss_min_size)
    }

    /// Configured colors in order, repeats included
    pub fn colors(&self) -> Result<Vec<Rgb>, ConfigError> {
        self.palette.iter().map(NamedColor::rgb).collect()
    }

    /// De-duplicated palette for matching and random fills
    pub fn unique_palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette::dedup(self.colors()?)?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            palette: default_palette(),
            schedule: ScheduleConfig::default(),
            filters: FilterConfig::default(),
            init: InitConfig::default(),
            seed: None,
        }
    }
}
