//! Test fixtures and constants.

use kernelsketch::models::{AppConfig, CanvasConfig, NamedColor};

/// Seeds used across tests
pub mod seeds {
    pub const STRIPES: u64 = 7;
    pub const SHORT_RUN: u64 = 42;
}

/// A small canvas that keeps emboss-heavy runs fast
pub fn small_config(seed: u64) -> AppConfig {
    AppConfig {
        canvas: CanvasConfig {
            width: 30,
            height: 20,
            scale: 2,
        },
        seed: Some(seed),
        ..Default::default()
    }
}

/// Config acting on every draw call
pub fn eager_config(seed: u64) -> AppConfig {
    let mut config = small_config(seed);
    config.schedule.interval = 1;
    config
}

/// A four-color palette with one repeated entry
pub fn repeating_palette() -> Vec<NamedColor> {
    vec![
        NamedColor::new("ink", "#000000"),
        NamedColor::new("paper", "#fff1e8"),
        NamedColor::new("accent-red", "#ff004d"),
        NamedColor::new("ink-again", "#000000"),
        NamedColor::new("sky-blue", "#29adff"),
    ]
}

/// YAML document exercising every config section
pub const FULL_YAML: &str = r##"
canvas: { width: 48, height: 32, scale: 3 }
palette:
  - { name: black, color: "#000000" }
  - { name: dark-blue, color: "#1d2b53" }
  - { name: red, color: "#ff004d" }
  - { name: black-again, color: "#000" }
schedule: { interval: 5, probability: 0.5 }
filters: { blur: 0.2, sharpen: 0.3, emboss_min_size: 3, emboss_size_cycle: 7 }
init: { stripes: 1.0, columns: 2, rows: 2 }
seed: 1234
"##;
