pub mod config;

pub use config::{AppConfig, CanvasConfig, FilterConfig, InitConfig, NamedColor, ScheduleConfig};
