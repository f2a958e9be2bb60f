use palette_convolve::{BufferError, ConvolveError, KernelError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Invalid color '{name}': {value}")]
    Color { name: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: usize, height: usize },

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] ConvolveError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
}

impl From<KernelError> for SketchError {
    fn from(e: KernelError) -> Self {
        SketchError::Pipeline(e.into())
    }
}

impl From<BufferError> for SketchError {
    fn from(e: BufferError) -> Self {
        SketchError::Pipeline(e.into())
    }
}

impl From<PaletteError> for SketchError {
    fn from(e: PaletteError) -> Self {
        SketchError::Config(e.into())
    }
}
