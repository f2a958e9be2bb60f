use crate::error::SketchError;
use crate::models::{AppConfig, FilterConfig, InitConfig, ScheduleConfig};
use palette_convolve::{
    convolve, pattern, ColorMapper, EmbossState, Kernel, Palette, ParseColorError, PixelBuffer,
    Rgb, WeightedMatcher,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Kernel family chosen for one draw step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Blur,
    Sharpen,
    Emboss,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Blur => "blur",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Emboss => "emboss",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which initializer painted the first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPattern {
    Stripes,
    Random,
}

/// Record of a filter applied by [`Sketch::draw`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedFilter {
    pub kind: FilterKind,
    /// Kernel side length
    pub size: usize,
    /// Frame number passed to `draw`
    pub frame: u64,
    /// Draw-call count when the filter was chosen
    pub count: u64,
}

impl fmt::Display for AppliedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} at frame {}",
            self.kind, self.size, self.size, self.frame
        )
    }
}

/// The generative sketch: current canvas plus everything the draw step
/// needs to evolve it.
pub struct Sketch {
    buffer: PixelBuffer,
    matcher: WeightedMatcher,
    emboss: EmbossState,
    rng: StdRng,
    count: u64,
    schedule: ScheduleConfig,
    filters: FilterConfig,
    init_pattern: InitPattern,
}

impl Sketch {
    /// Build a sketch from config, seeding the RNG from `config.seed` or
    /// from entropy.
    pub fn new(config: &AppConfig) -> Result<Self, SketchError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &AppConfig, mut rng: StdRng) -> Result<Self, SketchError> {
        config.validate()?;

        let colors = config.colors()?;
        let palette = Palette::dedup(colors.iter().copied())?;
        let (buffer, init_pattern) = initial_buffer(config, &colors, &palette, &mut rng)?;
        let emboss = EmbossState::random(&mut rng);

        tracing::info!(
            width = buffer.width(),
            height = buffer.height(),
            colors = colors.len(),
            unique = palette.len(),
            pattern = ?init_pattern,
            "Initialized sketch"
        );

        Ok(Self {
            buffer,
            matcher: WeightedMatcher::new(palette),
            emboss,
            rng,
            count: 0,
            schedule: config.schedule,
            filters: config.filters,
            init_pattern,
        })
    }

    /// One draw step.
    ///
    /// Every `schedule.interval`-th call (starting with the first) a filter
    /// is applied with probability `schedule.probability`. The call counter
    /// advances on every call.
    pub fn draw(&mut self, frame: u64) -> Result<Option<AppliedFilter>, SketchError> {
        let due = self.count % self.schedule.interval == 0
            && self.rng.gen::<f64>() < self.schedule.probability;

        let applied = if due {
            let (kind, kernel) = self.choose_kernel()?;
            self.apply_kernel(&kernel);
            let applied = AppliedFilter {
                kind,
                size: kernel.size(),
                frame,
                count: self.count,
            };
            tracing::debug!(
                kind = %applied.kind,
                size = applied.size,
                frame,
                angle = self.emboss.angle(),
                "Applied filter"
            );
            Some(applied)
        } else {
            None
        };

        self.count += 1;
        Ok(applied)
    }

    /// Convolve the canvas with `kernel` and snap it back onto the palette.
    pub fn apply_kernel(&mut self, kernel: &Kernel) {
        self.buffer = convolve(&self.buffer, kernel, Some(&self.matcher));
    }

    fn choose_kernel(&mut self) -> Result<(FilterKind, Kernel), SketchError> {
        if self.rng.gen::<f64>() < self.filters.blur {
            return Ok((FilterKind::Blur, Kernel::box_blur(3)?));
        }
        if self.rng.gen::<f64>() < self.filters.sharpen {
            return Ok((FilterKind::Sharpen, Kernel::sharpen()));
        }

        let spread = (self.count % self.filters.emboss_size_cycle) as f64;
        let size =
            2 * (self.rng.gen::<f64>() * spread).floor() as usize + self.filters.emboss_min_size;
        let kernel = self.emboss.next_kernel(size, &mut self.rng)?;
        Ok((FilterKind::Emboss, kernel))
    }

    /// Map a hex color through the palette matcher.
    ///
    /// Debug helper: logs and returns `(input, output)`.
    pub fn test_color(&self, hex: &str) -> Result<(Rgb, Rgb), ParseColorError> {
        let input: Rgb = hex.parse()?;
        let output = self
            .matcher
            .nearest(input.r as f64, input.g as f64, input.b as f64);
        tracing::info!("{input} -> {output}");
        Ok((input, output))
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn palette(&self) -> &Palette {
        self.matcher.palette()
    }

    pub fn matcher(&self) -> &WeightedMatcher {
        &self.matcher
    }

    /// Draw calls so far
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn emboss_angle(&self) -> f64 {
        self.emboss.angle()
    }

    pub fn init_pattern(&self) -> InitPattern {
        self.init_pattern
    }
}

fn initial_buffer(
    config: &AppConfig,
    colors: &[Rgb],
    palette: &Palette,
    rng: &mut StdRng,
) -> Result<(PixelBuffer, InitPattern), SketchError> {
    let (width, height) = (config.canvas.width, config.canvas.height);
    let InitConfig {
        stripes,
        columns,
        rows,
    } = config.init;

    if rng.gen::<f64>() < stripes {
        let buffer = pattern::stripes(width, height, colors, columns, rows)?;
        Ok((buffer, InitPattern::Stripes))
    } else {
        let buffer = pattern::randomize(width, height, palette, rng)?;
        Ok((buffer, InitPattern::Random))
    }
}
