use crate::error::SketchError;
use crate::services::Sketch;
use std::time::{Duration, Instant};

/// Per-frame update callback: `(delta_seconds, frame)`
pub type UpdateFn = Box<dyn FnMut(f64, u64)>;

/// Per-frame draw callback: `(sketch, frame)`
pub type DrawFn = Box<dyn FnMut(&mut Sketch, u64) -> Result<(), SketchError>>;

pub const DEFAULT_FPS: u32 = 60;

/// Frame scheduler driving a [`Sketch`].
///
/// Each [`tick`](Self::tick) runs every update callback, then every draw
/// callback, then advances the frame counter. Ticks are ignored while the
/// animation is stopped.
pub struct Animation {
    sketch: Sketch,
    fps: u32,
    frame_count: u64,
    running: bool,
    last_tick: Option<Instant>,
    update_callbacks: Vec<UpdateFn>,
    draw_callbacks: Vec<DrawFn>,
}

impl Animation {
    pub fn new(sketch: Sketch, fps: u32) -> Self {
        Self {
            sketch,
            fps: fps.max(1),
            frame_count: 0,
            running: false,
            last_tick: None,
            update_callbacks: Vec::new(),
            draw_callbacks: Vec::new(),
        }
    }

    pub fn on_update(&mut self, callback: impl FnMut(f64, u64) + 'static) {
        self.update_callbacks.push(Box::new(callback));
    }

    pub fn on_draw(
        &mut self,
        callback: impl FnMut(&mut Sketch, u64) -> Result<(), SketchError> + 'static,
    ) {
        self.draw_callbacks.push(Box::new(callback));
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_tick = None;
            tracing::debug!(fps = self.fps, frame = self.frame_count, "Animation started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            tracing::debug!(frame = self.frame_count, "Animation stopped");
        }
    }

    /// Rewind the frame counter; callbacks and the sketch are kept.
    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.last_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    pub fn sketch_mut(&mut self) -> &mut Sketch {
        &mut self.sketch
    }

    pub fn into_sketch(self) -> Sketch {
        self.sketch
    }

    /// Run one frame with the nominal `1 / fps` delta.
    pub fn tick(&mut self) -> Result<(), SketchError> {
        let delta = 1.0 / self.fps as f64;
        self.tick_with_delta(delta)
    }

    fn tick_with_delta(&mut self, delta: f64) -> Result<(), SketchError> {
        if !self.running {
            return Ok(());
        }

        let frame = self.frame_count;
        for update in &mut self.update_callbacks {
            update(delta, frame);
        }
        for draw in &mut self.draw_callbacks {
            draw(&mut self.sketch, frame)?;
        }
        self.frame_count += 1;
        Ok(())
    }

    /// Drive `frames` ticks, then stop.
    ///
    /// With `realtime` the ticks are paced at `fps` and update callbacks see
    /// the measured wall-clock delta; otherwise frames run back to back.
    pub async fn run(&mut self, frames: u64, realtime: bool) -> Result<(), SketchError> {
        self.start();

        if realtime {
            let mut interval = tokio::time::interval(self.frame_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            for _ in 0..frames {
                interval.tick().await;
                let now = Instant::now();
                let delta = self
                    .last_tick
                    .map(|last| now.duration_since(last).as_secs_f64())
                    .unwrap_or(1.0 / self.fps as f64);
                self.last_tick = Some(now);
                if let Err(e) = self.tick_with_delta(delta) {
                    self.stop();
                    return Err(e);
                }
            }
        } else {
            for _ in 0..frames {
                if let Err(e) = self.tick() {
                    self.stop();
                    return Err(e);
                }
            }
        }

        self.stop();
        tracing::info!(frames = self.frame_count, "Animation finished");
        Ok(())
    }
}
