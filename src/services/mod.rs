pub mod animation;
pub mod sketch;

pub use animation::{Animation, DrawFn, UpdateFn, DEFAULT_FPS};
pub use sketch::{AppliedFilter, FilterKind, InitPattern, Sketch};
