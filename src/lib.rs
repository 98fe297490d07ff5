#![no_std]

extern crate alloc;

pub mod animation;
pub mod bounds;
pub mod color;
pub mod command;
pub mod context;
pub mod control;
pub mod loader;
pub mod log;
pub mod operation;
pub mod position;
pub mod rng;
pub mod runner;
pub mod script;
pub mod state;
pub mod strip;
pub mod value;

pub use animation::{Animator, Domain, Ease};
pub use bounds::{PositionUnit, Window};
pub use color::{Hsl, Rgb};
pub use command::{Command, CommandType, Status};
pub use control::{ControlChannel, ControlIntent, ControlReceiver, ControlSender};
pub use embassy_time::{Duration, Instant};
pub use loader::{LoadError, ScriptLoader, load_script, load_script_value};
pub use log::{LogLevel, Logger};
pub use operation::HslOperation;
pub use position::Position;
pub use runner::{RunMode, RunnerConfig, ScriptRunner, StepResult};
pub use script::Script;
pub use state::ScriptState;
pub use strip::LogicalStrip;
pub use value::{Expression, Value, ValueList};

/// Physical LED driver
///
/// Implement this trait to support different chipsets and platforms.
/// The runner is generic over this trait.
pub trait PixelDriver {
    /// Number of pixels the driver can address
    fn pixel_count(&self) -> usize;

    /// Set the color of one pixel, shown on the next [`Self::show`]
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Latch the pixels to the strip
    fn show(&mut self);
}
