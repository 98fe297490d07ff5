//! Script runner
//!
//! Owns the running script, the logical strip and the physical driver, and
//! advances everything one step at a time. The runner never reads a clock:
//! the caller passes the current time to [`ScriptRunner::step`] and sleeps
//! until the returned deadline.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::PixelDriver;
use crate::bounds::Window;
use crate::color::Rgb;
use crate::command::{Frame, Status};
use crate::context::{Env, Scope};
use crate::control::{ControlIntent, ControlReceiver};
use crate::loader::{LoadError, load_script};
use crate::log::{LogLevel, Logger, log_debug};
use crate::rng::Rng;
use crate::script::Script;
use crate::state::ScriptState;
use crate::strip::LogicalStrip;

/// Maximum number of physical segments
pub const MAX_SEGMENTS: usize = 8;

/// Default minimal time between two steps
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(50);

/// Default seed of the engine random generator
pub const DEFAULT_SEED: u64 = 0x5eed_1ed5;

/// Configuration of the runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Ordered lengths of the physical strips, the logical strip spans all
    /// of them. When empty the driver pixel count is used.
    pub segments: heapless::Vec<u16, MAX_SEGMENTS>,
    pub step_interval: Duration,
    pub seed: u64,
    pub log_level: LogLevel,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            segments: heapless::Vec::new(),
            step_interval: DEFAULT_STEP_INTERVAL,
            seed: DEFAULT_SEED,
            log_level: LogLevel::default(),
        }
    }
}

/// What the runner shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No script loaded
    Idle,
    Running,
    /// Dark, the script is kept for resume
    Off,
}

/// Result of a call to [`ScriptRunner::step`]
#[derive(Debug, Clone, Copy)]
pub struct StepResult {
    /// Whether a frame was produced
    pub ran: bool,
    /// Status of the script root
    pub status: Status,
    /// When the next step is due
    pub next_deadline: Instant,
}

pub struct ScriptRunner<D: PixelDriver> {
    driver: D,
    strip: LogicalStrip,
    windows: Vec<Window>,
    env: Env,
    segments: heapless::Vec<u16, MAX_SEGMENTS>,
    step_interval: Duration,

    script: Option<Script>,
    state: ScriptState,
    mode: RunMode,
    status: Status,
    next_step: Option<Instant>,
}

impl<D: PixelDriver> ScriptRunner<D> {
    pub fn new(driver: D, config: &RunnerConfig) -> Self {
        let len = if config.segments.is_empty() {
            driver.pixel_count()
        } else {
            config.segments.iter().map(|length| usize::from(*length)).sum()
        };
        Self {
            driver,
            strip: LogicalStrip::new(len),
            windows: Vec::new(),
            env: Env::new(Logger::new(config.log_level), Rng::new(config.seed)),
            segments: config.segments.clone(),
            step_interval: config.step_interval,
            script: None,
            state: ScriptState::new(),
            mode: RunMode::Idle,
            status: Status::Complete,
            next_step: None,
        }
    }

    /// Replace the running script, dropping the previous tree
    pub fn set_script(&mut self, script: Script) {
        log_debug!(self.env.logger, "[ScriptRunner.set_script] {}", script.name());
        self.script = Some(script);
        self.state = ScriptState::new();
        self.mode = RunMode::Running;
        self.status = Status::Running;
        self.next_step = None;
    }

    /// Parse a JSON script with the runner logger and run it.
    ///
    /// The running script is kept when the document is rejected.
    pub fn load(&mut self, text: &str) -> Result<(), LoadError> {
        let script = load_script(text, &self.env.logger)?;
        self.set_script(script);
        Ok(())
    }

    /// Drop the script and go dark
    pub fn clear_script(&mut self) {
        self.script = None;
        self.mode = RunMode::Idle;
        self.status = Status::Complete;
        self.next_step = None;
    }

    /// Run a script filling the strip with one color
    pub fn solid_color(&mut self, color: Rgb) {
        self.set_script(Script::solid(color));
    }

    /// Go dark, keeping the script for [`Self::resume`]
    pub fn turn_off(&mut self) {
        if self.mode == RunMode::Running {
            self.mode = RunMode::Off;
        }
        self.next_step = None;
    }

    /// Resume the script kept by [`Self::turn_off`]
    pub fn resume(&mut self) {
        if self.script.is_some() {
            self.mode = RunMode::Running;
        }
        self.next_step = None;
    }

    /// Apply every queued control intent
    pub fn process_intents<const SIZE: usize>(&mut self, receiver: &ControlReceiver<'_, SIZE>) {
        while let Some(intent) = receiver.try_receive() {
            match intent {
                ControlIntent::RunScript(script) => self.set_script(*script),
                ControlIntent::SolidColor(color) => self.solid_color(color),
                ControlIntent::TurnOff => self.turn_off(),
                ControlIntent::Resume => self.resume(),
            }
        }
    }

    /// Minimal time between two steps for the current script
    pub fn step_interval(&self) -> Duration {
        self.script
            .as_ref()
            .and_then(Script::step_interval)
            .unwrap_or(self.step_interval)
    }

    /// Run one step if it is due.
    ///
    /// A step clears the strip, executes the script tree and shows the
    /// result. Falling more than two intervals behind resets the schedule
    /// instead of catching up.
    pub fn step(&mut self, now: Instant) -> StepResult {
        let interval = self.step_interval();
        if let Some(next_step) = self.next_step {
            if now < next_step {
                return StepResult {
                    ran: false,
                    status: self.status,
                    next_deadline: next_step,
                };
            }
            let max_drift = Duration::from_millis(interval.as_millis() * 2);
            let base = if now > next_step + max_drift {
                now
            } else {
                next_step
            };
            self.next_step = Some(base + interval);
        } else {
            self.next_step = Some(now + interval);
        }

        self.strip.clear();
        self.status = match (self.mode, self.script.as_mut()) {
            (RunMode::Running, Some(script)) => {
                self.state.begin_step(now);
                let mut frame = Frame::new(
                    &mut self.strip,
                    &mut self.windows,
                    &self.env,
                    &self.segments,
                );
                script
                    .root_mut()
                    .execute(&mut frame, &self.state, &[], &Scope::root(), None)
            }
            (RunMode::Off, _) => Status::Paused,
            _ => Status::Complete,
        };

        let dropped = self.strip.take_dropped();
        if dropped > 0 {
            self.env.logger.periodic(
                "ScriptRunner.step.dropped",
                now,
                LogLevel::Warn,
                format_args!("[ScriptRunner.step] dropped {} out of range writes", dropped),
            );
        }
        self.strip.show(&mut self.driver);

        StepResult {
            ran: true,
            status: self.status,
            next_deadline: self.next_step.unwrap_or(now),
        }
    }

    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    pub const fn script_state(&self) -> &ScriptState {
        &self.state
    }

    pub const fn strip(&self) -> &LogicalStrip {
        &self.strip
    }

    pub const fn logger(&self) -> &Logger {
        &self.env.logger
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub const fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
