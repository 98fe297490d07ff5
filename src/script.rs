use alloc::string::String;
use alloc::vec;

use embassy_time::Duration;

use crate::color::Rgb;
use crate::command::{Command, RgbCommand};

/// Loaded script ready to be run
#[derive(Debug, Clone)]
pub struct Script {
    name: String,
    /// Overrides the runner step interval when set
    step_interval: Option<Duration>,
    root: Command,
}

impl Script {
    pub fn new(name: impl Into<String>, root: Command) -> Self {
        Self {
            name: name.into(),
            step_interval: None,
            root,
        }
    }

    /// Script filling the whole strip with one color
    pub fn solid(color: Rgb) -> Self {
        Self::new(
            "solid",
            Command::start(vec![Command::rgb(RgbCommand::solid(color))]),
        )
    }

    #[must_use]
    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = Some(interval);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn step_interval(&self) -> Option<Duration> {
        self.step_interval
    }

    pub const fn root(&self) -> &Command {
        &self.root
    }

    pub(crate) const fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }
}
