use embassy_time::{Duration, Instant};

/// Per-run mutable context advanced once per step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptState {
    started_at: Option<Instant>,
    now: Instant,
    last_step: Option<Instant>,
    step: u32,
}

impl ScriptState {
    pub const fn new() -> Self {
        Self {
            started_at: None,
            now: Instant::from_ticks(0),
            last_step: None,
            step: 0,
        }
    }

    /// Start a new step at `now`
    pub fn begin_step(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        } else {
            self.last_step = Some(self.now);
        }
        self.now = now;
        self.step = self.step.wrapping_add(1);
    }

    /// Time captured by the current step
    pub const fn now(&self) -> Instant {
        self.now
    }

    /// Number of steps run so far
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Time elapsed since the first step
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map_or(Duration::from_ticks(0), |started| {
                self.now.saturating_duration_since(started)
            })
    }

    /// Time between the previous step and the current one
    pub fn since_last_step(&self) -> Duration {
        self.last_step.map_or(Duration::from_ticks(0), |last| {
            self.now.saturating_duration_since(last)
        })
    }
}

impl Default for ScriptState {
    fn default() -> Self {
        Self::new()
    }
}
