//! Animation of ranges and patterns
//!
//! An [`Animator`] reduces its [`Domain`] to a position in `[0, 1]`, optionally
//! unfolds it into a there-and-back sweep, eases it and interpolates between
//! two bounds. Time domains keep their pass/repeat bookkeeping in cells so
//! the expression tree can be evaluated through shared references.

mod domain;
mod ease;

use core::cell::Cell;

use embassy_time::{Duration, Instant};
pub use domain::{Domain, speed_period};
pub use ease::{DEFAULT_EASE_IN, DEFAULT_EASE_OUT, Ease};
use libm::{fabsf, floorf};

use crate::context::EvalContext;
use crate::value::{Expression, Value};

/// Repeat and pause bookkeeping of a time domain
#[derive(Debug, Clone, Default)]
struct TimeState {
    pass_started: Cell<Option<Instant>>,
    resume_at: Cell<Option<Instant>>,
    /// Passes left after the current one, `None` repeats forever
    remaining: Cell<Option<i32>>,
    finished: Cell<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct Animator {
    domain: Domain,
    repeat: Option<Expression>,
    delay: Option<Expression>,
    unfold: Option<Expression>,
    ease: Option<Expression>,
    ease_in: Option<Expression>,
    ease_out: Option<Expression>,
    time: TimeState,
}

impl Animator {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    /// Number of passes to play, negative repeats forever
    #[must_use]
    pub fn with_repeat(mut self, repeat: Expression) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Pause in milliseconds between two passes
    #[must_use]
    pub fn with_delay(mut self, delay: Expression) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_unfold(mut self, unfold: Expression) -> Self {
        self.unfold = Some(unfold);
        self
    }

    /// Either `"linear"` or a number `k` giving a cubic ease `(k, 1 - k)`
    #[must_use]
    pub fn with_ease(mut self, ease: Expression) -> Self {
        self.ease = Some(ease);
        self
    }

    #[must_use]
    pub fn with_ease_in(mut self, ease_in: Expression) -> Self {
        self.ease_in = Some(ease_in);
        self
    }

    #[must_use]
    pub fn with_ease_out(mut self, ease_out: Expression) -> Self {
        self.ease_out = Some(ease_out);
        self
    }

    pub const fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Whether a time domain played its last pass
    pub fn is_finished(&self) -> bool {
        self.time.finished.get()
    }

    /// Interpolate between `low` and `high` at the current animation position
    pub fn interpolate(&self, low: f32, high: f32, ctx: &EvalContext<'_, '_>) -> f32 {
        let unfold = self
            .unfold
            .as_ref()
            .is_some_and(|unfold| unfold.eval_bool(ctx, false));
        let raw = match &self.domain {
            Domain::Position => ctx.cursor.fraction(),
            Domain::Duration(duration) => self.time_position(duration.eval_float(ctx, 0.0), ctx),
            Domain::Speed(speed) => {
                let distance = fabsf(high - low) * if unfold { 2.0 } else { 1.0 };
                let period = speed_period(distance, speed.eval_float(ctx, 0.0));
                self.time_position(period, ctx)
            }
        };
        let position = if unfold { unfold_position(raw) } else { raw };
        low + (high - low) * self.resolve_ease(ctx).apply(position)
    }

    fn resolve_ease(&self, ctx: &EvalContext<'_, '_>) -> Ease {
        let mut ease_in = DEFAULT_EASE_IN;
        let mut ease_out = DEFAULT_EASE_OUT;
        if let Some(ease) = &self.ease {
            match ease.eval(ctx) {
                Value::Text("linear") => return Ease::Linear,
                Value::Null => {}
                value => {
                    ease_in = value.as_float(DEFAULT_EASE_IN);
                    ease_out = 1.0 - ease_in;
                }
            }
        }
        if let Some(value) = &self.ease_in {
            ease_in = value.eval_float(ctx, ease_in);
        }
        if let Some(value) = &self.ease_out {
            ease_out = value.eval_float(ctx, ease_out);
        }
        Ease::CubicBezier { ease_in, ease_out }
    }

    /// Position of the current time pass, `1.0` while paused or finished
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn time_position(&self, period_ms: f32, ctx: &EvalContext<'_, '_>) -> f32 {
        let time = &self.time;
        if time.finished.get() {
            ctx.signals.complete();
            return 1.0;
        }
        let now = ctx.state.now();
        if let Some(resume_at) = time.resume_at.get() {
            if now < resume_at {
                return 1.0;
            }
            time.resume_at.set(None);
            time.pass_started.set(Some(resume_at));
        }
        let started = if let Some(started) = time.pass_started.get() {
            started
        } else {
            time.pass_started.set(Some(now));
            time.remaining.set(self.total_passes(ctx).map(|passes| passes - 1));
            now
        };
        if period_ms <= 0.0 {
            return 0.0;
        }

        let elapsed = now.saturating_duration_since(started).as_millis() as f32;
        if elapsed < period_ms {
            return elapsed / period_ms;
        }

        match time.remaining.get() {
            Some(remaining) if remaining <= 0 => {
                time.finished.set(true);
                ctx.signals.complete();
                return 1.0;
            }
            Some(remaining) => time.remaining.set(Some(remaining - 1)),
            None => {}
        }

        let delay_ms = self
            .delay
            .as_ref()
            .map_or(0, |delay| delay.eval_int(ctx, 0).max(0));
        if delay_ms > 0 {
            let pass_end = started + Duration::from_millis(period_ms as u64);
            time.resume_at
                .set(Some(pass_end + Duration::from_millis(delay_ms as u64)));
            return 1.0;
        }

        let passes = floorf(elapsed / period_ms);
        time.pass_started
            .set(Some(started + Duration::from_millis((passes * period_ms) as u64)));
        (elapsed - passes * period_ms) / period_ms
    }

    /// Total number of passes, `None` for endless
    fn total_passes(&self, ctx: &EvalContext<'_, '_>) -> Option<i32> {
        let repeat = self.repeat.as_ref()?.eval_int(ctx, -1);
        if repeat < 0 {
            return None;
        }
        Some(repeat.max(1))
    }
}

/// Mirror a position around the midpoint, `0 -> 1 -> 0`
pub fn unfold_position(position: f32) -> f32 {
    if position <= 0.5 {
        2.0 * position
    } else {
        2.0 * (1.0 - position)
    }
}
