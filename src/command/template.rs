//! Template containers spawning independent copies of their children

use alloc::vec::Vec;

use super::{Command, Frame, Status, run_children};
use crate::context::{EvalContext, Scope};
use crate::log::log_debug;
use crate::state::ScriptState;
use crate::value::{Expression, ValueList};

/// Default minimal number of live instances
pub const DEFAULT_MIN_INSTANCES: i32 = 0;
/// Default maximal number of live instances
pub const DEFAULT_MAX_INSTANCES: i32 = 1;
/// Default probability per second of spawning an instance
pub const DEFAULT_START_CHANCE: f32 = 1.0;
/// Default probability per second of retiring the oldest instance
pub const DEFAULT_END_CHANCE: f32 = 0.0;

/// One spawned copy of the template children
#[derive(Debug, Clone)]
pub struct TemplateInstance {
    state: ScriptState,
    /// Template values frozen when the instance was created
    values: ValueList,
    children: Vec<Command>,
}

impl TemplateInstance {
    pub const fn state(&self) -> &ScriptState {
        &self.state
    }

    pub const fn values(&self) -> &ValueList {
        &self.values
    }

    pub fn children(&self) -> &[Command] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
pub struct Template {
    /// Exact number of instances, overrides `min` and `max`
    pub count: Option<Expression>,
    pub min: Option<Expression>,
    pub max: Option<Expression>,
    pub start_chance: Option<Expression>,
    pub end_chance: Option<Expression>,
    prototype: Vec<Command>,
    instances: Vec<TemplateInstance>,
}

impl Template {
    pub fn new(prototype: Vec<Command>) -> Self {
        Self {
            prototype,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: Expression) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: Expression) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: Expression) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_start_chance(mut self, chance: Expression) -> Self {
        self.start_chance = Some(chance);
        self
    }

    #[must_use]
    pub fn with_end_chance(mut self, chance: Expression) -> Self {
        self.end_chance = Some(chance);
        self
    }

    pub fn prototype(&self) -> &[Command] {
        &self.prototype
    }

    pub fn instances(&self) -> &[TemplateInstance] {
        &self.instances
    }

    /// Resolved `(min, max)` instance bounds
    fn bounds(&self, ctx: &EvalContext<'_, '_>) -> (usize, usize) {
        let (min, max) = if let Some(count) = &self.count {
            let count = count.eval_int(ctx, DEFAULT_MAX_INSTANCES);
            (count, count)
        } else {
            let min = self
                .min
                .as_ref()
                .map_or(DEFAULT_MIN_INSTANCES, |min| min.eval_int(ctx, DEFAULT_MIN_INSTANCES));
            let max = self
                .max
                .as_ref()
                .map_or(DEFAULT_MAX_INSTANCES, |max| max.eval_int(ctx, DEFAULT_MAX_INSTANCES));
            (min, max)
        };
        let min = usize::try_from(min).unwrap_or(0);
        let max = usize::try_from(max).unwrap_or(0).max(min);
        (min, max)
    }

    fn spawn(&mut self, ctx: &EvalContext<'_, '_>, values: &ValueList) {
        self.instances.push(TemplateInstance {
            state: ScriptState::new(),
            values: values.snapshot(ctx),
            children: self.prototype.clone(),
        });
    }

    /// Create and retire instances for this frame.
    ///
    /// Birth and retirement are Bernoulli trials scaled by the time elapsed
    /// since the previous step, then the count is forced into `[min, max]`.
    #[allow(clippy::cast_precision_loss)]
    fn manage_instances(&mut self, ctx: &EvalContext<'_, '_>, values: &ValueList) {
        let (min, max) = self.bounds(ctx);
        let elapsed = ctx.state.since_last_step().as_millis() as f32 / 1000.0;
        let start_chance = self
            .start_chance
            .as_ref()
            .map_or(DEFAULT_START_CHANCE, |chance| chance.eval_float(ctx, DEFAULT_START_CHANCE));
        let end_chance = self
            .end_chance
            .as_ref()
            .map_or(DEFAULT_END_CHANCE, |chance| chance.eval_float(ctx, DEFAULT_END_CHANCE));

        let rng = ctx.rng();
        if self.instances.len() < max && rng.chance(start_chance * elapsed) {
            self.spawn(ctx, values);
        }
        if self.instances.len() > min && rng.chance(end_chance * elapsed) {
            self.instances.remove(0);
        }
        if self.instances.len() > max {
            let excess = self.instances.len() - max;
            self.instances.drain(..excess);
        }
        while self.instances.len() < min {
            self.spawn(ctx, values);
        }
    }

    /// Manage instances then run each of them with its own state.
    ///
    /// Instances whose children stop running are destroyed.
    pub(crate) fn run(
        &mut self,
        frame: &mut Frame<'_>,
        state: &ScriptState,
        scope: &Scope<'_>,
        ctx: &EvalContext<'_, '_>,
        values: &ValueList,
    ) -> Status {
        self.manage_instances(ctx, values);

        let mut index = 0;
        while index < self.instances.len() {
            let instance = &mut self.instances[index];
            instance.state.begin_step(state.now());
            let instance_scope = Scope::new(Some(&instance.values), &[], Some(scope));
            let status = run_children(
                &mut instance.children,
                frame,
                &instance.state,
                &instance_scope,
            );
            if status.is_running() {
                index += 1;
            } else {
                log_debug!(
                    frame.env.logger,
                    "[Template.run] instance {} finished: {}",
                    index,
                    status.as_str()
                );
                self.instances.remove(index);
            }
        }
        Status::Running
    }
}
