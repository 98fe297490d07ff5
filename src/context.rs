//! Evaluation context handed to expressions, positions and animators

use core::cell::Cell;

use crate::bounds::Window;
use crate::command::Command;
use crate::log::Logger;
use crate::rng::Rng;
use crate::state::ScriptState;
use crate::value::{Expression, ValueList};

/// Services shared by the whole tree for the lifetime of the runner
#[derive(Debug, Default)]
pub struct Env {
    pub logger: Logger,
    pub rng: Rng,
}

impl Env {
    pub const fn new(logger: Logger, rng: Rng) -> Self {
        Self { logger, rng }
    }
}

/// Named-value lookup chain.
///
/// A command looks at its own values first, then at its earlier siblings
/// from the closest one backwards, then at the enclosing container scope.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    own: Option<&'a ValueList>,
    siblings: &'a [Command],
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub const fn root() -> Self {
        Self {
            own: None,
            siblings: &[],
            parent: None,
        }
    }

    pub const fn new(
        own: Option<&'a ValueList>,
        siblings: &'a [Command],
        parent: Option<&'a Scope<'a>>,
    ) -> Self {
        Self {
            own,
            siblings,
            parent,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a Expression> {
        if let Some(value) = self.own.and_then(|own| own.get(name)) {
            return Some(value);
        }
        for sibling in self.siblings.iter().rev() {
            if let Some(value) = sibling.values().get(name) {
                return Some(value);
            }
        }
        self.parent.and_then(|parent| parent.lookup(name))
    }
}

/// Spatial cursor of the pixel being written
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub position: f32,
    pub min: f32,
    pub max: f32,
}

impl Cursor {
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel(index: i32, count: i32) -> Self {
        Self {
            position: index as f32,
            min: 0.0,
            max: (count - 1).max(0) as f32,
        }
    }

    /// Cursor position mapped into `[0, 1]`
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.position - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Flags raised during evaluation and read back by the command
#[derive(Debug, Default)]
pub struct Signals {
    completed: Cell<bool>,
}

impl Signals {
    pub fn complete(&self) {
        self.completed.set(true);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

/// Variables currently being resolved, innermost first
#[derive(Debug)]
pub struct Resolving<'r> {
    name: &'r str,
    next: Option<&'r Resolving<'r>>,
}

/// Everything an expression may read while being evaluated.
///
/// `'a` is the lifetime of the tree data, `'r` the lifetime of the variable
/// recursion guard chain living on the stack.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a, 'r> {
    pub scope: &'a Scope<'a>,
    pub state: &'a ScriptState,
    pub env: &'a Env,
    pub window: Window,
    pub cursor: Cursor,
    pub signals: &'a Signals,
    resolving: Option<&'r Resolving<'r>>,
}

impl<'a, 'r> EvalContext<'a, 'r> {
    pub const fn new(
        scope: &'a Scope<'a>,
        state: &'a ScriptState,
        env: &'a Env,
        window: Window,
        signals: &'a Signals,
    ) -> Self {
        Self {
            scope,
            state,
            env,
            window,
            cursor: Cursor {
                position: 0.0,
                min: 0.0,
                max: 0.0,
            },
            signals,
            resolving: None,
        }
    }

    #[must_use]
    pub const fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub const fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub const fn logger(&self) -> &'a Logger {
        &self.env.logger
    }

    pub const fn rng(&self) -> &'a Rng {
        &self.env.rng
    }

    /// Whether `name` is already being resolved further up the stack
    pub fn is_resolving(&self, name: &str) -> bool {
        let mut current = self.resolving;
        while let Some(entry) = current {
            if entry.name == name {
                return true;
            }
            current = entry.next;
        }
        false
    }

    /// Guard entry for resolving `name` from this context
    pub const fn guard<'g>(&self, name: &'g str) -> Resolving<'g>
    where
        'r: 'g,
    {
        Resolving {
            name,
            next: self.resolving,
        }
    }

    /// Copy of this context with `guard` pushed on the recursion chain
    pub const fn guarded<'g>(&self, guard: &'g Resolving<'g>) -> EvalContext<'a, 'g> {
        EvalContext {
            scope: self.scope,
            state: self.state,
            env: self.env,
            window: self.window,
            cursor: self.cursor,
            signals: self.signals,
            resolving: Some(guard),
        }
    }
}
