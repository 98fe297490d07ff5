//! Script expressions and their evaluation
//!
//! Expressions form a closed tagged union. Each one is evaluated against an
//! [`EvalContext`] into a [`Value`], which callers coerce to the type they
//! need with an explicit default.

mod function;
mod pattern;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

pub use function::{Function, FunctionKind};
use libm::roundf;
pub use pattern::{Pattern, PatternElement, PatternExtend};

use crate::animation::Animator;
use crate::color::named_hue;
use crate::context::EvalContext;
use crate::log::log_warn;

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f32),
    Bool(bool),
    Text(&'a str),
    Null,
}

impl Value<'_> {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_float(&self, default: f32) -> f32 {
        match *self {
            Self::Number(value) => value,
            Self::Bool(value) => {
                if value {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Text(text) => parse_text_number(text).unwrap_or(default),
            Self::Null => default,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_int(&self, default: i32) -> i32 {
        let value = self.as_float(default as f32);
        if value.is_nan() {
            return default;
        }
        roundf(value) as i32
    }

    pub fn as_bool(&self, default: bool) -> bool {
        match *self {
            Self::Number(value) => value != 0.0,
            Self::Bool(value) => value,
            Self::Text(text) => parse_text_number(text).map_or(default, |value| value != 0.0),
            Self::Null => default,
        }
    }

    /// Compare against a literal string
    pub fn equals(&self, text: &str) -> bool {
        matches!(self, Self::Text(value) if *value == text)
    }

    /// Detach the value from the expression it was read from
    pub fn to_constant(self) -> Expression {
        match self {
            Self::Number(value) => Expression::Number(value),
            Self::Bool(value) => Expression::Bool(value),
            Self::Text(text) => Expression::Text(text.into()),
            Self::Null => Expression::Null,
        }
    }
}

fn parse_text_number(text: &str) -> Option<f32> {
    match text.trim() {
        "true" => Some(1.0),
        "false" => Some(0.0),
        other => other.parse::<f32>().ok(),
    }
}

/// Range interpolated by an animator
#[derive(Debug, Clone)]
pub struct Range {
    pub start: Option<Expression>,
    pub end: Option<Expression>,
    pub animator: Animator,
}

impl Range {
    pub fn eval<'a>(&'a self, ctx: &EvalContext<'a, '_>) -> Value<'a> {
        match (&self.start, &self.end) {
            (None, None) => Value::Null,
            (Some(start), None) => start.eval(ctx),
            (None, Some(end)) => end.eval(ctx),
            (Some(start), Some(end)) => {
                let low = start.eval(ctx).as_float(0.0);
                let high = end.eval(ctx).as_float(0.0);
                Value::Number(self.animator.interpolate(low, high, ctx))
            }
        }
    }
}

/// Script expression
#[derive(Debug, Clone)]
pub enum Expression {
    Number(f32),
    Bool(bool),
    Text(String),
    Null,
    /// Named value looked up through the scope chain
    Variable {
        name: String,
        default: Option<Box<Expression>>,
    },
    Range(Box<Range>),
    Pattern(Box<Pattern>),
    Function(Box<Function>),
    /// Read-only engine value such as the window start or a hue name
    System { scope: String, name: String },
}

impl Expression {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn variable(name: impl Into<String>, default: Option<Self>) -> Self {
        Self::Variable {
            name: name.into(),
            default: default.map(Box::new),
        }
    }

    pub fn system(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self::System {
            scope: scope.into(),
            name: name.into(),
        }
    }

    /// Whether the expression never changes between evaluations
    pub const fn is_constant(&self) -> bool {
        matches!(
            self,
            Self::Number(_) | Self::Bool(_) | Self::Text(_) | Self::Null
        )
    }

    pub fn eval<'a>(&'a self, ctx: &EvalContext<'a, '_>) -> Value<'a> {
        match self {
            Self::Number(value) => Value::Number(*value),
            Self::Bool(value) => Value::Bool(*value),
            Self::Text(text) => Value::Text(text.as_str()),
            Self::Null => Value::Null,
            Self::Variable { name, default } => eval_variable(name, default.as_deref(), ctx),
            Self::Range(range) => range.eval(ctx),
            Self::Pattern(pattern) => pattern.eval(ctx),
            Self::Function(function) => function.eval(ctx),
            Self::System { scope, name } => eval_system(scope, name, ctx),
        }
    }

    pub fn eval_float(&self, ctx: &EvalContext<'_, '_>, default: f32) -> f32 {
        self.eval(ctx).as_float(default)
    }

    pub fn eval_int(&self, ctx: &EvalContext<'_, '_>, default: i32) -> i32 {
        self.eval(ctx).as_int(default)
    }

    pub fn eval_bool(&self, ctx: &EvalContext<'_, '_>, default: bool) -> bool {
        self.eval(ctx).as_bool(default)
    }
}

fn eval_default<'a>(default: Option<&'a Expression>, ctx: &EvalContext<'a, '_>) -> Value<'a> {
    default.map_or(Value::Null, |default| default.eval(ctx))
}

fn eval_variable<'a>(
    name: &'a str,
    default: Option<&'a Expression>,
    ctx: &EvalContext<'a, '_>,
) -> Value<'a> {
    if ctx.is_resolving(name) {
        return eval_default(default, ctx);
    }
    let Some(found) = ctx.scope.lookup(name) else {
        return eval_default(default, ctx);
    };
    let guard = ctx.guard(name);
    let value = found.eval(&ctx.guarded(&guard));
    if value.is_null() {
        return eval_default(default, ctx);
    }
    value
}

#[allow(clippy::cast_precision_loss)]
fn eval_system<'a>(scope: &str, name: &str, ctx: &EvalContext<'a, '_>) -> Value<'a> {
    match name {
        "start" => Value::Number(ctx.window.start as f32),
        "count" => Value::Number(ctx.window.count as f32),
        "end" => Value::Number(ctx.window.end as f32),
        "step" => Value::Number(ctx.state.step() as f32),
        "index" => Value::Number(ctx.cursor.position),
        _ => match named_hue(name) {
            Some(hue) => Value::Number(f32::from(hue)),
            None => {
                log_warn!(ctx.logger(), "[Expression.system] unknown value {}:{}", scope, name);
                Value::Null
            }
        },
    }
}

/// Named values declared by a command
#[derive(Debug, Clone, Default)]
pub struct ValueList {
    entries: Vec<(String, Expression)>,
}

impl ValueList {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }

    /// Insert or replace a named value
    pub fn set(&mut self, name: impl Into<String>, value: Expression) {
        let name = name.into();
        match self.entries.iter_mut().find(|(entry_name, _)| *entry_name == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Evaluate every value once into a list of constants
    pub fn snapshot(&self, ctx: &EvalContext<'_, '_>) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), value.eval(ctx).to_constant()))
                .collect(),
        }
    }
}
