use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use super::{Expression, Value};
use crate::context::EvalContext;
use crate::log::LogLevel;

/// Built-in functions callable from scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Min,
    Max,
    Rand,
    RandOf,
    Sequence,
    Unknown,
}

impl FunctionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "sub",
            Self::Multiply => "mul",
            Self::Divide => "div",
            Self::Modulo => "mod",
            Self::Min => "min",
            Self::Max => "max",
            Self::Rand => "rand",
            Self::RandOf => "randOf",
            Self::Sequence => "seq",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse_from_str(value: &str) -> Self {
        match value {
            "add" | "+" => Self::Add,
            "sub" | "subtract" | "-" => Self::Subtract,
            "mul" | "mult" | "multiply" | "*" => Self::Multiply,
            "div" | "divide" | "/" => Self::Divide,
            "mod" | "%" => Self::Modulo,
            "min" => Self::Min,
            "max" => Self::Max,
            "rand" | "random" => Self::Rand,
            "randOf" | "randomOf" => Self::RandOf,
            "seq" | "sequence" => Self::Sequence,
            _ => Self::Unknown,
        }
    }
}

/// Function call expression
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    kind: FunctionKind,
    args: Vec<Expression>,
    /// Running counter of `seq`
    counter: Cell<Option<f32>>,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<Expression>) -> Self {
        let name = name.into();
        Self {
            kind: FunctionKind::parse_from_str(&name),
            name,
            args,
            counter: Cell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn kind(&self) -> FunctionKind {
        self.kind
    }

    fn arg(&self, index: usize, ctx: &EvalContext<'_, '_>, default: f32) -> f32 {
        self.args
            .get(index)
            .map_or(default, |arg| arg.eval_float(ctx, default))
    }

    fn fold(&self, ctx: &EvalContext<'_, '_>, op: impl Fn(f32, f32) -> f32) -> f32 {
        let mut values = self.args.iter().map(|arg| arg.eval_float(ctx, 0.0));
        let Some(first) = values.next() else {
            return 0.0;
        };
        values.fold(first, op)
    }

    pub fn eval<'a>(&'a self, ctx: &EvalContext<'a, '_>) -> Value<'a> {
        let result = match self.kind {
            FunctionKind::Add => self.fold(ctx, |a, b| a + b),
            FunctionKind::Subtract => self.fold(ctx, |a, b| a - b),
            FunctionKind::Multiply => self.fold(ctx, |a, b| a * b),
            FunctionKind::Divide => self.fold(ctx, |a, b| if b == 0.0 { 0.0 } else { a / b }),
            FunctionKind::Modulo => self.modulo(ctx),
            FunctionKind::Min => self.fold(ctx, f32::min),
            FunctionKind::Max => self.fold(ctx, f32::max),
            FunctionKind::Rand => self.rand(ctx),
            FunctionKind::RandOf => return self.rand_of(ctx),
            FunctionKind::Sequence => self.sequence(ctx),
            FunctionKind::Unknown => {
                ctx.logger().periodic(
                    "Function.eval.unknown",
                    ctx.state.now(),
                    LogLevel::Error,
                    format_args!("[Function.eval] unknown function {}", self.name),
                );
                0.0
            }
        };
        Value::Number(result)
    }

    #[allow(clippy::cast_precision_loss)]
    fn modulo(&self, ctx: &EvalContext<'_, '_>) -> f32 {
        let value = self.args.first().map_or(0, |arg| arg.eval_int(ctx, 0));
        let divisor = self.args.get(1).map_or(0, |arg| arg.eval_int(ctx, 0));
        if divisor == 0 {
            return 0.0;
        }
        value.rem_euclid(divisor) as f32
    }

    #[allow(clippy::cast_precision_loss)]
    fn rand(&self, ctx: &EvalContext<'_, '_>) -> f32 {
        let rng = ctx.rng();
        match self.args.as_slice() {
            [] => rng.next_f32(),
            [high] => {
                let high = high.eval_int(ctx, 0);
                if high == 0 {
                    return 0.0;
                }
                let toward_zero = if high > 0 { high - 1 } else { high + 1 };
                rng.range_inclusive(0, toward_zero) as f32
            }
            [low, high, ..] => {
                rng.range_inclusive(low.eval_int(ctx, 0), high.eval_int(ctx, 0)) as f32
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn rand_of<'a>(&'a self, ctx: &EvalContext<'a, '_>) -> Value<'a> {
        if self.args.is_empty() {
            return Value::Null;
        }
        let last = (self.args.len() - 1) as i32;
        let index = ctx.rng().range_inclusive(0, last) as usize;
        self.args
            .get(index)
            .map_or(Value::Null, |arg| arg.eval(ctx))
    }

    /// Current counter value, then advance by `step`, wrapping to `start`
    fn sequence(&self, ctx: &EvalContext<'_, '_>) -> f32 {
        let start = self.arg(0, ctx, 0.0);
        let end = self.arg(1, ctx, 100.0);
        let step = self.arg(2, ctx, 1.0);
        let current = self.counter.get().unwrap_or(start);
        let mut next = current + step;
        if (step >= 0.0 && next > end) || (step < 0.0 && next < end) {
            next = start;
        }
        self.counter.set(Some(next));
        current
    }
}
