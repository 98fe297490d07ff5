use alloc::vec::Vec;

use libm::floorf;

use super::{Expression, Value};
use crate::animation::Animator;
use crate::context::EvalContext;

/// How a pattern behaves past its last element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternExtend {
    /// Start over from the first element
    #[default]
    Repeat,
    /// Spread the pattern over the whole window
    Stretch,
    /// Nothing past the end
    None,
}

impl PatternExtend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repeat => "repeat",
            Self::Stretch => "stretch",
            Self::None => "none",
        }
    }

    pub fn parse_from_str(value: &str) -> Option<Self> {
        Some(match value {
            "repeat" => Self::Repeat,
            "stretch" => Self::Stretch,
            "none" | "clip" => Self::None,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PatternElement {
    pub value: Expression,
    /// Number of consecutive pixels taking this element
    pub repeat: u32,
}

impl PatternElement {
    pub const fn new(value: Expression, repeat: u32) -> Self {
        Self { value, repeat }
    }
}

/// Sequence of weighted values indexed by pixel position
#[derive(Debug, Clone)]
pub struct Pattern {
    pub elements: Vec<PatternElement>,
    pub extend: PatternExtend,
    /// Moves the pattern along the window
    pub animator: Option<Animator>,
}

impl Pattern {
    /// Sum of all element weights
    pub fn total(&self) -> u32 {
        self.elements.iter().map(|element| element.repeat).sum()
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn eval<'a>(&'a self, ctx: &EvalContext<'a, '_>) -> Value<'a> {
        let total = self.total();
        if total == 0 {
            return Value::Null;
        }
        let length = total as f32;
        let shift = self
            .animator
            .as_ref()
            .map_or(0.0, |animator| animator.interpolate(0.0, length, ctx));

        let position = match self.extend {
            PatternExtend::Stretch => floorf(ctx.cursor.fraction() * length).min(length - 1.0),
            PatternExtend::Repeat | PatternExtend::None => floorf(ctx.cursor.position),
        };
        let mut index = floorf(position + shift);
        if index < 0.0 || index >= length {
            if self.extend == PatternExtend::None {
                return Value::Null;
            }
            index %= length;
            if index < 0.0 {
                index += length;
            }
        }
        self.element_at(index as u32)
            .map_or(Value::Null, |element| element.value.eval(ctx))
    }

    fn element_at(&self, index: u32) -> Option<&PatternElement> {
        let mut covered = 0;
        for element in &self.elements {
            covered += element.repeat;
            if index < covered {
                return Some(element);
            }
        }
        None
    }
}
