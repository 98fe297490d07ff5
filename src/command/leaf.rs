use super::Frame;
use crate::color::Rgb;
use crate::context::{Cursor, EvalContext};
use crate::operation::HslOperation;
use crate::value::Expression;

/// Evaluate an HSL component, negative results mean "do not write"
fn hsl_component(value: Option<&Expression>, ctx: &EvalContext<'_, '_>) -> Option<i32> {
    value
        .map(|value| value.eval_int(ctx, -1))
        .filter(|component| *component >= 0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rgb_component(value: Option<&Expression>, ctx: &EvalContext<'_, '_>) -> u8 {
    value.map_or(0, |value| value.eval_int(ctx, 0).clamp(0, 255) as u8)
}

/// Writes hue, saturation and lightness of every pixel in its window
#[derive(Debug, Clone, Default)]
pub struct HslCommand {
    pub hue: Option<Expression>,
    pub saturation: Option<Expression>,
    pub lightness: Option<Expression>,
    pub op: HslOperation,
}

impl HslCommand {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hue(mut self, hue: Expression) -> Self {
        self.hue = Some(hue);
        self
    }

    #[must_use]
    pub fn with_saturation(mut self, saturation: Expression) -> Self {
        self.saturation = Some(saturation);
        self
    }

    #[must_use]
    pub fn with_lightness(mut self, lightness: Expression) -> Self {
        self.lightness = Some(lightness);
        self
    }

    #[must_use]
    pub fn with_op(mut self, op: HslOperation) -> Self {
        self.op = op;
        self
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>, ctx: &EvalContext<'_, '_>) {
        let count = ctx.window.count;
        for index in 0..count {
            let ctx = ctx.with_cursor(Cursor::pixel(index, count));
            let hue = hsl_component(self.hue.as_ref(), &ctx);
            let saturation = hsl_component(self.saturation.as_ref(), &ctx);
            let lightness = hsl_component(self.lightness.as_ref(), &ctx);
            let Some(target) = frame.target(index) else {
                continue;
            };
            if let Some(hue) = hue {
                frame.strip.set_hue(target, hue, self.op);
            }
            if let Some(saturation) = saturation {
                frame.strip.set_saturation(target, saturation, self.op);
            }
            if let Some(lightness) = lightness {
                frame.strip.set_lightness(target, lightness, self.op);
            }
        }
    }
}

/// Writes an RGB color to every pixel in its window
#[derive(Debug, Clone, Default)]
pub struct RgbCommand {
    pub red: Option<Expression>,
    pub green: Option<Expression>,
    pub blue: Option<Expression>,
    pub op: HslOperation,
}

impl RgbCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command writing a constant color
    pub fn solid(color: Rgb) -> Self {
        Self {
            red: Some(Expression::Number(f32::from(color.r))),
            green: Some(Expression::Number(f32::from(color.g))),
            blue: Some(Expression::Number(f32::from(color.b))),
            op: HslOperation::Replace,
        }
    }

    #[must_use]
    pub fn with_red(mut self, red: Expression) -> Self {
        self.red = Some(red);
        self
    }

    #[must_use]
    pub fn with_green(mut self, green: Expression) -> Self {
        self.green = Some(green);
        self
    }

    #[must_use]
    pub fn with_blue(mut self, blue: Expression) -> Self {
        self.blue = Some(blue);
        self
    }

    #[must_use]
    pub fn with_op(mut self, op: HslOperation) -> Self {
        self.op = op;
        self
    }

    const fn is_empty(&self) -> bool {
        self.red.is_none() && self.green.is_none() && self.blue.is_none()
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>, ctx: &EvalContext<'_, '_>) {
        if self.is_empty() {
            return;
        }
        let count = ctx.window.count;
        for index in 0..count {
            let ctx = ctx.with_cursor(Cursor::pixel(index, count));
            let color = Rgb {
                r: rgb_component(self.red.as_ref(), &ctx),
                g: rgb_component(self.green.as_ref(), &ctx),
                b: rgb_component(self.blue.as_ref(), &ctx),
            };
            if let Some(target) = frame.target(index) {
                frame.strip.set_rgb(target, color, self.op);
            }
        }
    }
}
