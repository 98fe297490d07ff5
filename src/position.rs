//! Symbolic positions resolved into [`Window`]s once per frame

use libm::{floorf, roundf};

use crate::bounds::{PositionUnit, Window};
use crate::context::EvalContext;
use crate::value::Expression;

/// Offset literal that chains a window right after the previous sibling
pub const OFFSET_AFTER: &str = "after";

/// Largest number of pixels a window may span
pub const MAX_WINDOW_COUNT: i32 = 65_535;

/// Position fields of a command, each may be any expression
#[derive(Debug, Clone, Default)]
pub struct Position {
    pub start: Option<Expression>,
    pub count: Option<Expression>,
    pub end: Option<Expression>,
    pub skip: Option<Expression>,
    pub offset: Option<Expression>,
    pub wrap: Option<Expression>,
    pub reverse: Option<Expression>,
    /// Index of a physical segment to address instead of the parent window
    pub strip: Option<Expression>,
    pub unit: PositionUnit,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the window of this position for the current frame.
    ///
    /// `parent` is the window the result is nested in, `previous` the
    /// resolved window of the previous sibling and `segments` the ordered
    /// lengths of the physical strips.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn resolve(
        &self,
        ctx: &EvalContext<'_, '_>,
        parent: &Window,
        previous: Option<&Window>,
        segments: &[u16],
    ) -> Window {
        let wrap = self.wrap.as_ref().is_none_or(|wrap| wrap.eval_bool(ctx, true));
        let reverse = self
            .reverse
            .as_ref()
            .is_some_and(|reverse| reverse.eval_bool(ctx, false));
        let mut skip = self.skip.as_ref().map_or(1, |skip| skip.eval_int(ctx, 1));
        if skip == 0 {
            skip = 1;
        }

        let mut after = false;
        let mut offset = 0;
        if let Some(value) = &self.offset {
            let value = value.eval(ctx);
            if value.equals(OFFSET_AFTER) {
                after = true;
            } else {
                offset = value.as_int(0);
            }
        }

        let unit = match self.unit {
            PositionUnit::Inherit => parent.unit,
            unit => unit,
        };
        let (base, parent_count) = match &self.strip {
            Some(strip) => {
                let Some(segment) = segment_base(segments, strip.eval_int(ctx, 0)) else {
                    return Window {
                        unit,
                        ..Window::root(0)
                    };
                };
                segment
            }
            None => (0, parent.count),
        };
        let percent = unit == PositionUnit::Percent;

        let mut start = if after {
            previous.map_or(0, Window::next_start)
        } else {
            self.start.as_ref().map_or(0, |start| start.eval_int(ctx, 0))
        };
        let mut count_given = true;
        let (mut count, mut end) = if let Some(count) = &self.count {
            let count = count.eval_int(ctx, 0);
            (count, last_index(start, count))
        } else if let Some(end) = &self.end {
            let end = end.eval_int(ctx, start);
            count_given = false;
            (span(start, end), end)
        } else {
            let count = if percent { 100 } else { parent_count };
            (count, last_index(start, count))
        };

        if percent {
            let scale = parent_count as f32 / 100.0;
            if !after {
                start = floorf(start as f32 * scale) as i32;
            }
            if count_given {
                count = roundf(count as f32 * scale) as i32;
                end = last_index(start, count);
            } else {
                end = roundf(end as f32 * scale) as i32;
                count = span(start, end);
            }
            offset = roundf(offset as f32 * scale) as i32;
            if self.skip.is_some() {
                skip = (roundf(skip as f32 * scale) as i32).max(1);
            }
        }

        if count > MAX_WINDOW_COUNT {
            count = MAX_WINDOW_COUNT;
            end = if end < start {
                start.saturating_sub(count - 1)
            } else {
                last_index(start, count)
            };
        }

        Window {
            start: start.saturating_add(base),
            count: count.max(0),
            end: end.saturating_add(base),
            skip,
            offset,
            wrap,
            reverse,
            unit,
        }
    }
}

/// Index of the last pixel of `count` pixels starting at `start`
const fn last_index(start: i32, count: i32) -> i32 {
    start.saturating_add(count).saturating_sub(1)
}

/// Number of pixels between `start` and `end` inclusive
const fn span(start: i32, end: i32) -> i32 {
    end.saturating_sub(start).saturating_abs().saturating_add(1)
}

/// Physical base index and length of segment `index`, `None` when the
/// segment does not exist
fn segment_base(segments: &[u16], index: i32) -> Option<(i32, i32)> {
    let index = usize::try_from(index).ok()?;
    let length = segments.get(index)?;
    let base = segments[..index]
        .iter()
        .fold(0i32, |base, length| base.saturating_add(i32::from(*length)));
    Some((base, i32::from(*length)))
}
