/// Default control value of the cubic ease-in side
pub const DEFAULT_EASE_IN: f32 = 0.65;
/// Default control value of the cubic ease-out side
pub const DEFAULT_EASE_OUT: f32 = 0.35;

/// Easing curve applied to a domain position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    /// One-dimensional cubic Bernstein curve through `(0, 0)` and `(1, 1)`
    CubicBezier { ease_in: f32, ease_out: f32 },
}

impl Default for Ease {
    fn default() -> Self {
        Self::CubicBezier {
            ease_in: DEFAULT_EASE_IN,
            ease_out: DEFAULT_EASE_OUT,
        }
    }
}

impl Ease {
    /// Map a position in `[0, 1]` through the curve
    pub fn apply(self, position: f32) -> f32 {
        let t = position.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicBezier { ease_in, ease_out } => {
                let inverse = 1.0 - t;
                3.0 * inverse * inverse * t * ease_in + 3.0 * inverse * t * t * ease_out + t * t * t
            }
        }
    }
}
