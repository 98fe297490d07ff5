use crate::value::Expression;

/// Source of the animation position
#[derive(Debug, Clone, Default)]
pub enum Domain {
    /// Spatial cursor of the pixel being written
    #[default]
    Position,
    /// Wall-clock time wrapping on a period given in milliseconds
    Duration(Expression),
    /// Wall-clock time with the period derived from the range distance
    /// covered per second
    Speed(Expression),
}

impl Domain {
    pub const fn is_time(&self) -> bool {
        !matches!(self, Self::Position)
    }
}

/// Period in milliseconds needed to cover `distance` at `speed` units per second
pub fn speed_period(distance: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return 0.0;
    }
    1000.0 * distance / speed
}
