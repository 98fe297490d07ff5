const OPERATION_NAME_REPLACE: &str = "replace";
const OPERATION_NAME_ADD: &str = "add";
const OPERATION_NAME_SUBTRACT: &str = "subtract";
const OPERATION_NAME_AVERAGE: &str = "average";
const OPERATION_NAME_MIN: &str = "min";
const OPERATION_NAME_MAX: &str = "max";

/// Merge policy for a pixel component write
///
/// Combines the value being written with the value already in the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HslOperation {
    #[default]
    Replace,
    Add,
    Subtract,
    Average,
    Min,
    Max,
}

impl HslOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => OPERATION_NAME_REPLACE,
            Self::Add => OPERATION_NAME_ADD,
            Self::Subtract => OPERATION_NAME_SUBTRACT,
            Self::Average => OPERATION_NAME_AVERAGE,
            Self::Min => OPERATION_NAME_MIN,
            Self::Max => OPERATION_NAME_MAX,
        }
    }

    pub fn parse_from_str(value: &str) -> Option<Self> {
        Some(match value {
            OPERATION_NAME_REPLACE => Self::Replace,
            OPERATION_NAME_ADD => Self::Add,
            OPERATION_NAME_SUBTRACT | "sub" => Self::Subtract,
            OPERATION_NAME_AVERAGE | "avg" => Self::Average,
            OPERATION_NAME_MIN => Self::Min,
            OPERATION_NAME_MAX => Self::Max,
            _ => return None,
        })
    }

    /// Merge `value` into `current`.
    ///
    /// An unset component takes the written value whatever the operation.
    #[allow(clippy::cast_lossless)]
    pub const fn apply(self, current: Option<i32>, value: i32) -> i32 {
        let Some(current) = current else {
            return value;
        };
        match self {
            Self::Replace => value,
            Self::Add => current.saturating_add(value),
            Self::Subtract => current.saturating_sub(value),
            #[allow(clippy::cast_possible_truncation)]
            Self::Average => ((current as i64 + value as i64) / 2) as i32,
            Self::Min => {
                if value < current {
                    value
                } else {
                    current
                }
            }
            Self::Max => {
                if value > current {
                    value
                } else {
                    current
                }
            }
        }
    }
}
