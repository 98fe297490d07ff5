//! Resolved write windows
//!
//! A [`Window`] maps a node-local pixel index into the index space of its
//! parent. Windows are resolved once per frame and then translate every
//! pixel write of that frame.

/// Unit used to interpret position fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionUnit {
    #[default]
    Pixel,
    Percent,
    /// Use the unit of the enclosing window
    Inherit,
}

impl PositionUnit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pixel => "pixel",
            Self::Percent => "percent",
            Self::Inherit => "inherit",
        }
    }

    pub fn parse_from_str(value: &str) -> Option<Self> {
        Some(match value {
            "pixel" | "px" => Self::Pixel,
            "percent" | "%" => Self::Percent,
            "inherit" => Self::Inherit,
            _ => return None,
        })
    }
}

/// Window resolved for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i32,
    pub count: i32,
    pub end: i32,
    pub skip: i32,
    pub offset: i32,
    pub wrap: bool,
    pub reverse: bool,
    /// Effective unit, never `Inherit`
    pub unit: PositionUnit,
}

impl Window {
    /// Window covering a whole strip of `count` pixels
    pub const fn root(count: i32) -> Self {
        Self {
            start: 0,
            count,
            end: count.saturating_sub(1),
            skip: 1,
            offset: 0,
            wrap: false,
            reverse: false,
            unit: PositionUnit::Pixel,
        }
    }

    /// Identity window over the full extent of `parent`
    pub const fn inherit(parent: &Self) -> Self {
        let mut window = Self::root(parent.count);
        window.unit = parent.unit;
        window
    }

    pub const fn is_empty(&self) -> bool {
        self.count <= 0
    }

    /// Index right after this window, used by `offset: "after"`
    pub const fn next_start(&self) -> i32 {
        self.start.saturating_add(self.count).saturating_add(self.offset)
    }

    /// Translate a local index into the parent index space.
    ///
    /// The skipped index is clipped or wrapped to the window, then shifted
    /// by the offset. Returns `None` when the write falls outside the window
    /// and wrapping is disabled.
    pub const fn translate(&self, index: i32) -> Option<i32> {
        if self.count <= 0 {
            return None;
        }
        let mut index = index.saturating_mul(self.skip);
        if index < 0 || index >= self.count {
            if !self.wrap {
                return None;
            }
            index = index.rem_euclid(self.count);
        }
        index = index.saturating_add(self.offset);
        if self.reverse {
            index = (self.count - 1).saturating_sub(index);
        }
        if self.start > self.end {
            Some(self.start.saturating_sub(index))
        } else {
            Some(self.start.saturating_add(index))
        }
    }
}
