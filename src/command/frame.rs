use alloc::vec::Vec;

use crate::bounds::Window;
use crate::context::Env;
use crate::strip::LogicalStrip;

/// Mutable target of one frame of execution
///
/// Holds the chain of windows currently in effect, from the strip root to
/// the innermost command. A pixel write goes through every window of the
/// chain before it reaches the strip.
pub struct Frame<'f> {
    pub strip: &'f mut LogicalStrip,
    windows: &'f mut Vec<Window>,
    pub env: &'f Env,
    pub segments: &'f [u16],
}

impl<'f> Frame<'f> {
    /// Start a frame over the whole strip
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn new(
        strip: &'f mut LogicalStrip,
        windows: &'f mut Vec<Window>,
        env: &'f Env,
        segments: &'f [u16],
    ) -> Self {
        windows.clear();
        windows.push(Window::root(strip.len() as i32));
        Self {
            strip,
            windows,
            env,
            segments,
        }
    }

    /// Innermost window in effect
    pub fn window(&self) -> Window {
        self.windows.last().copied().unwrap_or(Window::root(0))
    }

    pub fn push_window(&mut self, window: Window) {
        self.windows.push(window);
    }

    pub fn pop_window(&mut self) {
        if self.windows.len() > 1 {
            self.windows.pop();
        }
    }

    /// Strip index of local pixel `index` of the innermost window.
    ///
    /// Writes outside the innermost window are dropped silently; writes
    /// rejected further out are counted on the strip.
    pub fn target(&mut self, index: i32) -> Option<usize> {
        let innermost = self.windows.len().checked_sub(1)?;
        let mut index = index;
        for (depth, window) in self.windows.iter().enumerate().rev() {
            match window.translate(index) {
                Some(translated) => index = translated,
                None => {
                    if depth != innermost {
                        self.strip.record_dropped();
                    }
                    return None;
                }
            }
        }
        if let Ok(index) = usize::try_from(index) {
            Some(index)
        } else {
            self.strip.record_dropped();
            None
        }
    }
}
