//! Logical HSL pixel buffer
//!
//! Scripts write components of pixels independently, so every component of a
//! pixel may be unset. The buffer is cleared at the start of every step and
//! converted to RGB on `show`.

use alloc::vec;
use alloc::vec::Vec;

use crate::PixelDriver;
use crate::color::{HUE_MAX, Hsl, LIGHTNESS_MAX, Rgb, SATURATION_MAX, hsl_to_rgb, rgb_to_hsl};
use crate::operation::HslOperation;

/// Saturation used when a pixel got a hue or lightness but no saturation
pub const DEFAULT_SATURATION: u8 = 100;
/// Lightness used when a pixel got a hue or saturation but no lightness
pub const DEFAULT_LIGHTNESS: u8 = 50;

/// One pixel of the logical strip with independently set components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub hue: Option<i32>,
    pub saturation: Option<i32>,
    pub lightness: Option<i32>,
}

impl Pixel {
    pub const fn is_unset(&self) -> bool {
        self.hue.is_none() && self.saturation.is_none() && self.lightness.is_none()
    }

    /// Resolved color of the pixel, `None` when nothing was written
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hsl(&self) -> Option<Hsl> {
        if self.is_unset() {
            return None;
        }
        Some(Hsl {
            hue: self.hue.unwrap_or(0) as u16,
            saturation: self
                .saturation
                .map_or(DEFAULT_SATURATION, |saturation| saturation as u8),
            lightness: self
                .lightness
                .map_or(DEFAULT_LIGHTNESS, |lightness| lightness as u8),
        })
    }

    /// Color sent to the driver, unset pixels are off
    pub fn to_rgb(&self) -> Rgb {
        self.to_hsl().map_or(Rgb::default(), hsl_to_rgb)
    }
}

/// Per-pixel HSL buffer owned by the runner
#[derive(Debug, Clone)]
pub struct LogicalStrip {
    pixels: Vec<Pixel>,
    dropped_writes: u32,
}

impl LogicalStrip {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Pixel::default(); len],
            dropped_writes: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, index: usize) -> Option<Pixel> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Reset every pixel to unset
    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::default());
    }

    /// Count a write that landed outside the strip
    pub fn record_dropped(&mut self) {
        self.dropped_writes = self.dropped_writes.saturating_add(1);
    }

    /// Take the number of dropped writes since the last call
    pub fn take_dropped(&mut self) -> u32 {
        core::mem::take(&mut self.dropped_writes)
    }

    fn pixel_mut(&mut self, index: usize) -> Option<&mut Pixel> {
        if index >= self.pixels.len() {
            self.record_dropped();
            return None;
        }
        self.pixels.get_mut(index)
    }

    pub fn set_hue(&mut self, index: usize, hue: i32, op: HslOperation) {
        if let Some(pixel) = self.pixel_mut(index) {
            pixel.hue = Some(op.apply(pixel.hue, hue).clamp(0, HUE_MAX));
        }
    }

    pub fn set_saturation(&mut self, index: usize, saturation: i32, op: HslOperation) {
        if let Some(pixel) = self.pixel_mut(index) {
            pixel.saturation = Some(op.apply(pixel.saturation, saturation).clamp(0, SATURATION_MAX));
        }
    }

    pub fn set_lightness(&mut self, index: usize, lightness: i32, op: HslOperation) {
        if let Some(pixel) = self.pixel_mut(index) {
            pixel.lightness = Some(op.apply(pixel.lightness, lightness).clamp(0, LIGHTNESS_MAX));
        }
    }

    /// Write an RGB color, merged component-wise in HSL space
    pub fn set_rgb(&mut self, index: usize, rgb: Rgb, op: HslOperation) {
        if index >= self.pixels.len() {
            self.record_dropped();
            return;
        }
        let hsl = rgb_to_hsl(rgb);
        self.set_hue(index, i32::from(hsl.hue), op);
        self.set_saturation(index, i32::from(hsl.saturation), op);
        self.set_lightness(index, i32::from(hsl.lightness), op);
    }

    /// Send the buffer to the physical driver
    pub fn show<D: PixelDriver>(&self, driver: &mut D) {
        let count = self.pixels.len().min(driver.pixel_count());
        for (index, pixel) in self.pixels.iter().take(count).enumerate() {
            driver.set_pixel(index, pixel.to_rgb());
        }
        driver.show();
    }
}
