use libm::roundf;

use super::Rgb;

/// Color in HSL space.
///
/// Hue is in degrees `0..=359`, saturation and lightness are percent `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
    roundf(value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Convert HSL to RGB
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = f32::from(hsl.hue % 360) / 360.0;
    let s = f32::from(hsl.saturation.min(100)) / 100.0;
    let l = f32::from(hsl.lightness.min(100)) / 100.0;

    if s == 0.0 {
        let gray = to_channel(l);
        return Rgb {
            r: gray,
            g: gray,
            b: gray,
        };
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Rgb {
        r: to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        g: to_channel(hue_to_channel(p, q, h)),
        b: to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    }
}

/// Convert RGB to HSL
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f32::from(rgb.r) / 255.0;
    let g = f32::from(rgb.g) / 255.0;
    let b = f32::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0, 0, roundf(l * 100.0) as u8);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    let hue = roundf(h / 6.0 * 360.0) as u16 % 360;
    Hsl::new(
        hue,
        roundf(s * 100.0) as u8,
        roundf(l * 100.0) as u8,
    )
}
