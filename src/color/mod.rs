//! Color types and HSL <-> RGB conversion

mod hsl;

pub use hsl::{Hsl, hsl_to_rgb, rgb_to_hsl};
use smart_leds::RGB8;

pub type Rgb = RGB8;

pub const HUE_MAX: i32 = 359;
pub const SATURATION_MAX: i32 = 100;
pub const LIGHTNESS_MAX: i32 = 100;

/// Named hues available to scripts as system values
pub const NAMED_HUES: [(&str, u16); 8] = [
    ("red", 0),
    ("orange", 30),
    ("yellow", 60),
    ("green", 120),
    ("cyan", 180),
    ("blue", 240),
    ("purple", 270),
    ("magenta", 300),
];

/// Look up a named hue
pub fn named_hue(name: &str) -> Option<u16> {
    NAMED_HUES
        .iter()
        .find(|(hue_name, _)| *hue_name == name)
        .map(|(_, hue)| *hue)
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
