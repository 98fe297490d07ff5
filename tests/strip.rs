mod tests {
    use myrtio_light_script::HslOperation;
    use myrtio_light_script::color::{Hsl, Rgb};
    use myrtio_light_script::strip::{LogicalStrip, Pixel};

    #[test]
    fn test_new_strip_is_unset() {
        let strip = LogicalStrip::new(4);
        assert_eq!(strip.len(), 4);
        assert!(strip.pixels().iter().all(Pixel::is_unset));
        assert_eq!(strip.pixel(0).map(|pixel| pixel.to_rgb()), Some(Rgb::default()));
    }

    #[test]
    fn test_first_write_ignores_operation() {
        for op in [
            HslOperation::Add,
            HslOperation::Subtract,
            HslOperation::Average,
            HslOperation::Min,
            HslOperation::Max,
        ] {
            let mut strip = LogicalStrip::new(1);
            strip.set_hue(0, 200, op);
            assert_eq!(strip.pixel(0).and_then(|pixel| pixel.hue), Some(200), "{op:?}");
        }
    }

    #[test]
    fn test_operations_merge_with_current() {
        let mut strip = LogicalStrip::new(1);
        strip.set_lightness(0, 40, HslOperation::Replace);
        strip.set_lightness(0, 20, HslOperation::Add);
        assert_eq!(strip.pixel(0).and_then(|pixel| pixel.lightness), Some(60));
        strip.set_lightness(0, 10, HslOperation::Subtract);
        assert_eq!(strip.pixel(0).and_then(|pixel| pixel.lightness), Some(50));
        strip.set_lightness(0, 30, HslOperation::Average);
        assert_eq!(strip.pixel(0).and_then(|pixel| pixel.lightness), Some(40));
        strip.set_lightness(0, 10, HslOperation::Max);
        assert_eq!(strip.pixel(0).and_then(|pixel| pixel.lightness), Some(40));
        strip.set_lightness(0, 10, HslOperation::Min);
        assert_eq!(strip.pixel(0).and_then(|pixel| pixel.lightness), Some(10));
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut strip = LogicalStrip::new(1);
        strip.set_hue(0, 90, HslOperation::Replace);
        let once = strip.pixel(0);
        strip.set_hue(0, 90, HslOperation::Replace);
        assert_eq!(strip.pixel(0), once);
    }

    #[test]
    fn test_components_are_clamped() {
        let mut strip = LogicalStrip::new(1);
        strip.set_hue(0, 400, HslOperation::Replace);
        strip.set_saturation(0, -5, HslOperation::Replace);
        strip.set_lightness(0, 90, HslOperation::Replace);
        strip.set_lightness(0, 90, HslOperation::Add);
        let pixel = strip.pixel(0).unwrap_or_default();
        assert_eq!(pixel.hue, Some(359));
        assert_eq!(pixel.saturation, Some(0));
        assert_eq!(pixel.lightness, Some(100));
    }

    #[test]
    fn test_partial_pixel_uses_defaults() {
        let mut strip = LogicalStrip::new(1);
        strip.set_hue(0, 120, HslOperation::Replace);
        let pixel = strip.pixel(0).unwrap_or_default();
        assert_eq!(pixel.to_hsl(), Some(Hsl::new(120, 100, 50)));
    }

    #[test]
    fn test_out_of_range_writes_are_counted() {
        let mut strip = LogicalStrip::new(2);
        strip.set_hue(2, 10, HslOperation::Replace);
        strip.set_rgb(5, Rgb { r: 1, g: 2, b: 3 }, HslOperation::Replace);
        assert_eq!(strip.take_dropped(), 2);
        assert_eq!(strip.take_dropped(), 0);
        assert!(strip.pixels().iter().all(Pixel::is_unset));
    }

    #[test]
    fn test_set_rgb_writes_every_component() {
        let mut strip = LogicalStrip::new(1);
        strip.set_rgb(0, Rgb { r: 0, g: 0, b: 255 }, HslOperation::Replace);
        assert_eq!(
            strip.pixel(0),
            Some(Pixel {
                hue: Some(240),
                saturation: Some(100),
                lightness: Some(50),
            })
        );
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut strip = LogicalStrip::new(3);
        strip.set_hue(1, 10, HslOperation::Replace);
        strip.clear();
        assert!(strip.pixels().iter().all(Pixel::is_unset));
    }
}
