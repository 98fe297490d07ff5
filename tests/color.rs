mod tests {
    use myrtio_light_script::color::{Hsl, Rgb, hsl_to_rgb, named_hue, rgb_from_u32, rgb_to_hsl};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(Hsl::new(0, 100, 50)), RED);
        assert_eq!(hsl_to_rgb(Hsl::new(120, 100, 50)), GREEN);
        assert_eq!(hsl_to_rgb(Hsl::new(240, 100, 50)), BLUE);
    }

    #[test]
    fn test_hsl_to_rgb_gray_levels() {
        assert_eq!(hsl_to_rgb(Hsl::new(0, 0, 0)), BLACK);
        assert_eq!(hsl_to_rgb(Hsl::new(200, 0, 100)), WHITE);
        assert_eq!(hsl_to_rgb(Hsl::new(45, 100, 0)), BLACK);
        let gray = hsl_to_rgb(Hsl::new(0, 0, 50));
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        assert!((127..=128).contains(&gray.r));
    }

    #[test]
    fn test_rgb_to_hsl() {
        assert_eq!(rgb_to_hsl(RED), Hsl::new(0, 100, 50));
        assert_eq!(rgb_to_hsl(GREEN), Hsl::new(120, 100, 50));
        assert_eq!(rgb_to_hsl(BLUE), Hsl::new(240, 100, 50));
        assert_eq!(rgb_to_hsl(WHITE), Hsl::new(0, 0, 100));
        assert_eq!(rgb_to_hsl(BLACK), Hsl::new(0, 0, 0));
    }

    #[test]
    fn test_rgb_round_trip_keeps_pure_red() {
        let color = Rgb { r: 250, g: 0, b: 0 };
        let back = hsl_to_rgb(rgb_to_hsl(color));
        assert_eq!(back, color);
    }

    #[test]
    fn test_hue_is_kept_below_360() {
        let hsl = rgb_to_hsl(Rgb { r: 255, g: 0, b: 1 });
        assert!(hsl.hue < 360);
        assert_eq!(hsl_to_rgb(Hsl::new(360, 100, 50)), RED);
    }

    #[test]
    fn test_named_hues() {
        assert_eq!(named_hue("red"), Some(0));
        assert_eq!(named_hue("green"), Some(120));
        assert_eq!(named_hue("blue"), Some(240));
        assert_eq!(named_hue("magenta"), Some(300));
        assert_eq!(named_hue("chartreuse"), None);
    }

    #[test]
    fn test_rgb_from_u32() {
        assert_eq!(rgb_from_u32(0xFF_00_00), RED);
        assert_eq!(
            rgb_from_u32(0x12_34_56),
            Rgb {
                r: 0x12,
                g: 0x34,
                b: 0x56
            }
        );
    }
}
