mod tests {
    use myrtio_light_script::context::{Env, EvalContext, Scope, Signals};
    use myrtio_light_script::position::MAX_WINDOW_COUNT;
    use myrtio_light_script::{Expression, Position, PositionUnit, ScriptState, Window};

    fn resolve(
        position: &Position,
        parent: &Window,
        previous: Option<&Window>,
        segments: &[u16],
    ) -> Window {
        let scope = Scope::root();
        let state = ScriptState::new();
        let env = Env::default();
        let signals = Signals::default();
        let ctx = EvalContext::new(&scope, &state, &env, *parent, &signals);
        position.resolve(&ctx, parent, previous, segments)
    }

    fn number(value: f32) -> Option<Expression> {
        Some(Expression::Number(value))
    }

    #[test]
    fn test_root_window_is_identity() {
        let root = Window::root(10);
        for index in 0..10 {
            assert_eq!(root.translate(index), Some(index));
        }
        assert_eq!(root.translate(10), None);
        assert_eq!(root.translate(-1), None);
    }

    #[test]
    fn test_start_count_window() {
        let position = Position {
            start: number(2.0),
            count: number(3.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[]);
        assert_eq!((window.start, window.count, window.end), (2, 3, 4));
        assert_eq!(window.translate(0), Some(2));
        assert_eq!(window.translate(2), Some(4));
        assert_eq!(window.translate(3), Some(2), "wrap is on by default");
    }

    #[test]
    fn test_end_defines_count() {
        let position = Position {
            start: number(7.0),
            end: number(3.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[]);
        assert_eq!(window.count, 5);
        assert_eq!(window.translate(0), Some(7));
        assert_eq!(window.translate(4), Some(3));
    }

    #[test]
    fn test_wrap_disabled_rejects() {
        let position = Position {
            count: number(3.0),
            wrap: Some(Expression::Bool(false)),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[]);
        assert_eq!(window.translate(3), None);
        assert_eq!(window.translate(-1), None);
    }

    #[test]
    fn test_reverse_skip_and_offset() {
        let reversed = Position {
            count: number(4.0),
            reverse: Some(Expression::Bool(true)),
            ..Position::default()
        };
        let window = resolve(&reversed, &Window::root(10), None, &[]);
        assert_eq!(window.translate(0), Some(3));
        assert_eq!(window.translate(3), Some(0));

        let skipped = Position {
            count: number(6.0),
            skip: number(2.0),
            offset: number(1.0),
            ..Position::default()
        };
        let window = resolve(&skipped, &Window::root(10), None, &[]);
        assert_eq!(window.translate(0), Some(1));
        assert_eq!(window.translate(1), Some(3));
        assert_eq!(window.translate(3), Some(1));
    }

    #[test]
    fn test_percent_is_scaled_to_parent() {
        let position = Position {
            start: number(0.0),
            count: number(50.0),
            unit: PositionUnit::Percent,
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(200), None, &[]);
        assert_eq!((window.start, window.count, window.end), (0, 100, 99));
        assert_eq!(window.unit, PositionUnit::Percent);

        let whole = Position {
            unit: PositionUnit::Percent,
            ..Position::default()
        };
        let window = resolve(&whole, &Window::root(200), None, &[]);
        assert_eq!(window.count, 200);
    }

    #[test]
    fn test_inherit_takes_parent_unit() {
        let mut parent = Window::root(50);
        parent.unit = PositionUnit::Percent;
        let position = Position {
            count: number(10.0),
            unit: PositionUnit::Inherit,
            ..Position::default()
        };
        let window = resolve(&position, &parent, None, &[]);
        assert_eq!(window.unit, PositionUnit::Percent);
        assert_eq!(window.count, 5);
    }

    #[test]
    fn test_offset_after_chains_previous() {
        let previous = Window {
            start: 2,
            count: 3,
            end: 4,
            ..Window::root(10)
        };
        let position = Position {
            offset: Some(Expression::text("after")),
            count: number(4.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), Some(&previous), &[]);
        assert_eq!((window.start, window.count, window.end), (5, 4, 8));

        let first = resolve(&position, &Window::root(10), None, &[]);
        assert_eq!(first.start, 0);
    }

    #[test]
    fn test_offset_shifts_after_clipping() {
        let position = Position {
            count: number(3.0),
            offset: number(2.0),
            wrap: Some(Expression::Bool(false)),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[]);
        assert_eq!(window.translate(0), Some(2));
        assert_eq!(window.translate(2), Some(4));
        assert_eq!(window.translate(3), None);
        assert_eq!(window.translate(-1), None);

        let wrapped = Position {
            wrap: None,
            ..position
        };
        let window = resolve(&wrapped, &Window::root(10), None, &[]);
        assert_eq!(window.translate(3), Some(2));
    }

    #[test]
    fn test_after_includes_previous_offset() {
        let first = Position {
            start: number(0.0),
            count: number(3.0),
            offset: number(2.0),
            ..Position::default()
        };
        let previous = resolve(&first, &Window::root(10), None, &[]);
        assert_eq!(previous.next_start(), 5);

        let position = Position {
            offset: Some(Expression::text("after")),
            count: number(3.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), Some(&previous), &[]);
        assert_eq!((window.start, window.count, window.end), (5, 3, 7));
    }

    #[test]
    fn test_strip_selects_segment() {
        let position = Position {
            strip: number(1.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[4, 6]);
        assert_eq!((window.start, window.count, window.end), (4, 6, 9));

        let missing = Position {
            strip: number(5.0),
            ..Position::default()
        };
        assert!(resolve(&missing, &Window::root(10), None, &[4, 6]).is_empty());
    }

    #[test]
    fn test_missing_strip_ignores_explicit_count() {
        let position = Position {
            strip: number(7.0),
            count: number(3.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[5, 5]);
        assert!(window.is_empty());
        assert_eq!(window.translate(0), None);

        let negative = Position {
            strip: number(-1.0),
            ..Position::default()
        };
        assert!(resolve(&negative, &Window::root(10), None, &[5, 5]).is_empty());
    }

    #[test]
    fn test_extreme_bounds_are_clamped() {
        let position = Position {
            start: number(2_000_000_000.0),
            end: number(-2_000_000_000.0),
            wrap: Some(Expression::Bool(false)),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[]);
        assert_eq!(window.count, MAX_WINDOW_COUNT);
        assert_eq!(window.start, 2_000_000_000);
        assert_eq!(window.end, 2_000_000_000 - (MAX_WINDOW_COUNT - 1));
        assert_eq!(window.translate(0), Some(2_000_000_000));
        assert_eq!(window.translate(MAX_WINDOW_COUNT), None);

        let huge = Position {
            count: number(1.0e9),
            offset: number(2.0e9),
            ..Position::default()
        };
        let window = resolve(&huge, &Window::root(10), None, &[]);
        assert_eq!(window.count, MAX_WINDOW_COUNT);
        assert_eq!(window.translate(i32::MAX), Some(2_000_032_767));
        assert!(window.translate(i32::MIN).is_some());
    }

    #[test]
    fn test_zero_count_is_empty() {
        let position = Position {
            count: number(0.0),
            ..Position::default()
        };
        let window = resolve(&position, &Window::root(10), None, &[]);
        assert!(window.is_empty());
        assert_eq!(window.translate(0), None);
    }
}
