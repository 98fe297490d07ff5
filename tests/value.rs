mod tests {
    use myrtio_light_script::command::{Command, CommandKind};
    use myrtio_light_script::context::{Cursor, Env, EvalContext, Scope, Signals};
    use myrtio_light_script::value::{Function, Pattern, PatternElement, PatternExtend};
    use myrtio_light_script::{Expression, ScriptState, Value, ValueList, Window};

    fn number(value: f32) -> Expression {
        Expression::Number(value)
    }

    fn eval_in(scope: &Scope<'_>, env: &Env, expression: &Expression, cursor: Cursor) -> f32 {
        let state = ScriptState::new();
        let signals = Signals::default();
        let ctx = EvalContext::new(scope, &state, env, Window::root(10), &signals).with_cursor(cursor);
        expression.eval_float(&ctx, f32::NAN)
    }

    fn eval(expression: &Expression) -> f32 {
        eval_in(&Scope::root(), &Env::default(), expression, Cursor::default())
    }

    fn eval_at(expression: &Expression, index: i32) -> f32 {
        eval_in(
            &Scope::root(),
            &Env::default(),
            expression,
            Cursor::pixel(index, 10),
        )
    }

    fn pattern(values: &[f32], extend: PatternExtend) -> Expression {
        Expression::Pattern(Box::new(Pattern {
            elements: values
                .iter()
                .map(|value| PatternElement::new(number(*value), 1))
                .collect(),
            extend,
            animator: None,
        }))
    }

    fn function(name: &str, args: Vec<Expression>) -> Expression {
        Expression::Function(Box::new(Function::new(name, args)))
    }

    #[test]
    fn test_value_coercions() {
        assert_eq!(Value::Number(2.6).as_int(0), 3);
        assert_eq!(Value::Bool(true).as_float(0.0), 1.0);
        assert_eq!(Value::Text("12").as_int(0), 12);
        assert_eq!(Value::Text("blue").as_int(7), 7);
        assert_eq!(Value::Null.as_float(4.0), 4.0);
        assert!(Value::Number(0.5).as_bool(false));
        assert!(!Value::Text("false").as_bool(true));
        assert!(Value::Text("after").equals("after"));
    }

    #[test]
    fn test_variable_lookup_order() {
        let mut sibling_values = ValueList::new();
        sibling_values.set("a", number(1.0));
        sibling_values.set("b", number(2.0));
        let siblings = vec![Command::new(CommandKind::Values).with_values(sibling_values)];

        let mut parent_values = ValueList::new();
        parent_values.set("c", number(3.0));
        parent_values.set("a", number(30.0));
        let parent = Scope::new(Some(&parent_values), &[], None);

        let mut own = ValueList::new();
        own.set("b", number(20.0));
        let scope = Scope::new(Some(&own), &siblings, Some(&parent));
        let env = Env::default();

        let lookup = |name: &str| {
            eval_in(&scope, &env, &Expression::variable(name, None), Cursor::default())
        };
        assert_eq!(lookup("a"), 1.0);
        assert_eq!(lookup("b"), 20.0);
        assert_eq!(lookup("c"), 3.0);
        assert!(lookup("missing").is_nan());
    }

    #[test]
    fn test_variable_default() {
        let expression = Expression::variable("missing", Some(number(9.0)));
        assert_eq!(eval(&expression), 9.0);
    }

    #[test]
    fn test_self_reference_uses_default() {
        let mut own = ValueList::new();
        own.set("x", Expression::variable("x", Some(number(5.0))));
        let scope = Scope::new(Some(&own), &[], None);
        let value = eval_in(
            &scope,
            &Env::default(),
            &Expression::variable("x", None),
            Cursor::default(),
        );
        assert_eq!(value, 5.0);
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let mut own = ValueList::new();
        own.set("x", Expression::variable("y", None));
        own.set("y", Expression::variable("x", Some(number(2.0))));
        let scope = Scope::new(Some(&own), &[], None);
        let value = eval_in(
            &scope,
            &Env::default(),
            &Expression::variable("x", None),
            Cursor::default(),
        );
        assert_eq!(value, 2.0);
    }

    #[test]
    fn test_arithmetic_functions() {
        assert_eq!(eval(&function("add", vec![number(1.0), number(2.0), number(3.0)])), 6.0);
        assert_eq!(eval(&function("-", vec![number(10.0), number(4.0)])), 6.0);
        assert_eq!(eval(&function("mult", vec![number(3.0), number(4.0)])), 12.0);
        assert_eq!(eval(&function("div", vec![number(9.0), number(2.0)])), 4.5);
        assert_eq!(eval(&function("div", vec![number(9.0), number(0.0)])), 0.0);
        assert_eq!(eval(&function("mod", vec![number(-1.0), number(5.0)])), 4.0);
        assert_eq!(eval(&function("min", vec![number(3.0), number(-2.0)])), -2.0);
        assert_eq!(eval(&function("max", vec![number(3.0), number(-2.0)])), 3.0);
    }

    #[test]
    fn test_unknown_function_is_zero_and_logged() {
        let env = Env::default();
        let value = eval_in(
            &Scope::root(),
            &env,
            &function("sparkle", vec![number(1.0)]),
            Cursor::default(),
        );
        assert_eq!(value, 0.0);
        assert_eq!(env.logger.error_count(), 1);
    }

    #[test]
    fn test_random_functions_stay_in_range() {
        let env = Env::default();
        let rand = function("rand", vec![number(3.0), number(5.0)]);
        let rand_of = function("randOf", vec![number(1.0), number(7.0)]);
        let unit = function("rand", vec![]);
        for _ in 0..100 {
            let value = eval_in(&Scope::root(), &env, &rand, Cursor::default());
            assert!((3.0..=5.0).contains(&value));
            assert_eq!(value, value.round());
            let value = eval_in(&Scope::root(), &env, &rand_of, Cursor::default());
            assert!(value == 1.0 || value == 7.0);
            let value = eval_in(&Scope::root(), &env, &unit, Cursor::default());
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_sequence_advances_and_wraps() {
        let sequence = function("seq", vec![number(0.0), number(2.0), number(1.0)]);
        let values: Vec<f32> = (0..5).map(|_| eval(&sequence)).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_pattern_repeats() {
        let expression = pattern(&[10.0, 20.0, 30.0], PatternExtend::Repeat);
        assert_eq!(eval_at(&expression, 0), 10.0);
        assert_eq!(eval_at(&expression, 2), 30.0);
        assert_eq!(eval_at(&expression, 4), eval_at(&expression, 1));
    }

    #[test]
    fn test_pattern_weights() {
        let expression = Expression::Pattern(Box::new(Pattern {
            elements: vec![
                PatternElement::new(number(1.0), 2),
                PatternElement::new(number(2.0), 1),
            ],
            extend: PatternExtend::Repeat,
            animator: None,
        }));
        let values: Vec<f32> = (0..6).map(|index| eval_at(&expression, index)).collect();
        assert_eq!(values, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_pattern_without_extension_ends() {
        let expression = pattern(&[10.0, 20.0], PatternExtend::None);
        assert_eq!(eval_at(&expression, 1), 20.0);
        assert!(eval_at(&expression, 2).is_nan());
    }

    #[test]
    fn test_pattern_stretches_over_window() {
        let expression = pattern(&[10.0, 20.0], PatternExtend::Stretch);
        assert_eq!(eval_at(&expression, 0), 10.0);
        assert_eq!(eval_at(&expression, 4), 10.0);
        assert_eq!(eval_at(&expression, 5), 20.0);
        assert_eq!(eval_at(&expression, 9), 20.0);
    }

    #[test]
    fn test_system_values() {
        let scope = Scope::root();
        let state = ScriptState::new();
        let env = Env::default();
        let signals = Signals::default();
        let window = Window {
            start: 3,
            count: 4,
            end: 6,
            ..Window::root(10)
        };
        let ctx = EvalContext::new(&scope, &state, &env, Window::root(10), &signals)
            .with_window(window)
            .with_cursor(Cursor::pixel(2, 4));
        let system = |name: &str| Expression::system("pixel", name).eval_float(&ctx, f32::NAN);
        assert_eq!(system("start"), 3.0);
        assert_eq!(system("count"), 4.0);
        assert_eq!(system("end"), 6.0);
        assert_eq!(system("index"), 2.0);
        assert_eq!(system("blue"), 240.0);
        assert!(system("nothing").is_nan());
        assert_eq!(env.logger.warning_count(), 1);
    }

    #[test]
    fn test_snapshot_freezes_values() {
        let mut values = ValueList::new();
        values.set("n", function("seq", vec![number(5.0), number(10.0)]));
        let scope = Scope::root();
        let state = ScriptState::new();
        let env = Env::default();
        let signals = Signals::default();
        let ctx = EvalContext::new(&scope, &state, &env, Window::root(10), &signals);
        let snapshot = values.snapshot(&ctx);
        let frozen = snapshot.get("n").map(|value| value.eval_float(&ctx, 0.0));
        assert_eq!(frozen, Some(5.0));
        let again = snapshot.get("n").map(|value| value.eval_float(&ctx, 0.0));
        assert_eq!(again, Some(5.0));
        assert!(snapshot.get("n").is_some_and(Expression::is_constant));
    }
}
