//! Build scripts from their JSON source
//!
//! Only document-level problems are errors. Malformed nodes are logged and
//! skipped so a partly broken script still runs.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embassy_time::Duration;
use serde_json::{Map, Value};

use crate::animation::{Animator, Domain};
use crate::bounds::PositionUnit;
use crate::command::{
    Command, CommandKind, CommandType, Container, HslCommand, RgbCommand, Template,
};
use crate::log::{Logger, log_debug, log_error, log_warn};
use crate::operation::HslOperation;
use crate::position::{OFFSET_AFTER, Position};
use crate::script::Script;
use crate::value::{
    Expression, Function, FunctionKind, Pattern, PatternElement, PatternExtend, Range, ValueList,
};

const DEFAULT_SCRIPT_NAME: &str = "script";
const POSITION_TYPE_AFTER: &str = "after";
const POSITION_TYPE_RELATIVE: &str = "relative";
const POSITION_KEYS: [&str; 9] = [
    "start", "count", "end", "skip", "offset", "wrap", "reverse", "strip", "unit",
];

/// Error returned when a document cannot be turned into a script
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("invalid script JSON: {0}")]
    Json(String),
    #[error("script must be a JSON object")]
    NotAnObject,
    #[error("script has no commands array")]
    MissingCommands,
}

/// Parse a script from JSON text
pub fn load_script(text: &str, logger: &Logger) -> Result<Script, LoadError> {
    ScriptLoader::new(logger).load_str(text)
}

/// Build a script from an already parsed JSON document
pub fn load_script_value(json: &Value, logger: &Logger) -> Result<Script, LoadError> {
    ScriptLoader::new(logger).load_value(json)
}

type Object = Map<String, Value>;

/// Converts JSON nodes into commands and expressions
pub struct ScriptLoader<'l> {
    logger: &'l Logger,
}

impl<'l> ScriptLoader<'l> {
    pub const fn new(logger: &'l Logger) -> Self {
        Self { logger }
    }

    pub fn load_str(&self, text: &str) -> Result<Script, LoadError> {
        let json: Value = serde_json::from_str(text).map_err(|err| {
            log_error!(self.logger, "[ScriptLoader.load] invalid JSON: {}", err);
            LoadError::Json(err.to_string())
        })?;
        self.load_value(&json)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn load_value(&self, json: &Value) -> Result<Script, LoadError> {
        let object = json.as_object().ok_or(LoadError::NotAnObject)?;
        let commands = object
            .get("commands")
            .and_then(Value::as_array)
            .ok_or(LoadError::MissingCommands)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_SCRIPT_NAME);
        let mut root = Command::start(self.command_list(commands))
            .with_values(self.values(object.get("values")));
        if let Some(position) = object.get("position").and_then(Value::as_object) {
            root = root.with_position(self.position(position));
        }

        let mut script = Script::new(name, root);
        if let Some(frequency) = object.get("frequency").and_then(Value::as_f64)
            && frequency > 0.0
        {
            script = script.with_step_interval(Duration::from_millis(frequency as u64));
        }
        log_debug!(self.logger, "[ScriptLoader.load] loaded {}", name);
        Ok(script)
    }

    fn command_list(&self, commands: &[Value]) -> Vec<Command> {
        commands
            .iter()
            .filter_map(|command| self.command(command))
            .collect()
    }

    fn children(&self, object: &Object) -> Vec<Command> {
        object
            .get("commands")
            .and_then(Value::as_array)
            .map(|commands| self.command_list(commands))
            .unwrap_or_default()
    }

    /// Build one command, `None` when the node is skipped
    pub fn command(&self, json: &Value) -> Option<Command> {
        let Some(object) = json.as_object() else {
            log_warn!(self.logger, "[ScriptLoader.command] command is not an object");
            return None;
        };
        let type_name = object.get("type").and_then(Value::as_str).unwrap_or("");
        let Some(command_type) = CommandType::parse_from_str(type_name) else {
            log_warn!(self.logger, "[ScriptLoader.command] unknown command type '{}'", type_name);
            return None;
        };

        let kind = match command_type {
            CommandType::Rgb => CommandKind::Rgb(RgbCommand {
                red: self.field(object, "red"),
                green: self.field(object, "green"),
                blue: self.field(object, "blue"),
                op: self.operation(object),
            }),
            CommandType::Hsl => CommandKind::Hsl(HslCommand {
                hue: self.field(object, "hue"),
                saturation: self.field(object, "saturation"),
                lightness: self.field(object, "lightness"),
                op: self.operation(object),
            }),
            CommandType::Values => CommandKind::Values,
            CommandType::Position => CommandKind::Position,
            CommandType::Start | CommandType::Segment => {
                CommandKind::Segment(Container::new(self.children(object)))
            }
            CommandType::Template => CommandKind::Template(self.template(object)),
        };

        let mut command = Command::new(kind).with_values(self.values(object.get("values")));
        if let Some(position) = self.command_position(object, command_type) {
            command = command.with_position(position);
        }
        Some(command)
    }

    /// Position of a command from its `position` object.
    ///
    /// Segments and position commands may also carry position fields inline,
    /// those fill whatever the `position` object leaves unset.
    fn command_position(&self, object: &Object, command_type: CommandType) -> Option<Position> {
        let nested = object.get("position").and_then(Value::as_object);
        let inline = matches!(command_type, CommandType::Position | CommandType::Segment)
            && POSITION_KEYS.iter().any(|key| object.contains_key(*key));
        if nested.is_none() && !inline {
            return None;
        }
        let mut position = match nested {
            Some(nested) => self.position(nested),
            None => self.position(&Object::new()),
        };
        if inline {
            let inline = self.position_fields(object, None);
            position.start = position.start.or(inline.start);
            position.count = position.count.or(inline.count);
            position.end = position.end.or(inline.end);
            position.skip = position.skip.or(inline.skip);
            position.offset = position.offset.or(inline.offset);
            position.wrap = position.wrap.or(inline.wrap);
            position.reverse = position.reverse.or(inline.reverse);
            position.strip = position.strip.or(inline.strip);
            if position.unit == PositionUnit::Inherit {
                position.unit = inline.unit;
            }
        }
        Some(position)
    }

    fn template(&self, object: &Object) -> Template {
        let mut template = Template::new(self.children(object));
        template.count = self.field(object, "count");
        template.min = self.field(object, "min");
        template.max = self.field(object, "max");
        template.start_chance = self
            .field(object, "start-chance")
            .or_else(|| self.field(object, "start_chance"));
        template.end_chance = self
            .field(object, "end-chance")
            .or_else(|| self.field(object, "end_chance"));
        template
    }

    fn operation(&self, object: &Object) -> HslOperation {
        let Some(name) = object.get("op").and_then(Value::as_str) else {
            return HslOperation::default();
        };
        HslOperation::parse_from_str(name).unwrap_or_else(|| {
            log_warn!(self.logger, "[ScriptLoader.operation] unknown op '{}'", name);
            HslOperation::default()
        })
    }

    fn values(&self, json: Option<&Value>) -> ValueList {
        let mut values = ValueList::new();
        let Some(object) = json.and_then(Value::as_object) else {
            return values;
        };
        for (name, value) in object {
            if let Some(expression) = self.expression(value) {
                values.set(name.as_str(), expression);
            }
        }
        values
    }

    /// Build a position from the fields of `object`
    pub fn position(&self, object: &Object) -> Position {
        self.position_fields(object, object.get("type").and_then(Value::as_str))
    }

    /// Position fields of `object`, `position_type` is the base kind of a
    /// `position` object (`relative` or `after`)
    fn position_fields(&self, object: &Object, position_type: Option<&str>) -> Position {
        let unit = object
            .get("unit")
            .and_then(Value::as_str)
            .map_or(PositionUnit::Inherit, |unit| {
                PositionUnit::parse_from_str(unit).unwrap_or_else(|| {
                    log_warn!(self.logger, "[ScriptLoader.position] unknown unit '{}'", unit);
                    PositionUnit::Inherit
                })
            });
        let mut offset = self.field(object, "offset");
        match position_type {
            Some(POSITION_TYPE_AFTER) => {
                offset.get_or_insert_with(|| Expression::text(OFFSET_AFTER));
            }
            Some(POSITION_TYPE_RELATIVE) | None => {}
            Some(other) => {
                log_debug!(self.logger, "[ScriptLoader.position] ignored type '{}'", other);
            }
        }
        Position {
            start: self.field(object, "start"),
            count: self.field(object, "count"),
            end: self.field(object, "end"),
            skip: self.field(object, "skip"),
            offset,
            wrap: self.field(object, "wrap"),
            reverse: self.field(object, "reverse"),
            strip: self.field(object, "strip"),
            unit,
        }
    }

    fn field(&self, object: &Object, key: &str) -> Option<Expression> {
        object.get(key).and_then(|value| self.expression(value))
    }

    /// Build an expression from any JSON value
    #[allow(clippy::cast_possible_truncation)]
    pub fn expression(&self, json: &Value) -> Option<Expression> {
        Some(match json {
            Value::Null => Expression::Null,
            Value::Bool(value) => Expression::Bool(*value),
            Value::Number(value) => Expression::Number(value.as_f64()? as f32),
            Value::String(text) => self.text(text),
            Value::Array(items) => self.array(items),
            Value::Object(object) => return self.object(object),
        })
    }

    /// `var(name|default)`, `sys(scope:name)` or a plain string
    fn text(&self, text: &str) -> Expression {
        if let Some(inner) = call_arguments(text, "var") {
            let (name, default) = match inner.split_once('|') {
                Some((name, default)) => (name, Some(self.literal(default))),
                None => (inner, None),
            };
            return Expression::variable(name.trim(), default);
        }
        if let Some(inner) = call_arguments(text, "sys") {
            let (scope, name) = inner.split_once(':').unwrap_or(("", inner));
            return Expression::system(scope.trim(), name.trim());
        }
        Expression::text(text)
    }

    fn literal(&self, text: &str) -> Expression {
        let text = text.trim();
        match text {
            "true" => Expression::Bool(true),
            "false" => Expression::Bool(false),
            "null" => Expression::Null,
            _ => text
                .parse::<f32>()
                .map_or_else(|_| self.text(text), Expression::Number),
        }
    }

    /// `["name", args...]` is a call, any other array a repeating pattern
    fn array(&self, items: &[Value]) -> Expression {
        if let Some(name) = items.first().and_then(Value::as_str)
            && FunctionKind::parse_from_str(name) != FunctionKind::Unknown
        {
            return self.function(name, &items[1..]);
        }
        Expression::Pattern(Box::new(Pattern {
            elements: self.pattern_elements(items),
            extend: PatternExtend::Repeat,
            animator: None,
        }))
    }

    fn object(&self, object: &Object) -> Option<Expression> {
        if let Some(name) = object.get("function").and_then(Value::as_str) {
            let args = match object.get("args") {
                Some(Value::Array(args)) => args.as_slice(),
                Some(arg) => core::slice::from_ref(arg),
                None => &[],
            };
            return Some(self.function(name, args));
        }
        if let Some(elements) = object.get("pattern").and_then(Value::as_array) {
            return Some(self.pattern(object, elements));
        }
        if ["start", "end", "value"].iter().any(|key| object.contains_key(*key)) {
            return Some(self.range(object));
        }
        log_warn!(self.logger, "[ScriptLoader.expression] unsupported value object");
        None
    }

    fn function(&self, name: &str, args: &[Value]) -> Expression {
        let args = args
            .iter()
            .filter_map(|arg| self.expression(arg))
            .collect();
        let function = Function::new(name, args);
        if function.kind() == FunctionKind::Unknown {
            log_warn!(self.logger, "[ScriptLoader.function] unknown function '{}'", name);
        }
        Expression::Function(Box::new(function))
    }

    fn range(&self, object: &Object) -> Expression {
        let start = self
            .field(object, "start")
            .or_else(|| self.field(object, "value"));
        Expression::Range(Box::new(Range {
            start,
            end: self.field(object, "end"),
            animator: self.animator(object),
        }))
    }

    fn pattern(&self, object: &Object, elements: &[Value]) -> Expression {
        let extend = object
            .get("extend")
            .and_then(Value::as_str)
            .map_or(PatternExtend::Repeat, |extend| {
                PatternExtend::parse_from_str(extend).unwrap_or_else(|| {
                    log_warn!(self.logger, "[ScriptLoader.pattern] unknown extend '{}'", extend);
                    PatternExtend::Repeat
                })
            });
        let animated = object.contains_key("animate")
            || object.contains_key("duration")
            || object.contains_key("speed");
        Expression::Pattern(Box::new(Pattern {
            elements: self.pattern_elements(elements),
            extend,
            animator: animated.then(|| self.animator(object)),
        }))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn pattern_elements(&self, items: &[Value]) -> Vec<PatternElement> {
        items
            .iter()
            .filter_map(|item| {
                if let Some(object) = item.as_object()
                    && let Some(value) = object.get("value")
                {
                    let repeat = object
                        .get("repeat")
                        .or_else(|| object.get("count"))
                        .and_then(Value::as_f64)
                        .map_or(1, |repeat| repeat.max(0.0) as u32);
                    return Some(PatternElement::new(self.expression(value)?, repeat));
                }
                Some(PatternElement::new(self.expression(item)?, 1))
            })
            .collect()
    }

    /// Animator from an `animate` object, or from keys set on `object` itself
    fn animator(&self, object: &Object) -> Animator {
        let source = object
            .get("animate")
            .and_then(Value::as_object)
            .unwrap_or(object);
        let domain = if let Some(duration) = self.field(source, "duration") {
            Domain::Duration(duration)
        } else if let Some(speed) = self.field(source, "speed") {
            Domain::Speed(speed)
        } else {
            Domain::Position
        };

        let mut animator = Animator::new(domain);
        if let Some(repeat) = self.field(source, "repeat") {
            animator = animator.with_repeat(repeat);
        }
        if let Some(delay) = self
            .field(source, "delay")
            .or_else(|| self.field(source, "repeat-delay"))
        {
            animator = animator.with_delay(delay);
        }
        if let Some(unfold) = self.field(source, "unfold") {
            animator = animator.with_unfold(unfold);
        }
        if let Some(ease) = self.field(source, "ease") {
            animator = animator.with_ease(ease);
        }
        if let Some(ease_in) = self.field(source, "ease-in") {
            animator = animator.with_ease_in(ease_in);
        }
        if let Some(ease_out) = self.field(source, "ease-out") {
            animator = animator.with_ease_out(ease_out);
        }
        animator
    }
}

/// Arguments of `name(...)`
fn call_arguments<'t>(text: &'t str, name: &str) -> Option<&'t str> {
    text.trim()
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}
