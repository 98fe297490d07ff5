//! Command tree
//!
//! Commands form an owned tree. Containers own their children and pass the
//! context of the frame (active windows, previous sibling, value scope) down
//! explicitly while executing, so no node ever points back to its parent.

mod frame;
mod leaf;
mod template;

use alloc::vec::Vec;

pub use frame::Frame;
pub use leaf::{HslCommand, RgbCommand};
pub use template::{Template, TemplateInstance};

use crate::bounds::Window;
use crate::context::{EvalContext, Scope, Signals};
use crate::log::{LogLevel, log_debug};
use crate::position::Position;
use crate::state::ScriptState;
use crate::value::ValueList;

const COMMAND_NAME_START: &str = "start";
const COMMAND_NAME_POSITION: &str = "position";
const COMMAND_NAME_VALUES: &str = "values";
const COMMAND_NAME_RGB: &str = "rgb";
const COMMAND_NAME_HSL: &str = "hsl";
const COMMAND_NAME_SEGMENT: &str = "segment";
const COMMAND_NAME_TEMPLATE: &str = "create";

/// Execution status of a command for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Running,
    /// Finished for good, latched by the command
    Complete,
    /// Failed for this frame only
    Error,
    Paused,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Paused => "paused",
        }
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Type tag of a command as written in scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Start,
    Position,
    Values,
    Rgb,
    Hsl,
    Segment,
    Template,
}

impl CommandType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => COMMAND_NAME_START,
            Self::Position => COMMAND_NAME_POSITION,
            Self::Values => COMMAND_NAME_VALUES,
            Self::Rgb => COMMAND_NAME_RGB,
            Self::Hsl => COMMAND_NAME_HSL,
            Self::Segment => COMMAND_NAME_SEGMENT,
            Self::Template => COMMAND_NAME_TEMPLATE,
        }
    }

    pub fn parse_from_str(value: &str) -> Option<Self> {
        Some(match value {
            COMMAND_NAME_START => Self::Start,
            COMMAND_NAME_POSITION => Self::Position,
            COMMAND_NAME_VALUES => Self::Values,
            COMMAND_NAME_RGB => Self::Rgb,
            COMMAND_NAME_HSL => Self::Hsl,
            COMMAND_NAME_SEGMENT => Self::Segment,
            COMMAND_NAME_TEMPLATE | "template" => Self::Template,
            _ => return None,
        })
    }
}

/// Ordered children of a container
#[derive(Debug, Clone, Default)]
pub struct Container {
    children: Vec<Command>,
}

impl Container {
    pub const fn new(children: Vec<Command>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Command] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub enum CommandKind {
    /// Root of a script
    Start(Container),
    /// Window applied to the following siblings
    Position,
    /// Named values only
    Values,
    Rgb(RgbCommand),
    Hsl(HslCommand),
    Segment(Container),
    Template(Template),
}

impl CommandKind {
    pub const fn command_type(&self) -> CommandType {
        match self {
            Self::Start(_) => CommandType::Start,
            Self::Position => CommandType::Position,
            Self::Values => CommandType::Values,
            Self::Rgb(_) => CommandType::Rgb,
            Self::Hsl(_) => CommandType::Hsl,
            Self::Segment(_) => CommandType::Segment,
            Self::Template(_) => CommandType::Template,
        }
    }
}

/// Node of the command tree
#[derive(Debug, Clone)]
pub struct Command {
    kind: CommandKind,
    values: ValueList,
    position: Option<Position>,
    /// Window resolved in the last frame
    window: Option<Window>,
    status: Status,
}

impl Command {
    pub const fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            values: ValueList::new(),
            position: None,
            window: None,
            status: Status::Running,
        }
    }

    pub const fn start(children: Vec<Command>) -> Self {
        Self::new(CommandKind::Start(Container::new(children)))
    }

    pub const fn segment(children: Vec<Command>) -> Self {
        Self::new(CommandKind::Segment(Container::new(children)))
    }

    pub const fn rgb(command: RgbCommand) -> Self {
        Self::new(CommandKind::Rgb(command))
    }

    pub const fn hsl(command: HslCommand) -> Self {
        Self::new(CommandKind::Hsl(command))
    }

    pub const fn template(template: Template) -> Self {
        Self::new(CommandKind::Template(template))
    }

    #[must_use]
    pub fn with_values(mut self, values: ValueList) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub const fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub const fn command_type(&self) -> CommandType {
        self.kind.command_type()
    }

    pub const fn values(&self) -> &ValueList {
        &self.values
    }

    pub const fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub const fn window(&self) -> Option<Window> {
        self.window
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    /// Children of a container command, empty for leaves
    pub fn children(&self) -> &[Command] {
        match &self.kind {
            CommandKind::Start(container) | CommandKind::Segment(container) => container.children(),
            CommandKind::Template(template) => template.prototype(),
            _ => &[],
        }
    }

    /// Execute the command for the current frame.
    ///
    /// `siblings` are the commands declared before this one in the same
    /// container, `previous` is the last window resolved among them.
    pub fn execute(
        &mut self,
        frame: &mut Frame<'_>,
        state: &ScriptState,
        siblings: &[Command],
        parent: &Scope<'_>,
        previous: Option<&Window>,
    ) -> Status {
        if self.status == Status::Complete {
            return Status::Complete;
        }
        let Self {
            kind,
            values,
            position,
            window,
            status,
        } = self;

        if matches!(kind, CommandKind::Values) {
            *window = None;
            return Status::Running;
        }

        let values = &*values;
        let scope = Scope::new(Some(values), siblings, Some(parent));
        let signals = Signals::default();
        let parent_window = frame.window();
        let ctx = EvalContext::new(&scope, state, frame.env, parent_window, &signals);

        let resolved = position.as_ref().map_or_else(
            || Window::inherit(&parent_window),
            |position| position.resolve(&ctx, &parent_window, previous, frame.segments),
        );
        *window = Some(resolved);
        if resolved.is_empty() {
            frame.env.logger.periodic(
                "Command.execute.empty_window",
                state.now(),
                LogLevel::Warn,
                format_args!(
                    "[Command.execute] {} resolved to an empty window",
                    kind.command_type().as_str()
                ),
            );
            return Status::Error;
        }

        let ctx = ctx.with_window(resolved);
        let result = match kind {
            CommandKind::Position | CommandKind::Values => Status::Running,
            CommandKind::Rgb(leaf) => {
                frame.push_window(resolved);
                leaf.draw(frame, &ctx);
                frame.pop_window();
                Status::Running
            }
            CommandKind::Hsl(leaf) => {
                frame.push_window(resolved);
                leaf.draw(frame, &ctx);
                frame.pop_window();
                Status::Running
            }
            CommandKind::Start(container) | CommandKind::Segment(container) => {
                frame.push_window(resolved);
                let result = run_children(&mut container.children, frame, state, &scope);
                frame.pop_window();
                result
            }
            CommandKind::Template(template) => {
                frame.push_window(resolved);
                let result = template.run(frame, state, &scope, &ctx, values);
                frame.pop_window();
                result
            }
        };

        let result = if result.is_running() && signals.is_completed() {
            Status::Complete
        } else {
            result
        };
        if result == Status::Complete {
            *status = Status::Complete;
        }
        result
    }
}

/// Run the children of a container in declared order.
///
/// A child in error is skipped for the frame without affecting its
/// siblings. The first completed or paused child stops the remaining ones
/// and its status is returned.
pub(crate) fn run_children(
    children: &mut [Command],
    frame: &mut Frame<'_>,
    state: &ScriptState,
    scope: &Scope<'_>,
) -> Status {
    let mut previous: Option<Window> = None;
    let mut position_pushed = false;
    let mut result = Status::Running;

    for index in 0..children.len() {
        let (before, rest) = children.split_at_mut(index);
        let Some(child) = rest.first_mut() else {
            break;
        };
        let is_position = child.command_type() == CommandType::Position;
        if is_position && position_pushed {
            frame.pop_window();
            position_pushed = false;
        }

        let status = child.execute(frame, state, before, scope, previous.as_ref());
        match status {
            Status::Running => {
                if is_position {
                    if let Some(window) = child.window() {
                        frame.push_window(window);
                        position_pushed = true;
                    }
                    previous = None;
                } else if let Some(window) = child.window() {
                    previous = Some(window);
                }
            }
            Status::Error => {
                log_debug!(
                    frame.env.logger,
                    "[Container.run] skipped {} #{}",
                    child.command_type().as_str(),
                    index
                );
            }
            Status::Complete | Status::Paused => {
                result = status;
                break;
            }
        }
    }

    if position_pushed {
        frame.pop_window();
    }
    result
}
