//! Runtime control of the runner
//!
//! Requests such as "run this script" or "turn off" come from outside the
//! render loop (HTTP handlers, buttons). They are queued in a bounded
//! channel guarded by `critical-section` and drained by the runner before
//! each step.

use alloc::boxed::Box;
use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::color::Rgb;
use crate::script::Script;

/// Request to change what the runner is doing
#[derive(Debug, Clone)]
pub enum ControlIntent {
    /// Replace the running script
    RunScript(Box<Script>),
    /// Replace the running script with a single color
    SolidColor(Rgb),
    /// Go dark, keeping the script for `Resume`
    TurnOff,
    /// Resume the script kept by `TurnOff`
    Resume,
}

/// Error returned when the channel is full, carrying the rejected intent
#[derive(Debug, Clone)]
pub struct TrySendError(pub ControlIntent);

/// Bounded queue of control intents
pub struct ControlChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<ControlIntent, SIZE>>>,
}

impl<const SIZE: usize> ControlChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> ControlSender<'_, SIZE> {
        ControlSender { channel: self }
    }

    pub const fn receiver(&self) -> ControlReceiver<'_, SIZE> {
        ControlReceiver { channel: self }
    }

    fn push(&self, intent: ControlIntent) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            self.queue
                .borrow(cs)
                .borrow_mut()
                .push_back(intent)
                .map_err(TrySendError)
        })
    }

    fn pop(&self) -> Option<ControlIntent> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for ControlChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending side of a [`ControlChannel`]
#[derive(Clone, Copy)]
pub struct ControlSender<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlSender<'_, SIZE> {
    /// Queue an intent, returns it back if the channel is full
    pub fn try_send(&self, intent: ControlIntent) -> Result<(), TrySendError> {
        self.channel.push(intent)
    }

    pub fn run_script(&self, script: Script) -> Result<(), TrySendError> {
        self.try_send(ControlIntent::RunScript(Box::new(script)))
    }

    pub fn solid_color(&self, color: Rgb) -> Result<(), TrySendError> {
        self.try_send(ControlIntent::SolidColor(color))
    }

    pub fn turn_off(&self) -> Result<(), TrySendError> {
        self.try_send(ControlIntent::TurnOff)
    }

    pub fn resume(&self) -> Result<(), TrySendError> {
        self.try_send(ControlIntent::Resume)
    }
}

/// Receiving side of a [`ControlChannel`]
#[derive(Clone, Copy)]
pub struct ControlReceiver<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<ControlIntent> {
        self.channel.pop()
    }
}
