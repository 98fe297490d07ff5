//! Logging handle shared by the loader, the evaluator and the command tree.
//!
//! Output goes through `esp-println` when the `esp32-log` feature is enabled.
//! Without it messages are filtered and counted but never printed, so the
//! engine stays silent on hosts and in tests.

use core::cell::{Cell, RefCell};
use core::fmt;

use embassy_time::{Duration, Instant};
use heapless::LinearMap;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Default interval between two periodic diagnostics.
pub const DEFAULT_PERIODIC_INTERVAL: Duration = Duration::from_millis(1000);

/// Number of distinct periodic diagnostics tracked at once
const PERIODIC_SLOTS: usize = 16;

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    /// Suppress every message
    Off,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Off => "OFF",
        }
    }

    pub fn parse_from_str(value: &str) -> Option<Self> {
        Some(match value {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            "off" => Self::Off,
            _ => return None,
        })
    }
}

/// Logger owned by the runner and lent to everything it drives.
///
/// All state is interior-mutable: evaluation only ever holds shared
/// references to the logger.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    errors: Cell<u32>,
    warnings: Cell<u32>,
    periodic_interval: Duration,
    /// Last emission of each periodic diagnostic, by key
    last_periodic: RefCell<LinearMap<&'static str, Instant, PERIODIC_SLOTS>>,
}

impl Logger {
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level,
            errors: Cell::new(0),
            warnings: Cell::new(0),
            periodic_interval: DEFAULT_PERIODIC_INTERVAL,
            last_periodic: RefCell::new(LinearMap::new()),
        }
    }

    /// Set minimal interval between two periodic messages
    #[must_use]
    pub fn with_periodic_interval(mut self, interval: Duration) -> Self {
        self.periodic_interval = interval;
        self
    }

    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Number of errors reported since creation
    pub fn error_count(&self) -> u32 {
        self.errors.get()
    }

    /// Number of warnings reported since creation
    pub fn warning_count(&self) -> u32 {
        self.warnings.get()
    }

    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.count(level);
        self.emit(level, args);
    }

    fn count(&self, level: LogLevel) {
        match level {
            LogLevel::Error => self.errors.set(self.errors.get().saturating_add(1)),
            LogLevel::Warn => self.warnings.set(self.warnings.get().saturating_add(1)),
            _ => {}
        }
    }

    fn emit(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if level < self.level || level == LogLevel::Off {
            return;
        }
        #[cfg(feature = "esp32-log")]
        println!("[{}] {}", level.as_str(), args);
        #[cfg(not(feature = "esp32-log"))]
        let _ = args;
    }

    /// Log the diagnostic `key` at most once per periodic interval.
    ///
    /// Used for diagnostics that would otherwise repeat on every frame.
    /// Every occurrence is counted, suppressed or not. Each key has its own
    /// interval; when all slots are taken the message is always emitted.
    /// Returns `true` when the message was emitted.
    pub fn periodic(
        &self,
        key: &'static str,
        now: Instant,
        level: LogLevel,
        args: fmt::Arguments<'_>,
    ) -> bool {
        self.count(level);
        {
            let mut last_periodic = self.last_periodic.borrow_mut();
            if let Some(last) = last_periodic.get(&key)
                && now < *last + self.periodic_interval
            {
                return false;
            }
            let _ = last_periodic.insert(key, now);
        }
        self.emit(level, args);
        true
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::log::LogLevel::Debug, format_args!($($arg)*))
    };
}

macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::log::LogLevel::Warn, format_args!($($arg)*))
    };
}

macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::log::LogLevel::Error, format_args!($($arg)*))
    };
}

pub(crate) use {log_debug, log_error, log_warn};
