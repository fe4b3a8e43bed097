//! Logger lifecycle and the producer-side API.
//!
//! A [`Logger`] owns one bounded channel and one drain task and tears
//! them down together. Any number of tasks may call the logging entry
//! points concurrently; none of them ever blocks or touches the serial
//! device from its own context.
//!
//! Most applications want one well-known logger; [`init_global`] installs
//! an instance behind a process-wide accessor. The type itself carries no
//! global state, so tests construct as many isolated instances as they
//! like.

use core::fmt;
use std::io;
use std::sync::{Arc, OnceLock};
use std::thread::{JoinHandle, Thread};

use crate::channel::{BoundedChannel, LogStatus};
use crate::drain;
use crate::envelope::Envelope;
use crate::level::{ColourScheme, Severity};
use crate::sink::SerialSink;

/// Construction parameters for [`Logger::start`].
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    /// Maximum number of queued envelopes.
    pub queue_capacity: usize,
    /// Runtime colour-output enable (the `colour` feature must also be
    /// compiled in).
    pub colour: bool,
    /// Per-severity colour tokens.
    pub colours: ColourScheme,
    /// Name of the drain task; also the origin shown on queue notices.
    pub task_name: &'static str,
    /// Drain task stack size, used on ESP-IDF.
    pub task_stack_size: usize,
    /// Drain task FreeRTOS priority, used on ESP-IDF.
    pub task_priority: u8,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10,
            colour: false,
            colours: ColourScheme::ANSI,
            task_name: "logger",
            task_stack_size: 2048,
            task_priority: 1,
        }
    }
}

/// Asynchronous serial logger: bounded channel plus dedicated drain task.
pub struct Logger {
    channel: Arc<BoundedChannel>,
    drain: Option<JoinHandle<()>>,
    colours: ColourScheme,
    task_name: &'static str,
}

impl Logger {
    /// Start a logger writing to `sink`.
    ///
    /// Allocates the channel and spawns the drain task bound to it.
    /// Fails only if the drain task cannot be spawned.
    pub fn start(sink: impl SerialSink + 'static, config: LoggerConfig) -> io::Result<Self> {
        let channel = Arc::new(BoundedChannel::new(config.queue_capacity, config.task_name));
        let drain = drain::spawn(&config, Arc::clone(&channel), Box::new(sink))?;

        Ok(Self {
            channel,
            drain: Some(drain),
            colours: config.colours,
            task_name: config.task_name,
        })
    }

    /// Queue an info-level message.
    pub fn info(&self, args: fmt::Arguments<'_>) -> LogStatus {
        self.send(Severity::Info, args)
    }

    /// Queue a warning-level message.
    pub fn warning(&self, args: fmt::Arguments<'_>) -> LogStatus {
        self.send(Severity::Warning, args)
    }

    /// Queue an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) -> LogStatus {
        self.send(Severity::Error, args)
    }

    fn send(&self, severity: Severity, args: fmt::Arguments<'_>) -> LogStatus {
        // Threshold gate first: a compiled-out level must cost nothing
        // beyond this comparison.
        if !severity.enabled() {
            return LogStatus::Ok;
        }

        let envelope = match Envelope::format(
            severity,
            self.colours.token(severity),
            current_task_name(),
            args,
        ) {
            Ok(envelope) => envelope,
            Err(_) => return LogStatus::AllocFailed,
        };

        self.channel.try_send(envelope)
    }

    /// Name of the drain task, as it appears on queue notices.
    pub fn drain_task_name(&self) -> &'static str {
        self.task_name
    }

    /// Handle of the drain thread, while it is running.
    pub fn drain_thread(&self) -> Option<&Thread> {
        self.drain.as_ref().map(|handle| handle.thread())
    }

    /// Number of envelopes currently waiting to be rendered.
    pub fn queued(&self) -> usize {
        self.channel.len()
    }
}

impl Drop for Logger {
    /// Tear down in dependency order: stop intake and discard queued
    /// envelopes, then join the drain task (which also drops the sink).
    /// The channel outlives the join, so the drain can never be left
    /// blocked on freed state.
    fn drop(&mut self) {
        self.channel.close();
        if let Some(handle) = self.drain.take() {
            let _ = handle.join();
        }
    }
}

/// Name of the task invoking a logging call.
///
/// The scheduler query stays at this boundary: envelopes carry the name
/// as plain data, so the channel and the drain never touch the runtime's
/// introspection API.
#[cfg(target_os = "espidf")]
fn current_task_name() -> String {
    use std::ffi::CStr;

    // SAFETY: pcTaskGetName(NULL) returns the running task's name, a
    // NUL-terminated string owned by FreeRTOS for the task's lifetime.
    unsafe {
        let name = esp_idf_svc::sys::pcTaskGetName(std::ptr::null_mut());
        if name.is_null() {
            String::from("unnamed")
        } else {
            CStr::from_ptr(name).to_string_lossy().into_owned()
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn current_task_name() -> String {
    std::thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_owned()
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide instance.
///
/// Returns the logger back if one was already installed.
pub fn init_global(logger: Logger) -> Result<(), Logger> {
    GLOBAL.set(logger)
}

/// The process-wide logger, if [`init_global`] has run.
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// Queue an info message on a logger instance.
#[macro_export]
macro_rules! serial_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(format_args!($($arg)*))
    };
}

/// Queue a warning message on a logger instance.
#[macro_export]
macro_rules! serial_warning {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warning(format_args!($($arg)*))
    };
}

/// Queue an error message on a logger instance.
#[macro_export]
macro_rules! serial_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(format_args!($($arg)*))
    };
}
