//! # esp32-serial-log
//!
//! Queued, non-blocking serial logging for ESP32 applications.
//!
//! ## Architecture
//!
//! ```text
//! Producer tasks            BoundedChannel           Drain task
//! ──────────────            ──────────────           ──────────
//!
//! serial_info!/ ─────────▶ [E0][E1][E2].. ─────────▶ serial sink
//! warning!/error!           FIFO, capacity N          blocking ok
//! never block               one lock                  one task
//! ```
//!
//! Any task may log at any time; the enqueue path never suspends the
//! caller, so logging is safe from latency-sensitive contexts. A single
//! drain task owns the serial device and is the only place that ever
//! waits. When the queue saturates, the channel trades the last slot for
//! a "Queue Full!" notice so the degradation is visible in the output
//! before messages start disappearing.
//!
//! ## Usage
//!
//! ```no_run
//! use esp32_serial_log::{serial_info, Logger, LoggerConfig, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::start(sink, LoggerConfig::default()).unwrap();
//!
//! let status = serial_info!(logger, "boot complete after {} ms", 128);
//! assert!(status.is_ok());
//! ```
//!
//! On ESP-IDF targets the [`uart`] module provides the device sink, and
//! the drain task registers with FreeRTOS under the configured name and
//! priority.

pub mod channel;
pub mod drain;
pub mod envelope;
pub mod facade;
pub mod level;
pub mod logger;
pub mod sink;

#[cfg(target_os = "espidf")]
pub mod uart;

pub use channel::{BoundedChannel, LogStatus};
pub use drain::DELIMITER;
pub use envelope::Envelope;
pub use facade::install_facade;
pub use level::{ColourScheme, Severity, MAX_LEVEL};
pub use logger::{global, init_global, Logger, LoggerConfig};
pub use sink::{MemorySink, SerialSink, WriterSink};

#[cfg(target_os = "espidf")]
pub use uart::{init_uart_tx, UartConfig, UartSink};
