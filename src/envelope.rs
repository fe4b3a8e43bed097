//! Message envelopes: one self-contained, ready-to-render log record.
//!
//! An envelope owns its formatted text exclusively. It is built by the
//! producer, moves into the channel, moves out to the drain task and is
//! dropped (buffer freed) right after rendering. Nothing holds a second
//! reference at any point of that cycle.

use core::fmt::{self, Write};
use std::collections::TryReserveError;

use crate::level::Severity;

/// A single queued log record.
pub struct Envelope {
    /// Message severity.
    pub severity: Severity,
    /// Colour token captured from the logger's scheme at enqueue time.
    pub colour: &'static str,
    /// Name of the task that produced the message.
    pub origin: String,
    /// Fully formatted message body.
    pub text: String,
}

impl Envelope {
    /// Build an envelope by formatting `args` into an exactly-sized buffer.
    ///
    /// Two passes: the first counts the rendered byte length, the second
    /// writes into a buffer reserved for exactly that length. Messages of
    /// any size come through whole; there is no fixed cap and no
    /// truncation.
    ///
    /// Fails only if the buffer reservation fails. The embedded target has
    /// no overcommit to hide an exhausted heap, so the condition is
    /// reported to the caller instead of aborting.
    pub fn format(
        severity: Severity,
        colour: &'static str,
        origin: String,
        args: fmt::Arguments<'_>,
    ) -> Result<Self, TryReserveError> {
        let mut counter = ByteCounter::default();
        let _ = fmt::write(&mut counter, args);

        let mut text = String::new();
        text.try_reserve_exact(counter.0)?;
        let _ = text.write_fmt(args);

        Ok(Self {
            severity,
            colour,
            origin,
            text,
        })
    }
}

/// `fmt::Write` adapter that measures instead of storing.
#[derive(Default)]
struct ByteCounter(usize);

impl Write for ByteCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}
