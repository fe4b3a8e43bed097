//! The drain task: the sole consumer of the channel.
//!
//! One long-lived task blocks on the channel, renders each envelope to
//! the serial sink and releases its buffer before dequeuing the next one.
//! No batching, so the worst-case latency of any single line is bounded
//! by one render, and memory held outside the queue is a single envelope.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::channel::BoundedChannel;
use crate::envelope::Envelope;
use crate::logger::LoggerConfig;
use crate::sink::SerialSink;

/// Field separator between the tag, the origin and the message body.
pub const DELIMITER: &str = " - ";

const COLOUR_PREFIX: &[u8] = b"\x1b[";
const COLOUR_SUFFIX: &[u8] = b"m";
const COLOUR_RESET: &[u8] = b"\x1b[0m";

/// Render one envelope to the sink.
///
/// Line layout: optional colour-start escape, severity tag, delimiter,
/// origin task name, delimiter, message text, optional colour reset,
/// newline.
pub fn render(sink: &mut dyn SerialSink, envelope: &Envelope, colour: bool) {
    let colour = cfg!(feature = "colour") && colour;

    if colour {
        sink.write(COLOUR_PREFIX);
        sink.write(envelope.colour.as_bytes());
        sink.write(COLOUR_SUFFIX);
    }

    sink.write(&[envelope.severity.tag()]);
    sink.write(DELIMITER.as_bytes());
    sink.write(envelope.origin.as_bytes());
    sink.write(DELIMITER.as_bytes());
    sink.write(envelope.text.as_bytes());

    if colour {
        sink.write(COLOUR_RESET);
    }

    sink.write(b"\n");
}

/// Consume envelopes until the channel closes.
///
/// Each envelope is fully rendered and dropped before the next dequeue.
/// Sink failures are invisible here (see [`SerialSink`]); nothing makes
/// this loop exit early.
fn drain_loop(channel: Arc<BoundedChannel>, mut sink: Box<dyn SerialSink>, colour: bool) {
    while let Some(envelope) = channel.recv() {
        render(sink.as_mut(), &envelope, colour);
    }
}

/// Spawn the drain task for a channel/sink pair.
///
/// On ESP-IDF the thread is registered with FreeRTOS under the configured
/// task name, stack size and priority, so the logger's own task is
/// distinguishable from application tasks in its output.
pub(crate) fn spawn(
    config: &LoggerConfig,
    channel: Arc<BoundedChannel>,
    sink: Box<dyn SerialSink>,
) -> io::Result<JoinHandle<()>> {
    #[cfg(target_os = "espidf")]
    let _restore = espidf::apply_task_config(config)?;

    let colour = config.colour;
    thread::Builder::new()
        .name(config.task_name.to_owned())
        .spawn(move || drain_loop(channel, sink, colour))
}

#[cfg(target_os = "espidf")]
mod espidf {
    use std::io;

    use esp_idf_svc::hal::task::thread::ThreadSpawnConfiguration;

    use crate::logger::LoggerConfig;

    /// Restores the default spawn configuration when dropped, so the
    /// drain task's name/priority don't leak onto later threads.
    pub struct RestoreSpawnConfig;

    impl Drop for RestoreSpawnConfig {
        fn drop(&mut self) {
            let _ = ThreadSpawnConfiguration::default().set();
        }
    }

    pub fn apply_task_config(config: &LoggerConfig) -> io::Result<RestoreSpawnConfig> {
        // FreeRTOS wants a NUL-terminated name with static lifetime; one
        // leaked copy per logger instance.
        let name: &'static [u8] =
            Box::leak(format!("{}\0", config.task_name).into_bytes().into_boxed_slice());

        ThreadSpawnConfiguration {
            name: Some(name),
            stack_size: config.task_stack_size,
            priority: config.task_priority,
            ..Default::default()
        }
        .set()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

        Ok(RestoreSpawnConfig)
    }
}
