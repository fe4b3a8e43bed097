//! Bounded multi-producer/single-consumer channel of envelopes.
//!
//! This is the single synchronization point of the crate. Producers call
//! [`BoundedChannel::try_send`], which never suspends; the drain task is
//! the only caller of [`BoundedChannel::recv`], the crate's one blocking
//! operation.
//!
//! # Backpressure
//!
//! `try_send` checks the free space under the lock and applies a tiered
//! policy:
//!
//! - two or more free slots: the envelope is queued normally;
//! - exactly one free slot: the caller's envelope is discarded and a
//!   synthetic "Queue Full!" notice is queued in its place, attributed to
//!   the drain task, so saturation shows up in the output before messages
//!   start vanishing silently;
//! - no free slots: nothing is queued.
//!
//! The caller learns which case it hit from the returned [`LogStatus`].

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError};

use crate::envelope::Envelope;

/// Text of the synthetic almost-full notice.
const QUEUE_FULL_NOTICE: &str = "Queue Full!";

/// Outcome of a logging call, returned synchronously to the producer.
///
/// There is no secondary error channel; degraded logging is only
/// observable through these codes (and the notice line in the output).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogStatus {
    /// The message was queued (or was below the compiled threshold).
    Ok,
    /// One slot was left: the message was dropped and a "Queue Full!"
    /// notice queued in its place.
    AlmostFull,
    /// The queue was full; the message was dropped without trace.
    Full,
    /// Buffer allocation failed; nothing was queued.
    AllocFailed,
}

impl LogStatus {
    /// True when the call completed without losing the message.
    pub const fn is_ok(self) -> bool {
        matches!(self, LogStatus::Ok)
    }

    /// Short description for diagnostics.
    pub const fn message(self) -> &'static str {
        match self {
            LogStatus::Ok => "queued",
            LogStatus::AlmostFull => "queue almost full, message replaced by notice",
            LogStatus::Full => "queue full, message dropped",
            LogStatus::AllocFailed => "message buffer allocation failed",
        }
    }
}

impl core::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

struct ChannelState {
    queue: VecDeque<Envelope>,
    closed: bool,
}

/// Fixed-capacity FIFO queue connecting producer tasks to the drain task.
pub struct BoundedChannel {
    state: Mutex<ChannelState>,
    available: Condvar,
    capacity: usize,
    /// Origin attributed to synthetic notices.
    drain_name: &'static str,
}

impl BoundedChannel {
    /// Create a channel holding at most `capacity` envelopes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`: with a single slot the almost-full tier
    /// would claim every send and no real message could ever be queued.
    pub fn new(capacity: usize, drain_name: &'static str) -> Self {
        assert!(capacity >= 2, "queue capacity must be at least 2");

        Self {
            state: Mutex::new(ChannelState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            available: Condvar::new(),
            capacity,
            drain_name,
        }
    }

    /// Attempt to queue an envelope. Never suspends the caller.
    ///
    /// The space check and the insertion happen under one lock
    /// acquisition, so the capacity bound holds for any number of
    /// concurrent producers.
    pub fn try_send(&self, envelope: Envelope) -> LogStatus {
        let mut state = self.lock_state();

        if state.closed {
            return LogStatus::Full;
        }

        match self.capacity - state.queue.len() {
            0 => LogStatus::Full,
            1 => {
                // Last slot: substitute the notice for the caller's
                // message, keeping its severity and colour but attributed
                // to the drain task.
                let notice = Envelope::format(
                    envelope.severity,
                    envelope.colour,
                    self.drain_name.to_owned(),
                    format_args!("{}", QUEUE_FULL_NOTICE),
                );
                match notice {
                    Ok(notice) => {
                        state.queue.push_back(notice);
                        self.available.notify_one();
                        LogStatus::AlmostFull
                    }
                    Err(_) => LogStatus::AllocFailed,
                }
            }
            _ => {
                state.queue.push_back(envelope);
                self.available.notify_one();
                LogStatus::Ok
            }
        }
    }

    /// Block until an envelope is available and dequeue it, FIFO.
    ///
    /// Returns `None` once the channel has been closed. This is the only
    /// suspension point in the crate and is reserved for the drain task.
    pub fn recv(&self) -> Option<Envelope> {
        let mut state = self.lock_state();
        loop {
            if let Some(envelope) = state.queue.pop_front() {
                return Some(envelope);
            }
            if state.closed {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop accepting envelopes, discard everything still queued and wake
    /// the receiver.
    ///
    /// Discarded envelopes are dropped here, releasing their buffers
    /// before the channel itself goes away.
    pub fn close(&self) {
        let mut state = self.lock_state();
        state.closed = true;
        state.queue.clear();
        self.available.notify_all();
    }

    /// Number of envelopes currently queued.
    pub fn len(&self) -> usize {
        self.lock_state().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.lock_state().closed
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ChannelState> {
        // A panic elsewhere must not take logging down with it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use std::sync::Arc;
    use std::thread;

    fn envelope(text: &str) -> Envelope {
        Envelope::format(
            Severity::Info,
            "32",
            "test".to_owned(),
            format_args!("{}", text),
        )
        .unwrap()
    }

    #[test]
    fn test_send_and_recv_fifo() {
        let channel = BoundedChannel::new(4, "logger");

        assert_eq!(channel.try_send(envelope("first")), LogStatus::Ok);
        assert_eq!(channel.try_send(envelope("second")), LogStatus::Ok);

        assert_eq!(channel.recv().unwrap().text, "first");
        assert_eq!(channel.recv().unwrap().text, "second");
        assert!(channel.is_empty());
    }

    #[test]
    fn test_almost_full_substitutes_notice() {
        let channel = BoundedChannel::new(3, "logger");

        assert_eq!(channel.try_send(envelope("a")), LogStatus::Ok);
        assert_eq!(channel.try_send(envelope("b")), LogStatus::Ok);

        // One slot left: the real message must not survive.
        assert_eq!(channel.try_send(envelope("victim")), LogStatus::AlmostFull);
        assert_eq!(channel.len(), 3);

        assert_eq!(channel.recv().unwrap().text, "a");
        assert_eq!(channel.recv().unwrap().text, "b");

        let notice = channel.recv().unwrap();
        assert_eq!(notice.text, "Queue Full!");
        assert_eq!(notice.origin, "logger");
        // Severity and colour are inherited from the displaced message.
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.colour, "32");
    }

    #[test]
    fn test_full_drops_without_queueing() {
        let channel = BoundedChannel::new(2, "logger");

        assert_eq!(channel.try_send(envelope("a")), LogStatus::Ok);
        assert_eq!(channel.try_send(envelope("b")), LogStatus::AlmostFull);
        assert_eq!(channel.len(), 2);

        assert_eq!(channel.try_send(envelope("c")), LogStatus::Full);
        assert_eq!(channel.try_send(envelope("d")), LogStatus::Full);
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_recv_blocks_until_send() {
        let channel = Arc::new(BoundedChannel::new(4, "logger"));

        let receiver = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.recv().map(|e| e.text))
        };

        thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(channel.try_send(envelope("wake up")), LogStatus::Ok);

        assert_eq!(receiver.join().unwrap().as_deref(), Some("wake up"));
    }

    #[test]
    fn test_close_wakes_receiver_and_discards() {
        let channel = Arc::new(BoundedChannel::new(4, "logger"));
        assert_eq!(channel.try_send(envelope("doomed")), LogStatus::Ok);

        channel.close();
        assert!(channel.is_empty());
        assert!(channel.recv().is_none());
        assert_eq!(channel.try_send(envelope("late")), LogStatus::Full);
    }

    #[test]
    fn test_blocked_receiver_woken_by_close() {
        let channel = Arc::new(BoundedChannel::new(4, "logger"));

        let receiver = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.recv().is_none())
        };

        thread::sleep(std::time::Duration::from_millis(50));
        channel.close();
        assert!(receiver.join().unwrap());
    }

    #[test]
    fn test_capacity_invariant_under_concurrent_senders() {
        let channel = Arc::new(BoundedChannel::new(8, "logger"));
        let mut handles = vec![];

        for i in 0..8 {
            let channel = Arc::clone(&channel);
            handles.push(thread::spawn(move || {
                for j in 0..50 {
                    let _ = channel.try_send(envelope(&format!("T{}-{}", i, j)));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(channel.len() <= channel.capacity());
    }

    #[test]
    #[should_panic(expected = "at least 2")]
    fn test_capacity_below_two_rejected() {
        let _ = BoundedChannel::new(1, "logger");
    }
}
