// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event surface: the `screenStatusChange` stream name and the sink
// abstraction the watcher emits through.

use std::sync::mpsc::Sender;

use screenwatch_core::types::StatusPayload;

/// Name of the event stream subscribers receive status changes on.
pub const SCREEN_STATUS_CHANGE: &str = "screenStatusChange";

/// Destination for emitted status events.
///
/// The Android export layer wraps the host's event emitter in a sink;
/// desktop hosts can use [`ChannelSink`] or provide their own.
pub trait EventSink: Send + Sync {
    /// Deliver one event on the named stream.
    ///
    /// Sinks must not panic. A sink that cannot deliver should log and
    /// drop the event; emission runs on platform notification threads.
    fn emit(&self, event: &str, payload: StatusPayload);
}

/// Sink that forwards payloads into an `mpsc` channel.
pub struct ChannelSink {
    tx: Sender<StatusPayload>,
}

impl ChannelSink {
    pub fn new(tx: Sender<StatusPayload>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &str, payload: StatusPayload) {
        if self.tx.send(payload).is_err() {
            tracing::warn!(event, "status event dropped, channel receiver gone");
        }
    }
}
