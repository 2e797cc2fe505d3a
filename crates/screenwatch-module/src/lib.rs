// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// screenwatch-module — Host-facing surface of the signal bridge.
//
// Ties the platform bridge, the device-integrity heuristics, and the
// `screenStatusChange` stream together behind `ScreenStatusModule`, and
// exports the JNI entry points the Android glue calls. Desktop hosts use
// the library API directly.

pub mod events;
pub mod module;
pub mod watcher;

#[cfg(target_os = "android")]
pub mod ffi;

// PUBLIC API: Re-export the facade and the event surface
pub use events::{ChannelSink, EventSink, SCREEN_STATUS_CHANGE};
pub use module::ScreenStatusModule;
pub use watcher::StatusWatcher;
