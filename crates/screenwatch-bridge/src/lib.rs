// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screenwatch — Native platform bridge abstractions.
//
// This module defines the capability traits and platform dispatch logic
// for the signal bridge. It allows the watcher and module layers to query
// Android (ART/JNI) display, window, and package services through a
// unified interface.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

/// Retrieves the bridge implementation for the target operating system.
///
/// RETURNS: A boxed trait object (`dyn PlatformBridge`) that abstracts away
/// the underlying native SDK details.
pub fn platform_bridge() -> Box<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: Uses `jni-rs` to invoke methods on the JVM/ART.
        Box::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: Uses a mock implementation to allow non-native builds.
        Box::new(stub::StubBridge)
    }
}
