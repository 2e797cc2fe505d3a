// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Screenwatch.

use thiserror::Error;

/// Top-level error type for all Screenwatch operations.
#[derive(Debug, Error)]
pub enum ScreenwatchError {
    // -- Display / screen-status errors --
    #[error("this feature supports android api level {required} and above (device is {actual})")]
    UnsupportedApiLevel { required: u32, actual: u32 },

    // -- Certificate errors --
    #[error("signing certificate lookup failed: {0}")]
    Certificate(String),

    #[error("package has no signing certificates")]
    NoSigners,

    // -- Subscription errors --
    #[error("subscription error: {0}")]
    Subscription(String),

    // -- Configuration --
    #[error("heuristic catalog error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScreenwatchError>;
