// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where the Android services are
// unavailable.
//
// Every trait method returns `PlatformUnavailable` — the real implementation
// lives in the `android` module.

use screenwatch_core::error::{Result, ScreenwatchError};
use screenwatch_core::types::PackageInventory;

use crate::traits::*;

/// No-op bridge returned on non-Android platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl DisplayStatus for StubBridge {
    fn api_level(&self) -> Result<u32> {
        Err(ScreenwatchError::PlatformUnavailable)
    }

    fn presentation_display_count(&self) -> Result<usize> {
        Err(ScreenwatchError::PlatformUnavailable)
    }
}

impl SecureSurface for StubBridge {
    fn set_secure_flag(&self) -> Result<()> {
        tracing::warn!("SecureSurface::set_secure_flag called on stub bridge");
        Err(ScreenwatchError::PlatformUnavailable)
    }

    fn clear_secure_flag(&self) -> Result<()> {
        tracing::warn!("SecureSurface::clear_secure_flag called on stub bridge");
        Err(ScreenwatchError::PlatformUnavailable)
    }
}

impl PackageQuery for StubBridge {
    fn signing_certificates(&self) -> Result<Vec<Vec<u8>>> {
        Err(ScreenwatchError::PlatformUnavailable)
    }

    fn package_inventory(&self, _service_limit: u32) -> Result<PackageInventory> {
        Err(ScreenwatchError::PlatformUnavailable)
    }
}

impl SignalFeed for StubBridge {
    fn watch_displays(&self, _callback: DisplayCallback) -> Result<()> {
        tracing::warn!("SignalFeed::watch_displays called on stub bridge");
        Err(ScreenwatchError::PlatformUnavailable)
    }

    fn unwatch_displays(&self) -> Result<()> {
        Err(ScreenwatchError::PlatformUnavailable)
    }

    fn watch_video_store(&self, _callback: VideoCallback) -> Result<()> {
        tracing::warn!("SignalFeed::watch_video_store called on stub bridge");
        Err(ScreenwatchError::PlatformUnavailable)
    }

    fn unwatch_video_store(&self) -> Result<()> {
        Err(ScreenwatchError::PlatformUnavailable)
    }
}
