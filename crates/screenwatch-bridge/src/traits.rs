// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// Each trait covers one platform concern the signal bridge needs: display
// topology, the secure-surface window flag, package metadata, and the two
// OS notification feeds. The watcher and module layers only ever see these
// traits, never JNI.

use std::sync::Arc;

use screenwatch_core::error::Result;
use screenwatch_core::types::{DisplayEvent, PackageInventory, VideoStoreChange};

/// Callback invoked for each display-topology notification.
pub type DisplayCallback = Arc<dyn Fn(DisplayEvent) + Send + Sync>;

/// Callback invoked for each video-store content notification.
pub type VideoCallback = Arc<dyn Fn(VideoStoreChange) + Send + Sync>;

/// Unified bridge that groups all native capabilities.
///
/// Bridges are shared between the host thread and the OS notification
/// threads, hence the `Send + Sync` bound. Platforms without the Android
/// display/package services return `ScreenwatchError::PlatformUnavailable`
/// from the stub implementation.
pub trait PlatformBridge:
    DisplayStatus + SecureSurface + PackageQuery + SignalFeed + Send + Sync
{
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;
}

/// Query the display topology.
pub trait DisplayStatus {
    /// OS API level of the running device.
    fn api_level(&self) -> Result<u32>;

    /// Number of attached displays in the presentation category.
    ///
    /// A non-zero count means the screen is being mirrored or cast.
    fn presentation_display_count(&self) -> Result<usize>;
}

/// Toggle the window's secure-surface flag.
///
/// With the flag set the OS blanks this window in screenshots, the
/// recents switcher, and any capture or mirroring stream.
pub trait SecureSurface {
    /// Set `FLAG_SECURE` on the host window.
    fn set_secure_flag(&self) -> Result<()>;

    /// Clear `FLAG_SECURE` from the host window.
    fn clear_secure_flag(&self) -> Result<()>;
}

/// Read signing certificates and the package inventory of the host app.
pub trait PackageQuery {
    /// DER bytes of each signer of the host package, newest scheme first.
    fn signing_certificates(&self) -> Result<Vec<Vec<u8>>>;

    /// Snapshot of launcher/installed package names, running service class
    /// names (at most `service_limit`), and the build product string.
    fn package_inventory(&self, service_limit: u32) -> Result<PackageInventory>;
}

/// Register for display and video-store notifications.
///
/// A bridge carries at most one callback of each kind; the watcher layer
/// guarantees it never registers twice without an unwatch in between.
pub trait SignalFeed {
    /// Start forwarding display-topology events to `callback`.
    fn watch_displays(&self, callback: DisplayCallback) -> Result<()>;

    /// Stop forwarding display-topology events.
    fn unwatch_displays(&self) -> Result<()>;

    /// Start forwarding video-store content changes to `callback`.
    fn watch_video_store(&self, callback: VideoCallback) -> Result<()>;

    /// Stop forwarding video-store content changes.
    fn unwatch_video_store(&self) -> Result<()>;
}
