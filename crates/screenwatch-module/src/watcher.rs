// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subscription engine behind subscribe/unsubscribe.
//
// While watching, every display notification re-queries the presentation
// display count and emits the resulting status; a video-store notification
// whose URI denotes a single new item emits VIDEO_RECORDING_DETECTED.

use std::sync::Arc;

use screenwatch_bridge::traits::PlatformBridge;
use screenwatch_core::error::Result;
use screenwatch_core::types::{
    DisplayEvent, MIN_DISPLAY_API, ScreenStatus, StatusPayload, VideoStoreChange,
};

use crate::events::{EventSink, SCREEN_STATUS_CHANGE};
use crate::module::query_status;

/// What reached the dispatcher from the platform feeds.
enum Signal {
    Display(DisplayEvent),
    Video(VideoStoreChange),
}

/// Shared state invoked from the platform notification threads.
struct Dispatcher {
    bridge: Arc<dyn PlatformBridge>,
    sink: Arc<dyn EventSink>,
    video_store_uri: String,
}

impl Dispatcher {
    fn handle(&self, signal: Signal) {
        match signal {
            Signal::Display(event) => {
                tracing::debug!(display_id = event.display_id(), "display change");
                let status = match query_status(self.bridge.as_ref()) {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::warn!(error = %e, "status query failed during display change");
                        return;
                    }
                };
                self.sink.emit(SCREEN_STATUS_CHANGE, StatusPayload::new(status));
            }
            Signal::Video(change) => {
                if is_video_item_uri(&self.video_store_uri, &change.uri) {
                    tracing::info!(uri = %change.uri, "video store item observed");
                    self.sink.emit(
                        SCREEN_STATUS_CHANGE,
                        StatusPayload::new(ScreenStatus::VideoRecording),
                    );
                } else {
                    tracing::debug!(uri = %change.uri, "video store change ignored");
                }
            }
        }
    }
}

/// Owns the platform watch registrations for one subscriber surface.
pub struct StatusWatcher {
    bridge: Arc<dyn PlatformBridge>,
    sink: Arc<dyn EventSink>,
    video_store_uri: String,
    watching: bool,
}

impl StatusWatcher {
    pub fn new(
        bridge: Arc<dyn PlatformBridge>,
        sink: Arc<dyn EventSink>,
        video_store_uri: String,
    ) -> Self {
        Self {
            bridge,
            sink,
            video_store_uri,
            watching: false,
        }
    }

    /// Whether the platform feeds are currently registered.
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Register both platform feeds.
    ///
    /// Idempotent: a second call while watching is a no-op. Below the
    /// minimum display API level the call is also a silent no-op, which is
    /// the subscriber contract on legacy devices.
    pub fn start(&mut self) -> Result<()> {
        if self.watching {
            tracing::debug!("subscribe ignored, already watching");
            return Ok(());
        }

        let api = self.bridge.api_level()?;
        if api < MIN_DISPLAY_API {
            tracing::debug!(api, "subscribe ignored below display API level");
            return Ok(());
        }

        let dispatcher = Arc::new(Dispatcher {
            bridge: Arc::clone(&self.bridge),
            sink: Arc::clone(&self.sink),
            video_store_uri: self.video_store_uri.clone(),
        });

        let for_displays = Arc::clone(&dispatcher);
        self.bridge
            .watch_displays(Arc::new(move |event| {
                for_displays.handle(Signal::Display(event))
            }))?;

        let for_video = Arc::clone(&dispatcher);
        if let Err(e) = self.bridge.watch_video_store(Arc::new(move |change| {
            for_video.handle(Signal::Video(change))
        })) {
            // Keep registrations balanced when the second feed fails.
            if let Err(undo) = self.bridge.unwatch_displays() {
                tracing::warn!(error = %undo, "display watch rollback failed");
            }
            return Err(e);
        }

        self.watching = true;
        tracing::info!("status watch started");
        Ok(())
    }

    /// Deregister both feeds. Safe to call when not watching.
    pub fn stop(&mut self) {
        if !self.watching {
            tracing::debug!("unsubscribe ignored, not watching");
            return;
        }
        if let Err(e) = self.bridge.unwatch_displays() {
            tracing::warn!(error = %e, "display watch deregistration failed");
        }
        if let Err(e) = self.bridge.unwatch_video_store() {
            tracing::warn!(error = %e, "video watch deregistration failed");
        }
        self.watching = false;
        tracing::info!("status watch stopped");
    }
}

/// True when `uri` names a single item under the video store `base`:
/// `base` followed by a slash and digits, nothing else.
///
/// Bulk-change notifications arrive as the bare store URI and are not
/// recordings.
fn is_video_item_uri(base: &str, uri: &str) -> bool {
    let Some(rest) = uri.strip_prefix(base) else {
        return false;
    };
    let Some(id) = rest.strip_prefix('/') else {
        return false;
    };
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}
