// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The module facade: one struct holding the platform bridge, the heuristic
// catalog, and the subscription state, exposing every host operation.

use std::sync::{Arc, Mutex};

use tracing::instrument;

use screenwatch_bridge::traits::PlatformBridge;
use screenwatch_core::config::HeuristicCatalog;
use screenwatch_core::error::{Result, ScreenwatchError};
use screenwatch_core::types::{
    CertificateFingerprint, CertificateValue, EmulatorReport, MIN_DISPLAY_API, ScreenStatus,
};
use screenwatch_security::{EmulatorScanner, certificate_value, fingerprint_der};

use crate::events::EventSink;
use crate::watcher::StatusWatcher;

/// Status query shared by the direct operation and the display watcher.
///
/// Requires the display API level; any presentation-category display means
/// the screen is being mirrored.
pub(crate) fn query_status(bridge: &dyn PlatformBridge) -> Result<ScreenStatus> {
    let api = bridge.api_level()?;
    if api < MIN_DISPLAY_API {
        return Err(ScreenwatchError::UnsupportedApiLevel {
            required: MIN_DISPLAY_API,
            actual: api,
        });
    }
    let count = bridge.presentation_display_count()?;
    Ok(if count > 0 {
        ScreenStatus::Mirroring
    } else {
        ScreenStatus::Normal
    })
}

/// Host-facing facade over the platform bridge.
///
/// One instance serves the whole host process. Operations are grouped the
/// way the host sees them: screen status, the secure surface, signing
/// certificates, emulator heuristics, and the status subscription.
pub struct ScreenStatusModule {
    bridge: Arc<dyn PlatformBridge>,
    catalog: HeuristicCatalog,
    scanner: EmulatorScanner,
    watcher: Mutex<StatusWatcher>,
}

impl ScreenStatusModule {
    /// Build a module with the default heuristic catalog.
    pub fn new(bridge: Arc<dyn PlatformBridge>, sink: Arc<dyn EventSink>) -> Self {
        Self::with_catalog(bridge, sink, HeuristicCatalog::default())
    }

    /// Build a module with an explicit heuristic catalog.
    pub fn with_catalog(
        bridge: Arc<dyn PlatformBridge>,
        sink: Arc<dyn EventSink>,
        catalog: HeuristicCatalog,
    ) -> Self {
        let scanner = EmulatorScanner::new(catalog.clone());
        let watcher = Mutex::new(StatusWatcher::new(
            Arc::clone(&bridge),
            sink,
            catalog.video_store_uri.clone(),
        ));
        Self {
            bridge,
            catalog,
            scanner,
            watcher,
        }
    }

    /// Name of the platform implementation behind this module.
    pub fn platform_name(&self) -> &str {
        self.bridge.platform_name()
    }

    /// The heuristic catalog this module scans with.
    pub fn catalog(&self) -> &HeuristicCatalog {
        &self.catalog
    }

    // -- Screen status ------------------------------------------------------

    /// Current screen status: mirroring when a presentation-category
    /// display is attached, normal otherwise.
    pub fn current_status(&self) -> Result<ScreenStatus> {
        query_status(self.bridge.as_ref())
    }

    // -- Secure surface -----------------------------------------------------

    /// Mark the host window secure, blocking screenshots and capture.
    pub fn enable_secure_screen(&self) -> Result<()> {
        self.bridge.set_secure_flag()
    }

    /// Remove the secure mark from the host window.
    pub fn disable_secure_screen(&self) -> Result<()> {
        self.bridge.clear_secure_flag()
    }

    // -- Signing certificates -----------------------------------------------

    /// SHA1, MD5 and SHA256 fingerprints of the first signing certificate.
    #[instrument(skip_all)]
    pub fn certificate_fingerprint(&self) -> Result<CertificateFingerprint> {
        let signers = self.bridge.signing_certificates()?;
        let first = signers.first().ok_or(ScreenwatchError::NoSigners)?;
        Ok(fingerprint_der(first))
    }

    /// Compact numeric certificate value folded over all signers.
    #[instrument(skip_all)]
    pub fn certificate_value(&self) -> Result<CertificateValue> {
        let signers = self.bridge.signing_certificates()?;
        if signers.is_empty() {
            return Err(ScreenwatchError::NoSigners);
        }
        Ok(certificate_value(&signers))
    }

    // -- Emulator heuristics ------------------------------------------------

    /// True when the BlueStacks shared folder is present on disk.
    pub fn is_bluestacks(&self) -> bool {
        self.scanner.bluestacks_detected()
    }

    /// True when any emulator heuristic fires.
    pub fn is_emulator(&self) -> bool {
        self.emulator_report().is_emulator
    }

    /// Full emulator report naming the heuristics that fired.
    ///
    /// A failed package-inventory fetch degrades the scan to the
    /// filesystem heuristics instead of failing the whole report.
    pub fn emulator_report(&self) -> EmulatorReport {
        let inventory = match self
            .bridge
            .package_inventory(self.catalog.service_scan_limit)
        {
            Ok(inventory) => Some(inventory),
            Err(e) => {
                tracing::warn!(error = %e, "package inventory unavailable");
                None
            }
        };
        self.scanner.scan(inventory.as_ref())
    }

    // -- Subscription -------------------------------------------------------

    /// Start emitting `screenStatusChange` events for display and video
    /// store changes. Idempotent.
    pub fn subscribe(&self) -> Result<()> {
        self.watcher.lock().expect("watcher lock poisoned").start()
    }

    /// Stop emitting status events. Safe without a prior subscribe.
    pub fn unsubscribe(&self) {
        self.watcher.lock().expect("watcher lock poisoned").stop();
    }

    /// Whether a subscription is currently active.
    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .expect("watcher lock poisoned")
            .is_watching()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use screenwatch_bridge::traits::{
        DisplayCallback, DisplayStatus, PackageQuery, SecureSurface, SignalFeed, VideoCallback,
    };
    use screenwatch_core::types::{
        DisplayEvent, PackageInventory, StatusPayload, VideoStoreChange,
    };

    use crate::events::SCREEN_STATUS_CHANGE;

    use super::*;

    // Same tiny DER vector the fingerprint known-answer tests use.
    const TINY_DER: [u8; 5] = [0x30, 0x03, 0x02, 0x01, 0x01];
    const TINY_SHA1: &str = "90:D8:0B:02:14:71:5C:21:17:F1:DB:31:0C:C5:6F:1E:87:DC:47:75";
    const VIDEO_STORE: &str = "content://media/external/video/media";

    #[derive(Default)]
    struct FakeState {
        presentation_displays: usize,
        secure_flag: bool,
        display_watchers: usize,
        video_watchers: usize,
        display_callback: Option<DisplayCallback>,
        video_callback: Option<VideoCallback>,
        last_service_limit: Option<u32>,
    }

    /// In-memory platform standing in for the Android bridge.
    struct FakePlatform {
        api_level: u32,
        signers: Vec<Vec<u8>>,
        inventory: Option<PackageInventory>,
        fail_certificates: bool,
        fail_video_watch: bool,
        state: Mutex<FakeState>,
    }

    impl FakePlatform {
        fn new() -> Self {
            Self {
                api_level: 30,
                signers: vec![TINY_DER.to_vec()],
                inventory: Some(PackageInventory::default()),
                fail_certificates: false,
                fail_video_watch: false,
                state: Mutex::new(FakeState::default()),
            }
        }

        fn with_api_level(mut self, api_level: u32) -> Self {
            self.api_level = api_level;
            self
        }

        fn with_signers(mut self, signers: Vec<Vec<u8>>) -> Self {
            self.signers = signers;
            self
        }

        fn with_inventory(mut self, inventory: Option<PackageInventory>) -> Self {
            self.inventory = inventory;
            self
        }

        fn failing_certificates(mut self) -> Self {
            self.fail_certificates = true;
            self
        }

        fn failing_video_watch(mut self) -> Self {
            self.fail_video_watch = true;
            self
        }

        fn set_presentation_displays(&self, count: usize) {
            self.state.lock().unwrap().presentation_displays = count;
        }

        fn secure_flag(&self) -> bool {
            self.state.lock().unwrap().secure_flag
        }

        fn display_watchers(&self) -> usize {
            self.state.lock().unwrap().display_watchers
        }

        fn video_watchers(&self) -> usize {
            self.state.lock().unwrap().video_watchers
        }

        fn last_service_limit(&self) -> Option<u32> {
            self.state.lock().unwrap().last_service_limit
        }

        /// Simulate the platform notifying a display change. The callback
        /// is invoked outside the state lock, as the real feed does.
        fn fire_display_event(&self, event: DisplayEvent) {
            let callback = self.state.lock().unwrap().display_callback.clone();
            if let Some(cb) = callback {
                cb(event);
            }
        }

        fn fire_video_change(&self, uri: &str) {
            let callback = self.state.lock().unwrap().video_callback.clone();
            if let Some(cb) = callback {
                cb(VideoStoreChange {
                    uri: uri.to_string(),
                });
            }
        }
    }

    impl PlatformBridge for FakePlatform {
        fn platform_name(&self) -> &str {
            "Fake"
        }
    }

    impl DisplayStatus for FakePlatform {
        fn api_level(&self) -> Result<u32> {
            Ok(self.api_level)
        }

        fn presentation_display_count(&self) -> Result<usize> {
            Ok(self.state.lock().unwrap().presentation_displays)
        }
    }

    impl SecureSurface for FakePlatform {
        fn set_secure_flag(&self) -> Result<()> {
            self.state.lock().unwrap().secure_flag = true;
            Ok(())
        }

        fn clear_secure_flag(&self) -> Result<()> {
            self.state.lock().unwrap().secure_flag = false;
            Ok(())
        }
    }

    impl PackageQuery for FakePlatform {
        fn signing_certificates(&self) -> Result<Vec<Vec<u8>>> {
            if self.fail_certificates {
                return Err(ScreenwatchError::Certificate(
                    "package manager rejected the lookup".into(),
                ));
            }
            Ok(self.signers.clone())
        }

        fn package_inventory(&self, service_limit: u32) -> Result<PackageInventory> {
            self.state.lock().unwrap().last_service_limit = Some(service_limit);
            self.inventory
                .clone()
                .ok_or_else(|| ScreenwatchError::Bridge("inventory unavailable".into()))
        }
    }

    impl SignalFeed for FakePlatform {
        fn watch_displays(&self, callback: DisplayCallback) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.display_callback = Some(callback);
            state.display_watchers += 1;
            Ok(())
        }

        fn unwatch_displays(&self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.display_callback = None;
            state.display_watchers = state.display_watchers.saturating_sub(1);
            Ok(())
        }

        fn watch_video_store(&self, callback: VideoCallback) -> Result<()> {
            if self.fail_video_watch {
                return Err(ScreenwatchError::Subscription(
                    "video observer rejected".into(),
                ));
            }
            let mut state = self.state.lock().unwrap();
            state.video_callback = Some(callback);
            state.video_watchers += 1;
            Ok(())
        }

        fn unwatch_video_store(&self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.video_callback = None;
            state.video_watchers = state.video_watchers.saturating_sub(1);
            Ok(())
        }
    }

    /// Sink that records every emitted event.
    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<(String, StatusPayload)>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<(String, StatusPayload)> {
            self.events.lock().unwrap().clone()
        }

        fn statuses(&self) -> Vec<ScreenStatus> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|(_, payload)| payload.screen_status)
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: &str, payload: StatusPayload) {
            self.events
                .lock()
                .unwrap()
                .push((event.to_string(), payload));
        }
    }

    fn module_over(
        platform: FakePlatform,
    ) -> (Arc<FakePlatform>, Arc<RecordingSink>, ScreenStatusModule) {
        let platform = Arc::new(platform);
        let sink = Arc::new(RecordingSink::default());
        let module = ScreenStatusModule::new(
            Arc::clone(&platform) as Arc<dyn PlatformBridge>,
            Arc::clone(&sink) as Arc<dyn EventSink>,
        );
        (platform, sink, module)
    }

    fn inventory(launchers: &[&str], installed: &[&str], services: &[&str]) -> PackageInventory {
        PackageInventory {
            launcher_packages: launchers.iter().map(|s| s.to_string()).collect(),
            installed_packages: installed.iter().map(|s| s.to_string()).collect(),
            running_services: services.iter().map(|s| s.to_string()).collect(),
            build_product: "sdk_gphone64".to_string(),
        }
    }

    // -- Screen status ------------------------------------------------------

    #[test]
    fn status_is_normal_without_presentation_displays() {
        let (_, _, module) = module_over(FakePlatform::new());
        assert_eq!(module.current_status().unwrap(), ScreenStatus::Normal);
    }

    #[test]
    fn status_is_mirroring_with_a_presentation_display() {
        let (platform, _, module) = module_over(FakePlatform::new());
        platform.set_presentation_displays(1);
        assert_eq!(module.current_status().unwrap(), ScreenStatus::Mirroring);
    }

    #[test]
    fn status_requires_the_display_api() {
        let (_, _, module) = module_over(FakePlatform::new().with_api_level(16));

        let err = module.current_status().unwrap_err();
        assert!(matches!(
            err,
            ScreenwatchError::UnsupportedApiLevel {
                required: 17,
                actual: 16
            }
        ));
        assert!(err.to_string().contains("api level 17 and above"));
    }

    // -- Secure surface -----------------------------------------------------

    #[test]
    fn secure_screen_flips_the_window_flag() {
        let (platform, _, module) = module_over(FakePlatform::new());

        module.enable_secure_screen().unwrap();
        assert!(platform.secure_flag());

        module.disable_secure_screen().unwrap();
        assert!(!platform.secure_flag());
    }

    // -- Signing certificates -----------------------------------------------

    #[test]
    fn fingerprint_digests_the_first_signer() {
        let platform = FakePlatform::new()
            .with_signers(vec![TINY_DER.to_vec(), b"second signer".to_vec()]);
        let (_, _, module) = module_over(platform);

        let fingerprint = module.certificate_fingerprint().unwrap();
        assert_eq!(fingerprint.sha1, TINY_SHA1);
    }

    #[test]
    fn certificate_value_folds_all_signers() {
        let platform = FakePlatform::new().with_signers(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let (_, _, module) = module_over(platform);

        // 30817 * 33796, the product of the per-signer array hashes.
        let value = module.certificate_value().unwrap();
        assert_eq!(value.certificate_hash, 1_041_491_332);
    }

    #[test]
    fn certificate_ops_require_a_signer() {
        let (_, _, module) = module_over(FakePlatform::new().with_signers(Vec::new()));

        assert!(matches!(
            module.certificate_fingerprint().unwrap_err(),
            ScreenwatchError::NoSigners
        ));
        assert!(matches!(
            module.certificate_value().unwrap_err(),
            ScreenwatchError::NoSigners
        ));
    }

    #[test]
    fn certificate_failures_stay_typed() {
        let (_, _, module) = module_over(FakePlatform::new().failing_certificates());
        assert!(matches!(
            module.certificate_fingerprint().unwrap_err(),
            ScreenwatchError::Certificate(_)
        ));
    }

    // -- Emulator heuristics ------------------------------------------------

    #[test]
    fn emulator_report_is_clean_on_a_plain_device() {
        let (_, _, module) = module_over(FakePlatform::new());

        let report = module.emulator_report();
        assert!(!report.is_emulator);
        assert!(report.methods.is_empty());
        assert!(!module.is_emulator());
    }

    #[test]
    fn emulator_report_flags_vendor_packages() {
        let platform = FakePlatform::new().with_inventory(Some(inventory(
            &[],
            &["com.bluestacks.appmart"],
            &[],
        )));
        let (_, _, module) = module_over(platform);

        let report = module.emulator_report();
        assert!(report.is_emulator);
        assert!(report.methods.iter().any(|m| m == "vendor_packages"));
    }

    #[test]
    fn emulator_report_flags_launchers_and_services() {
        let platform = FakePlatform::new().with_inventory(Some(inventory(
            &["com.bluestacks.launcher"],
            &[],
            &["com.bluestacks.BstCommandProcessor"],
        )));
        let (_, _, module) = module_over(platform);

        let report = module.emulator_report();
        assert!(report.methods.iter().any(|m| m == "launcher_packages"));
        assert!(report.methods.iter().any(|m| m == "running_services"));
    }

    #[test]
    fn emulator_scan_degrades_without_inventory() {
        let (_, _, module) = module_over(FakePlatform::new().with_inventory(None));

        // Filesystem heuristics still run; the inventory methods cannot fire.
        let report = module.emulator_report();
        for method in ["launcher_packages", "vendor_packages", "running_services"] {
            assert!(!report.methods.iter().any(|m| m == method));
        }
    }

    #[test]
    fn service_scan_limit_reaches_the_platform() {
        let (platform, _, module) = module_over(FakePlatform::new());

        module.emulator_report();
        assert_eq!(platform.last_service_limit(), Some(30));
    }

    #[test]
    fn catalog_override_changes_the_scan_limit() {
        let platform = Arc::new(FakePlatform::new());
        let sink = Arc::new(RecordingSink::default());
        let catalog = HeuristicCatalog::from_json(r#"{"service_scan_limit": 5}"#).unwrap();
        let module = ScreenStatusModule::with_catalog(
            Arc::clone(&platform) as Arc<dyn PlatformBridge>,
            sink,
            catalog,
        );

        module.emulator_report();
        assert_eq!(platform.last_service_limit(), Some(5));
    }

    #[test]
    fn desktop_stub_reports_platform_unavailable() {
        let bridge: Arc<dyn PlatformBridge> = Arc::from(screenwatch_bridge::platform_bridge());
        let module = ScreenStatusModule::new(bridge, Arc::new(RecordingSink::default()));

        assert_eq!(module.platform_name(), "Desktop (stub)");
        assert!(matches!(
            module.current_status().unwrap_err(),
            ScreenwatchError::PlatformUnavailable
        ));
    }

    // -- Subscription -------------------------------------------------------

    #[test]
    fn subscribe_registers_both_feeds() {
        let (platform, _, module) = module_over(FakePlatform::new());

        module.subscribe().unwrap();
        assert!(module.is_watching());
        assert_eq!(platform.display_watchers(), 1);
        assert_eq!(platform.video_watchers(), 1);
    }

    #[test]
    fn subscribe_twice_keeps_one_registration() {
        let (platform, _, module) = module_over(FakePlatform::new());

        module.subscribe().unwrap();
        module.subscribe().unwrap();
        assert_eq!(platform.display_watchers(), 1);
        assert_eq!(platform.video_watchers(), 1);
    }

    #[test]
    fn unsubscribe_removes_the_feeds() {
        let (platform, _, module) = module_over(FakePlatform::new());

        module.subscribe().unwrap();
        module.unsubscribe();
        assert!(!module.is_watching());
        assert_eq!(platform.display_watchers(), 0);
        assert_eq!(platform.video_watchers(), 0);
    }

    #[test]
    fn unsubscribe_without_subscribe_is_harmless() {
        let (platform, _, module) = module_over(FakePlatform::new());

        module.unsubscribe();
        module.unsubscribe();
        assert_eq!(platform.display_watchers(), 0);
        assert_eq!(platform.video_watchers(), 0);
    }

    #[test]
    fn display_changes_reemit_the_current_status() {
        let (platform, sink, module) = module_over(FakePlatform::new());
        module.subscribe().unwrap();

        platform.set_presentation_displays(1);
        platform.fire_display_event(DisplayEvent::Added(42));

        platform.set_presentation_displays(0);
        platform.fire_display_event(DisplayEvent::Removed(42));

        assert_eq!(
            sink.statuses(),
            [ScreenStatus::Mirroring, ScreenStatus::Normal]
        );
        assert!(sink.events().iter().all(|(name, _)| name == SCREEN_STATUS_CHANGE));
    }

    #[test]
    fn video_item_changes_emit_recording_detected() {
        let (platform, sink, module) = module_over(FakePlatform::new());
        module.subscribe().unwrap();

        platform.fire_video_change(&format!("{VIDEO_STORE}/1207"));
        assert_eq!(sink.statuses(), [ScreenStatus::VideoRecording]);
    }

    #[test]
    fn bulk_video_changes_are_ignored() {
        let (platform, sink, module) = module_over(FakePlatform::new());
        module.subscribe().unwrap();

        platform.fire_video_change(VIDEO_STORE);
        platform.fire_video_change(&format!("{VIDEO_STORE}/"));
        platform.fire_video_change(&format!("{VIDEO_STORE}/thumbnails/3"));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn subscribe_below_the_display_api_is_a_noop() {
        let (platform, _, module) = module_over(FakePlatform::new().with_api_level(16));

        module.subscribe().unwrap();
        assert!(!module.is_watching());
        assert_eq!(platform.display_watchers(), 0);
        assert_eq!(platform.video_watchers(), 0);
    }

    #[test]
    fn failed_video_watch_rolls_back_the_display_watch() {
        let (platform, _, module) = module_over(FakePlatform::new().failing_video_watch());

        assert!(matches!(
            module.subscribe().unwrap_err(),
            ScreenwatchError::Subscription(_)
        ));
        assert!(!module.is_watching());
        assert_eq!(platform.display_watchers(), 0);
        assert_eq!(platform.video_watchers(), 0);
    }
}
