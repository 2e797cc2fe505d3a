// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Screenwatch signal bridge.

use serde::{Deserialize, Serialize};

/// Lowest Android API level with `DisplayManager` presentation-category
/// queries (17, Jelly Bean MR1). Status operations reject below this.
pub const MIN_DISPLAY_API: u32 = 17;

/// First API level where the signing-certificate history is available
/// through `GET_SIGNING_CERTIFICATES` (28, Pie).
pub const SIGNING_CERTIFICATES_API: u32 = 28;

/// Observable screen state reported to the host.
///
/// Serialized under the exact wire names the host event bus expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenStatus {
    /// No mirroring target attached, no recording observed.
    #[serde(rename = "SCREEN_NORMAL")]
    Normal,
    /// At least one presentation-category display is attached.
    #[serde(rename = "SCREEN_MIRRORING")]
    Mirroring,
    /// A new entry appeared in the external video store.
    #[serde(rename = "VIDEO_RECORDING_DETECTED")]
    VideoRecording,
}

impl ScreenStatus {
    /// Wire name as delivered in event payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "SCREEN_NORMAL",
            Self::Mirroring => "SCREEN_MIRRORING",
            Self::VideoRecording => "VIDEO_RECORDING_DETECTED",
        }
    }
}

impl std::fmt::Display for ScreenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by every `screenStatusChange` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(rename = "screenStatus")]
    pub screen_status: ScreenStatus,
}

impl StatusPayload {
    pub fn new(screen_status: ScreenStatus) -> Self {
        Self { screen_status }
    }
}

/// The three digests of the APK's signing certificate, each formatted as
/// colon-delimited uppercase hex of the DER encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateFingerprint {
    pub sha1: String,
    pub md5: String,
    pub sha256: String,
}

/// Compact integer identity of the signer set.
///
/// The value is the wrapping product of each signer's JVM array hash code,
/// starting at 1, so it matches what a Java caller computes from
/// `Signature.hashCode()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateValue {
    #[serde(rename = "certificateHash")]
    pub certificate_hash: i32,
}

/// Outcome of an emulator scan, with the names of the heuristics that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorReport {
    #[serde(rename = "isEmulator")]
    pub is_emulator: bool,
    /// Heuristic names that matched, in scan order. Empty when clean.
    pub methods: Vec<String>,
}

impl EmulatorReport {
    /// A report with no matches.
    pub fn clean() -> Self {
        Self {
            is_emulator: false,
            methods: Vec::new(),
        }
    }
}

/// Package-manager snapshot handed to the heuristic engine.
///
/// Built fresh per scan; nothing here outlives the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInventory {
    /// Package names of launcher-category activities.
    pub launcher_packages: Vec<String>,
    /// All installed package names.
    pub installed_packages: Vec<String>,
    /// Class names of currently running services.
    pub running_services: Vec<String>,
    /// The `Build.PRODUCT` string.
    pub build_product: String,
}

/// One display-topology notification from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayEvent {
    Added(i32),
    Changed(i32),
    Removed(i32),
}

impl DisplayEvent {
    /// The display id the event refers to.
    pub fn display_id(&self) -> i32 {
        match self {
            Self::Added(id) | Self::Changed(id) | Self::Removed(id) => *id,
        }
    }
}

/// One content-provider notification from the video store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStoreChange {
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_status_wire_names() {
        assert_eq!(ScreenStatus::Normal.as_str(), "SCREEN_NORMAL");
        assert_eq!(ScreenStatus::Mirroring.as_str(), "SCREEN_MIRRORING");
        assert_eq!(
            ScreenStatus::VideoRecording.as_str(),
            "VIDEO_RECORDING_DETECTED"
        );
    }

    #[test]
    fn status_payload_serializes_to_host_shape() {
        let payload = StatusPayload::new(ScreenStatus::Mirroring);
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"screenStatus":"SCREEN_MIRRORING"}"#);
    }

    #[test]
    fn status_payload_round_trips() {
        let parsed: StatusPayload =
            serde_json::from_str(r#"{"screenStatus":"VIDEO_RECORDING_DETECTED"}"#).unwrap();
        assert_eq!(parsed.screen_status, ScreenStatus::VideoRecording);
    }

    #[test]
    fn certificate_value_uses_host_field_name() {
        let value = CertificateValue {
            certificate_hash: -97,
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"certificateHash":-97}"#);
    }

    #[test]
    fn display_event_exposes_id() {
        assert_eq!(DisplayEvent::Added(3).display_id(), 3);
        assert_eq!(DisplayEvent::Removed(0).display_id(), 0);
    }
}
