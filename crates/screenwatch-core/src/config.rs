// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Heuristic catalog — the detection tables used by the emulator and
// recording checks.
//
// Defaults reproduce the tables the detection logic has always shipped
// with. Every field carries a serde default so a partial JSON override
// replaces only the tables it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ScreenwatchError};

/// A package prefix that only counts as a match when the device's build
/// product string also starts with the given prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalVendorPrefix {
    pub package_prefix: String,
    pub product_prefix: String,
}

/// Detection tables for the emulator, BlueStacks, and recording checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicCatalog {
    /// BlueStacks shared-folder sentinel files.
    pub bluestacks_files: Vec<String>,
    /// Driver substrings that betray QEMU-backed virtual hardware.
    pub qemu_drivers: Vec<String>,
    /// Files probed for the QEMU driver substrings.
    pub driver_probe_files: Vec<String>,
    /// Bytes read from the head of each driver probe file.
    pub driver_probe_read_limit: usize,
    /// Genymotion socket sentinel files.
    pub geny_files: Vec<String>,
    /// QEMU pipe sentinel files.
    pub pipes: Vec<String>,
    /// x86 emulator build files, named relative to the filesystem root.
    pub x86_files: Vec<String>,
    /// Andy emulator sentinel files.
    pub andy_files: Vec<String>,
    /// Nox emulator sentinel files.
    pub nox_files: Vec<String>,
    /// Installed-package prefixes that identify emulator vendors.
    pub vendor_package_prefixes: Vec<String>,
    /// Exact installed-package names that identify emulator vendors.
    pub vendor_package_names: Vec<String>,
    /// Package prefixes that require a matching build product too.
    pub conditional_vendor_prefixes: Vec<ConditionalVendorPrefix>,
    /// Launcher/service class prefix identifying BlueStacks.
    pub bluestacks_package_prefix: String,
    /// Running services fetched per scan.
    pub service_scan_limit: u32,
    /// Content URI base of the external video store.
    pub video_store_uri: String,
}

impl Default for HeuristicCatalog {
    fn default() -> Self {
        Self {
            bluestacks_files: strings(&["/mnt/windows/BstSharedFolder"]),
            qemu_drivers: strings(&["goldfish"]),
            driver_probe_files: strings(&["/proc/tty/drivers", "/proc/cpuinfo"]),
            driver_probe_read_limit: 1024,
            geny_files: strings(&["/dev/socket/genyd", "/dev/socket/baseband_genyd"]),
            pipes: strings(&["/dev/socket/qemud", "/dev/qemu_pipe"]),
            x86_files: strings(&[
                "ueventd.android_x86.rc",
                "x86.prop",
                "ueventd.ttVM_x86.rc",
                "init.ttVM_x86.rc",
                "fstab.ttVM_x86",
                "fstab.vbox86",
                "init.vbox86.rc",
                "ueventd.vbox86.rc",
            ]),
            andy_files: strings(&["fstab.andy", "ueventd.andy.rc"]),
            nox_files: strings(&["fstab.nox", "init.nox.rc", "ueventd.nox.rc"]),
            vendor_package_prefixes: strings(&[
                "com.vphone.",
                "com.bignox.",
                "com.nox.mopen.app",
                "me.haima.",
                "com.bluestacks.",
                "com.kop.",
                "com.kaopu.",
                "com.microvirt.",
            ]),
            vendor_package_names: strings(&["com.google.android.launcher.layouts.genymotion"]),
            conditional_vendor_prefixes: vec![ConditionalVendorPrefix {
                package_prefix: "cn.itools.".into(),
                product_prefix: "iToolsAVM".into(),
            }],
            bluestacks_package_prefix: "com.bluestacks.".into(),
            service_scan_limit: 30,
            video_store_uri: "content://media/external/video/media".into(),
        }
    }
}

impl HeuristicCatalog {
    /// Parse a catalog from JSON. Absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validated()
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject override values the scan could not work with.
    fn validated(self) -> Result<Self> {
        if self.driver_probe_read_limit == 0 {
            return Err(ScreenwatchError::Config(
                "driver_probe_read_limit must be at least 1".into(),
            ));
        }
        if self.video_store_uri.is_empty() {
            return Err(ScreenwatchError::Config(
                "video_store_uri must not be empty".into(),
            ));
        }
        Ok(self)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
