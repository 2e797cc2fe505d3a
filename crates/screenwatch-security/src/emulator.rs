// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Emulator and virtualization heuristics.
//
// Every check is driven by the `HeuristicCatalog` tables: sentinel files
// for the known emulator families, driver-listing substrings for QEMU
// hardware, and package/service name patterns for vendor apps. The scan
// reports *which* heuristics fired, not just a boolean, so callers can log
// or forward the evidence.

use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, instrument, warn};

use screenwatch_core::config::HeuristicCatalog;
use screenwatch_core::types::{EmulatorReport, PackageInventory};

/// Filesystem access for the sentinel and driver probes.
///
/// Production uses the real root; tests point `root` at a temp directory so
/// the catalog's absolute paths resolve inside the fixture.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    root: PathBuf,
}

impl SystemProbe {
    /// Probe against the real filesystem root.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }

    /// Probe against an alternate root directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a catalog path under this probe's root.
    ///
    /// Absolute catalog entries are re-rooted; bare names (the x86 build
    /// files) already resolve relative to the root.
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    /// Read at most `limit` bytes from the head of a file.
    ///
    /// Returns `None` when the file is missing or unreadable; the heuristics
    /// treat that the same as "marker not present".
    fn read_head(&self, path: &str, limit: usize) -> Option<Vec<u8>> {
        let mut file = std::fs::File::open(self.resolve(path)).ok()?;
        let mut buf = vec![0u8; limit];
        let n = file.read(&mut buf).ok()?;
        buf.truncate(n);
        Some(buf)
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog-driven emulator scanner.
pub struct EmulatorScanner {
    catalog: HeuristicCatalog,
    probe: SystemProbe,
}

impl EmulatorScanner {
    /// Scanner over the real filesystem.
    pub fn new(catalog: HeuristicCatalog) -> Self {
        Self::with_probe(catalog, SystemProbe::new())
    }

    /// Scanner with an explicit probe (tests use a temp-dir root).
    pub fn with_probe(catalog: HeuristicCatalog, probe: SystemProbe) -> Self {
        Self { catalog, probe }
    }

    /// Run every heuristic and report which ones fired.
    ///
    /// Pass `None` when the package inventory could not be fetched; the scan
    /// then covers the filesystem heuristics only and logs the degradation.
    #[instrument(skip_all, fields(has_inventory = inventory.is_some()))]
    pub fn scan(&self, inventory: Option<&PackageInventory>) -> EmulatorReport {
        let mut methods: Vec<String> = Vec::new();

        for (name, files) in [
            ("geny_files", &self.catalog.geny_files),
            ("andy_files", &self.catalog.andy_files),
            ("nox_files", &self.catalog.nox_files),
        ] {
            if self.any_exists(files) {
                methods.push(name.into());
            }
        }

        if self.qemu_driver_present() {
            methods.push("qemu_drivers".into());
        }
        if self.any_exists(&self.catalog.pipes) {
            methods.push("pipes".into());
        }
        if self.any_exists(&self.catalog.x86_files) {
            methods.push("x86_files".into());
        }

        match inventory {
            Some(inv) => self.scan_inventory(inv, &mut methods),
            None => warn!("package inventory unavailable, file heuristics only"),
        }

        let is_emulator = !methods.is_empty();
        debug!(is_emulator, ?methods, "emulator scan complete");
        EmulatorReport {
            is_emulator,
            methods,
        }
    }

    /// BlueStacks shared-folder check, exposed as its own operation.
    pub fn bluestacks_detected(&self) -> bool {
        self.any_exists(&self.catalog.bluestacks_files)
    }

    // -- internal helpers ---------------------------------------------------

    fn any_exists(&self, files: &[String]) -> bool {
        files.iter().any(|f| self.probe.exists(f))
    }

    /// Look for a known QEMU driver substring in the head of the driver
    /// listing files. Only the first `driver_probe_read_limit` bytes count,
    /// matching how the listing has always been sampled.
    fn qemu_driver_present(&self) -> bool {
        let limit = self.catalog.driver_probe_read_limit;
        for probe_file in &self.catalog.driver_probe_files {
            let Some(head) = self.probe.read_head(probe_file, limit) else {
                continue;
            };
            let text = String::from_utf8_lossy(&head);
            if self
                .catalog
                .qemu_drivers
                .iter()
                .any(|d| text.contains(d.as_str()))
            {
                debug!(file = %probe_file, "qemu driver marker found");
                return true;
            }
        }
        false
    }

    fn scan_inventory(&self, inv: &PackageInventory, methods: &mut Vec<String>) {
        let bluestacks = self.catalog.bluestacks_package_prefix.as_str();

        if inv
            .launcher_packages
            .iter()
            .any(|p| p.starts_with(bluestacks))
        {
            methods.push("launcher_packages".into());
        }

        if inv
            .installed_packages
            .iter()
            .any(|p| self.vendor_package_matches(p, &inv.build_product))
        {
            methods.push("vendor_packages".into());
        }

        if inv
            .running_services
            .iter()
            .any(|s| s.starts_with(bluestacks))
        {
            methods.push("running_services".into());
        }
    }

    fn vendor_package_matches(&self, package: &str, build_product: &str) -> bool {
        if self
            .catalog
            .vendor_package_prefixes
            .iter()
            .any(|prefix| package.starts_with(prefix.as_str()))
        {
            return true;
        }
        if self.catalog.vendor_package_names.iter().any(|n| n == package) {
            return true;
        }
        self.catalog.conditional_vendor_prefixes.iter().any(|c| {
            package.starts_with(c.package_prefix.as_str())
                && build_product.starts_with(c.product_prefix.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn scanner_at(root: &Path) -> EmulatorScanner {
        EmulatorScanner::with_probe(HeuristicCatalog::default(), SystemProbe::with_root(root))
    }

    fn touch(root: &Path, path: &str) {
        let full = root.join(path.trim_start_matches('/'));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, b"").unwrap();
    }

    #[test]
    fn clean_root_and_inventory_scan_clean() {
        let dir = TempDir::new().unwrap();
        let report = scanner_at(dir.path()).scan(Some(&PackageInventory::default()));
        assert_eq!(report, EmulatorReport::clean());
    }

    #[test]
    fn geny_socket_fires_geny_method() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "/dev/socket/genyd");
        let report = scanner_at(dir.path()).scan(None);
        assert!(report.is_emulator);
        assert_eq!(report.methods, ["geny_files"]);
    }

    #[test]
    fn nox_and_pipe_sentinels_both_reported() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "fstab.nox");
        touch(dir.path(), "/dev/qemu_pipe");
        let report = scanner_at(dir.path()).scan(None);
        assert_eq!(report.methods, ["nox_files", "pipes"]);
    }

    #[test]
    fn x86_build_file_resolves_relative_to_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x86.prop");
        let report = scanner_at(dir.path()).scan(None);
        assert_eq!(report.methods, ["x86_files"]);
    }

    #[test]
    fn goldfish_in_driver_listing_detected() {
        let dir = TempDir::new().unwrap();
        let drivers = dir.path().join("proc/tty/drivers");
        fs::create_dir_all(drivers.parent().unwrap()).unwrap();
        fs::write(&drivers, b"/dev/tty             /dev/tty        5 goldfish\n").unwrap();
        let report = scanner_at(dir.path()).scan(None);
        assert_eq!(report.methods, ["qemu_drivers"]);
    }

    #[test]
    fn goldfish_past_read_limit_is_invisible() {
        let dir = TempDir::new().unwrap();
        let cpuinfo = dir.path().join("proc/cpuinfo");
        fs::create_dir_all(cpuinfo.parent().unwrap()).unwrap();
        let mut data = vec![b'x'; 2048];
        data.extend_from_slice(b"goldfish");
        fs::write(&cpuinfo, &data).unwrap();
        let report = scanner_at(dir.path()).scan(None);
        assert!(!report.is_emulator);
    }

    #[test]
    fn vendor_prefix_in_installed_packages_detected() {
        let dir = TempDir::new().unwrap();
        let inventory = PackageInventory {
            installed_packages: vec!["com.microvirt.launcher".into()],
            ..Default::default()
        };
        let report = scanner_at(dir.path()).scan(Some(&inventory));
        assert_eq!(report.methods, ["vendor_packages"]);
    }

    #[test]
    fn genymotion_launcher_matches_exact_name_only() {
        let dir = TempDir::new().unwrap();
        let scanner = scanner_at(dir.path());

        let exact = PackageInventory {
            installed_packages: vec!["com.google.android.launcher.layouts.genymotion".into()],
            ..Default::default()
        };
        assert!(scanner.scan(Some(&exact)).is_emulator);

        let superstring = PackageInventory {
            installed_packages: vec!["com.google.android.launcher.layouts.genymotion.extra".into()],
            ..Default::default()
        };
        assert!(!scanner.scan(Some(&superstring)).is_emulator);
    }

    #[test]
    fn itools_needs_matching_build_product() {
        let dir = TempDir::new().unwrap();
        let scanner = scanner_at(dir.path());

        let wrong_product = PackageInventory {
            installed_packages: vec!["cn.itools.helper".into()],
            build_product: "sdk_gphone64".into(),
            ..Default::default()
        };
        assert!(!scanner.scan(Some(&wrong_product)).is_emulator);

        let matching = PackageInventory {
            installed_packages: vec!["cn.itools.helper".into()],
            build_product: "iToolsAVM-2".into(),
            ..Default::default()
        };
        assert_eq!(scanner.scan(Some(&matching)).methods, ["vendor_packages"]);
    }

    #[test]
    fn bluestacks_launcher_and_service_methods() {
        let dir = TempDir::new().unwrap();
        let scanner = scanner_at(dir.path());

        let inventory = PackageInventory {
            launcher_packages: vec!["com.bluestacks.home".into()],
            running_services: vec!["com.bluestacks.BstCommandProcessor".into()],
            ..Default::default()
        };
        let report = scanner.scan(Some(&inventory));
        assert_eq!(report.methods, ["launcher_packages", "running_services"]);
    }

    #[test]
    fn bluestacks_shared_folder_detected() {
        let dir = TempDir::new().unwrap();
        let scanner = scanner_at(dir.path());
        assert!(!scanner.bluestacks_detected());

        touch(dir.path(), "/mnt/windows/BstSharedFolder");
        assert!(scanner.bluestacks_detected());
    }
}
