// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// screenwatch-security — Device-integrity primitives for the signal bridge.
//
// This crate answers two questions about the environment the host app runs
// in: who signed this APK (digest fingerprints and the compact signer
// hash), and is this hardware real (catalog-driven emulator heuristics
// over sentinel files, driver listings, and package inventories).

pub mod emulator;
pub mod fingerprint;

// PUBLIC API: Re-export the scanner and fingerprint entry points
pub use emulator::{EmulatorScanner, SystemProbe};
pub use fingerprint::{certificate_value, colon_hex_upper, fingerprint_der, java_array_hash};
