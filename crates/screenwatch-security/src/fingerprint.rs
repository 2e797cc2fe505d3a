// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signing-certificate fingerprints — SHA-1, MD5, and SHA-256 over the
// certificate's DER encoding, plus the JVM-compatible signer hash.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use screenwatch_core::types::{CertificateFingerprint, CertificateValue};

/// Format bytes as colon-delimited uppercase hex pairs (`AB:CD:EF`).
///
/// This is the fingerprint notation used by `keytool` and expected by the
/// host application when comparing signing certificates.
pub fn colon_hex_upper(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Compute the three fingerprint digests over a certificate's DER bytes.
///
/// The digest input is the raw DER encoding of the signer, which is exactly
/// what `X509Certificate.getEncoded()` returns for the same certificate.
pub fn fingerprint_der(der: &[u8]) -> CertificateFingerprint {
    CertificateFingerprint {
        sha1: colon_hex_upper(&Sha1::digest(der)),
        md5: colon_hex_upper(&Md5::digest(der)),
        sha256: colon_hex_upper(&Sha256::digest(der)),
    }
}

/// JVM `Arrays.hashCode(byte[])` over the given bytes.
///
/// Starts at 1 and folds each byte as a *signed* value with a wrapping
/// multiply by 31. `Signature.hashCode()` on Android is defined as exactly
/// this over the signature's byte array.
pub fn java_array_hash(bytes: &[u8]) -> i32 {
    let mut hash: i32 = 1;
    for &b in bytes {
        hash = hash.wrapping_mul(31).wrapping_add(b as i8 as i32);
    }
    hash
}

/// Fold all signers into the compact certificate value.
///
/// The accumulator starts at 1 and takes the wrapping product of each
/// signer's [`java_array_hash`], so the result matches what a Java caller
/// computes by multiplying `Signature.hashCode()` values.
pub fn certificate_value(signers: &[Vec<u8>]) -> CertificateValue {
    let mut value: i32 = 1;
    for signer in signers {
        value = value.wrapping_mul(java_array_hash(signer));
    }
    CertificateValue {
        certificate_hash: value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal DER SEQUENCE used as a stand-in signer body.
    const TINY_DER: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x01];

    #[test]
    fn colon_hex_formats_uppercase_pairs() {
        assert_eq!(colon_hex_upper(&[0x00, 0xFF, 0x10]), "00:FF:10");
        assert_eq!(colon_hex_upper(&[0xAB]), "AB");
        assert_eq!(colon_hex_upper(&[]), "");
    }

    #[test]
    fn fingerprint_known_der_vector() {
        // Digests verified against coreutils sha1sum/md5sum/sha256sum.
        let fp = fingerprint_der(TINY_DER);
        assert_eq!(fp.sha1, "90:D8:0B:02:14:71:5C:21:17:F1:DB:31:0C:C5:6F:1E:87:DC:47:75");
        assert_eq!(fp.md5, "F5:91:1D:51:91:6A:20:C8:FA:18:76:37:BA:2F:F7:55");
        assert_eq!(
            fp.sha256,
            "1B:65:F6:8A:52:2C:85:87:15:F5:DD:95:1C:D0:40:2D:C1:66:91:77:88:14:BF:07:59:82:2B:7A:25:74:21:D0"
        );
    }

    #[test]
    fn fingerprint_digest_lengths() {
        let fp = fingerprint_der(b"hello");
        // 20, 16, and 32 bytes as "XX" pairs with separating colons.
        assert_eq!(fp.sha1.len(), 20 * 3 - 1);
        assert_eq!(fp.md5.len(), 16 * 3 - 1);
        assert_eq!(fp.sha256.len(), 32 * 3 - 1);
        assert_eq!(
            fp.sha1,
            "AA:F4:C6:1D:DC:C5:E8:A2:DA:BE:DE:0F:3B:48:2C:D9:AE:A9:43:4D"
        );
    }

    #[test]
    fn java_hash_matches_jvm_vectors() {
        // Vectors computed with java.util.Arrays.hashCode.
        assert_eq!(java_array_hash(&[]), 1);
        assert_eq!(java_array_hash(&[1, 2, 3]), 30817);
        assert_eq!(java_array_hash(&[0x80]), -97); // bytes fold as signed
        assert_eq!(java_array_hash(TINY_DER), 73049486);
        assert_eq!(java_array_hash(b"screen"), -20186195);
    }

    #[test]
    fn certificate_value_single_signer_is_its_hash() {
        let value = certificate_value(&[TINY_DER.to_vec()]);
        assert_eq!(value.certificate_hash, 73049486);
    }

    #[test]
    fn certificate_value_multiplies_signers() {
        let second = vec![0x30, 0x03, 0x02, 0x01, 0x02];
        let value = certificate_value(&[TINY_DER.to_vec(), second]);
        assert_eq!(value.certificate_hash, 1195573330);
    }

    #[test]
    fn certificate_value_empty_signer_set_is_one() {
        assert_eq!(certificate_value(&[]).certificate_hash, 1);
    }
}
