// SPDX-License-Identifier: Apache-2.0

//! The root CA certificate embedded in the image.
//!
//! [`ROOT_CA_CERT`] is what a client passes to its TLS stack as the trusted
//! root when connecting to the broker on the MQTTS port (8883). It is a
//! `const` byte slice, so it lives in the read-only data of the image (flash
//! on a microcontroller) and is never copied into RAM unless a caller does
//! so.
//!
//! The crate ships a placeholder. Replace it at build time by pointing the
//! `MQTTS_ROOT_CA_PEM` environment variable at your broker's root CA:
//!
//! ```text
//! openssl s_client -connect YOUR_BROKER:8883 -showcerts </dev/null 2>/dev/null \
//!   | openssl x509 -outform PEM > root_ca.pem
//! MQTTS_ROOT_CA_PEM=$PWD/root_ca.pem cargo build --features deny_placeholder
//! ```
//!
//! `s_client` prints the first certificate of the chain; keep the one that
//! is self-signed (see [`crate::fetch`] for doing this from Rust). For HiveMQ
//! Cloud and most public brokers with free certificates the root is ISRG
//! Root X1, available as [`isrg::ROOT_X1`]. For Mosquitto with self-signed
//! certificates, use the `ca.crt` you generated.
//!
//! The `deny_placeholder` feature turns a build that would embed the
//! placeholder into a build failure.

/// Let's Encrypt (ISRG) roots.
pub mod isrg;

use super::*;

/// The trusted root CA (PEM-encoded), as selected at build time.
pub const ROOT_CA_CERT: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/root_ca.pem"));

/// The placeholder shipped in place of a real root CA.
pub const PLACEHOLDER: &[u8] = include_bytes!("placeholder.pem");

/// Text that only appears in the placeholder.
pub const PLACEHOLDER_MARKER: &[u8] = b"REPLACE THIS PLACEHOLDER";

/// Whether `pem` is, or still contains, the shipped placeholder.
pub fn is_placeholder(pem: &[u8]) -> bool {
    pem == PLACEHOLDER
        || pem
            .windows(PLACEHOLDER_MARKER.len())
            .any(|window| window == PLACEHOLDER_MARKER)
}

/// Get the embedded root CA certificate.
pub fn root_ca() -> Result<Certificate> {
    Certificate::from_pem(ROOT_CA_CERT)
}

mod tests {
    #[test]
    fn placeholder_is_detected() {
        use super::*;

        assert!(is_placeholder(PLACEHOLDER));
        assert!(!is_placeholder(isrg::ROOT_X1));
        assert!(!is_placeholder(b""));
    }

    #[test]
    fn embedded_root_is_pem_or_placeholder() {
        use super::*;

        assert!(is_placeholder(ROOT_CA_CERT) || crate::pem::is_well_formed(ROOT_CA_CERT));
    }

    #[cfg(placeholder_root_ca)]
    #[test]
    fn placeholder_root_is_refused() {
        use super::*;

        assert!(matches!(root_ca(), Err(Error::Placeholder)));
    }

    #[cfg(not(placeholder_root_ca))]
    #[test]
    fn root_was_substituted() {
        use super::*;

        assert_ne!(ROOT_CA_CERT, PLACEHOLDER);
        assert!(!is_placeholder(ROOT_CA_CERT));

        let root = root_ca().unwrap();
        assert!(root.is_ca());
    }
}
