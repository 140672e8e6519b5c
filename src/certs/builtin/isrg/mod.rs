// SPDX-License-Identifier: Apache-2.0

//! Internet Security Research Group roots, used by Let's Encrypt.
//!
//! Certificate provenance: https://letsencrypt.org/certificates/
//!
//! HiveMQ Cloud and most public MQTT brokers with free TLS certificates
//! chain up to ISRG Root X1.

use super::*;

/// ISRG Root X1, RSA 4096 (PEM-encoded). Expires 2035-06-04.
pub const ROOT_X1: &[u8] = include_bytes!("root_x1.pem");

/// ISRG Root X2, ECDSA P-384 (PEM-encoded). Expires 2040-09-17.
pub const ROOT_X2: &[u8] = include_bytes!("root_x2.pem");

/// Get the ISRG Root X1 certificate.
pub fn root_x1() -> Result<Certificate> {
    Certificate::from_pem(ROOT_X1)
}

/// Get the ISRG Root X2 certificate.
pub fn root_x2() -> Result<Certificate> {
    Certificate::from_pem(ROOT_X2)
}

mod tests {
    #[test]
    fn x1_self_signed() {
        use super::*;

        let x1 = root_x1().unwrap();

        (&x1, &x1).verify().unwrap();
        assert!(x1.is_self_signed());
        assert!(x1.is_ca());
    }

    #[test]
    fn x2_self_signed() {
        use super::*;

        let x2 = root_x2().unwrap();

        (&x2, &x2).verify().unwrap();
        assert!(x2.is_self_signed());
        assert!(x2.is_ca());
    }

    #[test]
    fn x1_identity() {
        use super::*;

        let x1 = root_x1().unwrap();

        assert!(x1.subject().contains("CN=ISRG Root X1"));
        assert_eq!(x1.subject(), x1.issuer());
        assert_eq!(
            hex::encode(x1.fingerprint_sha256().unwrap()),
            "96bcec06264976f37460779acf28c5a7cfe8a3c0aae11a8ffcee05c0bddf08c6"
        );
    }

    #[test]
    fn x2_identity() {
        use super::*;
        use std::time::{Duration, UNIX_EPOCH};

        let x2 = root_x2().unwrap();

        // 2020-09-04T00:00:00Z and 2040-09-17T16:00:00Z
        assert_eq!(x2.not_before(), UNIX_EPOCH + Duration::from_secs(1_599_177_600));
        assert_eq!(x2.not_after(), UNIX_EPOCH + Duration::from_secs(2_231_510_400));

        assert!(x2.subject().contains("CN=ISRG Root X2"));
        assert_eq!(x2.subject(), x2.issuer());
        assert_eq!(
            hex::encode(x2.fingerprint_sha256().unwrap()),
            "69729b8e15a86efc177a57afb7171dfc64add28c2fca8cf1507e34453ccb1470"
        );
    }
}
