// SPDX-License-Identifier: Apache-2.0

mod common;

use std::{convert::TryFrom, sync::Arc};

use common::*;
use mqtts_ca::{
    certs::builtin,
    config::{BrokerConfig, CaSource},
    error::Error,
    tls::{client_config, TrustAnchor},
};
use rustls::{CertificateError, ClientConnection, ServerConnection};
use rustls_pki_types::ServerName;

fn connect(config: rustls::ClientConfig, name: &str) -> Result<(), rustls::Error> {
    let name = ServerName::try_from(name.to_string()).unwrap();
    let mut client = ClientConnection::new(Arc::new(config), name).unwrap();
    let mut server = ServerConnection::new(broker_config()).unwrap();

    handshake(&mut client, &mut server)
}

#[test]
fn correct_root_completes_handshake() {
    let anchor = TrustAnchor::from_pem(BROKER_CA).unwrap();

    connect(client_config(&anchor).unwrap(), BROKER_NAME).unwrap();
}

#[test]
fn unrelated_root_fails_certificate_validation() {
    let anchor = TrustAnchor::from_pem(OTHER_CA).unwrap();

    assert_eq!(
        connect(client_config(&anchor).unwrap(), BROKER_NAME),
        Err(rustls::Error::InvalidCertificate(
            CertificateError::UnknownIssuer
        ))
    );
}

#[test]
fn isrg_root_does_not_trust_a_private_broker() {
    let anchor = TrustAnchor::from_pem(builtin::isrg::ROOT_X1).unwrap();

    assert!(matches!(
        connect(client_config(&anchor).unwrap(), BROKER_NAME),
        Err(rustls::Error::InvalidCertificate(_))
    ));
}

#[test]
fn wrong_host_name_fails_even_with_correct_root() {
    let anchor = TrustAnchor::from_pem(BROKER_CA).unwrap();

    assert!(matches!(
        connect(client_config(&anchor).unwrap(), "other.test"),
        Err(rustls::Error::InvalidCertificate(_))
    ));
}

#[test]
fn placeholder_fails_before_any_handshake() {
    let config = BrokerConfig {
        ca: CaSource::Pem(String::from_utf8_lossy(builtin::PLACEHOLDER).into_owned()),
        ..BrokerConfig::new(BROKER_NAME)
    };

    assert!(matches!(config.client_config(), Err(Error::Placeholder)));
}

#[test]
fn broker_config_with_inline_root_connects() {
    let config = BrokerConfig {
        ca: CaSource::Pem(String::from_utf8_lossy(BROKER_CA).into_owned()),
        ..BrokerConfig::new(BROKER_NAME)
    };

    connect(config.client_config().unwrap(), BROKER_NAME).unwrap();
}

#[test]
fn leaf_is_not_a_trust_anchor() {
    assert!(matches!(
        TrustAnchor::from_pem(BROKER_CERT),
        Err(Error::NotCertificateAuthority(_))
    ));
}

#[test]
fn expired_root_still_loads() {
    let anchor = TrustAnchor::from_pem(EXPIRED_CA).unwrap();

    assert!(!anchor
        .certificate()
        .is_valid_at(std::time::SystemTime::now()));
    assert!(client_config(&anchor).is_ok());
}

#[cfg(feature = "dangerous_insecure")]
#[test]
fn insecure_config_accepts_any_broker() {
    let config = mqtts_ca::tls::insecure_client_config().unwrap();

    connect(config, BROKER_NAME).unwrap();
}
