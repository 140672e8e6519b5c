// SPDX-License-Identifier: Apache-2.0

mod common;

use common::*;
use mqtts_ca::certs::{builtin, Certificate, Chain, Verifiable};
use mqtts_ca::error::Error;

#[test]
fn broker_chain() {
    let ca = Certificate::from_pem(BROKER_CA).unwrap();
    let leaf = Certificate::from_pem(BROKER_CERT).unwrap();

    let chain = Chain::from(vec![leaf.clone(), ca.clone()]);

    assert_eq!(chain.verify().ok(), Some(&ca));
    assert_eq!(chain.root(), Some(&ca));
    assert_eq!(chain.end_entity().ok(), Some(&leaf));
}

#[test]
fn broker_chain_invalid() {
    let other = Certificate::from_pem(OTHER_CA).unwrap();
    let leaf = Certificate::from_pem(BROKER_CERT).unwrap();

    let chain = Chain::from(vec![leaf, other]);

    assert!(matches!(chain.verify(), Err(Error::BadSignature(_))));
}

#[test]
fn tampered_leaf() {
    let ca = Certificate::from_pem(BROKER_CA).unwrap();
    let leaf = {
        let mut der = Certificate::from_pem(BROKER_CERT).unwrap().to_der().unwrap();
        // Last byte of the signature.
        let last = der.len() - 1;
        der[last] ^= 0xff;
        Certificate::from_der(&der).unwrap()
    };

    assert!((&ca, &leaf).verify().is_err());
}

#[test]
fn leaf_is_not_ca() {
    let leaf = Certificate::from_pem(BROKER_CERT).unwrap();

    assert!(!leaf.is_ca());
    assert!(!leaf.is_self_signed());
    assert_eq!(leaf.subject(), "CN=broker.test");
    assert!(leaf.issuer().contains("CN=Test Broker Root CA"));
}

#[test]
fn chain_without_root() {
    let leaf = Certificate::from_pem(BROKER_CERT).unwrap();
    let chain = Chain::from(vec![leaf.clone()]);

    assert!(chain.root().is_none());
    assert_eq!(chain.top().ok(), Some(&leaf));
}

#[test]
fn expired_p384_root() {
    let expired = Certificate::from_pem(EXPIRED_CA).unwrap();

    assert!(expired.is_ca());
    assert!(expired.is_self_signed());
    assert!(!expired.is_valid_at(std::time::SystemTime::now()));
}

#[test]
fn pem_bundle_chain() {
    let mut bundle = BROKER_CERT.to_vec();
    bundle.extend_from_slice(BROKER_CA);

    let chain = Chain::from_pem(&bundle).unwrap();

    assert_eq!(chain.certificates.len(), 2);
    chain.verify().unwrap();
}

#[test]
fn placeholder_bundle() {
    assert!(matches!(
        Chain::from_pem(builtin::PLACEHOLDER),
        Err(Error::Placeholder)
    ));
}
