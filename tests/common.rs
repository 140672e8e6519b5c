// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use rustls::{ClientConnection, ServerConfig, ServerConnection};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

pub const BROKER_CA: &[u8] = include_bytes!("certs_data/broker_ca.pem");
pub const BROKER_CERT: &[u8] = include_bytes!("certs_data/broker.pem");
pub const BROKER_KEY: &[u8] = include_bytes!("certs_data/broker.key");
pub const OTHER_CA: &[u8] = include_bytes!("certs_data/other_ca.pem");
pub const EXPIRED_CA: &[u8] = include_bytes!("certs_data/expired_ca.pem");

pub const BROKER_NAME: &str = "broker.test";

/// The broker presents its own certificate followed by the CA, like most
/// Mosquitto setups with a self-made CA.
pub fn broker_config() -> Arc<ServerConfig> {
    let mut chain: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut &BROKER_CERT[..])
        .collect::<Result<_, _>>()
        .unwrap();
    chain.extend(
        rustls_pemfile::certs(&mut &BROKER_CA[..])
            .collect::<Result<Vec<_>, _>>()
            .unwrap(),
    );

    let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut &BROKER_KEY[..])
        .unwrap()
        .unwrap();

    let config = ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(chain, key)
    .unwrap();

    Arc::new(config)
}

fn client_to_server(
    client: &mut ClientConnection,
    server: &mut ServerConnection,
) -> Result<(), rustls::Error> {
    let mut buf = Vec::new();
    while client.wants_write() {
        client.write_tls(&mut buf).unwrap();
    }

    let mut rd = &buf[..];
    while !rd.is_empty() {
        server.read_tls(&mut rd).unwrap();
        server.process_new_packets()?;
    }

    Ok(())
}

fn server_to_client(
    server: &mut ServerConnection,
    client: &mut ClientConnection,
) -> Result<(), rustls::Error> {
    let mut buf = Vec::new();
    while server.wants_write() {
        server.write_tls(&mut buf).unwrap();
    }

    let mut rd = &buf[..];
    while !rd.is_empty() {
        client.read_tls(&mut rd).unwrap();
        client.process_new_packets()?;
    }

    Ok(())
}

/// Drive a client and a broker through a handshake in memory. Returns the
/// first error either side raises.
pub fn handshake(
    client: &mut ClientConnection,
    server: &mut ServerConnection,
) -> Result<(), rustls::Error> {
    for _ in 0..16 {
        if !client.is_handshaking() && !server.is_handshaking() {
            return Ok(());
        }

        client_to_server(client, server)?;
        server_to_client(server, client)?;
    }

    panic!("handshake did not complete");
}
