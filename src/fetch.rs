// SPDX-License-Identifier: Apache-2.0

//! Retrieving the certificate chain a broker presents.
//!
//! This does what
//! `openssl s_client -connect YOUR_BROKER:8883 -showcerts` does: it runs a
//! TLS handshake without trusting anything and keeps the certificates the
//! server sent. The result is meant to be printed and reviewed by a person
//! before it is embedded as the root CA. Nothing here authenticates the
//! broker.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let chain = mqtts_ca::fetch::fetch("broker.example.com", 8883, Duration::from_secs(10))?;
//! match chain.root() {
//!     Some(root) => print!("{}", root.to_pem()?),
//!     None => eprintln!("root not presented; issued by {}", chain.top()?.issuer()),
//! }
//! # Ok::<(), mqtts_ca::error::Error>(())
//! ```

use crate::certs::Chain;
use crate::error::{Error, Result};
use crate::tls::{provider, UnverifiedServerCert};

use rustls::{ClientConfig, ClientConnection};
use rustls_pki_types::ServerName;
use std::{
    convert::TryFrom,
    io::{self, Read, Write},
    net::{TcpStream, ToSocketAddrs},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, info};

/// Run a TLS handshake over `stream` and return the chain the server
/// presented, end-entity first.
///
/// `server_name` is sent as SNI so that virtual-hosted brokers answer with
/// the right certificate.
pub fn presented_chain<S: Read + Write>(stream: &mut S, server_name: &str) -> Result<Chain> {
    let name = ServerName::try_from(server_name.to_string())
        .map_err(|_| Error::InvalidServerName(server_name.to_string()))?;

    let config = ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(UnverifiedServerCert))
        .with_no_client_auth();

    let mut conn = ClientConnection::new(Arc::new(config), name)?;
    while conn.is_handshaking() {
        let (read, written) = conn.complete_io(stream)?;
        if read == 0 && written == 0 && conn.is_handshaking() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed during the TLS handshake",
            )
            .into());
        }
    }

    let chain = Chain::from_der(conn.peer_certificates().unwrap_or_default())?;
    debug!(
        certificates = chain.certificates.len(),
        "server presented its chain"
    );

    // Best effort: the chain is already in hand.
    conn.send_close_notify();
    if let Err(e) = conn.write_tls(stream) {
        debug!(error = %e, "close_notify not delivered");
    }

    Ok(chain)
}

/// Connect to `host:port` and return the chain the server presents.
pub fn fetch(host: &str, port: u16, timeout: Duration) -> Result<Chain> {
    let addr = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{host} did not resolve to an address"),
        )
    })?;

    info!(%host, port, %addr, "fetching presented certificate chain");

    let mut stream = TcpStream::connect_timeout(&addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    presented_chain(&mut stream, host)
}
