// SPDX-License-Identifier: Apache-2.0

//! Installing the root CA into a rustls client.
//!
//! This is the "set trusted root certificate" step: a [`TrustAnchor`] is
//! loaded once at startup and handed to [`client_config`] before connecting
//! to the broker. Chain building, expiry and hostname checks all happen
//! inside rustls during the handshake.

mod verifier;

pub(crate) use verifier::UnverifiedServerCert;

use crate::certs::{builtin, Certificate};
use crate::error::{Error, Result};

use lazy_static::lazy_static;
use rustls::{crypto::CryptoProvider, ClientConfig, RootCertStore};
use rustls_pki_types::CertificateDer;
use std::{sync::Arc, time::SystemTime};
use tracing::{debug, info, warn};

lazy_static! {
    static ref PROVIDER: Arc<CryptoProvider> =
        Arc::new(rustls::crypto::ring::default_provider());
}

/// The ring crypto provider shared by every config this crate builds.
pub(crate) fn provider() -> Arc<CryptoProvider> {
    PROVIDER.clone()
}

/// A root CA certificate checked and ready to be installed as the only
/// trusted root of a TLS client.
#[derive(Clone, Debug)]
pub struct TrustAnchor {
    certificate: Certificate,
    der: CertificateDer<'static>,
}

impl TrustAnchor {
    /// Load a trust anchor from a PEM document holding one CA certificate.
    ///
    /// Fails with [`Error::Placeholder`] for the shipped placeholder.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        Self::from_certificate(Certificate::from_pem(pem)?)
    }

    /// Load the root CA embedded at build time.
    pub fn builtin() -> Result<Self> {
        Self::from_pem(builtin::ROOT_CA_CERT)
    }

    /// Wrap an already parsed certificate.
    ///
    /// The certificate must be a CA. A CA that is not self-signed, or that
    /// is outside its validity period right now, is accepted with a warning:
    /// the handshake decides.
    pub fn from_certificate(certificate: Certificate) -> Result<Self> {
        if !certificate.is_ca() {
            return Err(Error::NotCertificateAuthority(certificate.subject()));
        }

        if !certificate.is_self_signed() {
            warn!(
                subject = %certificate.subject(),
                issuer = %certificate.issuer(),
                "trust anchor is not a self-signed root"
            );
        }

        if !certificate.is_valid_at(SystemTime::now()) {
            warn!(
                subject = %certificate.subject(),
                "trust anchor is outside its validity period; handshakes will fail"
            );
        }

        let der = CertificateDer::from(certificate.to_der()?);
        debug!(anchor = %certificate, "loaded trust anchor");

        Ok(Self { certificate, der })
    }

    /// The parsed certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// The DER encoding handed to rustls.
    pub fn der(&self) -> &CertificateDer<'static> {
        &self.der
    }

    /// A root store holding this anchor and nothing else.
    pub fn root_store(&self) -> Result<RootCertStore> {
        let mut roots = RootCertStore::empty();
        roots.add(self.der.clone())?;
        Ok(roots)
    }
}

/// Build a client config that trusts exactly `anchor`.
///
/// No client certificate is presented. Broker authentication by username
/// and password happens at the MQTT layer.
pub fn client_config(anchor: &TrustAnchor) -> Result<ClientConfig> {
    let config = ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()?
        .with_root_certificates(anchor.root_store()?)
        .with_no_client_auth();

    info!(anchor = %anchor.certificate(), "TLS client trusts a single root");

    Ok(config)
}

/// Build a client config that accepts any server certificate.
///
/// Development only: the broker is not authenticated, so anyone on the path
/// can impersonate it.
#[cfg(feature = "dangerous_insecure")]
pub fn insecure_client_config() -> Result<ClientConfig> {
    warn!("server certificate verification is DISABLED; never use this in production");

    let config = ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(UnverifiedServerCert))
        .with_no_client_auth();

    Ok(config)
}
