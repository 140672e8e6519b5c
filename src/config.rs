// SPDX-License-Identifier: Apache-2.0

//! Broker endpoint settings and where its root CA comes from.
//!
//! A [`BrokerConfig`] is usually deserialized from the application's own
//! settings file, or read from the environment with
//! [`BrokerConfig::from_env`]:
//!
//! | Variable            | Meaning                              |
//! |---------------------|--------------------------------------|
//! | `MQTTS_BROKER_HOST` | broker host name (required)          |
//! | `MQTTS_BROKER_PORT` | TLS port, defaults to 8883           |
//! | `MQTTS_ROOT_CA`     | root CA file overriding the built-in |

use crate::certs::builtin;
use crate::error::{Error, Result};
use crate::tls::{self, TrustAnchor};
use crate::util::search_path;

use rustls::ClientConfig;
use rustls_pki_types::ServerName;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, env, fs, path::PathBuf};
use tracing::info;

/// The conventional MQTT-over-TLS port.
pub const MQTTS_PORT: u16 = 8883;

/// Environment variable holding the broker host.
pub const HOST_VAR: &str = "MQTTS_BROKER_HOST";

/// Environment variable holding the broker port.
pub const PORT_VAR: &str = "MQTTS_BROKER_PORT";

fn default_port() -> u16 {
    MQTTS_PORT
}

/// Where the trusted root CA is taken from.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum CaSource {
    /// The certificate embedded at build time.
    #[default]
    Builtin,

    /// ISRG Root X1, for brokers using Let's Encrypt certificates.
    IsrgRootX1,

    /// A PEM file on disk.
    File(PathBuf),

    /// PEM text carried in the configuration itself.
    Pem(String),

    /// The on-disk search path, then the built-in certificate.
    Search,

    /// No server verification at all. Requires the `dangerous_insecure`
    /// feature.
    Insecure,
}

/// Connection settings for one MQTTS broker.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct BrokerConfig {
    /// Host name, also used for SNI and certificate name checks.
    pub host: String,

    /// TLS port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Source of the trusted root CA.
    #[serde(default)]
    pub ca: CaSource,
}

impl BrokerConfig {
    /// Settings for `host` on the standard port with the built-in root CA.
    pub fn new<S: Into<String>>(host: S) -> Self {
        Self {
            host: host.into(),
            port: MQTTS_PORT,
            ca: CaSource::default(),
        }
    }

    /// Read the settings from the environment.
    ///
    /// The root CA is located through the search path, so `MQTTS_ROOT_CA`
    /// takes precedence over cached and system files, which in turn take
    /// precedence over the built-in certificate.
    pub fn from_env() -> Result<Self> {
        let host = env::var(HOST_VAR)
            .ok()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::Config(format!("{HOST_VAR} is not set")))?;

        let port = match env::var(PORT_VAR) {
            Ok(port) => port
                .parse()
                .map_err(|e| Error::Config(format!("{PORT_VAR}={port:?}: {e}")))?,
            Err(_) => MQTTS_PORT,
        };

        Ok(Self {
            host,
            port,
            ca: CaSource::Search,
        })
    }

    /// The TLS server name of the broker.
    pub fn server_name(&self) -> Result<ServerName<'static>> {
        ServerName::try_from(self.host.clone())
            .map_err(|_| Error::InvalidServerName(self.host.clone()))
    }

    /// Resolve the configured root CA.
    ///
    /// Returns `None` for [`CaSource::Insecure`].
    pub fn trust_anchor(&self) -> Result<Option<TrustAnchor>> {
        let anchor = match &self.ca {
            CaSource::Builtin => TrustAnchor::builtin()?,
            CaSource::IsrgRootX1 => TrustAnchor::from_pem(builtin::isrg::ROOT_X1)?,
            CaSource::File(path) => TrustAnchor::from_pem(&fs::read(path)?)?,
            CaSource::Pem(text) => TrustAnchor::from_pem(text.as_bytes())?,
            CaSource::Search => match search_path::get() {
                Ok(anchor) => anchor,
                Err(Error::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!("no root CA file found, using the built-in certificate");
                    TrustAnchor::builtin()?
                }
                Err(e) => return Err(e),
            },
            CaSource::Insecure => return Ok(None),
        };

        Ok(Some(anchor))
    }

    /// Build the TLS client configuration for this broker.
    ///
    /// This is the startup check: a placeholder root CA is reported here as
    /// [`Error::Placeholder`], before any connection is attempted.
    pub fn client_config(&self) -> Result<ClientConfig> {
        self.server_name()?;

        match self.trust_anchor()? {
            Some(anchor) => tls::client_config(&anchor),
            None => insecure(),
        }
    }
}

#[cfg(feature = "dangerous_insecure")]
fn insecure() -> Result<ClientConfig> {
    tls::insecure_client_config()
}

#[cfg(not(feature = "dangerous_insecure"))]
fn insecure() -> Result<ClientConfig> {
    tracing::warn!("refusing an insecure TLS configuration");
    Err(Error::Config(
        "insecure TLS requires the dangerous_insecure feature".into(),
    ))
}
