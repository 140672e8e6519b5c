// SPDX-License-Identifier: Apache-2.0

//! The `mqtts-ca` crate provides the root certificate authority a device
//! trusts when it connects to its MQTT broker over TLS (MQTTS, port 8883).
//!
//! ## The embedded root CA
//!
//! [`ROOT_CA_CERT`] is a PEM-encoded certificate compiled into the image as
//! a `const` byte slice. It lives in read-only memory and is handed
//! unmodified to the TLS stack before each connection.
//!
//! The crate ships a placeholder in its place. Set `MQTTS_ROOT_CA_PEM` to
//! the path of your broker's root CA when building, and enable the
//! `deny_placeholder` feature in release builds so that a forgotten
//! substitution fails the build instead of every handshake. Refer to the
//! [builtin](crate::certs::builtin) module for how to obtain the
//! certificate.
//!
//! ## Installing it
//!
//! ```no_run
//! use mqtts_ca::{config::BrokerConfig, tls};
//!
//! // Either directly...
//! let anchor = tls::TrustAnchor::builtin()?;
//! let config = tls::client_config(&anchor)?;
//!
//! // ...or through the broker settings, which also honour on-disk overrides.
//! let config = BrokerConfig::from_env()?.client_config()?;
//! # Ok::<(), mqtts_ca::error::Error>(())
//! ```
//!
//! Parsing, chain building and the handshake itself are left to rustls. A
//! placeholder root is reported as [`error::Error::Placeholder`] when the
//! configuration is built, before any connection is attempted.
//!
//! ## Development without verification
//!
//! The `dangerous_insecure` feature adds
//! [`tls::insecure_client_config`](crate::tls), the equivalent of disabling
//! server certificate verification. Never use it in production.

#![deny(clippy::all)]
#![deny(missing_docs)]
#![allow(unknown_lints)]

/// Root CA certificates.
pub mod certs;

pub mod config;

/// Error module.
pub mod error;

pub mod fetch;
pub mod pem;
pub mod tls;
mod util;

pub use certs::builtin::ROOT_CA_CERT;
pub use util::search_path;
