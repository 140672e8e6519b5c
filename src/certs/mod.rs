// SPDX-License-Identifier: Apache-2.0

//! X.509 certificates used as MQTTS trust anchors.
//!
//! Parsing and signature checks are pure Rust (`x509-cert`, `rsa`,
//! `p384`). Path building during a handshake is left to rustls; the checks
//! here are for inspecting a root before it is installed.

/// The embedded root CA and other built-in certificates.
pub mod builtin;

mod cert;
mod chain;

pub use cert::Certificate;
pub use chain::Chain;

use crate::error::{Error, Result};

/// An interface for types that may contain entities such as
/// signatures that must be verified.
pub trait Verifiable {
    /// An output type for successful verification.
    type Output;

    /// Self-verifies signatures.
    fn verify(self) -> Result<Self::Output>;
}
