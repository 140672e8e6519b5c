// SPDX-License-Identifier: Apache-2.0

//! Utilities for overriding the embedded root CA with a file on disk.
//!
//! The search path for the root CA is:
//!   1. The path specified in the "MQTTS_ROOT_CA" environment variable
//!      (if present).
//!   2. `$HOME/.cache/mqtts-ca/root_ca.pem`
//!   3. `/etc/mqtts-ca/root_ca.pem`
//!
//! Each file must hold exactly one PEM certificate.

use crate::error::{Error, Result};
use crate::tls::TrustAnchor;

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

/// Environment variable naming a root CA file.
pub const ENV_VAR: &str = "MQTTS_ROOT_CA";

fn append_rest<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut path = path.as_ref().to_path_buf();
    path.push("mqtts-ca");
    path.push("root_ca.pem");
    path
}

/// Returns the path stored in the optional `MQTTS_ROOT_CA`
/// environment variable.
pub fn env_var() -> Option<PathBuf> {
    env::var_os(ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Returns the "user-level" search path for the root CA
/// (`$HOME/.cache/mqtts-ca/root_ca.pem`).
pub fn home() -> Option<PathBuf> {
    dirs::cache_dir().map(append_rest)
}

/// Returns the "system-level" search path for the root CA
/// (`/etc/mqtts-ca/root_ca.pem`).
pub fn sys() -> Option<PathBuf> {
    let sys = PathBuf::from("/etc");
    if sys.exists() {
        Some(append_rest(sys))
    } else {
        None
    }
}

/// Returns the list of search paths in the order that they
/// will be searched for the root CA.
pub fn path() -> Vec<PathBuf> {
    vec![env_var(), home(), sys()]
        .into_iter()
        .flatten()
        .collect()
}

/// Searches for and loads a root CA from disk.
///
/// A `MQTTS_ROOT_CA` naming a missing file is an error rather than a reason
/// to fall through to the next location.
pub fn get() -> Result<TrustAnchor> {
    if let Some(path) = env_var().filter(|p| !p.exists()) {
        warn!(path = %path.display(), "{ENV_VAR} names a file that does not exist");
        return Err(Error::Config(format!(
            "{ENV_VAR}={} does not exist",
            path.display()
        )));
    }

    let not_found: std::io::Error = ErrorKind::NotFound.into();

    let paths: Vec<_> = path().into_iter().filter(|p| p.exists()).collect();
    let file_name = paths.first().ok_or(not_found)?;
    debug!(path = %file_name.display(), "loading root CA from disk");

    TrustAnchor::from_pem(&fs::read(file_name)?)
}
