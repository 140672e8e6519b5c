// SPDX-License-Identifier: Apache-2.0

use std::{
    error,
    fmt::{self, Display},
    io,
};

use x509_cert::der::pem;

/// Errors raised while checking the textual (RFC 7468) form of a
/// certificate document.
///
/// Line numbers are 1-based and refer to the input as given.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PemError {
    /// No `-----BEGIN ...-----` line was found.
    MissingBeginMarker,

    /// A block was opened at the given line but never closed.
    MissingEndMarker(usize),

    /// The block at the given line is not a `CERTIFICATE`.
    UnexpectedLabel {
        /// Line of the offending encapsulation boundary.
        line: usize,
        /// Label found on that line.
        label: String,
    },

    /// The END label does not match the BEGIN label.
    LabelMismatch {
        /// Line of the END boundary.
        line: usize,
        /// Label of the BEGIN boundary.
        begin: String,
        /// Label of the END boundary.
        end: String,
    },

    /// A body line holds characters outside the base64 alphabet.
    InvalidBase64(usize),

    /// A body line is longer than 64 characters.
    LineTooLong {
        /// Offending line.
        line: usize,
        /// Its length.
        len: usize,
    },

    /// The input contains a byte outside 7-bit ASCII.
    NonAscii(usize),

    /// A block with no body.
    EmptyBody(usize),

    /// Something other than whitespace follows the last END boundary.
    TrailingData(usize),

    /// The RFC 7468 decoder rejected the block opened at `line`.
    Encoding {
        /// Line of the BEGIN boundary.
        line: usize,
        /// Decoder error.
        error: pem::Error,
    },
}

impl Display for PemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PemError::MissingBeginMarker => write!(f, "no BEGIN CERTIFICATE line found"),
            PemError::MissingEndMarker(line) => {
                write!(f, "block opened at line {line} has no END line")
            }
            PemError::UnexpectedLabel { line, label } => {
                write!(f, "line {line}: expected CERTIFICATE, found {label:?}")
            }
            PemError::LabelMismatch { line, begin, end } => write!(
                f,
                "line {line}: END label {end:?} does not match BEGIN label {begin:?}"
            ),
            PemError::InvalidBase64(line) => write!(f, "line {line}: invalid base64 data"),
            PemError::LineTooLong { line, len } => {
                write!(f, "line {line}: {len} characters exceed the 64 column limit")
            }
            PemError::NonAscii(line) => write!(f, "line {line}: non-ASCII byte"),
            PemError::EmptyBody(line) => write!(f, "block opened at line {line} is empty"),
            PemError::TrailingData(line) => {
                write!(f, "line {line}: unexpected data after the last certificate")
            }
            PemError::Encoding { line, error } => {
                write!(f, "block opened at line {line}: {error}")
            }
        }
    }
}

impl error::Error for PemError {}

/// Errors returned when loading, inspecting or installing a root CA
/// certificate.
#[derive(Debug)]
pub enum Error {
    /// Reading a certificate file or talking to a broker failed.
    IoError(io::Error),

    /// The certificate text is not well-formed PEM.
    Pem(PemError),

    /// The PEM body does not decode as an X.509 certificate.
    InvalidCertificate(String),

    /// The bytes are the shipped placeholder, not a real root CA.
    ///
    /// Every handshake against a real broker would fail certificate
    /// validation, so this is reported before a connection is attempted.
    Placeholder,

    /// The certificate is not a certificate authority (basicConstraints).
    NotCertificateAuthority(String),

    /// The signature algorithm is not one this crate can check.
    UnsupportedAlgorithm(String),

    /// A signature did not verify.
    BadSignature(String),

    /// A chain contained no certificates.
    EmptyChain,

    /// The broker host is not a valid TLS server name.
    InvalidServerName(String),

    /// A required setting is absent or malformed.
    Config(String),

    /// The TLS library rejected the configuration or the peer.
    Tls(rustls::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {e}"),
            Error::Pem(e) => write!(f, "malformed PEM: {e}"),
            Error::InvalidCertificate(e) => write!(f, "invalid certificate: {e}"),
            Error::Placeholder => write!(
                f,
                "the root CA is still the shipped placeholder; \
                 replace it with your broker's root CA certificate"
            ),
            Error::NotCertificateAuthority(subject) => {
                write!(f, "{subject} is not a certificate authority")
            }
            Error::UnsupportedAlgorithm(oid) => {
                write!(f, "unsupported signature algorithm: {oid}")
            }
            Error::BadSignature(e) => write!(f, "signature check failed: {e}"),
            Error::EmptyChain => write!(f, "certificate chain is empty"),
            Error::InvalidServerName(name) => write!(f, "invalid server name: {name:?}"),
            Error::Config(e) => write!(f, "configuration error: {e}"),
            Error::Tls(e) => write!(f, "TLS error: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::Pem(e) => Some(e),
            Error::Tls(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    #[inline]
    fn from(error: io::Error) -> Error {
        Error::IoError(error)
    }
}

impl From<PemError> for Error {
    #[inline]
    fn from(error: PemError) -> Error {
        Error::Pem(error)
    }
}

impl From<rustls::Error> for Error {
    #[inline]
    fn from(error: rustls::Error) -> Error {
        Error::Tls(error)
    }
}

impl From<Error> for io::Error {
    #[inline]
    fn from(error: Error) -> io::Error {
        match error {
            Error::IoError(e) => e,
            e => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
