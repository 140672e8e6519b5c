// SPDX-License-Identifier: Apache-2.0

use super::*;

use crate::pem;

use der::{
    oid::AssociatedOid, referenced::OwnedToRef, Decode, Encode, EncodePem,
};
use rsa::signature::Verifier;
use sha2::{Digest, Sha256, Sha384, Sha512};
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};
use std::{convert::TryFrom, fmt, time::SystemTime};
use x509_cert::{der, ext::pkix::BasicConstraints, spki};

const SHA256_WITH_RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const SHA384_WITH_RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const SHA512_WITH_RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
const ECDSA_WITH_SHA384_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
const BASIC_CONSTRAINTS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");

/// A parsed X.509 certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate(x509_cert::Certificate);

/// Verify if the public key of one Certificate signs another Certificate.
impl Verifiable for (&Certificate, &Certificate) {
    type Output = ();

    fn verify(self) -> Result<Self::Output> {
        let signer = &self.0 .0;
        let signee = &self.1 .0;

        let message = signee.tbs_certificate.to_der().map_err(|e| {
            Error::InvalidCertificate(format!("failed to encode tbs_certificate as DER: {e}"))
        })?;
        let signature = signee.signature.raw_bytes();
        let key = signer.tbs_certificate.subject_public_key_info.owned_to_ref();

        let oid = signee.signature_algorithm.oid;
        if oid == SHA256_WITH_RSA_OID {
            verify_rsa::<Sha256>(key, &message, signature)
        } else if oid == SHA384_WITH_RSA_OID {
            verify_rsa::<Sha384>(key, &message, signature)
        } else if oid == SHA512_WITH_RSA_OID {
            verify_rsa::<Sha512>(key, &message, signature)
        } else if oid == ECDSA_WITH_SHA384_OID {
            verify_p384(key, &message, signature)
        } else {
            Err(Error::UnsupportedAlgorithm(oid.to_string()))
        }
    }
}

fn verify_rsa<D>(key: SubjectPublicKeyInfoRef<'_>, message: &[u8], signature: &[u8]) -> Result<()>
where
    D: Digest + AssociatedOid,
{
    let key = rsa::RsaPublicKey::try_from(key)
        .map_err(|e| Error::BadSignature(format!("invalid RSA public key: {e:?}")))?;
    let signature = rsa::pkcs1v15::Signature::try_from(signature)
        .map_err(|e| Error::BadSignature(format!("invalid RSA signature: {e}")))?;

    rsa::pkcs1v15::VerifyingKey::<D>::new(key)
        .verify(message, &signature)
        .map_err(|e| Error::BadSignature(format!("signer does not RSA sign signee: {e}")))
}

fn verify_p384(key: SubjectPublicKeyInfoRef<'_>, message: &[u8], signature: &[u8]) -> Result<()> {
    let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(key.subject_public_key.raw_bytes())
        .map_err(|e| Error::BadSignature(format!("invalid P-384 public key: {e}")))?;
    let signature = p384::ecdsa::Signature::from_der(signature)
        .map_err(|e| Error::BadSignature(format!("invalid ECDSA signature: {e}")))?;

    key.verify(message, &signature)
        .map_err(|e| Error::BadSignature(format!("signer does not ECDSA sign signee: {e}")))
}

impl Certificate {
    /// Gets a reference to the X509 certificate inside
    pub fn cert(&self) -> &x509_cert::Certificate {
        &self.0
    }

    /// Create a Certificate from a PEM document holding exactly one
    /// certificate.
    ///
    /// The text must pass the strict checks in [`crate::pem`]. The shipped
    /// placeholder is reported as [`Error::Placeholder`].
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        if builtin::is_placeholder(pem) {
            return Err(Error::Placeholder);
        }

        let mut blocks = pem::decode_certificates(pem)?;
        if blocks.len() != 1 {
            return Err(Error::InvalidCertificate(format!(
                "expected one certificate, found {}",
                blocks.len()
            )));
        }

        Self::from_der(&blocks.remove(0))
    }

    /// Serialize a Certificate struct to PEM.
    pub fn to_pem(&self) -> Result<String> {
        self.0
            .to_pem(der::pem::LineEnding::LF)
            .map_err(|e| Error::InvalidCertificate(format!("PEM-encoding failed: {e}")))
    }

    /// Create a Certificate from a DER-encoded X509 structure.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let cert = x509_cert::Certificate::from_der(der)
            .map_err(|e| Error::InvalidCertificate(format!("invalid DER: {e}")))?;
        Ok(Self(cert))
    }

    /// Serialize a Certificate struct to DER.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.0
            .to_der()
            .map_err(|e| Error::InvalidCertificate(format!("DER-encoding failed: {e}")))
    }

    /// Subject distinguished name in RFC 4514 form.
    pub fn subject(&self) -> String {
        self.0.tbs_certificate.subject.to_string()
    }

    /// Issuer distinguished name in RFC 4514 form.
    pub fn issuer(&self) -> String {
        self.0.tbs_certificate.issuer.to_string()
    }

    /// Start of the validity period.
    pub fn not_before(&self) -> SystemTime {
        self.0.tbs_certificate.validity.not_before.to_system_time()
    }

    /// End of the validity period.
    pub fn not_after(&self) -> SystemTime {
        self.0.tbs_certificate.validity.not_after.to_system_time()
    }

    /// Whether `time` falls within the validity period, bounds included.
    pub fn is_valid_at(&self, time: SystemTime) -> bool {
        self.not_before() <= time && time <= self.not_after()
    }

    /// Whether the basicConstraints extension marks this as a CA.
    ///
    /// A missing or undecodable extension counts as "not a CA".
    pub fn is_ca(&self) -> bool {
        self.0
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == BASIC_CONSTRAINTS_OID)
            .and_then(|ext| BasicConstraints::from_der(ext.extn_value.as_bytes()).ok())
            .map(|constraints| constraints.ca)
            .unwrap_or(false)
    }

    /// Whether subject and issuer match and the certificate's own key
    /// verifies its signature.
    pub fn is_self_signed(&self) -> bool {
        self.0.tbs_certificate.subject == self.0.tbs_certificate.issuer
            && (self, self).verify().is_ok()
    }

    /// SHA-256 digest of the DER encoding.
    pub fn fingerprint_sha256(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.to_der()?).into())
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fingerprint_sha256() {
            Ok(fp) => write!(f, "{} (sha256 {})", self.subject(), hex::encode(fp)),
            Err(_) => write!(f, "{}", self.subject()),
        }
    }
}

impl From<x509_cert::Certificate> for Certificate {
    fn from(value: x509_cert::Certificate) -> Self {
        Self(value)
    }
}

impl From<Certificate> for x509_cert::Certificate {
    fn from(Certificate(cert): Certificate) -> Self {
        cert
    }
}
