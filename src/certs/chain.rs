// SPDX-License-Identifier: Apache-2.0

use super::*;

use crate::pem;

/// A certificate chain in the order a TLS server presents it: the
/// end-entity certificate first, each following certificate issuing the one
/// before it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chain {
    /// The certificates, end-entity first.
    pub certificates: Vec<Certificate>,
}

/// Verify that every certificate is signed by the one after it, and that
/// the last one signs itself if it claims to be self-issued.
impl<'a> Verifiable for &'a Chain {
    type Output = &'a Certificate;

    fn verify(self) -> Result<Self::Output> {
        let top = self.top()?;

        for pair in self.certificates.windows(2) {
            (&pair[1], &pair[0]).verify()?;
        }

        if top.subject() == top.issuer() {
            (top, top).verify()?;
        }

        Ok(top)
    }
}

impl From<Vec<Certificate>> for Chain {
    fn from(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }
}

impl Chain {
    /// Deserialize a list of DER-encoded certificates, end-entity first.
    pub fn from_der<T: AsRef<[u8]>>(ders: &[T]) -> Result<Self> {
        let certificates = ders
            .iter()
            .map(|der| Certificate::from_der(der.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if certificates.is_empty() {
            return Err(Error::EmptyChain);
        }

        Ok(Self { certificates })
    }

    /// Deserialize a PEM bundle, end-entity first.
    pub fn from_pem(bundle: &[u8]) -> Result<Self> {
        if builtin::is_placeholder(bundle) {
            return Err(Error::Placeholder);
        }

        Self::from_der(pem::decode_certificates(bundle)?.as_slice())
    }

    /// The end-entity (first) certificate.
    pub fn end_entity(&self) -> Result<&Certificate> {
        self.certificates.first().ok_or(Error::EmptyChain)
    }

    /// The last certificate presented. Servers usually stop at an
    /// intermediate, in which case this is not the root.
    pub fn top(&self) -> Result<&Certificate> {
        self.certificates.last().ok_or(Error::EmptyChain)
    }

    /// The root CA, if the server included it.
    pub fn root(&self) -> Option<&Certificate> {
        self.certificates
            .last()
            .filter(|cert| cert.is_ca() && cert.is_self_signed())
    }

    /// Serialize the whole chain as a PEM bundle.
    pub fn to_pem(&self) -> Result<String> {
        let mut bundle = String::new();
        for cert in &self.certificates {
            bundle.push_str(cert.to_pem()?.trim_end());
            bundle.push('\n');
        }

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certs::builtin::isrg;

    #[test]
    fn single_root_is_its_own_chain() {
        let chain = Chain::from_pem(isrg::ROOT_X1).unwrap();

        assert_eq!(chain.certificates.len(), 1);
        assert_eq!(chain.verify().unwrap(), chain.end_entity().unwrap());
        assert!(chain.root().is_some());
    }

    #[test]
    fn unrelated_roots_do_not_chain() {
        let mut bundle = isrg::ROOT_X1.to_vec();
        bundle.extend_from_slice(isrg::ROOT_X2);
        let chain = Chain::from_pem(&bundle).unwrap();

        assert!(chain.verify().is_err());
    }

    #[test]
    fn empty_chain() {
        let chain = Chain::from(Vec::new());

        assert!(matches!(chain.top(), Err(Error::EmptyChain)));
        assert!(matches!(chain.verify(), Err(Error::EmptyChain)));
        assert!(chain.root().is_none());
        assert!(matches!(
            Chain::from_der::<Vec<u8>>(&[]),
            Err(Error::EmptyChain)
        ));
    }

    #[test]
    fn pem_bundle_round_trip() {
        let mut bundle = isrg::ROOT_X1.to_vec();
        bundle.extend_from_slice(isrg::ROOT_X2);
        let chain = Chain::from_pem(&bundle).unwrap();

        let again = Chain::from_pem(chain.to_pem().unwrap().as_bytes()).unwrap();
        assert_eq!(chain, again);
    }
}
