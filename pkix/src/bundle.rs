//! Certificate bundles.

use core::ops::Deref;
use std::io::BufRead;

use dertree::PemDocument;

use crate::x509::{CERTIFICATE_PEM_LABEL, X509Cert};
use crate::{Error, Result};

/// A list of X.509 certificates read from concatenated `CERTIFICATE` PEM
/// blocks, the format trust stores ship root certificates in.
///
/// ```text
/// -----BEGIN CERTIFICATE-----
/// <cert 1>
/// -----END CERTIFICATE-----
/// -----BEGIN CERTIFICATE-----
/// <cert 2>
/// -----END CERTIFICATE-----
/// ```
#[derive(Debug, Default)]
pub struct CertBundle {
    certs: Vec<X509Cert>,
}

impl CertBundle {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read certificates until end of stream.
    ///
    /// A clean end of stream between blocks terminates the parse; any
    /// framing, label, DER or certificate error is fatal.
    pub fn parse(reader: &mut impl BufRead) -> Result<Self> {
        let mut certs = Vec::new();
        loop {
            let mut pem = PemDocument::new(CERTIFICATE_PEM_LABEL);
            if !pem.parse_next(reader)? {
                break;
            }
            if pem.label() != CERTIFICATE_PEM_LABEL {
                return Err(Error::malformed("certificate bundle", "wrong pem label"));
            }
            certs.push(X509Cert::parse(pem.document())?);
        }
        Ok(Self { certs })
    }

    /// Parse from text.
    pub fn parse_str(text: &str) -> Result<Self> {
        Self::parse(&mut text.as_bytes())
    }

    /// Add a certificate.
    pub fn push(&mut self, cert: X509Cert) {
        self.certs.push(cert);
    }

    /// The certificates.
    pub fn certs(&self) -> &[X509Cert] {
        &self.certs
    }
}

impl Deref for CertBundle {
    type Target = [X509Cert];

    fn deref(&self) -> &[X509Cert] {
        &self.certs
    }
}

impl IntoIterator for CertBundle {
    type Item = X509Cert;
    type IntoIter = std::vec::IntoIter<X509Cert>;

    fn into_iter(self) -> Self::IntoIter {
        self.certs.into_iter()
    }
}
