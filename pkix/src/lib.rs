#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! X.509 certificate model for TLS public-key infrastructure.
//!
//! Builds the RFC 5280 structures on top of the [`dertree`] codec and the
//! [`pkcrypto`] value types:
//!
//! - [`SubjectPublicKeyInfo`] and the [`KeyAlgorithm`] it names;
//! - stateless key documents ([`RsaPublicKeyDoc`], [`RsaPrivateKeyDoc`],
//!   [`EcParametersDoc`], [`EcPublicKeyDoc`], [`EcPrivateKeyDoc`]) pairing
//!   DER sequences with their customary PEM labels;
//! - X.500 names ([`DirectoryString`], [`RelativeDistinguishedName`]) and
//!   [`GeneralName`] alternatives;
//! - typed certificate [`Extension`]s, with unknown oids retained;
//! - [`X509Cert`] — version 3 parse, build, RSA/ECDSA signing
//!   ([`X509Cert::sign_and_dump_rsa`], [`X509Cert::sign_and_dump_ecdsa`])
//!   and signature verification against an issuer key, including the
//!   self-signature check used for trust anchors;
//! - [`CertBundle`] — concatenated `CERTIFICATE` PEM blocks.
//!
//! Verification mismatches are `bool` results; structural errors carry the
//! field that failed. Name comparison is byte-exact (RFC 4518 string
//! preparation is out of scope).

mod bundle;
mod error;
mod extension;
mod general_name;
mod keys;
mod name;
pub mod oids;
mod spki;
mod x509;

pub use crate::bundle::CertBundle;
pub use crate::error::{Error, Result};
pub use crate::extension::{
    AuthorityKeyIdentifier, ExtendedKeyUsage, Extension, ExtensionValue, KeyUsage,
};
pub use crate::general_name::GeneralName;
pub use crate::keys::{
    EcParametersDoc, EcPrivateKeyDoc, EcPublicKeyDoc, RsaPrivateKeyDoc, RsaPublicKeyDoc,
};
pub use crate::name::{
    AttributeType, DirectoryString, DirectoryStringKind, RelativeDistinguishedName,
};
pub use crate::spki::{KeyAlgorithm, SubjectPublicKeyInfo};
pub use crate::x509::{CERTIFICATE_PEM_LABEL, X509Cert, X509SignatureAlgo};
