#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! Public-key cryptography values and operations for PKI.
//!
//! Four groups of primitives, sized for X.509/TLS certificate work:
//!
//! - [`hash`] / [`hmac`] — streaming digests over MD5, SHA-1, the SHA-2
//!   family and SM3, with keyed MACs;
//! - [`rsa`] — RSA key values and generation, plus the RFC 8017 schemes:
//!   OAEP encryption, PKCS#1 v1.5 and PSS signatures;
//! - [`ecc`] — the named NIST/SECG prime-field curves and SM2, with SEC1
//!   point encoding;
//! - [`ecdsa`] / [`ecdh`] — signatures over precomputed digests and
//!   Diffie-Hellman agreement.
//!
//! Every operation that consumes randomness takes a caller-supplied
//! `rand_core` CSPRNG handle. Verification mismatches are return values
//! (`bool`, `Option`), never errors, so callers cannot leak failure causes
//! to a peer; key material is zeroized on drop throughout.

pub mod ecc;
pub mod ecdh;
pub mod ecdsa;
pub mod hash;
pub mod hmac;
pub mod rsa;

mod error;

pub use crate::ecc::{EcCurve, EcCurveId, EcPoint};
pub use crate::error::{Error, Result};
pub use crate::hash::{Hash, HashAlgorithm};
pub use crate::hmac::Hmac;
pub use crate::rsa::{RsaPrivateKey, RsaPublicKey};
