//! Error type.

use core::fmt;

/// Certificate processing errors.
///
/// Structure errors carry the location that failed ("tbs validity: ...");
/// codec and crypto errors propagate from the lower layers unchanged.
/// Signature verification mismatches are `bool` returns, never errors.
#[derive(Debug)]
pub enum Error {
    /// A document does not have the expected shape.
    Malformed(String),
    /// The certificate is not X.509 version 3.
    UnsupportedVersion,
    /// The operation needs a different key or signature algorithm.
    AlgorithmMismatch(&'static str),
    /// DER or PEM error.
    Der(dertree::Error),
    /// Cryptographic error.
    Crypto(pkcrypto::Error),
    /// Arithmetic error.
    Bignum(bignum::Error),
}

impl Error {
    pub(crate) fn malformed(context: &str, what: &str) -> Self {
        Error::Malformed(format!("{context}: {what}"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed(what) => write!(f, "malformed certificate data: {what}"),
            Error::UnsupportedVersion => {
                f.write_str("only X.509 version 3 certificates are supported")
            }
            Error::AlgorithmMismatch(what) => write!(f, "algorithm mismatch: {what}"),
            Error::Der(err) => write!(f, "der: {err}"),
            Error::Crypto(err) => write!(f, "crypto: {err}"),
            Error::Bignum(err) => write!(f, "bignum: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Der(err) => Some(err),
            Error::Crypto(err) => Some(err),
            Error::Bignum(err) => Some(err),
            _ => None,
        }
    }
}

impl From<dertree::Error> for Error {
    fn from(err: dertree::Error) -> Self {
        Error::Der(err)
    }
}

impl From<pkcrypto::Error> for Error {
    fn from(err: pkcrypto::Error) -> Self {
        Error::Crypto(err)
    }
}

impl From<bignum::Error> for Error {
    fn from(err: bignum::Error) -> Self {
        Error::Bignum(err)
    }
}

/// Result type with the `pkix` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
