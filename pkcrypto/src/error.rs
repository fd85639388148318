//! Error type.

use core::fmt;

/// Cryptographic operation errors.
///
/// Signature and padding *mismatches* are not errors — verify operations
/// return `bool` and OAEP decryption returns `Option`, so a remote peer
/// cannot distinguish failure causes. Errors are reserved for misuse of the
/// API and for key-material failures.
#[derive(Debug)]
pub enum Error {
    /// The caller passed an inconsistent argument set.
    Contract(&'static str),
    /// Key generation could not complete.
    KeyGeneration(&'static str),
    /// A point is not on its curve, or point data is malformed.
    InvalidPoint,
    /// The hash algorithm is not usable with this operation.
    UnsupportedAlgorithm,
    /// Arithmetic error from the bignum layer.
    Bignum(bignum::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Contract(what) => write!(f, "invalid argument: {what}"),
            Error::KeyGeneration(what) => write!(f, "key generation failed: {what}"),
            Error::InvalidPoint => f.write_str("invalid curve point"),
            Error::UnsupportedAlgorithm => f.write_str("unsupported hash algorithm"),
            Error::Bignum(err) => write!(f, "bignum: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bignum(err) => Some(err),
            _ => None,
        }
    }
}

impl From<bignum::Error> for Error {
    fn from(err: bignum::Error) -> Self {
        Error::Bignum(err)
    }
}

/// Result type with the `pkcrypto` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
