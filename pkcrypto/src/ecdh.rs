//! Elliptic curve Diffie-Hellman key agreement.

use bignum::Bignum;

use crate::ecc::EcPoint;
use crate::{Error, Result};

/// Compute the shared secret from our private scalar and the peer's
/// public point: the x coordinate of `[d]Q`.
///
/// Both parties arrive at the same value; feed it to a KDF rather than
/// using it directly as a symmetric key.
pub fn shared_secret(private: &Bignum, peer_public: &EcPoint) -> Result<Bignum> {
    if !peer_public.is_valid() {
        return Err(Error::InvalidPoint);
    }
    if private.is_zero() || private.is_negative() || private >= peer_public.order() {
        return Err(Error::Contract("private key out of range"));
    }
    let shared = peer_public.mul(private)?;
    let (x, _) = shared.coordinates().ok_or(Error::InvalidPoint)?;
    Ok(x.clone())
}
