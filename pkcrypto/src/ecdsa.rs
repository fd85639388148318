//! ECDSA signing and verification over a precomputed message digest.
//!
//! Signing a message with e.g. ecdsa_secp256r1_sha256 is a two step
//! process: hash the message with SHA-256, then sign the digest here. The
//! ephemeral scalar is caller-supplied — a fresh one per signature, never
//! equal to the regular key. Reusing or leaking an ephemeral reveals the
//! private key.

use bignum::Bignum;

use crate::ecc::{EcCurve, EcPoint};
use crate::{Error, Result};

/// Sign `digest` with the regular private key and a distinct ephemeral
/// private key, both scalars on `curve`. Returns the signature pair
/// `(r, s)`.
pub fn sign(
    curve: &EcCurve,
    reg_private: &Bignum,
    eph_private: &Bignum,
    digest: &[u8],
) -> Result<(Bignum, Bignum)> {
    if digest.is_empty() {
        return Err(Error::Contract("empty digest"));
    }
    if reg_private == eph_private {
        return Err(Error::Contract(
            "ephemeral key must differ from the regular key",
        ));
    }
    let n = curve.order();
    for key in [reg_private, eph_private] {
        if key.is_zero() || key.is_negative() || key >= n {
            return Err(Error::Contract("private key out of range"));
        }
    }

    let z = truncate_digest(digest, n);

    // r = ([k]G).x mod n
    let kg = curve.public_key(eph_private)?;
    let (x, _) = kg.coordinates().ok_or(Error::InvalidPoint)?;
    let r = x.mod_floor(n)?;
    if r.is_zero() {
        return Err(Error::KeyGeneration("ephemeral produced r = 0"));
    }

    // s = k^-1 (z + r d) mod n
    let k_inv = eph_private
        .mod_inverse(n)
        .ok_or(Error::KeyGeneration("ephemeral is not invertible"))?;
    let s = (&k_inv * &(&z + &(&r * reg_private))).mod_floor(n)?;
    if s.is_zero() {
        return Err(Error::KeyGeneration("ephemeral produced s = 0"));
    }
    Ok((r, s))
}

/// Verify an `(r, s)` signature over `digest` against a public point.
/// Any mismatch, invalid point or out-of-range scalar returns `false`.
pub fn verify(public: &EcPoint, digest: &[u8], r: &Bignum, s: &Bignum) -> bool {
    verify_inner(public, digest, r, s).unwrap_or(false)
}

fn verify_inner(public: &EcPoint, digest: &[u8], r: &Bignum, s: &Bignum) -> Result<bool> {
    if digest.is_empty() || !public.is_valid() {
        return Ok(false);
    }
    let n = public.order().clone();
    let one = Bignum::from(1u32);
    if r < &one || s < &one || r >= &n || s >= &n {
        return Ok(false);
    }

    let z = truncate_digest(digest, &n);
    let Some(w) = s.mod_inverse(&n) else {
        return Ok(false);
    };
    let u1 = (&z * &w).mod_floor(&n)?;
    let u2 = (r * &w).mod_floor(&n)?;

    // X = [u1]G + [u2]Q
    let curve = EcCurve::from_params(public.params());
    let lhs = curve.base_point().mul(&u1)?;
    let x_point = lhs.add(&public.mul(&u2)?)?;
    let Some((x, _)) = x_point.coordinates() else {
        return Ok(false);
    };
    Ok(x.mod_floor(&n)? == *r)
}

// Leftmost min(digest bits, order bits) bits of the digest.
fn truncate_digest(digest: &[u8], n: &Bignum) -> Bignum {
    let z = Bignum::from_bytes_be(digest);
    let digest_bits = digest.len() * 8;
    let n_bits = n.width();
    if digest_bits > n_bits {
        z >> (digest_bits - n_bits)
    } else {
        z
    }
}
