//! RSASSA-PSS signatures (RFC 8017 section 8.1).
//!
//! `rsa_pss_rsae_sha256` is a required signature scheme in TLS 1.3.
//! Typical salt lengths are zero and the hash size.

use bignum::{Bignum, CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::mgf::mgf1_xor;
use super::{RsaPrivateKey, RsaPublicKey};
use crate::hash::{Hash, HashAlgorithm};
use crate::{Error, Result};

/// Signature size in bytes: the byte width of the modulus.
pub fn signature_len(key: &RsaPublicKey) -> usize {
    key.width_bytes()
}

/// Sign `msg`, drawing `salt_len` random salt bytes from `rng`.
pub fn sign<R: CryptoRng + RngCore + ?Sized>(
    rng: &mut R,
    key: &RsaPrivateKey,
    alg: HashAlgorithm,
    salt_len: usize,
    msg: &[u8],
) -> Result<Vec<u8>> {
    let em_bits = key.width().saturating_sub(1);
    let em_len = em_bits.div_ceil(8);
    let h_len = alg.size();
    if em_len < h_len + salt_len + 2 {
        return Err(Error::Contract("salt too large for key"));
    }

    let mut salt = Zeroizing::new(vec![0u8; salt_len]);
    rng.fill_bytes(&mut salt);

    // H = Hash(00*8 || mHash || salt)
    let mut hash = Hash::new(alg);
    hash.update(&[0u8; 8]);
    hash.update(&Hash::digest(alg, msg));
    hash.update(&salt);
    let h = hash.finish();

    // DB = PS || 01 || salt, masked by MGF1(H)
    let mut em = Zeroizing::new(vec![0u8; em_len]);
    let db_len = em_len - h_len - 1;
    em[db_len - salt_len - 1] = 0x01;
    em[db_len - salt_len..db_len].copy_from_slice(&salt);
    mgf1_xor(alg, &h, &mut em[..db_len]);
    em[0] &= 0xff >> (8 * em_len - em_bits);
    em[db_len..em_len - 1].copy_from_slice(&h);
    em[em_len - 1] = 0xbc;

    let m = Bignum::from_bytes_be(&em);
    let s = key.decrypt_primitive(&m)?;
    Ok(s.to_bytes_be_padded(key.width_bytes())?)
}

/// Verify a signature over `msg` with the salt length used at signing.
/// Any mismatch returns `false`.
pub fn verify(
    key: &RsaPublicKey,
    alg: HashAlgorithm,
    salt_len: usize,
    msg: &[u8],
    signature: &[u8],
) -> bool {
    verify_inner(key, alg, salt_len, msg, signature).unwrap_or(false)
}

fn verify_inner(
    key: &RsaPublicKey,
    alg: HashAlgorithm,
    salt_len: usize,
    msg: &[u8],
    signature: &[u8],
) -> Result<bool> {
    if signature.len() != key.width_bytes() {
        return Ok(false);
    }
    let em_bits = key.width().saturating_sub(1);
    let em_len = em_bits.div_ceil(8);
    let h_len = alg.size();
    if em_len < h_len + salt_len + 2 {
        return Ok(false);
    }

    let s = Bignum::from_bytes_be(signature);
    let m = key.encrypt_primitive(&s)?;
    if m.byte_len() > em_len {
        return Ok(false);
    }
    let mut em = Zeroizing::new(m.to_bytes_be_padded(em_len)?);

    if em[em_len - 1] != 0xbc {
        return Ok(false);
    }
    let unused_bits = 8 * em_len - em_bits;
    if unused_bits > 0 && em[0] >> (8 - unused_bits) != 0 {
        return Ok(false);
    }

    let db_len = em_len - h_len - 1;
    let h = em[db_len..em_len - 1].to_vec();
    mgf1_xor(alg, &h, &mut em[..db_len]);
    em[0] &= 0xff >> (8 * em_len - em_bits);

    // DB must be PS zeroes, a 01 separator, then the salt
    let sep = db_len - salt_len - 1;
    if em[..sep].iter().any(|&b| b != 0) || em[sep] != 0x01 {
        return Ok(false);
    }
    let salt = &em[sep + 1..db_len];

    let mut hash = Hash::new(alg);
    hash.update(&[0u8; 8]);
    hash.update(&Hash::digest(alg, msg));
    hash.update(salt);
    let expected = hash.finish();
    Ok(expected.ct_eq(&h).into())
}
