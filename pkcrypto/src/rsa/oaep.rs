//! RSAES-OAEP encryption (RFC 8017 section 7.1).

use bignum::{Bignum, CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use super::mgf::mgf1_xor;
use super::{RsaPrivateKey, RsaPublicKey};
use crate::hash::{Hash, HashAlgorithm};
use crate::{Error, Result};

/// Largest plaintext the key and hash can carry:
/// `width_bytes - 2 * hash_size - 2`.
pub fn max_msg_len(key: &RsaPublicKey, alg: HashAlgorithm) -> usize {
    key.width_bytes().saturating_sub(2 * alg.size() + 2)
}

/// Ciphertext size: the byte width of the modulus.
pub fn cipher_len(key: &RsaPublicKey) -> usize {
    key.width_bytes()
}

/// Encrypt `msg` under `key`.
///
/// The optional `label` is authenticated but not transmitted; pass the
/// same bytes to [`decrypt`]. Refuses messages longer than
/// [`max_msg_len`].
pub fn encrypt<R: CryptoRng + RngCore + ?Sized>(
    rng: &mut R,
    key: &RsaPublicKey,
    alg: HashAlgorithm,
    msg: &[u8],
    label: &[u8],
) -> Result<Vec<u8>> {
    let k = key.width_bytes();
    let h_len = alg.size();
    if k < 2 * h_len + 2 {
        return Err(Error::Contract("key too small for hash"));
    }
    if msg.len() > max_msg_len(key, alg) {
        return Err(Error::Contract("message too large"));
    }

    // EM = 00 || masked seed || masked DB
    let mut em = Zeroizing::new(vec![0u8; k]);
    let (seed, db) = em[1..].split_at_mut(h_len);

    rng.fill_bytes(seed);
    db[..h_len].copy_from_slice(&Hash::digest(alg, label));
    let msg_start = db.len() - msg.len();
    db[msg_start - 1] = 0x01;
    db[msg_start..].copy_from_slice(msg);

    mgf1_xor(alg, seed, db);
    let (seed, db) = em[1..].split_at_mut(h_len);
    mgf1_xor(alg, db, seed);

    let m = Bignum::from_bytes_be(&em);
    let c = key.encrypt_primitive(&m)?;
    Ok(c.to_bytes_be_padded(k)?)
}

/// Decrypt a ciphertext produced by [`encrypt`].
///
/// A ciphertext of the wrong length is a caller error; a failed padding
/// check returns `Ok(None)` after a full constant-time scan, so the
/// failure cause is not observable as a timing oracle.
pub fn decrypt(
    key: &RsaPrivateKey,
    alg: HashAlgorithm,
    cipher: &[u8],
    label: &[u8],
) -> Result<Option<Zeroizing<Vec<u8>>>> {
    let k = key.width_bytes();
    let h_len = alg.size();
    if cipher.len() != k {
        return Err(Error::Contract("ciphertext length mismatch"));
    }
    if k < 2 * h_len + 2 {
        return Err(Error::Contract("key too small for hash"));
    }

    let c = Bignum::from_bytes_be(cipher);
    let m = key.decrypt_primitive(&c)?;
    let mut em = Zeroizing::new(m.to_bytes_be_padded(k)?);

    let first_zero = em[0].ct_eq(&0);
    let (seed, db) = em[1..].split_at_mut(h_len);
    mgf1_xor(alg, db, seed);
    mgf1_xor(alg, seed, db);

    let l_hash = Hash::digest(alg, label);
    let hash_ok = db[..h_len].ct_eq(&l_hash);

    // scan the payload for the 0x01 separator without branching on data
    let payload = &db[h_len..];
    let mut looking = Choice::from(1u8);
    let mut invalid = Choice::from(0u8);
    let mut index = 0u32;
    for (i, byte) in payload.iter().enumerate() {
        let is_zero = byte.ct_eq(&0);
        let is_one = byte.ct_eq(&1);
        index.conditional_assign(&(i as u32), looking & is_one);
        invalid |= looking & !is_zero & !is_one;
        looking &= !is_one;
    }

    let valid = first_zero & hash_ok & !looking & !invalid;
    if valid.into() {
        Ok(Some(Zeroizing::new(
            payload[index as usize + 1..].to_vec(),
        )))
    } else {
        Ok(None)
    }
}
