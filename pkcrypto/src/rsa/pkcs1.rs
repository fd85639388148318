//! RSASSA-PKCS1-v1_5 signatures (RFC 8017 section 8.2).
//!
//! The scheme is deterministic: the digest is wrapped in a fixed
//! `DigestInfo` prefix, padded with `ff` bytes, and run through the
//! private-key primitive. TLS 1.3 still requires verification of these
//! signatures for certificates.

use bignum::Bignum;
use zeroize::Zeroizing;

use super::{RsaPrivateKey, RsaPublicKey};
use crate::hash::{Hash, HashAlgorithm};
use crate::{Error, Result};

/// Signature size in bytes: the byte width of the modulus.
pub fn signature_len(key: &RsaPublicKey) -> usize {
    key.width_bytes()
}

/// Sign `msg` with the private key.
pub fn sign(key: &RsaPrivateKey, alg: HashAlgorithm, msg: &[u8]) -> Result<Vec<u8>> {
    let em = encode(&key.pub_key(), alg, msg)?;
    let m = Bignum::from_bytes_be(&em);
    let s = key.decrypt_primitive(&m)?;
    Ok(s.to_bytes_be_padded(key.width_bytes())?)
}

/// Verify a signature over `msg`. Any mismatch, including a wrong
/// signature size, returns `false`.
pub fn verify(key: &RsaPublicKey, alg: HashAlgorithm, msg: &[u8], signature: &[u8]) -> bool {
    if signature.len() != key.width_bytes() {
        return false;
    }
    let expected = match encode(key, alg, msg) {
        Ok(em) => em,
        Err(_) => return false,
    };
    let s = Bignum::from_bytes_be(signature);
    let em = match key
        .encrypt_primitive(&s)
        .and_then(|m| m.to_bytes_be_padded(key.width_bytes()).map_err(Error::from))
    {
        Ok(em) => em,
        Err(_) => return false,
    };
    em == *expected
}

// EMSA-PKCS1-v1_5: 00 01 ff..ff 00 DigestInfo(alg, H(msg))
fn encode(key: &RsaPublicKey, alg: HashAlgorithm, msg: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let prefix = digest_info_prefix(alg)?;
    let digest = Hash::digest(alg, msg);
    let k = key.width_bytes();
    let t_len = prefix.len() + digest.len();
    if k < t_len + 11 {
        return Err(Error::Contract("key too small for hash"));
    }
    let mut em = Zeroizing::new(vec![0xff; k]);
    em[0] = 0x00;
    em[1] = 0x01;
    em[k - t_len - 1] = 0x00;
    em[k - t_len..k - digest.len()].copy_from_slice(prefix);
    em[k - digest.len()..].copy_from_slice(&digest);
    Ok(em)
}

// DER prefix of DigestInfo ::= SEQUENCE { AlgorithmIdentifier, OCTET
// STRING } up to the digest bytes, per RFC 8017 section 9.2 note 1.
fn digest_info_prefix(alg: HashAlgorithm) -> Result<&'static [u8]> {
    Ok(match alg {
        HashAlgorithm::Md5 => &[
            0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x02, 0x05,
            0x05, 0x00, 0x04, 0x10,
        ],
        HashAlgorithm::Sha1 => &[
            0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04,
            0x14,
        ],
        HashAlgorithm::Sha224 => &[
            0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x04, 0x05, 0x00, 0x04, 0x1c,
        ],
        HashAlgorithm::Sha256 => &[
            0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x01, 0x05, 0x00, 0x04, 0x20,
        ],
        HashAlgorithm::Sha384 => &[
            0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x02, 0x05, 0x00, 0x04, 0x30,
        ],
        HashAlgorithm::Sha512 => &[
            0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
            0x03, 0x05, 0x00, 0x04, 0x40,
        ],
        _ => return Err(Error::UnsupportedAlgorithm),
    })
}
