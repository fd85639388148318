//! Streaming one-way hashes.

use digest::{Digest, DynDigest};

use crate::{Error, Result};

/// Supported hash algorithms.
///
/// MD5 and SHA-1 are broken for collision resistance and exist only to
/// process legacy certificates; the SHA-512 truncations perform better than
/// SHA-256 on 64-bit machines.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HashAlgorithm {
    /// MD5 (16 byte digest, legacy only).
    Md5,
    /// SHA-1 (20 byte digest, legacy only).
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA-512/224.
    Sha512_224,
    /// SHA-512/256.
    Sha512_256,
    /// SM3 (GB/T 32905), used with the SM2 curve.
    Sm3,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 9] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha512_224,
        HashAlgorithm::Sha512_256,
        HashAlgorithm::Sm3,
    ];

    /// Digest size in bytes.
    pub fn size(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 | HashAlgorithm::Sha512_224 => 28,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha512_256 | HashAlgorithm::Sm3 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    fn context(&self) -> Box<dyn DynDigest> {
        match self {
            HashAlgorithm::Md5 => Box::new(md5::Md5::new()),
            HashAlgorithm::Sha1 => Box::new(sha1::Sha1::new()),
            HashAlgorithm::Sha224 => Box::new(sha2::Sha224::new()),
            HashAlgorithm::Sha256 => Box::new(sha2::Sha256::new()),
            HashAlgorithm::Sha384 => Box::new(sha2::Sha384::new()),
            HashAlgorithm::Sha512 => Box::new(sha2::Sha512::new()),
            HashAlgorithm::Sha512_224 => Box::new(sha2::Sha512_224::new()),
            HashAlgorithm::Sha512_256 => Box::new(sha2::Sha512_256::new()),
            HashAlgorithm::Sm3 => Box::new(sm3::Sm3::new()),
        }
    }
}

/// A streaming hash.
///
/// ```
/// use pkcrypto::hash::{Hash, HashAlgorithm};
///
/// let mut hash = Hash::new(HashAlgorithm::Sha256);
/// hash.update(b"abc");
/// let digest = hash.finish();
/// assert_eq!(digest.len(), 32);
/// ```
pub struct Hash {
    alg: HashAlgorithm,
    state: Box<dyn DynDigest>,
}

impl Hash {
    /// New hash in the algorithm's initial state.
    pub fn new(alg: HashAlgorithm) -> Self {
        Self {
            alg,
            state: alg.context(),
        }
    }

    /// One-shot digest of `data`.
    pub fn digest(alg: HashAlgorithm, data: &[u8]) -> Vec<u8> {
        let mut hash = Self::new(alg);
        hash.update(data);
        hash.finish()
    }

    /// The algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.alg
    }

    /// Digest size in bytes.
    pub fn size(&self) -> usize {
        self.alg.size()
    }

    /// Absorb data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Snapshot up to `len` leading bytes of the current digest without
    /// disturbing the streaming state.
    pub fn get_tag(&self, len: usize) -> Result<Vec<u8>> {
        if len == 0 || len > self.size() {
            return Err(Error::Contract("tag length out of range"));
        }
        let snapshot = self.state.box_clone();
        let mut full = snapshot.finalize().into_vec();
        full.truncate(len);
        Ok(full)
    }

    /// Produce the digest and reset to the initial state.
    pub fn finish(&mut self) -> Vec<u8> {
        self.state.finalize_reset().into_vec()
    }

    /// Reset to the initial state, discarding absorbed data.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

impl Clone for Hash {
    fn clone(&self) -> Self {
        Self {
            alg: self.alg,
            state: self.state.box_clone(),
        }
    }
}

impl core::fmt::Debug for Hash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Hash({:?})", self.alg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_a_prefix_snapshot() {
        let mut hash = Hash::new(HashAlgorithm::Sha256);
        hash.update(b"partial");
        let full = hash.get_tag(32).unwrap();
        let short = hash.get_tag(8).unwrap();
        assert_eq!(short, full[..8]);
        assert!(hash.get_tag(0).is_err());
        assert!(hash.get_tag(33).is_err());
        // the snapshot did not disturb the stream
        assert_eq!(hash.finish(), full);
    }

    #[test]
    fn finish_resets() {
        let mut hash = Hash::new(HashAlgorithm::Sm3);
        hash.update(b"abc");
        let first = hash.finish();
        hash.update(b"abc");
        assert_eq!(hash.finish(), first);
    }
}
