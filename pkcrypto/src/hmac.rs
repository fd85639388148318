//! Keyed message authentication (HMAC, RFC 2104).

use hmac::{Hmac as HmacCore, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sm3::Sm3;

use crate::hash::HashAlgorithm;

enum State {
    Md5(HmacCore<Md5>),
    Sha1(HmacCore<Sha1>),
    Sha224(HmacCore<Sha224>),
    Sha256(HmacCore<Sha256>),
    Sha384(HmacCore<Sha384>),
    Sha512(HmacCore<Sha512>),
    Sha512_224(HmacCore<Sha512_224>),
    Sha512_256(HmacCore<Sha512_256>),
    Sm3(HmacCore<Sm3>),
}

macro_rules! dispatch {
    ($state:expr, $mac:ident => $body:expr) => {
        match $state {
            State::Md5($mac) => $body,
            State::Sha1($mac) => $body,
            State::Sha224($mac) => $body,
            State::Sha256($mac) => $body,
            State::Sha384($mac) => $body,
            State::Sha512($mac) => $body,
            State::Sha512_224($mac) => $body,
            State::Sha512_256($mac) => $body,
            State::Sm3($mac) => $body,
        }
    };
}

/// A streaming HMAC over any [`HashAlgorithm`].
///
/// [`Hmac::finish`] and [`Hmac::reset`] both return the state to
/// just-keyed, so one keyed instance can authenticate a sequence of
/// messages.
pub struct Hmac {
    alg: HashAlgorithm,
    state: State,
}

impl Hmac {
    /// New HMAC keyed with `key`. Any key length is usable; keys longer
    /// than the hash block are hashed down first, per the RFC.
    pub fn new(key: &[u8], alg: HashAlgorithm) -> Self {
        macro_rules! keyed {
            ($variant:ident, $digest:ty) => {
                State::$variant(
                    HmacCore::<$digest>::new_from_slice(key).expect("hmac accepts any key length"),
                )
            };
        }
        let state = match alg {
            HashAlgorithm::Md5 => keyed!(Md5, Md5),
            HashAlgorithm::Sha1 => keyed!(Sha1, Sha1),
            HashAlgorithm::Sha224 => keyed!(Sha224, Sha224),
            HashAlgorithm::Sha256 => keyed!(Sha256, Sha256),
            HashAlgorithm::Sha384 => keyed!(Sha384, Sha384),
            HashAlgorithm::Sha512 => keyed!(Sha512, Sha512),
            HashAlgorithm::Sha512_224 => keyed!(Sha512_224, Sha512_224),
            HashAlgorithm::Sha512_256 => keyed!(Sha512_256, Sha512_256),
            HashAlgorithm::Sm3 => keyed!(Sm3, Sm3),
        };
        Self { alg, state }
    }

    /// The hash algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.alg
    }

    /// Tag size in bytes (the hash digest size).
    pub fn size(&self) -> usize {
        self.alg.size()
    }

    /// Absorb data.
    pub fn update(&mut self, data: &[u8]) {
        dispatch!(&mut self.state, mac => mac.update(data));
    }

    /// Produce the tag and reset to the just-keyed state.
    pub fn finish(&mut self) -> Vec<u8> {
        dispatch!(&mut self.state, mac => mac.finalize_reset().into_bytes().to_vec())
    }

    /// Discard absorbed data, keeping the key.
    pub fn reset(&mut self) {
        dispatch!(&mut self.state, mac => Mac::reset(mac));
    }
}

impl core::fmt::Debug for Hmac {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Hmac({:?})", self.alg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_matches_fresh_state() {
        for alg in HashAlgorithm::ALL {
            let mut a = Hmac::new(b"it's a secret to everybody", alg);
            let mut b = Hmac::new(b"it's a secret to everybody", alg);
            a.update(b"garbage to discard");
            a.reset();
            a.update(b"message");
            b.update(b"message");
            assert_eq!(a.finish(), b.finish(), "{alg:?}");
        }
    }

    #[test]
    fn finish_rekeys() {
        let mut mac = Hmac::new(b"k", HashAlgorithm::Sha256);
        mac.update(b"one");
        let first = mac.finish();
        mac.update(b"one");
        assert_eq!(mac.finish(), first);
        assert_eq!(first.len(), mac.size());
    }

    #[test]
    fn distinct_keys_distinct_tags() {
        let mut a = Hmac::new(b"key-a", HashAlgorithm::Sha512);
        let mut b = Hmac::new(b"key-b", HashAlgorithm::Sha512);
        a.update(b"msg");
        b.update(b"msg");
        assert_ne!(a.finish(), b.finish());
    }
}
