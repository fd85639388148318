//! Primality testing and prime generation.
//!
//! The Miller-Rabin trial schedule follows the classic worst-case error
//! table (Handbook of Applied Cryptography, table 4.4): wide candidates need
//! far fewer witnesses for the same confidence, so the count is chosen from
//! the candidate's bit width when the caller does not fix one.

use crate::{Bignum, CryptoRng, Error, Result, RngCore};

/// Miller-Rabin round count giving a false-positive probability below
/// `2^-80` for a random candidate of the given bit width.
pub fn mr_rounds(width: usize) -> usize {
    match width {
        w if w >= 1300 => 2,
        w if w >= 850 => 3,
        w if w >= 650 => 4,
        w if w >= 550 => 5,
        w if w >= 450 => 6,
        w if w >= 400 => 7,
        w if w >= 350 => 8,
        w if w >= 300 => 9,
        w if w >= 250 => 12,
        w if w >= 200 => 15,
        w if w >= 150 => 18,
        _ => 27,
    }
}

pub(crate) fn is_prime(candidate: &Bignum, rounds: Option<usize>) -> bool {
    if candidate.is_negative() || *candidate < 2 {
        return false;
    }
    let rounds = rounds.unwrap_or_else(|| mr_rounds(candidate.width()));
    num_bigint_dig::prime::probably_prime(&candidate.magnitude(), rounds)
}

pub(crate) fn random_prime<R: CryptoRng + RngCore + ?Sized>(
    rng: &mut R,
    bits: usize,
) -> Result<Bignum> {
    if bits < 2 {
        return Err(Error::BitWidth);
    }
    loop {
        let candidate = Bignum::random(rng, bits, true, true)?;
        if candidate.is_prime(None) {
            return Ok(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_schedule_is_monotonic() {
        let widths = [8, 150, 200, 250, 300, 350, 400, 450, 550, 650, 850, 1300];
        let mut last = usize::MAX;
        for w in widths {
            let r = mr_rounds(w);
            assert!(r <= last);
            last = r;
        }
    }

    #[test]
    fn small_primes() {
        for p in [2u32, 3, 5, 7, 65537] {
            assert!(Bignum::from(p).is_prime(None), "{p} must be prime");
        }
        for c in [0u32, 1, 4, 9, 65535] {
            assert!(!Bignum::from(c).is_prime(None), "{c} must be composite");
        }
        assert!(!Bignum::from(-7).is_prime(None));
    }
}
