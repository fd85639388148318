#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! Arbitrary-precision signed integers for public-key cryptography.
//!
//! [`Bignum`] wraps an arbitrary-precision signed integer and adds the byte
//! conventions that DER and PKI code depend on:
//!
//! - unsigned big-endian input/output with explicit padding control;
//! - canonical two's-complement input/output (the encoding of a DER
//!   `INTEGER`), minimum length, sign-extended on request;
//! - bit addressing, width queries (zero has width 1), shifts;
//! - modular exponentiation and inversion;
//! - random and prime generation driven by a caller-supplied CSPRNG.
//!
//! Limb storage is zeroized when a value is dropped, so intermediate values
//! holding key material do not linger on the heap.
//!
//! ```
//! use bignum::Bignum;
//!
//! let n = Bignum::from(128u32);
//! assert_eq!(n.twos_complement_len(), 2);
//! assert_eq!(n.to_twos_complement(), [0x00, 0x80]);
//! assert_eq!(Bignum::from_twos_complement(&[0x00, 0x80]), n);
//! ```

mod prime;

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Rem, Shl, Shr, Sub};

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use zeroize::Zeroize;

pub use rand_core::{CryptoRng, RngCore};

/// Bignum operation errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// Unsigned byte output was requested for a negative value.
    Negative,
    /// An output buffer length is too small for the value.
    Length,
    /// Division or modular reduction by zero.
    DivideByZero,
    /// A bit width argument is out of range for the operation.
    BitWidth,
    /// The operands have no modular inverse / are out of domain.
    Domain,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::Negative => "negative value has no unsigned encoding",
            Error::Length => "output length too small for value",
            Error::DivideByZero => "division by zero",
            Error::BitWidth => "bit width out of range",
            Error::Domain => "operand out of domain",
        })
    }
}

impl std::error::Error for Error {}

/// Result type with the `bignum` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Arbitrary-precision signed integer.
///
/// Values are plain integers with no modulus attached; the modular helpers
/// ([`Bignum::powmod`], [`Bignum::mod_inverse`], [`Bignum::mod_floor`]) take
/// the modulus per call. Cloning is a deep copy.
#[derive(Clone, Default)]
pub struct Bignum {
    inner: BigInt,
}

impl Bignum {
    /// New value set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a non-negative value from unsigned big-endian bytes.
    ///
    /// An empty slice yields zero.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self {
            inner: BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(bytes)),
        }
    }

    /// Construct from two's-complement big-endian bytes.
    ///
    /// An empty slice yields zero.
    pub fn from_twos_complement(bytes: &[u8]) -> Self {
        Self {
            inner: BigInt::from_signed_bytes_be(bytes),
        }
    }

    /// Number of significant bits. Zero has width 1.
    pub fn width(&self) -> usize {
        let bits = self.inner.bits();
        if bits == 0 { 1 } else { bits }
    }

    /// Byte length of the unsigned big-endian output. Zero has length 1.
    pub fn byte_len(&self) -> usize {
        self.width().div_ceil(8)
    }

    /// Minimum-length unsigned big-endian bytes.
    ///
    /// Fails with [`Error::Negative`] for negative values: a sign would be
    /// silently lost otherwise.
    pub fn to_bytes_be(&self) -> Result<Vec<u8>> {
        if self.is_negative() {
            return Err(Error::Negative);
        }
        Ok(self.magnitude().to_bytes_be())
    }

    /// Unsigned big-endian bytes, left-padded with zeroes to `len`.
    pub fn to_bytes_be_padded(&self, len: usize) -> Result<Vec<u8>> {
        let raw = self.to_bytes_be()?;
        if raw.len() > len {
            return Err(Error::Length);
        }
        let mut out = vec![0u8; len];
        out[len - raw.len()..].copy_from_slice(&raw);
        Ok(out)
    }

    /// Byte length of the minimal two's-complement output.
    ///
    /// ```
    /// use bignum::Bignum;
    /// assert_eq!(Bignum::from(-1).twos_complement_len(), 1);
    /// assert_eq!(Bignum::from(128u32).twos_complement_len(), 2);
    /// assert_eq!(Bignum::from(-129).twos_complement_len(), 2);
    /// ```
    pub fn twos_complement_len(&self) -> usize {
        self.to_twos_complement().len()
    }

    /// Minimum-length two's-complement big-endian bytes.
    ///
    /// The output decodes back to the original value with
    /// [`Bignum::from_twos_complement`]: a non-negative value whose top bit
    /// would be set gains a leading `00`, a negative value that needs
    /// disambiguation gains a leading `ff`, and `-2^(w-1)` stays at `w/8`
    /// bytes with leading `80`. Zero encodes as `00`.
    pub fn to_twos_complement(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    /// Two's-complement bytes sign-extended to `len`.
    pub fn to_twos_complement_padded(&self, len: usize) -> Result<Vec<u8>> {
        let raw = self.to_twos_complement();
        if raw.len() > len {
            return Err(Error::Length);
        }
        let fill = if self.is_negative() { 0xff } else { 0x00 };
        let mut out = vec![fill; len];
        out[len - raw.len()..].copy_from_slice(&raw);
        Ok(out)
    }

    /// Is this value zero?
    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }

    /// Is this value negative?
    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    /// Is this value odd?
    pub fn is_odd(&self) -> bool {
        self.inner.is_odd()
    }

    /// Flip the sign in place.
    pub fn negate(&mut self) {
        let v = core::mem::take(&mut self.inner);
        self.inner = -v;
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self {
            inner: self.inner.abs(),
        }
    }

    /// Test a bit of the magnitude. Bit 0 is the least significant.
    pub fn is_bit_set(&self, bit: usize) -> bool {
        ((self.magnitude() >> bit) & BigUint::one()).is_one()
    }

    /// Set a bit of the magnitude, growing the value if needed.
    pub fn set_bit(&mut self, bit: usize) {
        if !self.is_bit_set(bit) {
            let mag = self.magnitude() | (BigUint::one() << bit);
            self.replace_magnitude(mag);
        }
    }

    /// Clear a bit of the magnitude.
    pub fn clear_bit(&mut self, bit: usize) {
        if self.is_bit_set(bit) {
            let mag = self.magnitude() - (BigUint::one() << bit);
            self.replace_magnitude(mag);
        }
    }

    /// Quotient and remainder, truncated toward zero.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(Error::DivideByZero);
        }
        let (q, r) = self.inner.div_rem(&divisor.inner);
        Ok((Self { inner: q }, Self { inner: r }))
    }

    /// Least non-negative residue of `self` modulo `modulus`.
    pub fn mod_floor(&self, modulus: &Self) -> Result<Self> {
        if modulus.is_zero() {
            return Err(Error::DivideByZero);
        }
        Ok(Self {
            inner: self.inner.mod_floor(&modulus.inner.abs()),
        })
    }

    /// Greatest common divisor.
    pub fn gcd(&self, other: &Self) -> Self {
        Self {
            inner: self.inner.gcd(&other.inner),
        }
    }

    /// Integer exponentiation.
    pub fn pow(&self, exponent: u32) -> Self {
        Self {
            inner: num_traits::pow(self.inner.clone(), exponent as usize),
        }
    }

    /// Modular exponentiation `self^exponent mod modulus`.
    ///
    /// `self` is reduced into the modulus range first; the exponent must be
    /// non-negative and the modulus non-zero.
    pub fn powmod(&self, exponent: &Self, modulus: &Self) -> Result<Self> {
        if modulus.is_zero() {
            return Err(Error::DivideByZero);
        }
        if exponent.is_negative() {
            return Err(Error::Domain);
        }
        let base = self.mod_floor(modulus)?;
        let mag = base
            .magnitude()
            .modpow(&exponent.magnitude(), &modulus.magnitude());
        Ok(Self {
            inner: BigInt::from_biguint(Sign::Plus, mag),
        })
    }

    /// Modular inverse `self^-1 mod modulus`, if one exists.
    pub fn mod_inverse(&self, modulus: &Self) -> Option<Self> {
        use num_bigint_dig::traits::ModInverse;
        if modulus.is_zero() {
            return None;
        }
        let base = self.mod_floor(modulus).ok()?.magnitude();
        (&base)
            .mod_inverse(&modulus.magnitude())
            .map(|inner| Self { inner })
    }

    /// Convert to `u32` if the value fits.
    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    /// Generate a uniform random value of at most `bits` bits.
    ///
    /// `strong` forces the top two bits on, so the product of two such
    /// values always reaches `2 * bits` bits. `odd` forces the low bit on.
    pub fn random<R: CryptoRng + RngCore + ?Sized>(
        rng: &mut R,
        bits: usize,
        strong: bool,
        odd: bool,
    ) -> Result<Self> {
        if bits == 0 || (strong && bits < 2) {
            return Err(Error::BitWidth);
        }
        use num_bigint_dig::RandBigInt;
        let mut mag = rng.gen_biguint(bits);
        if strong {
            mag |= BigUint::one() << (bits - 1);
            mag |= BigUint::one() << (bits - 2);
        }
        if odd {
            mag |= BigUint::one();
        }
        Ok(Self {
            inner: BigInt::from_biguint(Sign::Plus, mag),
        })
    }

    /// Miller-Rabin primality test.
    ///
    /// `rounds` of `None` selects the trial count from the value's width
    /// (see [`prime::mr_rounds`](crate::mr_rounds)); values below 2 and
    /// negative values are composite.
    pub fn is_prime(&self, rounds: Option<usize>) -> bool {
        prime::is_prime(self, rounds)
    }

    /// Generate a random probable prime of exactly `bits` bits.
    ///
    /// Candidates are drawn with the top two bits and the low bit forced on
    /// and retried until one passes the primality test.
    pub fn random_prime<R: CryptoRng + RngCore + ?Sized>(rng: &mut R, bits: usize) -> Result<Self> {
        prime::random_prime(rng, bits)
    }

    fn magnitude(&self) -> BigUint {
        self.inner.abs().to_biguint().unwrap_or_default()
    }

    fn replace_magnitude(&mut self, mag: BigUint) {
        let sign = if self.is_negative() {
            Sign::Minus
        } else {
            Sign::Plus
        };
        self.inner = BigInt::from_biguint(sign, mag);
    }
}

pub use prime::mr_rounds;

impl Zeroize for Bignum {
    fn zeroize(&mut self) {
        self.inner.zeroize();
    }
}

impl Drop for Bignum {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl zeroize::ZeroizeOnDrop for Bignum {}

impl fmt::Debug for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bignum({})", self.inner)
    }
}

impl fmt::Display for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::LowerHex for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.inner, f)
    }
}

impl From<u32> for Bignum {
    fn from(v: u32) -> Self {
        Self {
            inner: BigInt::from(v),
        }
    }
}

impl From<u64> for Bignum {
    fn from(v: u64) -> Self {
        Self {
            inner: BigInt::from(v),
        }
    }
}

impl From<i32> for Bignum {
    fn from(v: i32) -> Self {
        Self {
            inner: BigInt::from(v),
        }
    }
}

impl PartialEq for Bignum {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Bignum {}

impl Ord for Bignum {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl PartialOrd for Bignum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<u32> for Bignum {
    fn eq(&self, other: &u32) -> bool {
        self.inner == BigInt::from(*other)
    }
}

impl PartialOrd<u32> for Bignum {
    fn partial_cmp(&self, other: &u32) -> Option<Ordering> {
        self.inner.partial_cmp(&BigInt::from(*other))
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Bignum> for &Bignum {
            type Output = Bignum;

            fn $method(self, rhs: &Bignum) -> Bignum {
                Bignum {
                    inner: (&self.inner).$method(&rhs.inner),
                }
            }
        }

        impl $trait<&Bignum> for Bignum {
            type Output = Bignum;

            fn $method(self, rhs: &Bignum) -> Bignum {
                (&self).$method(rhs)
            }
        }

        impl $trait<Bignum> for &Bignum {
            type Output = Bignum;

            fn $method(self, rhs: Bignum) -> Bignum {
                self.$method(&rhs)
            }
        }

        impl $trait<Bignum> for Bignum {
            type Output = Bignum;

            fn $method(self, rhs: Bignum) -> Bignum {
                (&self).$method(&rhs)
            }
        }

        impl $trait<u32> for &Bignum {
            type Output = Bignum;

            fn $method(self, rhs: u32) -> Bignum {
                self.$method(&Bignum::from(rhs))
            }
        }

        impl $trait<u32> for Bignum {
            type Output = Bignum;

            fn $method(self, rhs: u32) -> Bignum {
                (&self).$method(&Bignum::from(rhs))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);
forward_binop!(Div, div);
forward_binop!(Rem, rem);

impl Neg for Bignum {
    type Output = Bignum;

    fn neg(mut self) -> Bignum {
        self.negate();
        self
    }
}

impl Neg for &Bignum {
    type Output = Bignum;

    fn neg(self) -> Bignum {
        -self.clone()
    }
}

impl Shl<usize> for &Bignum {
    type Output = Bignum;

    fn shl(self, shift: usize) -> Bignum {
        Bignum {
            inner: &self.inner << shift,
        }
    }
}

impl Shl<usize> for Bignum {
    type Output = Bignum;

    fn shl(self, shift: usize) -> Bignum {
        &self << shift
    }
}

impl Shr<usize> for &Bignum {
    type Output = Bignum;

    fn shr(self, shift: usize) -> Bignum {
        Bignum {
            inner: &self.inner >> shift,
        }
    }
}

impl Shr<usize> for Bignum {
    type Output = Bignum;

    fn shr(self, shift: usize) -> Bignum {
        &self >> shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_has_width_one() {
        let z = Bignum::new();
        assert_eq!(z.width(), 1);
        assert_eq!(z.byte_len(), 1);
        assert_eq!(z.to_twos_complement(), [0x00]);
    }

    #[test]
    fn negate_round_trip() {
        let mut n = Bignum::from(42u32);
        n.negate();
        assert!(n.is_negative());
        assert_eq!(n, Bignum::from(-42));
        n.negate();
        assert_eq!(n, Bignum::from(42u32));
    }

    #[test]
    fn bit_addressing() {
        let mut n = Bignum::new();
        n.set_bit(100);
        assert_eq!(n.width(), 101);
        assert!(n.is_bit_set(100));
        assert!(!n.is_bit_set(99));
        n.clear_bit(100);
        assert!(n.is_zero());
    }

    #[test]
    fn padded_output() {
        let n = Bignum::from(0x1234u32);
        assert_eq!(n.to_bytes_be_padded(4).unwrap(), [0, 0, 0x12, 0x34]);
        assert_eq!(n.to_bytes_be_padded(1), Err(Error::Length));
        assert_eq!(Bignum::from(-5).to_bytes_be(), Err(Error::Negative));
    }

    #[test]
    fn sign_extension() {
        let n = Bignum::from(-1);
        assert_eq!(n.to_twos_complement_padded(3).unwrap(), [0xff, 0xff, 0xff]);
        let p = Bignum::from(1u32);
        assert_eq!(p.to_twos_complement_padded(3).unwrap(), [0x00, 0x00, 0x01]);
    }
}
