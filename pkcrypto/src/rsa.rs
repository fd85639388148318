//! RSA keys and the padded encryption and signature schemes over them
//! (RFC 8017).
//!
//! Key values are plain [`Bignum`] components; the schemes live in the
//! [`oaep`], [`pkcs1`] and [`pss`] submodules. The key size of a key is its
//! [`RsaPublicKey::width`], the bit size of the modulus. Widths below 2048
//! bits are not considered secure.

pub mod oaep;
pub mod pkcs1;
pub mod pss;

mod mgf;

use core::fmt;

use bignum::{Bignum, CryptoRng, RngCore};

use crate::{Error, Result};

/// RSA public key: modulus `n` and public exponent `e`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RsaPublicKey {
    n: Bignum,
    e: Bignum,
}

impl RsaPublicKey {
    /// Build from modulus and exponent.
    pub fn new(n: Bignum, e: Bignum) -> Self {
        Self { n, e }
    }

    /// The modulus and public exponent.
    pub fn components(&self) -> (&Bignum, &Bignum) {
        (&self.n, &self.e)
    }

    /// Bit width of the modulus; 0 for a cleared key.
    pub fn width(&self) -> usize {
        if self.n.is_zero() { 0 } else { self.n.width() }
    }

    /// Byte width of the modulus.
    pub fn width_bytes(&self) -> usize {
        self.width().div_ceil(8)
    }

    /// Reset to the cleared state. Values are zeroized by drop.
    pub fn clear(&mut self) {
        self.n = Bignum::new();
        self.e = Bignum::new();
    }

    /// RSAEP: `m^e mod n`.
    pub(crate) fn encrypt_primitive(&self, m: &Bignum) -> Result<Bignum> {
        if m >= &self.n {
            return Err(Error::Contract("message representative out of range"));
        }
        Ok(m.powmod(&self.e, &self.n)?)
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rsa public key width {}", self.width())
    }
}

/// RSA private key: the public pair plus the private exponent, primes and
/// CRT residues.
///
/// All components are zeroized on drop. `Debug` prints only the width.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct RsaPrivateKey {
    public: RsaPublicKey,
    d: Bignum,
    p: Bignum,
    q: Bignum,
    dp: Bignum,
    dq: Bignum,
    qinv: Bignum,
}

impl RsaPrivateKey {
    /// Generate a key of the given bit width.
    ///
    /// The width must be positive and even. The public exponent is fixed
    /// at 65537; primes of `width/2` and `width - width/2` bits are drawn
    /// from `rng` and the whole candidate set is retried until the derived
    /// exponents exist.
    pub fn generate<R: CryptoRng + RngCore + ?Sized>(rng: &mut R, width: usize) -> Result<Self> {
        if width == 0 || width % 2 != 0 {
            return Err(Error::Contract("key width must be positive and even"));
        }
        if width < 16 {
            return Err(Error::Contract("key width too small"));
        }
        let e = Bignum::from(65537u32);

        loop {
            let p = Bignum::random_prime(rng, width / 2)?;
            let q = Bignum::random_prime(rng, width - width / 2)?;
            if p == q {
                continue;
            }
            let n = &p * &q;
            if n.width() != width {
                continue;
            }
            let one = Bignum::from(1u32);
            let p1 = &p - &one;
            let q1 = &q - &one;
            let phi = &p1 * &q1;
            let Some(d) = e.mod_inverse(&phi) else {
                continue;
            };
            let Some(qinv) = q.mod_inverse(&p) else {
                continue;
            };
            let dp = (&d % &p1).mod_floor(&p1)?;
            let dq = (&d % &q1).mod_floor(&q1)?;
            return Ok(Self {
                public: RsaPublicKey::new(n, e),
                d,
                p,
                q,
                dp,
                dq,
                qinv,
            });
        }
    }

    /// Assemble from raw components (e.g. a decoded key document).
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        n: Bignum,
        e: Bignum,
        d: Bignum,
        p: Bignum,
        q: Bignum,
        dp: Bignum,
        dq: Bignum,
        qinv: Bignum,
    ) -> Self {
        Self {
            public: RsaPublicKey::new(n, e),
            d,
            p,
            q,
            dp,
            dq,
            qinv,
        }
    }

    /// All components in document order `(n, e, d, p, q, dp, dq, qinv)`.
    #[allow(clippy::type_complexity)]
    pub fn components(
        &self,
    ) -> (
        &Bignum,
        &Bignum,
        &Bignum,
        &Bignum,
        &Bignum,
        &Bignum,
        &Bignum,
        &Bignum,
    ) {
        (
            &self.public.n,
            &self.public.e,
            &self.d,
            &self.p,
            &self.q,
            &self.dp,
            &self.dq,
            &self.qinv,
        )
    }

    /// The public half.
    pub fn pub_key(&self) -> RsaPublicKey {
        self.public.clone()
    }

    /// Bit width of the modulus.
    pub fn width(&self) -> usize {
        self.public.width()
    }

    /// Byte width of the modulus.
    pub fn width_bytes(&self) -> usize {
        self.public.width_bytes()
    }

    /// Reset to the cleared state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check that `public` is the public half of this key and that the key
    /// is internally consistent: the primes multiply to the modulus, the
    /// CRT residues match, and a test value survives an encrypt/decrypt
    /// round trip.
    pub fn validate(&self, public: &RsaPublicKey) -> bool {
        if self.public != *public || self.public.n.is_zero() {
            return false;
        }
        if &self.p * &self.q != self.public.n {
            return false;
        }
        let one = Bignum::from(1u32);
        let p1 = &self.p - &one;
        let q1 = &self.q - &one;
        let crt_ok = (|| {
            Some(
                self.dp == (&self.d % &p1).mod_floor(&p1).ok()?
                    && self.dq == (&self.d % &q1).mod_floor(&q1).ok()?
                    && self.qinv == self.q.mod_inverse(&self.p)?,
            )
        })();
        if crt_ok != Some(true) {
            return false;
        }
        let probe = Bignum::from(0x5au32);
        match self
            .public
            .encrypt_primitive(&probe)
            .and_then(|c| self.decrypt_primitive(&c))
        {
            Ok(back) => back == probe,
            Err(_) => false,
        }
    }

    /// Validate against this key's own public half.
    pub fn validate_self(&self) -> bool {
        self.validate(&self.public)
    }

    /// RSADP via the Chinese remainder theorem.
    pub(crate) fn decrypt_primitive(&self, c: &Bignum) -> Result<Bignum> {
        if c >= &self.public.n {
            return Err(Error::Contract("ciphertext representative out of range"));
        }
        let m1 = c.powmod(&self.dp, &self.p)?;
        let m2 = c.powmod(&self.dq, &self.q)?;
        let h = (&self.qinv * (&m1 - &m2)).mod_floor(&self.p)?;
        Ok(&m2 + &(&h * &self.q))
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaPrivateKey(width {})", self.width())
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rsa private key width {}", self.width())
    }
}
