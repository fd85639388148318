//! Elliptic curve cryptography over the standard prime-field curves.
//!
//! Only the named NIST/SECG curves and SM2 are supported; there are no
//! custom domain parameters. Points carry a reference-counted copy of
//! their curve's parameters, so a point stays usable after the curve value
//! that created it is gone.

mod arith;
mod params;

use core::fmt;
use std::sync::Arc;

use bignum::{Bignum, CryptoRng, RngCore};

use crate::{Error, Result};
use arith::Coords;
use params::CurveParams;

/// The supported curves.
///
/// X25519 and X448 are Montgomery curves with their own signature scheme
/// and are not implemented here.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EcCurveId {
    /// secp192r1 (NIST P-192).
    P192r1,
    /// secp224r1 (NIST P-224).
    P224r1,
    /// secp256r1 (NIST P-256, prime256v1).
    P256r1,
    /// secp384r1 (NIST P-384).
    P384r1,
    /// secp521r1 (NIST P-521).
    P521r1,
    /// SM2 over its 256-bit prime field.
    P256Sm2,
}

impl fmt::Display for EcCurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EcCurveId::P192r1 => "secp192r1",
            EcCurveId::P224r1 => "secp224r1",
            EcCurveId::P256r1 => "secp256r1",
            EcCurveId::P384r1 => "secp384r1",
            EcCurveId::P521r1 => "secp521r1",
            EcCurveId::P256Sm2 => "sm2p256v1",
        })
    }
}

/// A prime-field curve and its domain parameters.
#[derive(Clone)]
pub struct EcCurve {
    params: Arc<CurveParams>,
}

impl EcCurve {
    /// Look up a standard curve.
    pub fn new(id: EcCurveId) -> Self {
        Self {
            params: Arc::new(params::params(id)),
        }
    }

    /// The curve id.
    pub fn id(&self) -> EcCurveId {
        self.params.id
    }

    /// Field bit width.
    pub fn bits(&self) -> usize {
        self.params.bits
    }

    /// Field element byte width.
    pub fn field_len(&self) -> usize {
        self.params.field_len()
    }

    /// The group order.
    pub fn order(&self) -> &Bignum {
        &self.params.n
    }

    /// The base point.
    pub fn base_point(&self) -> EcPoint {
        EcPoint {
            params: Arc::clone(&self.params),
            coords: Some((self.params.gx.clone(), self.params.gy.clone())),
        }
    }

    /// Verify the stored domain parameters: the base point must satisfy
    /// the curve equation and have the group order.
    pub fn is_valid(&self) -> bool {
        if !arith::is_on_curve(&self.params, &self.params.gx, &self.params.gy) {
            return false;
        }
        matches!(arith::base_mul(&self.params, &self.params.n), Ok(None))
    }

    /// Draw a private scalar uniformly from `[1, n-1]`.
    pub fn generate_private_key<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Bignum> {
        loop {
            let candidate = Bignum::random(rng, self.params.n.width(), false, false)?;
            if !candidate.is_zero() && candidate < self.params.n {
                return Ok(candidate);
            }
        }
    }

    /// Compute the public point for a private scalar.
    pub fn public_key(&self, private: &Bignum) -> Result<EcPoint> {
        if private.is_zero() || private.is_negative() || *private >= self.params.n {
            return Err(Error::Contract("private key out of range"));
        }
        let coords = arith::base_mul(&self.params, private)?;
        if coords.is_none() {
            return Err(Error::InvalidPoint);
        }
        Ok(EcPoint {
            params: Arc::clone(&self.params),
            coords,
        })
    }

    /// Generate a key pair.
    pub fn generate_keypair<R: CryptoRng + RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Bignum, EcPoint)> {
        let private = self.generate_private_key(rng)?;
        let public = self.public_key(&private)?;
        Ok((private, public))
    }

    /// Does `public` match `private` on this curve?
    pub fn validate_keypair(&self, private: &Bignum, public: &EcPoint) -> bool {
        if !public.is_valid() {
            return false;
        }
        match self.public_key(private) {
            Ok(expected) => expected == *public,
            Err(_) => false,
        }
    }

    pub(crate) fn params(&self) -> &Arc<CurveParams> {
        &self.params
    }

    pub(crate) fn from_params(params: &Arc<CurveParams>) -> Self {
        Self {
            params: Arc::clone(params),
        }
    }
}

impl fmt::Debug for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcCurve({})", self.id())
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bits)", self.id(), self.bits())
    }
}

/// A point on a curve: infinity, or affine coordinates in the field.
///
/// Construction checks membership of finite coordinates; validity as key
/// material ([`EcPoint::is_valid`]: on the curve and not infinity) is the
/// separate predicate callers use before trusting a peer's point.
#[derive(Clone)]
pub struct EcPoint {
    params: Arc<CurveParams>,
    coords: Coords,
}

impl EcPoint {
    /// The point at infinity on `curve`.
    pub fn infinity(curve: &EcCurve) -> Self {
        Self {
            params: Arc::clone(curve.params()),
            coords: None,
        }
    }

    /// A finite point. Fails if `(x, y)` does not satisfy the curve
    /// equation.
    pub fn new(curve: &EcCurve, x: Bignum, y: Bignum) -> Result<Self> {
        if !arith::is_on_curve(curve.params(), &x, &y) {
            return Err(Error::InvalidPoint);
        }
        Ok(Self {
            params: Arc::clone(curve.params()),
            coords: Some((x, y)),
        })
    }

    /// Decode a SEC1 uncompressed point: `04 || x || y` with each
    /// coordinate padded to the field byte width. Compressed forms are
    /// rejected.
    pub fn from_uncompressed(curve: &EcCurve, data: &[u8]) -> Result<Self> {
        let flen = curve.field_len();
        if data.len() != 1 + 2 * flen || data[0] != 0x04 {
            return Err(Error::InvalidPoint);
        }
        let x = Bignum::from_bytes_be(&data[1..1 + flen]);
        let y = Bignum::from_bytes_be(&data[1 + flen..]);
        Self::new(curve, x, y)
    }

    /// Encode as SEC1 uncompressed bytes. Infinity has no encoding.
    pub fn to_uncompressed(&self) -> Result<Vec<u8>> {
        let (x, y) = self.coords.as_ref().ok_or(Error::InvalidPoint)?;
        let flen = self.params.field_len();
        let mut out = Vec::with_capacity(1 + 2 * flen);
        out.push(0x04);
        out.extend_from_slice(&x.to_bytes_be_padded(flen)?);
        out.extend_from_slice(&y.to_bytes_be_padded(flen)?);
        Ok(out)
    }

    /// The curve this point lives on.
    pub fn curve_id(&self) -> EcCurveId {
        self.params.id
    }

    /// The curve's field bit width.
    pub fn curve_bits(&self) -> usize {
        self.params.bits
    }

    /// Affine coordinates; `None` at infinity.
    pub fn coordinates(&self) -> Option<(&Bignum, &Bignum)> {
        self.coords.as_ref().map(|(x, y)| (x, y))
    }

    /// Is this the point at infinity?
    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    /// On the curve and not infinity — the precondition for use as a
    /// public key.
    pub fn is_valid(&self) -> bool {
        match &self.coords {
            None => false,
            Some((x, y)) => arith::is_on_curve(&self.params, x, y),
        }
    }

    /// Point addition.
    pub fn add(&self, other: &EcPoint) -> Result<EcPoint> {
        let coords = arith::add(&self.params, &self.coords, &other.coords)?;
        Ok(Self {
            params: Arc::clone(&self.params),
            coords,
        })
    }

    /// Scalar multiplication.
    pub fn mul(&self, scalar: &Bignum) -> Result<EcPoint> {
        let coords = arith::mul(&self.params, scalar, &self.coords)?;
        Ok(Self {
            params: Arc::clone(&self.params),
            coords,
        })
    }

    pub(crate) fn order(&self) -> &Bignum {
        &self.params.n
    }

    pub(crate) fn params(&self) -> &Arc<CurveParams> {
        &self.params
    }
}

/// Point equality compares coordinates only, not curve identity, matching
/// plain point equality on a shared curve.
impl PartialEq for EcPoint {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl Eq for EcPoint {}

impl fmt::Debug for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coords {
            None => write!(f, "EcPoint({}, infinity)", self.params.id),
            Some(_) => write!(f, "EcPoint({})", self.params.id),
        }
    }
}

impl fmt::Display for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coords {
            None => write!(f, "{} infinity", self.params.id),
            Some((x, _)) => write!(f, "{} x {:x}...", self.params.id, x >> (self.params.bits / 2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_curve_parameters_are_consistent() {
        for id in [
            EcCurveId::P192r1,
            EcCurveId::P224r1,
            EcCurveId::P256r1,
            EcCurveId::P384r1,
            EcCurveId::P521r1,
            EcCurveId::P256Sm2,
        ] {
            let curve = EcCurve::new(id);
            assert!(curve.is_valid(), "{id}");
        }
    }

    #[test]
    fn point_outlives_curve() {
        let point = {
            let curve = EcCurve::new(EcCurveId::P256r1);
            curve.base_point()
        };
        assert!(point.is_valid());
        assert_eq!(point.curve_id(), EcCurveId::P256r1);
    }

    #[test]
    fn sec1_round_trip() {
        let curve = EcCurve::new(EcCurveId::P256r1);
        let g = curve.base_point();
        let bytes = g.to_uncompressed().unwrap();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0x04);
        let back = EcPoint::from_uncompressed(&curve, &bytes).unwrap();
        assert_eq!(back, g);

        // compressed and truncated forms are rejected
        let mut compressed = bytes[..33].to_vec();
        compressed[0] = 0x02;
        assert!(EcPoint::from_uncompressed(&curve, &compressed).is_err());
        assert!(EcPoint::from_uncompressed(&curve, &bytes[..64]).is_err());
        assert!(EcPoint::infinity(&curve).to_uncompressed().is_err());
    }
}
