//! Affine group arithmetic on short Weierstrass curves.
//!
//! Correctness-first formulas over the bignum field. Field inversions are
//! not constant time; this backs certificate signing and verification, not
//! a high-rate online signer.

use bignum::Bignum;

use super::params::CurveParams;
use crate::{Error, Result};

/// Affine coordinates; `None` is the point at infinity.
pub(crate) type Coords = Option<(Bignum, Bignum)>;

pub(crate) fn is_on_curve(curve: &CurveParams, x: &Bignum, y: &Bignum) -> bool {
    if x.is_negative() || y.is_negative() || x >= &curve.p || y >= &curve.p {
        return false;
    }
    let lhs = (y * y).mod_floor(&curve.p);
    let rhs = (&(&(x * x) * x) + &(&(&curve.a * x) + &curve.b)).mod_floor(&curve.p);
    matches!((lhs, rhs), (Ok(l), Ok(r)) if l == r)
}

pub(crate) fn add(curve: &CurveParams, lhs: &Coords, rhs: &Coords) -> Result<Coords> {
    let (x1, y1) = match lhs {
        None => return Ok(rhs.clone()),
        Some(c) => c,
    };
    let (x2, y2) = match rhs {
        None => return Ok(lhs.clone()),
        Some(c) => c,
    };
    let p = &curve.p;

    if x1 == x2 {
        let neg = (&(y1 + y2)).mod_floor(p)?;
        if neg.is_zero() {
            // mirror points (or a doubled point of order two)
            return Ok(None);
        }
        return double(curve, x1, y1);
    }

    // lambda = (y2 - y1) / (x2 - x1)
    let dx = (&(x2 - x1)).mod_floor(p)?;
    let dy = (&(y2 - y1)).mod_floor(p)?;
    let lambda = (&(&dy * &dx.mod_inverse(p).ok_or(Error::InvalidPoint)?)).mod_floor(p)?;

    finish(p, &lambda, x1, x2, y1)
}

pub(crate) fn double(curve: &CurveParams, x: &Bignum, y: &Bignum) -> Result<Coords> {
    let p = &curve.p;
    if y.is_zero() {
        return Ok(None);
    }
    // lambda = (3x^2 + a) / 2y
    let num = (&(&(&(x * x) * 3u32) + &curve.a)).mod_floor(p)?;
    let den = (&(y * 2u32)).mod_floor(p)?;
    let lambda = (&(&num * &den.mod_inverse(p).ok_or(Error::InvalidPoint)?)).mod_floor(p)?;

    finish(p, &lambda, x, x, y)
}

// x3 = lambda^2 - x1 - x2; y3 = lambda (x1 - x3) - y1
fn finish(p: &Bignum, lambda: &Bignum, x1: &Bignum, x2: &Bignum, y1: &Bignum) -> Result<Coords> {
    let x3 = (&(&(lambda * lambda) - &(x1 + x2))).mod_floor(p)?;
    let y3 = (&(&(lambda * &(x1 - &x3)) - y1)).mod_floor(p)?;
    Ok(Some((x3, y3)))
}

/// Scalar multiplication by square-and-add, most significant bit first.
pub(crate) fn mul(curve: &CurveParams, k: &Bignum, point: &Coords) -> Result<Coords> {
    if k.is_negative() {
        return Err(Error::Contract("negative scalar"));
    }
    if k.is_zero() || point.is_none() {
        return Ok(None);
    }
    let mut acc: Coords = None;
    for bit in (0..k.width()).rev() {
        if let Some((x, y)) = &acc {
            acc = double(curve, x, y)?;
        }
        if k.is_bit_set(bit) {
            acc = add(curve, &acc, point)?;
        }
    }
    Ok(acc)
}

pub(crate) fn base_mul(curve: &CurveParams, k: &Bignum) -> Result<Coords> {
    let g = Some((curve.gx.clone(), curve.gy.clone()));
    mul(curve, k, &g)
}
