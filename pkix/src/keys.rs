//! Stateless codecs between DER trees and key material.
//!
//! Shapes are from RFC 8017 appendix A (RSA), RFC 3279/5480 (EC
//! parameters) and RFC 5915 (EC private keys). Each codec pairs with a PEM
//! label for standalone key files.

use bignum::Bignum;
use dertree::{BitString, Element};
use pkcrypto::ecc::{EcCurve, EcPoint};
use pkcrypto::rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::spki::KeyAlgorithm;
use crate::{Error, Result, oids};

/// `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`
pub struct RsaPublicKeyDoc;

impl RsaPublicKeyDoc {
    /// PEM label.
    pub const PEM_LABEL: &'static str = "RSA PUBLIC KEY";

    /// Parse the sequence into a key.
    pub fn parse(root: &Element) -> Result<RsaPublicKey> {
        let ctx = "rsa public key";
        let seq = root
            .children()
            .map_err(|_| Error::malformed(ctx, "root is not a sequence"))?;
        if seq.len() != 2 {
            return Err(Error::malformed(ctx, "sequence must have 2 integers"));
        }
        let n = seq[0]
            .as_integer()
            .map_err(|_| Error::malformed(ctx, "modulus is not an integer"))?;
        let e = seq[1]
            .as_integer()
            .map_err(|_| Error::malformed(ctx, "exponent is not an integer"))?;
        Ok(RsaPublicKey::new(n.clone(), e.clone()))
    }

    /// Build the sequence for a key.
    pub fn dump(key: &RsaPublicKey) -> Element {
        let (n, e) = key.components();
        Element::sequence(vec![
            Element::integer(n.clone()),
            Element::integer(e.clone()),
        ])
    }
}

/// `RSAPrivateKey ::= SEQUENCE { version, n, e, d, p, q, dp, dq, qinv }`
/// with version 0 (no multi-prime info).
pub struct RsaPrivateKeyDoc;

impl RsaPrivateKeyDoc {
    /// PEM label.
    pub const PEM_LABEL: &'static str = "RSA PRIVATE KEY";

    /// Parse the sequence into a key.
    pub fn parse(root: &Element) -> Result<RsaPrivateKey> {
        let ctx = "rsa private key";
        let seq = root
            .children()
            .map_err(|_| Error::malformed(ctx, "root is not a sequence"))?;
        if seq.len() != 9 {
            return Err(Error::malformed(ctx, "sequence must have 9 integers"));
        }
        let mut fields = Vec::with_capacity(9);
        for el in seq {
            fields.push(
                el.as_integer()
                    .map_err(|_| Error::malformed(ctx, "field is not an integer"))?,
            );
        }
        if *fields[0] != Bignum::from(0u32) {
            return Err(Error::malformed(ctx, "unsupported version"));
        }
        Ok(RsaPrivateKey::from_components(
            fields[1].clone(),
            fields[2].clone(),
            fields[3].clone(),
            fields[4].clone(),
            fields[5].clone(),
            fields[6].clone(),
            fields[7].clone(),
            fields[8].clone(),
        ))
    }

    /// Build the sequence for a key.
    pub fn dump(key: &RsaPrivateKey) -> Element {
        let version = Bignum::from(0u32);
        let (n, e, d, p, q, dp, dq, qinv) = key.components();
        let fields: [&Bignum; 9] = [&version, n, e, d, p, q, dp, dq, qinv];
        Element::sequence(
            fields
                .into_iter()
                .map(|f| Element::integer(f.clone()))
                .collect(),
        )
    }
}

/// `EcpkParameters ::= CHOICE { namedCurve OBJECT IDENTIFIER, ... }` —
/// only the named-curve alternative is supported.
pub struct EcParametersDoc;

impl EcParametersDoc {
    /// PEM label.
    pub const PEM_LABEL: &'static str = "EC PARAMETERS";

    /// Map the named-curve oid to a key algorithm; an unrecognized curve
    /// yields [`KeyAlgorithm::Unknown`].
    pub fn parse(root: &Element) -> Result<KeyAlgorithm> {
        let oid = root
            .as_object_identifier()
            .map_err(|_| Error::malformed("ec parameters", "element is not an oid"))?;
        Ok(KeyAlgorithm::from_curve_oid(oid))
    }

    /// Build the named-curve oid element.
    pub fn dump(algo: KeyAlgorithm) -> Result<Element> {
        let arcs = algo
            .curve_oid()
            .ok_or(Error::AlgorithmMismatch("not an ec algorithm"))?;
        Ok(Element::object_identifier(oids::oid(arcs)))
    }
}

/// The EC public key bit string: a SEC1 uncompressed point (RFC 5480
/// section 2.2). Compressed points are rejected.
pub struct EcPublicKeyDoc;

impl EcPublicKeyDoc {
    /// Decode the point from raw SEC1 bytes on the algorithm's curve.
    pub fn parse_bytes(data: &[u8], algo: KeyAlgorithm) -> Result<EcPoint> {
        let id = algo
            .curve_id()
            .ok_or(Error::AlgorithmMismatch("not an ec algorithm"))?;
        let curve = EcCurve::new(id);
        Ok(EcPoint::from_uncompressed(&curve, data)?)
    }

    /// Decode the point from a bit-string element.
    pub fn parse(root: &Element, algo: KeyAlgorithm) -> Result<EcPoint> {
        let bits = root
            .as_bit_string()
            .map_err(|_| Error::malformed("ec public key", "element is not a bit string"))?;
        Self::parse_bytes(bits.as_bytes(), algo)
    }

    /// Encode the point as raw SEC1 bytes.
    pub fn dump_bytes(point: &EcPoint) -> Result<Vec<u8>> {
        Ok(point.to_uncompressed().map_err(Error::from)?)
    }

    /// Encode the point as a bit-string element.
    pub fn dump(point: &EcPoint) -> Result<Element> {
        Ok(Element::bit_string(BitString::from_octets(
            Self::dump_bytes(point)?,
        )))
    }
}

/// `ECPrivateKey ::= SEQUENCE { version 1, privateKey OCTET STRING,
/// parameters [0] EXPLICIT, publicKey [1] EXPLICIT }` (RFC 5915).
///
/// The parameters and public key are formally optional but recommended;
/// this codec requires them. The private scalar octets are left-padded to
/// the byte length of the group order.
pub struct EcPrivateKeyDoc;

impl EcPrivateKeyDoc {
    /// PEM label.
    pub const PEM_LABEL: &'static str = "EC PRIVATE KEY";

    /// Parse the sequence into the private scalar, curve algorithm and
    /// public point.
    pub fn parse(root: &Element) -> Result<(Bignum, KeyAlgorithm, EcPoint)> {
        let ctx = "ec private key";
        let seq = root
            .children()
            .map_err(|_| Error::malformed(ctx, "root is not a sequence"))?;
        if seq.len() != 4 {
            return Err(Error::malformed(ctx, "sequence must have 4 elements"));
        }

        match seq[0].as_integer() {
            Ok(v) if *v == Bignum::from(1u32) => {}
            _ => return Err(Error::malformed(ctx, "unsupported version")),
        }

        let scalar_bytes = Zeroizing::new(
            seq[1]
                .string_bytes()
                .map_err(|_| Error::malformed(ctx, "private key is not an octet string"))?
                .to_vec(),
        );
        let private = Bignum::from_bytes_be(&scalar_bytes);

        if !seq[2].is_context() || seq[2].type_id() != 0 {
            return Err(Error::malformed(ctx, "missing [0] parameters"));
        }
        let params = seq[2].context_to_explicit()?;
        let algo = EcParametersDoc::parse(&params)?;
        if !algo.is_ec() {
            return Err(Error::malformed(ctx, "unrecognized curve"));
        }

        if !seq[3].is_context() || seq[3].type_id() != 1 {
            return Err(Error::malformed(ctx, "missing [1] public key"));
        }
        let public_el = seq[3].context_to_explicit()?;
        let public = EcPublicKeyDoc::parse(&public_el, algo)?;

        Ok((private, algo, public))
    }

    /// Build the sequence for a key pair.
    pub fn dump(private: &Bignum, algo: KeyAlgorithm, public: &EcPoint) -> Result<Element> {
        let id = algo
            .curve_id()
            .ok_or(Error::AlgorithmMismatch("not an ec algorithm"))?;
        let order_len = EcCurve::new(id).order().width().div_ceil(8);
        let scalar = Zeroizing::new(private.to_bytes_be_padded(order_len)?);

        Ok(Element::sequence(vec![
            Element::integer(1u32),
            Element::octet_string(scalar.to_vec()),
            EcParametersDoc::dump(algo)?.explicit_to_context(0)?,
            EcPublicKeyDoc::dump(public)?.explicit_to_context(1)?,
        ]))
    }
}
