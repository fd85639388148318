//! Subject public key information (X.509 `SubjectPublicKeyInfo`).
//!
//! ```text
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm        AlgorithmIdentifier,
//!     subjectPublicKey BIT STRING }
//!
//! AlgorithmIdentifier ::= SEQUENCE {
//!     algorithm  OBJECT IDENTIFIER,
//!     parameters ANY DEFINED BY algorithm OPTIONAL }
//! ```
//!
//! RSA keys carry a NULL parameter and a DER `RSAPublicKey` in the bit
//! string; EC keys carry a named-curve oid parameter and the SEC1
//! uncompressed point. The PEM label is `PUBLIC KEY` (RFC 7468).

use core::fmt;

use dertree::{BitString, DerDocument, Element, Oid, dump_element, parse_element};
use pkcrypto::ecc::{EcCurve, EcCurveId, EcPoint};
use pkcrypto::rsa::RsaPublicKey;

use crate::keys::{EcPublicKeyDoc, RsaPublicKeyDoc};
use crate::{Error, Result, oids};

/// The key algorithm carried by a [`SubjectPublicKeyInfo`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyAlgorithm {
    /// Not a recognized algorithm/parameter combination.
    Unknown,
    /// RSA.
    Rsa,
    /// EC on secp192r1.
    EcP192r1,
    /// EC on secp224r1.
    EcP224r1,
    /// EC on secp256r1.
    EcP256r1,
    /// EC on secp384r1.
    EcP384r1,
    /// EC on secp521r1.
    EcP521r1,
}

impl KeyAlgorithm {
    /// The named curve of an EC algorithm.
    pub fn curve_id(&self) -> Option<EcCurveId> {
        match self {
            KeyAlgorithm::EcP192r1 => Some(EcCurveId::P192r1),
            KeyAlgorithm::EcP224r1 => Some(EcCurveId::P224r1),
            KeyAlgorithm::EcP256r1 => Some(EcCurveId::P256r1),
            KeyAlgorithm::EcP384r1 => Some(EcCurveId::P384r1),
            KeyAlgorithm::EcP521r1 => Some(EcCurveId::P521r1),
            _ => None,
        }
    }

    /// The named-curve oid arcs of an EC algorithm.
    pub fn curve_oid(&self) -> Option<&'static [u32]> {
        match self {
            KeyAlgorithm::EcP192r1 => Some(oids::CURVE_P192R1),
            KeyAlgorithm::EcP224r1 => Some(oids::CURVE_P224R1),
            KeyAlgorithm::EcP256r1 => Some(oids::CURVE_P256R1),
            KeyAlgorithm::EcP384r1 => Some(oids::CURVE_P384R1),
            KeyAlgorithm::EcP521r1 => Some(oids::CURVE_P521R1),
            _ => None,
        }
    }

    /// Map a named-curve oid to the EC algorithm it names.
    pub fn from_curve_oid(oid: &Oid) -> KeyAlgorithm {
        if *oid == oids::CURVE_P192R1 {
            KeyAlgorithm::EcP192r1
        } else if *oid == oids::CURVE_P224R1 {
            KeyAlgorithm::EcP224r1
        } else if *oid == oids::CURVE_P256R1 {
            KeyAlgorithm::EcP256r1
        } else if *oid == oids::CURVE_P384R1 {
            KeyAlgorithm::EcP384r1
        } else if *oid == oids::CURVE_P521R1 {
            KeyAlgorithm::EcP521r1
        } else {
            KeyAlgorithm::Unknown
        }
    }

    /// Is this one of the EC algorithms?
    pub fn is_ec(&self) -> bool {
        self.curve_id().is_some()
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyAlgorithm::Unknown => "unknown",
            KeyAlgorithm::Rsa => "rsa",
            KeyAlgorithm::EcP192r1 => "ecdsa 192",
            KeyAlgorithm::EcP224r1 => "ecdsa 224",
            KeyAlgorithm::EcP256r1 => "ecdsa 256",
            KeyAlgorithm::EcP384r1 => "ecdsa 384",
            KeyAlgorithm::EcP521r1 => "ecdsa 521",
        })
    }
}

/// A public key with its algorithm identification, as embedded in
/// certificates and standalone `PUBLIC KEY` PEM files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubjectPublicKeyInfo {
    /// Algorithm oid.
    pub algorithm: Oid,
    /// Algorithm parameters, retained uninterpreted. NULL for RSA, a
    /// named-curve oid for EC.
    pub parameters: Option<Element>,
    /// The bit-string payload: a DER `RSAPublicKey` or a SEC1 point.
    pub public_key: Vec<u8>,
}

impl SubjectPublicKeyInfo {
    /// PEM label.
    pub const PEM_LABEL: &'static str = "PUBLIC KEY";

    /// Parse from the root sequence.
    pub fn parse(root: &Element) -> Result<Self> {
        let ctx = "public key info";
        let children = root
            .children()
            .map_err(|_| Error::malformed(ctx, "root is not a sequence"))?;
        if children.len() != 2 {
            return Err(Error::malformed(ctx, "root sequence must have 2 elements"));
        }

        let alg = children[0]
            .children()
            .map_err(|_| Error::malformed(ctx, "algorithm identifier is not a sequence"))?;
        if alg.is_empty() || alg.len() > 2 {
            return Err(Error::malformed(ctx, "algorithm identifier size"));
        }
        let algorithm = alg[0]
            .as_object_identifier()
            .map_err(|_| Error::malformed(ctx, "algorithm is not an oid"))?
            .clone();

        // re-encode the parameters so the stored element stands on its own
        let parameters = match alg.get(1) {
            None => None,
            Some(el) => Some(parse_element(&dump_element(el)?, 0)?),
        };

        let bits = children[1]
            .as_bit_string()
            .map_err(|_| Error::malformed(ctx, "public key is not a bit string"))?;
        if bits.width() % 8 != 0 {
            return Err(Error::malformed(ctx, "public key is not octet aligned"));
        }

        Ok(Self {
            algorithm,
            parameters,
            public_key: bits.to_bytes(),
        })
    }

    /// Parse from a document root.
    pub fn from_document(doc: &DerDocument) -> Result<Self> {
        Self::parse(doc.root()?)
    }

    /// Build the `SubjectPublicKeyInfo` sequence.
    pub fn to_element(&self) -> Result<Element> {
        let mut alg = vec![Element::object_identifier(self.algorithm.clone())];
        if let Some(parameters) = &self.parameters {
            alg.push(parse_element(&dump_element(parameters)?, 0)?);
        }
        Ok(Element::sequence(vec![
            Element::sequence(alg),
            Element::bit_string(BitString::from_octets(self.public_key.clone())),
        ]))
    }

    /// The algorithm named by the oid/parameter pair.
    pub fn algo_type(&self) -> KeyAlgorithm {
        if self.algorithm == oids::RSA_ENCRYPTION {
            if matches!(&self.parameters, Some(p) if p.is_null()) {
                return KeyAlgorithm::Rsa;
            }
        } else if self.algorithm == oids::EC_PUBLIC_KEY {
            if let Some(p) = &self.parameters {
                if let Ok(oid) = p.as_object_identifier() {
                    return KeyAlgorithm::from_curve_oid(oid);
                }
            }
        }
        KeyAlgorithm::Unknown
    }

    /// Decode the embedded RSA public key.
    pub fn rsa_key(&self) -> Result<RsaPublicKey> {
        if self.algo_type() != KeyAlgorithm::Rsa {
            return Err(Error::AlgorithmMismatch("not an rsa key"));
        }
        let root = parse_element(&self.public_key, 0)?;
        RsaPublicKeyDoc::parse(&root)
    }

    /// Store an RSA public key, setting the algorithm and parameters.
    pub fn set_rsa_key(&mut self, key: &RsaPublicKey) -> Result<()> {
        self.algorithm = oids::oid(oids::RSA_ENCRYPTION);
        self.parameters = Some(Element::null());
        self.public_key = dump_element(&RsaPublicKeyDoc::dump(key))?;
        Ok(())
    }

    /// Decode the embedded EC public point.
    pub fn ec_point(&self) -> Result<EcPoint> {
        let algo = self.algo_type();
        if !algo.is_ec() {
            return Err(Error::AlgorithmMismatch("not an ec key"));
        }
        EcPublicKeyDoc::parse_bytes(&self.public_key, algo)
    }

    /// Store an EC public point under the given EC algorithm.
    pub fn set_ec_point(&mut self, algo: KeyAlgorithm, point: &EcPoint) -> Result<()> {
        let arcs = algo
            .curve_oid()
            .ok_or(Error::AlgorithmMismatch("not an ec algorithm"))?;
        self.algorithm = oids::oid(oids::EC_PUBLIC_KEY);
        self.parameters = Some(Element::object_identifier(oids::oid(arcs)));
        self.public_key = point.to_uncompressed().map_err(Error::from)?;
        Ok(())
    }

    /// Build an info block from an RSA key.
    pub fn from_rsa_key(key: &RsaPublicKey) -> Result<Self> {
        let mut info = Self::empty();
        info.set_rsa_key(key)?;
        Ok(info)
    }

    /// Build an info block from an EC point.
    pub fn from_ec_point(algo: KeyAlgorithm, point: &EcPoint) -> Result<Self> {
        let mut info = Self::empty();
        info.set_ec_point(algo, point)?;
        Ok(info)
    }

    /// Decode the EC point with an explicit curve (for keys whose
    /// parameters are carried out of band).
    pub fn ec_point_on(&self, curve: &EcCurve) -> Result<EcPoint> {
        Ok(EcPoint::from_uncompressed(curve, &self.public_key)?)
    }

    fn empty() -> Self {
        Self::default()
    }
}

impl Default for SubjectPublicKeyInfo {
    fn default() -> Self {
        Self {
            algorithm: oids::oid(oids::RSA_ENCRYPTION),
            parameters: None,
            public_key: Vec::new(),
        }
    }
}

impl fmt::Display for SubjectPublicKeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pub key info: {} id: {} size: {}",
            self.algo_type(),
            self.algorithm,
            self.public_key.len()
        )
    }
}
