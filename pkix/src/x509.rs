//! X.509 version 3 certificates (RFC 5280).
//!
//! ```text
//! Certificate ::= SEQUENCE {
//!     tbsCertificate     TBSCertificate,
//!     signatureAlgorithm AlgorithmIdentifier,
//!     signatureValue     BIT STRING }
//! ```
//!
//! Only version 3 is accepted. Parsing captures the exact byte range of
//! the TBSCertificate, which is what the issuer signed and therefore what
//! [`X509Cert::validate_rsa`] / [`X509Cert::validate_ec`] hash.

use core::fmt;

use bignum::{Bignum, CryptoRng, RngCore};
use dertree::{
    BitString, DateTime, DerDocument, Element, Oid, dump_element, parse_element, type_id,
};
use pkcrypto::ecc::{EcCurve, EcPoint};
use pkcrypto::hash::{Hash, HashAlgorithm};
use pkcrypto::ecdsa;
use pkcrypto::rsa::{RsaPrivateKey, RsaPublicKey, pkcs1};

use crate::extension::Extension;
use crate::name::{RelativeDistinguishedName, dump_rdn_sequence, parse_rdn_sequence};
use crate::spki::SubjectPublicKeyInfo;
use crate::{Error, KeyAlgorithm, Result, oids};

/// Signature algorithms usable on certificates (RFC 3279, RFC 5758).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum X509SignatureAlgo {
    Unknown,
    RsaMd5,
    RsaSha1,
    RsaSha224,
    RsaSha256,
    RsaSha384,
    RsaSha512,
    EcdsaSha1,
    EcdsaSha224,
    EcdsaSha256,
    EcdsaSha384,
    EcdsaSha512,
}

impl X509SignatureAlgo {
    /// Classify a signature algorithm oid.
    pub fn from_oid(oid: &Oid) -> Self {
        const KNOWN: [(&[u32], X509SignatureAlgo); 11] = [
            (oids::RSA_MD5, X509SignatureAlgo::RsaMd5),
            (oids::RSA_SHA1, X509SignatureAlgo::RsaSha1),
            (oids::RSA_SHA224, X509SignatureAlgo::RsaSha224),
            (oids::RSA_SHA256, X509SignatureAlgo::RsaSha256),
            (oids::RSA_SHA384, X509SignatureAlgo::RsaSha384),
            (oids::RSA_SHA512, X509SignatureAlgo::RsaSha512),
            (oids::ECDSA_SHA1, X509SignatureAlgo::EcdsaSha1),
            (oids::ECDSA_SHA224, X509SignatureAlgo::EcdsaSha224),
            (oids::ECDSA_SHA256, X509SignatureAlgo::EcdsaSha256),
            (oids::ECDSA_SHA384, X509SignatureAlgo::EcdsaSha384),
            (oids::ECDSA_SHA512, X509SignatureAlgo::EcdsaSha512),
        ];
        for (arcs, algo) in KNOWN {
            if *oid == arcs {
                return algo;
            }
        }
        X509SignatureAlgo::Unknown
    }

    /// The oid arcs of a known algorithm.
    pub fn oid(&self) -> Option<&'static [u32]> {
        Some(match self {
            X509SignatureAlgo::Unknown => return None,
            X509SignatureAlgo::RsaMd5 => oids::RSA_MD5,
            X509SignatureAlgo::RsaSha1 => oids::RSA_SHA1,
            X509SignatureAlgo::RsaSha224 => oids::RSA_SHA224,
            X509SignatureAlgo::RsaSha256 => oids::RSA_SHA256,
            X509SignatureAlgo::RsaSha384 => oids::RSA_SHA384,
            X509SignatureAlgo::RsaSha512 => oids::RSA_SHA512,
            X509SignatureAlgo::EcdsaSha1 => oids::ECDSA_SHA1,
            X509SignatureAlgo::EcdsaSha224 => oids::ECDSA_SHA224,
            X509SignatureAlgo::EcdsaSha256 => oids::ECDSA_SHA256,
            X509SignatureAlgo::EcdsaSha384 => oids::ECDSA_SHA384,
            X509SignatureAlgo::EcdsaSha512 => oids::ECDSA_SHA512,
        })
    }

    /// The message digest the scheme applies to the TBS bytes.
    pub fn hash(&self) -> Option<HashAlgorithm> {
        Some(match self {
            X509SignatureAlgo::Unknown => return None,
            X509SignatureAlgo::RsaMd5 => HashAlgorithm::Md5,
            X509SignatureAlgo::RsaSha1 | X509SignatureAlgo::EcdsaSha1 => HashAlgorithm::Sha1,
            X509SignatureAlgo::RsaSha224 | X509SignatureAlgo::EcdsaSha224 => HashAlgorithm::Sha224,
            X509SignatureAlgo::RsaSha256 | X509SignatureAlgo::EcdsaSha256 => HashAlgorithm::Sha256,
            X509SignatureAlgo::RsaSha384 | X509SignatureAlgo::EcdsaSha384 => HashAlgorithm::Sha384,
            X509SignatureAlgo::RsaSha512 | X509SignatureAlgo::EcdsaSha512 => HashAlgorithm::Sha512,
        })
    }

    /// Is this an RSA scheme?
    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            X509SignatureAlgo::RsaMd5
                | X509SignatureAlgo::RsaSha1
                | X509SignatureAlgo::RsaSha224
                | X509SignatureAlgo::RsaSha256
                | X509SignatureAlgo::RsaSha384
                | X509SignatureAlgo::RsaSha512
        )
    }

    /// Is this an ECDSA scheme?
    pub fn is_ecdsa(&self) -> bool {
        !matches!(self, X509SignatureAlgo::Unknown) && !self.is_rsa()
    }
}

impl fmt::Display for X509SignatureAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// An X.509 version 3 certificate.
///
/// The name and validity fields are plain data; the signature-related
/// fields (`tbs` bytes, algorithm oid, signature bit string) are filled by
/// [`X509Cert::parse`] and by the signing entry points.
#[derive(Clone, Debug, Default)]
pub struct X509Cert {
    /// Certificate serial number.
    pub serial_number: Bignum,
    /// Issuer name.
    pub issuer: Vec<RelativeDistinguishedName>,
    /// Start of the validity period.
    pub valid_start: Option<DateTime>,
    /// End of the validity period.
    pub valid_end: Option<DateTime>,
    /// Subject name.
    pub subject: Vec<RelativeDistinguishedName>,
    /// Optional issuer unique id (deprecated by RFC 5280, still parsed).
    pub issuer_unique_id: Option<BitString>,
    /// Optional subject unique id.
    pub subject_unique_id: Option<BitString>,
    /// Extensions.
    pub extensions: Vec<Extension>,
    /// The certified public key.
    pub public_key: SubjectPublicKeyInfo,

    tbs: Vec<u8>,
    sig_algo_oid: Option<Oid>,
    sig_algo_params: Option<Element>,
    signature: BitString,
}

/// PEM label for certificates.
pub const CERTIFICATE_PEM_LABEL: &str = "CERTIFICATE";

impl X509Cert {
    /// New empty certificate, to be filled and signed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The TBS byte range of the last parse or signing, the exact bytes
    /// the signature covers.
    pub fn tbs_bytes(&self) -> &[u8] {
        &self.tbs
    }

    /// The signature bit string.
    pub fn signature(&self) -> &BitString {
        &self.signature
    }

    /// The signature algorithm oid, if the certificate has been parsed or
    /// signed.
    pub fn sig_algo_oid(&self) -> Option<&Oid> {
        self.sig_algo_oid.as_ref()
    }

    /// The signature algorithm.
    pub fn sig_algo(&self) -> X509SignatureAlgo {
        match &self.sig_algo_oid {
            Some(oid) => X509SignatureAlgo::from_oid(oid),
            None => X509SignatureAlgo::Unknown,
        }
    }

    /// First extension with the given oid arcs.
    pub fn find_extension(&self, arcs: &[u32]) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.oid == arcs)
    }

    /// Are all critical extensions recognized? A relying party must not
    /// trust the certificate when this is false.
    pub fn critical_extensions_recognized(&self) -> bool {
        self.extensions
            .iter()
            .all(|ext| !ext.critical || ext.is_recognized())
    }

    /// Parse a certificate from a DER document.
    pub fn parse(doc: &DerDocument) -> Result<Self> {
        let root = doc.root()?;
        let outer = root
            .children()
            .map_err(|_| Error::malformed("certificate", "root is not a sequence"))?;
        if outer.len() != 3 {
            return Err(Error::malformed(
                "certificate",
                "root sequence must have 3 elements",
            ));
        }

        let mut cert = Self::new();

        // the outer signature algorithm governs; the tbs copy must agree
        let (sig_oid, sig_params) = parse_algorithm_identifier(&outer[1], "signature algorithm")?;
        cert.sig_algo_oid = Some(sig_oid);
        cert.sig_algo_params = sig_params;
        cert.signature = outer[2]
            .as_bit_string()
            .map_err(|_| Error::malformed("certificate", "signature is not a bit string"))?
            .clone();

        let tbs_region = outer[0].region();
        cert.tbs = doc
            .bytes()
            .get(tbs_region.offset..tbs_region.end())
            .ok_or_else(|| Error::malformed("certificate", "tbs region out of bounds"))?
            .to_vec();

        cert.parse_tbs(&outer[0])?;
        Ok(cert)
    }

    fn parse_tbs(&mut self, tbs: &Element) -> Result<()> {
        let fields = tbs
            .children()
            .map_err(|_| Error::malformed("tbs", "not a sequence"))?;
        let mut fields = fields.iter().peekable();

        // [0] EXPLICIT version; v1 and v2 certificates lack it entirely
        let version = fields
            .next()
            .ok_or_else(|| Error::malformed("tbs", "missing version"))?;
        if !version.is_context() || version.type_id() != 0 {
            return Err(Error::UnsupportedVersion);
        }
        let version = version.context_to_explicit()?;
        if *version.as_integer().map_err(|_| {
            Error::malformed("tbs version", "not an integer")
        })? != Bignum::from(2u32)
        {
            return Err(Error::UnsupportedVersion);
        }

        self.serial_number = fields
            .next()
            .and_then(|el| el.as_integer().ok())
            .ok_or_else(|| Error::malformed("tbs serial", "not an integer"))?
            .clone();

        let inner_alg = fields
            .next()
            .ok_or_else(|| Error::malformed("tbs", "missing signature algorithm"))?;
        let (inner_oid, _) = parse_algorithm_identifier(inner_alg, "tbs signature algorithm")?;
        if Some(&inner_oid) != self.sig_algo_oid.as_ref() {
            return Err(Error::malformed(
                "tbs signature algorithm",
                "does not match the outer algorithm",
            ));
        }

        self.issuer = fields
            .next()
            .map(parse_rdn_sequence)
            .transpose()?
            .ok_or_else(|| Error::malformed("tbs", "missing issuer"))?;

        let validity = fields
            .next()
            .and_then(|el| el.children().ok())
            .ok_or_else(|| Error::malformed("tbs validity", "not a sequence"))?;
        if validity.len() != 2 {
            return Err(Error::malformed("tbs validity", "must have 2 times"));
        }
        self.valid_start = Some(
            *validity[0]
                .as_time()
                .map_err(|_| Error::malformed("tbs validity", "start is not a time"))?,
        );
        self.valid_end = Some(
            *validity[1]
                .as_time()
                .map_err(|_| Error::malformed("tbs validity", "end is not a time"))?,
        );

        self.subject = fields
            .next()
            .map(parse_rdn_sequence)
            .transpose()?
            .ok_or_else(|| Error::malformed("tbs", "missing subject"))?;

        self.public_key = fields
            .next()
            .map(SubjectPublicKeyInfo::parse)
            .transpose()?
            .ok_or_else(|| Error::malformed("tbs", "missing subject public key info"))?;

        // optional [1]/[2] IMPLICIT unique ids, then [3] EXPLICIT extensions
        if let Some(el) = fields.peek() {
            if el.is_context() && el.type_id() == 1 {
                let bits = el.context_to_implicit(type_id::BIT_STRING)?;
                self.issuer_unique_id = Some(bits.as_bit_string()?.clone());
                fields.next();
            }
        }
        if let Some(el) = fields.peek() {
            if el.is_context() && el.type_id() == 2 {
                let bits = el.context_to_implicit(type_id::BIT_STRING)?;
                self.subject_unique_id = Some(bits.as_bit_string()?.clone());
                fields.next();
            }
        }
        if let Some(el) = fields.peek() {
            if el.is_context() && el.type_id() == 3 {
                let list = el.context_to_explicit()?;
                let list = list
                    .children()
                    .map_err(|_| Error::malformed("tbs extensions", "not a sequence"))?;
                self.extensions = list.iter().map(Extension::parse).collect::<Result<_>>()?;
                fields.next();
            }
        }
        if fields.next().is_some() {
            return Err(Error::malformed("tbs", "trailing elements"));
        }
        Ok(())
    }

    /// Build the TBSCertificate element from the data fields.
    pub fn to_tbs_element(&self) -> Result<Element> {
        let mut fields = vec![
            Element::integer(2u32).explicit_to_context(0)?,
            Element::integer(self.serial_number.clone()),
            self.algorithm_identifier()?,
            dump_rdn_sequence(&self.issuer),
            Element::sequence(vec![
                time_element(self.valid_start, "validity start")?,
                time_element(self.valid_end, "validity end")?,
            ]),
            dump_rdn_sequence(&self.subject),
            self.public_key.to_element()?,
        ];
        if let Some(bits) = &self.issuer_unique_id {
            fields.push(Element::bit_string(bits.clone()).implicit_to_context(1)?);
        }
        if let Some(bits) = &self.subject_unique_id {
            fields.push(Element::bit_string(bits.clone()).implicit_to_context(2)?);
        }
        if !self.extensions.is_empty() {
            let list = self
                .extensions
                .iter()
                .map(Extension::to_element)
                .collect::<Result<_>>()?;
            fields.push(Element::sequence(list).explicit_to_context(3)?);
        }
        Ok(Element::sequence(fields))
    }

    /// Sign with an RSA key and serialize the whole certificate into
    /// `doc`. Sets the algorithm, TBS bytes and signature on `self`.
    pub fn sign_and_dump_rsa(
        &mut self,
        doc: &mut DerDocument,
        key: &RsaPrivateKey,
        algo: X509SignatureAlgo,
    ) -> Result<Vec<u8>> {
        if !algo.is_rsa() {
            return Err(Error::AlgorithmMismatch("not an rsa signature algorithm"));
        }
        let hash = algo.hash().ok_or(Error::AlgorithmMismatch("no digest"))?;
        self.sig_algo_oid = algo.oid().map(oids::oid);
        self.sig_algo_params = Some(Element::null());

        let tbs_element = self.to_tbs_element()?;
        self.tbs = dump_element(&tbs_element)?;

        let signature = pkcs1::sign(key, hash, &self.tbs)?;
        self.signature = BitString::from_octets(signature);
        self.assemble(doc, tbs_element)
    }

    /// Sign with an ECDSA key and serialize the whole certificate into
    /// `doc`. Ephemeral scalars are drawn from `rng` (retrying the rare
    /// degenerate ones); the signature content is `SEQUENCE { r, s }`.
    pub fn sign_and_dump_ecdsa<R: CryptoRng + RngCore + ?Sized>(
        &mut self,
        rng: &mut R,
        doc: &mut DerDocument,
        curve: &EcCurve,
        reg_private: &Bignum,
        algo: X509SignatureAlgo,
    ) -> Result<Vec<u8>> {
        if !algo.is_ecdsa() {
            return Err(Error::AlgorithmMismatch("not an ecdsa signature algorithm"));
        }
        let hash = algo.hash().ok_or(Error::AlgorithmMismatch("no digest"))?;
        self.sig_algo_oid = algo.oid().map(oids::oid);
        self.sig_algo_params = None;

        let tbs_element = self.to_tbs_element()?;
        self.tbs = dump_element(&tbs_element)?;
        let digest = Hash::digest(hash, &self.tbs);

        let (r, s) = loop {
            let ephemeral = curve.generate_private_key(rng)?;
            if ephemeral == *reg_private {
                continue;
            }
            match ecdsa::sign(curve, reg_private, &ephemeral, &digest) {
                Ok(sig) => break sig,
                Err(pkcrypto::Error::KeyGeneration(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        };
        let sig_seq = Element::sequence(vec![Element::integer(r), Element::integer(s)]);
        self.signature = BitString::from_octets(dump_element(&sig_seq)?);
        self.assemble(doc, tbs_element)
    }

    fn assemble(&mut self, doc: &mut DerDocument, tbs_element: Element) -> Result<Vec<u8>> {
        let root = Element::sequence(vec![
            tbs_element,
            self.algorithm_identifier()?,
            Element::bit_string(self.signature.clone()),
        ]);
        doc.set_root(root);
        Ok(doc.dump()?)
    }

    fn algorithm_identifier(&self) -> Result<Element> {
        let oid = self
            .sig_algo_oid
            .clone()
            .ok_or(Error::AlgorithmMismatch("signature algorithm not set"))?;
        let mut seq = vec![Element::object_identifier(oid)];
        if let Some(params) = &self.sig_algo_params {
            seq.push(parse_element(&dump_element(params)?, 0)?);
        }
        Ok(Element::sequence(seq))
    }

    /// Verify the signature against an RSA public key. False when the
    /// algorithm is not RSA, is unknown, or the signature does not match.
    pub fn validate_rsa(&self, key: &RsaPublicKey) -> bool {
        let algo = self.sig_algo();
        if !algo.is_rsa() || self.tbs.is_empty() {
            return false;
        }
        let Some(hash) = algo.hash() else {
            return false;
        };
        pkcs1::verify(key, hash, &self.tbs, self.signature.as_bytes())
    }

    /// Verify the signature against an EC public point. False when the
    /// algorithm is not ECDSA, is unknown, or the signature does not
    /// match; an invalid point is also a mismatch.
    pub fn validate_ec(&self, public: &EcPoint) -> bool {
        let algo = self.sig_algo();
        if !algo.is_ecdsa() || self.tbs.is_empty() {
            return false;
        }
        let Some(hash) = algo.hash() else {
            return false;
        };
        // the signature bit string wraps SEQUENCE { r INTEGER, s INTEGER }
        let Ok(sig) = parse_element(self.signature.as_bytes(), 0) else {
            return false;
        };
        let Ok(parts) = sig.children() else {
            return false;
        };
        if parts.len() != 2 {
            return false;
        }
        let (Ok(r), Ok(s)) = (parts[0].as_integer(), parts[1].as_integer()) else {
            return false;
        };
        let digest = Hash::digest(hash, &self.tbs);
        ecdsa::verify(public, &digest, r, s)
    }

    /// Verify this certificate against an issuer certificate's public
    /// key.
    pub fn validate_cert(&self, issuer: &X509Cert) -> bool {
        match issuer.public_key.algo_type() {
            KeyAlgorithm::Rsa => match issuer.public_key.rsa_key() {
                Ok(key) => self.validate_rsa(&key),
                Err(_) => false,
            },
            algo if algo.is_ec() => match issuer.public_key.ec_point() {
                Ok(point) => self.validate_ec(&point),
                Err(_) => false,
            },
            _ => false,
        }
    }

    /// Is this certificate self-signed? True for trust anchors.
    pub fn validate_self(&self) -> bool {
        self.validate_cert(self)
    }
}

impl fmt::Display for X509Cert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "certificate sn {} {}", self.serial_number, self.public_key)?;
        write!(f, " sig {}", self.sig_algo())?;
        for rdn in &self.subject {
            write!(f, " subject [{rdn}]")?;
        }
        for rdn in &self.issuer {
            write!(f, " issuer [{rdn}]")?;
        }
        Ok(())
    }
}

fn parse_algorithm_identifier(el: &Element, ctx: &str) -> Result<(Oid, Option<Element>)> {
    let seq = el
        .children()
        .map_err(|_| Error::malformed(ctx, "not a sequence"))?;
    if seq.is_empty() || seq.len() > 2 {
        return Err(Error::malformed(ctx, "sequence size"));
    }
    let oid = seq[0]
        .as_object_identifier()
        .map_err(|_| Error::malformed(ctx, "algorithm is not an oid"))?
        .clone();
    let params = match seq.get(1) {
        None => None,
        Some(p) => Some(parse_element(&dump_element(p)?, 0)?),
    };
    Ok((oid, params))
}

fn time_element(time: Option<DateTime>, what: &'static str) -> Result<Element> {
    let time = time.ok_or_else(|| Error::malformed(what, "not set"))?;
    // dates through 2049 use UTCTime, later ones GeneralizedTime
    if (1950..=2049).contains(&time.year()) {
        Ok(Element::utc_time(time))
    } else {
        Ok(Element::generalized_time(time))
    }
}

