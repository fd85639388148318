//! X.509 v3 certificate extensions (RFC 5280 section 4.2).
//!
//! ```text
//! Extension ::= SEQUENCE {
//!     extnID    OBJECT IDENTIFIER,
//!     critical  BOOLEAN DEFAULT FALSE,
//!     extnValue OCTET STRING }  -- DER encoding of the inner value
//! ```
//!
//! Seven extensions are interpreted; anything else is retained by oid and
//! raw value. A critical extension that is not recognized parses fine,
//! but a relying party must refuse to act on the certificate — that check
//! belongs to the caller and is exposed as
//! [`Extension::is_recognized`].

use bignum::Bignum;
use dertree::{BitString, Class, Element, Oid, dump_element, parse_element, type_id};

use crate::general_name::GeneralName;
use crate::{Error, Result, oids};

/// Key usage flags: BIT STRING named bits 0 through 8.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeyUsage {
    /// Bit 0: verifying signatures other than on certificates and CRLs.
    pub digital_signature: bool,
    /// Bit 1: non-repudiation / content commitment.
    pub content_commitment: bool,
    /// Bit 2: enciphering private keys in key transport.
    pub key_encipherment: bool,
    /// Bit 3: enciphering raw data.
    pub data_encipherment: bool,
    /// Bit 4: key agreement.
    pub key_agreement: bool,
    /// Bit 5: verifying signatures on certificates.
    pub key_cert_sign: bool,
    /// Bit 6: verifying signatures on CRLs.
    pub crl_sign: bool,
    /// Bit 7: encipher only during key agreement.
    pub encipher_only: bool,
    /// Bit 8: decipher only during key agreement.
    pub decipher_only: bool,
}

impl KeyUsage {
    fn from_bits(bits: &BitString) -> Self {
        Self {
            digital_signature: bits.is_bit_set(0),
            content_commitment: bits.is_bit_set(1),
            key_encipherment: bits.is_bit_set(2),
            data_encipherment: bits.is_bit_set(3),
            key_agreement: bits.is_bit_set(4),
            key_cert_sign: bits.is_bit_set(5),
            crl_sign: bits.is_bit_set(6),
            encipher_only: bits.is_bit_set(7),
            decipher_only: bits.is_bit_set(8),
        }
    }

    fn to_bits(self) -> BitString {
        let flags = [
            self.digital_signature,
            self.content_commitment,
            self.key_encipherment,
            self.data_encipherment,
            self.key_agreement,
            self.key_cert_sign,
            self.crl_sign,
            self.encipher_only,
            self.decipher_only,
        ];
        // named bits drop trailing zeroes in DER
        let width = flags.iter().rposition(|&f| f).map_or(0, |i| i + 1);
        let mut bits = BitString::from_bytes(vec![0u8; 2], width);
        for (i, &flag) in flags.iter().enumerate() {
            bits.set_bit(i, flag);
        }
        bits
    }
}

/// Extended key usage purposes, with unrecognized purpose oids retained.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtendedKeyUsage {
    /// anyExtendedKeyUsage.
    pub any: bool,
    /// TLS server authentication.
    pub server_auth: bool,
    /// TLS client authentication.
    pub client_auth: bool,
    /// Code signing.
    pub code_signing: bool,
    /// Email protection.
    pub email_protection: bool,
    /// Timestamping.
    pub time_stamping: bool,
    /// OCSP response signing.
    pub ocsp_signing: bool,
    /// Purpose oids not in the list above.
    pub additional: Vec<Oid>,
}

impl ExtendedKeyUsage {
    fn add(&mut self, oid: &Oid) {
        if *oid == oids::KP_ANY {
            self.any = true;
        } else if *oid == oids::KP_SERVER_AUTH {
            self.server_auth = true;
        } else if *oid == oids::KP_CLIENT_AUTH {
            self.client_auth = true;
        } else if *oid == oids::KP_CODE_SIGNING {
            self.code_signing = true;
        } else if *oid == oids::KP_EMAIL_PROTECTION {
            self.email_protection = true;
        } else if *oid == oids::KP_TIME_STAMPING {
            self.time_stamping = true;
        } else if *oid == oids::KP_OCSP_SIGNING {
            self.ocsp_signing = true;
        } else {
            self.additional.push(oid.clone());
        }
    }

    fn purposes(&self) -> Vec<Oid> {
        let known: [(bool, &[u32]); 7] = [
            (self.any, oids::KP_ANY),
            (self.server_auth, oids::KP_SERVER_AUTH),
            (self.client_auth, oids::KP_CLIENT_AUTH),
            (self.code_signing, oids::KP_CODE_SIGNING),
            (self.email_protection, oids::KP_EMAIL_PROTECTION),
            (self.time_stamping, oids::KP_TIME_STAMPING),
            (self.ocsp_signing, oids::KP_OCSP_SIGNING),
        ];
        let mut out: Vec<Oid> = known
            .into_iter()
            .filter(|(set, _)| *set)
            .map(|(_, arcs)| oids::oid(arcs))
            .collect();
        out.extend(self.additional.iter().cloned());
        out
    }
}

/// Authority key identifier fields, all optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthorityKeyIdentifier {
    /// `[0]` identifier of the signing key.
    pub key_identifier: Option<Vec<u8>>,
    /// `[1]` name(s) of the issuing authority.
    pub authority_cert_issuer: Vec<GeneralName>,
    /// `[2]` serial number of the authority's certificate.
    pub authority_cert_serial_number: Option<Bignum>,
}

/// The interpreted value of an extension.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtensionValue {
    /// 2.5.29.17: alternative names of the subject.
    SubjectAlternativeName(Vec<GeneralName>),
    /// 2.5.29.18: alternative names of the issuer.
    IssuerAlternativeName(Vec<GeneralName>),
    /// 2.5.29.35: identification of the signing key.
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    /// 2.5.29.14: identifier of the certified key.
    SubjectKeyIdentifier(Vec<u8>),
    /// 2.5.29.19: CA flag and chain length limit.
    BasicConstraints {
        /// May this certificate's key sign other certificates?
        ca: bool,
        /// Maximum number of intermediate certificates below this one.
        path_len_constraint: Option<Bignum>,
    },
    /// 2.5.29.15: key usage flags.
    KeyUsage(KeyUsage),
    /// 2.5.29.37: extended usage purposes.
    ExtendedKeyUsage(ExtendedKeyUsage),
    /// Any other extension: the raw `extnValue` octets.
    Unknown(Vec<u8>),
}

/// One certificate extension: oid, criticality, interpreted value.
#[derive(Clone, Debug, PartialEq)]
pub struct Extension {
    /// Extension oid.
    pub oid: Oid,
    /// Criticality flag (DEFAULT FALSE).
    pub critical: bool,
    /// Interpreted value.
    pub value: ExtensionValue,
}

impl Extension {
    /// Build an extension for an interpreted value; the oid follows the
    /// value's type.
    pub fn new(value: ExtensionValue, critical: bool) -> Self {
        let arcs: &[u32] = match &value {
            ExtensionValue::SubjectAlternativeName(_) => oids::CE_SUBJECT_ALT_NAME,
            ExtensionValue::IssuerAlternativeName(_) => oids::CE_ISSUER_ALT_NAME,
            ExtensionValue::AuthorityKeyIdentifier(_) => oids::CE_AUTHORITY_KEY_IDENTIFIER,
            ExtensionValue::SubjectKeyIdentifier(_) => oids::CE_SUBJECT_KEY_IDENTIFIER,
            ExtensionValue::BasicConstraints { .. } => oids::CE_BASIC_CONSTRAINTS,
            ExtensionValue::KeyUsage(_) => oids::CE_KEY_USAGE,
            ExtensionValue::ExtendedKeyUsage(_) => oids::CE_EXT_KEY_USAGE,
            ExtensionValue::Unknown(_) => {
                unreachable!("unknown extensions are built with Extension::unknown")
            }
        };
        Self {
            oid: oids::oid(arcs),
            critical,
            value,
        }
    }

    /// Build an uninterpreted extension from its raw value octets.
    pub fn unknown(oid: Oid, critical: bool, value: impl Into<Vec<u8>>) -> Self {
        Self {
            oid,
            critical,
            value: ExtensionValue::Unknown(value.into()),
        }
    }

    /// Is the value interpreted?
    ///
    /// A certificate carrying a critical extension for which this returns
    /// `false` must not be trusted by a relying party.
    pub fn is_recognized(&self) -> bool {
        !matches!(self.value, ExtensionValue::Unknown(_))
    }

    /// Parse an `Extension` sequence.
    pub fn parse(el: &Element) -> Result<Self> {
        let ctx = "extension";
        let seq = el
            .children()
            .map_err(|_| Error::malformed(ctx, "element is not a sequence"))?;
        if seq.is_empty() || seq.len() > 3 {
            return Err(Error::malformed(ctx, "sequence size"));
        }
        let oid = seq[0]
            .as_object_identifier()
            .map_err(|_| Error::malformed(ctx, "id is not an oid"))?
            .clone();

        let (critical, value_idx) = if seq.len() == 3 {
            (
                seq[1]
                    .as_boolean()
                    .map_err(|_| Error::malformed(ctx, "critical flag is not a boolean"))?,
                2,
            )
        } else if seq.len() == 2 && seq[1].is_boolean() {
            // a lone critical flag with no value
            return Err(Error::malformed(ctx, "missing value"));
        } else {
            (false, 1)
        };
        let raw = seq
            .get(value_idx)
            .ok_or_else(|| Error::malformed(ctx, "missing value"))?
            .string_bytes()
            .map_err(|_| Error::malformed(ctx, "value is not an octet string"))?;

        let value = Self::parse_value(&oid, raw)?;
        Ok(Self {
            oid,
            critical,
            value,
        })
    }

    fn parse_value(oid: &Oid, raw: &[u8]) -> Result<ExtensionValue> {
        Ok(if *oid == oids::CE_SUBJECT_ALT_NAME {
            let inner = parse_element(raw, 0)?;
            ExtensionValue::SubjectAlternativeName(GeneralName::parse_sequence(&inner)?)
        } else if *oid == oids::CE_ISSUER_ALT_NAME {
            let inner = parse_element(raw, 0)?;
            ExtensionValue::IssuerAlternativeName(GeneralName::parse_sequence(&inner)?)
        } else if *oid == oids::CE_AUTHORITY_KEY_IDENTIFIER {
            ExtensionValue::AuthorityKeyIdentifier(parse_authority_key_identifier(raw)?)
        } else if *oid == oids::CE_SUBJECT_KEY_IDENTIFIER {
            let inner = parse_element(raw, 0)?;
            ExtensionValue::SubjectKeyIdentifier(
                inner
                    .string_bytes()
                    .map_err(|_| {
                        Error::malformed("subject key identifier", "value is not an octet string")
                    })?
                    .to_vec(),
            )
        } else if *oid == oids::CE_BASIC_CONSTRAINTS {
            parse_basic_constraints(raw)?
        } else if *oid == oids::CE_KEY_USAGE {
            let inner = parse_element(raw, 0)?;
            let bits = inner
                .as_bit_string()
                .map_err(|_| Error::malformed("key usage", "value is not a bit string"))?;
            ExtensionValue::KeyUsage(KeyUsage::from_bits(bits))
        } else if *oid == oids::CE_EXT_KEY_USAGE {
            let inner = parse_element(raw, 0)?;
            let mut eku = ExtendedKeyUsage::default();
            for purpose in inner.children().map_err(|_| {
                Error::malformed("extended key usage", "value is not a sequence")
            })? {
                eku.add(purpose.as_object_identifier().map_err(|_| {
                    Error::malformed("extended key usage", "purpose is not an oid")
                })?);
            }
            ExtensionValue::ExtendedKeyUsage(eku)
        } else {
            ExtensionValue::Unknown(raw.to_vec())
        })
    }

    /// Build the `Extension` sequence. The critical flag is omitted when
    /// false, per its DEFAULT.
    pub fn to_element(&self) -> Result<Element> {
        let inner = match &self.value {
            ExtensionValue::SubjectAlternativeName(names)
            | ExtensionValue::IssuerAlternativeName(names) => {
                dump_element(&GeneralName::dump_sequence(names)?)?
            }
            ExtensionValue::AuthorityKeyIdentifier(akid) => {
                dump_element(&dump_authority_key_identifier(akid)?)?
            }
            ExtensionValue::SubjectKeyIdentifier(id) => {
                dump_element(&Element::octet_string(id.clone()))?
            }
            ExtensionValue::BasicConstraints {
                ca,
                path_len_constraint,
            } => {
                let mut seq = Vec::new();
                if *ca {
                    seq.push(Element::boolean(true));
                }
                if let Some(limit) = path_len_constraint {
                    seq.push(Element::integer(limit.clone()));
                }
                dump_element(&Element::sequence(seq))?
            }
            ExtensionValue::KeyUsage(usage) => {
                dump_element(&Element::bit_string(usage.to_bits()))?
            }
            ExtensionValue::ExtendedKeyUsage(eku) => dump_element(&Element::sequence(
                eku.purposes()
                    .into_iter()
                    .map(Element::object_identifier)
                    .collect(),
            ))?,
            ExtensionValue::Unknown(raw) => raw.clone(),
        };

        let mut seq = vec![Element::object_identifier(self.oid.clone())];
        if self.critical {
            seq.push(Element::boolean(true));
        }
        seq.push(Element::octet_string(inner));
        Ok(Element::sequence(seq))
    }
}

fn parse_basic_constraints(raw: &[u8]) -> Result<ExtensionValue> {
    let ctx = "basic constraints";
    let inner = parse_element(raw, 0)?;
    let seq = inner
        .children()
        .map_err(|_| Error::malformed(ctx, "value is not a sequence"))?;
    let mut ca = false;
    let mut path_len_constraint = None;
    let mut idx = 0;
    if let Some(el) = seq.first() {
        if el.is_boolean() {
            ca = el.as_boolean()?;
            idx = 1;
        }
    }
    if let Some(el) = seq.get(idx) {
        path_len_constraint = Some(
            el.as_integer()
                .map_err(|_| Error::malformed(ctx, "path length is not an integer"))?
                .clone(),
        );
        idx += 1;
    }
    if idx != seq.len() {
        return Err(Error::malformed(ctx, "trailing elements"));
    }
    Ok(ExtensionValue::BasicConstraints {
        ca,
        path_len_constraint,
    })
}

// AuthorityKeyIdentifier ::= SEQUENCE {
//     keyIdentifier             [0] OCTET STRING        OPTIONAL,
//     authorityCertIssuer       [1] GeneralNames        OPTIONAL,
//     authorityCertSerialNumber [2] INTEGER             OPTIONAL }
fn parse_authority_key_identifier(raw: &[u8]) -> Result<AuthorityKeyIdentifier> {
    let ctx = "authority key identifier";
    let inner = parse_element(raw, 0)?;
    let seq = inner
        .children()
        .map_err(|_| Error::malformed(ctx, "value is not a sequence"))?;
    let mut akid = AuthorityKeyIdentifier::default();
    for el in seq {
        let op = el
            .as_opaque()
            .ok()
            .filter(|op| op.class == Class::Context)
            .ok_or_else(|| Error::malformed(ctx, "field is not context class"))?;
        match op.id {
            0 => akid.key_identifier = Some(op.data.to_vec()),
            1 => {
                // implicit GeneralNames: the children are the names
                akid.authority_cert_issuer = op
                    .children
                    .iter()
                    .map(GeneralName::parse)
                    .collect::<Result<_>>()?;
            }
            2 => {
                let int = el.context_to_implicit(type_id::INTEGER)?;
                akid.authority_cert_serial_number = Some(int.as_integer()?.clone());
            }
            _ => return Err(Error::malformed(ctx, "unexpected field tag")),
        }
    }
    Ok(akid)
}

fn dump_authority_key_identifier(akid: &AuthorityKeyIdentifier) -> Result<Element> {
    let mut seq = Vec::new();
    if let Some(id) = &akid.key_identifier {
        seq.push(Element::octet_string(id.clone()).implicit_to_context(0)?);
    }
    if !akid.authority_cert_issuer.is_empty() {
        let names = GeneralName::dump_sequence(&akid.authority_cert_issuer)?;
        seq.push(names.implicit_to_context(1)?);
    }
    if let Some(serial) = &akid.authority_cert_serial_number {
        seq.push(Element::integer(serial.clone()).implicit_to_context(2)?);
    }
    Ok(Element::sequence(seq))
}
