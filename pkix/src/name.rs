//! X.500 names: directory strings and relative distinguished names.

use core::fmt;
use std::borrow::Cow;
use std::collections::BTreeMap;

use dertree::{Element, Oid, Value};
use zeroize::Zeroizing;

use crate::{Error, Result, oids};

/// The string type a directory string was encoded with.
///
/// X.509 v3 recommends only printable and utf8; the remaining types appear
/// in older certificates (ia5 shows up in some root CAs).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirectoryStringKind {
    /// PrintableString.
    Printable,
    /// UTF8String.
    Utf8,
    /// UniversalString.
    Universal,
    /// BMPString.
    Bmp,
    /// TeletexString.
    Teletex,
    /// IA5String.
    Ia5,
    /// VisibleString.
    Visible,
}

/// A name string together with its encoded string type.
///
/// Equality is byte-exact over the contents and ignores the string type.
/// The RFC 4518 preparation a strictly conforming comparison needs
/// (case folding, space normalization after conversion to Unicode) is not
/// implemented; two names that differ only in encoding details compare
/// unequal here.
#[derive(Clone, Debug)]
pub struct DirectoryString {
    /// Encoded string type.
    pub kind: DirectoryStringKind,
    bytes: Zeroizing<Vec<u8>>,
}

impl DirectoryString {
    /// Build from raw bytes and a string type.
    pub fn new(kind: DirectoryStringKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            bytes: Zeroizing::new(bytes.into()),
        }
    }

    /// A printable string, the customary default type.
    pub fn printable(text: impl Into<String>) -> Self {
        Self::new(DirectoryStringKind::Printable, text.into().into_bytes())
    }

    /// A utf8 string.
    pub fn utf8(text: impl Into<String>) -> Self {
        Self::new(DirectoryStringKind::Utf8, text.into().into_bytes())
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The contents as text, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Parse from any string-family element.
    pub fn parse(el: &Element) -> Result<Self> {
        let kind = match el.value() {
            Value::PrintableString(_) => DirectoryStringKind::Printable,
            Value::Utf8String(_) => DirectoryStringKind::Utf8,
            Value::UniversalString(_) => DirectoryStringKind::Universal,
            Value::BmpString(_) => DirectoryStringKind::Bmp,
            Value::TeletexString(_) => DirectoryStringKind::Teletex,
            Value::Ia5String(_) => DirectoryStringKind::Ia5,
            Value::VisibleString(_) => DirectoryStringKind::Visible,
            _ => {
                return Err(Error::malformed(
                    "directory string",
                    "element is not a name string type",
                ));
            }
        };
        Ok(Self {
            kind,
            bytes: Zeroizing::new(el.string_bytes()?.to_vec()),
        })
    }

    /// Build the element for this string.
    pub fn to_element(&self) -> Element {
        let bytes = self.bytes.to_vec();
        match self.kind {
            DirectoryStringKind::Printable => Element::printable_string(bytes),
            DirectoryStringKind::Utf8 => Element::utf8_string(bytes),
            DirectoryStringKind::Universal => Element::universal_string(bytes),
            DirectoryStringKind::Bmp => Element::bmp_string(bytes),
            DirectoryStringKind::Teletex => Element::teletex_string(bytes),
            DirectoryStringKind::Ia5 => Element::ia5_string(bytes),
            DirectoryStringKind::Visible => Element::visible_string(bytes),
        }
    }
}

impl PartialEq for DirectoryString {
    fn eq(&self, other: &Self) -> bool {
        *self.bytes == *other.bytes
    }
}

impl Eq for DirectoryString {}

impl fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Name attribute types with registered oids.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum AttributeType {
    Unknown,
    Name,
    Surname,
    GivenName,
    GenerationQualifier,
    CommonName,
    LocalityName,
    StateOrProvinceName,
    OrganizationName,
    OrganizationalUnitName,
    Title,
    DnQualifier,
    CountryName,
    SerialNumber,
    Pseudonym,
    OrganizationId,
    StreetAddress,
    DomainComponent,
    EmailAddress,
}

impl AttributeType {
    /// The oid arcs of a known attribute.
    pub fn oid(&self) -> Option<&'static [u32]> {
        Some(match self {
            AttributeType::Unknown => return None,
            AttributeType::Name => oids::AT_NAME,
            AttributeType::Surname => oids::AT_SURNAME,
            AttributeType::GivenName => oids::AT_GIVEN_NAME,
            AttributeType::GenerationQualifier => oids::AT_GENERATION_QUALIFIER,
            AttributeType::CommonName => oids::AT_COMMON_NAME,
            AttributeType::LocalityName => oids::AT_LOCALITY_NAME,
            AttributeType::StateOrProvinceName => oids::AT_STATE_OR_PROVINCE_NAME,
            AttributeType::OrganizationName => oids::AT_ORGANIZATION_NAME,
            AttributeType::OrganizationalUnitName => oids::AT_ORGANIZATIONAL_UNIT_NAME,
            AttributeType::Title => oids::AT_TITLE,
            AttributeType::DnQualifier => oids::AT_DN_QUALIFIER,
            AttributeType::CountryName => oids::AT_COUNTRY_NAME,
            AttributeType::SerialNumber => oids::AT_SERIAL_NUMBER,
            AttributeType::Pseudonym => oids::AT_PSEUDONYM,
            AttributeType::OrganizationId => oids::AT_ORGANIZATION_ID,
            AttributeType::StreetAddress => oids::AT_STREET_ADDRESS,
            AttributeType::DomainComponent => oids::AT_DOMAIN_COMPONENT,
            AttributeType::EmailAddress => oids::AT_EMAIL_ADDRESS,
        })
    }

    /// Classify an attribute oid.
    pub fn from_oid(oid: &Oid) -> AttributeType {
        const KNOWN: [(&[u32], AttributeType); 18] = [
            (oids::AT_NAME, AttributeType::Name),
            (oids::AT_SURNAME, AttributeType::Surname),
            (oids::AT_GIVEN_NAME, AttributeType::GivenName),
            (
                oids::AT_GENERATION_QUALIFIER,
                AttributeType::GenerationQualifier,
            ),
            (oids::AT_COMMON_NAME, AttributeType::CommonName),
            (oids::AT_LOCALITY_NAME, AttributeType::LocalityName),
            (
                oids::AT_STATE_OR_PROVINCE_NAME,
                AttributeType::StateOrProvinceName,
            ),
            (oids::AT_ORGANIZATION_NAME, AttributeType::OrganizationName),
            (
                oids::AT_ORGANIZATIONAL_UNIT_NAME,
                AttributeType::OrganizationalUnitName,
            ),
            (oids::AT_TITLE, AttributeType::Title),
            (oids::AT_DN_QUALIFIER, AttributeType::DnQualifier),
            (oids::AT_COUNTRY_NAME, AttributeType::CountryName),
            (oids::AT_SERIAL_NUMBER, AttributeType::SerialNumber),
            (oids::AT_PSEUDONYM, AttributeType::Pseudonym),
            (oids::AT_ORGANIZATION_ID, AttributeType::OrganizationId),
            (oids::AT_STREET_ADDRESS, AttributeType::StreetAddress),
            (oids::AT_DOMAIN_COMPONENT, AttributeType::DomainComponent),
            (oids::AT_EMAIL_ADDRESS, AttributeType::EmailAddress),
        ];
        for (arcs, ty) in KNOWN {
            if *oid == arcs {
                return ty;
            }
        }
        AttributeType::Unknown
    }
}

/// One level of an X.500 name: a set of attribute/value pairs keyed and
/// ordered by attribute oid.
///
/// ```text
/// RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue
/// AttributeTypeAndValue ::= SEQUENCE { type OBJECT IDENTIFIER, value ANY }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RelativeDistinguishedName {
    entries: BTreeMap<Oid, DirectoryString>,
}

impl RelativeDistinguishedName {
    /// Empty name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-attribute name.
    pub fn single(arcs: &[u32], value: DirectoryString) -> Result<Self> {
        let mut rdn = Self::new();
        rdn.insert(Oid::new(arcs.to_vec())?, value);
        Ok(rdn)
    }

    /// Insert an attribute, replacing any previous value for the oid.
    pub fn insert(&mut self, oid: Oid, value: DirectoryString) {
        self.entries.insert(oid, value);
    }

    /// Value of an attribute by oid arcs.
    pub fn get(&self, arcs: &[u32]) -> Option<&DirectoryString> {
        self.entries
            .iter()
            .find(|(oid, _)| **oid == arcs)
            .map(|(_, v)| v)
    }

    /// Iterate pairs in oid order.
    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &DirectoryString)> {
        self.entries.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the name empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse from the SET element.
    pub fn parse(el: &Element) -> Result<Self> {
        let ctx = "relative distinguished name";
        if !el.is_set() {
            return Err(Error::malformed(ctx, "element is not a set"));
        }
        let mut rdn = Self::new();
        for pair in el.children()? {
            let seq = pair
                .children()
                .map_err(|_| Error::malformed(ctx, "attribute pair is not a sequence"))?;
            if seq.len() != 2 {
                return Err(Error::malformed(ctx, "attribute pair size"));
            }
            let oid = seq[0]
                .as_object_identifier()
                .map_err(|_| Error::malformed(ctx, "attribute type is not an oid"))?;
            rdn.insert(oid.clone(), DirectoryString::parse(&seq[1])?);
        }
        Ok(rdn)
    }

    /// Build the SET element, attributes in oid order.
    pub fn to_element(&self) -> Element {
        Element::set(
            self.entries
                .iter()
                .map(|(oid, value)| {
                    Element::sequence(vec![
                        Element::object_identifier(oid.clone()),
                        value.to_element(),
                    ])
                })
                .collect(),
        )
    }
}

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (oid, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match AttributeType::from_oid(oid) {
                AttributeType::Unknown => write!(f, "{oid}={value}")?,
                ty => write!(f, "{ty:?}={value}")?,
            }
        }
        Ok(())
    }
}

/// Parse an `RDNSequence` element into its name levels.
pub(crate) fn parse_rdn_sequence(el: &Element) -> Result<Vec<RelativeDistinguishedName>> {
    if !el.is_sequence() {
        return Err(Error::malformed("name", "element is not a sequence"));
    }
    el.children()?.iter().map(RelativeDistinguishedName::parse).collect()
}

/// Build an `RDNSequence` element.
pub(crate) fn dump_rdn_sequence(rdns: &[RelativeDistinguishedName]) -> Element {
    Element::sequence(rdns.iter().map(RelativeDistinguishedName::to_element).collect())
}
