//! X.509 general names (RFC 5280 section 4.2.1.6).
//!
//! ```text
//! GeneralName ::= CHOICE {
//!     otherName                 [0] OtherName,
//!     rfc822Name                [1] IA5String,
//!     dNSName                   [2] IA5String,
//!     x400Address               [3] ORAddress,
//!     directoryName             [4] Name,
//!     ediPartyName              [5] EDIPartyName,
//!     uniformResourceIdentifier [6] IA5String,
//!     iPAddress                 [7] OCTET STRING,
//!     registeredID              [8] OBJECT IDENTIFIER }
//! ```
//!
//! String, name and oid alternatives are interpreted; otherName,
//! x400Address and ediPartyName are retained as raw elements.

use core::fmt;

use dertree::{Class, Element, Oid, type_id};

use crate::name::{RelativeDistinguishedName, dump_rdn_sequence, parse_rdn_sequence};
use crate::{Error, Result};

/// One alternative name.
#[derive(Clone, Debug)]
pub enum GeneralName {
    /// `[0]` otherName, uninterpreted.
    OtherName(Element),
    /// `[1]` an email address.
    Rfc822Name(String),
    /// `[2]` a DNS host name.
    DnsName(String),
    /// `[3]` x400Address, uninterpreted.
    X400Address(Element),
    /// `[4]` an X.500 directory name.
    DirectoryName(Vec<RelativeDistinguishedName>),
    /// `[5]` ediPartyName, uninterpreted.
    EdiPartyName(Element),
    /// `[6]` a URI.
    Uri(String),
    /// `[7]` a raw network address (4 bytes for IPv4, 16 for IPv6).
    IpAddress(Vec<u8>),
    /// `[8]` a registered oid.
    RegisteredId(Oid),
}

impl GeneralName {
    /// The context tag id of this alternative.
    pub fn context_id(&self) -> u32 {
        match self {
            GeneralName::OtherName(_) => 0,
            GeneralName::Rfc822Name(_) => 1,
            GeneralName::DnsName(_) => 2,
            GeneralName::X400Address(_) => 3,
            GeneralName::DirectoryName(_) => 4,
            GeneralName::EdiPartyName(_) => 5,
            GeneralName::Uri(_) => 6,
            GeneralName::IpAddress(_) => 7,
            GeneralName::RegisteredId(_) => 8,
        }
    }

    /// Parse from a context-tagged element.
    pub fn parse(el: &Element) -> Result<Self> {
        let ctx = "general name";
        let op = el
            .as_opaque()
            .ok()
            .filter(|op| op.class == Class::Context)
            .ok_or_else(|| Error::malformed(ctx, "element is not context class"))?;

        Ok(match op.id {
            0 => GeneralName::OtherName(el.clone()),
            1 => GeneralName::Rfc822Name(String::from_utf8_lossy(&op.data).into_owned()),
            2 => GeneralName::DnsName(String::from_utf8_lossy(&op.data).into_owned()),
            3 => GeneralName::X400Address(el.clone()),
            4 => {
                // directoryName is explicitly tagged: Name is a CHOICE
                let inner = el.context_to_explicit()?;
                GeneralName::DirectoryName(parse_rdn_sequence(&inner)?)
            }
            5 => GeneralName::EdiPartyName(el.clone()),
            6 => GeneralName::Uri(String::from_utf8_lossy(&op.data).into_owned()),
            7 => GeneralName::IpAddress(op.data.to_vec()),
            8 => {
                let oid_el = el.context_to_implicit(type_id::OBJECT_IDENTIFIER)?;
                GeneralName::RegisteredId(oid_el.as_object_identifier()?.clone())
            }
            _ => return Err(Error::malformed(ctx, "tag id out of range")),
        })
    }

    /// Build the context-tagged element.
    pub fn to_element(&self) -> Result<Element> {
        Ok(match self {
            GeneralName::OtherName(el)
            | GeneralName::X400Address(el)
            | GeneralName::EdiPartyName(el) => el.clone(),
            GeneralName::Rfc822Name(s) | GeneralName::DnsName(s) | GeneralName::Uri(s) => {
                Element::opaque(Class::Context, false, self.context_id(), s.as_bytes())
            }
            GeneralName::IpAddress(addr) => {
                Element::opaque(Class::Context, false, self.context_id(), addr.clone())
            }
            GeneralName::DirectoryName(rdns) => {
                dump_rdn_sequence(rdns).explicit_to_context(self.context_id())?
            }
            GeneralName::RegisteredId(oid) => Element::object_identifier(oid.clone())
                .implicit_to_context(self.context_id())?,
        })
    }

    /// Parse a `GeneralNames` sequence.
    pub fn parse_sequence(el: &Element) -> Result<Vec<GeneralName>> {
        let names = el
            .children()
            .map_err(|_| Error::malformed("general names", "element is not a sequence"))?;
        names.iter().map(GeneralName::parse).collect()
    }

    /// Build a `GeneralNames` sequence.
    pub fn dump_sequence(names: &[GeneralName]) -> Result<Element> {
        Ok(Element::sequence(
            names
                .iter()
                .map(GeneralName::to_element)
                .collect::<Result<_>>()?,
        ))
    }
}

/// Interpreted alternatives compare by value; the uninterpreted
/// alternatives (otherName, x400Address, ediPartyName) never compare
/// equal, since their semantics are unknown.
impl PartialEq for GeneralName {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GeneralName::Rfc822Name(a), GeneralName::Rfc822Name(b)) => a == b,
            (GeneralName::DnsName(a), GeneralName::DnsName(b)) => a == b,
            (GeneralName::Uri(a), GeneralName::Uri(b)) => a == b,
            (GeneralName::IpAddress(a), GeneralName::IpAddress(b)) => a == b,
            (GeneralName::DirectoryName(a), GeneralName::DirectoryName(b)) => a == b,
            (GeneralName::RegisteredId(a), GeneralName::RegisteredId(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::OtherName(_) => f.write_str("otherName"),
            GeneralName::Rfc822Name(s) => write!(f, "email:{s}"),
            GeneralName::DnsName(s) => write!(f, "dns:{s}"),
            GeneralName::X400Address(_) => f.write_str("x400Address"),
            GeneralName::DirectoryName(rdns) => {
                f.write_str("dirName:")?;
                for (i, rdn) in rdns.iter().enumerate() {
                    if i > 0 {
                        f.write_str("/")?;
                    }
                    write!(f, "{rdn}")?;
                }
                Ok(())
            }
            GeneralName::EdiPartyName(_) => f.write_str("ediPartyName"),
            GeneralName::Uri(s) => write!(f, "uri:{s}"),
            GeneralName::IpAddress(addr) => {
                f.write_str("ip:")?;
                for (i, b) in addr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{b}")?;
                }
                Ok(())
            }
            GeneralName::RegisteredId(oid) => write!(f, "rid:{oid}"),
        }
    }
}
