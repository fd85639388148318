//! DER elements as an owned tree.

use core::fmt;

use bignum::Bignum;
use zeroize::Zeroizing;

use crate::{BitString, DateTime, Error, Oid, Result, codec};

/// Tag class, bits 7-8 of the tag byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Class {
    /// Universal types defined by X.680.
    Universal,
    /// Application-specific.
    Application,
    /// Context-specific (the class used by tagged certificate fields).
    Context,
    /// Private.
    Private,
}

impl Class {
    pub(crate) fn from_tag(tag: u8) -> Self {
        match tag & 0xc0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    pub(crate) fn tag_bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Class::Universal => "universal",
            Class::Application => "application",
            Class::Context => "context",
            Class::Private => "private",
        })
    }
}

/// Universal type ids implemented by the codec.
pub mod type_id {
    /// BOOLEAN
    pub const BOOLEAN: u32 = 1;
    /// INTEGER
    pub const INTEGER: u32 = 2;
    /// BIT STRING
    pub const BIT_STRING: u32 = 3;
    /// OCTET STRING
    pub const OCTET_STRING: u32 = 4;
    /// NULL
    pub const NULL: u32 = 5;
    /// OBJECT IDENTIFIER
    pub const OBJECT_IDENTIFIER: u32 = 6;
    /// UTF8String
    pub const UTF8_STRING: u32 = 12;
    /// SEQUENCE / SEQUENCE OF
    pub const SEQUENCE: u32 = 16;
    /// SET / SET OF
    pub const SET: u32 = 17;
    /// PrintableString
    pub const PRINTABLE_STRING: u32 = 19;
    /// TeletexString
    pub const TELETEX_STRING: u32 = 20;
    /// IA5String
    pub const IA5_STRING: u32 = 22;
    /// UTCTime
    pub const UTC_TIME: u32 = 23;
    /// GeneralizedTime
    pub const GENERALIZED_TIME: u32 = 24;
    /// VisibleString
    pub const VISIBLE_STRING: u32 = 26;
    /// UniversalString
    pub const UNIVERSAL_STRING: u32 = 28;
    /// BMPString
    pub const BMP_STRING: u32 = 30;
}

/// An element retained without interpretation: any application, context or
/// private class element, and universal elements whose id the codec does
/// not implement.
///
/// The raw content bytes are authoritative — they are what emission writes
/// back, so opaque elements round-trip byte-exact. For a constructed
/// element the parsed children are kept alongside as a read-only view.
#[derive(Clone, Debug)]
pub struct Opaque {
    /// Tag class.
    pub class: Class,
    /// Constructed flag (bit 6 of the tag byte).
    pub constructed: bool,
    /// Tag id; ids of 31 and above use the multi-byte header form.
    pub id: u32,
    /// Raw content bytes.
    pub data: Zeroizing<Vec<u8>>,
    /// Children parsed from the content when constructed.
    pub children: Vec<Element>,
}

/// The raw content bytes decide equality; the child list is a parsed view
/// of the same bytes.
impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.constructed == other.constructed
            && self.id == other.id
            && *self.data == *other.data
    }
}

impl Eq for Opaque {}

/// The value of a DER element: one variant per implemented universal type,
/// plus [`Opaque`] for everything else.
///
/// String-family variants hold raw bytes; character-set validity is not
/// enforced by the codec.
#[derive(Clone, Debug)]
#[allow(missing_docs)]
pub enum Value {
    Boolean(bool),
    Integer(Bignum),
    BitString(BitString),
    OctetString(Zeroizing<Vec<u8>>),
    Null,
    ObjectIdentifier(Oid),
    Utf8String(Zeroizing<Vec<u8>>),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(Zeroizing<Vec<u8>>),
    TeletexString(Zeroizing<Vec<u8>>),
    Ia5String(Zeroizing<Vec<u8>>),
    UtcTime(DateTime),
    GeneralizedTime(DateTime),
    VisibleString(Zeroizing<Vec<u8>>),
    UniversalString(Zeroizing<Vec<u8>>),
    BmpString(Zeroizing<Vec<u8>>),
    Opaque(Opaque),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::BitString(a), Value::BitString(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::ObjectIdentifier(a), Value::ObjectIdentifier(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::UtcTime(a), Value::UtcTime(b))
            | (Value::GeneralizedTime(a), Value::GeneralizedTime(b)) => a == b,
            (Value::OctetString(a), Value::OctetString(b))
            | (Value::Utf8String(a), Value::Utf8String(b))
            | (Value::PrintableString(a), Value::PrintableString(b))
            | (Value::TeletexString(a), Value::TeletexString(b))
            | (Value::Ia5String(a), Value::Ia5String(b))
            | (Value::VisibleString(a), Value::VisibleString(b))
            | (Value::UniversalString(a), Value::UniversalString(b))
            | (Value::BmpString(a), Value::BmpString(b)) => **a == **b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::BitString(_) => "bit string",
            Value::OctetString(_) => "octet string",
            Value::Null => "null",
            Value::ObjectIdentifier(_) => "object identifier",
            Value::Utf8String(_) => "utf8 string",
            Value::Sequence(_) => "sequence",
            Value::Set(_) => "set",
            Value::PrintableString(_) => "printable string",
            Value::TeletexString(_) => "teletex string",
            Value::Ia5String(_) => "ia5 string",
            Value::UtcTime(_) => "utc time",
            Value::GeneralizedTime(_) => "generalized time",
            Value::VisibleString(_) => "visible string",
            Value::UniversalString(_) => "universal string",
            Value::BmpString(_) => "bmp string",
            Value::Opaque(_) => "opaque",
        }
    }
}

/// Byte region of an element within the last parsed or dumped buffer.
///
/// Diagnostic only; refreshed by document-level parse and dump. The content
/// of the element spans `offset + header_len .. offset + header_len +
/// content_len`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Region {
    /// Offset of the tag byte.
    pub offset: usize,
    /// Bytes of tag, id and length fields.
    pub header_len: usize,
    /// Bytes of content.
    pub content_len: usize,
}

impl Region {
    /// End offset of the element (one past its last content byte).
    pub fn end(&self) -> usize {
        self.offset + self.header_len + self.content_len
    }
}

/// One DER element: a typed value plus the byte region of its last
/// encoding.
///
/// Elements own their children; there is no sharing within a tree.
/// Equality compares values only, not encoding regions.
#[derive(Clone, Debug)]
pub struct Element {
    value: Value,
    region: Region,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Element {}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Self {
            value,
            region: Region::default(),
        }
    }
}

impl Element {
    /// BOOLEAN element.
    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value).into()
    }

    /// INTEGER element.
    pub fn integer(value: impl Into<Bignum>) -> Self {
        Value::Integer(value.into()).into()
    }

    /// BIT STRING element.
    pub fn bit_string(value: BitString) -> Self {
        Value::BitString(value).into()
    }

    /// OCTET STRING element.
    pub fn octet_string(value: impl Into<Vec<u8>>) -> Self {
        Value::OctetString(Zeroizing::new(value.into())).into()
    }

    /// NULL element.
    pub fn null() -> Self {
        Value::Null.into()
    }

    /// OBJECT IDENTIFIER element.
    pub fn object_identifier(value: Oid) -> Self {
        Value::ObjectIdentifier(value).into()
    }

    /// UTF8String element.
    pub fn utf8_string(value: impl Into<Vec<u8>>) -> Self {
        Value::Utf8String(Zeroizing::new(value.into())).into()
    }

    /// PrintableString element.
    pub fn printable_string(value: impl Into<Vec<u8>>) -> Self {
        Value::PrintableString(Zeroizing::new(value.into())).into()
    }

    /// IA5String element.
    pub fn ia5_string(value: impl Into<Vec<u8>>) -> Self {
        Value::Ia5String(Zeroizing::new(value.into())).into()
    }

    /// TeletexString element.
    pub fn teletex_string(value: impl Into<Vec<u8>>) -> Self {
        Value::TeletexString(Zeroizing::new(value.into())).into()
    }

    /// VisibleString element.
    pub fn visible_string(value: impl Into<Vec<u8>>) -> Self {
        Value::VisibleString(Zeroizing::new(value.into())).into()
    }

    /// UniversalString element.
    pub fn universal_string(value: impl Into<Vec<u8>>) -> Self {
        Value::UniversalString(Zeroizing::new(value.into())).into()
    }

    /// BMPString element.
    pub fn bmp_string(value: impl Into<Vec<u8>>) -> Self {
        Value::BmpString(Zeroizing::new(value.into())).into()
    }

    /// SEQUENCE element.
    pub fn sequence(children: Vec<Element>) -> Self {
        Value::Sequence(children).into()
    }

    /// SET element.
    pub fn set(children: Vec<Element>) -> Self {
        Value::Set(children).into()
    }

    /// UTCTime element.
    pub fn utc_time(value: DateTime) -> Self {
        Value::UtcTime(value).into()
    }

    /// GeneralizedTime element.
    pub fn generalized_time(value: DateTime) -> Self {
        Value::GeneralizedTime(value).into()
    }

    /// Uninterpreted element of any class.
    pub fn opaque(class: Class, constructed: bool, id: u32, data: impl Into<Vec<u8>>) -> Self {
        Value::Opaque(Opaque {
            class,
            constructed,
            id,
            data: Zeroizing::new(data.into()),
            children: Vec::new(),
        })
        .into()
    }

    pub(crate) fn with_region(value: Value, region: Region) -> Self {
        Self { value, region }
    }

    /// The typed value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Mutable access to the typed value.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Consume into the typed value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Byte region of the last document-level parse or dump.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Tag class.
    pub fn class(&self) -> Class {
        match &self.value {
            Value::Opaque(op) => op.class,
            _ => Class::Universal,
        }
    }

    /// Constructed flag.
    pub fn constructed(&self) -> bool {
        match &self.value {
            Value::Sequence(_) | Value::Set(_) => true,
            Value::Opaque(op) => op.constructed,
            _ => false,
        }
    }

    /// Tag id: the universal type id, or the opaque element's id.
    pub fn type_id(&self) -> u32 {
        match &self.value {
            Value::Boolean(_) => type_id::BOOLEAN,
            Value::Integer(_) => type_id::INTEGER,
            Value::BitString(_) => type_id::BIT_STRING,
            Value::OctetString(_) => type_id::OCTET_STRING,
            Value::Null => type_id::NULL,
            Value::ObjectIdentifier(_) => type_id::OBJECT_IDENTIFIER,
            Value::Utf8String(_) => type_id::UTF8_STRING,
            Value::Sequence(_) => type_id::SEQUENCE,
            Value::Set(_) => type_id::SET,
            Value::PrintableString(_) => type_id::PRINTABLE_STRING,
            Value::TeletexString(_) => type_id::TELETEX_STRING,
            Value::Ia5String(_) => type_id::IA5_STRING,
            Value::UtcTime(_) => type_id::UTC_TIME,
            Value::GeneralizedTime(_) => type_id::GENERALIZED_TIME,
            Value::VisibleString(_) => type_id::VISIBLE_STRING,
            Value::UniversalString(_) => type_id::UNIVERSAL_STRING,
            Value::BmpString(_) => type_id::BMP_STRING,
            Value::Opaque(op) => op.id,
        }
    }

    /// Is this a SEQUENCE?
    pub fn is_sequence(&self) -> bool {
        matches!(self.value, Value::Sequence(_))
    }

    /// Is this a SET?
    pub fn is_set(&self) -> bool {
        matches!(self.value, Value::Set(_))
    }

    /// Is this a SEQUENCE or SET?
    pub fn is_container(&self) -> bool {
        self.is_sequence() || self.is_set()
    }

    /// Is this an INTEGER?
    pub fn is_integer(&self) -> bool {
        matches!(self.value, Value::Integer(_))
    }

    /// Is this a BIT STRING?
    pub fn is_bit_string(&self) -> bool {
        matches!(self.value, Value::BitString(_))
    }

    /// Is this an OCTET STRING?
    pub fn is_octet_string(&self) -> bool {
        matches!(self.value, Value::OctetString(_))
    }

    /// Is this a NULL?
    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    /// Is this a BOOLEAN?
    pub fn is_boolean(&self) -> bool {
        matches!(self.value, Value::Boolean(_))
    }

    /// Is this an OBJECT IDENTIFIER?
    pub fn is_object_identifier(&self) -> bool {
        matches!(self.value, Value::ObjectIdentifier(_))
    }

    /// Is this a UTCTime or GeneralizedTime?
    pub fn is_time(&self) -> bool {
        matches!(self.value, Value::UtcTime(_) | Value::GeneralizedTime(_))
    }

    /// Is this one of the string types (including OCTET STRING)?
    pub fn is_string(&self) -> bool {
        matches!(
            self.value,
            Value::OctetString(_)
                | Value::Utf8String(_)
                | Value::PrintableString(_)
                | Value::TeletexString(_)
                | Value::Ia5String(_)
                | Value::VisibleString(_)
                | Value::UniversalString(_)
                | Value::BmpString(_)
        )
    }

    /// Is this retained uninterpreted (non-universal class or unsupported
    /// universal id)?
    pub fn is_opaque(&self) -> bool {
        matches!(self.value, Value::Opaque(_))
    }

    /// Is this a context-class element?
    pub fn is_context(&self) -> bool {
        self.class() == Class::Context
    }

    /// The integer value.
    pub fn as_integer(&self) -> Result<&Bignum> {
        match &self.value {
            Value::Integer(bn) => Ok(bn),
            _ => Err(Error::TypeMismatch {
                expected: "integer",
            }),
        }
    }

    /// The integer value, mutable.
    pub fn as_integer_mut(&mut self) -> Result<&mut Bignum> {
        match &mut self.value {
            Value::Integer(bn) => Ok(bn),
            _ => Err(Error::TypeMismatch {
                expected: "integer",
            }),
        }
    }

    /// The bit string value.
    pub fn as_bit_string(&self) -> Result<&BitString> {
        match &self.value {
            Value::BitString(bs) => Ok(bs),
            _ => Err(Error::TypeMismatch {
                expected: "bit string",
            }),
        }
    }

    /// The boolean value.
    pub fn as_boolean(&self) -> Result<bool> {
        match &self.value {
            Value::Boolean(b) => Ok(*b),
            _ => Err(Error::TypeMismatch {
                expected: "boolean",
            }),
        }
    }

    /// The object identifier value.
    pub fn as_object_identifier(&self) -> Result<&Oid> {
        match &self.value {
            Value::ObjectIdentifier(oid) => Ok(oid),
            _ => Err(Error::TypeMismatch {
                expected: "object identifier",
            }),
        }
    }

    /// The time value of a UTCTime or GeneralizedTime.
    pub fn as_time(&self) -> Result<&DateTime> {
        match &self.value {
            Value::UtcTime(t) | Value::GeneralizedTime(t) => Ok(t),
            _ => Err(Error::TypeMismatch { expected: "time" }),
        }
    }

    /// The raw bytes of any string-family element.
    pub fn string_bytes(&self) -> Result<&[u8]> {
        match &self.value {
            Value::OctetString(b)
            | Value::Utf8String(b)
            | Value::PrintableString(b)
            | Value::TeletexString(b)
            | Value::Ia5String(b)
            | Value::VisibleString(b)
            | Value::UniversalString(b)
            | Value::BmpString(b) => Ok(b),
            _ => Err(Error::TypeMismatch { expected: "string" }),
        }
    }

    /// The children of a SEQUENCE or SET.
    pub fn children(&self) -> Result<&[Element]> {
        match &self.value {
            Value::Sequence(c) | Value::Set(c) => Ok(c),
            _ => Err(Error::TypeMismatch {
                expected: "container",
            }),
        }
    }

    /// The children of a SEQUENCE or SET, mutable.
    pub fn children_mut(&mut self) -> Result<&mut Vec<Element>> {
        match &mut self.value {
            Value::Sequence(c) | Value::Set(c) => Ok(c),
            _ => Err(Error::TypeMismatch {
                expected: "container",
            }),
        }
    }

    /// The opaque payload of a non-universal element.
    pub fn as_opaque(&self) -> Result<&Opaque> {
        match &self.value {
            Value::Opaque(op) => Ok(op),
            _ => Err(Error::TypeMismatch { expected: "opaque" }),
        }
    }

    /// Re-interpret a constructed context-class element as the explicitly
    /// tagged element it wraps, by parsing its content.
    pub fn context_to_explicit(&self) -> Result<Element> {
        let op = self.as_opaque().map_err(|_| Error::Build(
            "context_to_explicit needs a constructed context-class element",
        ))?;
        if op.class != Class::Context || !op.constructed {
            return Err(Error::Build(
                "context_to_explicit needs a constructed context-class element",
            ));
        }
        codec::parse_element(&op.data, 0)
    }

    /// Wrap this element in a constructed context-class element with the
    /// given id, whose content is this element's DER encoding.
    pub fn explicit_to_context(&self, id: u32) -> Result<Element> {
        let data = codec::dump_element(self)?;
        let child = codec::parse_element(&data, 0)?;
        Ok(Value::Opaque(Opaque {
            class: Class::Context,
            constructed: true,
            id,
            data: Zeroizing::new(data),
            children: vec![child],
        })
        .into())
    }

    /// Re-interpret a context-class element as a universal element of type
    /// `universal_id`, keeping the constructed flag and content bytes.
    ///
    /// Multi-byte ids have no implicit form; both ids must be below 31.
    pub fn context_to_implicit(&self, universal_id: u32) -> Result<Element> {
        if universal_id >= 31 || self.type_id() >= 31 {
            return Err(Error::Build("implicit conversion needs single-byte ids"));
        }
        let op = self.as_opaque().map_err(|_| Error::Build(
            "context_to_implicit needs a context-class element",
        ))?;
        if op.class != Class::Context {
            return Err(Error::Build(
                "context_to_implicit needs a context-class element",
            ));
        }
        let mut bytes = codec::dump_element(self)?;
        bytes[0] = (bytes[0] & !0x1f) | universal_id as u8;
        bytes[0] &= !0xc0;
        let parsed = codec::parse_element(&bytes, 0);
        zeroize::Zeroize::zeroize(&mut bytes);
        parsed
    }

    /// Re-tag this universal element as a context-class element with the
    /// given id, keeping the constructed flag and content bytes.
    pub fn implicit_to_context(&self, id: u32) -> Result<Element> {
        if id >= 31 || self.type_id() >= 31 {
            return Err(Error::Build("implicit conversion needs single-byte ids"));
        }
        if self.class() != Class::Universal {
            return Err(Error::Build(
                "implicit_to_context needs a universal-class element",
            ));
        }
        let mut bytes = codec::dump_element(self)?;
        bytes[0] = (bytes[0] & !0x1f) | id as u8;
        bytes[0] = (bytes[0] & !0xc0) | Class::Context.tag_bits();
        let parsed = codec::parse_element(&bytes, 0);
        zeroize::Zeroize::zeroize(&mut bytes);
        parsed
    }

    fn fmt_line(&self, f: &mut fmt::Formatter<'_>, level: usize, debug: bool) -> fmt::Result {
        for _ in 0..level {
            f.write_str(" |")?;
        }
        if level > 0 {
            f.write_str(" ")?;
        }
        if debug {
            write!(
                f,
                "({},{},{}) ",
                self.region.offset, self.region.header_len, self.region.content_len
            )?;
        }
        write!(
            f,
            "{} {}({})",
            self.class(),
            self.value.type_name(),
            self.type_id()
        )?;
        match &self.value {
            Value::Boolean(b) => write!(f, " {b}")?,
            Value::Integer(bn) => write!(f, " {bn}")?,
            Value::BitString(bs) => write!(f, " width {}", bs.width())?,
            Value::ObjectIdentifier(oid) => write!(f, " {oid}")?,
            Value::UtcTime(t) | Value::GeneralizedTime(t) => write!(f, " {t}")?,
            Value::Sequence(c) | Value::Set(c) => write!(f, " items {}", c.len())?,
            Value::Null => {}
            Value::Opaque(op) => write!(
                f,
                " {} len {}",
                if op.constructed {
                    "constructed"
                } else {
                    "primitive"
                },
                op.data.len()
            )?,
            _ => {
                let bytes = self.string_bytes().unwrap_or_default();
                write!(f, " len {} ", bytes.len())?;
                for &b in bytes.iter().take(12) {
                    let c = if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    };
                    write!(f, "{c}")?;
                }
                if bytes.len() > 12 {
                    f.write_str("+more")?;
                }
            }
        }
        let children: &[Element] = match &self.value {
            Value::Sequence(c) | Value::Set(c) => c,
            Value::Opaque(op) => &op.children,
            _ => &[],
        };
        for child in children {
            writeln!(f)?;
            child.fmt_line(f, level + 1, debug)?;
        }
        Ok(())
    }
}

/// Renders the element and its sub-elements as an indented tree, one line
/// per element. The alternate form (`{:#}`) adds each element's byte
/// region from the last parse or dump.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_line(f, 0, f.alternate())
    }
}
