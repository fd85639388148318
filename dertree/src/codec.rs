//! The DER wire codec: header state machine, per-type content rules,
//! recursive parse and emission.

use bignum::Bignum;
use zeroize::Zeroizing;

use crate::element::{Class, Element, Opaque, Region, Value, type_id};
use crate::{BitString, Error, Oid, Result, time};

/// Parse one complete DER element starting at `offset`.
///
/// The returned tree owns all of its children and records each element's
/// byte region within `buf`. Bytes after the element are not inspected.
///
/// Fails when the buffer ends mid-header or mid-content, on the indefinite
/// length form, when a container's children do not exactly span its
/// declared content, or when a universal type's content violates its
/// invariants.
pub fn parse_element(buf: &[u8], offset: usize) -> Result<Element> {
    Ok(parse_at(buf, offset)?.0)
}

/// Serialize an element tree to DER bytes.
///
/// Inverse of [`parse_element`]: parsing the output reproduces the tree,
/// and for canonical input bytes `dump(parse(b)) == b`.
pub fn dump_element(element: &Element) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    emit(element, &mut out)?;
    Ok(out)
}

struct Header {
    class: Class,
    constructed: bool,
    id: u32,
    content_len: usize,
    header_len: usize,
}

// TAG -> ID_CONTINUE* -> LEN -> LEN_BYTES*; every transition that would
// read past the buffer fails.
fn parse_header(buf: &[u8], offset: usize) -> Result<Header> {
    let mut pos = offset;
    let tag = *buf.get(pos).ok_or(Error::UnexpectedEnd { offset: pos })?;
    pos += 1;

    let class = Class::from_tag(tag);
    let constructed = tag & 0x20 != 0;

    let mut id = u32::from(tag & 0x1f);
    if id == 0x1f {
        // multi-byte id, base 128 high byte first
        id = 0;
        loop {
            let byte = *buf.get(pos).ok_or(Error::UnexpectedEnd { offset: pos })?;
            pos += 1;
            id = id
                .checked_mul(128)
                .and_then(|v| v.checked_add(u32::from(byte & 0x7f)))
                .ok_or(Error::LengthOverflow { offset: pos - 1 })?;
            if byte & 0x80 == 0 {
                break;
            }
        }
    }

    let len_byte = *buf.get(pos).ok_or(Error::UnexpectedEnd { offset: pos })?;
    pos += 1;

    let content_len = if len_byte & 0x80 == 0 {
        usize::from(len_byte)
    } else {
        let count = usize::from(len_byte & 0x7f);
        if count == 0 {
            // 0x80 is the indefinite form, ended by 00 00 octets; DER
            // requires definite lengths
            return Err(Error::IndefiniteLength { offset: pos - 1 });
        }
        let mut len = 0usize;
        for _ in 0..count {
            let byte = *buf.get(pos).ok_or(Error::UnexpectedEnd { offset: pos })?;
            pos += 1;
            len = len
                .checked_mul(256)
                .and_then(|v| v.checked_add(usize::from(byte)))
                .ok_or(Error::LengthOverflow { offset: pos - 1 })?;
        }
        len
    };

    Ok(Header {
        class,
        constructed,
        id,
        content_len,
        header_len: pos - offset,
    })
}

fn parse_at(buf: &[u8], offset: usize) -> Result<(Element, usize)> {
    let header = parse_header(buf, offset)?;
    let content_start = offset + header.header_len;
    let content_end = content_start
        .checked_add(header.content_len)
        .ok_or(Error::LengthOverflow { offset })?;
    if content_end > buf.len() {
        return Err(Error::UnexpectedEnd { offset: buf.len() });
    }
    let content = &buf[content_start..content_end];

    let universal = matches!(header.class, Class::Universal);
    let value = if universal && header.id < 31 && is_implemented(header.id) {
        parse_universal(&header, content, buf, content_start, content_end, offset)?
    } else {
        // other classes and unimplemented universal ids are retained
        // uninterpreted; constructed content still gets a parsed child view
        let children = if header.constructed {
            parse_children(buf, content_start, content_end)?
        } else {
            Vec::new()
        };
        Value::Opaque(Opaque {
            class: header.class,
            constructed: header.constructed,
            id: header.id,
            data: Zeroizing::new(content.to_vec()),
            children,
        })
    };

    let region = Region {
        offset,
        header_len: header.header_len,
        content_len: header.content_len,
    };
    Ok((Element::with_region(value, region), content_end))
}

fn is_implemented(id: u32) -> bool {
    matches!(
        id,
        type_id::BOOLEAN
            | type_id::INTEGER
            | type_id::BIT_STRING
            | type_id::OCTET_STRING
            | type_id::NULL
            | type_id::OBJECT_IDENTIFIER
            | type_id::UTF8_STRING
            | type_id::SEQUENCE
            | type_id::SET
            | type_id::PRINTABLE_STRING
            | type_id::TELETEX_STRING
            | type_id::IA5_STRING
            | type_id::UTC_TIME
            | type_id::GENERALIZED_TIME
            | type_id::VISIBLE_STRING
            | type_id::UNIVERSAL_STRING
            | type_id::BMP_STRING
    )
}

fn parse_universal(
    header: &Header,
    content: &[u8],
    buf: &[u8],
    content_start: usize,
    content_end: usize,
    offset: usize,
) -> Result<Value> {
    let malformed = |what| Error::Malformed { offset, what };

    if matches!(header.id, type_id::SEQUENCE | type_id::SET) {
        if !header.constructed {
            return Err(malformed("sequence or set must be constructed"));
        }
        let children = parse_children(buf, content_start, content_end)?;
        return Ok(if header.id == type_id::SEQUENCE {
            Value::Sequence(children)
        } else {
            Value::Set(children)
        });
    }

    if header.constructed {
        return Err(malformed("constructed encoding of a primitive type"));
    }

    Ok(match header.id {
        type_id::BOOLEAN => {
            if content.len() != 1 {
                return Err(malformed("boolean content must be one byte"));
            }
            Value::Boolean(content[0] != 0)
        }
        type_id::INTEGER => {
            if content.is_empty() {
                return Err(malformed("empty integer"));
            }
            Value::Integer(Bignum::from_twos_complement(content))
        }
        type_id::BIT_STRING => {
            if content.is_empty() {
                Value::BitString(BitString::new())
            } else {
                let pad = usize::from(content[0]);
                if pad > 7 {
                    return Err(malformed("bit string pad bits too high"));
                }
                let bits = (content.len() - 1) * 8;
                if pad > bits {
                    return Err(malformed("bit string pad bits exceed content"));
                }
                Value::BitString(BitString::from_bytes(&content[1..], bits - pad))
            }
        }
        type_id::OCTET_STRING => Value::OctetString(Zeroizing::new(content.to_vec())),
        type_id::NULL => {
            if !content.is_empty() {
                return Err(malformed("null content must be empty"));
            }
            Value::Null
        }
        type_id::OBJECT_IDENTIFIER => {
            Value::ObjectIdentifier(Oid::from_content(content, offset)?)
        }
        type_id::UTF8_STRING => Value::Utf8String(Zeroizing::new(content.to_vec())),
        type_id::PRINTABLE_STRING => Value::PrintableString(Zeroizing::new(content.to_vec())),
        type_id::TELETEX_STRING => Value::TeletexString(Zeroizing::new(content.to_vec())),
        type_id::IA5_STRING => Value::Ia5String(Zeroizing::new(content.to_vec())),
        type_id::UTC_TIME => Value::UtcTime(time::parse_utc_time(content, offset)?),
        type_id::GENERALIZED_TIME => {
            Value::GeneralizedTime(time::parse_generalized_time(content, offset)?)
        }
        type_id::VISIBLE_STRING => Value::VisibleString(Zeroizing::new(content.to_vec())),
        type_id::UNIVERSAL_STRING => Value::UniversalString(Zeroizing::new(content.to_vec())),
        type_id::BMP_STRING => Value::BmpString(Zeroizing::new(content.to_vec())),
        _ => unreachable!("is_implemented gates the id set"),
    })
}

fn parse_children(buf: &[u8], start: usize, end: usize) -> Result<Vec<Element>> {
    let mut children = Vec::new();
    let mut pos = start;
    while pos < end {
        let (child, next) = parse_at(buf, pos)?;
        if next > end {
            // accumulated children must exactly span the declared length
            return Err(Error::Malformed {
                offset: pos,
                what: "child element spans past its container",
            });
        }
        children.push(child);
        pos = next;
    }
    Ok(children)
}

fn emit(element: &Element, out: &mut Vec<u8>) -> Result<()> {
    match element.value() {
        Value::Sequence(children) | Value::Set(children) => {
            let mut body = Zeroizing::new(Vec::new());
            for child in children {
                emit(child, &mut body)?;
            }
            write_header(out, Class::Universal, true, element.type_id(), body.len());
            out.extend_from_slice(&body);
        }
        Value::Opaque(op) => {
            write_header(out, op.class, op.constructed, op.id, op.data.len());
            out.extend_from_slice(&op.data);
        }
        _ => {
            let body = primitive_content(element)?;
            write_header(out, Class::Universal, false, element.type_id(), body.len());
            out.extend_from_slice(&body);
        }
    }
    Ok(())
}

fn primitive_content(element: &Element) -> Result<Zeroizing<Vec<u8>>> {
    let mut body = Vec::new();
    match element.value() {
        Value::Boolean(b) => body.push(u8::from(*b)),
        Value::Integer(bn) => {
            let mut enc = bn.to_twos_complement();
            body.append(&mut enc);
        }
        Value::BitString(bs) => {
            body.push(bs.pad_bits() as u8);
            body.extend_from_slice(bs.as_bytes());
        }
        Value::Null => {}
        Value::ObjectIdentifier(oid) => oid.to_content(&mut body),
        Value::UtcTime(t) => body = time::dump_utc_time(t)?,
        Value::GeneralizedTime(t) => body = time::dump_generalized_time(t)?,
        Value::OctetString(b)
        | Value::Utf8String(b)
        | Value::PrintableString(b)
        | Value::TeletexString(b)
        | Value::Ia5String(b)
        | Value::VisibleString(b)
        | Value::UniversalString(b)
        | Value::BmpString(b) => body.extend_from_slice(b),
        Value::Sequence(_) | Value::Set(_) | Value::Opaque(_) => {
            unreachable!("containers and opaque elements are emitted in emit()")
        }
    }
    Ok(Zeroizing::new(body))
}

fn write_header(out: &mut Vec<u8>, class: Class, constructed: bool, id: u32, len: usize) {
    let mut tag = class.tag_bits();
    if constructed {
        tag |= 0x20;
    }
    if id < 31 {
        out.push(tag | id as u8);
    } else {
        out.push(tag | 0x1f);
        let mut chunk = [0u8; 5];
        let mut n = 0;
        let mut v = id;
        loop {
            chunk[n] = (v & 0x7f) as u8;
            n += 1;
            v >>= 7;
            if v == 0 {
                break;
            }
        }
        for i in (0..n).rev() {
            let cont = if i == 0 { 0 } else { 0x80 };
            out.push(chunk[i] | cont);
        }
    }

    if len < 128 {
        out.push(len as u8);
    } else {
        let mut chunk = [0u8; core::mem::size_of::<usize>()];
        let mut n = 0;
        let mut v = len;
        while v != 0 {
            chunk[n] = (v & 0xff) as u8;
            n += 1;
            v >>= 8;
        }
        out.push(0x80 | n as u8);
        for i in (0..n).rev() {
            out.push(chunk[i]);
        }
    }
}

