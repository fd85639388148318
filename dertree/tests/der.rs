//! DER codec tests.

use bignum::Bignum;
use dertree::{
    BitString, Class, DateTime, DerDocument, Element, Error, Oid, dump_element, parse_element,
};
use hex_literal::hex;
use proptest::prelude::*;

fn round_trip(bytes: &[u8]) -> Element {
    let parsed = parse_element(bytes, 0).expect("parse");
    let dumped = dump_element(&parsed).expect("dump");
    assert_eq!(dumped, bytes, "canonical bytes must round-trip byte-exact");
    parsed
}

#[test]
fn sequence_of_integers() {
    // SEQUENCE { INTEGER 0, INTEGER 127 }
    let el = round_trip(&hex!("30 06 02 01 00 02 01 7f"));
    assert!(el.is_sequence());
    let children = el.children().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(*children[0].as_integer().unwrap(), Bignum::from(0u32));
    assert_eq!(*children[1].as_integer().unwrap(), Bignum::from(127u32));
}

#[test]
fn integer_boundaries() {
    // 0, 127, 128, 256, -128, -129, -1 inside one container, with a
    // context element leading
    let bytes = hex!(
        "30 1d"
        "8a 03 58 59 5a"
        "02 01 00"
        "02 01 7f"
        "02 02 00 80"
        "02 02 01 00"
        "02 01 80"
        "02 02 ff 7f"
        "02 01 ff"
    );
    let el = round_trip(&bytes);
    let c = el.children().unwrap();
    assert_eq!(c.len(), 8);
    assert!(c[0].is_opaque() && !c[0].is_integer());
    assert_eq!(c[0].as_opaque().unwrap().data.as_slice(), b"XYZ");
    let expected: [i32; 7] = [0, 127, 128, 256, -128, -129, -1];
    for (child, value) in c[1..].iter().zip(expected) {
        assert_eq!(*child.as_integer().unwrap(), Bignum::from(value));
    }
}

#[test]
fn low_tag_context_element() {
    // context class, id 10, length 3
    let bytes = hex!("8a 03 00 01 02");
    let el = round_trip(&bytes);
    assert_eq!(el.class(), Class::Context);
    assert_eq!(el.type_id(), 10);
    assert!(!el.constructed());
    assert_eq!(el.as_opaque().unwrap().data.as_slice(), [0, 1, 2]);
    assert_eq!(el.region().header_len, 2);
    assert_eq!(el.region().content_len, 3);
}

#[test]
fn high_tag_id_and_long_length() {
    // context class, two-byte id 129 (0x81 0x01), length 257 (0x82 0x01 0x01)
    let mut bytes = hex!("9f 81 01 82 01 01").to_vec();
    for i in 0..257 {
        bytes.push((i % 256) as u8);
    }
    let el = round_trip(&bytes);
    assert_eq!(el.class(), Class::Context);
    assert_eq!(el.type_id(), 129);
    assert_eq!(el.region().header_len, 6);
    assert_eq!(el.region().content_len, 257);
}

#[test]
fn length_300_uses_82_01_2c() {
    let el = Element::octet_string(vec![0xabu8; 300]);
    let bytes = dump_element(&el).unwrap();
    assert_eq!(&bytes[..4], &hex!("04 82 01 2c"));
    assert_eq!(bytes.len(), 304);
    round_trip(&bytes);
}

#[test]
fn malformed_headers() {
    // no length byte
    assert!(matches!(
        parse_element(&hex!("8a"), 0),
        Err(Error::UnexpectedEnd { .. })
    ));
    // declared length 3, two bytes of data
    assert!(matches!(
        parse_element(&hex!("8a 03 a1 a2"), 0),
        Err(Error::UnexpectedEnd { .. })
    ));
    // multi-byte length 257, short data
    assert!(matches!(
        parse_element(&hex!("8a 82 01 01 ab"), 0),
        Err(Error::UnexpectedEnd { .. })
    ));
    // 0x80 is the forbidden indefinite form
    assert!(matches!(
        parse_element(&hex!("8a 80"), 0),
        Err(Error::IndefiniteLength { .. })
    ));
    // insufficient extended length bytes
    assert!(matches!(
        parse_element(&hex!("8a 82 01"), 0),
        Err(Error::UnexpectedEnd { .. })
    ));
    // empty buffer
    assert!(matches!(
        parse_element(&[], 0),
        Err(Error::UnexpectedEnd { .. })
    ));
}

#[test]
fn container_child_overrun() {
    // SEQUENCE claims 3 content bytes but its child claims 3 of its own
    assert!(matches!(
        parse_element(&hex!("30 03 02 03 01"), 0),
        Err(Error::UnexpectedEnd { .. }) | Err(Error::Malformed { .. })
    ));
    // same, with enough buffer after the container: the child must not
    // span past its container even when the bytes exist
    assert!(matches!(
        parse_element(&hex!("30 03 02 03 01 01 01"), 0),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn primitive_sequence_rejected() {
    assert!(matches!(
        parse_element(&hex!("10 00"), 0),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn bit_string_18_bits() {
    // pad 6, bits 01101110 01011101 11
    let bytes = hex!("03 04 06 6e 5d c0");
    let el = round_trip(&bytes);
    let bs = el.as_bit_string().unwrap();
    assert_eq!(bs.width(), 18);
    assert_eq!(bs.pad_bits(), 6);
    assert!(!bs.is_bit_set(0));
    assert!(bs.is_bit_set(1));
    assert!(bs.is_bit_set(2));
    assert!(!bs.is_bit_set(3));
    assert!(bs.is_bit_set(16));
    assert!(bs.is_bit_set(17));
    assert!(!bs.is_bit_set(18));

    // rebuild the same value from scratch
    let rebuilt = Element::bit_string(BitString::from_bytes(hex!("6e 5d c0").to_vec(), 18));
    assert_eq!(dump_element(&rebuilt).unwrap(), bytes);
}

#[test]
fn bit_string_pad_too_high() {
    assert!(matches!(
        parse_element(&hex!("03 04 08 6e 5d c0"), 0),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn boolean_and_null() {
    let t = round_trip(&hex!("01 01 01"));
    assert!(t.as_boolean().unwrap());
    // any non-zero parses as true, but emits canonically as 0x01
    let loose = parse_element(&hex!("01 01 ff"), 0).unwrap();
    assert!(loose.as_boolean().unwrap());
    assert_eq!(dump_element(&loose).unwrap(), hex!("01 01 01"));

    let n = round_trip(&hex!("05 00"));
    assert!(n.is_null());
    assert!(matches!(
        parse_element(&hex!("05 01 00"), 0),
        Err(Error::Malformed { .. })
    ));
    assert!(matches!(
        parse_element(&hex!("01 02 00 00"), 0),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn empty_integer_rejected() {
    assert!(matches!(
        parse_element(&hex!("02 00"), 0),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn oid_round_trip() {
    // 1.2.840.113549.1.1.1 (rsaEncryption)
    let bytes = hex!("06 09 2a 86 48 86 f7 0d 01 01 01");
    let el = round_trip(&bytes);
    let oid = el.as_object_identifier().unwrap();
    assert_eq!(*oid, [1u32, 2, 840, 113549, 1, 1, 1][..]);
    assert_eq!(oid.to_string(), "1.2.840.113549.1.1.1");
}

#[test]
fn time_round_trips() {
    // explicit zero seconds parse, but the canonical emit drops them
    let utc = parse_element(b"\x17\x0d500101000000Z", 0).unwrap();
    assert_eq!(utc.as_time().unwrap().year(), 2050);
    assert_eq!(dump_element(&utc).unwrap(), b"\x17\x0b5001010000Z");

    let utc70 = parse_element(b"\x17\x0d700101000000Z", 0).unwrap();
    assert_eq!(utc70.as_time().unwrap().unix(), 0);

    // non-zero seconds round-trip byte-exact
    round_trip(b"\x17\x0d210601123045Z");
    let r#gen = round_trip(b"\x18\x0f20210601123045Z");
    assert_eq!(r#gen.as_time().unwrap().civil(), (2021, 6, 1, 12, 30, 45));
}

#[test]
fn utc_missing_timezone_rejected() {
    assert!(matches!(
        parse_element(b"\x17\x0c201231235959", 0),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn empty_document_semantics() {
    let mut doc = DerDocument::new();
    doc.parse(&[]).unwrap();
    assert!(doc.is_empty());
    assert!(matches!(doc.root(), Err(Error::EmptyDocument)));
    assert!(matches!(doc.dump(), Err(Error::EmptyDocument)));
}

#[test]
fn document_refreshes_regions_on_dump() {
    let mut doc = DerDocument::from_root(Element::sequence(vec![
        Element::integer(1u32),
        Element::octet_string(vec![0u8; 200]),
    ]));
    let bytes = doc.dump().unwrap();
    let root = doc.root().unwrap();
    assert_eq!(root.region().offset, 0);
    assert_eq!(root.region().end(), bytes.len());
    let kids = root.children().unwrap();
    assert_eq!(kids[0].region().offset, root.region().header_len);
    assert_eq!(kids[1].region().end(), bytes.len());
}

#[test]
fn explicit_context_round_trip() {
    let inner = Element::integer(42u32);
    let wrapped = inner.explicit_to_context(3).unwrap();
    assert_eq!(wrapped.class(), Class::Context);
    assert_eq!(wrapped.type_id(), 3);
    assert!(wrapped.constructed());
    assert_eq!(wrapped.as_opaque().unwrap().children.len(), 1);

    let bytes = dump_element(&wrapped).unwrap();
    assert_eq!(bytes, hex!("a3 03 02 01 2a"));

    let back = wrapped.context_to_explicit().unwrap();
    assert_eq!(back, inner);
}

#[test]
fn implicit_context_round_trip() {
    let inner = Element::octet_string(b"key-id".to_vec());
    let tagged = inner.implicit_to_context(0).unwrap();
    assert_eq!(tagged.class(), Class::Context);
    assert_eq!(tagged.type_id(), 0);
    assert!(!tagged.constructed());
    assert_eq!(dump_element(&tagged).unwrap(), hex!("80 06 6b 65 79 2d 69 64"));

    let back = tagged.context_to_implicit(4).unwrap();
    assert_eq!(back, inner);
}

#[test]
fn implicit_conversion_contract() {
    let inner = Element::integer(1u32);
    // a universal element is not a context element
    assert!(inner.context_to_implicit(2).is_err());
    assert!(inner.context_to_explicit().is_err());
    // a primitive context element has no explicit form
    let prim = Element::opaque(Class::Context, false, 0, vec![1, 2, 3]);
    assert!(prim.context_to_explicit().is_err());
    // multi-byte ids have no implicit form
    assert!(inner.implicit_to_context(31).is_err());
}

// strategy for arbitrary element trees the codec can produce
fn element_strategy() -> impl Strategy<Value = Element> {
    let bytes = proptest::collection::vec(any::<u8>(), 0..24);
    let leaf = prop_oneof![
        any::<bool>().prop_map(Element::boolean),
        proptest::collection::vec(any::<u8>(), 1..24)
            .prop_map(|b| Element::integer(Bignum::from_twos_complement(&b))),
        (bytes.clone(), 0usize..7).prop_map(|(b, drop)| {
            let width = (b.len() * 8).saturating_sub(drop);
            Element::bit_string(BitString::from_bytes(b, width))
        }),
        bytes.clone().prop_map(Element::octet_string),
        Just(Element::null()),
        (0u32..3, 0u32..40, proptest::collection::vec(any::<u32>(), 0..6))
            .prop_map(|(a, b, rest)| {
                let mut arcs = vec![a, b];
                arcs.extend(rest);
                Element::object_identifier(Oid::new(arcs).expect("valid arcs"))
            }),
        (0u8..4, bytes.clone()).prop_map(|(kind, b)| match kind {
            0 => Element::utf8_string(b),
            1 => Element::printable_string(b),
            2 => Element::ia5_string(b),
            _ => Element::bmp_string(b),
        }),
        (any::<bool>(), 1950i64..2050, 1u32..13, 1u32..29, 0u32..24, 0u32..60, 0u32..60).prop_map(
            |(utc, y, mo, d, h, mi, s)| {
                let time = DateTime::from_civil(y, mo, d, h, mi, s).expect("valid civil time");
                if utc {
                    Element::utc_time(time)
                } else {
                    Element::generalized_time(time)
                }
            }
        ),
        (any::<bool>(), 0u32..200, bytes).prop_map(|(private, id, data)| {
            let class = if private {
                Class::Private
            } else {
                Class::Application
            };
            Element::opaque(class, false, id, data)
        }),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Element::sequence),
            proptest::collection::vec(inner, 0..6).prop_map(Element::set),
        ]
    })
}

proptest! {
    #[test]
    fn structural_round_trip(el in element_strategy()) {
        let bytes = dump_element(&el).expect("dump");
        let parsed = parse_element(&bytes, 0).expect("parse own output");
        prop_assert_eq!(&parsed, &el);
        // and the second dump is byte-identical
        prop_assert_eq!(dump_element(&parsed).expect("dump"), bytes);
    }
}
