//! Bignum arithmetic and encoding tests.

use bignum::{Bignum, Error};
use hex_literal::hex;
use proptest::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

#[test]
fn init_is_zero() {
    let n = Bignum::new();
    assert!(n.is_zero());
    assert_eq!(n.to_string(), "0");
    assert_eq!(n.width(), 1);
}

#[test]
fn compare() {
    let one = Bignum::from(1u32);
    let ten = Bignum::from(10u32);
    assert!(one == one);
    assert!(one <= one);
    assert!(one < ten);
    assert!(ten > one);
    assert!(one != ten);
    assert!(one == 1u32);
    assert!(one < 10u32);
    assert!(ten >= 1u32);
}

#[test]
fn shift() {
    let one = Bignum::from(1u32);
    assert_eq!(&one << 10, Bignum::from(1024u32));
    assert_eq!(Bignum::from(1024u32) >> 10, one);
    assert_eq!(&one << 100 >> 100, one);
}

#[test]
fn arithmetic() {
    let a = Bignum::from(1000u32);
    let b = Bignum::from(999u32);
    assert_eq!(&a + &b, Bignum::from(1999u32));
    assert_eq!(&a - &b, Bignum::from(1u32));
    assert_eq!(&b - &a, Bignum::from(-1));
    assert_eq!(&a * &b, Bignum::from(999000u32));
    assert_eq!(&a / &b, Bignum::from(1u32));
    assert_eq!(&a % &b, Bignum::from(1u32));

    let (q, r) = a.div_rem(&b).unwrap();
    assert_eq!(q, Bignum::from(1u32));
    assert_eq!(r, Bignum::from(1u32));
    assert_eq!(a.div_rem(&Bignum::new()), Err(Error::DivideByZero));
}

#[test]
fn gcd_and_pow() {
    let a = Bignum::from(12u32);
    let b = Bignum::from(18u32);
    assert_eq!(a.gcd(&b), Bignum::from(6u32));
    assert_eq!(Bignum::from(2u32).pow(16), Bignum::from(65536u32));
    assert_eq!(Bignum::from(10u32).pow(0), Bignum::from(1u32));
}

#[test]
fn print_hex() {
    let mut a = Bignum::from(0x1000f0u32);
    a.negate();
    assert_eq!(format!("{a:x}"), "-1000f0");
    assert_eq!(a.to_string(), "-1048816");
}

// The two's-complement boundary table from the encoding contract:
//   128  -> 00 80
//   127  -> 7f
//   -1   -> ff
//   -127 -> 81
//   -128 -> 80
//   -129 -> ff 7f
#[test]
fn twos_complement_boundaries() {
    let cases: &[(i32, &[u8])] = &[
        (0, &hex!("00")),
        (1, &hex!("01")),
        (127, &hex!("7f")),
        (128, &hex!("0080")),
        (255, &hex!("00ff")),
        (256, &hex!("0100")),
        (-1, &hex!("ff")),
        (-127, &hex!("81")),
        (-128, &hex!("80")),
        (-129, &hex!("ff7f")),
        (-256, &hex!("ff00")),
    ];
    for (value, encoded) in cases {
        let n = Bignum::from(*value);
        assert_eq!(n.to_twos_complement(), *encoded, "encode {value}");
        assert_eq!(n.twos_complement_len(), encoded.len(), "length {value}");
        assert_eq!(
            Bignum::from_twos_complement(encoded),
            n,
            "decode {value}"
        );
    }
}

#[test]
fn unsigned_bytes() {
    let n = Bignum::from_bytes_be(&hex!("00deadbeef"));
    assert_eq!(n, Bignum::from(0xdeadbeefu32));
    assert_eq!(n.byte_len(), 4);
    assert_eq!(n.to_bytes_be().unwrap(), hex!("deadbeef"));
    assert_eq!(n.to_bytes_be_padded(6).unwrap(), hex!("0000deadbeef"));
}

#[test]
fn powmod_and_inverse() {
    let p = Bignum::from(101u32);
    let a = Bignum::from(7u32);
    let r = a.powmod(&Bignum::from(100u32), &p).unwrap();
    assert_eq!(r, Bignum::from(1u32), "Fermat little theorem");

    let inv = a.mod_inverse(&p).unwrap();
    assert_eq!((&a * &inv).mod_floor(&p).unwrap(), Bignum::from(1u32));

    // even numbers have no inverse mod an even modulus
    assert!(Bignum::from(4u32).mod_inverse(&Bignum::from(8u32)).is_none());
}

#[test]
fn random_respects_flags() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..16 {
        let n = Bignum::random(&mut rng, 64, true, true).unwrap();
        assert_eq!(n.width(), 64);
        assert!(n.is_bit_set(63) && n.is_bit_set(62));
        assert!(n.is_odd());
    }
    assert_eq!(
        Bignum::random(&mut rng, 0, false, false),
        Err(Error::BitWidth)
    );
}

#[test]
fn generates_primes() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let p = Bignum::random_prime(&mut rng, 128).unwrap();
    assert_eq!(p.width(), 128);
    assert!(p.is_prime(None));
    assert!(p.is_odd());
}

proptest! {
    #[test]
    fn twos_complement_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..48)) {
        let n = Bignum::from_twos_complement(&bytes);
        let encoded = n.to_twos_complement();
        prop_assert_eq!(Bignum::from_twos_complement(&encoded), n);
    }

    #[test]
    fn sign_extended_round_trip(v in any::<i64>(), pad in 0usize..8) {
        let n = Bignum::from(v as i32) * Bignum::from((v >> 32) as i32);
        let min = n.twos_complement_len();
        let wide = n.to_twos_complement_padded(min + pad).unwrap();
        prop_assert_eq!(wide.len(), min + pad);
        prop_assert_eq!(Bignum::from_twos_complement(&wide), n);
    }

    #[test]
    fn unsigned_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..48)) {
        let n = Bignum::from_bytes_be(&bytes);
        let out = n.to_bytes_be().unwrap();
        prop_assert_eq!(Bignum::from_bytes_be(&out), n);
    }
}
