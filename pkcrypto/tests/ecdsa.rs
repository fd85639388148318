//! ECDSA and ECDH tests.

use bignum::Bignum;
use hex_literal::hex;
use pkcrypto::ecc::{EcCurve, EcCurveId, EcPoint};
use pkcrypto::hash::{Hash, HashAlgorithm};
use pkcrypto::{Error, ecdh, ecdsa};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

const CURVES: [EcCurveId; 6] = [
    EcCurveId::P192r1,
    EcCurveId::P224r1,
    EcCurveId::P256r1,
    EcCurveId::P384r1,
    EcCurveId::P521r1,
    EcCurveId::P256Sm2,
];

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0xecc)
}

#[test]
fn p256_two_g_known_answer() {
    // [2]G on P-256, from the NIST example point tables
    let curve = EcCurve::new(EcCurveId::P256r1);
    let two_g = curve.base_point().mul(&Bignum::from(2u32)).unwrap();
    let expected = EcPoint::from_uncompressed(
        &curve,
        &hex!(
            "04"
            "7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978"
            "07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1"
        ),
    )
    .unwrap();
    assert_eq!(two_g, expected);
}

#[test]
fn keypair_generation_and_validation() {
    let mut rng = rng();
    for id in CURVES {
        let curve = EcCurve::new(id);
        let (private, public) = curve.generate_keypair(&mut rng).unwrap();
        assert!(public.is_valid(), "{id}");
        assert!(curve.validate_keypair(&private, &public), "{id}");

        let (other_private, other_public) = curve.generate_keypair(&mut rng).unwrap();
        assert!(!curve.validate_keypair(&private, &other_public), "{id}");
        assert!(!curve.validate_keypair(&other_private, &public), "{id}");
    }
}

#[test]
fn sign_verify_all_curves() {
    let mut rng = rng();
    for id in CURVES {
        let curve = EcCurve::new(id);
        let (private, public) = curve.generate_keypair(&mut rng).unwrap();
        let ephemeral = curve.generate_private_key(&mut rng).unwrap();

        // sha-256 digests exercise truncation on the narrow curves and
        // left-alignment on the wide ones
        let digest = Hash::digest(HashAlgorithm::Sha256, b"signed message");
        let (r, s) = ecdsa::sign(&curve, &private, &ephemeral, &digest).unwrap();
        assert!(ecdsa::verify(&public, &digest, &r, &s), "{id}");

        // any flipped digest bit invalidates the signature
        let mut bad = digest.clone();
        bad[11] ^= 0x04;
        assert!(!ecdsa::verify(&public, &bad, &r, &s), "{id}");

        // as does a perturbed signature component
        let r_bad = &r + 1u32;
        assert!(!ecdsa::verify(&public, &digest, &r_bad, &s), "{id}");
        let s_bad = &s + 1u32;
        assert!(!ecdsa::verify(&public, &digest, &r, &s_bad), "{id}");

        // and a key that did not sign
        let (_, stranger) = curve.generate_keypair(&mut rng).unwrap();
        assert!(!ecdsa::verify(&stranger, &digest, &r, &s), "{id}");
    }
}

#[test]
fn sign_contract_checks() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (private, _) = curve.generate_keypair(&mut rng).unwrap();
    let digest = Hash::digest(HashAlgorithm::Sha256, b"msg");

    // the ephemeral must differ from the regular key
    assert!(matches!(
        ecdsa::sign(&curve, &private, &private, &digest),
        Err(Error::Contract(_))
    ));
    // an empty digest is meaningless
    let eph = curve.generate_private_key(&mut rng).unwrap();
    assert!(matches!(
        ecdsa::sign(&curve, &private, &eph, &[]),
        Err(Error::Contract(_))
    ));
    // out-of-range scalars are rejected
    assert!(matches!(
        ecdsa::sign(&curve, &Bignum::new(), &eph, &digest),
        Err(Error::Contract(_))
    ));
    let big = curve.order().clone();
    assert!(matches!(
        ecdsa::sign(&curve, &big, &eph, &digest),
        Err(Error::Contract(_))
    ));
}

#[test]
fn out_of_range_signature_rejected() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (private, public) = curve.generate_keypair(&mut rng).unwrap();
    let eph = curve.generate_private_key(&mut rng).unwrap();
    let digest = Hash::digest(HashAlgorithm::Sha256, b"msg");
    let (r, s) = ecdsa::sign(&curve, &private, &eph, &digest).unwrap();

    let zero = Bignum::new();
    assert!(!ecdsa::verify(&public, &digest, &zero, &s));
    assert!(!ecdsa::verify(&public, &digest, &r, &zero));
    assert!(!ecdsa::verify(&public, &digest, curve.order(), &s));
    assert!(!ecdsa::verify(&public, &digest, &r, curve.order()));
    assert!(!ecdsa::verify(
        &EcPoint::infinity(&curve),
        &digest,
        &r,
        &s
    ));
}

#[test]
fn ecdh_agreement() {
    let mut rng = rng();
    for id in CURVES {
        let curve = EcCurve::new(id);
        let (alice_priv, alice_pub) = curve.generate_keypair(&mut rng).unwrap();
        let (bob_priv, bob_pub) = curve.generate_keypair(&mut rng).unwrap();

        let alice_secret = ecdh::shared_secret(&alice_priv, &bob_pub).unwrap();
        let bob_secret = ecdh::shared_secret(&bob_priv, &alice_pub).unwrap();
        assert_eq!(alice_secret, bob_secret, "{id}");

        // a third party arrives somewhere else
        let (eve_priv, _) = curve.generate_keypair(&mut rng).unwrap();
        let eve_secret = ecdh::shared_secret(&eve_priv, &bob_pub).unwrap();
        assert_ne!(eve_secret, alice_secret, "{id}");
    }
}

#[test]
fn ecdh_rejects_infinity() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P384r1);
    let (private, _) = curve.generate_keypair(&mut rng).unwrap();
    assert!(matches!(
        ecdh::shared_secret(&private, &EcPoint::infinity(&curve)),
        Err(Error::InvalidPoint)
    ));
}
