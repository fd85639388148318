//! RSA key generation and scheme tests.

use pkcrypto::hash::HashAlgorithm;
use pkcrypto::rsa::{RsaPrivateKey, oaep, pkcs1, pss};
use pkcrypto::Error;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0x5cc)
}

#[test]
fn generate_validates() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 768).unwrap();
    assert_eq!(key.width(), 768);
    assert_eq!(key.width_bytes(), 96);
    assert!(key.validate_self());
    assert!(key.validate(&key.pub_key()));

    let other = RsaPrivateKey::generate(&mut rng, 768).unwrap();
    assert_ne!(key, other);
    assert!(!key.validate(&other.pub_key()));
}

#[test]
fn generate_contract() {
    let mut rng = rng();
    assert!(matches!(
        RsaPrivateKey::generate(&mut rng, 0),
        Err(Error::Contract(_))
    ));
    assert!(matches!(
        RsaPrivateKey::generate(&mut rng, 767),
        Err(Error::Contract(_))
    ));
}

#[test]
fn oaep_round_trip_rsa_2048() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 2048).unwrap();
    let public = key.pub_key();

    let mut msg = [0u8; 32];
    rng.fill_bytes(&mut msg);

    let cipher = oaep::encrypt(&mut rng, &public, HashAlgorithm::Sha256, &msg, b"").unwrap();
    assert_eq!(cipher.len(), oaep::cipher_len(&public));
    assert_eq!(cipher.len(), 256);

    let plain = oaep::decrypt(&key, HashAlgorithm::Sha256, &cipher, b"")
        .unwrap()
        .expect("padding check");
    assert_eq!(&plain[..], &msg);

    // a single flipped ciphertext byte never yields a plaintext; away
    // from the top byte the failure is the quiet padding-check kind
    for i in [cipher.len() / 2, cipher.len() - 1] {
        let mut bad = cipher.clone();
        bad[i] ^= 0x40;
        assert!(
            oaep::decrypt(&key, HashAlgorithm::Sha256, &bad, b"")
                .unwrap()
                .is_none()
        );
    }
    let mut bad = cipher.clone();
    bad[0] ^= 0x40;
    // flipping the top byte may push the representative past the modulus,
    // which is a range error rather than a padding failure
    assert!(!matches!(
        oaep::decrypt(&key, HashAlgorithm::Sha256, &bad, b""),
        Ok(Some(_))
    ));

    // a wrong label is a quiet failure too
    assert!(
        oaep::decrypt(&key, HashAlgorithm::Sha256, &cipher, b"label")
            .unwrap()
            .is_none()
    );
}

#[test]
fn oaep_limits() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 768).unwrap();
    let public = key.pub_key();

    let max = oaep::max_msg_len(&public, HashAlgorithm::Sha1);
    assert_eq!(max, 96 - 2 * 20 - 2);

    let msg = vec![0x61; max];
    let cipher = oaep::encrypt(&mut rng, &public, HashAlgorithm::Sha1, &msg, b"").unwrap();
    let plain = oaep::decrypt(&key, HashAlgorithm::Sha1, &cipher, b"")
        .unwrap()
        .expect("padding check");
    assert_eq!(&plain[..], &msg[..]);

    // one byte over the limit is a caller error
    let too_big = vec![0x61; max + 1];
    assert!(matches!(
        oaep::encrypt(&mut rng, &public, HashAlgorithm::Sha1, &too_big, b""),
        Err(Error::Contract(_))
    ));

    // wrong-size ciphertext is a caller error, not a quiet failure
    assert!(matches!(
        oaep::decrypt(&key, HashAlgorithm::Sha1, &cipher[1..], b""),
        Err(Error::Contract(_))
    ));
}

#[test]
fn oaep_empty_message() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 768).unwrap();
    let cipher = oaep::encrypt(&mut rng, &key.pub_key(), HashAlgorithm::Sha256, b"", b"").unwrap();
    let plain = oaep::decrypt(&key, HashAlgorithm::Sha256, &cipher, b"")
        .unwrap()
        .expect("padding check");
    assert!(plain.is_empty());
}

#[test]
fn pkcs1_sign_verify() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 1024).unwrap();
    let public = key.pub_key();
    let msg = b"message to be signed";

    for alg in [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ] {
        let sig = pkcs1::sign(&key, alg, msg).unwrap();
        assert_eq!(sig.len(), pkcs1::signature_len(&public));
        assert!(pkcs1::verify(&public, alg, msg, &sig), "{alg:?}");
        assert!(!pkcs1::verify(&public, alg, b"other message", &sig));

        let mut bad = sig.clone();
        bad[7] ^= 1;
        assert!(!pkcs1::verify(&public, alg, msg, &bad));
        // wrong signature size is a mismatch, not an error
        assert!(!pkcs1::verify(&public, alg, msg, &sig[1..]));
    }

    // sm3 has no DigestInfo prefix here
    assert!(matches!(
        pkcs1::sign(&key, HashAlgorithm::Sm3, msg),
        Err(Error::UnsupportedAlgorithm)
    ));
}

#[test]
fn pss_sign_verify() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 1024).unwrap();
    let public = key.pub_key();
    let msg = b"pss signed message";

    for salt_len in [0usize, 20, 32] {
        let sig = pss::sign(&mut rng, &key, HashAlgorithm::Sha256, salt_len, msg).unwrap();
        assert_eq!(sig.len(), pss::signature_len(&public));
        assert!(pss::verify(&public, HashAlgorithm::Sha256, salt_len, msg, &sig));
        assert!(!pss::verify(&public, HashAlgorithm::Sha256, salt_len, b"x", &sig));

        let mut bad = sig.clone();
        bad[0] ^= 1;
        assert!(!pss::verify(&public, HashAlgorithm::Sha256, salt_len, msg, &bad));
        // a different salt length fails verification
        assert!(!pss::verify(
            &public,
            HashAlgorithm::Sha256,
            salt_len + 1,
            msg,
            &sig
        ));
    }

    // salt longer than the key can carry
    assert!(matches!(
        pss::sign(&mut rng, &key, HashAlgorithm::Sha512, 100, msg),
        Err(Error::Contract(_))
    ));
}
