//! X.509 certificate build, sign, parse and validate tests.

use bignum::Bignum;
use dertree::{DateTime, DerDocument, Element, PemDocument};
use pkcrypto::ecc::{EcCurve, EcCurveId};
use pkcrypto::rsa::RsaPrivateKey;
use pkix::{
    CERTIFICATE_PEM_LABEL, CertBundle, DirectoryString, Error, Extension, ExtensionValue,
    GeneralName, KeyAlgorithm, KeyUsage, RelativeDistinguishedName, SubjectPublicKeyInfo,
    X509Cert, X509SignatureAlgo, oids,
};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0x509)
}

fn test_name(cn: &str) -> Vec<RelativeDistinguishedName> {
    let mut rdn = RelativeDistinguishedName::new();
    rdn.insert(
        oids::oid(oids::AT_COUNTRY_NAME),
        DirectoryString::printable("US"),
    );
    rdn.insert(
        oids::oid(oids::AT_COMMON_NAME),
        DirectoryString::printable(cn),
    );
    vec![rdn]
}

fn base_cert(name: &str, public_key: SubjectPublicKeyInfo) -> X509Cert {
    let mut cert = X509Cert::new();
    cert.serial_number = Bignum::from(0x1000u32);
    cert.issuer = test_name(name);
    cert.subject = test_name(name);
    cert.valid_start = Some(DateTime::from_civil(2024, 1, 1, 0, 0, 0).unwrap());
    cert.valid_end = Some(DateTime::from_civil(2034, 1, 1, 0, 0, 0).unwrap());
    cert.public_key = public_key;
    cert.extensions = vec![
        Extension::new(
            ExtensionValue::BasicConstraints {
                ca: true,
                path_len_constraint: Some(Bignum::from(1u32)),
            },
            true,
        ),
        Extension::new(
            ExtensionValue::KeyUsage(KeyUsage {
                key_cert_sign: true,
                crl_sign: true,
                digital_signature: true,
                ..KeyUsage::default()
            }),
            true,
        ),
        Extension::new(
            ExtensionValue::SubjectAlternativeName(vec![
                GeneralName::DnsName("ca.example.org".into()),
                GeneralName::Rfc822Name("ca@example.org".into()),
                GeneralName::IpAddress(vec![192, 0, 2, 1]),
                GeneralName::RegisteredId(oids::oid(&[1, 3, 6, 1, 4, 1, 99999, 1])),
            ]),
            false,
        ),
    ];
    cert
}

#[test]
fn self_signed_ecdsa_p256() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (private, public) = curve.generate_keypair(&mut rng).unwrap();
    let spki = SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP256r1, &public).unwrap();

    let mut cert = base_cert("Test EC Root", spki);
    let mut doc = DerDocument::new();
    cert.sign_and_dump_ecdsa(
        &mut rng,
        &mut doc,
        &curve,
        &private,
        X509SignatureAlgo::EcdsaSha256,
    )
    .unwrap();

    // through PEM and back
    let mut pem = PemDocument::from_document(doc, CERTIFICATE_PEM_LABEL);
    let text = pem.dump().unwrap();

    let mut parsed_pem = PemDocument::new("");
    parsed_pem.parse(&text).unwrap();
    assert_eq!(parsed_pem.label(), CERTIFICATE_PEM_LABEL);
    let parsed = X509Cert::parse(parsed_pem.document()).unwrap();

    assert_eq!(parsed.sig_algo(), X509SignatureAlgo::EcdsaSha256);
    assert_eq!(parsed.serial_number, cert.serial_number);
    assert_eq!(parsed.issuer, cert.issuer);
    assert_eq!(parsed.subject, cert.subject);
    assert_eq!(parsed.extensions, cert.extensions);
    assert_eq!(parsed.valid_start, cert.valid_start);
    assert_eq!(parsed.valid_end, cert.valid_end);
    assert_eq!(parsed.tbs_bytes(), cert.tbs_bytes());
    assert_eq!(parsed.public_key.ec_point().unwrap(), public);

    // the self signature holds, directly and via the issuer path
    assert!(parsed.validate_ec(&public));
    assert!(parsed.validate_self());
    assert!(parsed.validate_cert(&cert));
    assert!(parsed.critical_extensions_recognized());

    // flipping any signed byte kills the signature
    let der = parsed_pem.document().bytes().to_vec();
    let cn = der
        .windows(b"Test EC Root".len())
        .position(|w| w == b"Test EC Root")
        .expect("subject bytes present");
    let mut tampered = der.clone();
    tampered[cn] ^= 0x01;
    let mut tampered_doc = DerDocument::new();
    tampered_doc.parse(&tampered).unwrap();
    let tampered_cert = X509Cert::parse(&tampered_doc).unwrap();
    assert!(!tampered_cert.validate_ec(&public));
    assert!(!tampered_cert.validate_self());
}

#[test]
fn self_signed_rsa() {
    let mut rng = rng();
    let key = RsaPrivateKey::generate(&mut rng, 1024).unwrap();
    let spki = SubjectPublicKeyInfo::from_rsa_key(&key.pub_key()).unwrap();

    let mut cert = base_cert("Test RSA Root", spki);
    let mut doc = DerDocument::new();
    cert.sign_and_dump_rsa(&mut doc, &key, X509SignatureAlgo::RsaSha256)
        .unwrap();

    let parsed = X509Cert::parse(&doc).unwrap();
    assert_eq!(parsed.sig_algo(), X509SignatureAlgo::RsaSha256);
    assert_eq!(parsed.public_key.algo_type(), KeyAlgorithm::Rsa);
    assert!(parsed.validate_rsa(&key.pub_key()));
    assert!(parsed.validate_self());

    // a stranger's key does not verify
    let other = RsaPrivateKey::generate(&mut rng, 1024).unwrap();
    assert!(!parsed.validate_rsa(&other.pub_key()));

    // and an ec validate on an rsa-signed cert is a clean mismatch
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (_, point) = curve.generate_keypair(&mut rng).unwrap();
    assert!(!parsed.validate_ec(&point));
}

#[test]
fn issued_certificate_chain() {
    let mut rng = rng();

    // CA key pair and self-signed root
    let curve = EcCurve::new(EcCurveId::P384r1);
    let (ca_private, ca_public) = curve.generate_keypair(&mut rng).unwrap();
    let ca_spki = SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP384r1, &ca_public).unwrap();
    let mut ca_cert = base_cert("Test CA", ca_spki);
    let mut ca_doc = DerDocument::new();
    ca_cert
        .sign_and_dump_ecdsa(
            &mut rng,
            &mut ca_doc,
            &curve,
            &ca_private,
            X509SignatureAlgo::EcdsaSha384,
        )
        .unwrap();
    let ca = X509Cert::parse(&ca_doc).unwrap();
    assert!(ca.validate_self());

    // end-entity certificate signed by the CA
    let leaf_curve = EcCurve::new(EcCurveId::P256r1);
    let (_, leaf_public) = leaf_curve.generate_keypair(&mut rng).unwrap();
    let leaf_spki =
        SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP256r1, &leaf_public).unwrap();
    let mut leaf = X509Cert::new();
    leaf.serial_number = Bignum::from(7u32);
    leaf.issuer = ca.subject.clone();
    leaf.subject = test_name("leaf.example.org");
    leaf.valid_start = Some(DateTime::from_civil(2024, 6, 1, 0, 0, 0).unwrap());
    leaf.valid_end = Some(DateTime::from_civil(2025, 6, 1, 0, 0, 0).unwrap());
    leaf.public_key = leaf_spki;

    let mut leaf_doc = DerDocument::new();
    leaf.sign_and_dump_ecdsa(
        &mut rng,
        &mut leaf_doc,
        &curve,
        &ca_private,
        X509SignatureAlgo::EcdsaSha384,
    )
    .unwrap();
    let leaf = X509Cert::parse(&leaf_doc).unwrap();

    assert!(leaf.validate_cert(&ca));
    assert!(!leaf.validate_self());
    assert!(!ca.validate_cert(&leaf));
}

#[test]
fn version_1_rejected() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (private, public) = curve.generate_keypair(&mut rng).unwrap();
    let spki = SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP256r1, &public).unwrap();

    let mut cert = base_cert("Test EC Root", spki);
    let mut doc = DerDocument::new();
    cert.sign_and_dump_ecdsa(
        &mut rng,
        &mut doc,
        &curve,
        &private,
        X509SignatureAlgo::EcdsaSha256,
    )
    .unwrap();

    // rewrite the version to v2 (1); the certificate must be refused
    let mut root = doc.root().unwrap().clone();
    root.children_mut().unwrap()[0].children_mut().unwrap()[0] =
        Element::integer(1u32).explicit_to_context(0).unwrap();
    let mut bad_doc = DerDocument::from_root(root);
    bad_doc.dump().unwrap();
    assert!(matches!(
        X509Cert::parse(&bad_doc),
        Err(Error::UnsupportedVersion)
    ));

    // and a tbs with no version field at all is v1
    let mut root = doc.root().unwrap().clone();
    root.children_mut().unwrap()[0]
        .children_mut()
        .unwrap()
        .remove(0);
    let mut v1_doc = DerDocument::from_root(root);
    v1_doc.dump().unwrap();
    assert!(matches!(
        X509Cert::parse(&v1_doc),
        Err(Error::UnsupportedVersion)
    ));
}

#[test]
fn unknown_critical_extension_is_parsed_but_flagged() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (private, public) = curve.generate_keypair(&mut rng).unwrap();
    let spki = SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP256r1, &public).unwrap();

    let mut cert = base_cert("Test EC Root", spki);
    cert.extensions.push(Extension::unknown(
        oids::oid(&[1, 3, 6, 1, 4, 1, 99999, 2]),
        true,
        // a NULL, der-encoded
        vec![0x05, 0x00],
    ));
    let mut doc = DerDocument::new();
    cert.sign_and_dump_ecdsa(
        &mut rng,
        &mut doc,
        &curve,
        &private,
        X509SignatureAlgo::EcdsaSha256,
    )
    .unwrap();

    let parsed = X509Cert::parse(&doc).unwrap();
    assert!(parsed.validate_self());
    let unknown = parsed
        .find_extension(&[1, 3, 6, 1, 4, 1, 99999, 2])
        .expect("extension retained");
    assert!(unknown.critical);
    assert!(!unknown.is_recognized());
    assert!(matches!(&unknown.value, ExtensionValue::Unknown(raw) if raw == &[0x05, 0x00]));
    assert!(!parsed.critical_extensions_recognized());
}

#[test]
fn certificate_bundle() {
    let mut rng = rng();
    let mut texts = String::new();
    let mut originals = Vec::new();

    for name in ["Root A", "Root B"] {
        let curve = EcCurve::new(EcCurveId::P256r1);
        let (private, public) = curve.generate_keypair(&mut rng).unwrap();
        let spki = SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP256r1, &public).unwrap();
        let mut cert = base_cert(name, spki);
        let mut doc = DerDocument::new();
        cert.sign_and_dump_ecdsa(
            &mut rng,
            &mut doc,
            &curve,
            &private,
            X509SignatureAlgo::EcdsaSha256,
        )
        .unwrap();
        let mut pem = PemDocument::from_document(doc, CERTIFICATE_PEM_LABEL);
        texts.push_str(&pem.dump().unwrap());
        originals.push(cert);
    }

    let bundle = CertBundle::parse_str(&texts).unwrap();
    assert_eq!(bundle.len(), 2);
    for (parsed, original) in bundle.iter().zip(&originals) {
        assert_eq!(parsed.subject, original.subject);
        assert!(parsed.validate_self());
    }

    // an empty stream is an empty bundle
    assert!(CertBundle::parse_str("").unwrap().is_empty());

    // a wrong label is fatal
    let wrong = texts.replace("CERTIFICATE", "TRUST ANCHOR");
    assert!(CertBundle::parse_str(&wrong).is_err());

    // as is garbage in a block
    let broken = texts.replacen("M", "?", 1);
    assert!(CertBundle::parse_str(&broken).is_err());
}

#[test]
fn unique_ids_round_trip() {
    let mut rng = rng();
    let curve = EcCurve::new(EcCurveId::P256r1);
    let (private, public) = curve.generate_keypair(&mut rng).unwrap();
    let spki = SubjectPublicKeyInfo::from_ec_point(KeyAlgorithm::EcP256r1, &public).unwrap();

    let mut cert = base_cert("Test EC Root", spki);
    cert.issuer_unique_id = Some(dertree::BitString::from_bytes(vec![0xab, 0xcd], 16));
    cert.subject_unique_id = Some(dertree::BitString::from_bytes(vec![0x12], 7));

    let mut doc = DerDocument::new();
    cert.sign_and_dump_ecdsa(
        &mut rng,
        &mut doc,
        &curve,
        &private,
        X509SignatureAlgo::EcdsaSha256,
    )
    .unwrap();

    let parsed = X509Cert::parse(&doc).unwrap();
    assert_eq!(parsed.issuer_unique_id, cert.issuer_unique_id);
    assert_eq!(parsed.subject_unique_id, cert.subject_unique_id);
    assert!(parsed.validate_self());
}
