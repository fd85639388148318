//! Object identifiers recognized by the certificate model.
//!
//! Algorithm assignments are from RFC 3279, RFC 5480 and RFC 5758; name
//! attributes from RFC 5280 appendix A; extensions from the 2.5.29
//! certificate-extension arc.

use dertree::Oid;

/// Build an [`Oid`] from one of the constant arc tables.
pub fn oid(arcs: &[u32]) -> Oid {
    Oid::new(arcs).expect("constant oid arcs are valid")
}

/// rsaEncryption.
pub const RSA_ENCRYPTION: &[u32] = &[1, 2, 840, 113549, 1, 1, 1];
/// id-ecPublicKey.
pub const EC_PUBLIC_KEY: &[u32] = &[1, 2, 840, 10045, 2, 1];

/// secp192r1 named curve.
pub const CURVE_P192R1: &[u32] = &[1, 2, 840, 10045, 3, 1, 1];
/// secp224r1 named curve.
pub const CURVE_P224R1: &[u32] = &[1, 3, 132, 0, 33];
/// secp256r1 named curve.
pub const CURVE_P256R1: &[u32] = &[1, 2, 840, 10045, 3, 1, 7];
/// secp384r1 named curve.
pub const CURVE_P384R1: &[u32] = &[1, 3, 132, 0, 34];
/// secp521r1 named curve.
pub const CURVE_P521R1: &[u32] = &[1, 3, 132, 0, 35];

/// md5WithRSAEncryption.
pub const RSA_MD5: &[u32] = &[1, 2, 840, 113549, 1, 1, 4];
/// sha1WithRSAEncryption.
pub const RSA_SHA1: &[u32] = &[1, 2, 840, 113549, 1, 1, 5];
/// sha224WithRSAEncryption.
pub const RSA_SHA224: &[u32] = &[1, 2, 840, 113549, 1, 1, 14];
/// sha256WithRSAEncryption.
pub const RSA_SHA256: &[u32] = &[1, 2, 840, 113549, 1, 1, 11];
/// sha384WithRSAEncryption.
pub const RSA_SHA384: &[u32] = &[1, 2, 840, 113549, 1, 1, 12];
/// sha512WithRSAEncryption.
pub const RSA_SHA512: &[u32] = &[1, 2, 840, 113549, 1, 1, 13];

/// ecdsa-with-SHA1.
pub const ECDSA_SHA1: &[u32] = &[1, 2, 840, 10045, 4, 1];
/// ecdsa-with-SHA224.
pub const ECDSA_SHA224: &[u32] = &[1, 2, 840, 10045, 4, 3, 1];
/// ecdsa-with-SHA256.
pub const ECDSA_SHA256: &[u32] = &[1, 2, 840, 10045, 4, 3, 2];
/// ecdsa-with-SHA384.
pub const ECDSA_SHA384: &[u32] = &[1, 2, 840, 10045, 4, 3, 3];
/// ecdsa-with-SHA512.
pub const ECDSA_SHA512: &[u32] = &[1, 2, 840, 10045, 4, 3, 4];

/// id-at-name.
pub const AT_NAME: &[u32] = &[2, 5, 4, 41];
/// id-at-surname.
pub const AT_SURNAME: &[u32] = &[2, 5, 4, 4];
/// id-at-givenName.
pub const AT_GIVEN_NAME: &[u32] = &[2, 5, 4, 42];
/// id-at-generationQualifier.
pub const AT_GENERATION_QUALIFIER: &[u32] = &[2, 5, 4, 44];
/// id-at-commonName.
pub const AT_COMMON_NAME: &[u32] = &[2, 5, 4, 3];
/// id-at-localityName.
pub const AT_LOCALITY_NAME: &[u32] = &[2, 5, 4, 7];
/// id-at-stateOrProvinceName.
pub const AT_STATE_OR_PROVINCE_NAME: &[u32] = &[2, 5, 4, 8];
/// id-at-organizationName.
pub const AT_ORGANIZATION_NAME: &[u32] = &[2, 5, 4, 10];
/// id-at-organizationalUnitName.
pub const AT_ORGANIZATIONAL_UNIT_NAME: &[u32] = &[2, 5, 4, 11];
/// id-at-title.
pub const AT_TITLE: &[u32] = &[2, 5, 4, 12];
/// id-at-dnQualifier.
pub const AT_DN_QUALIFIER: &[u32] = &[2, 5, 4, 46];
/// id-at-countryName.
pub const AT_COUNTRY_NAME: &[u32] = &[2, 5, 4, 6];
/// id-at-serialNumber.
pub const AT_SERIAL_NUMBER: &[u32] = &[2, 5, 4, 5];
/// id-at-pseudonym.
pub const AT_PSEUDONYM: &[u32] = &[2, 5, 4, 65];
/// id-at-organizationIdentifier.
pub const AT_ORGANIZATION_ID: &[u32] = &[2, 5, 4, 97];
/// id-at-streetAddress.
pub const AT_STREET_ADDRESS: &[u32] = &[2, 5, 4, 9];
/// domainComponent (pilot attribute).
pub const AT_DOMAIN_COMPONENT: &[u32] = &[0, 9, 2342, 19200300, 100, 1, 25];
/// emailAddress (PKCS#9).
pub const AT_EMAIL_ADDRESS: &[u32] = &[1, 2, 840, 113549, 1, 9, 1];

/// id-ce-subjectKeyIdentifier.
pub const CE_SUBJECT_KEY_IDENTIFIER: &[u32] = &[2, 5, 29, 14];
/// id-ce-keyUsage.
pub const CE_KEY_USAGE: &[u32] = &[2, 5, 29, 15];
/// id-ce-subjectAltName.
pub const CE_SUBJECT_ALT_NAME: &[u32] = &[2, 5, 29, 17];
/// id-ce-issuerAltName.
pub const CE_ISSUER_ALT_NAME: &[u32] = &[2, 5, 29, 18];
/// id-ce-basicConstraints.
pub const CE_BASIC_CONSTRAINTS: &[u32] = &[2, 5, 29, 19];
/// id-ce-authorityKeyIdentifier.
pub const CE_AUTHORITY_KEY_IDENTIFIER: &[u32] = &[2, 5, 29, 35];
/// id-ce-extKeyUsage.
pub const CE_EXT_KEY_USAGE: &[u32] = &[2, 5, 29, 37];

/// anyExtendedKeyUsage.
pub const KP_ANY: &[u32] = &[2, 5, 29, 37, 0];
/// id-kp-serverAuth.
pub const KP_SERVER_AUTH: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 1];
/// id-kp-clientAuth.
pub const KP_CLIENT_AUTH: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 2];
/// id-kp-codeSigning.
pub const KP_CODE_SIGNING: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 3];
/// id-kp-emailProtection.
pub const KP_EMAIL_PROTECTION: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 4];
/// id-kp-timeStamping.
pub const KP_TIME_STAMPING: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 8];
/// id-kp-OCSPSigning.
pub const KP_OCSP_SIGNING: &[u32] = &[1, 3, 6, 1, 5, 5, 7, 3, 9];
