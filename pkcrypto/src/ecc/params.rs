//! Domain parameters for the supported prime-field curves.
//!
//! Values are from SEC 2 / NIST SP 800-186 and GB/T 32918 (SM2). All six
//! curves use the short Weierstrass form `y^2 = x^3 + ax + b` over GF(p)
//! with cofactor 1.

use bignum::Bignum;
use hex_literal::hex;

use super::EcCurveId;

pub(crate) struct CurveParams {
    pub id: EcCurveId,
    pub bits: usize,
    pub p: Bignum,
    pub a: Bignum,
    pub b: Bignum,
    pub n: Bignum,
    pub gx: Bignum,
    pub gy: Bignum,
    pub cofactor: u32,
}

impl CurveParams {
    pub fn field_len(&self) -> usize {
        self.bits.div_ceil(8)
    }
}

struct RawParams {
    bits: usize,
    p: &'static [u8],
    a: &'static [u8],
    b: &'static [u8],
    n: &'static [u8],
    gx: &'static [u8],
    gy: &'static [u8],
}

pub(crate) fn params(id: EcCurveId) -> CurveParams {
    let raw = match id {
        EcCurveId::P192r1 => &P192R1,
        EcCurveId::P224r1 => &P224R1,
        EcCurveId::P256r1 => &P256R1,
        EcCurveId::P384r1 => &P384R1,
        EcCurveId::P521r1 => &P521R1,
        EcCurveId::P256Sm2 => &P256SM2,
    };
    CurveParams {
        id,
        bits: raw.bits,
        p: Bignum::from_bytes_be(raw.p),
        a: Bignum::from_bytes_be(raw.a),
        b: Bignum::from_bytes_be(raw.b),
        n: Bignum::from_bytes_be(raw.n),
        gx: Bignum::from_bytes_be(raw.gx),
        gy: Bignum::from_bytes_be(raw.gy),
        cofactor: 1,
    }
}

/// secp192r1 (NIST P-192), 96 bit security level.
static P192R1: RawParams = RawParams {
    bits: 192,
    p: &hex!("fffffffffffffffffffffffffffffffeffffffffffffffff"),
    a: &hex!("fffffffffffffffffffffffffffffffefffffffffffffffc"),
    b: &hex!("64210519e59c80e70fa7e9ab72243049feb8deecc146b9b1"),
    n: &hex!("ffffffffffffffffffffffff99def836146bc9b1b4d22831"),
    gx: &hex!("188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012"),
    gy: &hex!("07192b95ffc8da78631011ed6b24cdd573f977a11e794811"),
};

/// secp224r1 (NIST P-224), 112 bit security level.
static P224R1: RawParams = RawParams {
    bits: 224,
    p: &hex!("ffffffffffffffffffffffffffffffff000000000000000000000001"),
    a: &hex!("fffffffffffffffffffffffffffffffefffffffffffffffffffffffe"),
    b: &hex!("b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4"),
    n: &hex!("ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d"),
    gx: &hex!("b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21"),
    gy: &hex!("bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34"),
};

/// secp256r1 (NIST P-256, prime256v1), 128 bit security level.
static P256R1: RawParams = RawParams {
    bits: 256,
    p: &hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    a: &hex!("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc"),
    b: &hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    n: &hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
    gx: &hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
    gy: &hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
};

/// secp384r1 (NIST P-384), 192 bit security level.
static P384R1: RawParams = RawParams {
    bits: 384,
    p: &hex!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff"
    ),
    a: &hex!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000fffffffc"
    ),
    b: &hex!(
        "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef"
    ),
    n: &hex!(
        "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973"
    ),
    gx: &hex!(
        "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7"
    ),
    gy: &hex!(
        "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f"
    ),
};

/// secp521r1 (NIST P-521), 256 bit security level.
static P521R1: RawParams = RawParams {
    bits: 521,
    p: &hex!(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    ),
    a: &hex!(
        "01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffc"
    ),
    b: &hex!(
        "0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00"
    ),
    n: &hex!(
        "01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409"
    ),
    gx: &hex!(
        "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd66"
    ),
    gy: &hex!(
        "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16650"
    ),
};

/// SM2 (GB/T 32918), used with the SM3 hash.
static P256SM2: RawParams = RawParams {
    bits: 256,
    p: &hex!("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff"),
    a: &hex!("fffffffeffffffffffffffffffffffffffffffff00000000fffffffffffffffc"),
    b: &hex!("28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93"),
    n: &hex!("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123"),
    gx: &hex!("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7"),
    gy: &hex!("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0"),
};
