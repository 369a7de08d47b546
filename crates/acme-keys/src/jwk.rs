//! Canonical public JSON Web Keys as used for JWS headers and thumbprints.
//!
//! The members of each JWK type are declared in lexicographic order and only
//! contain the required members listed in [RFC 7638 Section 3.2][rfc], so
//! that serializing them without whitespace yields the canonical form the
//! thumbprint is computed over.
//!
//! [rfc]: https://datatracker.ietf.org/doc/html/rfc7638#section-3.2
use serde::{Deserialize, Serialize};
use sha2::Digest;
use snafu::ResultExt;

use crate::{CryptoError, SerializeJwkSnafu, base64::url_encode, policy::EcCurve};

/// The `kty` of RSA keys, see <https://datatracker.ietf.org/doc/html/rfc7518#section-6.3>.
pub const KTY_RSA: &str = "RSA";

/// The `kty` of EC keys, see <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2>.
pub const KTY_EC: &str = "EC";

/// A public JWK in canonical member order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Jwk {
    Rsa(RsaJwk),
    Ec(EcJwk),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RsaJwk {
    pub e: String,
    pub kty: String,
    pub n: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EcJwk {
    pub crv: String,
    pub kty: String,
    pub x: String,
    pub y: String,
}

impl Jwk {
    /// Builds the public JWK of an RSA key from the big-endian modulus and
    /// public exponent.
    pub fn rsa(modulus: &[u8], exponent: &[u8]) -> Self {
        Self::Rsa(RsaJwk {
            e: url_encode(exponent),
            kty: KTY_RSA.to_owned(),
            n: url_encode(modulus),
        })
    }

    /// Builds the public JWK of an EC key from the coordinates of its public
    /// point.
    pub fn ec(curve: EcCurve, x: &[u8], y: &[u8]) -> Self {
        Self::Ec(EcJwk {
            crv: curve.name().to_owned(),
            kty: KTY_EC.to_owned(),
            x: url_encode(x),
            y: url_encode(y),
        })
    }

    pub fn kty(&self) -> &str {
        match self {
            Self::Rsa(jwk) => &jwk.kty,
            Self::Ec(jwk) => &jwk.kty,
        }
    }

    /// Serializes the JWK as compact JSON without any whitespace.
    pub fn to_canonical_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self).context(SerializeJwkSnafu)
    }

    /// Computes the JWK thumbprint as per [RFC 7638][rfc] using the digest
    /// `D`.
    ///
    /// [rfc]: https://datatracker.ietf.org/doc/html/rfc7638
    pub fn thumbprint<D: Digest>(&self) -> Result<Vec<u8>, CryptoError> {
        let json = self.to_canonical_json()?;
        Ok(D::digest(json.as_bytes()).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use sha2::Sha256;

    use super::*;

    // Example key from RFC 7638 Section 3.1
    const RFC_7638_N: &str = "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw";
    const RFC_7638_THUMBPRINT: &str = "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs";

    #[test]
    fn rsa_member_order() {
        let jwk = Jwk::rsa(&[0xc3, 0x5a], &[0x01, 0x00, 0x01]);
        assert_eq!(
            jwk.to_canonical_json().unwrap(),
            r#"{"e":"AQAB","kty":"RSA","n":"w1o"}"#
        );
    }

    #[test]
    fn ec_member_order() {
        let jwk = Jwk::ec(EcCurve::P521, &[0x01, 0xff], &[0xfe]);
        assert_eq!(
            jwk.to_canonical_json().unwrap(),
            r#"{"crv":"P-521","kty":"EC","x":"Af8","y":"_g"}"#
        );
        assert_eq!(jwk.kty(), KTY_EC);
    }

    #[test]
    fn rfc_7638_thumbprint() {
        let jwk = Jwk::Rsa(RsaJwk {
            e: "AQAB".to_owned(),
            kty: KTY_RSA.to_owned(),
            n: RFC_7638_N.to_owned(),
        });

        let thumbprint = jwk.thumbprint::<Sha256>().unwrap();
        assert_eq!(url_encode(thumbprint), RFC_7638_THUMBPRINT);
    }

    #[test]
    fn deserializes_either_shape() {
        let rsa: Jwk = serde_json::from_str(r#"{"e":"AQAB","kty":"RSA","n":"w1o"}"#).unwrap();
        assert_eq!(rsa, Jwk::rsa(&[0xc3, 0x5a], &[0x01, 0x00, 0x01]));

        let ec: Jwk =
            serde_json::from_str(r#"{"crv":"P-256","kty":"EC","x":"Af8","y":"_g"}"#).unwrap();
        assert_eq!(ec, Jwk::ec(EcCurve::P256, &[0x01, 0xff], &[0xfe]));
    }
}
