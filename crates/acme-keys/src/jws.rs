//! Extensions for signing keys used to answer ACME challenges.
//!
//! See <https://datatracker.ietf.org/doc/html/rfc8555#section-8.1>.
use sha2::{Digest, Sha256};

use crate::{
    Result,
    algorithm::SigningAlgorithm,
    base64::url_encode,
};

/// Adds JWK thumbprints and key authorizations to every [`SigningAlgorithm`].
pub trait JwsSignerExt {
    /// Computes the [RFC 7638][rfc] thumbprint of the public JWK using the
    /// digest `D`.
    ///
    /// [rfc]: https://datatracker.ietf.org/doc/html/rfc7638
    fn thumbprint<D: Digest>(&self) -> Result<Vec<u8>>;

    /// Computes the key authorization `<token>.<base64url(SHA-256 thumbprint)>`
    /// for the challenge `token`.
    fn key_authorization(&self, token: &str) -> Result<String>;

    /// Computes the base64url encoded SHA-256 digest of the key authorization,
    /// as used by the `dns-01` challenge.
    fn key_authorization_digest(&self, token: &str) -> Result<String>;
}

impl<T> JwsSignerExt for T
where
    T: SigningAlgorithm + ?Sized,
{
    fn thumbprint<D: Digest>(&self) -> Result<Vec<u8>> {
        Ok(self.export_public_jwk().thumbprint::<D>()?)
    }

    fn key_authorization(&self, token: &str) -> Result<String> {
        let thumbprint = self.thumbprint::<Sha256>()?;
        Ok(format!("{token}.{}", url_encode(thumbprint)))
    }

    fn key_authorization_digest(&self, token: &str) -> Result<String> {
        let key_authorization = self.key_authorization(token)?;
        Ok(url_encode(Sha256::digest(key_authorization.as_bytes())))
    }
}
