use std::fmt::Debug;

use crate::{
    Result,
    jwk::Jwk,
    keys::{AlgorithmKey, KeyType},
    policy::HashSize,
};

/// A live signing key as used by the ACME client to sign JWS payloads,
/// identify the account and request certificates.
///
/// Implementations own their native key handle and never mutate it after
/// construction. All operations only take `&self`, which is why every
/// implementation must be [`Send`] and [`Sync`]: a single key can be used
/// by multiple threads at once without further locking.
pub trait SigningAlgorithm: Debug + Send + Sync {
    /// The JWS `alg` header value, for example `RS256` or `ES384`.
    fn jws_algorithm_name(&self) -> String;

    /// Exports the public half of the key as a canonical [`Jwk`].
    fn export_public_jwk(&self) -> Jwk;

    /// Signs `data` and returns the signature in the encoding required by
    /// JWS (see [RFC 7518 Section 3][rfc]).
    ///
    /// [rfc]: https://datatracker.ietf.org/doc/html/rfc7518#section-3
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Generates a DER-encoded PKCS#10 certificate signing request for
    /// `dns_names`. The first name is used as the subject common name, all of
    /// them are added as subject alternative names.
    fn generate_csr(&self, dns_names: &[String]) -> Result<Vec<u8>>;

    /// Exports the key parameters for persistence. Private key material is
    /// only included if `include_private` is set.
    fn export_key(&self, include_private: bool) -> AlgorithmKey;

    fn key_type(&self) -> KeyType;

    fn hash_size(&self) -> HashSize;
}

pub type BoxedSigningAlgorithm = Box<dyn SigningAlgorithm>;
