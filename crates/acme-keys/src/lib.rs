//! This crate provides the signing keys used by an ACME client. It abstracts
//! over RSA and ECDSA keys so that the client can sign JWS payloads, export
//! the public key as a JSON Web Key (JWK), compute key authorizations for
//! challenges and generate PKCS#10 certificate signing requests without
//! caring which algorithm is in use.
//!
//! Keys are obtained through the [`AlgorithmFactory`], either freshly
//! generated or rehydrated from persisted [`AlgorithmKey`] parameters:
//!
//! ```no_run
//! use acme_keys::{AlgorithmFactory, JwsSignerExt, SigningAlgorithm};
//!
//! let key = AlgorithmFactory::create_default_signing_key().unwrap();
//! let persisted = serde_json::to_string(&key.export_key(true)).unwrap();
//!
//! let restored = AlgorithmFactory::default()
//!     .create_signing_key(&serde_json::from_str(&persisted).unwrap())
//!     .unwrap();
//!
//! assert_eq!(
//!     key.key_authorization("token").unwrap(),
//!     restored.key_authorization("token").unwrap()
//! );
//! ```
//!
//! ## References
//!
//! - <https://datatracker.ietf.org/doc/html/rfc7515>
//! - <https://datatracker.ietf.org/doc/html/rfc7518>
//! - <https://datatracker.ietf.org/doc/html/rfc7638>
//! - <https://datatracker.ietf.org/doc/html/rfc8555>
//! - <https://datatracker.ietf.org/doc/html/rfc2986>
use snafu::Snafu;

pub mod adapters;
pub mod algorithm;
pub mod base64;
pub mod config;
pub mod factory;
pub mod jwk;
pub mod jws;
pub mod keys;
pub mod policy;

mod csr;

pub use crate::{
    adapters::{ecdsa::EcdsaAdapter, rsa::RsaAdapter},
    algorithm::{BoxedSigningAlgorithm, SigningAlgorithm},
    config::KeyAlgorithm,
    factory::AlgorithmFactory,
    jwk::Jwk,
    jws::JwsSignerExt,
    keys::{AlgorithmKey, EcKeyParams, KeyType, RsaKeyParams},
    policy::{EcCurve, HashSize},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors which can be encountered when creating, loading or using a
/// signing key.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("unsupported hash size {hash_size}, expected one of 256, 384 or 512"))]
    UnsupportedHashSize { hash_size: u16 },

    #[snafu(display(
        "unsupported hash size {hash_size} for {key_type} keys, expected one of {allowed:?}"
    ))]
    UnsupportedHashSizeForKeyType {
        hash_size: HashSize,
        key_type: KeyType,
        allowed: &'static [HashSize],
    },

    #[snafu(display("unsupported RSA key size {key_size}, expected one of {allowed:?}"))]
    UnsupportedKeySize {
        key_size: usize,
        allowed: &'static [usize],
    },

    #[snafu(display("invalid argument {argument:?}: {reason}"))]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },

    #[snafu(display("no signing algorithm is registered for {key_type} keys"))]
    UnknownKeyType { key_type: KeyType },

    #[snafu(context(false), display("cryptographic operation failed"))]
    CryptoOperationFailed { source: CryptoError },
}

/// Failures reported by the underlying cryptography libraries. These are
/// always surfaced wrapped in [`Error::CryptoOperationFailed`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CryptoError {
    #[snafu(display("failed to generate RSA key with key size {key_size}"))]
    GenerateRsaKey { source: rsa::Error, key_size: usize },

    #[snafu(display("failed to load RSA key from its parameters"))]
    LoadRsaKey { source: rsa::Error },

    #[snafu(display("failed to sign data using RSA"))]
    SignRsa { source: rsa::Error },

    #[snafu(display("failed to load {curve} key from its parameters"))]
    LoadEcKey {
        source: p256::elliptic_curve::Error,
        curve: EcCurve,
    },

    #[snafu(display("failed to create {curve} signing key from its private scalar"))]
    LoadEcSigningKey {
        source: signature::Error,
        curve: EcCurve,
    },

    #[snafu(display(
        "the public point of the {curve} key does not match the one derived from its private scalar"
    ))]
    PublicKeyMismatch { curve: EcCurve },

    #[snafu(display("failed to sign data using ECDSA with curve {curve}"))]
    SignEcdsa {
        source: signature::Error,
        curve: EcCurve,
    },

    #[snafu(display("the {key_type} key parameters are missing the private key material"))]
    MissingPrivateParameters { key_type: KeyType },

    #[snafu(display("failed to encode public key as SPKI"))]
    EncodePublicKey { source: x509_cert::spki::Error },

    #[snafu(display("failed to encode subject with common name {common_name:?}"))]
    EncodeSubject {
        source: x509_cert::der::Error,
        common_name: String,
    },

    #[snafu(display("failed to parse subject alternative DNS name {dns_name:?} as a Ia5 string"))]
    ParseSubjectAlternativeDnsName {
        source: x509_cert::der::Error,
        dns_name: String,
    },

    #[snafu(display("failed to create certificate signing request builder"))]
    CreateRequestBuilder { source: x509_cert::builder::Error },

    #[snafu(display("failed to add certificate signing request extension"))]
    AddRequestExtension { source: x509_cert::builder::Error },

    #[snafu(display("failed to build certificate signing request"))]
    BuildRequest { source: x509_cert::builder::Error },

    #[snafu(display("failed to encode certificate signing request as DER"))]
    EncodeRequest { source: x509_cert::der::Error },

    #[snafu(display("failed to encode ECDSA signature as DER"))]
    EncodeEcdsaSignature { source: x509_cert::der::Error },

    #[snafu(display("failed to serialize JWK"))]
    SerializeJwk { source: serde_json::Error },
}
