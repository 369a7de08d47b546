//! Creation of [`SigningAlgorithm`]s from persisted key parameters.
use std::collections::BTreeMap;

use snafu::OptionExt;
use tracing::{debug, instrument};

use crate::{
    Result, UnknownKeyTypeSnafu,
    adapters::{
        ecdsa::EcdsaAdapter,
        rsa::{DEFAULT_KEY_SIZE, RsaAdapter},
    },
    algorithm::BoxedSigningAlgorithm,
    keys::{AlgorithmKey, KeyType},
    policy::HashSize,
};

/// Rehydrates a signing key from its persisted parameters.
pub type CreateFn = fn(&AlgorithmKey) -> Result<BoxedSigningAlgorithm>;

/// A registry mapping each [`KeyType`] to the constructor of the matching
/// [`SigningAlgorithm`](crate::SigningAlgorithm) implementation.
///
/// [`AlgorithmFactory::default`] registers the built-in RSA and ECDSA
/// adapters. Additional algorithm families only need to be registered using
/// [`AlgorithmFactory::register`].
#[derive(Clone, Debug)]
pub struct AlgorithmFactory {
    creators: BTreeMap<KeyType, CreateFn>,
}

impl Default for AlgorithmFactory {
    fn default() -> Self {
        let mut factory = Self::new();
        factory
            .register(KeyType::Rsa, RsaAdapter::create)
            .register(KeyType::Ec, EcdsaAdapter::create);

        factory
    }
}

impl AlgorithmFactory {
    /// Creates a factory without any registered algorithms.
    pub fn new() -> Self {
        Self {
            creators: BTreeMap::new(),
        }
    }

    /// Registers `create` for keys of `key_type`, replacing any previously
    /// registered constructor.
    pub fn register(&mut self, key_type: KeyType, create: CreateFn) -> &mut Self {
        self.creators.insert(key_type, create);
        self
    }

    pub fn key_types(&self) -> impl Iterator<Item = KeyType> + '_ {
        self.creators.keys().copied()
    }

    /// Creates the signing key described by `params` using the constructor
    /// registered for its [`KeyType`].
    #[instrument(
        name = "create_signing_key",
        skip_all,
        fields(key.key_type = %params.key_type(), key.hash_size = %params.hash_size())
    )]
    pub fn create_signing_key(&self, params: &AlgorithmKey) -> Result<BoxedSigningAlgorithm> {
        let key_type = params.key_type();
        let create = self
            .creators
            .get(&key_type)
            .context(UnknownKeyTypeSnafu { key_type })?;

        let key = create(params)?;
        debug!(
            key.algorithm = %key.jws_algorithm_name(),
            "rehydrated signing key"
        );

        Ok(key)
    }

    /// Generates a new RSA key with a key size of 2048 bits, signing with
    /// SHA-256 (`RS256`).
    pub fn create_default_signing_key() -> Result<BoxedSigningAlgorithm> {
        Ok(Box::new(RsaAdapter::new(
            HashSize::Sha256,
            DEFAULT_KEY_SIZE,
        )?))
    }
}
