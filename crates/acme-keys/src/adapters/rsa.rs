//! Abstraction layer around the [`rsa`] crate.
use std::fmt::Debug;

use const_oid::db::rfc5912::{
    SHA_256_WITH_RSA_ENCRYPTION, SHA_384_WITH_RSA_ENCRYPTION, SHA_512_WITH_RSA_ENCRYPTION,
};
use rand_core::{CryptoRngCore, OsRng};
use rsa::{
    BigUint, Pkcs1v15Sign, RsaPrivateKey,
    pkcs8::EncodePublicKey,
    traits::{PrivateKeyParts, PublicKeyParts},
};
use sha2::{Sha256, Sha384, Sha512};
use snafu::{ResultExt, ensure};
use tracing::{debug, instrument};
use x509_cert::{
    der::asn1::{Any, AnyRef},
    spki::{AlgorithmIdentifierOwned, Document},
};

use crate::{
    CryptoError, EncodePublicKeySnafu, GenerateRsaKeySnafu, LoadRsaKeySnafu,
    MissingPrivateParametersSnafu, Result, SignRsaSnafu, UnsupportedHashSizeForKeyTypeSnafu,
    UnsupportedKeySizeSnafu,
    algorithm::SigningAlgorithm,
    csr::{self, RequestSigner},
    jwk::Jwk,
    keys::{AlgorithmKey, KeyType, RsaKeyParams},
    policy::{HashSize, RSA_GENERATION_HASH_SIZES, RSA_KEY_SIZES},
};

/// The modulus size of RSA keys created when no size is requested.
pub const DEFAULT_KEY_SIZE: usize = 2048;

/// An RSA signing key producing `RS256`, `RS384` or `RS512` signatures.
pub struct RsaAdapter {
    key: RsaPrivateKey,
    hash_size: HashSize,
}

impl RsaAdapter {
    /// Generates a new RSA key with the default random-number generator
    /// [`OsRng`].
    ///
    /// Only [`HashSize::Sha256`] can be paired with new keys and `key_size`
    /// must be one of [`RSA_KEY_SIZES`]. It should be noted that the
    /// generation of the key takes longer for larger key sizes and can take
    /// up to multiple seconds.
    #[instrument(name = "create_rsa_signing_key")]
    pub fn new(hash_size: HashSize, key_size: usize) -> Result<Self> {
        let mut csprng = OsRng;
        Self::new_with_rng(hash_size, key_size, &mut csprng)
    }

    /// Generates a new RSA key with a custom random-number generator.
    #[instrument(name = "create_rsa_signing_key_custom_rng", skip(rng))]
    pub fn new_with_rng<Rng>(hash_size: HashSize, key_size: usize, rng: &mut Rng) -> Result<Self>
    where
        Rng: CryptoRngCore + ?Sized,
    {
        ensure!(
            RSA_GENERATION_HASH_SIZES.contains(&hash_size),
            UnsupportedHashSizeForKeyTypeSnafu {
                hash_size,
                key_type: KeyType::Rsa,
                allowed: RSA_GENERATION_HASH_SIZES,
            }
        );
        ensure!(
            RSA_KEY_SIZES.contains(&key_size),
            UnsupportedKeySizeSnafu {
                key_size,
                allowed: RSA_KEY_SIZES,
            }
        );

        let key = RsaPrivateKey::new(rng, key_size).context(GenerateRsaKeySnafu { key_size })?;
        debug!(key.size = key_size, key.hash_size = %hash_size, "created RSA signing key");

        Ok(Self { key, hash_size })
    }

    /// Loads the RSA key described by `params` without generating any new
    /// randomness.
    ///
    /// The private exponent and both primes are required. The CRT
    /// components are recomputed, the key is validated before use.
    #[instrument(name = "load_rsa_signing_key", skip_all, fields(key.hash_size = %params.hash_size))]
    pub fn from_params(params: &RsaKeyParams) -> Result<Self> {
        ensure!(
            params.has_private_key(),
            MissingPrivateParametersSnafu {
                key_type: KeyType::Rsa
            }
        );

        let key = RsaPrivateKey::from_components(
            BigUint::from_bytes_be(&params.modulus),
            BigUint::from_bytes_be(&params.exponent),
            BigUint::from_bytes_be(&params.d),
            vec![
                BigUint::from_bytes_be(&params.p),
                BigUint::from_bytes_be(&params.q),
            ],
        )
        .context(LoadRsaKeySnafu)?;
        key.validate().context(LoadRsaKeySnafu)?;

        Ok(Self {
            key,
            hash_size: params.hash_size,
        })
    }

    /// Rehydrates the key from persisted [`AlgorithmKey`] parameters. This is
    /// the constructor registered in the
    /// [`AlgorithmFactory`](crate::AlgorithmFactory).
    pub fn create(params: &AlgorithmKey) -> Result<Box<dyn SigningAlgorithm>> {
        match params {
            AlgorithmKey::Rsa(params) => Ok(Box::new(Self::from_params(params)?)),
            other => crate::UnknownKeyTypeSnafu {
                key_type: other.key_type(),
            }
            .fail(),
        }
    }

    /// The modulus size in bits.
    pub fn key_size(&self) -> usize {
        self.key.n().bits()
    }

    fn padding(&self) -> Pkcs1v15Sign {
        match self.hash_size {
            HashSize::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
            HashSize::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
            HashSize::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
        }
    }

    fn sign_digest(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = self.hash_size.digest(data);
        self.key
            .sign(self.padding(), &digest)
            .context(SignRsaSnafu)
    }
}

impl SigningAlgorithm for RsaAdapter {
    fn jws_algorithm_name(&self) -> String {
        format!("RS{}", self.hash_size)
    }

    fn export_public_jwk(&self) -> Jwk {
        Jwk::rsa(&self.key.n().to_bytes_be(), &self.key.e().to_bytes_be())
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.sign_digest(data)?)
    }

    fn generate_csr(&self, dns_names: &[String]) -> Result<Vec<u8>> {
        csr::generate_csr(self, dns_names)
    }

    fn export_key(&self, include_private: bool) -> AlgorithmKey {
        let private = |value: Option<&BigUint>| match value {
            Some(value) if include_private => value.to_bytes_be(),
            _ => Vec::new(),
        };

        let (p, q) = match self.key.primes() {
            [p, q, ..] => (Some(p), Some(q)),
            _ => (None, None),
        };

        let inverse_q = match self.key.qinv() {
            Some(qinv) if include_private => qinv.to_bytes_be().1,
            _ => Vec::new(),
        };

        AlgorithmKey::Rsa(RsaKeyParams {
            hash_size: self.hash_size,
            modulus: self.key.n().to_bytes_be(),
            exponent: self.key.e().to_bytes_be(),
            p: private(p),
            q: private(q),
            dp: private(self.key.dp()),
            dq: private(self.key.dq()),
            inverse_q,
            d: private(Some(self.key.d())),
        })
    }

    fn key_type(&self) -> KeyType {
        KeyType::Rsa
    }

    fn hash_size(&self) -> HashSize {
        self.hash_size
    }
}

impl RequestSigner for RsaAdapter {
    fn public_key_der(&self) -> Result<Document, CryptoError> {
        self.key
            .to_public_key()
            .to_public_key_der()
            .context(EncodePublicKeySnafu)
    }

    fn signature_algorithm(&self) -> AlgorithmIdentifierOwned {
        let oid = match self.hash_size {
            HashSize::Sha256 => SHA_256_WITH_RSA_ENCRYPTION,
            HashSize::Sha384 => SHA_384_WITH_RSA_ENCRYPTION,
            HashSize::Sha512 => SHA_512_WITH_RSA_ENCRYPTION,
        };

        // The parameters of the PKCS#1 v1.5 signature algorithms must be NULL,
        // see https://datatracker.ietf.org/doc/html/rfc4055#section-5
        AlgorithmIdentifierOwned {
            oid,
            parameters: Some(Any::from(AnyRef::NULL)),
        }
    }

    fn sign_request(&self, info: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.sign_digest(info)
    }
}

impl Debug for RsaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaAdapter")
            .field("hash_size", &self.hash_size)
            .field("key_size", &self.key_size())
            .finish_non_exhaustive()
    }
}
