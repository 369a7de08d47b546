//! Configuration selecting the algorithm of newly generated keys.
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    adapters::{
        ecdsa::EcdsaAdapter,
        rsa::{DEFAULT_KEY_SIZE, RsaAdapter},
    },
    algorithm::BoxedSigningAlgorithm,
    keys::KeyType,
    policy::HashSize,
};

/// The algorithm used to generate a new signing key.
///
/// It uses the same tags as the persisted [`AlgorithmKey`](crate::AlgorithmKey):
///
/// ```json
/// { "type": "RSA", "hashSize": 256, "keySize": 2048 }
/// { "type": "EC", "hashSize": 384 }
/// ```
///
/// The sizes are only validated when calling [`KeyAlgorithm::generate`],
/// except for the hash size, which has to be 256, 384 or 512.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum KeyAlgorithm {
    #[serde(rename = "RSA", rename_all = "camelCase")]
    Rsa {
        #[serde(default)]
        hash_size: HashSize,

        #[serde(default = "default_key_size")]
        key_size: usize,
    },

    #[serde(rename = "EC", rename_all = "camelCase")]
    Ec {
        #[serde(default)]
        hash_size: HashSize,
    },
}

impl Default for KeyAlgorithm {
    fn default() -> Self {
        Self::Rsa {
            hash_size: HashSize::Sha256,
            key_size: DEFAULT_KEY_SIZE,
        }
    }
}

impl KeyAlgorithm {
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa { .. } => KeyType::Rsa,
            Self::Ec { .. } => KeyType::Ec,
        }
    }

    /// Generates a new signing key. This fails with
    /// [`Error::UnsupportedKeySize`](crate::Error::UnsupportedKeySize) or
    /// [`Error::UnsupportedHashSizeForKeyType`](crate::Error::UnsupportedHashSizeForKeyType)
    /// if the configured sizes can't be used with the algorithm.
    pub fn generate(&self) -> Result<BoxedSigningAlgorithm> {
        let key: BoxedSigningAlgorithm = match *self {
            Self::Rsa {
                hash_size,
                key_size,
            } => Box::new(RsaAdapter::new(hash_size, key_size)?),
            Self::Ec { hash_size } => Box::new(EcdsaAdapter::new(hash_size)?),
        };

        Ok(key)
    }
}

fn default_key_size() -> usize {
    DEFAULT_KEY_SIZE
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::Error;

    #[rstest]
    #[case(
        r#"{"type":"RSA","hashSize":256,"keySize":3072}"#,
        KeyAlgorithm::Rsa { hash_size: HashSize::Sha256, key_size: 3072 }
    )]
    #[case(
        r#"{"type":"RSA"}"#,
        KeyAlgorithm::Rsa { hash_size: HashSize::Sha256, key_size: 2048 }
    )]
    #[case(r#"{"type":"EC","hashSize":384}"#, KeyAlgorithm::Ec { hash_size: HashSize::Sha384 })]
    #[case(r#"{"type":"EC","hashSize":512}"#, KeyAlgorithm::Ec { hash_size: HashSize::Sha512 })]
    fn deserialize(#[case] json: &str, #[case] expected: KeyAlgorithm) {
        let algorithm: KeyAlgorithm = serde_json::from_str(json).unwrap();
        assert_eq!(algorithm, expected);
    }

    #[rstest]
    #[case(r#"{"type":"EC","hashSize":128}"#)]
    #[case(r#"{"type":"RSA","hashSize":1024,"keySize":2048}"#)]
    #[case(r#"{"type":"DSA","hashSize":256}"#)]
    fn deserialize_invalid(#[case] json: &str) {
        assert!(serde_json::from_str::<KeyAlgorithm>(json).is_err());
    }

    #[test]
    fn serialize() {
        assert_eq!(
            serde_json::to_string(&KeyAlgorithm::default()).unwrap(),
            r#"{"type":"RSA","hashSize":256,"keySize":2048}"#
        );
        assert_eq!(
            serde_json::to_string(&KeyAlgorithm::Ec {
                hash_size: HashSize::Sha384
            })
            .unwrap(),
            r#"{"type":"EC","hashSize":384}"#
        );
    }

    #[rstest]
    #[case(KeyAlgorithm::Ec { hash_size: HashSize::Sha256 }, "ES256")]
    #[case(KeyAlgorithm::Ec { hash_size: HashSize::Sha384 }, "ES384")]
    #[case(KeyAlgorithm::default(), "RS256")]
    fn generate(#[case] algorithm: KeyAlgorithm, #[case] jws_algorithm_name: &str) {
        let key = algorithm.generate().expect("failed to generate key");
        assert_eq!(key.jws_algorithm_name(), jws_algorithm_name);
        assert_eq!(key.key_type(), algorithm.key_type());
    }

    #[rstest]
    #[case(KeyAlgorithm::Rsa { hash_size: HashSize::Sha256, key_size: 1024 })]
    #[case(KeyAlgorithm::Rsa { hash_size: HashSize::Sha256, key_size: 8192 })]
    fn generate_unsupported_key_size(#[case] algorithm: KeyAlgorithm) {
        let err = algorithm.generate().expect_err("key size must be rejected");
        assert!(matches!(err, Error::UnsupportedKeySize { .. }));
    }

    #[test]
    fn generate_unsupported_rsa_hash_size() {
        let algorithm = KeyAlgorithm::Rsa {
            hash_size: HashSize::Sha512,
            key_size: 2048,
        };

        let err = algorithm.generate().expect_err("RSA keys are generated with SHA-256");
        assert!(matches!(err, Error::UnsupportedHashSizeForKeyType {
            key_type: KeyType::Rsa,
            ..
        }));
    }
}
