//! Maps the nominal hash size of a key to the concrete digest algorithm and,
//! for ECDSA keys, to the named curve.
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use snafu::OptionExt;

use crate::{Error, UnsupportedHashSizeSnafu};

/// The nominal hash size of a signing key.
///
/// This selects the SHA-2 digest used when signing and, for ECDSA keys, the
/// curve (see [`EcCurve`]). It is persisted as a plain integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum HashSize {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashSize {
    pub const ALL: &[Self] = &[Self::Sha256, Self::Sha384, Self::Sha512];

    pub fn bits(self) -> u16 {
        match self {
            Self::Sha256 => 256,
            Self::Sha384 => 384,
            Self::Sha512 => 512,
        }
    }

    /// Computes the SHA-2 digest of `data` matching this hash size.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl TryFrom<u16> for HashSize {
    type Error = Error;

    fn try_from(hash_size: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .find(|candidate| candidate.bits() == hash_size)
            .copied()
            .context(UnsupportedHashSizeSnafu { hash_size })
    }
}

impl From<HashSize> for u16 {
    fn from(hash_size: HashSize) -> Self {
        hash_size.bits()
    }
}

impl Display for HashSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// The NIST curves supported for ECDSA keys.
///
/// The curve is always derived from the [`HashSize`] of the key. Note that a
/// hash size of 512 selects P-521, so the curve name doesn't match the
/// numeric hash size in that case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum EcCurve {
    #[strum(serialize = "P-256")]
    P256,

    #[strum(serialize = "P-384")]
    P384,

    #[strum(serialize = "P-521")]
    P521,
}

impl EcCurve {
    /// The JWK `crv` value, see <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2.1.1>.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Length in bytes of the private scalar and each public point
    /// coordinate. ECDSA signatures are twice as long.
    pub fn coordinate_len(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    pub fn hash_size(self) -> HashSize {
        match self {
            Self::P256 => HashSize::Sha256,
            Self::P384 => HashSize::Sha384,
            Self::P521 => HashSize::Sha512,
        }
    }
}

impl From<HashSize> for EcCurve {
    fn from(hash_size: HashSize) -> Self {
        match hash_size {
            HashSize::Sha256 => Self::P256,
            HashSize::Sha384 => Self::P384,
            HashSize::Sha512 => Self::P521,
        }
    }
}

/// RSA modulus sizes (in bits) which can be used to generate new keys.
pub const RSA_KEY_SIZES: &[usize] = &[2048, 2560, 3072, 3584, 4096];

/// The hash sizes which can be paired with freshly generated RSA keys.
pub const RSA_GENERATION_HASH_SIZES: &[HashSize] = &[HashSize::Sha256];
