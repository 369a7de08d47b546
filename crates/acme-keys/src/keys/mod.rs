//! Serializable key parameters, which are used to persist signing keys and
//! to rehydrate them via the [`AlgorithmFactory`](crate::AlgorithmFactory).
//!
//! This module currently provides parameters for the following algorithms:
//!
//! ## RSA
//!
//! [`RsaKeyParams`] carry the modulus, the public exponent and the private
//! CRT components of an RSA key as big-endian byte sequences.
//!
//! ## ECDSA
//!
//! [`EcKeyParams`] carry the private scalar and the coordinates of the public
//! point. The curve is selected by the hash size of the key.
//!
//! Both are persisted as internally tagged records:
//!
//! ```json
//! { "type": "EC", "hashSize": 256, "d": "…", "x": "…", "y": "…" }
//! ```
use serde::{Deserialize, Serialize};

use crate::policy::HashSize;

mod ecdsa;
mod rsa;

pub use self::{ecdsa::EcKeyParams, rsa::RsaKeyParams};

/// The tag identifying the algorithm family of persisted key parameters.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum KeyType {
    #[serde(rename = "RSA")]
    #[strum(serialize = "RSA")]
    Rsa,

    #[serde(rename = "EC")]
    #[strum(serialize = "EC")]
    Ec,
}

/// The serializable private and public parameters of a signing key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum AlgorithmKey {
    #[serde(rename = "RSA")]
    Rsa(RsaKeyParams),

    #[serde(rename = "EC")]
    Ec(EcKeyParams),
}

impl AlgorithmKey {
    /// Returns the tag used to select the matching signing algorithm.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa(_) => KeyType::Rsa,
            Self::Ec(_) => KeyType::Ec,
        }
    }

    pub fn hash_size(&self) -> HashSize {
        match self {
            Self::Rsa(params) => params.hash_size,
            Self::Ec(params) => params.hash_size,
        }
    }

    /// Returns `true` if these parameters contain the private key material
    /// required to sign.
    pub fn has_private_key(&self) -> bool {
        match self {
            Self::Rsa(params) => params.has_private_key(),
            Self::Ec(params) => params.has_private_key(),
        }
    }
}

impl From<RsaKeyParams> for AlgorithmKey {
    fn from(params: RsaKeyParams) -> Self {
        Self::Rsa(params)
    }
}

impl From<EcKeyParams> for AlgorithmKey {
    fn from(params: EcKeyParams) -> Self {
        Self::Ec(params)
    }
}
