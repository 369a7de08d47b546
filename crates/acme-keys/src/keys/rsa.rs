use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::policy::HashSize;

/// Parameters of an RSA key. All numbers are unsigned big-endian byte
/// sequences.
///
/// Public-only exports leave every private component empty.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct RsaKeyParams {
    #[zeroize(skip)]
    pub hash_size: HashSize,

    #[serde(with = "crate::base64::standard")]
    pub modulus: Vec<u8>,

    #[serde(with = "crate::base64::standard")]
    pub exponent: Vec<u8>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub p: Vec<u8>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub q: Vec<u8>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub dp: Vec<u8>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub dq: Vec<u8>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub inverse_q: Vec<u8>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub d: Vec<u8>,
}

impl RsaKeyParams {
    /// The private exponent and both primes are required to load a signing
    /// key. The CRT components are recomputed from those.
    pub fn has_private_key(&self) -> bool {
        !self.d.is_empty() && !self.p.is_empty() && !self.q.is_empty()
    }
}

impl Debug for RsaKeyParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeyParams")
            .field("hash_size", &self.hash_size)
            .field("modulus_len", &self.modulus.len())
            .field("exponent", &self.exponent)
            .field("has_private_key", &self.has_private_key())
            .finish_non_exhaustive()
    }
}
