use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::policy::{EcCurve, HashSize};

/// Parameters of an ECDSA key. The private scalar `d` and the public point
/// coordinates `x` and `y` are big-endian byte sequences.
///
/// Public-only exports leave `d` empty.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct EcKeyParams {
    #[zeroize(skip)]
    pub hash_size: HashSize,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::base64::standard"
    )]
    pub d: Vec<u8>,

    #[serde(with = "crate::base64::standard")]
    pub x: Vec<u8>,

    #[serde(with = "crate::base64::standard")]
    pub y: Vec<u8>,
}

impl EcKeyParams {
    pub fn curve(&self) -> EcCurve {
        EcCurve::from(self.hash_size)
    }

    pub fn has_private_key(&self) -> bool {
        !self.d.is_empty()
    }
}

impl Debug for EcKeyParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcKeyParams")
            .field("hash_size", &self.hash_size)
            .field("curve", &self.curve())
            .field("x", &self.x)
            .field("y", &self.y)
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}
