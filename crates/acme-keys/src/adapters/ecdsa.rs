//! Abstraction layer around the [`ecdsa`] implementations of the [`p256`],
//! [`p384`] and [`p521`] crates.
use std::fmt::Debug;

use const_oid::{
    AssociatedOid,
    db::rfc5912::{ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, ECDSA_WITH_SHA_512},
};
use p256::elliptic_curve::{
    AffinePoint, CurveArithmetic, FieldBytesSize, SecretKey,
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
};
use rand_core::{CryptoRngCore, OsRng};
use signature::Signer;
use snafu::{ResultExt, ensure};
use tracing::{debug, instrument};
use x509_cert::spki::{AlgorithmIdentifierOwned, Document, EncodePublicKey};
use zeroize::Zeroizing;

use crate::{
    CryptoError, EncodePublicKeySnafu, LoadEcKeySnafu, LoadEcSigningKeySnafu,
    MissingPrivateParametersSnafu, PublicKeyMismatchSnafu, Result, SignEcdsaSnafu,
    algorithm::SigningAlgorithm,
    csr::{self, RequestSigner},
    jwk::Jwk,
    keys::{AlgorithmKey, EcKeyParams, KeyType},
    policy::{EcCurve, HashSize},
};

/// An ECDSA signing key producing `ES256`, `ES384` or `ES512` signatures.
///
/// Signatures are the fixed-length concatenation `r || s` as required by
/// JWS, not the DER encoding used by X.509.
pub struct EcdsaAdapter {
    key: CurveSigningKey,
    curve: EcCurve,
    x: Vec<u8>,
    y: Vec<u8>,
    public_key_der: Document,
}

enum CurveSigningKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

/// The public half of a freshly loaded secret key.
struct PublicParts {
    x: Vec<u8>,
    y: Vec<u8>,
    public_key_der: Document,
}

impl EcdsaAdapter {
    /// Generates a new ECDSA key with the default random-number generator
    /// [`OsRng`]. The curve is selected by `hash_size`, see [`EcCurve`].
    #[instrument(name = "create_ecdsa_signing_key")]
    pub fn new(hash_size: HashSize) -> Result<Self> {
        let mut csprng = OsRng;
        Self::new_with_rng(hash_size, &mut csprng)
    }

    /// Generates a new ECDSA key with a custom random-number generator.
    #[instrument(name = "create_ecdsa_signing_key_custom_rng", skip(rng))]
    pub fn new_with_rng<Rng>(hash_size: HashSize, rng: &mut Rng) -> Result<Self>
    where
        Rng: CryptoRngCore + Sized,
    {
        let curve = EcCurve::from(hash_size);
        let d = Zeroizing::new(match curve {
            EcCurve::P256 => p256::SecretKey::random(rng).to_bytes().to_vec(),
            EcCurve::P384 => p384::SecretKey::random(rng).to_bytes().to_vec(),
            EcCurve::P521 => p521::SecretKey::random(rng).to_bytes().to_vec(),
        });

        let adapter = Self::from_private_scalar(curve, &d)?;
        debug!(key.curve = %curve, key.hash_size = %hash_size, "created ECDSA signing key");

        Ok(adapter)
    }

    /// Loads the ECDSA key described by `params` without generating any new
    /// randomness.
    ///
    /// The public point is derived from the private scalar `d`. If the
    /// parameters contain the coordinates of the public point as well, they
    /// must match the derived ones.
    #[instrument(name = "load_ecdsa_signing_key", skip_all, fields(key.hash_size = %params.hash_size))]
    pub fn from_params(params: &EcKeyParams) -> Result<Self> {
        ensure!(
            params.has_private_key(),
            MissingPrivateParametersSnafu {
                key_type: KeyType::Ec
            }
        );

        let curve = params.curve();
        let len = curve.coordinate_len();
        let adapter = Self::from_private_scalar(curve, &left_pad(&params.d, len))?;

        let matches = |expected: &[u8], actual: &[u8]| {
            expected.is_empty() || *left_pad(expected, len) == actual
        };
        ensure!(
            matches(&params.x, &adapter.x) && matches(&params.y, &adapter.y),
            PublicKeyMismatchSnafu { curve }
        );

        Ok(adapter)
    }

    /// Rehydrates the key from persisted [`AlgorithmKey`] parameters. This is
    /// the constructor registered in the
    /// [`AlgorithmFactory`](crate::AlgorithmFactory).
    pub fn create(params: &AlgorithmKey) -> Result<Box<dyn SigningAlgorithm>> {
        match params {
            AlgorithmKey::Ec(params) => Ok(Box::new(Self::from_params(params)?)),
            other => crate::UnknownKeyTypeSnafu {
                key_type: other.key_type(),
            }
            .fail(),
        }
    }

    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    fn from_private_scalar(curve: EcCurve, d: &[u8]) -> Result<Self, CryptoError> {
        let (key, public) = match curve {
            EcCurve::P256 => {
                let secret = p256::SecretKey::from_slice(d).context(LoadEcKeySnafu { curve })?;
                let public = public_parts(curve, &secret)?;
                (CurveSigningKey::P256(secret.into()), public)
            }
            EcCurve::P384 => {
                let secret = p384::SecretKey::from_slice(d).context(LoadEcKeySnafu { curve })?;
                let public = public_parts(curve, &secret)?;
                (CurveSigningKey::P384(secret.into()), public)
            }
            EcCurve::P521 => {
                let secret = p521::SecretKey::from_slice(d).context(LoadEcKeySnafu { curve })?;
                let public = public_parts(curve, &secret)?;
                let signing_key = p521::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                    .context(LoadEcSigningKeySnafu { curve })?;
                (CurveSigningKey::P521(signing_key), public)
            }
        };

        Ok(Self {
            key,
            curve,
            x: public.x,
            y: public.y,
            public_key_der: public.public_key_der,
        })
    }

    fn sign_raw(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let curve = self.curve;
        let signature = match &self.key {
            CurveSigningKey::P256(key) => {
                let signature: p256::ecdsa::Signature =
                    key.try_sign(data).context(SignEcdsaSnafu { curve })?;
                signature.to_bytes().to_vec()
            }
            CurveSigningKey::P384(key) => {
                let signature: p384::ecdsa::Signature =
                    key.try_sign(data).context(SignEcdsaSnafu { curve })?;
                signature.to_bytes().to_vec()
            }
            CurveSigningKey::P521(key) => {
                let signature: p521::ecdsa::Signature =
                    key.try_sign(data).context(SignEcdsaSnafu { curve })?;
                signature.to_bytes().to_vec()
            }
        };

        Ok(signature)
    }
}

impl SigningAlgorithm for EcdsaAdapter {
    fn jws_algorithm_name(&self) -> String {
        format!("ES{}", self.curve.hash_size())
    }

    fn export_public_jwk(&self) -> Jwk {
        Jwk::ec(self.curve, &self.x, &self.y)
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.sign_raw(data)?)
    }

    fn generate_csr(&self, dns_names: &[String]) -> Result<Vec<u8>> {
        csr::generate_csr(self, dns_names)
    }

    fn export_key(&self, include_private: bool) -> AlgorithmKey {
        let d = if include_private {
            match &self.key {
                CurveSigningKey::P256(key) => key.to_bytes().to_vec(),
                CurveSigningKey::P384(key) => key.to_bytes().to_vec(),
                CurveSigningKey::P521(key) => key.to_bytes().to_vec(),
            }
        } else {
            Vec::new()
        };

        AlgorithmKey::Ec(EcKeyParams {
            hash_size: self.curve.hash_size(),
            d,
            x: self.x.clone(),
            y: self.y.clone(),
        })
    }

    fn key_type(&self) -> KeyType {
        KeyType::Ec
    }

    fn hash_size(&self) -> HashSize {
        self.curve.hash_size()
    }
}

impl RequestSigner for EcdsaAdapter {
    fn public_key_der(&self) -> Result<Document, CryptoError> {
        Ok(self.public_key_der.clone())
    }

    fn signature_algorithm(&self) -> AlgorithmIdentifierOwned {
        let oid = match self.curve.hash_size() {
            HashSize::Sha256 => ECDSA_WITH_SHA_256,
            HashSize::Sha384 => ECDSA_WITH_SHA_384,
            HashSize::Sha512 => ECDSA_WITH_SHA_512,
        };

        // The parameters of the ECDSA signature algorithms must be absent,
        // see https://datatracker.ietf.org/doc/html/rfc5758#section-3.2
        AlgorithmIdentifierOwned {
            oid,
            parameters: None,
        }
    }

    fn sign_request(&self, info: &[u8]) -> Result<Vec<u8>, CryptoError> {
        csr::ecdsa_signature_to_der(&self.sign_raw(info)?)
    }
}

impl Debug for EcdsaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaAdapter")
            .field("curve", &self.curve)
            .field("x", &self.x)
            .field("y", &self.y)
            .finish_non_exhaustive()
    }
}

fn public_parts<C>(curve: EcCurve, secret: &SecretKey<C>) -> Result<PublicParts, CryptoError>
where
    C: CurveArithmetic + AssociatedOid,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let public_key = secret.public_key();
    let point = public_key.to_encoded_point(false);

    let (Some(x), Some(y)) = (point.x(), point.y()) else {
        return PublicKeyMismatchSnafu { curve }.fail();
    };

    Ok(PublicParts {
        x: x.to_vec(),
        y: y.to_vec(),
        public_key_der: public_key
            .to_public_key_der()
            .context(EncodePublicKeySnafu)?,
    })
}

/// Left-pads a big-endian number with zeros to `len` bytes. Longer input is
/// returned unchanged and rejected when loaded.
fn left_pad(bytes: &[u8], len: usize) -> Zeroizing<Vec<u8>> {
    let mut padded = Zeroizing::new(vec![0; len.saturating_sub(bytes.len())]);
    padded.extend_from_slice(bytes);
    padded
}
