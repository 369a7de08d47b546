//! Implementations of [`SigningAlgorithm`](crate::SigningAlgorithm) for the
//! supported algorithm families.
//!
//! ## RSA
//!
//! [`RsaAdapter`](rsa::RsaAdapter) signs using RSASSA-PKCS1-v1_5 and is
//! backed by the [`rsa`](::rsa) crate. It should be noted, that the crate is
//! currently vulnerable to the Marvin attack. This only affects decryption,
//! which is never done with ACME keys. See:
//!
//! - <https://people.redhat.com/~hkario/marvin/>
//! - <https://rustsec.org/advisories/RUSTSEC-2023-0071.html>
//!
//! ## ECDSA
//!
//! [`EcdsaAdapter`](ecdsa::EcdsaAdapter) supports the NIST curves P-256,
//! P-384 and P-521 through the [`p256`], [`p384`] and [`p521`] crates.
pub mod ecdsa;
pub mod rsa;
