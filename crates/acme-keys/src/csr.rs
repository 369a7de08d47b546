//! PKCS#10 certificate signing request generation shared by all signing
//! algorithms.
//!
//! The request itself is assembled and DER-encoded by [`x509_cert`]. The
//! adapters only provide their public key, the signature algorithm
//! identifier and the raw signing operation through [`RequestSigner`].
use const_oid::db::rfc4519::CN;
use der::{
    Encode, Sequence, Tag,
    asn1::{Any, SetOfVec, UintRef},
};
use signature::{Keypair, Signer};
use snafu::{OptionExt, ResultExt};
use tracing::{debug, instrument};
use x509_cert::{
    attr::AttributeTypeAndValue,
    builder::{Builder, RequestBuilder},
    der::asn1::{BitString, Ia5String},
    ext::pkix::{SubjectAltName, name::GeneralName},
    name::{Name, RdnSequence, RelativeDistinguishedName},
    spki::{
        AlgorithmIdentifierOwned, Document, DynSignatureAlgorithmIdentifier, EncodePublicKey,
        SignatureBitStringEncoding,
    },
};

use crate::{
    AddRequestExtensionSnafu, BuildRequestSnafu, CreateRequestBuilderSnafu, CryptoError,
    EncodeEcdsaSignatureSnafu, EncodeRequestSnafu, EncodeSubjectSnafu, InvalidArgumentSnafu,
    ParseSubjectAlternativeDnsNameSnafu, Result,
};

/// The parts of a signing key needed to sign a certificate signing request.
pub(crate) trait RequestSigner {
    /// The DER-encoded SubjectPublicKeyInfo of the key.
    fn public_key_der(&self) -> Result<Document, CryptoError>;

    /// The X.509 signature algorithm, for example `sha256WithRSAEncryption`.
    fn signature_algorithm(&self) -> AlgorithmIdentifierOwned;

    /// Signs the DER-encoded `CertificationRequestInfo`. The returned bytes
    /// are placed into the signature BIT STRING as is.
    fn sign_request(&self, info: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Builds and signs a certificate signing request for `dns_names`.
///
/// The first DNS name is used as the common name of the subject. All names,
/// including the first one, are added to the subject alternative name
/// extension in the given order.
#[instrument(name = "generate_csr", skip(key))]
pub(crate) fn generate_csr<K>(key: &K, dns_names: &[String]) -> Result<Vec<u8>>
where
    K: RequestSigner + ?Sized,
{
    let common_name = dns_names.first().context(InvalidArgumentSnafu {
        argument: "dns_names",
        reason: "at least one DNS name is required",
    })?;

    let subject = common_name_subject(common_name)?;

    let sans = dns_names
        .iter()
        .map(|dns_name| {
            Ok(GeneralName::DnsName(Ia5String::new(dns_name).context(
                ParseSubjectAlternativeDnsNameSnafu { dns_name },
            )?))
        })
        .collect::<Result<Vec<_>, CryptoError>>()?;

    let request_key = RequestKey {
        key,
        public_key: PublicKeyDocument(key.public_key_der()?),
    };

    debug!(
        csr.subject = %subject,
        csr.san.dns_names = ?dns_names,
        csr.signature_algorithm = %request_key.key.signature_algorithm().oid,
        "creating and signing certificate signing request"
    );

    let mut builder =
        RequestBuilder::new(subject, &request_key).context(CreateRequestBuilderSnafu)?;
    builder
        .add_extension(&SubjectAltName(sans))
        .context(AddRequestExtensionSnafu)?;

    let request = builder
        .build::<RequestSignature>()
        .context(BuildRequestSnafu)?;

    Ok(request.to_der().context(EncodeRequestSnafu)?)
}

/// Builds a subject holding exactly one relative distinguished name with the
/// common name `common_name`. The name is stored as is, so characters which
/// have a meaning in the RFC 4514 string form (like `,` or `+`) never add
/// further attributes.
fn common_name_subject(common_name: &str) -> Result<Name, CryptoError> {
    let value = Any::new(Tag::Utf8String, common_name.as_bytes())
        .context(EncodeSubjectSnafu { common_name })?;
    let attribute = AttributeTypeAndValue { oid: CN, value };
    let rdn = SetOfVec::try_from(vec![attribute]).context(EncodeSubjectSnafu { common_name })?;

    Ok(RdnSequence(vec![RelativeDistinguishedName(rdn)]))
}

/// Converts a fixed-length `r || s` ECDSA signature into the DER-encoded
/// `ECDSA-Sig-Value` structure X.509 expects, see
/// <https://datatracker.ietf.org/doc/html/rfc3279#section-2.2.3>.
pub(crate) fn ecdsa_signature_to_der(raw: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (r, s) = raw.split_at(raw.len() / 2);

    EcdsaSigValue {
        r: UintRef::new(r).context(EncodeEcdsaSignatureSnafu)?,
        s: UintRef::new(s).context(EncodeEcdsaSignatureSnafu)?,
    }
    .to_der()
    .context(EncodeEcdsaSignatureSnafu)
}

#[derive(Sequence)]
struct EcdsaSigValue<'a> {
    r: UintRef<'a>,
    s: UintRef<'a>,
}

/// Adapts a [`RequestSigner`] to the traits required by [`RequestBuilder`].
struct RequestKey<'a, K: ?Sized> {
    key: &'a K,
    public_key: PublicKeyDocument,
}

#[derive(Clone)]
struct PublicKeyDocument(Document);

impl EncodePublicKey for PublicKeyDocument {
    fn to_public_key_der(&self) -> x509_cert::spki::Result<Document> {
        Ok(self.0.clone())
    }
}

struct RequestSignature(Vec<u8>);

impl SignatureBitStringEncoding for RequestSignature {
    fn to_bitstring(&self) -> der::Result<BitString> {
        BitString::from_bytes(&self.0)
    }
}

impl<K> Keypair for RequestKey<'_, K>
where
    K: RequestSigner + ?Sized,
{
    type VerifyingKey = PublicKeyDocument;

    fn verifying_key(&self) -> Self::VerifyingKey {
        self.public_key.clone()
    }
}

impl<K> DynSignatureAlgorithmIdentifier for RequestKey<'_, K>
where
    K: RequestSigner + ?Sized,
{
    fn signature_algorithm_identifier(&self) -> x509_cert::spki::Result<AlgorithmIdentifierOwned> {
        Ok(self.key.signature_algorithm())
    }
}

impl<K> Signer<RequestSignature> for RequestKey<'_, K>
where
    K: RequestSigner + ?Sized,
{
    fn try_sign(&self, msg: &[u8]) -> Result<RequestSignature, signature::Error> {
        self.key
            .sign_request(msg)
            .map(RequestSignature)
            .map_err(signature::Error::from_source)
    }
}

#[cfg(test)]
mod tests {
    use der::Tagged;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(&[0x00, 0x01, 0x80, 0x00], &[0x30, 0x08, 0x02, 0x01, 0x01, 0x02, 0x03, 0x00, 0x80, 0x00])]
    #[case(&[0x7f, 0x7e], &[0x30, 0x06, 0x02, 0x01, 0x7f, 0x02, 0x01, 0x7e])]
    fn ecdsa_signature_der_encoding(#[case] raw: &[u8], #[case] expected: &[u8]) {
        assert_eq!(ecdsa_signature_to_der(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("example.com")]
    #[case("x.example.com,O=Evil Corp")]
    #[case("a+b=c.example.com")]
    fn subject_holds_single_common_name(#[case] common_name: &str) {
        let subject = common_name_subject(common_name).unwrap();

        assert_eq!(subject.0.len(), 1);
        let attributes = subject.0[0].0.as_slice();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].oid, CN);
        assert_eq!(attributes[0].value.tag(), Tag::Utf8String);
        assert_eq!(attributes[0].value.value(), common_name.as_bytes());
    }
}
