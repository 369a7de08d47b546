//! URL-safe Base64 encoding as prescribed in [RFC 7515 Appendix C][rfc].
//!
//! [rfc]: https://datatracker.ietf.org/doc/html/rfc7515#appendix-C
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};

/// Encodes `raw` using the URL-safe alphabet without any trailing `=`
/// padding characters.
pub fn url_encode(raw: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}

/// Encodes the UTF-8 bytes of `raw`, see [`url_encode`].
pub fn url_encode_str(raw: &str) -> String {
    url_encode(raw.as_bytes())
}

/// (De)serializes byte buffers of persisted key parameters as standard,
/// padded Base64 strings.
pub(crate) mod standard {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        super::STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
