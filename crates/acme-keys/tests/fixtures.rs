//! Loads persisted keys and checks them against values computed
//! independently of this crate.
use acme_keys::{
    AlgorithmFactory, AlgorithmKey, BoxedSigningAlgorithm, Error, JwsSignerExt,
    base64::url_encode,
};
use rstest::rstest;
use sha2::Sha256;

const MESSAGE: &[u8] = b"acme-keys fixture message";
const TOKEN: &str = "abc123";

const RSA_SIGNATURE: &str = "fKvdhVkTYjbeAEC80yADjtm6VnIjEvSn_886HZgNwdx2PLGGSDUOX6jlkjYVE5yFseQXqJCKwEA7sLB56wZeQGRynyKLn7YpKYDLlJdyCAyK4gWM4OiDeGC6U9Zy8cTagjn8tmrikS35sD4-i0MpBzzu_xXsAApc-RB-hUmZhTHvuRF2b3jbqh89lGAvl2QOEncWxaHUk9KnFq7C_oNGxjm3GfV-0-a0al_4f9rbQAaBDSxy7TMaECgrQzleyNrsRwrYyjr1ReC5tngMPqpEC3nAuFuQVs9V-eaegdH3UK8KF8wQ4ia0axsk__w76LscD8FEvmeInX53gZbif5AaqQ";

fn load(json: &str) -> BoxedSigningAlgorithm {
    let params: AlgorithmKey = serde_json::from_str(json).expect("fixture must deserialize");
    AlgorithmFactory::default()
        .create_signing_key(&params)
        .expect("fixture must be loadable")
}

#[rstest]
#[case::rsa(
    include_str!("fixtures/rsa-2048.json"),
    "RS256",
    r#"{"e":"AQAB","kty":"RSA","n":"lHG621ptR6i2ILQ9Wzx3WYKvmLj-52vVV8QPhsm7HIC9DOTnJm6cbULmyJtvKSGjrW-qZhm-NQ8IqAK6OqkUKdAwQv4bXmo5UvYoDGHoFcWT5qjDNWTQ5HN7BuEHXzzy9znRquEFWYSEc0tMengrCaPJUQf6qu3UXR7cN_ZO9ceeTuJFeQ7R1CaIDdIm78QgwMSGsYYxAhO9Kt17za1YjhcCtXfuwTAyGzGRKSjqGcGWJTLKxuBw9WKM78fRVvqwAtnoAeN7ljLTrkpQLQGDLOpy15Xrf5lgjh4__WAsYshBC_KZcwvFi5K12d9vcsCtDGETHdt_HlynmCeNi31KUQ"}"#,
    "8QoSgI-aauzmc0AjoNhJWNYdY3aF8Ja8H1k74lTc8bk",
    "JnqhetFq__-DhESzs41n_-dJpWxxG2oczOaGStm4XRU"
)]
#[case::p256(
    include_str!("fixtures/ec-p256.json"),
    "ES256",
    r#"{"crv":"P-256","kty":"EC","x":"Nvm-9z_2wn7WT34MH-7nyBYfqNIZF6rTqrosPSyM2nI","y":"c3cxvNGxeIwMhpK3MvnjMSnr0oFCkuQa5PmaFq3tsxY"}"#,
    "UwJWngh9i7nCjML0CebQDHgXX-2MMGX33g5dD79nM4M",
    "y7JVFZMTEO3LhjjCP829pbkCiD_HDAkM0s7cTEG1M78"
)]
#[case::p384(
    include_str!("fixtures/ec-p384.json"),
    "ES384",
    r#"{"crv":"P-384","kty":"EC","x":"-4okeITy_AVU8O0CsXJtS4ULLd0Yvj-oXz06LJs5aIumI0-hLOMh9wAV6gY3LLiB","y":"kSfnua1MdBkO_XneXqB0n7VPJEkE9Novhpvd2IDGScHGQf4sR-LF5Hq9xbLJBwUJ"}"#,
    "41ksnbMjFNW-R2za7CbYh3_o6YppuWUp9qxFswfjhjA",
    "IFB2j51gZOabeDbDhRsVzfbL8Gft2qwKj-jzc80Aulo"
)]
#[case::p521(
    include_str!("fixtures/ec-p521.json"),
    "ES512",
    r#"{"crv":"P-521","kty":"EC","x":"AQb9n4fC1aJjvMsEw-OTaxR9QtE5lBScNRod_q1FQYfXbEqk1MUvH1u1DeLmlqy2kxiAQg9jEGPgz7GQP538eTyN","y":"ALay202GtH6nVI5902ANrFiwRyeUQGD9PU0amH7202EhUBblmRRka8hEejlIqm2Zm0PENIpgOWkUHH4FeydPWCC3"}"#,
    "lig31aCbabdmwbWLbBcA81OlBqepMCRGaE_ab6lL2vg",
    "OHeFeR_hEpdgM7ZyZLR0J_yzE4xDLx_pySgsdYTa6Jg"
)]
fn fixture_keys(
    #[case] json: &str,
    #[case] jws_algorithm_name: &str,
    #[case] jwk: &str,
    #[case] thumbprint: &str,
    #[case] key_authorization_digest: &str,
) {
    let key = load(json);

    assert_eq!(key.jws_algorithm_name(), jws_algorithm_name);
    assert_eq!(
        key.export_public_jwk().to_canonical_json().unwrap(),
        jwk
    );
    assert_eq!(url_encode(key.thumbprint::<Sha256>().unwrap()), thumbprint);
    assert_eq!(
        key.key_authorization(TOKEN).unwrap(),
        format!("{TOKEN}.{thumbprint}")
    );
    assert_eq!(
        key.key_authorization_digest(TOKEN).unwrap(),
        key_authorization_digest
    );
}

#[test]
fn rsa_signature_is_deterministic() {
    let key = load(include_str!("fixtures/rsa-2048.json"));
    assert_eq!(url_encode(key.sign(MESSAGE).unwrap()), RSA_SIGNATURE);
}

#[rstest]
#[case(include_str!("fixtures/rsa-2048.json"), true)]
#[case(include_str!("fixtures/ec-p256.json"), true)]
#[case(include_str!("fixtures/ec-p384.json"), true)]
// P-521 signatures use a random nonce
#[case(include_str!("fixtures/ec-p521.json"), false)]
fn persistence_round_trip(#[case] json: &str, #[case] deterministic: bool) {
    let key = load(json);

    let persisted = serde_json::to_string(&key.export_key(true)).unwrap();
    let restored = load(&persisted);

    assert_eq!(restored.export_public_jwk(), key.export_public_jwk());
    assert_eq!(
        restored.key_authorization(TOKEN).unwrap(),
        key.key_authorization(TOKEN).unwrap()
    );
    if deterministic {
        assert_eq!(restored.sign(MESSAGE).unwrap(), key.sign(MESSAGE).unwrap());
    }
}

#[rstest]
#[case(include_str!("fixtures/rsa-2048.json"), &["modulus", "exponent"][..])]
#[case(include_str!("fixtures/ec-p256.json"), &["x", "y"][..])]
fn public_export_omits_private_parameters(#[case] json: &str, #[case] fields: &[&str]) {
    let key = load(json);

    let exported = serde_json::to_value(key.export_key(false)).unwrap();
    let object = exported.as_object().unwrap();
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();

    let mut expected = [&["hashSize", "type"][..], fields].concat();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    let public: AlgorithmKey = serde_json::from_value(exported).unwrap();
    assert!(!public.has_private_key());
    assert!(matches!(
        AlgorithmFactory::default().create_signing_key(&public),
        Err(Error::CryptoOperationFailed { .. })
    ));
}

#[rstest]
#[case(r#"{"type":"EC","hashSize":128,"d":"","x":"","y":""}"#)]
#[case(r#"{"type":"RSA","hashSize":1,"modulus":"AQAB","exponent":"AQAB"}"#)]
fn unsupported_hash_size_is_rejected(#[case] json: &str) {
    let err = serde_json::from_str::<AlgorithmKey>(json).expect_err("hash size must be rejected");
    assert!(err.to_string().contains("unsupported hash size"));
}

#[test]
fn independently_loaded_keys_share_thumbprint() {
    let json = include_str!("fixtures/ec-p384.json");
    let thumbprints: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| load(json).thumbprint::<Sha256>().unwrap()))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(thumbprints.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn shared_key_signs_concurrently() {
    let key = load(include_str!("fixtures/ec-p256.json"));
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| assert_eq!(key.sign(MESSAGE).unwrap().len(), 64));
        }
    });
}
