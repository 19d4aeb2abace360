use hwc_core::config::Credentials;
use hwc_core::signing::canonical::{
    CanonicalHeaders, canonical_query, canonical_request, canonical_uri, sha256_hex,
    string_to_sign,
};
use hwc_core::signing::{DateHeader, Signer, SigningKey};
use hwc_core::{ErrorKind, ErrorClassifier};

use common::RedactedSecret;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HOST, HeaderValue};
use reqwest::{Body, Method, Request};
use url::Url;

fn credentials() -> Credentials {
    Credentials {
        access_key_id: "AKTEST".to_string(),
        secret_access_key: RedactedSecret::new("SKTEST"),
        region: "cn-north-1".to_string(),
        ..Credentials::default()
    }
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
}

fn projects_request() -> Request {
    let mut request = Request::new(
        Method::GET,
        Url::parse("https://iam.myhuaweicloud.com/v3/projects").unwrap(),
    );
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    request
}

/// Recompute the signature from what is on the wire.
fn recompute(request: &Request, secret: &str, region: &str, service: &str) -> (String, String) {
    let timestamp = request.headers()["x-amz-date"].to_str().unwrap().to_string();
    let date = &timestamp[..8];
    let body_hash = sha256_hex(
        request
            .body()
            .and_then(|b| b.as_bytes())
            .unwrap_or_default(),
    );
    let canonical = canonical_request(
        request.method().as_str(),
        canonical_uri(request.url()),
        canonical_query(request.url()),
        &CanonicalHeaders::from_pairs(
            request
                .headers()
                .iter()
                .filter(|(name, _)| name.as_str() != "authorization")
                .map(|(n, v)| (n.as_str().to_string(), v.to_str().unwrap().to_string())),
        ),
        &body_hash,
    );
    let scope = format!("{date}/{region}/{service}/aws4_request");
    let to_sign = string_to_sign(&timestamp, &scope, &canonical);
    let signature = SigningKey::derive(secret, date, region, service).sign(&to_sign);
    (to_sign, signature)
}

/// **VALUE**: Pins the exact signature for a known request, time and key.
///
/// **WHY THIS MATTERS**: Any drift in canonicalisation (header order, trailing newline,
/// hash of empty body) makes every call fail with 403, and self-consistency checks alone
/// would not notice.
///
/// **BUG THIS CATCHES**: Would catch any change to the bytes being signed.
#[test]
fn given_known_request_when_signed_at_fixed_time_then_signature_matches_reference() {
    // GIVEN: The IAM project listing request
    let mut request = projects_request();

    // WHEN: Signing at 2024-01-15T08:30:00Z
    let signature = Signer::default()
        .sign_at(&mut request, &credentials(), fixed_time())
        .unwrap();

    // THEN: Headers and signature match the reference computation
    assert_eq!(request.headers()["x-amz-date"], "20240115T083000Z");
    assert_eq!(request.headers()[HOST], "iam.myhuaweicloud.com");
    assert_eq!(signature.signed_headers, "content-type;host;x-amz-date");
    assert_eq!(
        signature.signature,
        "27db99340aeb77fbb72da454b0c5c11661ed6a961d2c337e0f5c6e26467bb5e8"
    );
    assert_eq!(
        request.headers()[AUTHORIZATION],
        "AWS4-HMAC-SHA256 Credential=AKTEST/20240115/cn-north-1/iam/aws4_request, \
         SignedHeaders=content-type;host;x-amz-date, \
         Signature=27db99340aeb77fbb72da454b0c5c11661ed6a961d2c337e0f5c6e26467bb5e8"
    );
}

/// **VALUE**: Pins body hashing, raw query and non-default port handling.
///
/// **BUG THIS CATCHES**: Would catch the body not being hashed, the query being sorted,
/// or the port being dropped from Host.
#[test]
fn given_post_with_body_query_and_port_when_signed_then_signature_matches_reference() {
    // GIVEN: A POST with a JSON body to a non-default port
    let mut request = Request::new(
        Method::POST,
        Url::parse("https://example.com:8443/v1/items?b=2&a=1").unwrap(),
    );
    *request.body_mut() = Some(Body::from(r#"{"name":"demo"}"#));

    // WHEN: Signing
    let signature = Signer::new("iam")
        .sign_at(&mut request, &credentials(), fixed_time())
        .unwrap();

    // THEN: Host carries the port, body bytes are still there, signature matches
    assert_eq!(request.headers()[HOST], "example.com:8443");
    assert_eq!(
        request.body().and_then(|b| b.as_bytes()),
        Some(br#"{"name":"demo"}"#.as_slice())
    );
    assert_eq!(
        signature.signature,
        "5637e7cda5f54b1f20d06daa8c2f54d48316346b40d6d86a5bdb6a8d27ef5d52"
    );
}

/// **VALUE**: Verifies two signing passes at different times both verify against the key
/// for that date, region and service.
///
/// **WHY THIS MATTERS**: A retried request is re-signed; the old signature must never be
/// reused, but both must be valid.
///
/// **BUG THIS CATCHES**: Would catch signatures cached across attempts, or a stale
/// Authorization header leaking into the second canonical request.
#[test]
fn given_same_request_when_signed_twice_then_signatures_differ_and_both_verify() {
    // GIVEN: One request signed at two instants on the same day
    let signer = Signer::default();
    let creds = credentials();
    let mut first = projects_request();
    let mut second = projects_request();
    let later = fixed_time() + chrono::Duration::seconds(5);

    // WHEN: Signing
    let sig_a = signer.sign_at(&mut first, &creds, fixed_time()).unwrap();
    // Re-sign the first request too, as a retry would.
    let sig_b = signer.sign_at(&mut second, &creds, later).unwrap();
    let sig_a_again = signer.sign_at(&mut first, &creds, later).unwrap();

    // THEN: Different signatures, each verifying with the same derived key
    assert_ne!(sig_a.signature, sig_b.signature);
    assert_eq!(sig_b, sig_a_again);
    let key = SigningKey::derive("SKTEST", "20240115", "cn-north-1", "iam");
    for request in [&first, &second] {
        let (to_sign, expected) = recompute(request, "SKTEST", "cn-north-1", "iam");
        let header = request.headers()[AUTHORIZATION].to_str().unwrap();
        let signature = header.rsplit("Signature=").next().unwrap();
        assert_eq!(signature, expected);
        assert!(key.verify(&to_sign, signature));
    }
    assert_eq!(first.headers().get_all(AUTHORIZATION).iter().count(), 1);
}

#[test]
fn given_sdk_date_header_when_signed_then_x_sdk_date_used() {
    let mut request = projects_request();

    let signature = Signer::default()
        .with_date_header(DateHeader::Sdk)
        .sign_at(&mut request, &credentials(), fixed_time())
        .unwrap();

    assert!(request.headers().get("x-amz-date").is_none());
    assert_eq!(request.headers()["x-sdk-date"], "20240115T083000Z");
    assert_eq!(signature.signed_headers, "content-type;host;x-sdk-date");
}

/// **VALUE**: Verifies a header value that cannot be carried surfaces as a classified
/// validation error rather than a panic.
#[test]
fn given_access_key_with_newline_when_signed_then_validation_error() {
    let mut request = projects_request();
    let creds = Credentials {
        access_key_id: "AK\nINJECT".to_string(),
        ..credentials()
    };

    let error = Signer::default().sign(&mut request, &creds).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(!ErrorClassifier::classify(None, None, Some(error)).is_retryable());
}

/// **VALUE**: Verifies a header whose bytes are not UTF-8 is rejected instead of being
/// signed over a lossy copy.
///
/// **WHY THIS MATTERS**: The server canonicalises the raw bytes it received. Signing
/// replacement characters produces a signature that can never match.
///
/// **BUG THIS CATCHES**: Would catch `from_utf8_lossy` creeping back into header
/// canonicalisation and the request going out with a guaranteed-bad signature.
#[test]
fn given_non_utf8_header_value_when_signed_then_validation_error_and_unsigned() {
    // GIVEN: A request carrying a Latin-1 encoded header value
    let mut request = projects_request();
    request
        .headers_mut()
        .insert("x-project-name", HeaderValue::from_bytes(b"caf\xe9").unwrap());

    // WHEN: Signing
    let error = Signer::default()
        .sign_at(&mut request, &credentials(), fixed_time())
        .unwrap_err();

    // THEN: Validation error naming the header, and no Authorization attached
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(error.to_string().contains("x-project-name"), "{error}");
    assert!(request.headers().get(AUTHORIZATION).is_none());
}
