// Unit tests for canonical request building
// Focus: header normalisation is order- and case-insensitive

use crate::signing::canonical::{
    CanonicalHeaders, canonical_query, canonical_request, canonical_uri, credential_scope,
    sha256_hex, string_to_sign,
};

use url::Url;

/// **VALUE**: Verifies canonical headers do not depend on input order.
///
/// **WHY THIS MATTERS**: `HeaderMap` iteration order is an implementation detail. If the
/// canonical form followed it, the same request could sign differently on a retry.
///
/// **BUG THIS CATCHES**: Would catch replacing the `BTreeMap` with a `HashMap` or `Vec`.
#[test]
fn given_reordered_headers_when_canonicalised_then_output_identical() {
    // GIVEN: The same headers in two orders
    let forward = CanonicalHeaders::from_pairs([
        ("host", "iam.example.com"),
        ("content-type", "application/json"),
        ("x-amz-date", "20240115T083000Z"),
    ]);
    let reverse = CanonicalHeaders::from_pairs([
        ("x-amz-date", "20240115T083000Z"),
        ("content-type", "application/json"),
        ("host", "iam.example.com"),
    ]);

    // THEN: Canonical text and signed header list are identical
    assert_eq!(forward.canonical(), reverse.canonical());
    assert_eq!(forward.signed_headers(), "content-type;host;x-amz-date");
    assert_eq!(reverse.signed_headers(), "content-type;host;x-amz-date");
}

/// **VALUE**: Verifies header names are lower-cased.
///
/// **BUG THIS CATCHES**: Would catch `Content-Type` and `content-type` being treated as
/// two headers, which changes the signed header list.
#[test]
fn given_mixed_case_names_when_canonicalised_then_names_lowercased() {
    // GIVEN: Mixed-case header names
    let upper = CanonicalHeaders::from_pairs([("Content-Type", "a"), ("HOST", "h")]);
    let lower = CanonicalHeaders::from_pairs([("content-type", "a"), ("host", "h")]);

    // THEN: Identical canonical forms
    assert_eq!(upper, lower);
    assert_eq!(upper.canonical(), "content-type:a\nhost:h\n");
}

/// **VALUE**: Verifies repeated header values are joined with a comma, in order.
///
/// **BUG THIS CATCHES**: Would catch only the last value being kept.
#[test]
fn given_repeated_header_when_canonicalised_then_values_comma_joined() {
    // GIVEN: A header that appears twice
    let headers = CanonicalHeaders::from_pairs([("x-tag", "one"), ("X-Tag", "two")]);

    // THEN: Values joined
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.canonical(), "x-tag:one,two\n");
}

#[test]
fn given_url_without_path_when_canonical_uri_then_slash() {
    let url = Url::parse("https://iam.example.com").unwrap();

    assert_eq!(canonical_uri(&url), "/");
    assert_eq!(canonical_query(&url), "");
}

/// **VALUE**: Verifies the query string is passed through raw, not re-sorted.
///
/// **WHY THIS MATTERS**: The server side canonicalises the raw query. Sorting here would
/// change the signed bytes.
#[test]
fn given_unsorted_query_when_canonicalised_then_kept_as_is() {
    // GIVEN: A URL with an unsorted, escaped query
    let url = Url::parse("https://cdn.example.com/v1/a%20b?z=1&a=2").unwrap();

    // THEN: Path stays escaped and query is untouched
    assert_eq!(canonical_uri(&url), "/v1/a%20b");
    assert_eq!(canonical_query(&url), "z=1&a=2");
}

/// **VALUE**: Verifies the overall layout of canonical request and string-to-sign.
///
/// **BUG THIS CATCHES**: Would catch a missing newline between the canonical headers block
/// and the signed header list (the headers block already ends in `\n`).
#[test]
fn given_parts_when_canonical_request_built_then_layout_matches() {
    // GIVEN: Canonical parts
    let headers = CanonicalHeaders::from_pairs([("host", "h")]);
    let empty_hash = sha256_hex(b"");

    // WHEN: Building the canonical request and string to sign
    let request = canonical_request("GET", "/", "", &headers, &empty_hash);
    let scope = credential_scope("20240115", "cn-north-1", "iam");
    let to_sign = string_to_sign("20240115T083000Z", &scope, &request);

    // THEN: Layout is exact
    assert_eq!(
        empty_hash,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(request, format!("GET\n/\n\nhost:h\n\nhost\n{empty_hash}"));
    assert_eq!(scope, "20240115/cn-north-1/iam/aws4_request");
    assert!(to_sign.starts_with("AWS4-HMAC-SHA256\n20240115T083000Z\n20240115/cn-north-1/iam/aws4_request\n"));
    assert_eq!(to_sign.lines().last().unwrap(), sha256_hex(request.as_bytes()));
}
