use hwc_core::ErrorKind;
use hwc_core::config::Credentials;
use hwc_core::project_id::IamClient;

use common::RedactedSecret;

use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials(region: &str) -> Credentials {
    Credentials {
        access_key_id: "AK".to_string(),
        secret_access_key: RedactedSecret::new("SK"),
        region: region.to_string(),
        domain_id: "domain-1".to_string(),
        ..Credentials::default()
    }
}

/// **VALUE**: Verifies the listing call is a signed JSON GET against `/v3/projects`.
///
/// **WHY THIS MATTERS**: IAM rejects unsigned requests with 401, which would silently
/// degrade every lookup to `"0"`.
///
/// **BUG THIS CATCHES**: Would catch the signer not being applied or the wrong path.
#[tokio::test]
async fn given_iam_server_when_listing_projects_then_request_is_signed_get() {
    // GIVEN: A server that only answers signed JSON GETs
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .and(header("content-type", "application/json"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [
                {"id": "p-1", "name": "cn-north-4", "description": "", "domain_id": "domain-1", "enabled": true}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    // WHEN: Listing
    let projects = client.list_projects(&credentials("cn-north-4")).await.unwrap();

    // THEN: Parsed
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "p-1");
    assert!(projects[0].enabled);

    let received = server.received_requests().await.unwrap();
    let authorization = received[0].headers["authorization"].to_str().unwrap();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AK/"));
    assert!(authorization.contains("/cn-north-4/iam/aws4_request"));
}

/// **VALUE**: Verifies only enabled projects whose name equals the region are picked.
///
/// **BUG THIS CATCHES**: Would catch picking the first project, or a disabled one.
#[tokio::test]
async fn given_several_projects_when_looked_up_then_first_enabled_region_match_wins() {
    // GIVEN: A disabled match, a non-match and an enabled match
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [
                {"id": "p-disabled", "name": "cn-north-4", "enabled": false},
                {"id": "p-other", "name": "cn-east-3", "enabled": true},
                {"id": "p-match", "name": "cn-north-4", "enabled": true},
                {"id": "p-late", "name": "cn-north-4", "enabled": true}
            ]
        })))
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    // WHEN: Looking up by region
    let id = client
        .project_id_for_region(&credentials("cn-north-4"))
        .await
        .unwrap();

    // THEN: First enabled match
    assert_eq!(id, "p-match");
}

#[tokio::test]
async fn given_no_matching_project_when_looked_up_then_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"projects": []})))
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    let error = client
        .project_id_for_region(&credentials("cn-north-4"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(!error.is_retryable());
}

/// **VALUE**: Verifies error responses are classified and carry the request id.
///
/// **WHY THIS MATTERS**: The request id is what support asks for first.
///
/// **BUG THIS CATCHES**: Would catch the `X-Request-Id` header being dropped, or the body
/// pattern not being consulted.
#[tokio::test]
async fn given_error_response_when_listing_then_classified_with_request_id() {
    // GIVEN: A 403 with a Forbidden body and a request id
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-Request-Id", "req-42")
                .set_body_string(r#"{"error":{"message":"Forbidden"}}"#),
        )
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    // WHEN: Listing
    let error = client
        .list_projects(&credentials("cn-north-4"))
        .await
        .unwrap_err();

    // THEN: Permission error with request id
    assert_eq!(error.kind(), ErrorKind::Permission);
    assert_eq!(error.request_id(), Some("req-42"));
    assert!(error.to_string().contains("(RequestID: req-42)"));
}

#[tokio::test]
async fn given_server_error_when_listing_then_retryable_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    let error = client
        .list_projects(&credentials("cn-north-4"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Server);
    assert!(error.is_retryable());
}

/// **VALUE**: Verifies a region project listed without an id is never chosen.
///
/// **BUG THIS CATCHES**: Would catch an empty id being returned as the project id
/// instead of moving on to the next matching project.
#[tokio::test]
async fn given_region_project_without_id_when_resolving_then_next_match_used() {
    // GIVEN: Two enabled projects for the region, the first with an empty id
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [
                {"id": "", "name": "cn-north-4", "enabled": true},
                {"id": "p-2", "name": "cn-north-4", "enabled": true}
            ]
        })))
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    // WHEN: Resolving the region's project
    let project_id = client
        .project_id_for_region(&credentials("cn-north-4"))
        .await
        .unwrap();

    // THEN: The project with an id wins
    assert_eq!(project_id, "p-2");
}

#[tokio::test]
async fn given_only_region_project_without_id_when_resolving_then_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"id": "", "name": "cn-north-4", "enabled": true}]
        })))
        .mount(&server)
        .await;
    let client = IamClient::new(&server.uri()).unwrap();

    let error = client
        .project_id_for_region(&credentials("cn-north-4"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(!error.is_retryable());
}

#[test]
fn given_invalid_endpoint_when_client_built_then_validation_error() {
    let error = IamClient::new("not a url").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Validation);
}
