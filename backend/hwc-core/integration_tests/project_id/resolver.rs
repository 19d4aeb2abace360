use hwc_core::config::Credentials;
use hwc_core::error::ProjectIdError;
use hwc_core::project_id::IamClient;
use hwc_core::{EffectiveConfig, ProjectIdResolver};

use common::RedactedSecret;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(project_id: &str, enterprise_project_id: &str, can_query: bool) -> EffectiveConfig {
    let mut credentials = Credentials {
        region: "cn-north-4".to_string(),
        project_id: project_id.to_string(),
        enterprise_project_id: enterprise_project_id.to_string(),
        ..Credentials::default()
    };
    if can_query {
        credentials.access_key_id = "AK".to_string();
        credentials.secret_access_key = RedactedSecret::new("SK");
        credentials.domain_id = "domain-1".to_string();
    }
    EffectiveConfig {
        credentials,
        ..EffectiveConfig::default()
    }
}

fn projects_body(id: &str) -> serde_json::Value {
    json!({"projects": [{"id": id, "name": "cn-north-4", "domain_id": "domain-1", "enabled": true}]})
}

async fn resolver_with_server(server: &MockServer) -> ProjectIdResolver {
    ProjectIdResolver::with_iam_client(IamClient::new(&server.uri()).unwrap())
}

/// **VALUE**: Verifies the resolution priority: project id, enterprise id, sentinel.
///
/// **WHY THIS MATTERS**: These ids scope every tenant-aware request. Picking the
/// enterprise id over an explicit project id sends calls to the wrong tenant.
///
/// **BUG THIS CATCHES**: Would catch swapped branches or the `"0"` sentinel being
/// treated as a real enterprise project.
#[tokio::test]
async fn given_local_configurations_when_resolved_then_priority_respected() {
    // GIVEN: Configurations exercising each local branch
    let cases = [
        (config("p1", "e1", false), "p1"),
        (config("", "e1", false), "e1"),
        (config("", "0", false), "0"),
        (config("", "", false), "0"),
    ];

    for (config, expected) in cases {
        // WHEN: Resolving on a fresh instance
        let resolver = ProjectIdResolver::new();
        resolver.init_with_config(&config);
        let resolved = resolver.project_id().await.unwrap();

        // THEN: Expected id, cached
        assert_eq!(resolved, expected);
        assert!(resolver.is_loaded());
        assert_eq!(resolver.cached_project_id(), expected);
    }
}

#[tokio::test]
async fn given_uninitialised_resolver_when_resolved_then_not_initialized_error() {
    let resolver = ProjectIdResolver::new();

    let result = resolver.project_id().await;

    assert!(matches!(result, Err(ProjectIdError::NotInitialized { .. })));
    assert!(!resolver.is_loaded());
    assert_eq!(resolver.cached_project_id(), "");
}

/// **VALUE**: Verifies the remote lookup is used when nothing local applies.
///
/// **BUG THIS CATCHES**: Would catch the lookup being skipped when all three credentials
/// are present, or run again once the value is cached.
#[tokio::test]
async fn given_full_credentials_when_resolved_then_remote_lookup_cached() {
    // GIVEN: IAM returning a project for the region
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_body("remote-1")))
        .expect(1)
        .mount(&server)
        .await;
    let resolver = resolver_with_server(&server).await;
    resolver.init_with_config(&config("", "0", true));

    // WHEN: Resolving twice
    let first = resolver.project_id().await.unwrap();
    let second = resolver.project_id().await.unwrap();

    // THEN: Remote value, fetched once
    assert_eq!(first, "remote-1");
    assert_eq!(second, "remote-1");
}

/// **VALUE**: Verifies lookup failures degrade to `"0"` instead of erroring.
///
/// **WHY THIS MATTERS**: A broken IAM endpoint must not block unrelated commands.
#[tokio::test]
async fn given_failing_lookup_when_resolved_then_sentinel_returned() {
    // GIVEN: IAM answering 401
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let resolver = resolver_with_server(&server).await;
    let mut config = config("", "0", true);
    config.enable_retry = true;
    config.max_retries = 3;
    resolver.init_with_config(&config);

    // WHEN: Resolving
    let resolved = resolver.project_id().await.unwrap();

    // THEN: Sentinel, and the auth failure was not retried
    assert_eq!(resolved, "0");
    assert!(resolver.is_loaded());
}

/// **VALUE**: Verifies an IAM project without an id resolves to `"0"`, not `""`.
///
/// **WHY THIS MATTERS**: An empty cached id would be sent as the tenant scope of every
/// later request and never replaced until a refresh.
///
/// **BUG THIS CATCHES**: Would catch the resolver caching whatever IAM returned for the
/// region without checking it is usable.
#[tokio::test]
async fn given_iam_project_with_empty_id_when_resolved_then_sentinel_cached() {
    // GIVEN: IAM listing the region's project with an empty id
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"id": "", "name": "cn-north-4", "enabled": true}]
        })))
        .mount(&server)
        .await;
    let resolver = resolver_with_server(&server).await;
    resolver.init_with_config(&config("", "0", true));

    // WHEN: Resolving
    let resolved = resolver.project_id().await.unwrap();

    // THEN: The sentinel is returned and cached
    assert_eq!(resolved, "0");
    assert!(resolver.is_loaded());
    assert_eq!(resolver.cached_project_id(), "0");
}

/// **VALUE**: Verifies transient lookup failures are retried per the configured budget.
///
/// **BUG THIS CATCHES**: Would catch the lookup bypassing the retry engine.
#[tokio::test]
async fn given_transient_lookup_failure_when_retry_enabled_then_second_attempt_succeeds() {
    // GIVEN: One 503 followed by success, and one retry allowed
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_body("after-retry")))
        .mount(&server)
        .await;
    let resolver = resolver_with_server(&server).await;
    let mut config = config("", "0", true);
    config.enable_retry = true;
    config.max_retries = 1;
    resolver.init_with_config(&config);

    // WHEN: Resolving
    let resolved = resolver.project_id().await.unwrap();

    // THEN: Second attempt's value
    assert_eq!(resolved, "after-retry");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

/// **VALUE**: Verifies concurrent first callers all observe one value.
///
/// **WHY THIS MATTERS**: Several signed calls start in parallel; mixing project ids
/// between them would scatter resources across tenants.
///
/// **BUG THIS CATCHES**: Would catch a later fetch overwriting an already published value.
/// The number of remote fetches is deliberately not asserted.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_ten_concurrent_callers_when_resolved_then_all_see_same_value() {
    // GIVEN: A slow IAM endpoint
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(projects_body("shared-1"))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    let resolver = Arc::new(resolver_with_server(&server).await);
    resolver.init_with_config(&config("", "0", true));

    // WHEN: Ten tasks resolve at once
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.project_id().await })
        })
        .collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    // THEN: Identical values, matching the cache
    assert!(results.iter().all(|id| id == "shared-1"), "{results:?}");
    assert_eq!(resolver.cached_project_id(), "shared-1");
}

/// **VALUE**: Verifies refresh drops the cache and fetches again.
///
/// **BUG THIS CATCHES**: Would catch refresh returning the stale cached value.
#[tokio::test]
async fn given_loaded_value_when_refreshed_then_new_remote_value_cached() {
    // GIVEN: IAM answering "old" once, then "new"
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_body("old")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(projects_body("new")))
        .mount(&server)
        .await;
    let resolver = resolver_with_server(&server).await;
    resolver.init_with_config(&config("", "0", true));
    assert_eq!(resolver.project_id().await.unwrap(), "old");

    // WHEN: Refreshing
    let refreshed = resolver.refresh_project_id().await.unwrap();

    // THEN: New value is cached
    assert_eq!(refreshed, "new");
    assert_eq!(resolver.cached_project_id(), "new");
}

/// **VALUE**: Verifies a lookup started under an old configuration is never published
/// after a re-init.
///
/// **WHY THIS MATTERS**: The IAM call runs without the lock. Without a generation check,
/// a slow response for old credentials would overwrite the new configuration's id.
///
/// **BUG THIS CATCHES**: Would catch `publish` committing unconditionally.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_reinit_during_lookup_when_lookup_completes_then_stale_value_discarded() {
    // GIVEN: A slow IAM endpoint and a lookup in flight
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(projects_body("stale"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let resolver = Arc::new(resolver_with_server(&server).await);
    resolver.init_with_config(&config("", "0", true));
    let in_flight = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.project_id().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    // WHEN: Re-initialising with a local project id while the lookup runs
    resolver.init_with_config(&config("fresh", "0", false));
    let resolved = in_flight.await.unwrap().unwrap();

    // THEN: The in-flight caller gets the new configuration's id
    assert_eq!(resolved, "fresh");
    assert_eq!(resolver.cached_project_id(), "fresh");
}
