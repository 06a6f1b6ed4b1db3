//! `SerpChain` provider ordering, error surfacing and memoization.

use std::time::Duration;

use seolens_core::{Device, Locale, SerpFeatureType, SerpProvider};
use seolens_providers::{HttpSettings, ProviderError, SerpChain, SerpClient, SerpRequest};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_http() -> HttpSettings {
    HttpSettings {
        timeout_secs: 5,
        max_retries: 0,
        retry_backoff_ms: 0,
        ..HttpSettings::default()
    }
}

fn serp_body() -> serde_json::Value {
    serde_json::json!({
        "search_information": { "total_results": 42_000 },
        "organic_results": [
            { "position": 1, "title": "Top SEO tools", "link": "https://www.ahrefs.com/seo-tools", "snippet": "Free tools." },
            { "position": 2, "title": "SEO tools list", "link": "https://backlinko.com/seo-tools" }
        ],
        "related_questions": [{ "question": "What are SEO tools?" }]
    })
}

fn client(provider: SerpProvider, server: &MockServer) -> SerpClient {
    SerpClient::with_base_url(provider, "key", fast_http(), &server.uri())
        .expect("client construction should not fail")
}

fn request() -> SerpRequest {
    SerpRequest::new("seo tools", Locale::default())
}

#[tokio::test]
async fn serpapi_result_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google"))
        .and(query_param("q", "seo tools"))
        .and(query_param("gl", "us"))
        .and(query_param("device", "desktop"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body()))
        .mount(&server)
        .await;

    let chain = SerpChain::new(Duration::from_secs(60))
        .with_provider(client(SerpProvider::Serpapi, &server));
    let analysis = chain.analyze(&request()).await.expect("SERP should parse");

    assert_eq!(analysis.provider, SerpProvider::Serpapi);
    assert_eq!(analysis.total_results, 42_000);
    assert_eq!(analysis.organic_results.len(), 2);
    assert_eq!(analysis.organic_results[0].domain, "ahrefs.com");
    assert_eq!(analysis.features[0].feature_type, SerpFeatureType::PeopleAlsoAsk);
    assert!(!analysis.cached);
}

#[tokio::test]
async fn failing_serpapi_falls_through_to_valueserp() {
    let serpapi = MockServer::start().await;
    let valueserp = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&serpapi)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body()))
        .mount(&valueserp)
        .await;

    let chain = SerpChain::new(Duration::from_secs(60))
        .with_provider(client(SerpProvider::Serpapi, &serpapi))
        .with_provider(client(SerpProvider::Valueserp, &valueserp));
    let analysis = chain.analyze(&request()).await.expect("ValueSERP should answer");

    assert_eq!(analysis.provider, SerpProvider::Valueserp);
    assert_eq!(analysis.organic_results.len(), 2);
}

#[tokio::test]
async fn all_providers_failing_surfaces_last_error() {
    let serpapi = MockServer::start().await;
    let valueserp = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&serpapi)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&valueserp)
        .await;

    let chain = SerpChain::new(Duration::from_secs(60))
        .with_provider(client(SerpProvider::Serpapi, &serpapi))
        .with_provider(client(SerpProvider::Valueserp, &valueserp));
    let err = chain.analyze(&request()).await.unwrap_err();

    assert!(
        matches!(
            err,
            ProviderError::CredentialsMissing {
                provider: "valueserp"
            }
        ),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_a_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let chain = SerpChain::new(Duration::from_secs(60))
        .with_provider(client(SerpProvider::Serpapi, &server));
    let err = chain.analyze(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::RequestFailed {
            transient: false,
            ..
        }
    ));
}

#[tokio::test]
async fn cache_hit_is_flagged_and_device_is_part_of_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serp_body()))
        .expect(2)
        .mount(&server)
        .await;

    let chain = SerpChain::new(Duration::from_secs(60))
        .with_provider(client(SerpProvider::Serpapi, &server));

    let first = chain.analyze(&request()).await.unwrap();
    let second = chain.analyze(&request()).await.unwrap();
    let mobile = chain
        .analyze(&request().device(Device::Mobile))
        .await
        .unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.organic_results, second.organic_results);
    assert!(!mobile.cached);
}

#[tokio::test]
async fn smaller_cached_result_is_not_served_to_larger_request() {
    let organic: Vec<serde_json::Value> = (1..=10)
        .map(|i| {
            serde_json::json!({
                "position": i,
                "title": format!("Result {i}"),
                "link": format!("https://site{i}.example.com/seo")
            })
        })
        .collect();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "organic_results": organic })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let chain = SerpChain::new(Duration::from_secs(60))
        .with_provider(client(SerpProvider::Serpapi, &server));

    let small = chain.analyze(&request().num_results(3)).await.unwrap();
    let large = chain.analyze(&request().num_results(10)).await.unwrap();

    assert_eq!(small.organic_results.len(), 3);
    assert_eq!(large.organic_results.len(), 10);
    assert!(!large.cached);
}
