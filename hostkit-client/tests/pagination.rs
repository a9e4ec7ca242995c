//! Integration tests for cursor pagination over HTTP.

use std::time::Duration;

use futures_util::StreamExt;
use hostkit_client::filters::{PropertyFilter, ReservationFilter};
use hostkit_client::{ApiError, FallbackConfig, HostkitClient, RetryOptions, collect_all};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn client(server: &MockServer) -> HostkitClient {
    HostkitClient::builder()
        .base_url(server.uri())
        .access_token("pat-123")
        .fallback(FallbackConfig::None)
        .retry(
            RetryOptions::default()
                .with_max_attempts(2)
                .with_base_delay(Duration::from_millis(1)),
        )
        .build()
        .unwrap()
}

fn property(id: &str) -> serde_json::Value {
    json!({ "id": id, "name": format!("Property {}", id) })
}

fn page(items: Vec<serde_json::Value>, next_cursor: Option<&str>) -> serde_json::Value {
    json!({
        "data": items,
        "meta": { "nextCursor": next_cursor, "total": 4, "perPage": 100 }
    })
}

#[tokio::test]
async fn test_streams_all_pages_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .and(query_param("cursor", "cursor-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![property("c"), property("d")], None)),
        )
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .and(query_param("pageSize", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![property("a"), property("b")], Some("cursor-1"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let properties = collect_all(client.properties(&PropertyFilter::new()))
        .await
        .unwrap();

    let ids: Vec<_> = properties.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_empty_collection_single_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reservations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let reservations = collect_all(client.reservations(&ReservationFilter::new()))
        .await
        .unwrap();

    assert!(reservations.is_empty());
}

#[tokio::test]
async fn test_filter_params_sent_with_every_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .and(query_param("status", "active"))
        .and(query_param("city", "Lisbon"))
        .and(query_param("cursor", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![property("b")], None)))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .and(query_param("status", "active"))
        .and(query_param("city", "Lisbon"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![property("a")], Some("next"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let filter = PropertyFilter::new().with_status("active").with_city("Lisbon");
    let properties = collect_all(client.properties(&filter)).await.unwrap();

    assert_eq!(properties.len(), 2);
}

#[tokio::test]
async fn test_mid_stream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .and(query_param("cursor", "cursor-1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![property("a"), property("b")], Some("cursor-1"))),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    let mut stream = Box::pin(client.properties(&PropertyFilter::new()));
    assert_eq!(stream.next().await.unwrap().unwrap().id, "a");
    assert_eq!(stream.next().await.unwrap().unwrap().id, "b");

    let err = stream.next().await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(stream.next().await.is_none());

    // Collecting the same traversal fails as a whole.
    let result = collect_all(client.properties(&PropertyFilter::new())).await;
    assert!(matches!(result, Err(ApiError::Http { status: 403, .. })));
}

#[tokio::test]
async fn test_list_page_returns_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("minRating", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "rev_1", "propertyId": "prop_1", "rating": 4.5 }],
            "meta": { "nextCursor": "more", "total": 12, "perPage": 100 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let filter = hostkit_client::filters::ReviewFilter::new().with_min_rating(4);
    let page = client.list_reviews(&filter).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].rating, Some(4.5));
    assert_eq!(page.meta.total, 12);
    assert!(page.has_more());
}

#[tokio::test]
async fn test_message_thread_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reservations/res_1/messages"))
        .and(query_param("cursor", "m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "msg_2", "reservationId": "res_1", "body": "See you soon" }],
            "meta": { "nextCursor": null, "total": 2, "perPage": 1 }
        })))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reservations/res_1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "msg_1", "reservationId": "res_1", "body": "Hi!" }],
            "meta": { "nextCursor": "m2", "total": 2, "perPage": 1 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let messages = collect_all(client.messages("res_1")).await.unwrap();

    let bodies: Vec<_> = messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["Hi!", "See you soon"]);
}
