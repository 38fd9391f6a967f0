//! End-to-end tests of the webhook router
//!
//! Drive `/convert` the way the API server does and check the answered
//! ConversionReview.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use example_conversion_webhook::crd::example::{DEFAULT_FIELD2, V1_API_VERSION, V2_API_VERSION};
use example_conversion_webhook::server::router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn convert(review: String) -> (StatusCode, String) {
    let response = router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/convert")
                .body(Body::from(review))
                .expect("build request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn review(uid: &str, desired: &str, objects: &[String]) -> String {
    format!(
        r#"{{"apiVersion":"apiextensions.k8s.io/v1","kind":"ConversionReview","request":{{"uid":"{uid}","desiredAPIVersion":"{desired}","objects":[{}]}}}}"#,
        objects.join(",")
    )
}

fn v1_object(name: &str) -> String {
    json!({
        "apiVersion": V1_API_VERSION,
        "kind": "Example",
        "metadata": {"name": name, "namespace": "default"},
        "spec": {"field1": format!("value-{name}")},
        "status": {"observedGeneration": 3}
    })
    .to_string()
}

#[tokio::test]
async fn test_one_malformed_object_in_batch_is_skipped() {
    const BATCH: usize = 5;

    for broken in 0..BATCH {
        let objects: Vec<String> = (0..BATCH)
            .map(|i| {
                if i == broken {
                    r#"{"apiVersion":"conversion.example.com/v1","kind":"Example","spec":{"field1":{}}}"#
                        .to_string()
                } else {
                    v1_object(&format!("obj-{i}"))
                }
            })
            .collect();

        let (status, body) = convert(review("batch", V2_API_VERSION, &objects)).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["response"]["result"]["status"], "Success");

        let names: Vec<String> = body["response"]["convertedObjects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["metadata"]["name"].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<String> = (0..BATCH)
            .filter(|i| *i != broken)
            .map(|i| format!("obj-{i}"))
            .collect();
        assert_eq!(names, expected, "broken object at index {broken}");
    }
}

#[tokio::test]
async fn test_status_and_metadata_survive_conversion() {
    let (status, body) = convert(review("s", V2_API_VERSION, &[v1_object("a")])).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    let converted = &body["response"]["convertedObjects"][0];
    assert_eq!(converted["apiVersion"], V2_API_VERSION);
    assert_eq!(converted["metadata"], json!({"name": "a", "namespace": "default"}));
    assert_eq!(converted["status"], json!({"observedGeneration": 3}));
    assert_eq!(converted["spec"]["field2"], DEFAULT_FIELD2);
}

#[tokio::test]
async fn test_reverse_conversion_has_no_field2() {
    let v2 = json!({
        "apiVersion": V2_API_VERSION,
        "kind": "Example",
        "metadata": {"name": "x"},
        "spec": {"field1": "hello", "field2": "custom"}
    })
    .to_string();

    let (status, body) = convert(review("r", V1_API_VERSION, &[v2])).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body["response"]["convertedObjects"][0]["spec"],
        json!({"field1": "hello"})
    );
}

#[tokio::test]
async fn test_mixed_batch_keeps_order() {
    let already_v1 = v1_object("first");
    let v2 = json!({
        "apiVersion": V2_API_VERSION,
        "kind": "Example",
        "metadata": {"name": "second"},
        "spec": {"field1": "b", "field2": "c"}
    })
    .to_string();
    let foreign = r#"{"apiVersion":"other.example.com/v1","kind":"Other","metadata":{"name":"third"}}"#;

    let (status, body) = convert(review(
        "m",
        V1_API_VERSION,
        &[already_v1.clone(), v2, foreign.to_string()],
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&already_v1), "v1 object should pass through verbatim");
    assert!(body.contains(foreign), "unknown object should pass through verbatim");

    let body: Value = serde_json::from_str(&body).unwrap();
    let converted = body["response"]["convertedObjects"].as_array().unwrap();
    assert_eq!(converted.len(), 3);
    assert_eq!(converted[0]["metadata"]["name"], "first");
    assert_eq!(converted[1]["metadata"]["name"], "second");
    assert_eq!(converted[1]["apiVersion"], V1_API_VERSION);
    assert_eq!(converted[2]["metadata"]["name"], "third");
}

#[tokio::test]
async fn test_invalid_envelope_is_bad_request() {
    let (status, body) = convert("[1, 2".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.is_empty());
}
