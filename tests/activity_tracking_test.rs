//! Loading-state aggregation under concurrent requests.
//!
//! Verifies the in-flight counter and listener-transition invariants against
//! a wiremock server with delayed responses.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reqpipe::prelude::*;

struct TransitionRecorder {
    transitions: Mutex<Vec<bool>>,
}

impl TransitionRecorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            transitions: Mutex::new(Vec::new()),
        })
    }

    fn transitions(&self) -> Vec<bool> {
        self.transitions.lock().unwrap().clone()
    }
}

impl LoadingListener for TransitionRecorder {
    fn on_loading_changed(&self, loading: bool) {
        self.transitions.lock().unwrap().push(loading);
    }
}

fn success_body() -> serde_json::Value {
    json!({"code": 0, "msg": "ok", "data": null})
}

async fn delayed_pipeline(server: &MockServer) -> RequestPipeline {
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow-error"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"code": 1, "msg": "boom"}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(server)
        .await;

    RequestPipeline::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn in_flight_count_returns_to_zero_with_mixed_outcomes() {
    let server = MockServer::start().await;
    let pipeline = delayed_pipeline(&server).await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let pipeline = pipeline.clone();
        let target = if i % 2 == 0 { "/slow" } else { "/slow-error" };
        handles.push(tokio::spawn(async move {
            let _: Result<serde_json::Value> =
                pipeline.get(target, None::<&()>, Some(RequestConfig::silent())).await;
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(pipeline.activity().in_flight(), 0);
    assert!(!pipeline.activity().is_loading());
}

#[tokio::test]
async fn loading_flag_flips_once_per_transition_across_overlap() {
    let server = MockServer::start().await;
    let pipeline = delayed_pipeline(&server).await;

    let recorder = TransitionRecorder::new();
    pipeline.activity().subscribe(recorder.clone());

    let mut handles = Vec::new();
    for _ in 0..3 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let _: serde_json::Value = pipeline.get("/slow", None::<&()>, None).await.unwrap();
        }));
    }
    // All three dispatch well inside the mock's 200ms delay, so they overlap.
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(recorder.transitions(), vec![true, false]);
}

#[tokio::test]
async fn loading_flag_is_true_while_a_request_is_in_flight() {
    let server = MockServer::start().await;
    let pipeline = delayed_pipeline(&server).await;

    let task = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            let _: serde_json::Value = pipeline.get("/slow", None::<&()>, None).await.unwrap();
        })
    };

    // Wait until the request has started but not yet completed.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(pipeline.activity().is_loading());

    task.await.unwrap();
    assert!(!pipeline.activity().is_loading());
}

#[tokio::test]
async fn pre_dispatch_failure_still_decrements() {
    let server = MockServer::start().await;
    let pipeline = delayed_pipeline(&server).await;

    // An invalid per-call header fails before the request is dispatched.
    let config = RequestConfig::new().header("bad header", "v");
    let result: Result<serde_json::Value> = pipeline.get("/slow", None::<&()>, Some(config)).await;

    assert!(matches!(result, Err(PipelineError::Configuration(_))));
    assert_eq!(pipeline.activity().in_flight(), 0);
    assert!(!pipeline.activity().is_loading());
}
