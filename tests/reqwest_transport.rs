use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use animoto::{
    media_type, AnimotoError, ApiClient, HttpRequest, JobState, RenderingManifest,
    RenderingParameters, RequestOptions, RetryPolicy, SubmitOptions, TransportError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rendering_manifest() -> RenderingManifest {
    RenderingManifest::new("https://example.test/storyboards/7", RenderingParameters::default())
}

#[tokio::test(flavor = "multi_thread")]
async fn render_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/rendering"))
        .and(header("authorization", "Basic azpz"))
        .and(header("content-type", media_type::RENDERING_MANIFEST))
        .and(header("accept", media_type::RENDERING_JOB))
        .and(body_json(serde_json::json!({
            "rendering_job": {
                "rendering_manifest": {
                    "storyboard_url": "https://example.test/storyboards/7",
                    "rendering_parameters": {"resolution": "720p", "framerate": 30.0, "format": "h264"}
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"42","status":"pending"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let host = server.uri();
    let job = tokio::task::spawn_blocking(move || {
        let client = ApiClient::with_host("k", "s", host)?;
        client.render(rendering_manifest())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(job.id(), Some("42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unexpected_status_over_http_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/rendering"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let host = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let client = ApiClient::with_host("k", "wrong", host)?;
        client.render(rendering_manifest())
    })
    .await
    .unwrap()
    .unwrap_err();

    match err {
        AnimotoError::HttpExpectation { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad credentials");
        }
        other => panic!("expected HttpExpectation, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn interceptor_headers_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/rendering"))
        .and(header("x-request-source", "batch"))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let host = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = ApiClient::with_host("k", "s", host)?;
        let options = SubmitOptions::new().request(RequestOptions::new().interceptor(
            |req: &mut HttpRequest| -> Result<(), TransportError> {
                req.set_header("X-Request-Source", "batch");
                Ok(())
            },
        ));
        client.render_with(rendering_manifest(), &options)
    })
    .await
    .unwrap()
    .unwrap();
}

struct CountingPolicy {
    attempts: Arc<AtomicU32>,
    max_retries: u32,
}

impl RetryPolicy for CountingPolicy {
    fn retry_after(&self, _error: &TransportError, attempt: u32) -> Option<Duration> {
        self.attempts.store(attempt, Ordering::SeqCst);
        (attempt <= self.max_retries).then_some(Duration::from_millis(5))
    }
}

fn refused_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // release the port so that requests fail with ECONNREFUSED
    format!("http://{addr}")
}

#[test]
fn retry_policy_is_consulted_until_it_gives_up() {
    let client = ApiClient::with_host("k", "s", refused_host()).unwrap();
    let attempts = Arc::new(AtomicU32::new(0));
    let options = SubmitOptions::new().request(RequestOptions::new().retry_policy(CountingPolicy {
        attempts: attempts.clone(),
        max_retries: 2,
    }));

    let err = client
        .render_with(rendering_manifest(), &options)
        .unwrap_err();

    assert!(matches!(err, AnimotoError::Http(TransportError::Request(_))), "{err:?}");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn connection_failure_without_policy_fails_immediately() {
    let client = ApiClient::with_host("k", "s", refused_host()).unwrap();

    let err = client.render(rendering_manifest()).unwrap_err();

    assert!(matches!(err, AnimotoError::Http(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn request_timeout_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jobs/rendering"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_string(r#"{"id":"1"}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let host = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let options = SubmitOptions::new()
            .request(RequestOptions::new().timeout(Duration::from_millis(200)));
        ApiClient::with_host("k", "s", host)
            .unwrap()
            .render_with(rendering_manifest(), &options)
            .unwrap_err()
    })
    .await
    .unwrap();

    match err {
        AnimotoError::Http(TransportError::Request(e)) => assert!(e.is_timeout(), "{e:?}"),
        other => panic!("expected a timed-out request, got {other:?}"),
    }
}

#[test]
fn retries_do_not_rerun_interceptors() {
    let client = ApiClient::with_host("k", "s", refused_host()).unwrap();
    let attempts = Arc::new(AtomicU32::new(0));
    let intercepted = Arc::new(AtomicU32::new(0));
    let counter = intercepted.clone();
    let options = SubmitOptions::new().request(
        RequestOptions::new()
            .retry_policy(CountingPolicy {
                attempts: attempts.clone(),
                max_retries: 2,
            })
            .interceptor(move |_: &mut HttpRequest| -> Result<(), TransportError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
    );

    client
        .render_with(rendering_manifest(), &options)
        .unwrap_err();

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(intercepted.load(Ordering::SeqCst), 1);
}
