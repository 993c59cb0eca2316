mod common;

use animoto::{
    media_type, AnimotoError, DirectingJob, DirectingManifest, JobState, RenderingJob,
    RenderingManifest, RequestOptions, Resolution, Resource, Storyboard, SubmitOptions,
    TransportError, Video,
};
use serde_json::json;

use common::{client, RecordingTransport};

const JOB_LOCATION: &str = "https://example.test/jobs/directing/abc";

fn submitted_directing_job(transport: &RecordingTransport) -> DirectingJob {
    transport.respond(
        201,
        &json!({"directing_job": {"state": "retrieving_assets", "links": {"self": JOB_LOCATION}}})
            .to_string(),
    );
    let mut job = DirectingJob::new(DirectingManifest::new("t"));
    client(transport)
        .submit(&mut job, &SubmitOptions::default())
        .unwrap();
    job
}

#[test]
fn reload_gets_location_with_accept_and_no_body() {
    let transport = RecordingTransport::new();
    let mut job = submitted_directing_job(&transport);
    transport.respond(
        200,
        &json!({
            "response": {
                "status": {"code": 200},
                "payload": {"directing_job": {
                    "state": "completed",
                    "links": {
                        "self": JOB_LOCATION,
                        "storyboard": "https://example.test/storyboards/1"
                    }
                }}
            }
        })
        .to_string(),
    );

    client(&transport).reload(&mut job).unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, reqwest::Method::GET);
    assert_eq!(request.url, JOB_LOCATION);
    assert!(request.body.is_none());
    assert_eq!(request.header("Accept"), Some(job.accept()));
    assert_eq!(request.header("Accept"), Some(media_type::DIRECTING_JOB));
    assert!(request.header("Content-Type").is_none());

    assert!(job.status.is_completed());
    assert_eq!(job.id(), Some("abc"));
    assert_eq!(
        job.status.storyboard_url.as_deref(),
        Some("https://example.test/storyboards/1")
    );
}

#[test]
fn reload_status_mismatch_leaves_resource_unchanged() {
    let transport = RecordingTransport::new();
    let mut job = submitted_directing_job(&transport);
    let before = job.status.clone();
    transport.respond(404, "gone");

    let err = client(&transport).reload(&mut job).unwrap_err();

    match err {
        AnimotoError::HttpExpectation {
            expected,
            status,
            body,
        } => {
            assert_eq!(expected, 200);
            assert_eq!(status, 404);
            assert_eq!(body, "gone");
        }
        other => panic!("expected HttpExpectation, got {other:?}"),
    }
    assert_eq!(job.status, before);
}

#[test]
fn reload_of_created_status_is_still_a_mismatch() {
    let transport = RecordingTransport::new();
    let mut storyboard = Storyboard::new("https://example.test/storyboards/1");
    transport.respond(201, r#"{"storyboard":{}}"#);

    let err = client(&transport).reload(&mut storyboard).unwrap_err();

    assert_eq!(err.status(), Some(201));
}

#[test]
fn reload_without_location_sends_nothing() {
    let transport = RecordingTransport::new();
    let mut job = RenderingJob::new(RenderingManifest::default());

    let err = client(&transport).reload(&mut job).unwrap_err();

    assert!(matches!(err, AnimotoError::MissingLocation));
    assert!(transport.requests().is_empty());
}

#[test]
fn reload_hydrates_storyboard_and_video() {
    let transport = RecordingTransport::new();
    transport
        .respond(
            200,
            &json!({"storyboard": {
                "links": {
                    "self": "https://example.test/storyboards/1",
                    "video": "https://example.test/videos/2"
                },
                "metadata": {"duration": 42.5, "visuals_count": 12}
            }})
            .to_string(),
        )
        .respond(
            200,
            &json!({"video": {
                "links": {
                    "self": "https://example.test/videos/2",
                    "file": "https://cdn.test/2.mp4",
                    "cover_image": "https://cdn.test/2.jpg",
                    "storyboard": "https://example.test/storyboards/1"
                },
                "metadata": {"rendering_parameters": {
                    "resolution": "1080p", "framerate": 24, "format": "h264"
                }}
            }})
            .to_string(),
        );
    let client = client(&transport);

    let mut storyboard = Storyboard::new("https://example.test/storyboards/1");
    client.reload(&mut storyboard).unwrap();
    assert_eq!(
        transport.last_request().header("Accept"),
        Some(media_type::STORYBOARD)
    );
    assert_eq!(storyboard.duration, Some(42.5));
    assert_eq!(storyboard.visuals_count, Some(12));

    let mut video = Video::new(storyboard.video_url.clone().unwrap());
    client.reload(&mut video).unwrap();
    assert_eq!(transport.last_request().header("Accept"), Some(media_type::VIDEO));
    assert_eq!(video.file_url.as_deref(), Some("https://cdn.test/2.mp4"));
    assert_eq!(video.cover_image_url.as_deref(), Some("https://cdn.test/2.jpg"));
    assert_eq!(
        video.rendering_parameters.map(|p| p.resolution),
        Some(Resolution::R1080p)
    );
}

#[test]
fn reload_contract_violation_keeps_prior_state() {
    let transport = RecordingTransport::new();
    let mut storyboard = Storyboard::new("https://example.test/storyboards/1");
    storyboard.duration = Some(10.0);
    transport.respond(200, r#"{"storyboard":{"metadata":{"duration":"long"}}}"#);

    let err = client(&transport).reload(&mut storyboard).unwrap_err();

    assert!(matches!(err, AnimotoError::Contract { .. }));
    assert_eq!(storyboard.duration, Some(10.0));
}

#[test]
fn every_request_carries_basic_auth() {
    let transport = RecordingTransport::new();
    let mut job = submitted_directing_job(&transport);
    transport.respond(200, r#"{"state":"directing"}"#);
    client(&transport)
        .reload_with(&mut job, &RequestOptions::default())
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(request.authorization(), "Basic azpz");
        assert_eq!(request.credentials().key(), "k");
    }
}

#[test]
fn reload_transport_failure_is_an_http_error() {
    let transport = RecordingTransport::new();
    let mut video = Video::new("https://example.test/videos/2");
    transport.fail(TransportError::Io("timed out".into()));

    let err = client(&transport).reload(&mut video).unwrap_err();

    assert!(matches!(err, AnimotoError::Http(_)));
    assert!(video.file_url.is_none());
}

#[test]
fn reload_of_unrelated_object_is_a_contract_error() {
    let transport = RecordingTransport::new();
    transport
        .respond(200, r#"{"unrelated":1}"#)
        .respond(200, r#"{"storyboard":"https://example.test/storyboards/1"}"#);
    let client = client(&transport);
    let mut storyboard = Storyboard::new("https://example.test/storyboards/1");
    storyboard.visuals_count = Some(3);

    for _ in 0..2 {
        let err = client.reload(&mut storyboard).unwrap_err();
        assert!(matches!(err, AnimotoError::Contract { .. }), "{err:?}");
    }
    assert_eq!(storyboard.visuals_count, Some(3));
}

#[test]
fn reload_of_empty_job_body_keeps_location() {
    let transport = RecordingTransport::new();
    let mut job = submitted_directing_job(&transport);
    transport.respond(200, "{}");

    let err = client(&transport).reload(&mut job).unwrap_err();

    assert!(matches!(err, AnimotoError::Contract { .. }));
    assert_eq!(job.location(), Some(JOB_LOCATION));
}
