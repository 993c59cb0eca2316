#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use animoto::{ApiClient, ClientBuilder, HttpRequest, HttpResponse, HttpTransport, TransportError};

pub const HOST: &str = "https://example.test";

/// In-memory transport that records every request and replays queued
/// responses in order.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.inner
            .outcomes
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.inner.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl HttpTransport for RecordingTransport {
    fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        request.apply_interceptors()?;
        self.inner.requests.lock().unwrap().push(request);
        self.inner
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("no response queued".into())))
    }
}

pub fn client(transport: &RecordingTransport) -> ApiClient {
    ClientBuilder::new()
        .key("k")
        .secret("s")
        .host(HOST)
        .transport(transport.clone())
        .build()
        .expect("client")
}

pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().expect("request body")).expect("json body")
}
