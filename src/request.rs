use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;

use crate::credentials::Credentials;
use crate::transport::{HttpRequest, RequestInterceptor, RetryPolicy};

/// Per-call transport configuration.
///
/// The default carries no retry policy, no interceptors and no timeout
/// override, so the transport's own defaults apply.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub retry_policy: Option<Arc<dyn RetryPolicy>>,
    /// Applied in sequence order before the request is sent.
    pub interceptors: Vec<Arc<dyn RequestInterceptor>>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retry_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry_policy = Some(Arc::new(policy));
        self
    }

    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("retry_policy", &self.retry_policy.is_some())
            .field("interceptors", &self.interceptors.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Assembles a transport-ready [`HttpRequest`].
///
/// Headers keep insertion order; setting a header twice overwrites the
/// first value. Header values are not validated here, a malformed value
/// surfaces as a transport error when the request is sent.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestBuilder {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach credentials and the per-call options, producing the request.
    pub fn build(self, credentials: &Credentials, options: &RequestOptions) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.url, credentials.clone());
        for (name, value) in self.headers {
            request.set_header(name, value);
        }
        request.body = self.body;
        request.set_retry_policy(options.retry_policy.clone());
        request.set_interceptors(options.interceptors.clone());
        request.set_timeout(options.timeout);
        request
    }
}
