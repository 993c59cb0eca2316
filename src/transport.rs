use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::errors::TransportError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Executes a built [`HttpRequest`] and returns the raw response.
///
/// Implementations own connection handling, TLS and retries. The client
/// calls `execute` exactly once per API operation.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Decides whether a failed exchange is attempted again.
pub trait RetryPolicy: Send + Sync {
    /// Delay before the next attempt, or `None` to surface `error`.
    ///
    /// `attempt` counts the attempts made so far, starting at 1.
    fn retry_after(&self, error: &TransportError, attempt: u32) -> Option<Duration>;
}

/// Hook run against every outgoing request before it is sent.
///
/// Interceptors run once, in registration order, before the first attempt.
/// Retries resend the already intercepted request without running them again.
/// An error aborts the request before anything reaches the network.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut HttpRequest) -> Result<(), TransportError>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut HttpRequest) -> Result<(), TransportError> + Send + Sync,
{
    fn intercept(&self, request: &mut HttpRequest) -> Result<(), TransportError> {
        self(request)
    }
}

/// Retries transport failures with exponential backoff: `base_delay`,
/// `2 * base_delay`, `4 * base_delay`, ... capped at 32x.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl ExponentialBackoff {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn retry_after(&self, _error: &TransportError, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        let shift = (attempt - 1).min(5);
        Some(self.base_delay.saturating_mul(1 << shift))
    }
}

/// A transport-ready request.
///
/// Produced by [`RequestBuilder`](crate::RequestBuilder). Carries the
/// credentials, retry policy and interceptors the transport must honour.
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    headers: Vec<(String, String)>,
    credentials: Credentials,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    timeout: Option<Duration>,
}

impl HttpRequest {
    pub(crate) fn new(method: Method, url: String, credentials: Credentials) -> Self {
        Self {
            method,
            url,
            body: None,
            headers: Vec::new(),
            credentials,
            retry_policy: None,
            interceptors: Vec::new(),
            timeout: None,
        }
    }

    pub(crate) fn set_retry_policy(&mut self, policy: Option<Arc<dyn RetryPolicy>>) {
        self.retry_policy = policy;
    }

    pub(crate) fn set_interceptors(&mut self, interceptors: Vec<Arc<dyn RequestInterceptor>>) {
        self.interceptors = interceptors;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Set a header. An existing header with the same name is overwritten in
    /// place; a new one is appended.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The `Authorization` value every transport must send.
    pub fn authorization(&self) -> String {
        self.credentials.basic_auth_header()
    }

    pub fn retry_policy(&self) -> Option<&dyn RetryPolicy> {
        self.retry_policy.as_deref()
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the registered interceptors in order. Each runs once; calling this
    /// again is a no-op.
    pub fn apply_interceptors(&mut self) -> Result<(), TransportError> {
        let interceptors = std::mem::take(&mut self.interceptors);
        for interceptor in &interceptors {
            interceptor.intercept(self)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("credentials", &self.credentials)
            .field("retry_policy", &self.retry_policy.is_some())
            .field("interceptors", &self.interceptors.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Default transport backed by `reqwest::blocking`.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Transport with a 60 second request timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let credentials = request.credentials();
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str())
            .basic_auth(credentials.key(), Some(credentials.secret()));

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        request.apply_interceptors()?;

        let mut attempt: u32 = 1;
        loop {
            debug!(attempt, method = %request.method, url = %request.url, "sending HTTP request");

            match self.send_once(&request) {
                Ok(response) => {
                    debug!(attempt, url = %request.url, status = response.status, "received HTTP response");
                    return Ok(response);
                }
                Err(err) => {
                    let delay = request
                        .retry_policy()
                        .and_then(|policy| policy.retry_after(&err, attempt));
                    let Some(delay) = delay else {
                        return Err(err);
                    };
                    warn!(attempt, url = %request.url, error = %err, ?delay, "HTTP request failed, retrying");
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
