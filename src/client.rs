use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::errors::{AnimotoError, Result};
use crate::jobs::{DirectingAndRenderingJob, DirectingJob, RenderingJob};
use crate::models::{DirectingManifest, RenderingManifest};
use crate::request::RequestOptions;
use crate::resource::{Job, Resource};
use crate::submitter::{JobSubmitter, SubmitOptions};
use crate::transport::{HttpTransport, ReqwestTransport};

const DEFAULT_HOST: &str = "https://api2.animoto.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for constructing an [`ApiClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use animoto::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> animoto::Result<()> {
/// let client = ClientBuilder::new()
///     .key("your_key")
///     .secret("your_secret")
///     .host("https://api2-staging.animoto.com")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    key: Option<String>,
    secret: Option<String>,
    host: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            key: None,
            secret: None,
            host: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            transport: None,
        }
    }

    /// Set the API key for authentication.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the API secret paired with the key.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Override the API host (defaults to `https://api2.animoto.com`).
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the HTTP request timeout of the default transport (defaults to 60
    /// seconds). Ignored when a custom transport is supplied.
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Override the `User-Agent` header (defaults to
    /// `Animoto Rust API Client - <version>`).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom transport instead of the reqwest-backed default.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the [`ApiClient`].
    ///
    /// Unset values fall back to the `ANIMOTO_API_KEY`, `ANIMOTO_API_SECRET`
    /// and `ANIMOTO_API_HOST` environment variables.
    ///
    /// Returns [`AnimotoError::Config`] if no key or secret is available.
    pub fn build(self) -> Result<ApiClient> {
        let key = self
            .key
            .or_else(|| std::env::var("ANIMOTO_API_KEY").ok())
            .ok_or_else(|| {
                AnimotoError::Config(
                    "API key is required. Pass it to ClientBuilder::key() \
                     or set the ANIMOTO_API_KEY environment variable."
                        .into(),
                )
            })?;
        let secret = self
            .secret
            .or_else(|| std::env::var("ANIMOTO_API_SECRET").ok())
            .ok_or_else(|| {
                AnimotoError::Config(
                    "API secret is required. Pass it to ClientBuilder::secret() \
                     or set the ANIMOTO_API_SECRET environment variable."
                        .into(),
                )
            })?;
        let host = self
            .host
            .or_else(|| std::env::var("ANIMOTO_API_HOST").ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_timeout(self.timeout)?),
        };

        Ok(ApiClient {
            credentials: Credentials::new(key, secret),
            host: host.trim_end_matches('/').to_string(),
            user_agent: self.user_agent.unwrap_or_else(ApiClient::default_user_agent),
            transport,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The Animoto API client.
///
/// Every operation performs exactly one HTTP exchange and blocks until it
/// completes. The client holds no mutable state, so sharing it across
/// threads is safe as long as the transport is.
///
/// # Example
///
/// ```no_run
/// use animoto::{ApiClient, DirectingManifest, JobState, Visual};
///
/// # fn example() -> animoto::Result<()> {
/// let client = ApiClient::new("your_key", "your_secret")?;
///
/// let manifest = DirectingManifest::new("Summer")
///     .visual(Visual::image("https://example.com/beach.jpg"));
/// let job = client.direct(manifest)?;
/// println!("directing job {:?} is {:?}", job.id(), job.state());
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    credentials: Credentials,
    host: String,
    user_agent: String,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Create a client against the production host with the default transport.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().key(key).secret(secret).host(DEFAULT_HOST).build()
    }

    /// Create a client against a custom host with the default transport.
    pub fn with_host(
        key: impl Into<String>,
        secret: impl Into<String>,
        host: impl Into<String>,
    ) -> Result<Self> {
        ClientBuilder::new().key(key).secret(secret).host(host).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn default_user_agent() -> String {
        format!("Animoto Rust API Client - {}", Self::version())
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Submit a directing job with no callback and default transport options.
    pub fn direct(&self, directing_manifest: DirectingManifest) -> Result<DirectingJob> {
        self.direct_with(directing_manifest, &SubmitOptions::default())
    }

    pub fn direct_with(
        &self,
        directing_manifest: DirectingManifest,
        options: &SubmitOptions,
    ) -> Result<DirectingJob> {
        let mut job = DirectingJob::new(directing_manifest);
        self.submit(&mut job, options)?;
        Ok(job)
    }

    /// Submit a rendering job with no callback and default transport options.
    ///
    /// Unlike [`direct_and_render`](Self::direct_and_render), the manifest's
    /// storyboard URL is sent as given.
    pub fn render(&self, rendering_manifest: RenderingManifest) -> Result<RenderingJob> {
        self.render_with(rendering_manifest, &SubmitOptions::default())
    }

    pub fn render_with(
        &self,
        rendering_manifest: RenderingManifest,
        options: &SubmitOptions,
    ) -> Result<RenderingJob> {
        let mut job = RenderingJob::new(rendering_manifest);
        self.submit(&mut job, options)?;
        Ok(job)
    }

    /// Direct and render in one job. Any storyboard URL on the rendering
    /// manifest is cleared before submission.
    pub fn direct_and_render(
        &self,
        directing_manifest: DirectingManifest,
        rendering_manifest: RenderingManifest,
    ) -> Result<DirectingAndRenderingJob> {
        self.direct_and_render_with(
            directing_manifest,
            rendering_manifest,
            &SubmitOptions::default(),
        )
    }

    pub fn direct_and_render_with(
        &self,
        directing_manifest: DirectingManifest,
        rendering_manifest: RenderingManifest,
        options: &SubmitOptions,
    ) -> Result<DirectingAndRenderingJob> {
        let mut job = DirectingAndRenderingJob::new(directing_manifest, rendering_manifest);
        self.submit(&mut job, options)?;
        Ok(job)
    }

    /// Submit an existing job object.
    ///
    /// Callback fields absent from `options` keep the job's current values.
    /// On failure the job's server-assigned fields are left as they were.
    pub fn submit<J: Job>(&self, job: &mut J, options: &SubmitOptions) -> Result<()> {
        self.submitter().submit(job, options)
    }

    /// Refresh a resource from its location.
    pub fn reload<R: Resource>(&self, resource: &mut R) -> Result<()> {
        self.reload_with(resource, &RequestOptions::default())
    }

    pub fn reload_with<R: Resource>(&self, resource: &mut R, options: &RequestOptions) -> Result<()> {
        self.submitter().reload(resource, options)
    }

    fn submitter(&self) -> JobSubmitter<'_> {
        JobSubmitter {
            host: &self.host,
            user_agent: &self.user_agent,
            credentials: &self.credentials,
            transport: &*self.transport,
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("credentials", &self.credentials)
            .field("host", &self.host)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
