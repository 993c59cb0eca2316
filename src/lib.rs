//! # Animoto API client for Rust
//!
//! Submit directing, rendering and combined directing-and-rendering jobs to
//! the [Animoto](https://animoto.com/developer/api) video production API, and
//! reload the jobs, storyboards and videos they produce.
//!
//! Every call performs a single blocking HTTP exchange. Failures fall into
//! three classes:
//!
//! - [`AnimotoError::Http`]: the exchange never completed.
//! - [`AnimotoError::HttpExpectation`]: the server answered with the wrong status.
//! - [`AnimotoError::Contract`]: the server answered as expected but the body
//!   broke the documented schema.
//!
//! ## Quick start
//!
//! ```no_run
//! use animoto::{ApiClient, DirectingManifest, JobState, RenderingManifest, Visual};
//!
//! fn main() -> animoto::Result<()> {
//!     let client = ApiClient::new("your_key", "your_secret")?;
//!
//!     let directing = DirectingManifest::new("Weekend")
//!         .visual(Visual::title_card("Weekend", None))
//!         .visual(Visual::image("https://example.com/1.jpg"));
//!     let mut job = client.direct_and_render(directing, RenderingManifest::default())?;
//!
//!     // Polling is up to the caller.
//!     while !(job.status.is_completed() || job.status.is_failed()) {
//!         std::thread::sleep(std::time::Duration::from_secs(5));
//!         client.reload(&mut job)?;
//!     }
//!     println!("job {:?} finished as {:?}", job.id(), job.state());
//!     Ok(())
//! }
//! ```
//!
//! ## Callbacks, retries and interceptors
//!
//! ```no_run
//! use animoto::{
//!     ApiClient, ExponentialBackoff, HttpCallbackFormat, HttpRequest, RenderingManifest,
//!     RenderingParameters, RequestOptions, SubmitOptions, TransportError,
//! };
//! use std::time::Duration;
//!
//! # fn example(client: &ApiClient) -> animoto::Result<()> {
//! let options = SubmitOptions::new()
//!     .http_callback("https://example.com/hooks/animoto", HttpCallbackFormat::Json)
//!     .request(
//!         RequestOptions::new()
//!             .retry_policy(ExponentialBackoff::new(3, Duration::from_millis(500)))
//!             .interceptor(|req: &mut HttpRequest| -> Result<(), TransportError> {
//!                 req.set_header("X-Request-Source", "batch");
//!                 Ok(())
//!             }),
//!     );
//! let manifest = RenderingManifest::new(
//!     "https://api2.animoto.com/storyboards/123",
//!     RenderingParameters::default(),
//! );
//! let job = client.render_with(manifest, &options)?;
//! # Ok(())
//! # }
//! ```

mod client;
mod contract;
mod credentials;
mod errors;
mod jobs;
mod models;
mod request;
mod resource;
mod submitter;
mod transport;

pub use client::{ApiClient, ClientBuilder};
pub use contract::ResourceContract;
pub use credentials::Credentials;
pub use errors::{AnimotoError, Result, TransportError};
pub use jobs::{
    DirectingAndRenderingJob, DirectingJob, JobBody, JobState, JobStatus, Links, RenderingJob,
    Storyboard, StoryboardBody, StoryboardMetadata, Video, VideoBody, VideoMetadata,
};
pub use models::{
    DirectingManifest, Format, HttpCallbackFormat, Pacing, RenderingManifest,
    RenderingParameters, Resolution, Song, Visual,
};
pub use request::{RequestBuilder, RequestOptions};
pub use resource::{media_type, Job, Resource};
pub use submitter::SubmitOptions;
pub use transport::{
    ExponentialBackoff, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    RequestInterceptor, RetryPolicy,
};
