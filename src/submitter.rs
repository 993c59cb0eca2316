use tracing::{debug, instrument};

use crate::contract::ResourceContract;
use crate::credentials::Credentials;
use crate::errors::{AnimotoError, Result};
use crate::models::HttpCallbackFormat;
use crate::request::{RequestBuilder, RequestOptions};
use crate::resource::{Job, Resource};
use crate::transport::HttpTransport;

/// Options for a job submission.
///
/// Absent callback fields leave whatever the job already carries untouched.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub http_callback: Option<String>,
    pub http_callback_format: Option<HttpCallbackFormat>,
    pub request: RequestOptions,
}

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL the API notifies when the job changes state.
    pub fn http_callback(mut self, url: impl Into<String>, format: HttpCallbackFormat) -> Self {
        self.http_callback = Some(url.into());
        self.http_callback_format = Some(format);
        self
    }

    pub fn request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }
}

/// Wires one API call: request building, transport, contract check and
/// hydration. Built per call and borrows everything it needs.
pub(crate) struct JobSubmitter<'a> {
    pub host: &'a str,
    pub user_agent: &'a str,
    pub credentials: &'a Credentials,
    pub transport: &'a dyn HttpTransport,
}

impl JobSubmitter<'_> {
    /// POST the job to `{host}/jobs/{context}` and hydrate it from the
    /// `201 Created` response.
    #[instrument(skip_all, fields(context = J::CONTEXT))]
    pub fn submit<J: Job>(&self, job: &mut J, options: &SubmitOptions) -> Result<()> {
        if let Some(ref url) = options.http_callback {
            job.set_http_callback(url.clone());
        }
        if let Some(format) = options.http_callback_format {
            job.set_http_callback_format(format);
        }

        let body = job.to_wire_body()?;
        let url = format!("{}/jobs/{}", self.host, J::CONTEXT);
        debug!(%url, "submitting job");

        let request = RequestBuilder::post(url)
            .header("Content-Type", job.content_type())
            .header("Accept", job.accept())
            .header("User-Agent", self.user_agent)
            .body(body)
            .build(self.credentials, &options.request);

        let outcome = self.transport.execute(request);
        let decoded = ResourceContract::created().validate::<J>(outcome)?;
        job.hydrate(decoded);
        Ok(())
    }

    /// GET the resource's location and hydrate it from the `200 OK` response.
    #[instrument(skip_all, fields(root = R::ROOT))]
    pub fn reload<R: Resource>(&self, resource: &mut R, options: &RequestOptions) -> Result<()> {
        let url = resource
            .location()
            .ok_or(AnimotoError::MissingLocation)?
            .to_string();
        debug!(%url, "reloading resource");

        let request = RequestBuilder::get(url)
            .header("Accept", resource.accept())
            .build(self.credentials, options);

        let outcome = self.transport.execute(request);
        let decoded = ResourceContract::ok().validate::<R>(outcome)?;
        resource.hydrate(decoded);
        Ok(())
    }
}
