use serde::de::DeserializeOwned;

use crate::contract::decode_body;
use crate::errors::Result;
use crate::models::HttpCallbackFormat;

/// Media types understood by the API.
pub mod media_type {
    pub const DIRECTING_MANIFEST: &str = "application/vnd.animoto.directing_manifest-v1+json";
    pub const DIRECTING_JOB: &str = "application/vnd.animoto.directing_job-v1+json";
    pub const RENDERING_MANIFEST: &str = "application/vnd.animoto.rendering_manifest-v1+json";
    pub const RENDERING_JOB: &str = "application/vnd.animoto.rendering_job-v1+json";
    pub const DIRECTING_AND_RENDERING_MANIFEST: &str =
        "application/vnd.animoto.directing_and_rendering_manifest-v1+json";
    pub const DIRECTING_AND_RENDERING_JOB: &str =
        "application/vnd.animoto.directing_and_rendering_job-v1+json";
    pub const STORYBOARD: &str = "application/vnd.animoto.storyboard-v1+json";
    pub const VIDEO: &str = "application/vnd.animoto.video-v1+json";
}

/// A server-tracked entity that can be fetched and refreshed.
pub trait Resource {
    /// Key the resource is nested under in request and response bodies.
    const ROOT: &'static str;

    /// Shape of the resource in a response body.
    type Body: DeserializeOwned;

    /// Top-level keys of [`Body`](Self::Body). A response object carrying
    /// none of them is not this resource.
    const FIELDS: &'static [&'static str];

    fn content_type(&self) -> &'static str;

    fn accept(&self) -> &'static str;

    /// URL the resource can be reloaded from, once the server has assigned one.
    fn location(&self) -> Option<&str>;

    /// Commit a decoded response body. Never fails, so a resource is either
    /// fully updated or left untouched.
    fn hydrate(&mut self, body: Self::Body);

    /// Decode `body` and commit it.
    fn hydrate_from(&mut self, body: &str) -> Result<()>
    where
        Self: Sized,
    {
        let decoded = decode_body::<Self::Body>(Self::ROOT, Self::FIELDS, body)?;
        self.hydrate(decoded);
        Ok(())
    }
}

/// A resource created by POSTing manifests to `/jobs/{CONTEXT}`.
pub trait Job: Resource {
    /// Path segment under `/jobs/`.
    const CONTEXT: &'static str;

    /// Request body for the submission.
    fn to_wire_body(&self) -> Result<String>;

    fn set_http_callback(&mut self, url: String);

    fn set_http_callback_format(&mut self, format: HttpCallbackFormat);
}
