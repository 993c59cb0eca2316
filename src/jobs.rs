use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{DirectingManifest, HttpCallbackFormat, RenderingManifest, RenderingParameters};
use crate::resource::{media_type, Job, Resource};

/// Hypermedia links the API attaches to resources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub storyboard: Option<String>,
    pub video: Option<String>,
    pub file: Option<String>,
    pub cover_image: Option<String>,
}

/// Response shape shared by all job kinds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobBody {
    pub id: Option<String>,
    #[serde(alias = "status")]
    pub state: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub links: Links,
}

const JOB_FIELDS: &[&str] = &["id", "state", "status", "location", "links"];

/// Server-assigned job fields. Empty until a submission succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub id: Option<String>,
    /// e.g. "retrieving_assets", "directing", "rendering", "completed", "failed".
    pub state: Option<String>,
    pub location: Option<String>,
    pub storyboard_url: Option<String>,
    pub video_url: Option<String>,
}

impl JobStatus {
    /// Merge a response body; fields absent from it keep their value.
    fn apply(&mut self, body: JobBody) {
        let location = body.location.or(body.links.self_url);
        let id = body
            .id
            .or_else(|| location.as_deref().and_then(last_path_segment));

        merge(&mut self.id, id);
        merge(&mut self.state, body.state);
        merge(&mut self.location, location);
        merge(&mut self.storyboard_url, body.links.storyboard);
        merge(&mut self.video_url, body.links.video);
    }

    pub fn is_completed(&self) -> bool {
        self.state.as_deref() == Some("completed")
    }

    pub fn is_failed(&self) -> bool {
        self.state.as_deref() == Some("failed")
    }
}

fn merge<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn last_path_segment(url: &str) -> Option<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Request body for any job kind; manifests are flattened in beside the
/// callback fields.
#[derive(Serialize)]
struct Submission<'a, M: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    http_callback: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_callback_format: Option<HttpCallbackFormat>,
    #[serde(flatten)]
    manifests: M,
}

fn encode_body<T: Serialize>(root: &str, payload: &T) -> Result<String> {
    let mut wrapped = serde_json::Map::new();
    wrapped.insert(root.to_string(), serde_json::to_value(payload)?);
    Ok(serde_json::to_string(&wrapped)?)
}

/// Provided accessors over a job's [`JobStatus`].
pub trait JobState {
    fn status(&self) -> &JobStatus;

    fn id(&self) -> Option<&str> {
        self.status().id.as_deref()
    }

    fn state(&self) -> Option<&str> {
        self.status().state.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DirectingJob {
    pub directing_manifest: DirectingManifest,
    pub http_callback: Option<String>,
    pub http_callback_format: Option<HttpCallbackFormat>,
    pub status: JobStatus,
}

impl DirectingJob {
    pub fn new(directing_manifest: DirectingManifest) -> Self {
        Self {
            directing_manifest,
            ..Self::default()
        }
    }

    /// The storyboard this job directed, once the server links it.
    pub fn storyboard(&self) -> Option<Storyboard> {
        self.status.storyboard_url.as_deref().map(Storyboard::new)
    }
}

impl JobState for DirectingJob {
    fn status(&self) -> &JobStatus {
        &self.status
    }
}

impl Resource for DirectingJob {
    const ROOT: &'static str = "directing_job";
    type Body = JobBody;
    const FIELDS: &'static [&'static str] = JOB_FIELDS;

    fn content_type(&self) -> &'static str {
        media_type::DIRECTING_MANIFEST
    }

    fn accept(&self) -> &'static str {
        media_type::DIRECTING_JOB
    }

    fn location(&self) -> Option<&str> {
        self.status.location.as_deref()
    }

    fn hydrate(&mut self, body: JobBody) {
        self.status.apply(body);
    }
}

impl Job for DirectingJob {
    const CONTEXT: &'static str = "directing";

    fn to_wire_body(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Manifests<'a> {
            directing_manifest: &'a DirectingManifest,
        }

        encode_body(
            Self::ROOT,
            &Submission {
                http_callback: self.http_callback.as_deref(),
                http_callback_format: self.http_callback_format,
                manifests: Manifests {
                    directing_manifest: &self.directing_manifest,
                },
            },
        )
    }

    fn set_http_callback(&mut self, url: String) {
        self.http_callback = Some(url);
    }

    fn set_http_callback_format(&mut self, format: HttpCallbackFormat) {
        self.http_callback_format = Some(format);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderingJob {
    pub rendering_manifest: RenderingManifest,
    pub http_callback: Option<String>,
    pub http_callback_format: Option<HttpCallbackFormat>,
    pub status: JobStatus,
}

impl RenderingJob {
    pub fn new(rendering_manifest: RenderingManifest) -> Self {
        Self {
            rendering_manifest,
            ..Self::default()
        }
    }

    /// The rendered video, once the server links it.
    pub fn video(&self) -> Option<Video> {
        self.status.video_url.as_deref().map(Video::new)
    }
}

impl JobState for RenderingJob {
    fn status(&self) -> &JobStatus {
        &self.status
    }
}

impl Resource for RenderingJob {
    const ROOT: &'static str = "rendering_job";
    type Body = JobBody;
    const FIELDS: &'static [&'static str] = JOB_FIELDS;

    fn content_type(&self) -> &'static str {
        media_type::RENDERING_MANIFEST
    }

    fn accept(&self) -> &'static str {
        media_type::RENDERING_JOB
    }

    fn location(&self) -> Option<&str> {
        self.status.location.as_deref()
    }

    fn hydrate(&mut self, body: JobBody) {
        self.status.apply(body);
    }
}

impl Job for RenderingJob {
    const CONTEXT: &'static str = "rendering";

    fn to_wire_body(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Manifests<'a> {
            rendering_manifest: &'a RenderingManifest,
        }

        encode_body(
            Self::ROOT,
            &Submission {
                http_callback: self.http_callback.as_deref(),
                http_callback_format: self.http_callback_format,
                manifests: Manifests {
                    rendering_manifest: &self.rendering_manifest,
                },
            },
        )
    }

    fn set_http_callback(&mut self, url: String) {
        self.http_callback = Some(url);
    }

    fn set_http_callback_format(&mut self, format: HttpCallbackFormat) {
        self.http_callback_format = Some(format);
    }
}

/// Directs and renders in one submission. The storyboard link between the
/// two steps is made server-side, so the rendering manifest never carries a
/// storyboard URL.
#[derive(Debug, Clone, Default)]
pub struct DirectingAndRenderingJob {
    pub directing_manifest: DirectingManifest,
    pub rendering_manifest: RenderingManifest,
    pub http_callback: Option<String>,
    pub http_callback_format: Option<HttpCallbackFormat>,
    pub status: JobStatus,
}

impl DirectingAndRenderingJob {
    /// Clears `rendering_manifest.storyboard_url`.
    pub fn new(
        directing_manifest: DirectingManifest,
        mut rendering_manifest: RenderingManifest,
    ) -> Self {
        rendering_manifest.storyboard_url = None;
        Self {
            directing_manifest,
            rendering_manifest,
            ..Self::default()
        }
    }

    pub fn storyboard(&self) -> Option<Storyboard> {
        self.status.storyboard_url.as_deref().map(Storyboard::new)
    }

    pub fn video(&self) -> Option<Video> {
        self.status.video_url.as_deref().map(Video::new)
    }
}

impl JobState for DirectingAndRenderingJob {
    fn status(&self) -> &JobStatus {
        &self.status
    }
}

impl Resource for DirectingAndRenderingJob {
    const ROOT: &'static str = "directing_and_rendering_job";
    type Body = JobBody;
    const FIELDS: &'static [&'static str] = JOB_FIELDS;

    fn content_type(&self) -> &'static str {
        media_type::DIRECTING_AND_RENDERING_MANIFEST
    }

    fn accept(&self) -> &'static str {
        media_type::DIRECTING_AND_RENDERING_JOB
    }

    fn location(&self) -> Option<&str> {
        self.status.location.as_deref()
    }

    fn hydrate(&mut self, body: JobBody) {
        self.status.apply(body);
    }
}

impl Job for DirectingAndRenderingJob {
    const CONTEXT: &'static str = "directing_and_rendering";

    fn to_wire_body(&self) -> Result<String> {
        // Only the rendering parameters travel; storyboard_url is never sent.
        #[derive(Serialize)]
        struct Rendering<'a> {
            rendering_parameters: &'a RenderingParameters,
        }

        #[derive(Serialize)]
        struct Manifests<'a> {
            directing_manifest: &'a DirectingManifest,
            rendering_manifest: Rendering<'a>,
        }

        encode_body(
            Self::ROOT,
            &Submission {
                http_callback: self.http_callback.as_deref(),
                http_callback_format: self.http_callback_format,
                manifests: Manifests {
                    directing_manifest: &self.directing_manifest,
                    rendering_manifest: Rendering {
                        rendering_parameters: &self.rendering_manifest.rendering_parameters,
                    },
                },
            },
        )
    }

    fn set_http_callback(&mut self, url: String) {
        self.http_callback = Some(url);
    }

    fn set_http_callback_format(&mut self, format: HttpCallbackFormat) {
        self.http_callback_format = Some(format);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryboardMetadata {
    /// Seconds.
    pub duration: Option<f64>,
    pub visuals_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryboardBody {
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub metadata: StoryboardMetadata,
}

/// A directed storyboard, produced by a directing job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storyboard {
    pub location: Option<String>,
    pub duration: Option<f64>,
    pub visuals_count: Option<u32>,
    pub video_url: Option<String>,
}

impl Storyboard {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }
}

impl Resource for Storyboard {
    const ROOT: &'static str = "storyboard";
    type Body = StoryboardBody;
    const FIELDS: &'static [&'static str] = &["links", "metadata"];

    fn content_type(&self) -> &'static str {
        media_type::STORYBOARD
    }

    fn accept(&self) -> &'static str {
        media_type::STORYBOARD
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn hydrate(&mut self, body: StoryboardBody) {
        merge(&mut self.location, body.links.self_url);
        merge(&mut self.video_url, body.links.video);
        merge(&mut self.duration, body.metadata.duration);
        merge(&mut self.visuals_count, body.metadata.visuals_count);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoMetadata {
    pub rendering_parameters: Option<RenderingParameters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoBody {
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub metadata: VideoMetadata,
}

/// A rendered video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Video {
    pub location: Option<String>,
    /// Download URL of the encoded file.
    pub file_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub storyboard_url: Option<String>,
    pub rendering_parameters: Option<RenderingParameters>,
}

impl Video {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }
}

impl Resource for Video {
    const ROOT: &'static str = "video";
    type Body = VideoBody;
    const FIELDS: &'static [&'static str] = &["links", "metadata"];

    fn content_type(&self) -> &'static str {
        media_type::VIDEO
    }

    fn accept(&self) -> &'static str {
        media_type::VIDEO
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn hydrate(&mut self, body: VideoBody) {
        merge(&mut self.location, body.links.self_url);
        merge(&mut self.file_url, body.links.file);
        merge(&mut self.cover_image_url, body.links.cover_image);
        merge(&mut self.storyboard_url, body.links.storyboard);
        merge(&mut self.rendering_parameters, body.metadata.rendering_parameters);
    }
}
