use serde::{Deserialize, Serialize};

/// Payload format the API uses when calling back `http_callback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpCallbackFormat {
    Json,
    Xml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    #[default]
    Default,
    Half,
    Double,
}

/// One entry in a directing manifest's visual sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Visual {
    Image {
        source_url: String,
        /// Quarter turns clockwise, 0-3.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<u8>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        spotlit: bool,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        cover: bool,
    },
    TitleCard {
        h1: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        h2: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        spotlit: bool,
    },
    Footage {
        source_url: String,
        /// Seconds into the clip.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_time: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
        /// "mix" or "none".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_mix: Option<String>,
    },
}

impl Visual {
    pub fn image(source_url: impl Into<String>) -> Self {
        Visual::Image {
            source_url: source_url.into(),
            rotation: None,
            spotlit: false,
            cover: false,
        }
    }

    pub fn title_card(h1: impl Into<String>, h2: Option<String>) -> Self {
        Visual::TitleCard {
            h1: h1.into(),
            h2,
            spotlit: false,
        }
    }

    pub fn footage(source_url: impl Into<String>) -> Self {
        Visual::Footage {
            source_url: source_url.into(),
            start_time: None,
            duration: None,
            audio_mix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Song {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            start_time: None,
            duration: None,
        }
    }
}

/// Instructions for directing a storyboard out of visuals and a song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectingManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    /// Defaults to "original".
    pub style: String,
    pub pacing: Pacing,
    pub visuals: Vec<Visual>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song: Option<Song>,
}

impl Default for DirectingManifest {
    fn default() -> Self {
        Self {
            title: None,
            producer: None,
            style: "original".to_string(),
            pacing: Pacing::Default,
            visuals: Vec::new(),
            song: None,
        }
    }
}

impl DirectingManifest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn visual(mut self, visual: Visual) -> Self {
        self.visuals.push(visual);
        self
    }

    pub fn song(mut self, song: Song) -> Self {
        self.song = Some(song);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "180p")]
    R180p,
    #[serde(rename = "240p")]
    R240p,
    #[serde(rename = "360p")]
    R360p,
    #[serde(rename = "480p")]
    R480p,
    #[default]
    #[serde(rename = "720p")]
    R720p,
    #[serde(rename = "1080p")]
    R1080p,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    H264,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderingParameters {
    pub resolution: Resolution,
    /// Frames per second.
    pub framerate: f64,
    pub format: Format,
}

impl Default for RenderingParameters {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            framerate: 30.0,
            format: Format::default(),
        }
    }
}

/// Instructions for rendering a directed storyboard into a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderingManifest {
    /// Storyboard produced by a directing job. Ignored and cleared when the
    /// manifest is part of a combined directing-and-rendering submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyboard_url: Option<String>,
    pub rendering_parameters: RenderingParameters,
}

impl RenderingManifest {
    pub fn new(storyboard_url: impl Into<String>, rendering_parameters: RenderingParameters) -> Self {
        Self {
            storyboard_url: Some(storyboard_url.into()),
            rendering_parameters,
        }
    }
}
