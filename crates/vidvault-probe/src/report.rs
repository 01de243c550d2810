//! Deserialized probe output.

use serde::Deserialize;

/// The subset of `ffprobe -print_format json` output the extractor needs.
/// Everything else in the probe JSON is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    #[serde(default)]
    pub format: ProbeFormat,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    /// Sexagesimal duration text (`H:MM:SS.ffffff`) when the container
    /// reports one.
    pub duration: Option<String>,
}

impl ProbeReport {
    /// The first stream declaring itself a video stream, if any.
    pub fn first_video_stream(&self) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|stream| stream.codec_type.as_deref() == Some("video"))
    }
}
