//! Outbound message content as an ordered list of segments.
//!
//! Adapters consume segments in order; binary segments may be rewritten to
//! reference URLs before transmission (see `warren-media`).

/// One piece of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text.
    Text(String),
    /// Raw image bytes, not yet uploaded anywhere.
    Image(Vec<u8>),
    /// A durable reference to an already-hosted image.
    ImageUrl(String),
}

/// Ordered outbound content, built incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    segments: Vec<Segment>,
}

impl Content {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text segment.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    /// Append a raw image segment.
    #[must_use]
    pub fn image(mut self, bytes: Vec<u8>) -> Self {
        self.segments.push(Segment::Image(bytes));
        self
    }

    /// Append an already-hosted image reference.
    #[must_use]
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.segments.push(Segment::ImageUrl(url.into()));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenation of all text segments, for plain-text-only adapters.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Segment::Text(text) = segment {
                out.push_str(text);
            }
        }
        out
    }
}
