use std::fmt::{Display, Formatter};
use std::time::Duration;

use indexmap::IndexMap;

/// Classification of a response body, taken from its `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Picture,
    Json,
    General,
}

impl ContentKind {
    /// `image` wins over `json`; anything else, or no header, is general.
    pub fn from_content_type(content_type: Option<&str>) -> ContentKind {
        match content_type {
            Some(ct) if ct.contains("image") => ContentKind::Picture,
            Some(ct) if ct.contains("json") => ContentKind::Json,
            _ => ContentKind::General,
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentKind::Picture => "Picture",
            ContentKind::Json => "Json",
            ContentKind::General => "General",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseContent {
    Text(String),
    Binary(Vec<u8>),
}

impl ResponseContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResponseContent::Text(text) => text.as_bytes(),
            ResponseContent::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseContent::Text(text) => Some(text),
            ResponseContent::Binary(_) => None,
        }
    }
}

/// Result of one executed request. Never persisted.
#[derive(Debug, Clone)]
pub struct Response {
    pub headers: IndexMap<String, String>,
    pub status_code: u16,
    pub status_message: String,
    /// Time until the status line was available.
    pub elapsed: Duration,
    /// Body bytes actually read.
    pub size: usize,
    pub kind: ContentKind,
    pub content: ResponseContent,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Seconds with millisecond precision, e.g. `0.125s`.
    pub fn elapsed_display(&self) -> String {
        format!("{:.3}s", self.elapsed.as_secs_f64())
    }

    pub fn size_display(&self) -> String {
        format!("{} B", self.size)
    }
}
