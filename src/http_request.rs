use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::JurlError;

pub type NameValues = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Put,
    Delete,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Methods the grammar recognises but requests cannot carry.
const RECOGNISED_ONLY: [&str; 4] = ["HEAD", "CONNECT", "OPTIONS", "TRACE"];

impl FromStr for HttpMethod {
    type Err = JurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "POST" => Ok(HttpMethod::Post),
            "PATCH" => Ok(HttpMethod::Patch),
            other if RECOGNISED_ONLY.contains(&other) => Err(JurlError::parse(format!(
                "method {} is not supported, use one of GET, PUT, DELETE, POST, PATCH",
                other
            ))),
            other => Err(JurlError::parse(format!("invalid method parameter value: {}", other))),
        }
    }
}

/// Body kind selected by the caller (e.g. a ui body-type selector). Only
/// decides how a `-d` map is encoded; the other kinds follow their flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    FormData,
    UrlEncoded,
    Json,
    BinaryData,
}

/// The single payload of a request. At most one variant can ever be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RequestBody {
    #[default]
    None,
    /// Multipart; keys containing `file` carry a file path.
    FormData(NameValues),
    UrlEncoded(NameValues),
    /// Already validated json text, sent verbatim.
    Json(String),
    /// Path of a file streamed as the raw body.
    Binary(PathBuf),
}

impl RequestBody {
    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "file", rename_all = "snake_case")]
pub enum OutputTarget {
    #[default]
    Disabled,
    /// Write to a generated `output_<timestamp>` file.
    Generated,
    Named(String),
}

/// A fully built request. Constructed once by the command parser or read
/// back from the store, and not changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: NameValues,
    #[serde(default)]
    pub follow_redirects: bool,
    #[serde(default)]
    pub query_params: NameValues,
    #[serde(default)]
    pub body: RequestBody,
    #[serde(default)]
    pub output: OutputTarget,
    #[serde(default)]
    pub show_response_headers: bool,
    /// Target group, `""` when ungrouped.
    #[serde(default)]
    pub group: String,
}

impl Request {
    pub fn new(name: &str, url: &str) -> Request {
        Request {
            name: name.to_string(),
            url: url.to_string(),
            ..Request::default()
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// One line description used when listing saved requests.
    pub fn summary(&self) -> String {
        let mut line = format!("url: {} | method: {}", self.url, self.method);
        if !self.headers.is_empty() {
            line.push_str(&format!(" | headers: \"{}\"", join_pairs(&self.headers)));
        }
        match &self.body {
            RequestBody::FormData(data) | RequestBody::UrlEncoded(data) if !data.is_empty() => {
                line.push_str(&format!(" | data: \"{}\"", join_pairs(data)));
            }
            RequestBody::Json(json) => {
                line.push_str(&format!(" | json: \"{}\"", json.replace('\n', "")));
            }
            RequestBody::Binary(_) => line.push_str(" | uploadData"),
            _ => {}
        }
        line
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn join_pairs(pairs: &NameValues) -> String {
    pairs.iter().map(|(k, v)| format!("{}:{},", k, v)).collect()
}
