use std::time::Instant;

use hyper::ext::ReasonPhrase;
use indexmap::IndexMap;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::{debug, info, warn};

use crate::errors::{JurlError, Result};
use crate::http_request::{HttpMethod, Request, RequestBody};
use crate::http_response::{ContentKind, Response, ResponseContent};
use crate::request_body::{multipart_form, open_upload, url_encoded, JSON, OCTET_STREAM, URL_ENCODED};

/// Anything able to turn a request into a response. The orchestrator only
/// talks to this trait, which keeps it testable without a network.
pub trait RequestExecutor {
    fn execute(&self, request: &Request) -> Result<Response>;
}

/// Blocking reqwest clients, one per redirect policy, shared across requests.
pub struct ExecutionContext {
    following: Client,
    not_following: Client,
}

impl ExecutionContext {
    pub fn new() -> Result<ExecutionContext> {
        Ok(ExecutionContext {
            following: build_client(Policy::default())?,
            not_following: build_client(Policy::none())?,
        })
    }

    fn client(&self, follow_redirects: bool) -> &Client {
        if follow_redirects {
            &self.following
        } else {
            &self.not_following
        }
    }
}

fn build_client(policy: Policy) -> Result<Client> {
    Client::builder()
        .redirect(policy)
        .build()
        .map_err(|e| JurlError::Unreachable(format!("http client could not be initialised: {}", e)))
}

impl RequestExecutor for ExecutionContext {
    fn execute(&self, request: &Request) -> Result<Response> {
        execute_http_request(request, self)
    }
}

/// reqwest supports every verb natively, PATCH included.
impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

impl Request {
    pub fn uri(&self) -> Result<reqwest::Url> {
        let url = self
            .url
            .parse::<reqwest::Url>()
            .map_err(|e| JurlError::InvalidDestination(format!("{} ({})", self.url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(JurlError::InvalidDestination(format!(
                "{} (unsupported scheme {})",
                self.url, other
            ))),
        }
    }

    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (key, value) in &self.headers {
            let name = HeaderName::try_from(key.as_str())
                .map_err(|_| JurlError::parse(format!("invalid header name: {}", key)))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|_| JurlError::parse(format!("invalid value for header {}", key)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

fn with_default_content_type(mut headers: HeaderMap, content_type: &'static str) -> HeaderMap {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    headers
}

/// Attaches headers and the one body the request carries.
fn attach_body(builder: RequestBuilder, request: &Request) -> Result<RequestBuilder> {
    let mut headers = request.header_map()?;
    let builder = match &request.body {
        RequestBody::None => builder.headers(headers),
        RequestBody::FormData(data) => {
            // the multipart content type must carry the generated boundary
            headers.remove(CONTENT_TYPE);
            builder.headers(headers).multipart(multipart_form(data)?)
        }
        RequestBody::UrlEncoded(data) => builder
            .headers(with_default_content_type(headers, URL_ENCODED))
            .body(url_encoded(data)),
        RequestBody::Json(json) => builder
            .headers(with_default_content_type(headers, JSON))
            .body(json.clone()),
        RequestBody::Binary(path) => builder
            .headers(with_default_content_type(headers, OCTET_STREAM))
            .body(open_upload(path)?),
    };
    Ok(builder)
}

fn response_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut map: IndexMap<String, String> = IndexMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(name.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}

/// The reason phrase the server sent. hyper only keeps it when it differs
/// from the canonical one for the status.
fn status_message(res: &reqwest::blocking::Response) -> String {
    match res.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => res.status().canonical_reason().unwrap_or_default().to_string(),
    }
}

pub fn execute_http_request(request: &Request, context: &ExecutionContext) -> Result<Response> {
    let url = request.uri()?;
    info!(method = %request.method, %url, "executing request");

    let builder = context
        .client(request.follow_redirects)
        .request(request.method.into(), url);
    let builder = attach_body(builder, request)?;

    let started = Instant::now();
    let res = builder.send().map_err(|e| {
        if e.is_builder() {
            JurlError::InvalidDestination(e.to_string())
        } else {
            JurlError::Unreachable(e.to_string())
        }
    })?;
    let elapsed = started.elapsed();

    let status = res.status();
    let status_message = status_message(&res);
    let headers = response_headers(res.headers());
    let kind = ContentKind::from_content_type(headers.get(CONTENT_TYPE.as_str()).map(String::as_str));
    debug!(status = status.as_u16(), ?elapsed, %kind, "response received");

    let bytes = match res.bytes() {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            warn!(error = %e, "failed to read response body, continuing with an empty one");
            Vec::new()
        }
    };
    let size = bytes.len();
    let content = match kind {
        ContentKind::Picture => ResponseContent::Binary(bytes),
        ContentKind::Json | ContentKind::General => {
            ResponseContent::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
    };

    Ok(Response {
        headers,
        status_code: status.as_u16(),
        status_message,
        elapsed,
        size,
        kind,
        content,
    })
}
