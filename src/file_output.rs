use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::errors::{JurlError, Result};
use crate::http_request::{OutputTarget, Request};
use crate::http_response::Response;

/// Writes the response body next to the run when the request asked for it.
/// Returns the written path, or `None` when output is disabled.
pub fn handle_file_output(request: &Request, response: &Response, output_dir: &Path) -> Result<Option<PathBuf>> {
    let path = match &request.output {
        OutputTarget::Disabled => return Ok(None),
        OutputTarget::Named(name) => output_dir.join(name),
        OutputTarget::Generated => output_dir.join(generated_name()),
    };
    // pictures are kept as raw bytes, text keeps its utf-8 encoding
    fs::write(&path, response.content.as_bytes())
        .map_err(|e| JurlError::io("failed to save output", &path, e))?;
    info!(path = %path.display(), bytes = response.content.as_bytes().len(), "response written to file");
    Ok(Some(path))
}

fn generated_name() -> String {
    format!("output_{}", Local::now().format("%Y%m%dT%H%M%S%3f"))
}
