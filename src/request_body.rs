use std::fs::File;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::multipart::Form;

use crate::errors::{JurlError, Result};
use crate::http_request::NameValues;

pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const OCTET_STREAM: &str = "application/octet-stream";
pub const JSON: &str = "application/json";
pub const URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Form encoding keeps `*-._` and alphanumerics; a space becomes `+`.
const FORM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b' ');

fn form_encode(text: &str) -> String {
    utf8_percent_encode(text, FORM).to_string().replace(' ', "+")
}

/// `k=v` pairs joined by `&`, both sides percent-encoded.
pub fn url_encoded(data: &NameValues) -> String {
    data.iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Keys containing `file` are read from the path in their value, everything
/// else is a plain text field. Every form gets its own boundary.
pub fn multipart_form(data: &NameValues) -> Result<Form> {
    let mut form = Form::new();
    for (key, value) in data {
        form = if is_file_part(key) {
            form.file(key.clone(), value)
                .map_err(|e| JurlError::io("failed to read form file", value, e))?
        } else {
            form.text(key.clone(), value.clone())
        };
    }
    Ok(form)
}

pub fn is_file_part(key: &str) -> bool {
    key.contains("file")
}

pub fn open_upload(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| JurlError::io("failed to open upload file", path, e))
}
