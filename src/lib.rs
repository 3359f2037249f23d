//! jurl: a command driven http client.
//!
//! An argument vector is parsed into a [`Command`](command_parser::Command),
//! requests are executed with a blocking reqwest client, saved requests live
//! in a json store grouped by name, and every result is handed to an
//! [`OutputHandler`](output::OutputHandler).

pub mod command_parser;
pub mod config;
pub mod errors;
pub mod execute;
pub mod file_output;
pub mod help;
pub mod http_request;
pub mod http_request_executor;
pub mod http_response;
pub mod json_validator;
pub mod logging;
pub mod output;
pub mod request_body;
pub mod request_repository;

pub use command_parser::{parse_command, Command, ParseContext};
pub use config::Config;
pub use errors::{JurlError, Result};
pub use execute::Jurl;
pub use http_request::{BodyType, HttpMethod, OutputTarget, Request, RequestBody};
pub use http_request_executor::{ExecutionContext, RequestExecutor};
pub use http_response::{ContentKind, Response, ResponseContent};
pub use json_validator::is_valid_json;
pub use output::{ConsoleOutputHandler, OutputHandler};
pub use request_repository::RequestRepository;
