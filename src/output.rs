use std::io::Write;

use crate::http_request::Request;
use crate::http_response::{ContentKind, Response};

/// Presentation boundary. The engine reports every terminal result through
/// exactly these five calls; a cli printer or a ui implements them.
pub trait OutputHandler {
    fn handle_output(&mut self, request: &Request, response: &Response);

    fn handle_help(&mut self, help: &str);

    fn output_group_names(&mut self, names: &[String]);

    fn output_saved_requests(&mut self, group: &str, requests: &[Request]);

    fn output_create_group(&mut self, name: &str);
}

/// Plain text printer used by the `jurl` binary.
pub struct ConsoleOutputHandler<W: Write> {
    out: W,
}

impl<W: Write> ConsoleOutputHandler<W> {
    pub fn new(out: W) -> Self {
        ConsoleOutputHandler { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // a closed stdout is not worth failing a finished request for
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl ConsoleOutputHandler<std::io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleOutputHandler::new(std::io::stdout())
    }
}

impl<W: Write> OutputHandler for ConsoleOutputHandler<W> {
    fn handle_output(&mut self, request: &Request, response: &Response) {
        self.line(&format!("Response Code: {}", response.status_code));
        self.line(&format!("Response Message: {}", response.status_message));
        self.line(&format!("Response Time: {}", response.elapsed_display()));
        self.line(&format!("Response Size: {}", response.size_display()));
        if request.show_response_headers {
            for (name, value) in &response.headers {
                self.line(&format!("{}: {}", name, value));
            }
        }
        self.line(&response.kind.to_string());
        if response.kind != ContentKind::Picture {
            if let Some(text) = response.content.as_text() {
                self.line(text);
            }
        }
    }

    fn handle_help(&mut self, help: &str) {
        self.line(help);
    }

    fn output_group_names(&mut self, names: &[String]) {
        for name in names {
            self.line(&format!("\"{}\"", name));
        }
    }

    fn output_saved_requests(&mut self, _group: &str, requests: &[Request]) {
        if requests.is_empty() {
            self.line("<No Request in Group>");
            return;
        }
        for (i, request) in requests.iter().enumerate() {
            self.line(&format!("{}. {}", i + 1, request.summary()));
        }
    }

    fn output_create_group(&mut self, name: &str) {
        self.line(&format!("{} created!", name));
    }
}
