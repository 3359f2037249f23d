use std::path::PathBuf;

use tracing::{debug, info};

use crate::command_parser::{parse_command, Command, ParseContext};
use crate::config::Config;
use crate::errors::{JurlError, Result};
use crate::file_output::handle_file_output;
use crate::help::HELP;
use crate::http_request::Request;
use crate::http_request_executor::RequestExecutor;
use crate::output::OutputHandler;
use crate::request_repository::RequestRepository;

/// Runs one command per call: load the store, parse, dispatch, report.
pub struct Jurl<O: OutputHandler, E: RequestExecutor> {
    output_handler: O,
    executor: E,
    repository: RequestRepository,
    output_dir: PathBuf,
}

impl<O: OutputHandler, E: RequestExecutor> Jurl<O, E> {
    pub fn new(config: &Config, output_handler: O, executor: E) -> Self {
        Jurl {
            output_handler,
            executor,
            repository: RequestRepository::new(config.store_path.clone()),
            output_dir: config.output_dir.clone(),
        }
    }

    pub fn output_handler(&self) -> &O {
        &self.output_handler
    }

    pub fn into_output_handler(self) -> O {
        self.output_handler
    }

    pub fn repository(&self) -> &RequestRepository {
        &self.repository
    }

    pub fn run<S: AsRef<str>>(&mut self, args: &[S]) -> Result<()> {
        self.run_with_context(&ParseContext::default(), args)
    }

    pub fn run_with_context<S: AsRef<str>>(&mut self, context: &ParseContext, args: &[S]) -> Result<()> {
        self.repository.load()?;
        let command = parse_command(context, args)?;

        match command {
            Command::ListGroups => {
                let names = self.repository.all_group_names();
                self.output_handler.output_group_names(&names);
            }
            Command::ListGroupRequests(group) => {
                let requests = self.repository.group_requests(&group);
                self.output_handler.output_saved_requests(&group, requests);
            }
            Command::CreateGroup(group) => {
                self.repository.create_group(&group)?;
                info!(%group, "group created");
                self.output_handler.output_create_group(&group);
            }
            Command::Fire { group, ordinals } => {
                let requests = self.repository.requests(&group, &ordinals)?;
                debug!(%group, count = requests.len(), "firing saved requests");
                for request in &requests {
                    self.execute_and_report(request)?;
                }
            }
            Command::Help => self.output_handler.handle_help(HELP),
            Command::Execute { request, save } => {
                if save {
                    self.save(&request)?;
                }
                self.execute_and_report(&request)?;
            }
        }
        Ok(())
    }

    fn save(&mut self, request: &Request) -> Result<()> {
        if !request.name.is_empty() && self.repository.contains_request(&request.group, &request.name) {
            return Err(JurlError::AlreadyExists(format!(
                "request \"{}\" already exists in group \"{}\"",
                request.name, request.group
            )));
        }
        self.repository.save(&request.group, request.clone())?;
        info!(group = %request.group, "request saved");
        Ok(())
    }

    fn execute_and_report(&mut self, request: &Request) -> Result<()> {
        let response = self.executor.execute(request)?;
        handle_file_output(request, &response, &self.output_dir)?;
        self.output_handler.handle_output(request, &response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_response::{ContentKind, Response, ResponseContent};
    use indexmap::IndexMap;
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl OutputHandler for Recorder {
        fn handle_output(&mut self, request: &Request, response: &Response) {
            self.events.push(format!("output {} {}", request.url, response.status_code));
        }

        fn handle_help(&mut self, _help: &str) {
            self.events.push("help".into());
        }

        fn output_group_names(&mut self, names: &[String]) {
            self.events.push(format!("groups {}", names.join(",")));
        }

        fn output_saved_requests(&mut self, group: &str, requests: &[Request]) {
            self.events.push(format!("requests {} {}", group, requests.len()));
        }

        fn output_create_group(&mut self, name: &str) {
            self.events.push(format!("created {}", name));
        }
    }

    /// Answers 200 for every url except those containing `down`.
    #[derive(Default)]
    struct FakeExecutor {
        calls: RefCell<Vec<String>>,
    }

    impl RequestExecutor for FakeExecutor {
        fn execute(&self, request: &Request) -> Result<Response> {
            self.calls.borrow_mut().push(request.url.clone());
            if request.url.contains("down") {
                return Err(JurlError::Unreachable(request.url.clone()));
            }
            Ok(Response {
                headers: IndexMap::new(),
                status_code: 200,
                status_message: "OK".into(),
                elapsed: Duration::from_millis(1),
                size: 2,
                kind: ContentKind::General,
                content: ResponseContent::Text("ok".into()),
            })
        }
    }

    fn jurl(dir: &TempDir) -> Jurl<Recorder, FakeExecutor> {
        let config = Config {
            store_path: dir.path().join("store.json"),
            output_dir: dir.path().to_path_buf(),
            verbose: false,
        };
        Jurl::new(&config, Recorder::default(), FakeExecutor::default())
    }

    fn events(jurl: &Jurl<Recorder, FakeExecutor>) -> Vec<String> {
        jurl.output_handler().events.clone()
    }

    #[test]
    fn create_and_list_groups() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["create", "a"]).unwrap();
        app.run(&["create", "b"]).unwrap();
        app.run(&["list"]).unwrap();
        assert_eq!(events(&app), vec!["created a", "created b", "groups a,b"]);
        assert!(matches!(app.run(&["create", "a"]), Err(JurlError::AlreadyExists(_))));
    }

    #[test]
    fn save_persists_before_executing() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["down.example", "-S", "g"]).unwrap_err();
        assert_eq!(app.repository().group_requests("g").len(), 1);

        app.run(&["list", "g"]).unwrap();
        assert_eq!(events(&app), vec!["requests g 1"]);
    }

    #[test]
    fn execute_without_save_leaves_store_alone() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["example.com", "-M", "DELETE"]).unwrap();
        assert_eq!(events(&app), vec!["output http://example.com 200"]);
        assert!(!dir.path().join("store.json").exists());
    }

    #[test]
    fn fire_runs_in_ascending_order() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["one", "-S", "g"]).unwrap();
        app.run(&["two", "-S", "g"]).unwrap();
        app.run(&["three", "-S", "g"]).unwrap();
        app.executor.calls.borrow_mut().clear();

        app.run(&["fire", "g", "3", "1"]).unwrap();
        assert_eq!(*app.executor.calls.borrow(), vec!["http://one", "http://three"]);
    }

    #[test]
    fn fire_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["down.one", "-S", "g"]).unwrap_err();
        app.run(&["up.two", "-S", "g"]).unwrap();
        app.executor.calls.borrow_mut().clear();

        assert!(matches!(app.run(&["fire", "g", "1", "2"]), Err(JurlError::Unreachable(_))));
        assert_eq!(*app.executor.calls.borrow(), vec!["http://down.one"]);
    }

    #[test]
    fn fire_out_of_range_executes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["one", "-S", "groupA"]).unwrap();
        app.run(&["two", "-S", "groupA"]).unwrap();
        app.executor.calls.borrow_mut().clear();

        match app.run(&["fire", "groupA", "1", "3"]) {
            Err(JurlError::NotFound(msg)) => assert_eq!(msg, "invalid request number 3"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(app.executor.calls.borrow().is_empty());
    }

    #[test]
    fn named_request_collision_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        let context = ParseContext {
            request_name: "login".into(),
            ..ParseContext::default()
        };
        app.run_with_context(&context, &["example.com", "-S", "g"]).unwrap();
        assert!(matches!(
            app.run_with_context(&context, &["example.com", "-S", "g"]),
            Err(JurlError::AlreadyExists(_))
        ));
        assert_eq!(app.repository().group_requests("g").len(), 1);
    }

    #[test]
    fn unsendable_header_is_never_saved() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        assert!(matches!(
            app.run(&["example.com", "-H", "bad header:x", "-S", "g"]),
            Err(JurlError::Parse(_))
        ));
        assert!(app.repository().group_requests("g").is_empty());
        assert!(app.executor.calls.borrow().is_empty());
    }

    #[test]
    fn output_flag_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["example.com", "-O", "body.txt"]).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("body.txt")).unwrap(), "ok");
    }

    #[test]
    fn help_and_parse_errors() {
        let dir = TempDir::new().unwrap();
        let mut app = jurl(&dir);
        app.run(&["--help"]).unwrap();
        assert_eq!(events(&app), vec!["help"]);
        assert!(matches!(app.run(&["x", "-d", "a=1", "-j", "{}"]), Err(JurlError::Parse(_))));
    }

    #[test]
    fn corrupt_store_fails_every_command() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("store.json"), "{").unwrap();
        let mut app = jurl(&dir);
        assert!(matches!(app.run(&["list"]), Err(JurlError::CorruptStore(_))));
    }
}
