mod common;

use std::fs;
use std::path::{Path, PathBuf};

use jurl::{Config, ConsoleOutputHandler, ExecutionContext, Jurl, JurlError, RequestBody, RequestRepository};
use tempfile::TempDir;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::closed_port_url;

fn config(dir: &Path) -> Config {
    Config {
        store_path: dir.join("saved-requests.json"),
        output_dir: dir.to_path_buf(),
        verbose: false,
    }
}

/// One cli invocation: a fresh engine over the same store. Returns what the
/// console printer wrote.
async fn invoke(dir: &Path, args: &[&str]) -> jurl::Result<String> {
    let config = config(dir);
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let mut jurl = Jurl::new(&config, ConsoleOutputHandler::new(Vec::new()), ExecutionContext::new()?);
        jurl.run(&args)?;
        let printed = jurl.into_output_handler().into_inner();
        Ok(String::from_utf8_lossy(&printed).into_owned())
    })
    .await
    .expect("jurl thread panicked")
}

fn store(dir: &Path) -> RequestRepository {
    let mut repository = RequestRepository::new(dir.join("saved-requests.json"));
    repository.load().unwrap();
    repository
}

#[tokio::test(flavor = "multi_thread")]
async fn execute_prints_response() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(body_string(r#"{"x":1}"#))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"echo":1}"#, "application/json"))
        .mount(&server)
        .await;

    let url = format!("{}/echo", server.uri());
    let printed = invoke(dir.path(), &[&url, "-M", "POST", "-j", r#"{"x":1}"#, "-i"])
        .await
        .unwrap();

    assert!(printed.starts_with("Response Code: 200\nResponse Message: OK\n"), "{}", printed);
    assert!(printed.contains("Response Size: 10 B\n"));
    assert!(printed.contains("content-type: application/json\n"));
    assert!(printed.ends_with("Json\n{\"echo\":1}\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn saved_requests_survive_between_invocations_and_fire() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("from a"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/b"))
        .and(body_string("k=v"))
        .respond_with(ResponseTemplate::new(201).set_body_string("from b"))
        .expect(2)
        .mount(&server)
        .await;

    let a = format!("{}/a", server.uri());
    let b = format!("{}/b", server.uri());
    invoke(dir.path(), &["create", "api"]).await.unwrap();
    invoke(dir.path(), &[&a, "-S", "api"]).await.unwrap();
    invoke(dir.path(), &[&b, "-M", "POST", "-d", "k=v", "-S", "api"]).await.unwrap();

    let listed = invoke(dir.path(), &["list", "api"]).await.unwrap();
    assert_eq!(
        listed,
        format!("1. url: {} | method: GET\n2. url: {} | method: POST | data: \"k:v,\"\n", a, b)
    );
    assert_eq!(invoke(dir.path(), &["list"]).await.unwrap(), "\"api\"\n");

    let fired = invoke(dir.path(), &["fire", "api", "2", "1", "2"]).await.unwrap();
    let first = fired.find("from a").expect("first response printed");
    let second = fired.find("from b").expect("second response printed");
    assert!(first < second, "ordinals fire in ascending order: {}", fired);

    let saved = store(dir.path());
    assert_eq!(saved.group_requests("api").len(), 2);
    assert!(matches!(saved.group_requests("api")[1].body, RequestBody::UrlEncoded(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn fire_with_missing_ordinal_is_not_found() {
    let dir = TempDir::new().unwrap();
    invoke(dir.path(), &["create", "groupA"]).await.unwrap();
    {
        let mut repository = store(dir.path());
        repository.save("groupA", jurl::Request::new("", "http://127.0.0.1:9/one")).unwrap();
        repository.save("groupA", jurl::Request::new("", "http://127.0.0.1:9/two")).unwrap();
    }

    match invoke(dir.path(), &["fire", "groupA", "1", "3"]).await {
        Err(JurlError::NotFound(msg)) => assert_eq!(msg, "invalid request number 3"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn save_happens_even_when_destination_is_down() {
    let dir = TempDir::new().unwrap();
    let url = closed_port_url();

    let result = invoke(dir.path(), &[&url, "-S", "later"]).await;
    assert!(matches!(result, Err(JurlError::Unreachable(_))));
    assert_eq!(store(dir.path()).group_requests("later").len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn output_flag_writes_response_to_file() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("saved body"))
        .mount(&server)
        .await;

    invoke(dir.path(), &[&server.uri(), "-O", "body.txt"]).await.unwrap();
    let written: PathBuf = dir.path().join("body.txt");
    assert_eq!(fs::read_to_string(written).unwrap(), "saved body");
}

#[tokio::test(flavor = "multi_thread")]
async fn help_is_printed() {
    let dir = TempDir::new().unwrap();
    let printed = invoke(dir.path(), &["-h"]).await.unwrap();
    assert!(printed.starts_with("Usage: jurl <url> [options...]"));
}
