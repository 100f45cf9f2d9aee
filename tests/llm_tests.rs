/// Integration tests for the AI layer.
///
/// Unit tests for prompts and response decoding live in each file's
/// `#[cfg(test)]` block. These tests exercise cross-module behavior:
///
/// - Pipeline ordering with a recording mock generator
/// - Error text surfaced in place of generated content
/// - The HTTP client against a loopback stub of the `generateContent` endpoint
///
/// No test talks to the real API.
use std::io::Read;
use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;

use supportlens::analysis::{self, RawInputs};
use supportlens::config::schema::AiConfig;
use supportlens::error::RemoteCallError;
use supportlens::llm::{self, TextGenerator, gemini::GeminiClient, prompts};

// ---------------------------------------------------------------------------
// Mock generator
// ---------------------------------------------------------------------------

/// Answers from a queue and records every prompt it saw.
struct Recording {
    replies: Mutex<Vec<Result<String, RemoteCallError>>>,
    prompts: Mutex<Vec<String>>,
}

impl Recording {
    fn new(replies: Vec<Result<String, RemoteCallError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for Recording {
    fn generate(&self, prompt: &str) -> Result<String, RemoteCallError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(RemoteCallError::UnexpectedFormat))
    }
}

fn sample_dataset() -> analysis::Dataset {
    analysis::analyze(&RawInputs {
        keywords: String::new(),
        trending: "Term\tSearches\tCTR\npush\t79\t59.50%\npip\t50\t58%".to_string(),
        topics: "Topic\tViews\nI can't push\t266\n403 error\t190".to_string(),
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn recommendations_are_built_from_the_summary() {
    let generator = Recording::new(vec![
        Ok("Users struggle to push.".to_string()),
        Ok("1. Document tokens.".to_string()),
    ]);
    let mut prompts_before_step_two = 0;
    let outcome = llm::run_analysis_pipeline(&generator, &sample_dataset(), 5, |_| {
        prompts_before_step_two = generator.prompts().len();
    });

    assert_eq!(outcome.summary.display_text(), "Users struggle to push.");
    assert_eq!(outcome.recommendations.display_text(), "1. Document tokens.");
    assert_eq!(prompts_before_step_two, 1);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("Top viewed topics: 'I can't push' (266 views), '403 error' (190 views)."));
    assert!(prompts[0].contains("Top search terms: 'push' (79 searches), 'pip' (50 searches)."));
    assert!(prompts[1].contains("\"Users struggle to push.\""));
}

#[test]
fn failed_summary_text_feeds_recommendations() {
    let generator = Recording::new(vec![
        Err(RemoteCallError::Status { status: 500 }),
        Ok("1. Check the service status.".to_string()),
    ]);
    let outcome = llm::run_analysis_pipeline(&generator, &sample_dataset(), 5, |_| {});

    assert_eq!(
        outcome.summary.display_text(),
        "Error: API request failed with status 500"
    );
    assert_eq!(
        outcome.recommendations.display_text(),
        "1. Check the service status."
    );

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("\"Error: API request failed with status 500\""));
}

#[test]
fn failed_recommendations_keep_the_summary() {
    let generator = Recording::new(vec![
        Ok("Summary.".to_string()),
        Err(RemoteCallError::Transport("connection refused".to_string())),
    ]);
    let outcome = llm::run_analysis_pipeline(&generator, &sample_dataset(), 5, |_| {});

    assert!(outcome.summary.is_success());
    assert_eq!(
        outcome.recommendations.display_text(),
        "Error: connection refused"
    );
}

#[test]
fn summary_uses_only_top_n_rows() {
    let generator = Recording::new(vec![Ok("s".to_string()), Ok("r".to_string())]);
    llm::run_analysis_pipeline(&generator, &sample_dataset(), 1, |_| {});

    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("'I can't push' (266 views)."));
    assert!(!prompt.contains("403 error"));
}

#[test]
fn explanation_prompt_names_the_topic() {
    let generator = Recording::new(vec![Ok("Because.".to_string())]);
    let outcome = llm::explain_topic(&generator, "403 error");

    assert_eq!(outcome.display_text(), "Because.");
    assert_eq!(generator.prompts()[0], prompts::explanation_prompt("403 error"));
    assert!(generator.prompts()[0].ends_with("The topic is: \"403 error\""));
}

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

#[test]
fn generator_needs_enabled_ai_and_key() {
    let mut config = AiConfig {
        api_key: String::new(),
        ..AiConfig::default()
    };
    assert_eq!(
        llm::generator_from_config(&config).unwrap_err(),
        RemoteCallError::MissingApiKey
    );

    config.api_key = "k".to_string();
    config.enabled = false;
    assert_eq!(
        llm::generator_from_config(&config).unwrap_err(),
        RemoteCallError::Disabled
    );

    config.enabled = true;
    let client = llm::generator_from_config(&config).unwrap();
    assert_eq!(
        client.endpoint(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    );
}

// ---------------------------------------------------------------------------
// HTTP client against a loopback stub
// ---------------------------------------------------------------------------

/// What the stub saw: request URL and body.
type Seen = (String, String);

/// Serve exactly one request with the given status and body.
fn one_shot_stub(status: u16, body: &'static str) -> (String, mpsc::Receiver<Seen>) {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let server = tiny_http::Server::http(addr).unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let mut received = String::new();
            let _ = request.as_reader().read_to_string(&mut received);
            let _ = tx.send((request.url().to_string(), received));
            let response = tiny_http::Response::from_string(body)
                .with_status_code(tiny_http::StatusCode(status));
            let _ = request.respond(response);
        }
    });

    (format!("http://{addr}/v1beta"), rx)
}

fn client_for(api_base: String) -> GeminiClient {
    GeminiClient::from_config(&AiConfig {
        api_base,
        api_key: "test-key".to_string(),
        ..AiConfig::default()
    })
}

#[test]
fn client_sends_single_user_turn_and_reads_first_text() {
    let (base, seen) = one_shot_stub(
        200,
        r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#,
    );
    let client = client_for(base);

    assert_eq!(client.generate("hi there").unwrap(), "hello");

    let (url, body) = seen.recv().unwrap();
    assert_eq!(
        url,
        "/v1beta/models/gemini-2.0-flash:generateContent?key=test-key"
    );
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hi there" }] }]
        })
    );
}

#[test]
fn client_maps_non_success_status() {
    let (base, _seen) = one_shot_stub(429, r#"{"error":"quota"}"#);
    assert_eq!(
        client_for(base).generate("x").unwrap_err(),
        RemoteCallError::Status { status: 429 }
    );
}

#[test]
fn client_rejects_body_without_candidates() {
    let (base, _seen) = one_shot_stub(200, r#"{"promptFeedback":{}}"#);
    assert_eq!(
        client_for(base).generate("x").unwrap_err(),
        RemoteCallError::UnexpectedFormat
    );
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let err = client_for(format!("http://{addr}")).generate("x").unwrap_err();
    assert!(matches!(err, RemoteCallError::Transport(_)));
}
