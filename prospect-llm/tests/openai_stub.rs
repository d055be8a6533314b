//! OpenAI client against a local wiremock stub.

use prospect_llm::{LlmClient, OpenAiClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn responses_body(text: &str) -> serde_json::Value {
    json!({
        "model": "gpt-4o",
        "output": [{
            "content": [
                {"type": "reasoning", "text": ""},
                {"type": "output_text", "text": text}
            ]
        }],
        "usage": {"total_tokens": 42}
    })
}

#[tokio::test]
async fn generate_extracts_output_text_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(responses_body("hello there")))
        .mount(&server)
        .await;

    let client =
        OpenAiClient::with_base_url(&server.uri(), "test-key".into(), "gpt-4o".into()).unwrap();
    let resp = client.generate("hi", None, None, None).await.unwrap();

    assert_eq!(resp.text, "hello there");
    assert_eq!(resp.model.as_deref(), Some("gpt-4o"));
    assert_eq!(resp.tokens_used, Some(42));
}

#[tokio::test]
async fn generate_list_parses_bulleted_model_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(responses_body("- what is a frontier\n- why budgets")),
        )
        .mount(&server)
        .await;

    let client =
        OpenAiClient::with_base_url(&server.uri(), "test-key".into(), "gpt-4o".into()).unwrap();
    let items = client.generate_list("suggest", "system").await.unwrap();

    assert_eq!(items, vec!["what is a frontier", "why budgets"]);
}

#[tokio::test]
async fn server_errors_surface_as_capability_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(401).set_body_string("no key"))
        .mount(&server)
        .await;

    let client =
        OpenAiClient::with_base_url(&server.uri(), "bad-key".into(), "gpt-4o".into()).unwrap();
    let err = client.generate("hi", None, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        prospect_common::ProspectError::Capability(_)
    ));
}
