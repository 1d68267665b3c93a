use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "sk-test-api-key";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Mock server utilities for testing the streaming client
pub struct ProviderMockServer {
    server: MockServer,
}

#[allow(dead_code)]
impl ProviderMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// SSE body carrying one chunk per fragment followed by `[DONE]`
    pub fn sse_body(fragments: &[&str]) -> String {
        let mut body = String::new();
        body.push_str(&sse_event(&json!({
            "id": "chatcmpl-test",
            "object": "chat.completion.chunk",
            "choices": [{"index": 0, "delta": {"role": "assistant"}, "finish_reason": null}]
        })));
        for fragment in fragments {
            body.push_str(&sse_event(&json!({
                "id": "chatcmpl-test",
                "object": "chat.completion.chunk",
                "choices": [{"index": 0, "delta": {"content": fragment}, "finish_reason": null}]
            })));
        }
        body.push_str(&sse_event(&json!({
            "id": "chatcmpl-test",
            "object": "chat.completion.chunk",
            "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]
        })));
        body.push_str("data: [DONE]\n\n");
        body
    }

    /// Mock a successful streamed completion
    pub async fn mock_stream(&self, fragments: &[&str]) {
        self.mock_raw_sse(Self::sse_body(fragments)).await;
    }

    /// Mock a streamed completion with a hand-written SSE body
    pub async fn mock_raw_sse(&self, body: String) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&self.server)
            .await;
    }

    /// Mock an error response with an OpenAI-style error body
    pub async fn mock_error(&self, status: u16, error_type: &str, message: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": message,
                    "type": error_type,
                    "code": null
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a catch-all that fails verification if any request arrives
    pub async fn expect_no_requests(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    pub async fn received_request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

pub fn sse_event(value: &serde_json::Value) -> String {
    format!("data: {}\n\n", value)
}
