#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pdfchat_llm_api::{FragmentStream, LlmClient};
use pdfchat_models::ChatRequest;
use pdfchat_types::{ChatError, Result};

/// One scripted item of a provider reply
#[derive(Debug, Clone)]
pub enum Step {
    Fragment(&'static str),
    Fail(&'static str),
}

/// In-memory provider that replays a fixed script
pub struct ScriptedClient {
    steps: Vec<Step>,
    reject: Option<&'static str>,
    hang_after: bool,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            reject: None,
            hang_after: false,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn fragments(fragments: &[&'static str]) -> Self {
        Self::new(fragments.iter().map(|f| Step::Fragment(f)).collect())
    }

    /// Fail before any byte of the reply, like a refused connection
    pub fn rejecting(message: &'static str) -> Self {
        let mut client = Self::new(Vec::new());
        client.reject = Some(message);
        client
    }

    /// Never finish after the scripted steps, like a stalled connection
    pub fn hanging(mut self) -> Self {
        self.hang_after = true;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_streaming(&self, request: ChatRequest) -> Result<FragmentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        if let Some(message) = self.reject {
            return Err(ChatError::Network(message.to_string()));
        }

        let items: Vec<Result<String>> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Fragment(text) => Ok(text.to_string()),
                Step::Fail(message) => Err(ChatError::provider(Some(500), *message)),
            })
            .collect();

        let scripted = stream::iter(items);
        if self.hang_after {
            Ok(scripted.chain(stream::pending()).boxed())
        } else {
            Ok(scripted.boxed())
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
