//! Streaming relay between the transcript and the model provider.
//!
//! A producer task reads the provider stream and pushes each item into a
//! bounded channel. The [`ReplyStream`] consumer forwards non-empty fragments
//! to the caller, accumulates them, and appends the assembled assistant
//! message to the transcript once the provider signals the end of the reply.
//!
//! The commit happens at most once per turn. What happens to text received
//! before a failure or cancellation is decided by [`PartialReplyPolicy`].

use futures::{ready, Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pdfchat_llm_api::LlmClient;
use pdfchat_models::ChatRequest;
use pdfchat_types::{ChatError, Message, ModelConfig, Result};

use crate::transcript::Transcript;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// What to do with text already received when a reply does not complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartialReplyPolicy {
    /// Nothing is appended
    #[default]
    Discard,
    /// The text received so far is appended as one assistant message,
    /// unless it is empty
    Persist,
}

impl PartialReplyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartialReplyPolicy::Discard => "discard",
            PartialReplyPolicy::Persist => "persist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "discard" | "drop" => Some(PartialReplyPolicy::Discard),
            "persist" | "keep" => Some(PartialReplyPolicy::Persist),
            _ => None,
        }
    }
}

impl fmt::Display for PartialReplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Items passed from the producer task to the consumer
enum Relayed {
    Fragment(String),
    Failed(ChatError),
    Done,
}

/// Issues streaming requests on behalf of a session
#[derive(Clone)]
pub struct StreamingRelay {
    client: Arc<dyn LlmClient>,
    policy: PartialReplyPolicy,
    channel_capacity: usize,
}

impl StreamingRelay {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            policy: PartialReplyPolicy::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_partial_policy(mut self, policy: PartialReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn partial_policy(&self) -> PartialReplyPolicy {
        self.policy
    }

    /// Start one assistant turn over the full transcript.
    ///
    /// The returned stream borrows the transcript mutably until it is
    /// dropped, so nothing else can touch the history mid-turn. Must be
    /// called from within a Tokio runtime.
    pub fn start<'a>(&self, transcript: &'a mut Transcript, config: &ModelConfig) -> ReplyStream<'a> {
        let request = ChatRequest::streaming(transcript.all(), config);
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let client = Arc::clone(&self.client);

        let producer = tokio::spawn(async move {
            let mut upstream = match client.chat_streaming(request).await {
                Ok(upstream) => upstream,
                Err(err) => {
                    let _ = tx.send(Relayed::Failed(err)).await;
                    return;
                }
            };

            while let Some(item) = upstream.next().await {
                let (relayed, last) = match item {
                    Ok(fragment) => (Relayed::Fragment(fragment), false),
                    Err(err) => (Relayed::Failed(err), true),
                };
                // A closed channel means the consumer went away.
                if tx.send(relayed).await.is_err() || last {
                    return;
                }
            }

            let _ = tx.send(Relayed::Done).await;
        });

        ReplyStream {
            rx,
            transcript,
            assembled: String::new(),
            fragments: 0,
            finished: false,
            committed: false,
            policy: self.policy,
            producer,
        }
    }
}

/// Fragments of one assistant reply, in arrival order.
///
/// Finite and single-pass: after it has returned `None` it keeps returning
/// `None`. Errors are yielded once and end the stream.
pub struct ReplyStream<'a> {
    rx: mpsc::Receiver<Relayed>,
    transcript: &'a mut Transcript,
    assembled: String,
    fragments: usize,
    finished: bool,
    committed: bool,
    policy: PartialReplyPolicy,
    producer: JoinHandle<()>,
}

impl ReplyStream<'_> {
    /// Text forwarded so far
    pub fn assembled(&self) -> &str {
        &self.assembled
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Whether an assistant message has been appended for this turn
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the stream, handing each fragment to `on_fragment`.
    /// Returns the assembled reply text.
    pub async fn drain<F>(mut self, mut on_fragment: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        while let Some(fragment) = self.next().await {
            on_fragment(&fragment?);
        }
        Ok(std::mem::take(&mut self.assembled))
    }

    fn complete(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.committed = true;
        self.transcript
            .append(Message::assistant_text(self.assembled.clone()));
    }

    fn abandon(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.policy == PartialReplyPolicy::Persist && !self.assembled.is_empty() {
            self.committed = true;
            self.transcript
                .append(Message::assistant_text(self.assembled.clone()));
        }
    }
}

impl Stream for ReplyStream<'_> {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            match ready!(this.rx.poll_recv(cx)) {
                Some(Relayed::Fragment(fragment)) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    this.fragments += 1;
                    this.assembled.push_str(&fragment);
                    return Poll::Ready(Some(Ok(fragment)));
                }
                Some(Relayed::Failed(err)) => {
                    this.abandon();
                    return Poll::Ready(Some(Err(err)));
                }
                Some(Relayed::Done) => {
                    this.complete();
                    return Poll::Ready(None);
                }
                None => {
                    // Producer ended without a verdict (panicked or aborted)
                    this.abandon();
                    return Poll::Ready(Some(Err(ChatError::provider(
                        None,
                        "reply stream ended unexpectedly",
                    ))));
                }
            }
        }
    }
}

impl Drop for ReplyStream<'_> {
    fn drop(&mut self) {
        self.producer.abort();
        self.abandon();
    }
}
