//! Conversation management for pdfchat
//!
//! This crate holds one chat session: the ordered transcript, the relay that
//! streams a model reply into it, and PDF ingestion into the transcript.

pub mod relay;
pub mod session;
pub mod transcript;

pub use relay::{PartialReplyPolicy, ReplyStream, StreamingRelay, DEFAULT_CHANNEL_CAPACITY};
pub use session::ChatSession;
pub use transcript::Transcript;
