use std::path::Path;
use uuid::Uuid;

use pdfchat_pdf::TextExtractor;
use pdfchat_types::{Message, ModelChoice, ModelConfig, Result};

use crate::relay::{ReplyStream, StreamingRelay};
use crate::transcript::Transcript;

/// State of one user session: the transcript plus the model settings
/// chosen for the next request.
///
/// Created empty, mutated through `&mut self`, discarded on drop.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    transcript: Transcript,
    config: ModelConfig,
}

impl ChatSession {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript::new(),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn set_model(&mut self, model: &ModelChoice) {
        self.config.model = model.as_str();
    }

    /// Rejects values outside `[0.0, 2.0]`; the previous value is kept then.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<f64> {
        self.config = self.config.clone().with_temperature(temperature)?;
        Ok(self.config.temperature)
    }

    pub fn add_user_text(&mut self, text: impl Into<String>) {
        self.transcript.append(Message::user_text(text));
    }

    /// Extract the document text and add it as a user message.
    ///
    /// Returns the number of characters added. On failure the transcript is
    /// left untouched.
    pub fn ingest_pdf(&mut self, bytes: &[u8], extractor: &dyn TextExtractor) -> Result<usize> {
        let text = extractor.extract(bytes)?;
        let chars = text.chars().count();
        self.transcript.append(Message::user_text(text));
        Ok(chars)
    }

    pub async fn ingest_pdf_file(&mut self, path: &Path, extractor: &dyn TextExtractor) -> Result<usize> {
        let bytes = tokio::fs::read(path).await?;
        self.ingest_pdf(&bytes, extractor)
    }

    pub fn reset(&mut self) {
        self.transcript.reset();
    }

    /// Ask the model for the next assistant message
    pub fn stream_reply<'a>(&'a mut self, relay: &StreamingRelay) -> ReplyStream<'a> {
        relay.start(&mut self.transcript, &self.config)
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfchat_types::{ChatError, Role};
    use pretty_assertions::assert_eq;

    struct FixedExtractor(&'static str);

    impl TextExtractor for FixedExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenExtractor;

    impl TextExtractor for BrokenExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Err(ChatError::Extraction("bad xref table".to_string()))
        }
    }

    #[test]
    fn test_new_session_is_empty_with_defaults() {
        let session = ChatSession::new(ModelConfig::default());
        assert!(session.transcript().is_empty());
        assert_eq!(session.config().model, "gpt-4-turbo");
    }

    #[test]
    fn test_pdf_text_becomes_user_message() {
        let mut session = ChatSession::new(ModelConfig::default());
        let added = session.ingest_pdf(b"%PDF-1.5", &FixedExtractor("Page one.Page two.")).unwrap();

        assert_eq!(added, 18);
        let message = session.transcript().last().unwrap();
        assert_eq!(message.role(), Role::User);
        assert_eq!(message.text(), "Page one.Page two.");
    }

    #[test]
    fn test_failed_extraction_leaves_transcript_alone() {
        let mut session = ChatSession::new(ModelConfig::default());
        session.add_user_text("hello");

        let err = session.ingest_pdf(b"garbage", &BrokenExtractor).unwrap_err();
        assert!(matches!(err, ChatError::Extraction(_)));
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_pdf_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut session = ChatSession::new(ModelConfig::default());

        let err = session
            .ingest_pdf_file(&dir.path().join("missing.pdf"), &FixedExtractor("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Io(_)));
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_settings_change_between_requests() {
        let mut session = ChatSession::new(ModelConfig::default());
        session.set_model(&ModelChoice::Gpt4_32k);
        assert_eq!(session.set_temperature(1.04).unwrap(), 1.0);
        assert!(session.set_temperature(3.0).is_err());

        assert_eq!(session.config().model, "gpt-4-32k");
        assert_eq!(session.config().temperature, 1.0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut session = ChatSession::new(ModelConfig::default());
        session.add_user_text("a");
        session.add_user_text("b");
        session.reset();
        assert!(session.transcript().all().is_empty());
    }
}
