use pdfchat_types::{ContentBlock, Message, ModelConfig, Role};
use serde::{Deserialize, Serialize};

/// Message as it appears in the request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role(),
            content: msg.content().to_vec(),
        }
    }
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Message::new(wire.role, wire.content)
    }
}

/// Chat completions request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stream: Option<bool>,
}

impl ChatRequest {
    /// Streaming request carrying the whole history
    pub fn streaming(history: &[Message], config: &ModelConfig) -> Self {
        Self {
            model: config.model.clone(),
            messages: history.iter().map(WireMessage::from).collect(),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
            stream: Some(true),
        }
    }

    /// Rebuild transcript messages from the payload
    pub fn to_messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().map(Message::from).collect()
    }
}
