//! Core types and structures for pdfchat
//!
//! This crate provides the foundational types used across all pdfchat crates:
//! the chat message model, per-request model configuration, the validated
//! credential type and the shared error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

mod credential;
mod error;

pub use credential::{ApiKey, API_KEY_MARKER};
pub use error::{ChatError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Model used when none is selected
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Sampling temperature used when none is selected
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Fixed upper bound on generated tokens per reply
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Granularity of the temperature control
pub const TEMPERATURE_STEP: f64 = 0.1;

// ============================================================================
// Model Types
// ============================================================================

/// Models offered by the model selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelChoice {
    Gpt4Turbo,
    Gpt35Turbo16k,
    Gpt4,
    Gpt4_32k,
    Custom(String),
}

impl ModelChoice {
    /// The fixed list, in selector order. The first entry is the default.
    pub fn all() -> [ModelChoice; 4] {
        [
            ModelChoice::Gpt4Turbo,
            ModelChoice::Gpt35Turbo16k,
            ModelChoice::Gpt4,
            ModelChoice::Gpt4_32k,
        ]
    }

    pub fn as_str(&self) -> String {
        match self {
            ModelChoice::Gpt4Turbo => "gpt-4-turbo".to_string(),
            ModelChoice::Gpt35Turbo16k => "gpt-3.5-turbo-16k".to_string(),
            ModelChoice::Gpt4 => "gpt-4".to_string(),
            ModelChoice::Gpt4_32k => "gpt-4-32k".to_string(),
            ModelChoice::Custom(name) => name.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            ModelChoice::Gpt4Turbo => "GPT-4 Turbo".to_string(),
            ModelChoice::Gpt35Turbo16k => "GPT-3.5 Turbo 16k".to_string(),
            ModelChoice::Gpt4 => "GPT-4".to_string(),
            ModelChoice::Gpt4_32k => "GPT-4 32k".to_string(),
            ModelChoice::Custom(name) => name.clone(),
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gpt-4-turbo" | "gpt4-turbo" | "gpt-4turbo" => ModelChoice::Gpt4Turbo,
            "gpt-3.5-turbo-16k" | "gpt-35-turbo-16k" | "gpt3.5-16k" => ModelChoice::Gpt35Turbo16k,
            "gpt-4" | "gpt4" => ModelChoice::Gpt4,
            "gpt-4-32k" | "gpt4-32k" => ModelChoice::Gpt4_32k,
            _ => ModelChoice::Custom(s.trim().to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ModelChoice::Custom(_))
    }
}

impl Default for ModelChoice {
    fn default() -> Self {
        ModelChoice::Gpt4Turbo
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed unit of message content. Only text exists today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
        }
    }
}

/// One entry of the chat transcript.
///
/// The role is fixed at construction. Content only grows by appending blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: Vec<ContentBlock>,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::text(text)])
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::text(text)])
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    pub fn push(&mut self, block: ContentBlock) {
        self.content.push(block);
    }

    /// Concatenated text of every text block
    pub fn text(&self) -> String {
        self.content.iter().filter_map(ContentBlock::as_text).collect()
    }
}

// ============================================================================
// Model Configuration
// ============================================================================

/// Per-request model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl ModelConfig {
    /// Build a config, rejecting temperatures outside `[0.0, 2.0]`.
    /// Accepted temperatures are snapped to the nearest 0.1.
    pub fn new(model: impl Into<String>, temperature: f64) -> Result<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ChatError::InvalidConfig("model identifier is empty".to_string()));
        }

        Ok(Self {
            model,
            temperature: validate_temperature(temperature)?,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        })
    }

    pub fn with_model(mut self, model: &ModelChoice) -> Self {
        self.model = model.as_str();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Result<Self> {
        self.temperature = validate_temperature(temperature)?;
        Ok(self)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Check the range and snap to the temperature step
pub fn validate_temperature(temperature: f64) -> Result<f64> {
    if !temperature.is_finite() || !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(ChatError::InvalidConfig(format!(
            "temperature {} is outside [{:.1}, {:.1}]",
            temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
        )));
    }
    let steps_per_unit = (1.0 / TEMPERATURE_STEP).round();
    Ok((temperature * steps_per_unit).round() / steps_per_unit)
}
