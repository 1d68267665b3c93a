use chrono::Local;
use serde::Serialize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 Local time
    session_id: &'a str,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Append-only JSONL record of one chat session
pub struct ConversationLogger {
    file_path: PathBuf,
    session_id: String,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger; generates the file name based on the current local time.
    pub async fn new(logs_dir: &Path, session_id: impl Into<String>) -> Result<Self> {
        fs::create_dir_all(logs_dir).await?;

        let filename = format!(
            "pdfchat-{}.jsonl",
            Local::now().format("%Y-%m-%d-%H%M%S")
        );
        let file_path = logs_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await?;
        Ok(Self {
            file_path,
            session_id: session_id.into(),
            file: Some(file),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Record one message appended to the transcript
    pub async fn log(&mut self, role: &str, content: &str, model: Option<&str>) {
        self.write_entry("message", Some(role), Some(content), model).await;
    }

    /// Record a session-level event such as a reset
    pub async fn log_event(&mut self, event: &str) {
        self.write_entry(event, None, None, None).await;
    }

    async fn write_entry(
        &mut self,
        event: &str,
        role: Option<&str>,
        content: Option<&str>,
        model: Option<&str>,
    ) {
        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            session_id: &self.session_id,
            event,
            role,
            content,
            model,
        };

        let Ok(mut line) = serde_json::to_string(&entry) else {
            return;
        };
        line.push('\n');

        if let Some(file) = &mut self.file {
            // A failed write disables further logging rather than interrupting the chat.
            if file.write_all(line.as_bytes()).await.is_err() || file.flush().await.is_err() {
                eprintln!("Conversation logging disabled: cannot write {}", self.file_path.display());
                self.file = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_one_json_line_per_entry() {
        let dir = TempDir::new().unwrap();
        let mut logger = ConversationLogger::new(dir.path(), "session-1").await.unwrap();

        logger.log("user", "What is in the PDF?", None).await;
        logger.log("assistant", "A report.", Some("gpt-4-turbo")).await;
        logger.log_event("reset").await;

        let written = tokio::fs::read_to_string(logger.file_path()).await.unwrap();
        let entries: Vec<serde_json::Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["role"], "user");
        assert_eq!(entries[0]["event"], "message");
        assert_eq!(entries[1]["model"], "gpt-4-turbo");
        assert_eq!(entries[1]["content"], "A report.");
        assert_eq!(entries[2]["event"], "reset");
        assert!(entries[2].get("role").is_none());
        assert!(entries.iter().all(|e| e["session_id"] == "session-1"));
    }
}
