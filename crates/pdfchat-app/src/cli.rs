use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for pdfchat
#[derive(Parser, Debug, Default)]
#[command(name = "pdfchat")]
#[command(about = "Chat with an LLM about the contents of PDF documents")]
#[command(version)]
pub struct Cli {
    /// Provider API key (must contain "sk-"). Prompted for when absent.
    #[arg(long, value_name = "KEY", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat completions endpoint (e.g., http://localhost:8080)
    /// A bare host gets /v1/chat/completions appended
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Model to start with (gpt-4-turbo, gpt-3.5-turbo-16k, gpt-4, gpt-4-32k)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature between 0.0 and 2.0, in steps of 0.1
    #[arg(long, value_name = "VALUE")]
    pub temperature: Option<f64>,

    /// What to do with a reply that fails or is interrupted midway (discard, persist)
    #[arg(long, value_name = "POLICY")]
    pub partial_replies: Option<String>,

    /// Directory for conversation logs (default: ~/.pdfchat/logs)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to config file (default: ~/.pdfchat/config.toml if present)
    #[arg(long, value_name = "PATH", env = "PDFCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Load this PDF into the conversation before the first prompt
    #[arg(long, value_name = "PATH")]
    pub pdf: Option<PathBuf>,

    /// Accept model names outside the built-in list
    #[arg(long)]
    pub allow_custom_models: bool,

    /// Enable verbose debug output (shows HTTP requests, responses, stream chunks)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Write every request body to a file in the log directory
    #[arg(long)]
    pub log_requests: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "pdfchat",
            "--api-key",
            "sk-abc",
            "--model",
            "gpt-4",
            "--temperature",
            "0.7",
            "--partial-replies",
            "persist",
            "--pdf",
            "paper.pdf",
            "-v",
        ]);

        assert_eq!(cli.api_key.as_deref(), Some("sk-abc"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4"));
        assert_eq!(cli.temperature, Some(0.7));
        assert_eq!(cli.partial_replies.as_deref(), Some("persist"));
        assert_eq!(cli.pdf, Some(PathBuf::from("paper.pdf")));
        assert!(cli.verbose);
        assert!(!cli.log_requests);
    }

    #[test]
    fn test_temperature_must_be_numeric() {
        assert!(Cli::try_parse_from(["pdfchat", "--temperature", "warm"]).is_err());
    }

    #[test]
    #[serial]
    fn test_api_key_comes_from_environment() {
        std::env::set_var("OPENAI_API_KEY", "sk-from-dotenv");
        let from_env = Cli::parse_from(["pdfchat"]);
        let from_flag = Cli::parse_from(["pdfchat", "--api-key", "sk-from-flag"]);
        std::env::remove_var("OPENAI_API_KEY");

        assert_eq!(from_env.api_key.as_deref(), Some("sk-from-dotenv"));
        assert_eq!(from_flag.api_key.as_deref(), Some("sk-from-flag"));
    }
}
