use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use pdfchat_chat::PartialReplyPolicy;
use pdfchat_llm_api::{validate_api_url, OPENAI_API_URL};
use pdfchat_types::{ModelChoice, ModelConfig};

use crate::cli::Cli;
use crate::config::{ConfigFile, EnvSettings};

/// Application configuration derived from CLI arguments, environment and config file
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Raw key as given; validated when the client is built
    pub api_key: Option<String>,
    pub api_url: String,
    pub model_config: ModelConfig,
    pub partial_policy: PartialReplyPolicy,
    pub log_dir: PathBuf,
    pub pdf: Option<PathBuf>,
    pub allow_custom_models: bool,
    pub verbose: bool,
    pub log_requests: bool,
}

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let file = ConfigFile::discover(cli.config.as_deref())?;
    let env = EnvSettings::from_env();

    let default_log_dir = pdfchat_logging::get_logs_dir().unwrap_or_else(|e| {
        eprintln!("{} {}; logging to ./logs", "⚠️".yellow(), e);
        PathBuf::from("logs")
    });

    // OPENAI_API_KEY (including one from .env) arrives through clap as --api-key
    resolve_settings(cli, &env, &file, default_log_dir)
}

/// Merge the configuration layers.
///
/// Precedence: CLI flags > PDFCHAT_* env > config file > defaults
pub fn resolve_settings(
    cli: &Cli,
    env: &EnvSettings,
    file: &ConfigFile,
    default_log_dir: PathBuf,
) -> Result<AppConfig> {
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env.api_url.clone())
        .or_else(|| file.api_url.clone())
        .unwrap_or_else(|| OPENAI_API_URL.to_string());
    let api_url = validate_api_url(&api_url)?;

    let model_name = cli
        .model
        .clone()
        .or_else(|| env.model.clone())
        .or_else(|| file.model.clone());
    let model = match model_name {
        Some(name) => resolve_model(&name, cli.allow_custom_models)?,
        None => ModelChoice::default(),
    };

    let temperature = match (cli.temperature, env.temperature.as_deref(), file.temperature) {
        (Some(t), _, _) => Some(t),
        (None, Some(raw), _) => Some(
            raw.trim()
                .parse::<f64>()
                .with_context(|| format!("PDFCHAT_TEMPERATURE is not a number: '{}'", raw))?,
        ),
        (None, None, file_temperature) => file_temperature,
    };

    let mut model_config = ModelConfig::default().with_model(&model);
    if let Some(temperature) = temperature {
        model_config = model_config.with_temperature(temperature)?;
    }

    let partial_policy = match cli
        .partial_replies
        .as_deref()
        .or(env.partial_replies.as_deref())
        .or(file.partial_replies.as_deref())
    {
        Some(raw) => match PartialReplyPolicy::from_str(raw) {
            Some(policy) => policy,
            None => bail!("Unknown partial reply policy '{}' (expected discard or persist)", raw),
        },
        None => PartialReplyPolicy::default(),
    };

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| env.log_dir.clone())
        .or_else(|| file.log_dir.clone())
        .unwrap_or(default_log_dir);

    Ok(AppConfig {
        api_key: cli.api_key.clone(),
        api_url,
        model_config,
        partial_policy,
        log_dir,
        pdf: cli.pdf.clone(),
        allow_custom_models: cli.allow_custom_models,
        verbose: cli.verbose,
        log_requests: cli.log_requests,
    })
}

/// Map a user-supplied model name to a selectable model
pub fn resolve_model(name: &str, allow_custom: bool) -> Result<ModelChoice> {
    let choice = ModelChoice::from_str(name);
    if choice.is_custom() && !allow_custom {
        let known: Vec<String> = ModelChoice::all().iter().map(ModelChoice::as_str).collect();
        bail!(
            "Unknown model '{}'. Available: {} (use --allow-custom-models for others)",
            name.trim(),
            known.join(", ")
        );
    }
    if choice.as_str().is_empty() {
        bail!("Model name is empty");
    }
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pdfchat"];
        argv.extend_from_slice(args);
        let mut cli = Cli::parse_from(argv);
        // Keep the host's OPENAI_API_KEY/PDFCHAT_CONFIG out of these tests
        if !args.contains(&"--api-key") {
            cli.api_key = None;
        }
        cli.config = None;
        cli
    }

    fn default_dir() -> PathBuf {
        PathBuf::from("/tmp/default-logs")
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = resolve_settings(&cli(&[]), &EnvSettings::default(), &ConfigFile::default(), default_dir()).unwrap();

        assert_eq!(config.api_url, OPENAI_API_URL);
        assert_eq!(config.model_config, ModelConfig::default());
        assert_eq!(config.partial_policy, PartialReplyPolicy::Discard);
        assert_eq!(config.log_dir, default_dir());
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let env = EnvSettings {
            model: Some("gpt-4".to_string()),
            temperature: Some("0.9".to_string()),
            ..Default::default()
        };
        let file = ConfigFile {
            model: Some("gpt-4-32k".to_string()),
            temperature: Some(1.5),
            partial_replies: Some("persist".to_string()),
            api_url: Some("http://localhost:8080".to_string()),
            log_dir: Some(PathBuf::from("/srv/logs")),
        };

        let config = resolve_settings(&cli(&["--temperature", "0.2"]), &env, &file, default_dir()).unwrap();

        assert_eq!(config.model_config.model, "gpt-4");
        assert_eq!(config.model_config.temperature, 0.2);
        assert_eq!(config.partial_policy, PartialReplyPolicy::Persist);
        assert_eq!(config.api_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.log_dir, PathBuf::from("/srv/logs"));
    }

    #[test]
    fn test_unknown_model_needs_opt_in() {
        let settings = (EnvSettings::default(), ConfigFile::default());

        let err = resolve_settings(&cli(&["--model", "llama-3"]), &settings.0, &settings.1, default_dir());
        assert!(err.is_err());

        let config = resolve_settings(
            &cli(&["--model", "llama-3", "--allow-custom-models"]),
            &settings.0,
            &settings.1,
            default_dir(),
        )
        .unwrap();
        assert_eq!(config.model_config.model, "llama-3");
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let file = ConfigFile::default();

        let out_of_range = resolve_settings(&cli(&["--temperature", "2.5"]), &EnvSettings::default(), &file, default_dir());
        assert!(out_of_range.is_err());

        let env = EnvSettings {
            temperature: Some("hot".to_string()),
            ..Default::default()
        };
        assert!(resolve_settings(&cli(&[]), &env, &file, default_dir()).is_err());

        let policy = resolve_settings(&cli(&["--partial-replies", "maybe"]), &EnvSettings::default(), &file, default_dir());
        assert!(policy.is_err());

        let url = resolve_settings(&cli(&["--api-url", "ftp://example.com"]), &EnvSettings::default(), &file, default_dir());
        assert!(url.is_err());
    }

    #[test]
    fn test_resolve_model_accepts_listed_names() {
        assert_eq!(resolve_model("gpt-3.5-turbo-16k", false).unwrap(), ModelChoice::Gpt35Turbo16k);
        assert_eq!(resolve_model(" GPT-4 ", false).unwrap(), ModelChoice::Gpt4);
        assert!(resolve_model("", true).is_err());
    }
}
