use std::env;
use std::path::PathBuf;

/// PDFCHAT_* settings, read as raw strings; validation happens in setup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvSettings {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<String>,
    pub partial_replies: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var("PDFCHAT_API_URL"),
            model: non_empty_var("PDFCHAT_MODEL"),
            temperature: non_empty_var("PDFCHAT_TEMPERATURE"),
            partial_replies: non_empty_var("PDFCHAT_PARTIAL_REPLIES"),
            log_dir: non_empty_var("PDFCHAT_LOG_DIR").map(PathBuf::from),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "PDFCHAT_API_URL",
        "PDFCHAT_MODEL",
        "PDFCHAT_TEMPERATURE",
        "PDFCHAT_PARTIAL_REPLIES",
        "PDFCHAT_LOG_DIR",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_reads_pdfchat_variables() {
        clear_vars();
        env::set_var("PDFCHAT_MODEL", "gpt-4");
        env::set_var("PDFCHAT_TEMPERATURE", "1.1");
        env::set_var("PDFCHAT_LOG_DIR", "/var/log/pdfchat");

        let settings = EnvSettings::from_env();
        clear_vars();

        assert_eq!(settings.model.as_deref(), Some("gpt-4"));
        assert_eq!(settings.temperature.as_deref(), Some("1.1"));
        assert_eq!(settings.log_dir, Some(PathBuf::from("/var/log/pdfchat")));
        assert_eq!(settings.api_url, None);
    }

    #[test]
    #[serial]
    fn test_blank_variables_are_ignored() {
        clear_vars();
        env::set_var("PDFCHAT_API_URL", "   ");

        let settings = EnvSettings::from_env();
        clear_vars();

        assert_eq!(settings, EnvSettings::default());
    }
}
