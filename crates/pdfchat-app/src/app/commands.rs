use std::path::PathBuf;

/// One line of REPL input, classified
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Empty,
    Exit,
    Help,
    History,
    Reset,
    ListModels,
    SelectModel(String),
    /// Raw argument; parsed and range-checked by the session
    Temperature(String),
    Pdf(PathBuf),
    Chat(String),
    /// A slash command that is not recognized, or one missing its argument
    Invalid(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();

    if line.is_empty() {
        return ReplCommand::Empty;
    }
    if line == "exit" || line == "quit" {
        return ReplCommand::Exit;
    }
    if !line.starts_with('/') {
        return ReplCommand::Chat(line.to_string());
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match (command, arg) {
        ("/help", _) => ReplCommand::Help,
        ("/history", _) => ReplCommand::History,
        ("/reset", _) => ReplCommand::Reset,
        ("/model", "") => ReplCommand::ListModels,
        ("/model", name) => ReplCommand::SelectModel(name.to_string()),
        ("/temp", "") => ReplCommand::Invalid("Usage: /temp <0.0-2.0>".to_string()),
        ("/temp", value) => ReplCommand::Temperature(value.to_string()),
        ("/pdf", "") => ReplCommand::Invalid("Usage: /pdf <path>".to_string()),
        ("/pdf", path) => ReplCommand::Pdf(PathBuf::from(path)),
        (other, _) => ReplCommand::Invalid(format!("Unknown command '{}'. Type /help for commands.", other)),
    }
}

pub const HELP_TEXT: &str = "\
  <text>              Ask about the loaded documents
  /pdf <path>         Add a PDF's text to the conversation
  /model [name]       List models, or switch to one
  /temp <value>       Set temperature (0.0-2.0, step 0.1)
  /history            Show the conversation so far
  /reset              Clear the conversation
  /help               Show this help
  exit, quit          Leave";
