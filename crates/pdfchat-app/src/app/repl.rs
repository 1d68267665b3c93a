use anyhow::Result;
use colored::Colorize;
use futures::StreamExt;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::future::Future;
use std::io::{self, Write};
use std::path::Path;

use pdfchat_chat::{ChatSession, PartialReplyPolicy, StreamingRelay};
use pdfchat_llm_api::{ClientFactory, ClientOptions};
use pdfchat_logging::{safe_truncate, ConversationLogger};
use pdfchat_pdf::LopdfExtractor;
use pdfchat_types::{ApiKey, ChatError, Message, ModelChoice, Role};

use crate::app::commands::{parse_command, ReplCommand, HELP_TEXT};
use crate::app::setup::{resolve_model, AppConfig};

/// Longest message body shown by /history
const HISTORY_PREVIEW_CHARS: usize = 2000;

/// Run interactive REPL mode
pub async fn run_repl_mode(config: AppConfig) -> Result<()> {
    println!("{}", "📚 PDF Chat - ask questions about your documents".bright_cyan().bold());
    println!("{}", "Type 'exit' or 'quit' to exit, or '/help' to see available commands\n".bright_black());

    let mut rl = DefaultEditor::new()?;

    // No call is ever made with a key that fails validation
    let api_key = match resolve_api_key(config.api_key.as_deref(), &mut rl)? {
        Some(key) => key,
        None => {
            println!("{}", "Goodbye!".bright_cyan());
            return Ok(());
        }
    };

    let options = ClientOptions {
        verbose: config.verbose,
        request_log_dir: config.log_requests.then(|| config.log_dir.clone()),
    };
    let client = ClientFactory::create(api_key, Some(config.api_url.clone()), options)?;
    let relay = StreamingRelay::new(client.clone()).with_partial_policy(config.partial_policy);
    let mut session = ChatSession::new(config.model_config.clone());

    let mut logger = match ConversationLogger::new(&config.log_dir, session.id().to_string()).await {
        Ok(logger) => Some(logger),
        Err(e) => {
            eprintln!("{} Logging disabled: {}", "⚠️".yellow(), e);
            None
        }
    };

    if config.verbose {
        println!("{}", format!("🔧 DEBUG: backend: {}", client.describe()).bright_black());
        println!("{}", format!("🔧 DEBUG: session: {}", session.id()).bright_black());
        println!("{}", format!("🔧 DEBUG: partial replies: {}", relay.partial_policy()).bright_black());
        if let Some(logger) = &logger {
            println!("{}", format!("🔧 DEBUG: conversation log: {}", logger.file_path().display()).bright_black());
        }
    }

    if let Some(path) = &config.pdf {
        add_pdf(&mut session, path, &mut logger).await;
    }

    loop {
        let settings = format!(
            "[{} @ {:.1}]",
            session.config().model,
            session.config().temperature
        )
        .bright_magenta();
        let readline = rl.readline(&format!("{} {} ", settings, "You:".bright_green().bold()));

        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".bright_yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(e) => {
                eprintln!("{} Error: {}", "❌".bright_red(), e);
                break;
            }
        };

        let command = parse_command(&line);
        if command != ReplCommand::Empty {
            let _ = rl.add_history_entry(line.trim());
        }

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Exit => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            ReplCommand::Help => {
                println!("{} Commands:", "💡".bright_cyan());
                println!("{}", HELP_TEXT);
            }
            ReplCommand::History => print_history(&session),
            ReplCommand::Reset => {
                session.reset();
                if let Some(logger) = &mut logger {
                    logger.log_event("reset").await;
                }
                println!("{} Conversation cleared", "🧹".bright_green());
            }
            ReplCommand::ListModels => print_models(&session),
            ReplCommand::SelectModel(name) => match resolve_model(&name, config.allow_custom_models) {
                Ok(model) => {
                    session.set_model(&model);
                    println!("{} Model set to {}", "🤖".bright_green(), model.display_name());
                }
                Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
            },
            ReplCommand::Temperature(raw) => match raw.parse::<f64>() {
                Ok(value) => match session.set_temperature(value) {
                    Ok(applied) => println!("{} Temperature set to {:.1}", "🌡️".bright_green(), applied),
                    Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
                },
                Err(_) => eprintln!("{} Invalid temperature: '{}'", "❌".bright_red(), raw),
            },
            ReplCommand::Pdf(path) => add_pdf(&mut session, &path, &mut logger).await,
            ReplCommand::Invalid(message) => eprintln!("{} {}", "⚠️".yellow(), message),
            ReplCommand::Chat(text) => {
                session.add_user_text(text.as_str());
                if let Some(logger) = &mut logger {
                    logger.log(Role::User.as_str(), &text, None).await;
                }
                run_turn(&mut session, &relay, &mut logger).await?;
            }
        }
    }

    Ok(())
}

/// Validate the configured key, prompting until a valid one is entered.
/// Returns `None` when the user gives up.
fn resolve_api_key(initial: Option<&str>, rl: &mut DefaultEditor) -> Result<Option<ApiKey>> {
    match initial.map(ApiKey::parse) {
        Some(Ok(key)) => return Ok(Some(key)),
        Some(Err(e)) => eprintln!("{} {}", "⚠️".yellow(), e),
        None => eprintln!("{} Please enter your OpenAI API key to continue", "🔑".yellow()),
    }

    loop {
        match rl.readline("API key: ") {
            Ok(line) => match ApiKey::parse(&line) {
                Ok(key) => return Ok(Some(key)),
                Err(e) => eprintln!("{} {}", "⚠️".yellow(), e),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Stream one assistant reply to stdout. Ctrl-C drops the stream.
async fn run_turn(
    session: &mut ChatSession,
    relay: &StreamingRelay,
    logger: &mut Option<ConversationLogger>,
) -> Result<()> {
    let before = session.transcript().len();
    print!("{} ", "Assistant:".bright_blue().bold());
    io::stdout().flush()?;

    let outcome: std::result::Result<(), ChatError> = {
        let mut reply = session.stream_reply(relay);
        loop {
            tokio::select! {
                item = reply.next() => match item {
                    Some(Ok(fragment)) => {
                        print!("{}", fragment);
                        io::stdout().flush()?;
                    }
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                },
                _ = tokio::signal::ctrl_c() => break Err(ChatError::Cancelled),
            }
        }
    };
    println!();

    if session.transcript().len() > before {
        if let (Some(logger), Some(message)) = (logger.as_mut(), session.transcript().last()) {
            logger
                .log(message.role().as_str(), &message.text(), Some(session.config().model.as_str()))
                .await;
        }
    }

    match outcome {
        Ok(()) => {}
        Err(ChatError::Cancelled) => {
            let kept = session.transcript().len() > before;
            let note = match (relay.partial_policy(), kept) {
                (PartialReplyPolicy::Persist, true) => "partial reply kept",
                _ => "partial reply discarded",
            };
            println!("{} Interrupted ({})", "^C".bright_yellow(), note);
        }
        Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
    }

    Ok(())
}

/// Run `work` unless `cancel` completes first. `cancel` is checked first on every poll.
async fn interruptible<T, C>(work: impl Future<Output = T>, cancel: C) -> std::result::Result<T, ChatError>
where
    C: Future,
{
    tokio::select! {
        biased;
        _ = cancel => Err(ChatError::Cancelled),
        output = work => Ok(output),
    }
}

/// Ctrl-C abandons the load; the transcript only changes once extraction succeeds.
async fn add_pdf(session: &mut ChatSession, path: &Path, logger: &mut Option<ConversationLogger>) {
    let loaded = interruptible(
        session.ingest_pdf_file(path, &LopdfExtractor),
        tokio::signal::ctrl_c(),
    )
    .await;

    match loaded.and_then(|result| result) {
        Ok(chars) => {
            println!(
                "{} Added {} ({} characters)",
                "📄".bright_green(),
                path.display(),
                chars
            );
            if chars == 0 {
                eprintln!("{} No extractable text found; the PDF may be scanned images", "⚠️".yellow());
            }
            if let (Some(logger), Some(message)) = (logger.as_mut(), session.transcript().last()) {
                logger.log(message.role().as_str(), &message.text(), None).await;
            }
        }
        Err(ChatError::Cancelled) => println!("{} PDF load interrupted", "^C".bright_yellow()),
        Err(e) => eprintln!("{} Could not read {}: {}", "❌".bright_red(), path.display(), e),
    }
}

fn print_history(session: &ChatSession) {
    if session.transcript().is_empty() {
        println!("{} No messages yet", "ℹ️".bright_blue());
        return;
    }
    for message in session.transcript().iter() {
        println!("{} {}", role_label(message), safe_truncate(&message.text(), HISTORY_PREVIEW_CHARS));
    }
}

fn role_label(message: &Message) -> colored::ColoredString {
    match message.role() {
        Role::User => "You:".bright_green().bold(),
        Role::Assistant => "Assistant:".bright_blue().bold(),
    }
}

fn print_models(session: &ChatSession) {
    println!("{} Available models:", "🤖".bright_cyan());
    for model in ModelChoice::all() {
        let marker = if model.as_str() == session.config().model { "*" } else { " " };
        println!("  {} {:<20} {}", marker, model.as_str(), model.display_name().bright_black());
    }
}
