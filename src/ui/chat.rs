//! The AI therapy conversation view.

use crate::api::SessionRef;
use crate::core::auth::AuthController;
use crate::core::chat::{session_cost, AiChat, SendOutcome, AI_HOURLY_RATE};
use crate::ui::prompt::confirm;
use crate::ui::render::{format_money, render_message};
use crate::utils::logging::TranscriptLog;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

const HELP_TEXT: &str = "\
Commands:
  /help             Show this help
  /log <filename>   Start logging the conversation to a file
  /log              Pause or resume logging
  /status           Show the session id and logging state
  /quit             Leave the conversation";

#[derive(Debug, Default)]
pub struct ChatOptions {
    /// Continue an existing session instead of starting a new one.
    pub resume: Option<String>,
    pub log_file: Option<PathBuf>,
    pub minutes: u32,
    /// Skip the confirmation before starting a paid session.
    pub assume_yes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Quit,
    Help,
    Status,
    Log(Option<PathBuf>),
    Message(String),
}

pub fn parse_chat_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        _ if trimmed == "/quit" || trimmed == "/exit" => ChatInput::Quit,
        _ if trimmed == "/help" => ChatInput::Help,
        _ if trimmed == "/status" => ChatInput::Status,
        _ if trimmed == "/log" => ChatInput::Log(None),
        Some(("/log", path)) => ChatInput::Log(Some(PathBuf::from(path.trim()))),
        _ => ChatInput::Message(trimmed.to_string()),
    }
}

pub async fn run_chat(auth: &AuthController, options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let api = auth.api().clone();
    let credential = auth.credential().cloned();
    let mut log = TranscriptLog::new(options.log_file)?;
    let mut chat = AiChat::new();

    match options.resume {
        Some(id) => {
            let exchanges = chat
                .resume(api.as_ref(), credential.as_ref(), SessionRef::new(id))
                .await?;
            println!("💬 Resumed session ({exchanges} earlier exchanges)");
            for message in chat.messages() {
                println!("{}", render_message(message));
            }
        }
        None => {
            let cost = format_money(session_cost(AI_HOURLY_RATE, options.minutes));
            println!("🤖 AI therapy sessions cost {}/hour.", format_money(AI_HOURLY_RATE));
            let question = format!("Start a {}-minute session for {cost}?", options.minutes);
            if !options.assume_yes && !confirm(&question, true)? {
                println!("No session started.");
                return Ok(());
            }
            chat.start(api.as_ref(), credential.as_ref(), options.minutes)
                .await?;
            println!("✅ Session started. I'm here to listen. What's on your mind?");
        }
    }

    if let Some(session) = chat.session() {
        if let Err(err) = log.log_session_start(session.as_str()) {
            warn!(error = %err, "failed to write transcript header");
        }
    }
    println!("Type a message and press Enter. /help for commands, /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_chat_input(&line) {
            ChatInput::Quit => break,
            ChatInput::Help => println!("{HELP_TEXT}"),
            ChatInput::Status => println!("{}", status_line(&chat, &log)),
            ChatInput::Log(Some(path)) => match log.set_log_file(path) {
                Ok(message) => println!("{message}"),
                Err(err) => eprintln!("❌ {err}"),
            },
            ChatInput::Log(None) => match log.toggle_logging() {
                Ok(message) => println!("{message}"),
                Err(err) => eprintln!("⚠️  {err}"),
            },
            ChatInput::Message(text) => {
                let before = chat.messages().len();
                let outcome = chat.send(api.as_ref(), credential.as_ref(), &text).await;
                if outcome == SendOutcome::Busy {
                    println!("⏳ Still waiting for the previous reply.");
                }
                for (offset, message) in chat.messages()[before..].iter().enumerate() {
                    if let Err(err) = log.log_message(message) {
                        warn!(error = %err, "failed to write transcript");
                    }
                    // The user's own line is already on screen
                    if offset > 0 {
                        println!("{}", render_message(message));
                    }
                }
            }
        }
    }

    println!("👋 Take care. Your session has been saved.");
    Ok(())
}

fn status_line(chat: &AiChat, log: &TranscriptLog) -> String {
    let session = chat.session().map_or("none", |session| session.as_str());
    format!("Session: {session} · Logging: {}", log.status_label())
}
