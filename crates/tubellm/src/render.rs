//! Turns the app state into terminal text.
//!
//! Every pass redraws the whole screen from the session, so these
//! functions only read. Colours are optional to keep the output testable
//! and to behave when stdout is not a terminal.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use tubellm_core::{Screen, Session, chat};
use tubellm_model::ModelMessage;

/// The application title.
pub const TITLE: &str = "YouTubeLLM";

const BAR_CHAR: &str = "▎";

/// A one-off message shown above the prompt on the next pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Something went well.
    Success(String),
    /// Something went wrong, the user may try again.
    Error(String),
}

/// Returns the label of the input field for `screen`.
pub fn prompt_label(screen: Screen) -> &'static str {
    match screen {
        Screen::AwaitingCredential => "Enter Your OpenAI API key.",
        Screen::AwaitingVideo => "Enter the URL of a YouTube video.",
        Screen::Conversing => "You:",
    }
}

/// Returns what the spinner says while `screen` waits for a collaborator.
pub fn busy_label(screen: Screen) -> &'static str {
    match screen {
        Screen::AwaitingCredential => "Validating...",
        Screen::AwaitingVideo => "Fetching transcript and summarizing...",
        Screen::Conversing => "Thinking...",
    }
}

/// Draws the whole screen.
pub fn render(
    session: &Session,
    notice: Option<&Notice>,
    colored: bool,
) -> String {
    let screen = Screen::of(session);
    let mut out = String::new();

    if colored {
        writeln!(out, "{}\n", TITLE.bold()).ok();
    } else {
        writeln!(out, "{TITLE}\n").ok();
    }

    if screen == Screen::Conversing {
        for msg in chat::history(session) {
            render_message(&mut out, msg, colored);
        }
    }

    match notice {
        Some(Notice::Success(text)) if colored => {
            writeln!(out, "{}", text.green()).ok();
        }
        Some(Notice::Error(text)) if colored => {
            writeln!(out, "{}", text.red()).ok();
        }
        Some(Notice::Success(text) | Notice::Error(text)) => {
            writeln!(out, "{text}").ok();
        }
        None => {}
    }

    write!(out, "{}", prompt_label(screen)).ok();
    out
}

fn render_message(out: &mut String, msg: &ModelMessage, colored: bool) {
    let (label, content) = match msg {
        ModelMessage::User(content) => ("User:", content),
        ModelMessage::Assistant(content) => ("Assistant:", content),
        ModelMessage::System(_) => return,
    };

    if colored {
        let bar = match msg {
            ModelMessage::User(_) => BAR_CHAR.bright_blue().to_string(),
            _ => BAR_CHAR.bright_red().to_string(),
        };
        let label = match msg {
            ModelMessage::User(_) => label.blue().bold().to_string(),
            _ => label.red().bold().to_string(),
        };
        writeln!(out, "{bar}{label}").ok();
        for line in content.lines() {
            writeln!(out, "{bar}{line}").ok();
        }
    } else {
        writeln!(out, "{BAR_CHAR}{label}").ok();
        for line in content.lines() {
            writeln!(out, "{BAR_CHAR}{line}").ok();
        }
    }
    out.push('\n');
}
