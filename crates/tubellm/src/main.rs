//! The `tubellm` terminal program.

#[macro_use]
extern crate tracing;

use std::io::{IsTerminal as _, Write as _};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tubellm::Config;
use tubellm::core::{App, Screen, Transition};
use tubellm::render::{self, Notice};
use tubellm_openai_model::OpenAIProvider;

type Input = Lines<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    debug!(?config, "starting");

    let loader = match config.youtube_loader() {
        Ok(loader) => loader,
        Err(err) => {
            eprintln!("failed to set up the transcript loader: {err}");
            return;
        }
    };
    let connector = {
        let config = config.clone();
        move |api_key: &str| OpenAIProvider::new(config.openai_config(api_key))
    };
    let mut app = App::new(connector, loader);

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let colored = std::io::stdout().is_terminal();

    let mut input = BufReader::new(io::stdin()).lines();
    let mut notice = None;

    loop {
        let screen = app.screen();
        let text = render::render(app.session(), notice.take().as_ref(), colored);
        draw(&text, colored);

        if app.session().is_query_pending() {
            println!();
            let spinner = start_spinner(&progress_style, render::busy_label(screen));
            let result = app.run_pending().await;
            spinner.finish_and_clear();
            if let Err(err) = result {
                notice = Some(Notice::Error(err.to_string()));
            }
            continue;
        }

        let line = match screen {
            Screen::AwaitingCredential => {
                read_credential(&mut input, config.api_key.as_deref(), colored)
                    .await
            }
            _ => read_line(&mut input).await,
        };
        let Some(line) = line else {
            break;
        };

        // Chat turns are recorded instantly, the reply runs on the next pass.
        let spinner = (screen != Screen::Conversing)
            .then(|| start_spinner(&progress_style, render::busy_label(screen)));
        let result = app.submit(&line).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        notice = match result {
            Ok(Transition::Rerender) if screen == Screen::AwaitingCredential => {
                Some(Notice::Success("API key validated successfully.".to_owned()))
            }
            Ok(_) => None,
            Err(err) => Some(Notice::Error(err.to_string())),
        };
    }
}

fn draw(text: &str, colored: bool) {
    if colored {
        // Clear the screen and move the cursor home.
        print!("\x1b[2J\x1b[H");
    }
    print!("{text}");
    std::io::stdout().flush().ok();
}

fn start_spinner(style: &ProgressStyle, message: &'static str) -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(style.clone());
    progress_bar.set_message(message);
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}

async fn read_line(input: &mut Input) -> Option<String> {
    print!("\n> ");
    std::io::stdout().flush().ok();

    match input.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {err}");
            None
        }
    }
}

/// Reads the API key without echoing it when there is a terminal to read
/// from. An empty answer picks the key from the environment, if any.
async fn read_credential(
    input: &mut Input,
    env_key: Option<&str>,
    colored: bool,
) -> Option<String> {
    if env_key.is_some() {
        let hint = "(press enter to use OPENAI_API_KEY)";
        if colored {
            print!(" {}", hint.dimmed());
        } else {
            print!(" {hint}");
        }
    }

    let hidden = if colored {
        tokio::task::spawn_blocking(|| rpassword::prompt_password("\n> "))
            .await
            .map_or(HiddenInput::Unavailable, HiddenInput::from)
    } else {
        HiddenInput::Unavailable
    };
    let line = match hidden {
        HiddenInput::Line(line) => line,
        HiddenInput::Eof => return None,
        HiddenInput::Unavailable => read_line(input).await?,
    };

    match env_key {
        Some(key) if line.trim().is_empty() => Some(key.to_owned()),
        _ => Some(line),
    }
}

/// The outcome of a hidden terminal read.
#[derive(Debug, PartialEq, Eq)]
enum HiddenInput {
    Line(String),
    /// Ctrl-D at the prompt.
    Eof,
    /// No terminal to read from, fall back to stdin.
    Unavailable,
}

impl From<std::io::Result<String>> for HiddenInput {
    fn from(result: std::io::Result<String>) -> Self {
        match result {
            Ok(line) => HiddenInput::Line(line),
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                HiddenInput::Eof
            }
            Err(err) => {
                debug!("no hidden input available: {err}");
                HiddenInput::Unavailable
            }
        }
    }
}
