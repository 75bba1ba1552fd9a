//! Terminal chat loop over one [`Session`].

use crate::assistant::Assistant;
use crate::dispatch::{DispatchOutcome, Suggestions, UiEvent};
use crate::protocol::ToolCall;
use crate::session::{Session, TurnOutcome};
use crate::theme::render_style;
use crossterm::style::Stylize;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP_TEXT: &str = "Commands:\n  /show                 print the current theme and config\n  /reset                reset the theme to the widget defaults\n  /preview <statements> live-preview config statements, e.g. gantt.config.row_height = 40;\n  /help                 show this help\n  /quit                 exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Show,
    Reset,
    Preview(String),
    Help,
    Quit,
    Unknown(String),
    Message(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Message(line.to_string());
    };
    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match name {
        "show" => ReplCommand::Show,
        "reset" => ReplCommand::Reset,
        "preview" => ReplCommand::Preview(arg.trim().to_string()),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

/// Formats session output for the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn label(&self, text: &str, paint: fn(&str) -> String) -> String {
        if self.color {
            paint(text)
        } else {
            text.to_string()
        }
    }

    pub fn assistant(&self, text: &str) -> String {
        format!("{} {text}", self.label("assistant:", |t| t.cyan().bold().to_string()))
    }

    pub fn error(&self, text: &str) -> String {
        format!("{} {text}", self.label("error:", |t| t.red().bold().to_string()))
    }

    pub fn section(&self, title: &str) -> String {
        self.label(title, |t| t.yellow().bold().to_string())
    }

    fn suggestions(&self, suggestions: &Suggestions, out: &mut Vec<String>) {
        out.push(format!("{} Try:", suggestions.text));
        for pill in &suggestions.pills {
            out.push(format!("  {} {pill}", self.label("›", |t| t.dark_grey().to_string())));
        }
    }

    /// Lines describing a dispatched command.
    pub fn dispatch(&self, outcome: &DispatchOutcome) -> Vec<String> {
        let mut out = Vec::new();
        match &outcome.ui_event {
            UiEvent::ThemeGenerated {
                styles,
                config_text,
                message,
                suggestions,
            } => {
                out.push(self.assistant(message));
                out.push(self.section("styles"));
                out.push(styles.clone());
                out.push(self.section("config"));
                out.push(config_text.clone());
                if let Some(suggestions) = suggestions {
                    self.suggestions(suggestions, &mut out);
                }
            }
            UiEvent::ThemeReset { suggestions } => {
                out.push(self.assistant("Theme reset to the widget defaults."));
                if let Some(suggestions) = suggestions {
                    self.suggestions(suggestions, &mut out);
                }
            }
            UiEvent::ConfigsPreviewed { config_text } => {
                out.push(self.section("config"));
                out.push(config_text.clone());
            }
        }
        out
    }

    /// Lines describing a finished turn.
    pub fn turn(&self, outcome: &TurnOutcome) -> Vec<String> {
        match outcome {
            TurnOutcome::Superseded => Vec::new(),
            TurnOutcome::Applied {
                assistant_msg,
                dispatched,
            } => {
                let mut out = Vec::new();
                if let Some(text) = assistant_msg {
                    out.push(self.assistant(text));
                }
                if let Some(dispatched) = dispatched {
                    out.extend(self.dispatch(dispatched));
                }
                out
            }
        }
    }

    /// Current state of `session`.
    pub fn show(&self, session: &Session) -> Vec<String> {
        let state = session.state();
        vec![
            self.section("styles"),
            render_style(&state.theme, session.target()),
            self.section("config"),
            crate::theme::render_config_text(&state.config, session.target()),
        ]
    }

    pub fn welcome(&self) -> Vec<String> {
        let mut out = vec![self.section("Welcome! Describe the chart theme you want.")];
        self.suggestions(&Suggestions::welcome(), &mut out);
        out.push("Type /help for commands.".to_string());
        out
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Read lines from stdin until EOF or `/quit`.
pub async fn run(
    session: &mut Session,
    assistant: &Assistant,
    renderer: Renderer,
) -> std::io::Result<()> {
    print_lines(&renderer.welcome());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", renderer.label(">", |t| t.green().bold().to_string()));
        std::io::Write::flush(&mut std::io::stdout())?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{HELP_TEXT}"),
            ReplCommand::Show => print_lines(&renderer.show(session)),
            ReplCommand::Reset => {
                let outcome = session.apply_call(&ToolCall::ResetTheme);
                print_lines(&renderer.dispatch(&outcome));
            }
            ReplCommand::Preview(text) => match session.preview_editor(&text) {
                Ok(outcome) => print_lines(&renderer.dispatch(&outcome)),
                Err(err) => println!("{}", renderer.error(&err.user_message())),
            },
            ReplCommand::Unknown(name) => {
                println!("{}", renderer.error(&format!("unknown command /{name}; try /help")))
            }
            ReplCommand::Message(text) => match session.turn(assistant, &text).await {
                Ok(outcome) => print_lines(&renderer.turn(&outcome)),
                Err(err) => {
                    tracing::warn!(error = %err, "chat turn failed");
                    println!("{}", renderer.error(&err.user_message()));
                }
            },
        }
    }
    Ok(())
}
