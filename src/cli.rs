//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Restyle a chart widget through natural-language chat.
#[derive(Debug, Parser)]
#[command(name = "themewright", version)]
pub struct Args {
    /// Path to config file (default: ./themewright.toml or
    /// ~/.config/themewright/themewright.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override model name.
    #[arg(short = 'm', long = "model", global = true)]
    pub model: Option<String>,

    /// Override API base URL.
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Without a subcommand, starts the interactive chat.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Serve the chat API over HTTP.
    Serve {
        /// Listen address (default from `server.addr`).
        #[arg(long = "addr")]
        addr: Option<String>,
    },
    /// Send one message against a fresh theme and print the result.
    Exec {
        /// Message for the assistant.
        message: String,
    },
    /// Write the default config to ~/.config/themewright/themewright.toml.
    Init {
        /// Overwrite an existing file (a backup is kept).
        #[arg(long = "force")]
        force: bool,
    },
}
