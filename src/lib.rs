//! themewright: natural-language theming for chart widgets.
//!
//! Chat messages go to an OpenAI-compatible model that answers with one of
//! two commands, `set_theme` or `reset_theme`. The commands are validated
//! and folded into a session's theme/config snapshots by a merge engine that
//! never drops existing entries, no matter what the model leaves out.
//!
//! # Quick start
//!
//! ```
//! use themewright::protocol::decode_call;
//! use themewright::session::Session;
//! use themewright::theme::{ConfigSnapshot, RenderTarget};
//!
//! let mut session = Session::new(ConfigSnapshot::default(), RenderTarget::default());
//! let call = decode_call(
//!     r##"{"cmd":"set_theme","params":{"variables":[{"key":"--dhx-gantt-task-background","value":"#3db9d3"}]}}"##,
//! )
//! .unwrap();
//! let outcome = session.apply_call(&call);
//! assert_eq!(
//!     outcome.rendered_style.as_deref(),
//!     Some(":root {\n  --dhx-gantt-task-background: #3db9d3;\n}")
//! );
//! ```

pub mod api;
pub mod assistant;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod protocol;
pub mod repl;
pub mod server;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod theme;
pub mod types;
