//! Session-scoped theme state.
//!
//! A [`Session`] owns one chat's theme/config snapshots, the baseline, and
//! the suggestion phase. Replies are applied through turn tickets so each
//! accepted reply lands at most once and superseded replies are dropped.

use crate::assistant::{Assistant, InboundMessage, OutboundReply};
use crate::dispatch::{dispatch, DispatchOutcome, SuggestionPhase};
use crate::error::{ProtocolError, TurnError};
use crate::protocol::{decode_call, ToolCall};
use crate::theme::editor::{parse_config_statements, parse_css_declarations};
use crate::theme::{ConfigSnapshot, RenderTarget, ThemeState};

/// Handle for one in-flight turn.
#[derive(Debug, PartialEq, Eq)]
pub struct TurnTicket {
    id: u64,
}

impl TurnTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// What happened to a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply accepted. `dispatched` is set when it carried a valid command.
    Applied {
        assistant_msg: Option<String>,
        dispatched: Option<DispatchOutcome>,
    },
    /// A newer turn started before this one finished; nothing was applied.
    Superseded,
}

/// One chat's state.
#[derive(Debug, Clone)]
pub struct Session {
    state: ThemeState,
    baseline: ConfigSnapshot,
    phase: SuggestionPhase,
    target: RenderTarget,
    latest_turn: u64,
    applied_turn: u64,
}

impl Session {
    pub fn new(baseline: ConfigSnapshot, target: RenderTarget) -> Self {
        Self {
            state: ThemeState::with_baseline(&baseline),
            baseline,
            phase: SuggestionPhase::default(),
            target,
            latest_turn: 0,
            applied_turn: 0,
        }
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    pub fn baseline(&self) -> &ConfigSnapshot {
        &self.baseline
    }

    pub fn phase(&self) -> SuggestionPhase {
        self.phase
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    /// Wire message carrying `message` and the current snapshots.
    pub fn inbound(&self, message: &str) -> InboundMessage {
        InboundMessage {
            message: message.to_string(),
            theme: self.state.theme.as_slice().to_vec(),
            configs: self.state.config.as_slice().to_vec(),
        }
    }

    /// Start a turn. Any earlier unfinished turn becomes stale.
    pub fn begin_turn(&mut self) -> TurnTicket {
        self.latest_turn += 1;
        TurnTicket {
            id: self.latest_turn,
        }
    }

    /// Apply `reply` if `ticket` is still the latest turn.
    ///
    /// Consumes the ticket, so a reply can be offered once per turn.
    pub fn complete_turn(&mut self, ticket: TurnTicket, reply: OutboundReply) -> TurnOutcome {
        if ticket.id != self.latest_turn || ticket.id <= self.applied_turn {
            tracing::info!(
                turn = ticket.id,
                latest = self.latest_turn,
                "discarding stale assistant reply"
            );
            return TurnOutcome::Superseded;
        }
        self.applied_turn = ticket.id;

        let mut assistant_msg = reply.assistant_msg;
        let dispatched = match reply.call.as_deref().map(decode_call) {
            None => None,
            Some(Ok(call)) => Some(self.apply_call(&call)),
            Some(Err(err)) => {
                tracing::warn!(turn = ticket.id, error = %err, "reply carried an invalid command");
                assistant_msg = Some(err.user_message());
                None
            }
        };
        TurnOutcome::Applied {
            assistant_msg,
            dispatched,
        }
    }

    /// Run one full round-trip through `assistant`.
    pub async fn turn(
        &mut self,
        assistant: &Assistant,
        message: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let inbound = self.inbound(message);
        let ticket = self.begin_turn();
        let reply = assistant.reply(&inbound).await?;
        Ok(self.complete_turn(ticket, reply))
    }

    /// Dispatch a validated command against this session.
    pub fn apply_call(&mut self, call: &ToolCall) -> DispatchOutcome {
        let outcome = dispatch(call, &self.state, &self.baseline, self.phase, &self.target);
        self.state = outcome.next_state.clone();
        self.phase = outcome.next_phase;
        tracing::debug!(
            cmd = call.name(),
            theme_entries = self.state.theme.len(),
            config_entries = self.state.config.len(),
            "command applied"
        );
        outcome
    }

    /// Apply edited stylesheet and config text as a `set_theme`.
    pub fn save_editor(
        &mut self,
        css: &str,
        config_text: &str,
    ) -> Result<DispatchOutcome, ProtocolError> {
        let variables = parse_css_declarations(css);
        let configs = parse_config_statements(config_text, &self.target.config_target);
        let call = ToolCall::SetTheme {
            variables,
            configs: Some(configs),
        };
        // Round-trip through the envelope so editor input meets the same
        // validation as model output.
        let call = decode_call(&call.to_envelope().encode())?;
        Ok(self.apply_call(&call))
    }

    /// Live-preview edited config text as a `set_configs`.
    ///
    /// Non-empty text without a single usable statement is rejected so the
    /// preview never silently shows the old config.
    pub fn preview_editor(&mut self, config_text: &str) -> Result<DispatchOutcome, ProtocolError> {
        let configs = parse_config_statements(config_text, &self.target.config_target);
        if configs.is_empty() && !config_text.trim().is_empty() {
            return Err(ProtocolError::MalformedToolCall(format!(
                "no `{}.config.<name> = <value>;` statements found",
                self.target.config_target
            )));
        }
        let call = decode_call(&ToolCall::SetConfigs { configs }.to_envelope().encode())?;
        Ok(self.apply_call(&call))
    }
}
