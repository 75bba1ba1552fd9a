//! Command dispatch: applies a validated [`ToolCall`] to a session's state.
//!
//! Dispatch is pure. It returns the next state, the rendered artifacts, and a
//! [`UiEvent`] describing what the presentation layer should show; the caller
//! decides how (or whether) to deliver any of it.

use crate::protocol::ToolCall;
use crate::theme::{
    merge_config, merge_theme, render_config_text, render_style, reset_config, reset_theme,
    ConfigSnapshot, RenderTarget, ThemeState,
};
use serde::Serialize;

/// Shown after a theme is applied.
pub const THEME_APPLIED_MESSAGE: &str =
    "Your theme has been generated and applied! You can now edit it in the Code tab.";

const AFTER_SET_THEME_TEXT: &str = "Your theme is ready. Keep customizing it with natural language.";
const AFTER_RESET_THEME_TEXT: &str =
    "Your theme is reset. Generate a new theme with natural language.";

const WARM_THEME_PROMPT: &str = "I want to customise the Gantt chart theme. Create a bright and \
    warm theme for me. Also, increase the height of the rows and bars. Make the link width 4px.";
const CALM_THEME_PROMPT: &str =
    "Create me a relaxed and calm theme where blue and light-purple colors prevail.";
const LIGHTER_TASKS_PROMPT: &str = "Make tasks a bit lighter.";

const AFTER_SET_THEME_PILLS: [&str; 3] = [
    LIGHTER_TASKS_PROMPT,
    "Make the current theme a bit darker.",
    "Reset the current theme.",
];
const AFTER_RESET_THEME_PILLS: [&str; 2] = [CALM_THEME_PROMPT, WARM_THEME_PROMPT];
const WELCOME_PILLS: [&str; 3] = [WARM_THEME_PROMPT, LIGHTER_TASKS_PROMPT, CALM_THEME_PROMPT];

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Whether onboarding tips are armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPhase {
    /// No theme generated since start or the last reset.
    #[default]
    AwaitingFirstTheme,
    /// A theme has been generated; tips were already shown.
    ThemeShown,
}

/// Follow-up prompts offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub text: String,
    pub pills: Vec<String>,
}

impl Suggestions {
    fn new(text: &str, pills: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            pills: pills.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn after_set_theme() -> Self {
        Self::new(AFTER_SET_THEME_TEXT, &AFTER_SET_THEME_PILLS)
    }

    pub fn after_reset_theme() -> Self {
        Self::new(AFTER_RESET_THEME_TEXT, &AFTER_RESET_THEME_PILLS)
    }

    /// Greeting shown when a chat opens.
    pub fn welcome() -> Self {
        Self::new(
            "I can customise the Gantt chart theme and configuration with plain-language commands. Try things like:",
            &WELCOME_PILLS,
        )
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What the presentation layer should do after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    ThemeGenerated {
        styles: String,
        config_text: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestions: Option<Suggestions>,
    },
    ThemeReset {
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestions: Option<Suggestions>,
    },
    ConfigsPreviewed {
        config_text: String,
    },
}

/// Full result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub next_state: ThemeState,
    /// Style block for the new theme; `None` after a reset (remove the block).
    pub rendered_style: Option<String>,
    pub rendered_config_text: String,
    pub ui_event: UiEvent,
    pub next_phase: SuggestionPhase,
}

/// Apply `call` to `state`.
pub fn dispatch(
    call: &ToolCall,
    state: &ThemeState,
    baseline: &ConfigSnapshot,
    phase: SuggestionPhase,
    target: &RenderTarget,
) -> DispatchOutcome {
    match call {
        ToolCall::SetTheme { variables, configs } => {
            let theme = merge_theme(&state.theme, variables);
            let config = match configs {
                Some(configs) => merge_config(&state.config, configs),
                None => state.config.clone(),
            };
            let styles = render_style(&theme, target);
            let config_text = render_config_text(&config, target);
            let suggestions = match phase {
                SuggestionPhase::AwaitingFirstTheme => Some(Suggestions::after_set_theme()),
                SuggestionPhase::ThemeShown => None,
            };
            DispatchOutcome {
                next_state: ThemeState { theme, config },
                rendered_style: Some(styles.clone()),
                rendered_config_text: config_text.clone(),
                ui_event: UiEvent::ThemeGenerated {
                    styles,
                    config_text,
                    message: THEME_APPLIED_MESSAGE.to_string(),
                    suggestions,
                },
                next_phase: SuggestionPhase::ThemeShown,
            }
        }
        ToolCall::ResetTheme => {
            let config = reset_config(baseline);
            let config_text = render_config_text(&config, target);
            let suggestions = match phase {
                SuggestionPhase::ThemeShown => Some(Suggestions::after_reset_theme()),
                SuggestionPhase::AwaitingFirstTheme => None,
            };
            DispatchOutcome {
                next_state: ThemeState {
                    theme: reset_theme(),
                    config,
                },
                rendered_style: None,
                rendered_config_text: config_text,
                ui_event: UiEvent::ThemeReset { suggestions },
                next_phase: SuggestionPhase::AwaitingFirstTheme,
            }
        }
        ToolCall::SetConfigs { configs } => {
            let config = merge_config(&state.config, configs);
            let config_text = render_config_text(&config, target);
            DispatchOutcome {
                next_state: ThemeState {
                    theme: state.theme.clone(),
                    config,
                },
                rendered_style: None,
                rendered_config_text: config_text.clone(),
                ui_event: UiEvent::ConfigsPreviewed { config_text },
                next_phase: phase,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ConfigSetting, ThemeSnapshot, ThemeVariable};

    fn baseline() -> ConfigSnapshot {
        ConfigSnapshot::from_entries([
            ConfigSetting::new("link_line_width", 2),
            ConfigSetting::new("row_height", 36),
        ])
    }

    fn set_theme(vars: &[(&str, &str)]) -> ToolCall {
        ToolCall::SetTheme {
            variables: vars.iter().map(|(k, v)| ThemeVariable::new(*k, *v)).collect(),
            configs: None,
        }
    }

    #[test]
    fn reset_after_theme_restores_baseline_and_offers_tips() {
        let baseline = baseline();
        let state = ThemeState {
            theme: ThemeSnapshot::from_entries([
                ThemeVariable::new("--a", "1"),
                ThemeVariable::new("--b", "2"),
            ]),
            config: merge_config(&baseline, &[ConfigSetting::new("row_height", 45)]),
        };
        let outcome = dispatch(
            &ToolCall::ResetTheme,
            &state,
            &baseline,
            SuggestionPhase::ThemeShown,
            &RenderTarget::default(),
        );
        assert!(outcome.next_state.theme.is_empty());
        assert_eq!(outcome.next_state.config, baseline);
        assert_eq!(outcome.rendered_style, None);
        assert_eq!(
            outcome.ui_event,
            UiEvent::ThemeReset {
                suggestions: Some(Suggestions::after_reset_theme())
            }
        );
        assert_eq!(outcome.next_phase, SuggestionPhase::AwaitingFirstTheme);
    }

    #[test]
    fn reset_before_any_theme_has_no_tips() {
        let baseline = baseline();
        let outcome = dispatch(
            &ToolCall::ResetTheme,
            &ThemeState::with_baseline(&baseline),
            &baseline,
            SuggestionPhase::AwaitingFirstTheme,
            &RenderTarget::default(),
        );
        assert_eq!(outcome.ui_event, UiEvent::ThemeReset { suggestions: None });
        assert_eq!(outcome.next_phase, SuggestionPhase::AwaitingFirstTheme);
    }

    #[test]
    fn first_set_theme_offers_tips_once() {
        let baseline = baseline();
        let target = RenderTarget::default();
        let first = dispatch(
            &set_theme(&[("--a", "1")]),
            &ThemeState::with_baseline(&baseline),
            &baseline,
            SuggestionPhase::AwaitingFirstTheme,
            &target,
        );
        let UiEvent::ThemeGenerated { suggestions, message, .. } = &first.ui_event else {
            panic!("unexpected event: {:?}", first.ui_event);
        };
        assert_eq!(suggestions.as_ref(), Some(&Suggestions::after_set_theme()));
        assert_eq!(message, THEME_APPLIED_MESSAGE);
        assert_eq!(first.next_phase, SuggestionPhase::ThemeShown);

        let second = dispatch(
            &set_theme(&[("--b", "2")]),
            &first.next_state,
            &baseline,
            first.next_phase,
            &target,
        );
        assert!(matches!(
            second.ui_event,
            UiEvent::ThemeGenerated { suggestions: None, .. }
        ));
        assert_eq!(
            second.next_state.theme.as_slice(),
            &[ThemeVariable::new("--a", "1"), ThemeVariable::new("--b", "2")]
        );
    }

    #[test]
    fn set_theme_renders_style_and_merged_config() {
        let baseline = baseline();
        let call = ToolCall::SetTheme {
            variables: vec![ThemeVariable::new("--dhx-gantt-task-background", "#ff0000")],
            configs: Some(vec![ConfigSetting::new("row_height", 45)]),
        };
        let outcome = dispatch(
            &call,
            &ThemeState::with_baseline(&baseline),
            &baseline,
            SuggestionPhase::ThemeShown,
            &RenderTarget::default(),
        );
        assert_eq!(
            outcome.rendered_style.as_deref(),
            Some(":root {\n  --dhx-gantt-task-background: #ff0000;\n}")
        );
        assert_eq!(
            outcome.rendered_config_text,
            "gantt.config.link_line_width = 2;\ngantt.config.row_height = 45;"
        );
    }

    #[test]
    fn set_theme_without_configs_keeps_config() {
        let baseline = baseline();
        let state = ThemeState {
            theme: ThemeSnapshot::new(),
            config: merge_config(&baseline, &[ConfigSetting::new("link_line_width", 4)]),
        };
        let outcome = dispatch(
            &set_theme(&[]),
            &state,
            &baseline,
            SuggestionPhase::ThemeShown,
            &RenderTarget::default(),
        );
        assert_eq!(outcome.next_state.config, state.config);
    }

    #[test]
    fn set_configs_leaves_theme_and_phase_alone() {
        let baseline = baseline();
        let state = ThemeState {
            theme: ThemeSnapshot::from_entries([ThemeVariable::new("--a", "1")]),
            config: baseline.clone(),
        };
        let call = ToolCall::SetConfigs {
            configs: vec![ConfigSetting::new("show_progress", false)],
        };
        for phase in [SuggestionPhase::AwaitingFirstTheme, SuggestionPhase::ThemeShown] {
            let outcome = dispatch(&call, &state, &baseline, phase, &RenderTarget::default());
            assert_eq!(outcome.next_state.theme, state.theme);
            assert_eq!(outcome.next_phase, phase);
            assert_eq!(
                outcome.ui_event,
                UiEvent::ConfigsPreviewed {
                    config_text: "gantt.config.link_line_width = 2;\ngantt.config.row_height = 36;\ngantt.config.show_progress = false;".to_string()
                }
            );
        }
    }

    #[test]
    fn interleaved_commands_match_one_union_pass() {
        let baseline = baseline();
        let target = RenderTarget::default();
        let first_vars = vec![ThemeVariable::new("--a", "1"), ThemeVariable::new("--b", "2")];
        let first_configs = vec![ConfigSetting::new("row_height", 40)];
        let preview = vec![
            ConfigSetting::new("link_line_width", 3),
            ConfigSetting::new("show_progress", false),
        ];
        let second_vars = vec![ThemeVariable::new("--b", "20"), ThemeVariable::new("--c", "3")];
        let second_configs = vec![ConfigSetting::new("row_height", 48)];

        let calls = [
            ToolCall::SetTheme {
                variables: first_vars.clone(),
                configs: Some(first_configs.clone()),
            },
            ToolCall::SetConfigs {
                configs: preview.clone(),
            },
            ToolCall::SetTheme {
                variables: second_vars.clone(),
                configs: Some(second_configs.clone()),
            },
        ];
        let mut state = ThemeState::with_baseline(&baseline);
        let mut phase = SuggestionPhase::default();
        for call in &calls {
            let outcome = dispatch(call, &state, &baseline, phase, &target);
            state = outcome.next_state;
            phase = outcome.next_phase;
        }

        let all_vars: Vec<ThemeVariable> = first_vars.into_iter().chain(second_vars).collect();
        let all_configs: Vec<ConfigSetting> = first_configs
            .into_iter()
            .chain(preview)
            .chain(second_configs)
            .collect();
        assert_eq!(state.theme, merge_theme(&ThemeSnapshot::new(), &all_vars));
        assert_eq!(state.config, merge_config(&baseline, &all_configs));
        assert_eq!(
            state.config.as_slice(),
            &[
                ConfigSetting::new("link_line_width", 3),
                ConfigSetting::new("row_height", 48),
                ConfigSetting::new("show_progress", false),
            ]
        );
        assert_eq!(phase, SuggestionPhase::ThemeShown);
    }

    #[test]
    fn ui_event_serializes_with_tag() {
        let event = UiEvent::ThemeReset { suggestions: None };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"event": "theme_reset"})
        );
    }
}
