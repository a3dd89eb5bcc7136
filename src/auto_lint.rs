//! Auto-lint mode: an in-memory `{enabled, auto_correct}` pair shared by all
//! handlers of one server instance. Nothing is persisted across restarts.
//!
//! Auto-correct is only meaningful while the mode is enabled, so disabling
//! the mode always clears it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoLintState {
    pub enabled: bool,
    pub auto_correct: bool,
}

impl AutoLintState {
    /// Whether a lint call should pass the auto-fix flag. An explicit request
    /// wins; otherwise inherit from the mode when it is enabled.
    pub fn should_auto_correct(self, requested: bool) -> bool {
        requested || (self.enabled && self.auto_correct)
    }
}

/// Cloneable handle; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct AutoLint {
    state: Arc<Mutex<AutoLintState>>,
}

impl AutoLint {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AutoLintState> {
        // The state is two plain bools; a poisoned lock still holds a valid value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state.
    pub fn config(&self) -> AutoLintState {
        *self.lock()
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn is_auto_correct_enabled(&self) -> bool {
        self.lock().auto_correct
    }

    pub fn set_config(&self, enabled: bool, auto_correct: bool) {
        *self.lock() = AutoLintState {
            enabled,
            auto_correct: enabled && auto_correct,
        };
    }

    pub fn enable(&self, auto_correct: bool) {
        self.set_config(true, auto_correct);
    }

    pub fn disable(&self) {
        self.set_config(false, false);
    }

    pub fn reset(&self) {
        *self.lock() = AutoLintState::default();
    }

    /// See [`AutoLintState::should_auto_correct`]; reads the state once.
    pub fn should_auto_correct(&self, requested: bool) -> bool {
        self.config().should_auto_correct(requested)
    }

    pub fn format_status(&self) -> String {
        let state = self.config();
        let on_off = |b: bool| if b { "enabled" } else { "disabled" };
        let note = if state.enabled {
            "📝 The AI assistant should run RuboCop after generating or modifying Ruby files."
        } else {
            "Auto-lint is currently disabled."
        };
        format!(
            "Auto-lint Status:\n\n• Auto-lint: {}\n• Auto-correction: {}\n\n{note}",
            on_off(state.enabled),
            on_off(state.auto_correct)
        )
    }
}
