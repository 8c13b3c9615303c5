//! Typing indicator shown while a request is outstanding

use duck_application::LifecycleObserver;
use duck_domain::{TYPING_INDICATOR, Turn};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Spinner driven by the controller's busy/idle transitions
pub struct TypingIndicator {
    message: String,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TypingIndicator {
    pub fn new() -> Self {
        Self::with_message(TYPING_INDICATOR)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            spinner: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn is_visible(&self) -> bool {
        self.spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleObserver for TypingIndicator {
    fn on_busy(&self, _transcript: &[Turn]) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::style());
        spinner.set_message(self.message.clone());
        spinner.enable_steady_tick(Duration::from_millis(120));

        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(spinner) {
            previous.finish_and_clear();
        }
    }

    fn on_idle(&self, _transcript: &[Turn]) {
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(spinner) = slot.take() {
            spinner.finish_and_clear();
        }
    }
}
