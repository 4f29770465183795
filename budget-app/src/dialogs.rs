//! Blocking dialogs and transient toasts.
//!
//! The controller never talks to a terminal directly. Everything the user is
//! told or asked goes through a [`Dialogs`] implementation, so the console
//! front end and the tests see exactly the same sequence of messages.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::{Mutex, MutexGuard};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Error => "✖",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
        }
    }

    /// ANSI color matching the toast's accent color.
    fn color(&self) -> &'static str {
        match self {
            Self::Success => "\x1b[32m",
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
            Self::Info => "\x1b[34m",
        }
    }
}

/// User-facing notification surface.
///
/// Shared between the controller and background tasks, so every method takes
/// `&self`.
pub trait Dialogs: Send + Sync {
    /// Blocking message the user must acknowledge.
    fn alert(
        &self,
        message: &str,
    );

    /// Yes/no question.
    fn confirm(
        &self,
        message: &str,
    ) -> bool;

    /// Free-text question. Answers are trimmed and an empty answer is `None`.
    fn prompt(
        &self,
        message: &str,
    ) -> Option<String>;

    /// Transient notification.
    fn toast(
        &self,
        kind: ToastKind,
        message: &str,
    );

    /// Dismisses every open dialog.
    fn close_all(&self);
}

fn normalize_answer(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Console ──────────────────────────────────────────────────────────────────

/// Terminal dialogs: messages on stderr, answers read from stdin.
pub struct ConsoleDialogs {
    assume_yes: bool,
    ansi: bool,
}

impl ConsoleDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            ansi: io::stderr().is_terminal(),
        }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                tracing::warn!(%err, "failed to read answer");
                None
            }
        }
    }

    fn ask(
        &self,
        question: &str,
    ) -> Option<String> {
        let mut err = io::stderr().lock();
        let _ = write!(err, "{question} ");
        let _ = err.flush();
        drop(err);
        self.read_line()
    }
}

impl Dialogs for ConsoleDialogs {
    fn alert(
        &self,
        message: &str,
    ) {
        eprintln!("\n  {message}\n");
    }

    fn confirm(
        &self,
        message: &str,
    ) -> bool {
        if self.assume_yes {
            eprintln!("{message} [s/N] s");
            return true;
        }
        self.ask(&format!("{message} [s/N]"))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes"))
            .unwrap_or(false)
    }

    fn prompt(
        &self,
        message: &str,
    ) -> Option<String> {
        self.ask(message).as_deref().and_then(normalize_answer)
    }

    fn toast(
        &self,
        kind: ToastKind,
        message: &str,
    ) {
        if self.ansi {
            eprintln!("{}{}\x1b[0m {message}", kind.color(), kind.icon());
        } else {
            eprintln!("{} {message}", kind.icon());
        }
    }

    fn close_all(&self) {
        tracing::debug!("no console dialog left open");
    }
}

// ── Recording ────────────────────────────────────────────────────────────────

/// Something the user was shown or asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Alert(String),
    Confirm(String),
    Prompt(String),
    Toast(ToastKind, String),
    CloseAll,
}

/// Dialogs that record every interaction and answer from a script.
///
/// Confirmations default to yes and prompts to cancelled once the scripted
/// answers run out.
#[derive(Default)]
pub struct RecordingDialogs {
    events: Mutex<Vec<DialogEvent>>,
    confirms: Mutex<VecDeque<bool>>,
    prompts: Mutex<VecDeque<String>>,
}

impl RecordingDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_confirm(
        &self,
        answer: bool,
    ) {
        lock(&self.confirms).push_back(answer);
    }

    pub fn answer_prompt(
        &self,
        answer: impl Into<String>,
    ) {
        lock(&self.prompts).push_back(answer.into());
    }

    pub fn events(&self) -> Vec<DialogEvent> {
        lock(&self.events).clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                DialogEvent::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<(ToastKind, String)> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                DialogEvent::Toast(kind, message) => Some((*kind, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    fn record(
        &self,
        event: DialogEvent,
    ) {
        lock(&self.events).push(event);
    }
}

impl Dialogs for RecordingDialogs {
    fn alert(
        &self,
        message: &str,
    ) {
        self.record(DialogEvent::Alert(message.to_string()));
    }

    fn confirm(
        &self,
        message: &str,
    ) -> bool {
        self.record(DialogEvent::Confirm(message.to_string()));
        lock(&self.confirms).pop_front().unwrap_or(true)
    }

    fn prompt(
        &self,
        message: &str,
    ) -> Option<String> {
        self.record(DialogEvent::Prompt(message.to_string()));
        lock(&self.prompts)
            .pop_front()
            .as_deref()
            .and_then(normalize_answer)
    }

    fn toast(
        &self,
        kind: ToastKind,
        message: &str,
    ) {
        self.record(DialogEvent::Toast(kind, message.to_string()));
    }

    fn close_all(&self) {
        self.record(DialogEvent::CloseAll);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn prompt_answers_are_trimmed() {
        let dialogs = RecordingDialogs::new();
        dialogs.answer_prompt("  Site institucional  ");
        dialogs.answer_prompt("   ");

        assert_eq!(dialogs.prompt("Nome:"), Some("Site institucional".to_string()));
        assert_eq!(dialogs.prompt("Nome:"), None);
        assert_eq!(dialogs.prompt("Nome:"), None);
    }

    #[test]
    fn confirm_defaults_to_yes_after_script() {
        let dialogs = RecordingDialogs::new();
        dialogs.answer_confirm(false);

        assert!(!dialogs.confirm("Excluir?"));
        assert!(dialogs.confirm("Excluir?"));
    }

    #[test]
    fn events_are_recorded_in_order() {
        let dialogs = RecordingDialogs::new();

        dialogs.alert("a");
        dialogs.toast(ToastKind::Info, "b");
        dialogs.close_all();

        assert_eq!(
            dialogs.events(),
            vec![
                DialogEvent::Alert("a".to_string()),
                DialogEvent::Toast(ToastKind::Info, "b".to_string()),
                DialogEvent::CloseAll,
            ]
        );
        assert_eq!(dialogs.alerts(), vec!["a"]);
        assert_eq!(dialogs.toasts(), vec![(ToastKind::Info, "b".to_string())]);
    }
}
