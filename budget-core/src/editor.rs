//! Editor Flow: `Viewing` ⇄ `Editing { draft }`.
//!
//! The draft is free-form markup. Saving hands the draft back as the new
//! current document; cancelling discards it.

use thiserror::Error;

use crate::BudgetDocument;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("already editing")]
    AlreadyEditing,

    #[error("not editing")]
    NotEditing,

    #[error("invalid selection {start}..{end} for a draft of {len} bytes")]
    InvalidSelection { start: usize, end: usize, len: usize },

    #[error("nothing selected")]
    EmptySelection,

    #[error("font size must be between 1 and 200 px, got {0}")]
    InvalidFontSize(u32),
}

/// Byte range within the draft. `start == end` is a caret position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(
        start: usize,
        end: usize,
    ) -> Self {
        Self { start, end }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Formatting applied to a selection of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    /// Font size in pixels.
    FontSize(u32),
    /// Replaces the selection with a 2×2 placeholder table.
    InsertTable,
}

impl FormatCommand {
    /// Parses `bold`, `italic`, `underline`, `table` or `size:<px>`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            "underline" => Some(Self::Underline),
            "table" => Some(Self::InsertTable),
            other => other
                .strip_prefix("size:")
                .and_then(|px| px.trim().parse().ok())
                .map(Self::FontSize),
        }
    }
}

const TABLE_SNIPPET: &str = r#"<table style="width: 100%; border-collapse: collapse; margin: 15px 0; border: 2px solid #e5e7eb;">
<thead><tr style="background: #f3f4f6;"><th style="border: 1px solid #d1d5db; padding: 12px; text-align: left;">Coluna 1</th><th style="border: 1px solid #d1d5db; padding: 12px; text-align: left;">Coluna 2</th></tr></thead>
<tbody>
<tr><td style="border: 1px solid #d1d5db; padding: 12px;">Dados 1</td><td style="border: 1px solid #d1d5db; padding: 12px;">Dados 2</td></tr>
<tr style="background: #f9fafb;"><td style="border: 1px solid #d1d5db; padding: 12px;">Dados 3</td><td style="border: 1px solid #d1d5db; padding: 12px;">Dados 4</td></tr>
</tbody>
</table>"#;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Viewing,
    Editing {
        draft: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DocumentEditor {
    state: EditorState,
}

impl DocumentEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditorState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditorState::Editing { draft } => Some(draft),
            EditorState::Viewing => None,
        }
    }

    /// Starts editing a copy of `current`.
    pub fn begin(
        &mut self,
        current: &BudgetDocument,
    ) -> Result<(), EditorError> {
        if self.is_editing() {
            return Err(EditorError::AlreadyEditing);
        }
        self.state = EditorState::Editing {
            draft: current.as_str().to_string(),
        };
        Ok(())
    }

    /// Replaces the whole draft.
    pub fn set_draft(
        &mut self,
        markup: impl Into<String>,
    ) -> Result<(), EditorError> {
        *self.draft_mut()? = markup.into();
        Ok(())
    }

    pub fn apply(
        &mut self,
        command: FormatCommand,
        selection: Selection,
    ) -> Result<(), EditorError> {
        let draft = self.draft_mut()?;
        let len = draft.len();
        if selection.start > selection.end
            || selection.end > len
            || !draft.is_char_boundary(selection.start)
            || !draft.is_char_boundary(selection.end)
        {
            return Err(EditorError::InvalidSelection {
                start: selection.start,
                end: selection.end,
                len,
            });
        }

        let selected = &draft[selection.start..selection.end];
        let replacement = match command {
            FormatCommand::InsertTable => TABLE_SNIPPET.to_string(),
            _ if selection.is_empty() => return Err(EditorError::EmptySelection),
            FormatCommand::Bold => format!("<b>{selected}</b>"),
            FormatCommand::Italic => format!("<i>{selected}</i>"),
            FormatCommand::Underline => format!("<u>{selected}</u>"),
            FormatCommand::FontSize(px) if (1..=200).contains(&px) => {
                format!(r#"<span style="font-size: {px}px;">{selected}</span>"#)
            }
            FormatCommand::FontSize(px) => return Err(EditorError::InvalidFontSize(px)),
        };

        draft.replace_range(selection.start..selection.end, &replacement);
        Ok(())
    }

    /// The draft as a document, for previewing without saving.
    pub fn preview(&self) -> Result<BudgetDocument, EditorError> {
        self.draft()
            .map(BudgetDocument::new)
            .ok_or(EditorError::NotEditing)
    }

    /// Leaves editing and returns the draft as the new current document.
    pub fn save(&mut self) -> Result<BudgetDocument, EditorError> {
        match std::mem::take(&mut self.state) {
            EditorState::Editing { draft } => Ok(BudgetDocument::new(draft)),
            EditorState::Viewing => Err(EditorError::NotEditing),
        }
    }

    /// Leaves editing and discards the draft.
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        match std::mem::take(&mut self.state) {
            EditorState::Editing { .. } => Ok(()),
            EditorState::Viewing => Err(EditorError::NotEditing),
        }
    }

    fn draft_mut(&mut self) -> Result<&mut String, EditorError> {
        match &mut self.state {
            EditorState::Editing { draft } => Ok(draft),
            EditorState::Viewing => Err(EditorError::NotEditing),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn editing(markup: &str) -> DocumentEditor {
        let mut editor = DocumentEditor::new();
        editor.begin(&BudgetDocument::new(markup)).unwrap();
        editor
    }

    // ── state transitions ────────────────────────────────────────────────

    #[test]
    fn begin_copies_current_document() {
        let editor = editing("<p>Olá</p>");

        assert!(editor.is_editing());
        assert_eq!(editor.draft(), Some("<p>Olá</p>"));
    }

    #[test]
    fn begin_while_editing_is_rejected() {
        let mut editor = editing("<p>a</p>");

        assert_eq!(
            editor.begin(&BudgetDocument::new("<p>b</p>")),
            Err(EditorError::AlreadyEditing)
        );
        assert_eq!(editor.draft(), Some("<p>a</p>"));
    }

    #[test]
    fn save_returns_draft_and_returns_to_viewing() {
        let mut editor = editing("<p>a</p>");
        editor.set_draft("<p>editado</p>").unwrap();

        let saved = editor.save().unwrap();

        assert_eq!(saved.as_str(), "<p>editado</p>");
        assert_eq!(editor.state(), &EditorState::Viewing);
    }

    #[test]
    fn cancel_discards_draft() {
        let mut editor = editing("<p>a</p>");
        editor.set_draft("<p>b</p>").unwrap();

        editor.cancel().unwrap();

        assert!(!editor.is_editing());
        assert_eq!(editor.draft(), None);
    }

    #[test]
    fn save_cancel_and_preview_while_viewing_are_rejected() {
        let mut editor = DocumentEditor::new();

        assert_eq!(editor.save(), Err(EditorError::NotEditing));
        assert_eq!(editor.cancel(), Err(EditorError::NotEditing));
        assert_eq!(editor.preview(), Err(EditorError::NotEditing));
        assert_eq!(editor.set_draft("x"), Err(EditorError::NotEditing));
    }

    #[test]
    fn preview_does_not_leave_editing() {
        let editor = editing("<p>a</p>");

        assert_eq!(editor.preview().unwrap().as_str(), "<p>a</p>");
        assert!(editor.is_editing());
    }

    // ── formatting ───────────────────────────────────────────────────────

    #[test]
    fn wraps_selection() {
        let mut editor = editing("Olá mundo");

        // "mundo" starts after the 2-byte 'á'
        editor.apply(FormatCommand::Bold, Selection::new(5, 10)).unwrap();
        assert_eq!(editor.draft(), Some("Olá <b>mundo</b>"));

        editor.apply(FormatCommand::Italic, Selection::new(0, 4)).unwrap();
        assert_eq!(editor.draft(), Some("<i>Olá</i> <b>mundo</b>"));
    }

    #[test]
    fn font_size_uses_pixels() {
        let mut editor = editing("abc");

        editor.apply(FormatCommand::FontSize(18), Selection::new(0, 3)).unwrap();

        assert_eq!(
            editor.draft(),
            Some(r#"<span style="font-size: 18px;">abc</span>"#)
        );
        assert_eq!(
            editor.apply(FormatCommand::FontSize(0), Selection::new(0, 1)),
            Err(EditorError::InvalidFontSize(0))
        );
    }

    #[test]
    fn insert_table_at_caret() {
        let mut editor = editing("<p>a</p>");

        editor.apply(FormatCommand::InsertTable, Selection::caret(8)).unwrap();

        let draft = editor.draft().unwrap();
        assert!(draft.starts_with("<p>a</p><table"));
        assert!(draft.contains("Coluna 2"));
        assert!(draft.contains("Dados 4"));
    }

    #[test]
    fn rejects_invalid_selections() {
        let mut editor = editing("Olá");

        assert!(matches!(
            editor.apply(FormatCommand::Bold, Selection::new(2, 1)),
            Err(EditorError::InvalidSelection { .. })
        ));
        assert!(matches!(
            editor.apply(FormatCommand::Bold, Selection::new(0, 9)),
            Err(EditorError::InvalidSelection { .. })
        ));
        // inside the two bytes of 'á'
        assert!(matches!(
            editor.apply(FormatCommand::Bold, Selection::new(0, 3)),
            Err(EditorError::InvalidSelection { .. })
        ));
        assert_eq!(
            editor.apply(FormatCommand::Underline, Selection::caret(1)),
            Err(EditorError::EmptySelection)
        );
        assert_eq!(editor.draft(), Some("Olá"));
    }

    #[test]
    fn parses_command_names() {
        assert_eq!(FormatCommand::parse("bold"), Some(FormatCommand::Bold));
        assert_eq!(FormatCommand::parse("TABLE"), Some(FormatCommand::InsertTable));
        assert_eq!(FormatCommand::parse("size:24"), Some(FormatCommand::FontSize(24)));
        assert_eq!(FormatCommand::parse("size:big"), None);
        assert_eq!(FormatCommand::parse("strike"), None);
    }
}
