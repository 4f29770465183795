//! Export adapters. Each consumes the current document and one external
//! capability from [`Collaborators`].

pub mod clipboard;
pub mod html;
pub mod pdf;
pub mod print;
pub mod share;

use std::fmt;
use std::sync::{Arc, LazyLock};

use budget_core::{FieldId, RawForm};
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::platform::{
    Clipboard, CollaboratorError, DownloadSink, Opener, PdfAssembler, PrintSpooler, Rasterizer,
    ShareSheet,
};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("Image error: {0}")]
    Image(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::Image(err.to_string())
    }
}

/// The ways a document leaves the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Html,
    Print,
    Copy,
    Share,
}

impl ExportKind {
    pub fn all() -> &'static [ExportKind] {
        &[
            ExportKind::Pdf,
            ExportKind::Html,
            ExportKind::Print,
            ExportKind::Copy,
            ExportKind::Share,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Print => "print",
            Self::Copy => "copy",
            Self::Share => "share",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == text.trim())
    }
}

impl fmt::Display for ExportKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External capabilities used by the adapters.
#[derive(Clone)]
pub struct Collaborators {
    pub rasterizer: Arc<dyn Rasterizer>,
    pub pdf: Arc<dyn PdfAssembler>,
    pub clipboard: Arc<dyn Clipboard>,
    pub opener: Arc<dyn Opener>,
    pub share_sheet: Arc<dyn ShareSheet>,
    pub downloads: Arc<dyn DownloadSink>,
    pub spooler: Arc<dyn PrintSpooler>,
}

/// Company name as typed, or `Empresa`.
pub fn company_or_default(raw: &RawForm) -> &str {
    match raw.get(FieldId::CompanyName) {
        "" => "Empresa",
        name => name,
    }
}

/// Client name as typed, or `Cliente`.
pub fn client_or_default(raw: &RawForm) -> &str {
    match raw.get(FieldId::ClientName) {
        "" => "Cliente",
        name => name,
    }
}

/// `Orcamento_<company>_<client>_<dd-mm-yyyy>.<extension>`.
///
/// Whitespace runs, path separators, characters reserved on Windows and
/// control characters in the names become `_`; leading dots are dropped.
pub fn export_filename(
    raw: &RawForm,
    today: NaiveDate,
    extension: &str,
) -> String {
    format!(
        "Orcamento_{}_{}_{}.{extension}",
        filename_part(company_or_default(raw)),
        filename_part(client_or_default(raw)),
        today.format("%d-%m-%Y"),
    )
}

fn filename_part(name: &str) -> String {
    WHITESPACE_RUN
        .replace_all(name, "_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date")
    }

    #[test]
    fn filename_replaces_whitespace_runs() {
        let raw = RawForm::new()
            .with(FieldId::CompanyName, "Tech  Solutions Pro")
            .with(FieldId::ClientName, "João Silva");

        assert_eq!(
            export_filename(&raw, day(), "pdf"),
            "Orcamento_Tech_Solutions_Pro_João_Silva_07-03-2025.pdf"
        );
    }

    #[test]
    fn filename_never_carries_path_components() {
        let raw = RawForm::new()
            .with(FieldId::CompanyName, "..\\Acme:Ltda")
            .with(FieldId::ClientName, "../x/y");

        let filename = export_filename(&raw, day(), "pdf");

        assert_eq!(filename, "Orcamento__Acme_Ltda__x_y_07-03-2025.pdf");
        assert_eq!(
            std::path::Path::new(&filename).file_name(),
            Some(std::ffi::OsStr::new(&filename))
        );
    }

    #[test]
    fn filename_falls_back_for_blank_names() {
        assert_eq!(
            export_filename(&RawForm::new(), day(), "html"),
            "Orcamento_Empresa_Cliente_07-03-2025.html"
        );
    }

    #[test]
    fn export_kinds_parse() {
        assert_eq!(ExportKind::parse("share"), Some(ExportKind::Share));
        assert_eq!(ExportKind::parse("docx"), None);
    }
}
