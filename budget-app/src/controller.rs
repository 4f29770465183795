//! The application controller: owns the state, the stores and the
//! collaborators, and runs every user-facing operation.
//!
//! Failures are reported to the user here, once, through [`Dialogs`]:
//! blank required fields and a missing document raise an alert, while
//! export, editor and storage failures raise an error toast. The error is
//! then returned so the caller can decide how to exit.

use std::path::PathBuf;
use std::sync::Arc;

use budget_core::catalog::{self, Preset, SampleParty};
use budget_core::collector::{self, Completion, missing_fields_message, missing_required};
use budget_core::store::{AutosaveStore, HistoryStore, KeyValueStore, TemplateStore};
use budget_core::{
    AutosaveSnapshot, BudgetDocument, ComposeContext, DocumentStats, EditorError, FieldId,
    FormState, FormatCommand, HistoryEntry, RawForm, RawItemRow, Selection, StoreError, compose,
};
use budget_data::LineItemLoader;
use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::watch;

use crate::dialogs::{Dialogs, ToastKind};
use crate::export::share::ShareOutcome;
use crate::export::{self, Collaborators, ExportError, ExportKind};
use crate::scheduler::ProgressSequence;
use crate::shortcuts::Shortcut;
use crate::state::AppState;

pub const NO_DOCUMENT: &str = "Gere um orçamento primeiro!";
pub const AI_IMPROVE_NOTICE: &str = "🤖 Funcionalidade de melhoria com IA em desenvolvimento! Em breve você poderá otimizar automaticamente o texto do seu orçamento com inteligência artificial avançada.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", missing_fields_message(.0))]
    Validation(Vec<FieldId>),

    #[error("Gere um orçamento primeiro!")]
    NoDocument,

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Printed,
    Copied(String),
    Shared(ShareOutcome),
}

/// Source of "now" for composition, history and filenames.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub struct Controller {
    state: AppState,
    templates: TemplateStore,
    history: HistoryStore,
    autosave: AutosaveStore,
    dialogs: Arc<dyn Dialogs>,
    collaborators: Collaborators,
    progress: ProgressSequence,
    form_tx: watch::Sender<FormState>,
    clock: Clock,
}

impl Controller {
    /// Loads the stores and restores the autosaved form, or the sample form
    /// when nothing was autosaved.
    pub async fn start(
        store: Arc<dyn KeyValueStore>,
        dialogs: Arc<dyn Dialogs>,
        collaborators: Collaborators,
        progress: ProgressSequence,
    ) -> Result<Self, AppError> {
        let templates = TemplateStore::load(store.clone()).await?;
        let history = HistoryStore::load(store.clone()).await?;
        let autosave = AutosaveStore::new(store);

        let raw = match autosave.load().await {
            Ok(Some(snapshot)) => {
                tracing::info!(at = %snapshot.timestamp, "restoring autosaved form");
                RawForm::from(&snapshot.data)
            }
            Ok(None) => catalog::initial_form(),
            Err(err) => {
                tracing::warn!(%err, "ignoring unreadable autosave");
                catalog::initial_form()
            }
        };

        let state = AppState::new(raw);
        let (form_tx, _) = watch::channel(state.form());

        Ok(Self {
            state,
            templates,
            history,
            autosave,
            dialogs,
            collaborators,
            progress,
            form_tx,
            clock: Arc::new(Local::now),
        })
    }

    pub fn with_clock(
        mut self,
        clock: Clock,
    ) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn raw(&self) -> &RawForm {
        &self.state.raw
    }

    pub fn dialogs(&self) -> Arc<dyn Dialogs> {
        self.dialogs.clone()
    }

    pub fn autosave_store(&self) -> AutosaveStore {
        self.autosave.clone()
    }

    /// Latest collected form, updated on every edit.
    pub fn form_updates(&self) -> watch::Receiver<FormState> {
        self.form_tx.subscribe()
    }

    fn publish(&self) {
        self.form_tx.send_replace(self.state.form());
    }

    fn require_document(&self) -> Result<&BudgetDocument, AppError> {
        match self.state.current_document() {
            Some(document) => Ok(document),
            None => {
                self.dialogs.alert(NO_DOCUMENT);
                Err(AppError::NoDocument)
            }
        }
    }

    fn report_store_error(
        &self,
        err: StoreError,
    ) -> AppError {
        tracing::error!(%err, "storage operation failed");
        self.dialogs
            .toast(ToastKind::Error, &format!("Não foi possível salvar os dados: {err}"));
        AppError::Store(err)
    }

    fn report_editor_error(
        &self,
        err: EditorError,
    ) -> AppError {
        tracing::warn!(%err, "editor command rejected");
        self.dialogs.toast(ToastKind::Error, editor_message(&err));
        AppError::Editor(err)
    }

    // ── Form ─────────────────────────────────────────────────────────────────

    pub fn set_field(
        &mut self,
        field: FieldId,
        value: impl Into<String>,
    ) {
        self.state.raw.set(field, value);
        self.publish();
    }

    /// Appends an empty item row.
    pub fn add_item(&mut self) {
        self.push_item(RawItemRow::blank());
    }

    pub fn push_item(
        &mut self,
        row: RawItemRow,
    ) {
        self.state.raw.push_item(row);
        self.publish();
    }

    pub fn update_item(
        &mut self,
        index: usize,
        row: RawItemRow,
    ) -> bool {
        match self.state.raw.items.get_mut(index) {
            Some(slot) => {
                *slot = row;
                self.publish();
                true
            }
            None => false,
        }
    }

    pub fn remove_item(
        &mut self,
        index: usize,
    ) -> Option<RawItemRow> {
        let removed = self.state.raw.remove_item(index);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    /// Adds imported rows, replacing the current ones when `replace` is set.
    pub fn import_items(
        &mut self,
        rows: Vec<RawItemRow>,
        replace: bool,
    ) -> usize {
        let count = LineItemLoader::apply(&mut self.state.raw, rows, replace);
        self.publish();
        count
    }

    pub fn apply_preset(
        &mut self,
        preset: Preset,
    ) {
        preset.apply(&mut self.state.raw);
        self.publish();
        self.dialogs.toast(
            ToastKind::Success,
            &format!("Template {} carregado!", preset.as_str()),
        );
    }

    pub fn fill_sample(
        &mut self,
        party: SampleParty,
    ) {
        catalog::fill_sample(&mut self.state.raw, party);
        self.publish();
        self.dialogs
            .toast(ToastKind::Success, "Dados de exemplo carregados!");
    }

    /// Empties every field, leaving one blank item row. Asks first.
    pub fn clear_form(&mut self) -> bool {
        if !self
            .dialogs
            .confirm("Tem certeza que deseja limpar todos os dados?")
        {
            return false;
        }
        self.state.raw.clear();
        self.state.raw.push_item(RawItemRow::blank());
        self.publish();
        self.dialogs.toast(ToastKind::Info, "Formulário limpo!");
        true
    }

    pub fn completion(&self) -> Completion {
        collector::completion(&self.state.raw)
    }

    pub fn items_total(&self) -> Decimal {
        collector::items_total(&self.state.raw)
    }

    /// Writing tips for the selected service.
    pub fn suggestions(&self) -> &'static [&'static str] {
        let tips = catalog::suggestions(&self.state.form().service_type);
        self.dialogs
            .toast(ToastKind::Success, "Sugestões da IA atualizadas!");
        tips
    }

    // ── Generation ───────────────────────────────────────────────────────────

    /// Validates, shows the staged progress, composes the proposal, makes it
    /// current and records it in the history.
    pub async fn generate(
        &mut self,
        on_step: impl FnMut(&str),
    ) -> Result<&BudgetDocument, AppError> {
        let missing = missing_required(&self.state.raw);
        if !missing.is_empty() {
            self.dialogs.alert(&missing_fields_message(&missing));
            return Err(AppError::Validation(missing));
        }

        let form = self.state.form();
        self.progress.run(on_step).await;

        let now = self.now();
        let document = compose(&form, &ComposeContext::new(now));

        if self.state.editor.is_editing() {
            tracing::debug!("discarding open edit for the new proposal");
            let _ = self.state.editor.cancel();
        }
        self.state.set_document(document.clone());

        if let Err(err) = self
            .history
            .append(HistoryEntry::new(&form, document, now))
            .await
        {
            let _ = self.report_store_error(err);
        }

        tracing::info!(
            client = %form.client_name,
            history = self.history.len(),
            "proposal generated"
        );
        self.dialogs
            .toast(ToastKind::Success, "Orçamento gerado com sucesso!");
        self.require_document()
    }

    pub fn preview(&self) -> Result<&BudgetDocument, AppError> {
        self.require_document()
    }

    pub fn stats(&self) -> Option<&DocumentStats> {
        self.state.stats()
    }

    // ── History ──────────────────────────────────────────────────────────────

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.list()
    }

    pub fn load_from_history(
        &mut self,
        id: i64,
    ) -> Result<&BudgetDocument, AppError> {
        let Some(entry) = self.history.get(id) else {
            self.dialogs
                .toast(ToastKind::Error, "Orçamento não encontrado no histórico!");
            return Err(AppError::Store(StoreError::NotFound(id.to_string())));
        };
        let document = entry.budget.clone();
        self.dialogs
            .toast(ToastKind::Success, "Orçamento carregado do histórico!");
        Ok(self.state.set_document(document))
    }

    /// Returns `false` when the user declined.
    pub async fn delete_history(
        &mut self,
        id: i64,
    ) -> Result<bool, AppError> {
        if !self
            .dialogs
            .confirm("Tem certeza que deseja excluir este orçamento do histórico?")
        {
            return Ok(false);
        }
        match self.history.delete(id).await {
            Ok(()) => {
                self.dialogs
                    .toast(ToastKind::Info, "Orçamento removido do histórico!");
                Ok(true)
            }
            Err(StoreError::NotFound(id)) => {
                self.dialogs
                    .toast(ToastKind::Error, "Orçamento não encontrado no histórico!");
                Err(AppError::Store(StoreError::NotFound(id)))
            }
            Err(err) => Err(self.report_store_error(err)),
        }
    }

    pub async fn clear_history(&mut self) -> Result<bool, AppError> {
        if !self.dialogs.confirm(
            "Tem certeza que deseja limpar todo o histórico? Esta ação não pode ser desfeita.",
        ) {
            return Ok(false);
        }
        match self.history.clear().await {
            Ok(()) => {
                self.dialogs
                    .toast(ToastKind::Info, "Histórico limpo com sucesso!");
                Ok(true)
            }
            Err(err) => Err(self.report_store_error(err)),
        }
    }

    // ── Editing ──────────────────────────────────────────────────────────────

    pub fn begin_edit(&mut self) -> Result<&str, AppError> {
        let document = self.require_document()?.clone();
        if let Err(err) = self.state.editor.begin(&document) {
            return Err(self.report_editor_error(err));
        }
        Ok(self.state.editor.draft().unwrap_or_default())
    }

    pub fn set_draft(
        &mut self,
        draft: impl Into<String>,
    ) -> Result<(), AppError> {
        self.state
            .editor
            .set_draft(draft)
            .map_err(|err| self.report_editor_error(err))
    }

    pub fn apply_format(
        &mut self,
        command: FormatCommand,
        selection: Selection,
    ) -> Result<&str, AppError> {
        if let Err(err) = self.state.editor.apply(command, selection) {
            return Err(self.report_editor_error(err));
        }
        Ok(self.state.editor.draft().unwrap_or_default())
    }

    pub fn preview_edit(&self) -> Result<BudgetDocument, AppError> {
        self.state
            .editor
            .preview()
            .map_err(|err| self.report_editor_error(err))
    }

    /// Makes the draft the current document.
    pub fn save_edit(&mut self) -> Result<&BudgetDocument, AppError> {
        let document = match self.state.editor.save() {
            Ok(document) => document,
            Err(err) => return Err(self.report_editor_error(err)),
        };
        self.dialogs
            .toast(ToastKind::Success, "Orçamento salvo com sucesso!");
        Ok(self.state.set_document(document))
    }

    pub fn cancel_edit(&mut self) -> Result<(), AppError> {
        self.state
            .editor
            .cancel()
            .map_err(|err| self.report_editor_error(err))
    }

    pub fn ai_improve(&self) {
        self.dialogs.alert(AI_IMPROVE_NOTICE);
    }

    // ── Export ───────────────────────────────────────────────────────────────

    pub async fn export(
        &self,
        kind: ExportKind,
    ) -> Result<ExportOutcome, AppError> {
        let document = self.require_document()?.clone();
        let raw = &self.state.raw;
        let today = self.now().date_naive();
        let c = &self.collaborators;

        let result = match kind {
            ExportKind::Pdf => export::pdf::export(
                &document,
                c.rasterizer.as_ref(),
                c.pdf.as_ref(),
                c.downloads.as_ref(),
                &export::export_filename(raw, today, "pdf"),
            )
            .await
            .map(ExportOutcome::Saved),
            ExportKind::Html => export::html::export(
                &document,
                export::company_or_default(raw),
                c.downloads.as_ref(),
                &export::export_filename(raw, today, "html"),
            )
            .await
            .map(ExportOutcome::Saved),
            ExportKind::Print => export::print::export(&document, c.spooler.as_ref())
                .await
                .map(|()| ExportOutcome::Printed),
            ExportKind::Copy => export::clipboard::export(&document, c.clipboard.as_ref())
                .await
                .map(ExportOutcome::Copied),
            ExportKind::Share => {
                export::share::export(raw, c.share_sheet.as_ref(), c.opener.as_ref())
                    .await
                    .map(ExportOutcome::Shared)
            }
        };

        match result {
            Ok(outcome) => {
                tracing::info!(%kind, ?outcome, "export finished");
                if let Some(message) = success_message(kind) {
                    self.dialogs.toast(ToastKind::Success, message);
                }
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(%kind, %err, "export failed");
                self.dialogs.toast(ToastKind::Error, failure_message(kind));
                Err(AppError::Export(err))
            }
        }
    }

    // ── Templates ────────────────────────────────────────────────────────────

    pub fn template_names(&self) -> Vec<String> {
        self.templates.list()
    }

    pub fn template(
        &self,
        name: &str,
    ) -> Result<&FormState, AppError> {
        self.templates.get(name).map_err(|err| {
            self.dialogs.toast(
                ToastKind::Error,
                &format!("Template \"{}\" não encontrado!", name.trim()),
            );
            AppError::Store(err)
        })
    }

    /// Prompts for a name and saves the current form under it. `None` when
    /// the prompt was dismissed.
    pub async fn save_template(&mut self) -> Result<Option<String>, AppError> {
        match self.dialogs.prompt("Nome do template:") {
            Some(name) => self.save_template_as(&name).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn save_template_as(
        &mut self,
        name: &str,
    ) -> Result<String, AppError> {
        match self.templates.save(name, self.state.form()).await {
            Ok(saved) => {
                self.dialogs.toast(
                    ToastKind::Success,
                    &format!("Template \"{saved}\" salvo com sucesso!"),
                );
                Ok(saved)
            }
            Err(StoreError::EmptyName) => {
                self.dialogs
                    .toast(ToastKind::Error, "Informe um nome para o template!");
                Err(AppError::Store(StoreError::EmptyName))
            }
            Err(err) => Err(self.report_store_error(err)),
        }
    }

    /// Replaces the form with a saved template.
    pub fn load_template(
        &mut self,
        name: &str,
    ) -> Result<(), AppError> {
        let form = match self.templates.get(name) {
            Ok(form) => form,
            Err(err) => {
                self.dialogs.toast(
                    ToastKind::Error,
                    &format!("Template \"{}\" não encontrado!", name.trim()),
                );
                return Err(AppError::Store(err));
            }
        };
        self.state.raw = RawForm::from(form);
        self.publish();
        self.dialogs.toast(
            ToastKind::Success,
            &format!("Template \"{}\" carregado!", name.trim()),
        );
        Ok(())
    }

    /// Returns `false` when the user declined.
    pub async fn delete_template(
        &mut self,
        name: &str,
    ) -> Result<bool, AppError> {
        let name = name.trim();
        if !self.dialogs.confirm(&format!(
            "Tem certeza que deseja excluir o template \"{name}\"?"
        )) {
            return Ok(false);
        }
        match self.templates.delete(name).await {
            Ok(()) => {
                self.dialogs
                    .toast(ToastKind::Info, &format!("Template \"{name}\" excluído!"));
                Ok(true)
            }
            Err(err @ StoreError::NotFound(_)) => {
                self.dialogs.toast(
                    ToastKind::Error,
                    &format!("Template \"{name}\" não encontrado!"),
                );
                Err(AppError::Store(err))
            }
            Err(err) => Err(self.report_store_error(err)),
        }
    }

    // ── Autosave ─────────────────────────────────────────────────────────────

    pub async fn autosaved(&self) -> Result<Option<AutosaveSnapshot>, AppError> {
        self.autosave
            .load()
            .await
            .map_err(|err| self.report_store_error(err))
    }

    /// Persists the current form immediately.
    pub async fn autosave_now(&self) -> Result<AutosaveSnapshot, AppError> {
        let snapshot = AutosaveSnapshot::new(self.state.form(), Utc::now());
        match self.autosave.save(&snapshot).await {
            Ok(()) => Ok(snapshot),
            Err(err) => Err(self.report_store_error(err)),
        }
    }

    /// Replaces the form with the autosaved one. `false` when there is none.
    pub async fn restore_autosave(&mut self) -> Result<bool, AppError> {
        match self.autosaved().await? {
            Some(snapshot) => {
                self.state.raw = RawForm::from(&snapshot.data);
                self.publish();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Shortcuts ────────────────────────────────────────────────────────────

    pub async fn dispatch(
        &mut self,
        shortcut: Shortcut,
        on_step: impl FnMut(&str),
    ) -> Result<(), AppError> {
        tracing::debug!(?shortcut, "shortcut");
        match shortcut {
            Shortcut::Save if self.state.editor.is_editing() => self.save_edit().map(|_| ()),
            Shortcut::Save => self.save_template().await.map(|_| ()),
            Shortcut::Print => self.export(ExportKind::Print).await.map(|_| ()),
            Shortcut::Generate => self.generate(on_step).await.map(|_| ()),
            Shortcut::CloseDialogs => {
                self.dialogs.close_all();
                Ok(())
            }
        }
    }
}

fn success_message(kind: ExportKind) -> Option<&'static str> {
    match kind {
        ExportKind::Pdf => Some("PDF gerado com sucesso!"),
        ExportKind::Html => Some("HTML baixado com sucesso!"),
        ExportKind::Copy => Some("Orçamento copiado para a área de transferência!"),
        ExportKind::Print | ExportKind::Share => None,
    }
}

fn editor_message(err: &EditorError) -> &'static str {
    match err {
        EditorError::AlreadyEditing => "O orçamento já está em edição!",
        EditorError::NotEditing => "Nenhuma edição em andamento!",
        EditorError::InvalidSelection { .. } => "Seleção inválida!",
        EditorError::EmptySelection => "Selecione um trecho do texto primeiro!",
        EditorError::InvalidFontSize(_) => "Tamanho de fonte inválido (1 a 200 px)!",
    }
}

fn failure_message(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Pdf => "Erro ao gerar PDF. Tente novamente.",
        ExportKind::Html => "Erro ao baixar HTML. Tente novamente.",
        ExportKind::Print => "Erro ao abrir a impressão. Tente novamente.",
        ExportKind::Copy => "Erro ao copiar. Tente selecionar e copiar manualmente.",
        ExportKind::Share => "Erro ao compartilhar. Tente novamente.",
    }
}
