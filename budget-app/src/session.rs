//! Interactive line-based session over a [`Controller`].
//!
//! One command per line; `help` lists them. The periodic autosave runs for
//! the lifetime of the session and is stopped on `quit` or end of input.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use budget_core::catalog::{Preset, SampleParty};
use budget_core::{FieldId, FormatCommand, RawItemRow, Selection};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::controller::{AppError, Controller, ExportOutcome};
use crate::export::ExportKind;
use crate::export::share::ShareOutcome;
use crate::report;
use crate::scheduler::AutosaveTask;
use crate::shortcuts::{self, KeyChord, ShortcutError};

pub const PROMPT: &str = "orçamento> ";

pub const HELP: &str = "\
Comandos:
  set <campo> <valor>            altera um campo (ex.: set clientName Maria)
  fields                         lista os identificadores de campo
  item add [descrição;qtd;valor] adiciona uma linha de item
  item rm <n>                    remove a linha n
  items import <arquivo.csv>     adiciona itens de um CSV
  preset <web|mobile|design|marketing>
  sample <empresa|cliente>       preenche dados de exemplo
  show                           mostra o formulário
  suggest                        dicas para o tipo de serviço
  generate                       gera o orçamento
  preview                        mostra o orçamento atual
  stats                          estatísticas do orçamento
  edit | draft <html> | format <cmd> <início> <fim> | save | cancel
  improve                        melhoria com IA
  export <pdf|html|print|copy|share>
  template <save|load|delete> <nome> | template list
  history list | history <load|delete> <id> | history clear
  key <atalho>                   ex.: ctrl+s, ctrl+shift+enter, esc
  log <nível>                    altera o nível de log
  clear                          limpa o formulário
  quit";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Shortcut(#[from] ShortcutError),
}

fn usage(text: &str) -> SessionError {
    SessionError::Usage(format!("uso: {text}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<W> {
    controller: Controller,
    out: W,
    autosave_period: Duration,
}

impl<W: Write> Session<W> {
    pub fn new(
        controller: Controller,
        out: W,
        autosave_period: Duration,
    ) -> Self {
        Self {
            controller,
            out,
            autosave_period,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R>(
        &mut self,
        input: R,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let autosave = AutosaveTask::new(
            self.controller.autosave_store(),
            self.controller.form_updates(),
            self.controller.dialogs(),
            self.autosave_period,
        )
        .spawn();

        let mut lines = input.lines();
        write!(self.out, "{PROMPT}")?;
        self.out.flush()?;

        while let Some(line) = lines.next_line().await? {
            match self.execute(&line).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                // Already shown to the user through the dialogs.
                Err(SessionError::App(err)) => tracing::debug!(%err, "command failed"),
                Err(err) => writeln!(self.out, "{err}")?,
            }
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;
        }

        writeln!(self.out)?;
        autosave.shutdown().await;
        Ok(())
    }

    async fn execute(
        &mut self,
        line: &str,
    ) -> Result<Flow, SessionError> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "quit" | "exit" | "sair" => return Ok(Flow::Quit),
            "help" | "ajuda" => self.print(HELP),
            "fields" => {
                let ids = FieldId::all()
                    .iter()
                    .map(FieldId::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.print(&ids);
            }
            "set" => self.set_field(rest)?,
            "item" => self.item(rest)?,
            "items" => self.import_items(rest)?,
            "preset" => {
                let preset = Preset::parse(rest).ok_or_else(|| usage("preset <web|mobile|design|marketing>"))?;
                self.controller.apply_preset(preset);
            }
            "sample" => {
                let party = SampleParty::parse(rest).ok_or_else(|| usage("sample <empresa|cliente>"))?;
                self.controller.fill_sample(party);
            }
            "show" => {
                let summary = report::form_summary(
                    self.controller.raw(),
                    self.controller.completion(),
                    self.controller.items_total(),
                );
                self.print(&summary);
            }
            "suggest" => {
                let tips = self.controller.suggestions().join("\n");
                self.print(&tips);
            }
            "generate" => self.generate().await?,
            "preview" => {
                let text = report::document_text(self.controller.preview()?);
                self.print(&text);
            }
            "stats" => match self.controller.stats() {
                Some(stats) => {
                    let text = report::stats_report(stats);
                    self.print(&text);
                }
                None => self.print(crate::controller::NO_DOCUMENT),
            },
            "edit" => {
                let draft = self.controller.begin_edit()?.to_string();
                self.print(&draft);
            }
            "draft" => self.controller.set_draft(rest)?,
            "format" => self.format(rest)?,
            "save" => {
                self.controller.save_edit()?;
            }
            "cancel" => self.controller.cancel_edit()?,
            "improve" => self.controller.ai_improve(),
            "export" => self.export(rest).await?,
            "template" => self.template(rest).await?,
            "history" => self.history(rest).await?,
            "key" => {
                let chord = KeyChord::parse(rest)?;
                match shortcuts::resolve(chord) {
                    Some(shortcut) => {
                        let out = &mut self.out;
                        self.controller
                            .dispatch(shortcut, |step| {
                                let _ = writeln!(out, "{step}");
                            })
                            .await?;
                    }
                    None => self.print(&format!("Atalho {chord} sem ação")),
                }
            }
            "log" => {
                if let Err(err) = crate::logging::set_log_level(rest) {
                    self.print(&err.to_string());
                }
            }
            "clear" => {
                self.controller.clear_form();
            }
            other => {
                return Err(SessionError::Usage(format!(
                    "comando desconhecido '{other}' (digite help)"
                )));
            }
        }
        Ok(Flow::Continue)
    }

    fn print(
        &mut self,
        text: &str,
    ) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!(%err, "session output failed");
        }
    }

    fn set_field(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        let (id, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let field = FieldId::parse(id).ok_or_else(|| usage("set <campo> <valor> (veja fields)"))?;
        self.controller.set_field(field, value.trim());
        Ok(())
    }

    fn item(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        let (action, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match action {
            "add" if args.trim().is_empty() => self.controller.add_item(),
            "add" => {
                let mut cells = args.split(';').map(str::trim);
                let row = RawItemRow::new(
                    cells.next().unwrap_or_default(),
                    cells.next().unwrap_or("1"),
                    cells.next().unwrap_or_default(),
                );
                self.controller.push_item(row);
            }
            "rm" => {
                let index = args
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .ok_or_else(|| usage("item rm <n>"))?;
                if self.controller.remove_item(index).is_none() {
                    return Err(SessionError::Usage(format!("item {} não existe", index + 1)));
                }
            }
            _ => return Err(usage("item add [descrição;qtd;valor] | item rm <n>")),
        }
        Ok(())
    }

    fn import_items(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        let path = rest
            .strip_prefix("import")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| usage("items import <arquivo.csv>"))?;
        let rows = budget_data::LineItemLoader::load_from_file(std::path::Path::new(path))
            .map_err(|e| SessionError::Usage(e.to_string()))?;
        let count = self.controller.import_items(rows, false);
        self.print(&format!("{count} itens importados"));
        Ok(())
    }

    async fn generate(&mut self) -> Result<(), SessionError> {
        let out = &mut self.out;
        self.controller
            .generate(|step| {
                let _ = writeln!(out, "{step}");
            })
            .await?;
        if let Some(stats) = self.controller.stats() {
            let text = report::stats_report(stats);
            self.print(&text);
        }
        Ok(())
    }

    fn format(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        const USAGE: &str = "format <bold|italic|underline|table|size:<px>> <início> <fim>";
        let mut parts = rest.split_whitespace();
        let command = parts
            .next()
            .and_then(FormatCommand::parse)
            .ok_or_else(|| usage(USAGE))?;
        let mut offset = || parts.next().and_then(|p| p.parse::<usize>().ok());
        let selection = match (offset(), offset()) {
            (Some(start), Some(end)) => Selection::new(start, end),
            (Some(at), None) => Selection::caret(at),
            _ => return Err(usage(USAGE)),
        };
        let draft = self.controller.apply_format(command, selection)?.to_string();
        self.print(&draft);
        Ok(())
    }

    async fn export(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        let kind = ExportKind::parse(rest).ok_or_else(|| usage("export <pdf|html|print|copy|share>"))?;
        match self.controller.export(kind).await? {
            ExportOutcome::Saved(path) => self.print(&path.display().to_string()),
            ExportOutcome::Shared(ShareOutcome::Emailed(link)) => self.print(&link),
            ExportOutcome::Printed | ExportOutcome::Copied(_) | ExportOutcome::Shared(_) => {}
        }
        Ok(())
    }

    async fn template(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        let (action, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let name = name.trim();
        match (action, name.is_empty()) {
            ("list", _) => {
                let names = self.controller.template_names().join("\n");
                self.print(&names);
            }
            ("save", true) => {
                self.controller.save_template().await?;
            }
            ("save", false) => {
                self.controller.save_template_as(name).await?;
            }
            ("load", false) => self.controller.load_template(name)?,
            ("delete", false) => {
                self.controller.delete_template(name).await?;
            }
            _ => return Err(usage("template <save|load|delete> <nome> | template list")),
        }
        Ok(())
    }

    async fn history(
        &mut self,
        rest: &str,
    ) -> Result<(), SessionError> {
        let (action, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let id = || arg.trim().parse::<i64>().map_err(|_| usage("history <load|delete> <id>"));
        match action {
            "" | "list" => {
                let list = report::history_list(self.controller.history());
                self.print(&list);
            }
            "load" => {
                let id = id()?;
                let text = report::document_text(self.controller.load_from_history(id)?);
                self.print(&text);
            }
            "delete" => {
                let id = id()?;
                self.controller.delete_history(id).await?;
            }
            "clear" => {
                self.controller.clear_history().await?;
            }
            _ => return Err(usage("history list | history <load|delete> <id> | history clear")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use budget_core::store::{KeyValueStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use tokio::io::BufReader;

    use super::*;
    use crate::app::build_collaborators;
    use crate::config::AppConfig;
    use crate::dialogs::{RecordingDialogs, ToastKind};
    use crate::scheduler::ProgressSequence;

    async fn session(dialogs: Arc<RecordingDialogs>) -> Session<Vec<u8>> {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let controller = Controller::start(
            kv,
            dialogs,
            build_collaborators(&AppConfig::default()),
            ProgressSequence::new(Duration::ZERO),
        )
        .await
        .expect("controller starts");
        Session::new(controller, Vec::new(), Duration::from_secs(30))
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(&session.out).into_owned()
    }

    #[tokio::test]
    async fn generate_then_list_history() {
        let dialogs = Arc::new(RecordingDialogs::new());
        let mut session = session(dialogs.clone()).await;
        let script = "set clientName Maria Souza\ngenerate\nhistory list\nquit\n";

        session.run(BufReader::new(script.as_bytes())).await.expect("session runs");

        let out = output(&session);
        assert!(out.contains("Analisando dados..."));
        assert!(out.contains("Finalizando orçamento..."));
        assert!(out.contains("Maria Souza - TechSolutions Pro"));
        assert_eq!(session.controller().history().len(), 1);
        assert!(
            dialogs
                .toasts()
                .contains(&(ToastKind::Success, "Orçamento gerado com sucesso!".to_string()))
        );
    }

    #[tokio::test]
    async fn usage_errors_are_printed_and_the_session_continues() {
        let dialogs = Arc::new(RecordingDialogs::new());
        let mut session = session(dialogs).await;

        session
            .run(BufReader::new("frobnicate\nset nope x\nitem rm 9\n".as_bytes()))
            .await
            .expect("session runs");

        let out = output(&session);
        assert!(out.contains("comando desconhecido 'frobnicate'"));
        assert!(out.contains("uso: set <campo> <valor>"));
        assert!(out.contains("item 9 não existe"));
    }

    #[tokio::test]
    async fn preview_without_document_alerts() {
        let dialogs = Arc::new(RecordingDialogs::new());
        let mut session = session(dialogs.clone()).await;

        session
            .run(BufReader::new("preview\nstats\n".as_bytes()))
            .await
            .expect("session runs");

        assert_eq!(dialogs.alerts(), vec![crate::controller::NO_DOCUMENT.to_string()]);
        assert!(output(&session).contains(crate::controller::NO_DOCUMENT));
    }

    #[tokio::test]
    async fn items_and_templates() {
        let dialogs = Arc::new(RecordingDialogs::new());
        let mut session = session(dialogs).await;
        let script = "\
item add Hospedagem;12;29,90
item add Domínio;1;40
template save Base
set clientName Outro
template load Base
template list
";

        session.run(BufReader::new(script.as_bytes())).await.expect("session runs");

        let controller = session.controller();
        assert_eq!(controller.template_names(), vec!["Base".to_string()]);
        assert_eq!(controller.raw().get(FieldId::ClientName), "João Silva");
        assert_eq!(controller.raw().items.len(), 2);
        assert!(output(&session).lines().any(|line| line.ends_with("Base")));
    }
}
