use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use budget_app::config::AppConfig;
use budget_app::controller::{AppError, Controller, ExportOutcome};
use budget_app::dialogs::ConsoleDialogs;
use budget_app::export::ExportKind;
use budget_app::export::share::ShareOutcome;
use budget_app::session::Session;
use budget_app::logging::{self, LogOptions};
use budget_app::{app, form_file, report};
use budget_core::ServiceType;
use budget_core::catalog::{self, Preset};
use budget_data::LineItemLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Professional budget proposal generator.
///
/// Collects the company, client and project data, composes an HTML
/// proposal, keeps templates and a history of generated proposals, and
/// exports to PDF, HTML, print, clipboard or mail.
#[derive(Debug, Parser)]
#[command(name = "BudgetPro", version)]
struct Cli {
    /// Config file (default: the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend, overriding the config file.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Storage connection string, overriding the config file.
    /// For SQLite this is a file path or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Answer yes to every confirmation.
    #[arg(short, long, global = true)]
    yes: bool,

    /// Log filter, e.g. `debug` or `info,budget_app=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compose a proposal from a form file and record it in the history.
    Generate {
        /// TOML form file; the autosaved form when omitted.
        form: Option<PathBuf>,

        /// CSV of item rows (description, quantity, value).
        #[arg(long)]
        items: Option<PathBuf>,

        /// Replace the form's item rows with the CSV instead of appending.
        #[arg(long, requires = "items")]
        replace_items: bool,

        /// Print the HTML markup instead of the visible text.
        #[arg(long)]
        html: bool,

        /// Print only the document statistics.
        #[arg(long, conflicts_with = "html")]
        stats: bool,

        /// Export the new proposal, may be repeated.
        #[arg(long = "export", value_parser = parse_export_kind)]
        exports: Vec<ExportKind>,
    },

    /// Export a proposal from the history, the newest by default.
    Export {
        #[arg(value_parser = parse_export_kind)]
        kind: ExportKind,

        /// History id of the proposal.
        #[arg(long)]
        id: Option<i64>,
    },

    /// Manage saved form templates.
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Browse generated proposals.
    #[command(subcommand)]
    History(HistoryCommand),

    /// Statistics of a proposal from the history, the newest by default.
    Stats {
        #[arg(long)]
        id: Option<i64>,
    },

    /// Inspect the autosaved form.
    #[command(subcommand)]
    Autosave(AutosaveCommand),

    /// List the service presets.
    Presets,

    /// Writing tips for a service type.
    Suggest {
        #[arg(default_value = "web")]
        service: String,
    },

    /// Write the default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Interactive session.
    Session,
}

#[derive(Debug, Subcommand)]
enum TemplateCommand {
    List,
    Show { name: String },
    /// Save a form file (or the autosaved form) under `name`.
    Save { name: String, form: Option<PathBuf> },
    /// Make the template the autosaved form.
    Load { name: String },
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    List,
    Show {
        id: i64,
        #[arg(long)]
        html: bool,
    },
    Delete { id: i64 },
    Clear,
}

#[derive(Debug, Subcommand)]
enum AutosaveCommand {
    /// Summary of the autosaved form.
    Show,
    /// Write the autosaved form as a form file.
    Restore {
        /// Destination; stdout when omitted.
        output: Option<PathBuf>,
    },
}

fn parse_export_kind(text: &str) -> Result<ExportKind, String> {
    ExportKind::parse(text).ok_or_else(|| {
        let known: Vec<_> = ExportKind::all().iter().map(ExportKind::as_str).collect();
        format!("unknown export '{text}'; expected one of {}", known.join(", "))
    })
}

// ─── commands ────────────────────────────────────────────────────────────────

const NO_AUTOSAVE: &str = "Nenhum formulário salvo automaticamente";

fn print_step(step: &str) {
    eprintln!("  {step}");
}

fn print_presets() {
    for preset in Preset::all() {
        println!(
            "{:<10} R$ {:>8}  {:>3} dias  {}",
            preset.as_str(),
            preset.value(),
            preset.deadline(),
            preset.description()
        );
    }
}

fn report_export(outcome: &ExportOutcome) {
    match outcome {
        ExportOutcome::Saved(path) => println!("{}", path.display()),
        ExportOutcome::Shared(ShareOutcome::Emailed(link)) => println!("{link}"),
        ExportOutcome::Printed | ExportOutcome::Copied(_) | ExportOutcome::Shared(_) => {}
    }
}

fn load_form(
    controller: &mut Controller,
    form: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = form {
        let raw = form_file::load(&path)?;
        for field in budget_core::FieldId::all() {
            controller.set_field(*field, raw.get(*field));
        }
        controller.import_items(raw.items, true);
        debug!(path = %path.display(), "form file loaded");
    }
    Ok(())
}

async fn run(
    command: Command,
    mut controller: Controller,
    config: &AppConfig,
) -> anyhow::Result<()> {
    match command {
        Command::Generate {
            form,
            items,
            replace_items,
            html,
            stats,
            exports,
        } => {
            load_form(&mut controller, form)?;
            if let Some(path) = items {
                let rows = LineItemLoader::load_from_file(&path)?;
                let count = controller.import_items(rows, replace_items);
                info!(count, path = %path.display(), "items imported");
            }

            let document = controller.generate(print_step).await?.clone();
            if stats {
                if let Some(stats) = controller.stats() {
                    println!("{}", report::stats_report(stats));
                }
            } else if html {
                println!("{}", document.as_str());
            } else {
                println!("{}", report::document_text(&document));
            }

            for kind in exports {
                report_export(&controller.export(kind).await?);
            }
            controller.autosave_now().await?;
        }

        Command::Export { kind, id } => {
            let id = id.or_else(|| controller.history().first().map(|entry| entry.id));
            if let Some(id) = id {
                controller.load_from_history(id)?;
            }
            report_export(&controller.export(kind).await?);
        }

        Command::Template(TemplateCommand::List) => {
            for name in controller.template_names() {
                println!("{name}");
            }
        }
        Command::Template(TemplateCommand::Show { name }) => {
            println!("{}", report::template_summary(controller.template(&name)?));
        }
        Command::Template(TemplateCommand::Save { name, form }) => {
            load_form(&mut controller, form)?;
            controller.save_template_as(&name).await?;
        }
        Command::Template(TemplateCommand::Load { name }) => {
            controller.load_template(&name)?;
            controller.autosave_now().await?;
        }
        Command::Template(TemplateCommand::Delete { name }) => {
            controller.delete_template(&name).await?;
        }

        Command::History(HistoryCommand::List) => {
            println!("{}", report::history_list(controller.history()));
        }
        Command::History(HistoryCommand::Show { id, html }) => {
            let document = controller.load_from_history(id)?;
            if html {
                println!("{}", document.as_str());
            } else {
                println!("{}", report::document_text(document));
            }
        }
        Command::History(HistoryCommand::Delete { id }) => {
            controller.delete_history(id).await?;
        }
        Command::History(HistoryCommand::Clear) => {
            controller.clear_history().await?;
        }

        Command::Stats { id } => {
            let id = id.or_else(|| controller.history().first().map(|entry| entry.id));
            if let Some(id) = id {
                controller.load_from_history(id)?;
            }
            controller.preview()?;
            if let Some(stats) = controller.stats() {
                println!("{}", report::stats_report(stats));
            }
        }

        Command::Autosave(AutosaveCommand::Show) => match controller.autosaved().await? {
            Some(snapshot) => {
                let raw = budget_core::RawForm::from(&snapshot.data);
                println!("Salvo em {}", snapshot.timestamp);
                println!(
                    "{}",
                    report::form_summary(
                        &raw,
                        budget_core::collector::completion(&raw),
                        budget_core::collector::items_total(&raw),
                    )
                );
            }
            None => println!("{NO_AUTOSAVE}"),
        },
        Command::Autosave(AutosaveCommand::Restore { output }) => {
            if !controller.restore_autosave().await? {
                println!("{NO_AUTOSAVE}");
                return Ok(());
            }
            let text = form_file::render(controller.raw());
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    println!("{}", path.display());
                }
                None => print!("{text}"),
            }
        }

        // Answered in `main` without opening the store.
        Command::Presets | Command::Suggest { .. } | Command::InitConfig { .. } => {}

        Command::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut session = Session::new(controller, io::stdout(), config.autosave_period());
            session.run(stdin).await?;
            io::stdout().flush()?;
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);

    match &cli.command {
        Command::InitConfig { force } => {
            if config_path.exists() && !force {
                anyhow::bail!("{} already exists (use --force)", config_path.display());
            }
            AppConfig::default().save_to(&config_path)?;
            println!("{}", config_path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Presets => {
            print_presets();
            return Ok(ExitCode::SUCCESS);
        }
        Command::Suggest { service } => {
            for tip in catalog::suggestions(&ServiceType::parse(service)) {
                println!("{tip}");
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let mut config = AppConfig::load_from(&config_path)?;
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }
    if let Some(db) = cli.db {
        config.store.connection = db;
    }
    logging::init(LogOptions {
        level: cli.log_level.as_deref(),
        file: config.log_file.as_deref(),
        terminal: !matches!(cli.command, Command::Session),
    })?;
    debug!(config = %config_path.display(), "starting");

    let dialogs = Arc::new(ConsoleDialogs::new(cli.yes));
    let controller = app::open_controller(&config, dialogs)
        .await
        .with_context(|| format!("cannot open the {} store", config.store.backend))?;

    match run(cli.command, controller, &config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already shown through the dialogs.
        Err(err) if err.downcast_ref::<AppError>().is_some() => {
            debug!(%err, "command failed");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}
