//! Wiring: store registry, collaborators and the controller, built from the
//! loaded configuration.

use std::sync::Arc;

use budget_core::store::{MemoryStoreFactory, StoreRegistry};
use budget_store_sqlite::SqliteStoreFactory;

use crate::config::AppConfig;
use crate::controller::Controller;
use crate::dialogs::Dialogs;
use crate::export::Collaborators;
use crate::platform::{
    CommandClipboard, CommandOpener, CommandRasterizer, DirectoryDownloads, NoShareSheet,
    OpenerPrintSpooler, PrintPdfAssembler,
};
use crate::scheduler::ProgressSequence;

/// Registry with every built-in storage backend.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

/// External programs for the configured commands and the in-process PDF
/// assembler. The CLI has no share sheet, so sharing always falls back to
/// the mail link.
pub fn build_collaborators(config: &AppConfig) -> Collaborators {
    let commands = &config.commands;
    Collaborators {
        rasterizer: Arc::new(CommandRasterizer::new(commands.rasterizer())),
        pdf: Arc::new(PrintPdfAssembler::default()),
        clipboard: Arc::new(CommandClipboard::new(commands.clipboard())),
        opener: Arc::new(CommandOpener::new(commands.opener())),
        share_sheet: Arc::new(NoShareSheet),
        downloads: Arc::new(DirectoryDownloads::new(config.output_dir.clone())),
        spooler: Arc::new(OpenerPrintSpooler::new(CommandOpener::new(commands.opener()))),
    }
}

pub fn build_progress(config: &AppConfig) -> ProgressSequence {
    ProgressSequence::new(config.progress_step_delay())
}

/// Opens the configured store and starts a controller on it.
pub async fn open_controller(
    config: &AppConfig,
    dialogs: Arc<dyn Dialogs>,
) -> anyhow::Result<Controller> {
    let store_config = config.store_config();
    if store_config.backend == "sqlite" && store_config.connection_string != ":memory:" {
        if let Some(dir) = std::path::Path::new(&store_config.connection_string).parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let store = build_registry().create(&store_config).await?;

    let controller = Controller::start(
        store,
        dialogs,
        build_collaborators(config),
        build_progress(config),
    )
    .await?;
    Ok(controller)
}
