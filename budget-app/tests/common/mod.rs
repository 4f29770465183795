#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use budget_app::controller::{Clock, Controller};
use budget_app::dialogs::RecordingDialogs;
use budget_app::export::Collaborators;
use budget_app::export::pdf::PdfLayout;
use budget_app::platform::{
    Clipboard, CollaboratorError, DirectoryDownloads, NoShareSheet, Opener, PdfAssembler,
    PrintSpooler, Rasterizer,
};
use budget_app::scheduler::ProgressSequence;
use budget_core::store::{KeyValueStore, MemoryStore};
use chrono::{Local, TimeZone};

/// Records the staged page path, then renders a blank PNG of the given
/// size or fails.
pub struct StubRasterizer {
    pub size: Option<(u32, u32)>,
    pub seen: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl Rasterizer for StubRasterizer {
    async fn rasterize(
        &self,
        html: &Path,
        _scale: u32,
    ) -> Result<Vec<u8>, CollaboratorError> {
        assert!(html.exists(), "staged page must exist while rendering");
        self.seen.lock().unwrap().push(html.to_path_buf());
        let (width, height) = self.size.ok_or(CollaboratorError::Failed {
            tool: "rasterizer",
            reason: "boom".to_string(),
        })?;
        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode png");
        Ok(png)
    }
}

#[derive(Default)]
pub struct StubAssembler {
    pub layouts: Mutex<Vec<PdfLayout>>,
}

#[async_trait]
impl PdfAssembler for StubAssembler {
    async fn assemble(
        &self,
        _png: &[u8],
        layout: &PdfLayout,
    ) -> Result<Vec<u8>, CollaboratorError> {
        self.layouts.lock().unwrap().push(layout.clone());
        Ok(b"%PDF-1.3 stub".to_vec())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub texts: Mutex<Vec<String>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(
        &self,
        text: &str,
    ) -> Result<(), CollaboratorError> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingOpener {
    pub targets: Mutex<Vec<String>>,
}

#[async_trait]
impl Opener for RecordingOpener {
    async fn open(
        &self,
        target: &str,
    ) -> Result<(), CollaboratorError> {
        self.targets.lock().unwrap().push(target.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSpooler {
    pub pages: Mutex<Vec<String>>,
}

#[async_trait]
impl PrintSpooler for RecordingSpooler {
    async fn print(
        &self,
        page: &str,
    ) -> Result<(), CollaboratorError> {
        self.pages.lock().unwrap().push(page.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub dialogs: Arc<RecordingDialogs>,
    pub rasterizer: Arc<StubRasterizer>,
    pub assembler: Arc<StubAssembler>,
    pub clipboard: Arc<RecordingClipboard>,
    pub opener: Arc<RecordingOpener>,
    pub spooler: Arc<RecordingSpooler>,
    pub downloads: tempfile::TempDir,
}

impl Harness {
    pub fn new(png_size: Option<(u32, u32)>) -> Self {
        Self {
            dialogs: Arc::new(RecordingDialogs::new()),
            rasterizer: Arc::new(StubRasterizer {
                size: png_size,
                seen: Mutex::new(Vec::new()),
            }),
            assembler: Arc::default(),
            clipboard: Arc::default(),
            opener: Arc::default(),
            spooler: Arc::default(),
            downloads: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            rasterizer: self.rasterizer.clone(),
            pdf: self.assembler.clone(),
            clipboard: self.clipboard.clone(),
            opener: self.opener.clone(),
            share_sheet: Arc::new(NoShareSheet),
            downloads: Arc::new(DirectoryDownloads::new(self.downloads.path())),
            spooler: self.spooler.clone(),
        }
    }

    pub async fn controller(&self) -> Controller {
        self.controller_on(Arc::new(MemoryStore::new())).await
    }

    pub async fn controller_on(
        &self,
        store: Arc<dyn KeyValueStore>,
    ) -> Controller {
        Controller::start(
            store,
            self.dialogs.clone(),
            self.collaborators(),
            ProgressSequence::new(Duration::ZERO),
        )
        .await
        .expect("controller starts")
        .with_clock(ticking_clock())
    }
}

/// Starts at 2025-03-07 10:00:00 local and advances one second per call.
pub fn ticking_clock() -> Clock {
    let start = Local
        .with_ymd_and_hms(2025, 3, 7, 10, 0, 0)
        .single()
        .expect("unambiguous time");
    let ticks = AtomicI64::new(0);
    Arc::new(move || start + chrono::Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst)))
}
