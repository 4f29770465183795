//! External capabilities the export adapters rely on, and their
//! command-line and in-process implementations.
//!
//! Every command is configured as a single line such as
//! `wkhtmltoimage --zoom {scale} {input} {output}`. Placeholders are
//! substituted per argument; arguments are split on whitespace.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::export::pdf::PdfLayout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("{0} was dismissed")]
    Rejected(&'static str),

    #[error("{tool} failed: {reason}")]
    Failed { tool: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CollaboratorError {
    fn from(err: std::io::Error) -> Self {
        CollaboratorError::Io(err.to_string())
    }
}

/// Renders an HTML file to a PNG image.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(
        &self,
        html: &Path,
        scale: u32,
    ) -> Result<Vec<u8>, CollaboratorError>;
}

/// Places one image on A4 pages and returns the PDF bytes.
#[async_trait]
pub trait PdfAssembler: Send + Sync {
    async fn assemble(
        &self,
        png: &[u8],
        layout: &PdfLayout,
    ) -> Result<Vec<u8>, CollaboratorError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(
        &self,
        text: &str,
    ) -> Result<(), CollaboratorError>;
}

/// Hands a URL or file path to the desktop's default handler.
#[async_trait]
pub trait Opener: Send + Sync {
    async fn open(
        &self,
        target: &str,
    ) -> Result<(), CollaboratorError>;
}

/// What a native share sheet is asked to share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
}

#[async_trait]
pub trait ShareSheet: Send + Sync {
    async fn share(
        &self,
        request: &ShareRequest,
    ) -> Result<(), CollaboratorError>;
}

/// Destination for downloaded files.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Stores `contents` under `filename` and returns where it ended up.
    async fn save(
        &self,
        filename: &str,
        contents: &[u8],
    ) -> Result<PathBuf, CollaboratorError>;
}

/// Opens a print window for a complete HTML page.
#[async_trait]
pub trait PrintSpooler: Send + Sync {
    async fn print(
        &self,
        page: &str,
    ) -> Result<(), CollaboratorError>;
}

// ── Command lines ────────────────────────────────────────────────────────────

/// A configured external program and its argument template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Splits `line` on whitespace. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with every `{name}` placeholder replaced.
    pub fn expand(
        &self,
        vars: &HashMap<&str, String>,
    ) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                vars.iter().fold(arg.clone(), |acc, (name, value)| {
                    acc.replace(&format!("{{{name}}}"), value)
                })
            })
            .collect()
    }

    async fn run(
        &self,
        tool: &'static str,
        vars: &HashMap<&str, String>,
        stdin: Option<&[u8]>,
    ) -> Result<(), CollaboratorError> {
        let args = self.expand(vars);
        tracing::debug!(program = %self.program, ?args, "running {tool}");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CollaboratorError::Failed {
                tool,
                reason: format!("cannot start '{}': {e}", self.program),
            })?;

        if let (Some(bytes), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(bytes).await?;
            pipe.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(CollaboratorError::Failed {
                tool,
                reason: format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}

fn path_var(path: &Path) -> String {
    path.display().to_string()
}

/// Runs `{input}` (HTML file) → `{output}` (PNG file) at `{scale}`.
pub struct CommandRasterizer {
    command: Option<CommandLine>,
}

impl CommandRasterizer {
    pub fn new(command: Option<CommandLine>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(
        &self,
        html: &Path,
        scale: u32,
    ) -> Result<Vec<u8>, CollaboratorError> {
        let command = self
            .command
            .as_ref()
            .ok_or(CollaboratorError::Unavailable("rasterizer"))?;
        let workdir = tempfile::tempdir()?;
        let output = workdir.path().join("render.png");

        let vars = HashMap::from([
            ("input", path_var(html)),
            ("output", path_var(&output)),
            ("scale", scale.to_string()),
        ]);
        command.run("rasterizer", &vars, None).await?;

        Ok(tokio::fs::read(&output).await?)
    }
}

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const MM_PER_INCH: f32 = 25.4;

/// Builds the PDF in-process with `printpdf`: one A4 page per layout
/// offset, each showing the same image shifted up by that offset.
pub struct PrintPdfAssembler {
    title: String,
}

impl PrintPdfAssembler {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for PrintPdfAssembler {
    fn default() -> Self {
        Self::new("Orçamento")
    }
}

#[async_trait]
impl PdfAssembler for PrintPdfAssembler {
    async fn assemble(
        &self,
        png: &[u8],
        layout: &PdfLayout,
    ) -> Result<Vec<u8>, CollaboratorError> {
        let title = self.title.clone();
        let png = png.to_vec();
        let layout = layout.clone();
        tokio::task::spawn_blocking(move || assemble_pages(&title, &png, &layout))
            .await
            .map_err(|e| pdf_failure(e.to_string()))?
    }
}

fn pdf_failure(reason: String) -> CollaboratorError {
    CollaboratorError::Failed {
        tool: "PDF assembler",
        reason,
    }
}

fn assemble_pages(
    title: &str,
    png: &[u8],
    layout: &PdfLayout,
) -> Result<Vec<u8>, CollaboratorError> {
    use printpdf::{Image, ImageTransform, Mm, PdfDocument, image_crate};

    let picture = image_crate::load_from_memory(png).map_err(|e| pdf_failure(e.to_string()))?;
    // Pixels per inch that make the image exactly `image_width_mm` wide.
    let dpi = picture.width().max(1) as f32 * MM_PER_INCH / layout.image_width_mm as f32;

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Página 1");

    for (index, offset_mm) in layout.page_offsets_mm.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(A4_WIDTH_MM),
                Mm(A4_HEIGHT_MM),
                format!("Página {}", index + 1),
            )
        };

        // Offsets are measured down from the top edge; PDF places the image
        // by its bottom edge.
        let bottom_mm = f64::from(A4_HEIGHT_MM) - (offset_mm + layout.image_height_mm);
        Image::from_dynamic_image(&picture).add_to_layer(
            doc.get_page(page).get_layer(layer),
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(bottom_mm as f32)),
                dpi: Some(dpi),
                ..ImageTransform::default()
            },
        );
    }

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(|e| pdf_failure(e.to_string()))?;
    writer.into_inner().map_err(|e| pdf_failure(e.to_string()))
}

/// Pipes text into the configured command's stdin.
pub struct CommandClipboard {
    command: Option<CommandLine>,
}

impl CommandClipboard {
    pub fn new(command: Option<CommandLine>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(
        &self,
        text: &str,
    ) -> Result<(), CollaboratorError> {
        let command = self
            .command
            .as_ref()
            .ok_or(CollaboratorError::Unavailable("clipboard"))?;
        command
            .run("clipboard", &HashMap::new(), Some(text.as_bytes()))
            .await
    }
}

/// Runs the opener with the target appended, or substituted for `{target}`.
pub struct CommandOpener {
    command: Option<CommandLine>,
}

impl CommandOpener {
    pub fn new(command: Option<CommandLine>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Opener for CommandOpener {
    async fn open(
        &self,
        target: &str,
    ) -> Result<(), CollaboratorError> {
        let command = self
            .command
            .as_ref()
            .ok_or(CollaboratorError::Unavailable("opener"))?;
        let command = if command.args.iter().any(|arg| arg.contains("{target}")) {
            command.clone()
        } else {
            let mut appended = command.clone();
            appended.args.push("{target}".to_string());
            appended
        };
        let vars = HashMap::from([("target", target.to_string())]);
        command.run("opener", &vars, None).await
    }
}

/// A terminal has no share sheet.
pub struct NoShareSheet;

#[async_trait]
impl ShareSheet for NoShareSheet {
    async fn share(
        &self,
        _request: &ShareRequest,
    ) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::Unavailable("share sheet"))
    }
}

/// Writes downloads into a directory, creating it on first use. Names
/// with path components are refused.
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn save(
        &self,
        filename: &str,
        contents: &[u8],
    ) -> Result<PathBuf, CollaboratorError> {
        let name = Path::new(filename);
        if filename.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(CollaboratorError::Failed {
                tool: "downloads",
                reason: format!("'{filename}' is not a plain file name"),
            });
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, contents).await?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "download saved");
        Ok(path)
    }
}

/// Writes the print page to one fixed file, overwritten on every print,
/// and opens it; the page prints itself once loaded.
pub struct OpenerPrintSpooler<O> {
    opener: O,
    page_path: PathBuf,
}

impl<O: Opener> OpenerPrintSpooler<O> {
    /// Spools through `<temp dir>/imprimir-orcamento.html`.
    pub fn new(opener: O) -> Self {
        Self::with_page_path(opener, std::env::temp_dir().join("imprimir-orcamento.html"))
    }

    pub fn with_page_path(
        opener: O,
        page_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            opener,
            page_path: page_path.into(),
        }
    }
}

#[async_trait]
impl<O: Opener> PrintSpooler for OpenerPrintSpooler<O> {
    async fn print(
        &self,
        page: &str,
    ) -> Result<(), CollaboratorError> {
        tokio::fs::write(&self.page_path, page).await?;
        self.opener.open(&path_var(&self.page_path)).await
    }
}
