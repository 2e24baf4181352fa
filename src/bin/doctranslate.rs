//! CLI binary for edgequake-doctranslate.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TranslationConfig` and prints a per-file summary.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_doctranslate::{
    inspect, translate_to_dir, BatchReport, ConverterKind, OutputFormat, ProgressCallback,
    TargetLanguage, TranslationConfig, TranslationProgressCallback, TranslatorBackend,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the files of the batch and a log
/// line per page and per file.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Translating");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Translating {total_files} file(s)…"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total_files: usize, file_name: &str) {
        self.bar.set_message(file_name.to_string());
    }

    fn on_page_translated(&self, file_name: &str, page_num: usize, total_pages: usize, chars: usize) {
        self.bar.set_message(format!("{file_name}  page {page_num}/{total_pages}"));
        self.bar.println(format!(
            "    {} {}  page {:>3}/{:<3}  {}",
            dim("·"),
            dim(file_name),
            page_num,
            total_pages,
            dim(&format!("{chars:>5} chars")),
        ));
    }

    fn on_file_complete(&self, _index: usize, _total_files: usize, file_name: &str, output_name: &str) {
        self.bar.println(format!("  {} {}  →  {}", green("✓"), file_name, bold(output_name)));
        self.bar.inc(1);
    }

    fn on_file_error(&self, _index: usize, _total_files: usize, file_name: &str, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // First line only; the rest is hint text.
        let first = error.lines().next().unwrap_or(error);
        let msg = match first.char_indices().nth(100) {
            Some((i, _)) => format!("{}\u{2026}", &first[..i]),
            None => first.to_string(),
        };
        self.bar.println(format!("  {} {}  {}", red("✗"), file_name, red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, succeeded: usize) {
        let failed = total_files.saturating_sub(succeeded);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} file(s) translated successfully",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} file(s) translated  ({} failed)",
                if succeeded == 0 { red("✘") } else { cyan("⚠") },
                bold(&succeeded.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate a PDF into English (default), output PDF into ./translated
  doctranslate relatorio.pdf

  # Several files into French DOCX
  doctranslate --to fr --format docx carta.docx contrato.pdf antigo.doc

  # Use a chat model instead of the Google endpoint
  doctranslate --backend llm --provider openai --model gpt-4.1-mini paper.pdf

  # Encrypted PDF
  doctranslate --password s3cret locked.pdf

  # Show what would be translated (no network)
  doctranslate --inspect-only relatorio.pdf

  # Machine-readable report
  doctranslate --json --to de *.docx > report.json

TARGET LANGUAGES:
  pt  Portuguese    en  English (default)    es  Spanish
  fr  French        de  German

ENVIRONMENT VARIABLES:
  DOCTRANSLATE_*          Every flag, e.g. DOCTRANSLATE_TO=fr
  OPENAI_API_KEY          OpenAI API key (--backend llm)
  ANTHROPIC_API_KEY       Anthropic API key (--backend llm)
  GEMINI_API_KEY          Google Gemini API key (--backend llm)
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)

SETUP:
  PDF input and output need the pdfium shared library on the library path
  or at PDFIUM_LIB_PATH. Legacy .doc input needs LibreOffice (soffice), or
  textutil on macOS. DOCX → DOCX needs neither.
"#;

/// Translate PDF, DOC and DOCX documents.
#[derive(Parser, Debug)]
#[command(
    name = "doctranslate",
    version,
    about = "Translate PDF, DOC and DOCX documents and re-emit them as PDF or DOCX",
    long_about = "Extract the text of PDF, DOC and DOCX documents page by page, translate it \
through the Google web translation endpoint or any chat model supported by edgequake-llm, and \
write <name>_translated.pdf or <name>_translated.docx files.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input files (.pdf, .doc, .docx).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Target language.
    #[arg(short = 't', long = "to", env = "DOCTRANSLATE_TO", value_enum, default_value = "en")]
    to: LanguageArg,

    /// Output format.
    #[arg(short, long, env = "DOCTRANSLATE_FORMAT", value_enum, default_value = "pdf")]
    format: FormatArg,

    /// Directory the translated files are written to.
    #[arg(short, long, env = "DOCTRANSLATE_OUTPUT_DIR", default_value = "translated")]
    output_dir: PathBuf,

    /// Translation service.
    #[arg(long, env = "DOCTRANSLATE_BACKEND", value_enum, default_value = "google")]
    backend: BackendArg,

    /// LLM provider for --backend llm: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "DOCTRANSLATE_PROVIDER")]
    provider: Option<String>,

    /// LLM model ID for --backend llm (e.g. gpt-4.1-nano, claude-sonnet-4-20250514).
    #[arg(long, env = "DOCTRANSLATE_MODEL")]
    model: Option<String>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCTRANSLATE_PASSWORD")]
    password: Option<String>,

    /// Maximum characters per translation call.
    #[arg(long, env = "DOCTRANSLATE_CHUNK_SIZE", default_value_t = 5000)]
    chunk_size: usize,

    /// Maximum characters per output PDF page.
    #[arg(long, env = "DOCTRANSLATE_PDF_CHUNK_SIZE", default_value_t = 1000)]
    pdf_chunk_size: usize,

    /// Per-call translation timeout in seconds.
    #[arg(long, env = "DOCTRANSLATE_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Tool used to convert legacy .doc files.
    #[arg(long, env = "DOCTRANSLATE_CONVERTER", value_enum, default_value = "auto")]
    converter: ConverterArg,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "DOCTRANSLATE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOCTRANSLATE_NO_PROGRESS")]
    no_progress: bool,

    /// Extract and report page/character counts only, no translation.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCTRANSLATE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCTRANSLATE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    Pt,
    En,
    Es,
    Fr,
    De,
}

impl From<LanguageArg> for TargetLanguage {
    fn from(v: LanguageArg) -> Self {
        match v {
            LanguageArg::Pt => TargetLanguage::Pt,
            LanguageArg::En => TargetLanguage::En,
            LanguageArg::Es => TargetLanguage::Es,
            LanguageArg::Fr => TargetLanguage::Fr,
            LanguageArg::De => TargetLanguage::De,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Docx,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Docx => OutputFormat::Docx,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Google,
    Llm,
}

impl From<BackendArg> for TranslatorBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Google => TranslatorBackend::Google,
            BackendArg::Llm => TranslatorBackend::Llm,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ConverterArg {
    Auto,
    Soffice,
    Textutil,
}

impl From<ConverterArg> for ConverterKind {
    fn from(v: ConverterArg) -> Self {
        match v {
            ConverterArg::Auto => ConverterKind::Auto,
            ConverterArg::Soffice => ConverterKind::Soffice,
            ConverterArg::Textutil => ConverterKind::Textutil,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let mut infos = Vec::with_capacity(cli.files.len());
        for path in &cli.files {
            let info = inspect(path, &config)
                .await
                .with_context(|| format!("Failed to inspect {}", path.display()))?;
            infos.push(info);
        }

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&infos).context("Failed to serialize document info")?
            );
        } else {
            for info in &infos {
                println!("File:         {}", info.file_name);
                println!("Format:       {}", info.format);
                println!("Pages:        {}", info.page_count);
                println!("Characters:   {}", info.char_count);
                println!("API calls:    {}", info.chunk_count);
                println!();
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn TranslationProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = translate_to_dir(&cli.files, &cli.output_dir, &config)
        .await
        .context("Translation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        print_summary(&report, &cli, show_progress);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `TranslationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let mut builder = TranslationConfig::builder()
        .target_language(cli.to.into())
        .output_format(cli.format.into())
        .backend(cli.backend.into())
        .chunk_max_chars(cli.chunk_size)
        .pdf_chunk_max_chars(cli.pdf_chunk_size)
        .api_timeout_secs(cli.api_timeout)
        .converter(cli.converter.into());

    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &BatchReport, cli: &Cli, show_progress: bool) {
    // The progress callback already printed per-file lines.
    if !show_progress {
        for file in &report.files {
            eprintln!(
                "{} {}  →  {}  {}",
                green("✓"),
                file.source_name,
                bold(&cli.output_dir.join(&file.output.file_name).display().to_string()),
                dim(&format!("{} pages, {}ms", file.page_count, file.duration_ms)),
            );
        }
    }
    for failure in &report.failures {
        eprintln!("{} {}", red("✗"), failure);
    }
    eprintln!(
        "   {} translated, {} failed  —  {}ms total  →  {}",
        report.files.len(),
        report.failures.len(),
        report.total_duration_ms,
        bold(&cli.output_dir.display().to_string()),
    );
}
