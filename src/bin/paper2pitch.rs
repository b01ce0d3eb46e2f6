//! CLI binary for paper2pitch.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use paper2pitch::{
    analyze_file, analyze_to_file, inspect_file, PipelineConfig, PipelineProgressCallback,
    ProgressCallback,
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

/// Terminal progress callback: renders a live progress bar and per-stage log
/// lines using [indicatif]. Stages always run in order, so the bar simply
/// advances one tick per completed stage.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-stage wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_pipeline_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, total_stages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos}/{len} stages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_stages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Analyzing");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Running {total_stages}-stage analysis…"))
        ));
    }

    fn on_stage_start(&self, stage: usize, _total: usize, role: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(stage, Instant::now());
        self.bar.set_message(role.to_string());
    }

    fn on_stage_complete(&self, stage: usize, total: usize, role: &str, output_len: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&stage)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Stage {}/{}  {:<28}  {:<8}  {}",
            green("✓"),
            stage,
            total,
            role,
            dim(&format!("{output_len:>5} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_pipeline_complete(&self, total_stages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} stages completed",
            green("✔"),
            bold(&total_stages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyze a paper, report on stdout
  paper2pitch paper.pdf

  # Write the report to a file
  paper2pitch paper.pdf -o report.md

  # Focus the commercialization on one industry
  paper2pitch --industry healthcare paper.pdf -o report.md

  # Use a specific model
  paper2pitch --model gpt-4.1 --provider openai paper.pdf

  # Analyze a paper from a URL
  paper2pitch https://arxiv.org/pdf/1706.03762 -o attention.md

  # Inspect PDF metadata (no API key needed)
  paper2pitch --inspect-only paper.pdf

  # JSON output with per-stage results and token stats
  paper2pitch --json paper.pdf > result.json

PIPELINE STAGES:
  1. Paper Analyst               extracts the core innovation
  2. Market Mapper               identifies commercial applications
  3. Business Designer           designs product & business model
  4. Technical Architect         sketches the technical approach
  5. MVP Planner & Pitch Writer  assembles the final report

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID

SETUP:
  1. Set API key:     export OPENAI_API_KEY=sk-...
  2. Analyze:         paper2pitch paper.pdf -o report.md
"#;

/// Turn research papers into business opportunity reports using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "paper2pitch",
    version,
    about = "Turn research papers into business opportunity reports using LLMs",
    long_about = "Analyze a research paper (local PDF or URL) through a five-stage LLM pipeline \
and produce a structured business opportunity report: core innovation, market applications, \
product design, technical architecture, and an MVP roadmap with pitch. Supports OpenAI, \
Anthropic, Google Gemini, and any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, env = "PAPER2PITCH_OUTPUT")]
    output: Option<PathBuf>,

    /// Industry to focus the commercialization on (e.g. healthcare, fintech).
    #[arg(short, long, env = "PAPER2PITCH_INDUSTRY")]
    industry: Option<String>,

    /// LLM model ID (e.g. gpt-4.1-mini, gpt-4.1, claude-sonnet-4-20250514).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// Max LLM output tokens per stage.
    #[arg(long, env = "PAPER2PITCH_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PAPER2PITCH_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// How many characters of the paper the first stage reads.
    #[arg(long, env = "PAPER2PITCH_EXCERPT_CHARS", default_value_t = 8000)]
    excerpt_chars: usize,

    /// Output structured JSON (PipelineOutput) instead of the report.
    #[arg(long, env = "PAPER2PITCH_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PAPER2PITCH_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no analysis.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPER2PITCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPER2PITCH_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PAPER2PITCH_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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
        let meta = inspect_file(&cli.input)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:    {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:   {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:  {}", a);
            }
            println!("Pages:   {}", meta.page_count);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn PipelineProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run analysis ─────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = analyze_to_file(&cli.input, output_path, &config)
            .await
            .context("Analysis failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} stages  {}ms  →  {}",
                green("✔"),
                stats.stages,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
            eprintln!(
                "   {} tokens in  /  {} tokens out",
                dim(&stats.total_input_tokens.to_string()),
                dim(&stats.total_output_tokens.to_string()),
            );
        }
    } else {
        let output = analyze_file(&cli.input, &config)
            .await
            .context("Analysis failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.report.as_bytes())
                .context("Failed to write to stdout")?;
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "   {} tokens in  /  {} tokens out  —  {}ms total",
                dim(&output.stats.total_input_tokens.to_string()),
                dim(&output.stats.total_output_tokens.to_string()),
                output.stats.total_duration_ms,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .excerpt_chars(cli.excerpt_chars)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref industry) = cli.industry {
        builder = builder.industry(industry.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let mut config = builder.build().context("Invalid configuration")?;

    // Model and provider have no builder defaults worth forcing here.
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();

    Ok(config)
}
