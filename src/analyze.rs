//! Pipeline entry points.
//!
//! Every public API here is a thin composition of the same steps: resolve
//! input to text, build the five task specifications, resolve a provider,
//! run the stages in order, and clean the final stage's output into the
//! report. [`analyze`] works from text, [`analyze_bytes`] from PDF bytes,
//! [`analyze_file`] from a path or URL; pick the one closest to what you
//! already hold.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::executor;
use crate::input;
use crate::loader::{self, DocumentMetadata};
use crate::output::{PipelineOutput, PipelineStats};
use crate::report;
use crate::tasks;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Run the full five-stage pipeline over already-extracted paper text.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `paper_text` — Plain text of the research paper
/// * `config` — Pipeline configuration
///
/// # Returns
/// `Ok(PipelineOutput)` with the cleaned report, all five stage results, and
/// run statistics.
///
/// # Errors
/// - [`PipelineError::ProviderNotConfigured`] when no LLM provider can be
///   resolved
/// - [`PipelineError::StageFailed`] when any stage's LLM call fails (the run
///   aborts at that stage; earlier results are discarded)
pub async fn analyze(
    paper_text: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let total_start = Instant::now();
    let paper_text = paper_text.as_ref();
    info!("Starting analysis ({} chars of paper text)", paper_text.len());

    // ── Step 1: Build the task sequence ──────────────────────────────────
    let task_specs = tasks::create_tasks(paper_text, config);

    // ── Step 2: Get/create provider ──────────────────────────────────────
    let provider = resolve_provider(config).await?;

    // ── Step 3: Run all stages in order ──────────────────────────────────
    let llm_start = Instant::now();
    let stages = executor::run_tasks(&provider, &task_specs, config).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 4: Clean the final stage's output into the report ───────────
    let raw_report = stages
        .last()
        .map(|s| s.output.as_str())
        .unwrap_or_default();
    let report = report::clean_report(raw_report);

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let stats = PipelineStats {
        stages: stages.len(),
        total_input_tokens: stages.iter().map(|s| s.input_tokens).sum(),
        total_output_tokens: stages.iter().map(|s| s.output_tokens).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        llm_duration_ms,
    };

    info!(
        "Analysis complete: {} stages, {}ms total",
        stats.stages, stats.total_duration_ms
    );

    Ok(PipelineOutput {
        report,
        stages,
        stats,
    })
}

/// Run the pipeline and return only the cleaned report markdown.
///
/// Convenience wrapper over [`analyze`] for callers who do not need
/// per-stage results or statistics.
pub async fn run_pipeline(
    paper_text: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<String, PipelineError> {
    Ok(analyze(paper_text, config).await?.report)
}

/// Run the pipeline over raw PDF bytes.
///
/// Extracts per-page text with the built-in loader, then delegates to
/// [`analyze`]. This is the recommended API when PDF data comes from an
/// upload, database, or in-memory buffer rather than a file on disk.
pub async fn analyze_bytes(
    bytes: &[u8],
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let text = loader::load_pdf_text(bytes)?;
    analyze(text, config).await
}

/// Run the pipeline over a PDF file path or HTTP/HTTPS URL.
pub async fn analyze_file(
    input_str: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let bytes = input::resolve_input(input_str.as_ref(), config).await?;
    analyze_bytes(&bytes, config).await
}

/// Run the pipeline over a file or URL and write the report to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn analyze_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<PipelineStats, PipelineError> {
    let output = analyze_file(input_str, config).await?;
    let path = output_path.as_ref();

    // Atomic write: write to temp, then rename
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PipelineError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.report)
        .await
        .map_err(|e| PipelineError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| PipelineError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`run_pipeline`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_pipeline_sync(
    paper_text: impl AsRef<str>,
    config: &PipelineConfig,
) -> Result<String, PipelineError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PipelineError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run_pipeline(paper_text, config))
}

/// Read PDF metadata from a file or URL without running the pipeline.
///
/// Does not require an LLM provider or API key.
pub async fn inspect_file(input_str: impl AsRef<str>) -> Result<DocumentMetadata, PipelineError> {
    let config = PipelineConfig::default();
    let bytes = input::resolve_input(input_str.as_ref(), &config).await?;
    loader::inspect(&bytes)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, PipelineError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PipelineError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// The four-level fallback chain lets library users and CLI users each set
/// exactly as much or as little as they need:
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed and
///    configured the provider entirely; we use it as-is. Useful in tests or
///    when the caller needs custom middleware (caching, rate-limiting).
///
/// 2. **Named provider + model** (`config.provider_name`) — the caller named
///    a provider (e.g. `"openai"`) and optional model. We call
///    [`ProviderFactory::create_llm_provider`] which reads the corresponding
///    API key (`OPENAI_API_KEY`, etc.) from the environment.
///
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    both env vars set means the caller chose a provider and model at the
///    execution environment level (Makefile, shell script, CI). Checked before
///    full auto-detection so the model choice is honoured even when multiple
///    API keys are present.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — the factory
///    scans all known API key variables and picks the first available
///    provider. Convenient for `paper2pitch paper.pdf` with no other
///    configuration.
async fn resolve_provider(config: &PipelineConfig) -> Result<Arc<dyn LLMProvider>, PipelineError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-mini");
        return create_provider(name, model);
    }

    // 3) Auto-detect from environment; honour EDGEQUAKE_LLM_PROVIDER + EDGEQUAKE_MODEL when both set
    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    // Prefer OpenAI explicitly when an OpenAI API key is present, so users
    // with multiple provider keys get a stable default.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-mini");
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PipelineError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
