//! # paper2pitch
//!
//! Turn a research-paper PDF into a business use-case report using a fixed
//! five-stage pipeline of LLM agent roles.
//!
//! ## Why this crate?
//!
//! A research paper describes a method; it rarely tells you who would pay for
//! it. This crate extracts the paper's text and walks it through five fixed
//! analyst personas — each one building on the previous stage's output — to
//! produce a single markdown report: paper summary, market opportunities,
//! product ideas, a technical architecture for the most promising one, and a
//! 4–6-week MVP roadmap with an investor pitch.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Load       per-page text extraction via lopdf, joined with '\n'
//!  ├─ 2. Tasks      five fixed prompt templates, stage 1 embeds an 8 000-char excerpt
//!  ├─ 3. Analyst    title / domain / problem / method / contributions / limitations
//!  ├─ 4. Mapper     3–5 industries and concrete problems the research addresses
//!  ├─ 5. Designer   3 product ideas with users, features, value proposition
//!  ├─ 6. Architect  architecture for the single most promising product
//!  └─ 7. Planner    final report: summary, roadmap, pitch
//! ```
//!
//! Stages run strictly in order; each stage's prompt assumes all earlier
//! stages completed, and the executor passes their outputs forward explicitly.
//! There is no retry, no partial-result persistence, and no concurrent stage
//! execution — a provider failure at any stage surfaces directly to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paper2pitch::{analyze_file, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = PipelineConfig::builder()
//!         .industry("healthcare")
//!         .build()?;
//!     let output = analyze_file("paper.pdf", &config).await?;
//!     println!("{}", output.report);
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.total_input_tokens,
//!         output.stats.total_output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `paper2pitch` binary (clap + anyhow + tracing-subscriber) |
//! | `server` | off     | Enables the `paper2pitch-server` binary (`POST /analyze` via axum) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! paper2pitch = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod loader;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod report;
pub mod roles;
#[cfg(feature = "server")]
pub mod server;
pub mod tasks;
#[doc(hidden)]
pub mod test_support;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze, analyze_bytes, analyze_file, analyze_to_file, inspect_file, run_pipeline,
    run_pipeline_sync,
};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::PipelineError;
pub use loader::{inspect, load_pdf_text, DocumentMetadata};
pub use output::{PipelineOutput, PipelineStats, StageResult};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback};
pub use report::clean_report;
pub use roles::RoleIdentity;
pub use tasks::{create_tasks, TaskSpec};
