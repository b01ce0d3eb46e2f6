//! Error types for the paper2pitch library.
//!
//! The pipeline has no local recovery anywhere: a bad PDF, a missing API key,
//! or a failed LLM call all surface directly as `Err(PipelineError)` from the
//! top-level entry points. There is deliberately no retry and no
//! partial-result capture — callers (CLI, HTTP layer) decide how to present
//! the failure.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the paper2pitch library.
#[derive(Debug, Error)]
pub enum PipelineError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The input was read, but does not start with the PDF magic bytes.
    #[error("Input is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF parser rejected the byte buffer.
    #[error("PDF is corrupt or unparseable: {detail}")]
    InvalidPdf { detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// A pipeline stage's LLM call failed. There is no retry: the first
    /// failure aborts the run and earlier stage outputs are discarded.
    #[error("Stage {stage} ({role}) failed: {detail}")]
    StageFailed {
        stage: usize,
        role: &'static str,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failed_display() {
        let e = PipelineError::StageFailed {
            stage: 3,
            role: "Business Designer",
            detail: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Stage 3"), "got: {msg}");
        assert!(msg.contains("Business Designer"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = PipelineError::NotAPdf {
            magic: [0x50, 0x4b, 0x03, 0x04],
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }

    #[test]
    fn provider_not_configured_display() {
        let e = PipelineError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "set OPENAI_API_KEY".into(),
        };
        assert!(e.to_string().contains("openai"));
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }
}
