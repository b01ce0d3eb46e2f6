//! Input resolution: read a user-supplied path or URL into PDF bytes.
//!
//! Unlike renderers that need a file on disk, the text extractor works
//! straight from memory, so resolution here just produces a byte buffer.
//! We validate the PDF magic bytes (`%PDF`) before returning so callers get
//! a meaningful error instead of a parser failure deep inside the loader.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to PDF bytes.
///
/// If the input is a URL, download it; if it is a local file, read and
/// validate it.
pub async fn resolve_input(input: &str, config: &PipelineConfig) -> Result<Vec<u8>, PipelineError> {
    if input.trim().is_empty() {
        return Err(PipelineError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, config.download_timeout_secs).await
    } else {
        read_local(input)
    }
}

/// Read a local file, validating existence, permissions, and magic bytes.
fn read_local(path_str: &str) -> Result<Vec<u8>, PipelineError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(PipelineError::FileNotFound { path });
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PipelineError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PipelineError::FileNotFound { path });
        }
    };

    check_magic(&bytes)?;
    debug!("Resolved local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Download a URL and return the body bytes.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, PipelineError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| PipelineError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            PipelineError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            PipelineError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(PipelineError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PipelineError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    check_magic(&bytes)?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// Verify the `%PDF` magic bytes.
fn check_magic(bytes: &[u8]) -> Result<(), PipelineError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(PipelineError::NotAPdf { magic });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn magic_check_accepts_pdf_header() {
        assert!(check_magic(b"%PDF-1.7 rest of file").is_ok());
    }

    #[test]
    fn magic_check_rejects_other_formats() {
        assert!(matches!(
            check_magic(b"PK\x03\x04zipzip"),
            Err(PipelineError::NotAPdf { .. })
        ));
        assert!(matches!(check_magic(b""), Err(PipelineError::NotAPdf { .. })));
        assert!(matches!(check_magic(b"%P"), Err(PipelineError::NotAPdf { .. })));
    }

    #[tokio::test]
    async fn empty_input_is_invalid() {
        let config = PipelineConfig::default();
        let err = resolve_input("  ", &config).await;
        assert!(matches!(err, Err(PipelineError::InvalidInput { .. })));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = read_local("/definitely/not/a/real/file.pdf");
        assert!(matches!(err, Err(PipelineError::FileNotFound { .. })));
    }
}
