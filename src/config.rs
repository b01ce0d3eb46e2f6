//! Configuration for a pipeline run.
//!
//! All behaviour is controlled through [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across requests (the server reuses one per
//! process) and to diff two runs to understand why their reports differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; adding a field never breaks existing call sites.

use crate::error::PipelineError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for one research-paper-to-report pipeline run.
///
/// Built via [`PipelineConfig::builder()`] or [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use paper2pitch::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .model("gpt-4.1-mini")
///     .industry("fintech")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// LLM model identifier, e.g. "gpt-4.1-mini", "claude-sonnet-4-20250514".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for every stage. Default: 0.3.
    ///
    /// Low-but-nonzero: the analyst stage must stay faithful to the paper,
    /// while the designer and pitch stages benefit from a little freedom.
    /// One shared value keeps runs reproducible enough to diff.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per stage. Default: 4096.
    ///
    /// The final report stage routinely produces 1 500–3 000 output tokens;
    /// setting this too low silently truncates the report mid-section.
    pub max_tokens: usize,

    /// How many characters of the paper text stage 1 embeds. Default: 8000.
    ///
    /// Only the first stage sees the paper directly; the bound keeps the
    /// analyst prompt well inside every mainstream context window. The cut is
    /// a strict prefix — text past the bound never reaches any stage.
    pub excerpt_chars: usize,

    /// Optional industry-focus hint. When non-empty, the literal line
    /// `Target Industry: {hint}` is prepended to the paper text before any
    /// other processing (including the excerpt truncation).
    pub industry: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-stage progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.3,
            max_tokens: 4096,
            excerpt_chars: 8000,
            industry: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("excerpt_chars", &self.excerpt_chars)
            .field("industry", &self.industry)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn excerpt_chars(mut self, n: usize) -> Self {
        self.config.excerpt_chars = n;
        self
    }

    /// Set the industry hint. An empty string is treated as "no hint".
    pub fn industry(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        self.config.industry = if hint.is_empty() { None } else { Some(hint) };
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        let c = &self.config;
        if c.excerpt_chars == 0 {
            return Err(PipelineError::InvalidConfig(
                "excerpt_chars must be \u{2265} 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_tokens must be \u{2265} 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let c = PipelineConfig::default();
        assert_eq!(c.temperature, 0.3);
        assert_eq!(c.max_tokens, 4096);
        assert_eq!(c.excerpt_chars, 8000);
        assert!(c.industry.is_none());
        assert!(c.model.is_none());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = PipelineConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = PipelineConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn empty_industry_hint_is_none() {
        let c = PipelineConfig::builder().industry("").build().unwrap();
        assert!(c.industry.is_none());
        let c = PipelineConfig::builder().industry("edtech").build().unwrap();
        assert_eq!(c.industry.as_deref(), Some("edtech"));
    }

    #[test]
    fn zero_excerpt_chars_rejected() {
        let err = PipelineConfig::builder().excerpt_chars(0).build();
        assert!(matches!(err, Err(PipelineError::InvalidConfig(_))));
    }
}
