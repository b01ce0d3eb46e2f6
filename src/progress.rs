//! Progress-callback trait for per-stage pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as each of the five stages runs. Callers can forward events to a
//! terminal progress bar, a WebSocket, or a log — the library knows nothing
//! about how the host application communicates.
//!
//! Stages run strictly sequentially, so callbacks are never invoked
//! concurrently; the trait is still `Send + Sync` so configs can be shared
//! across server request handlers.

use std::sync::Arc;

/// Called by the executor as it works through the five stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before the first stage's LLM call.
    fn on_pipeline_start(&self, total_stages: usize) {
        let _ = total_stages;
    }

    /// Called just before a stage's LLM request is sent.
    ///
    /// * `stage` — 1-indexed stage number
    /// * `role`  — the stage's role name, e.g. "Market Mapper"
    fn on_stage_start(&self, stage: usize, total_stages: usize, role: &str) {
        let _ = (stage, total_stages, role);
    }

    /// Called when a stage's LLM call returned successfully.
    ///
    /// * `output_len` — byte length of the stage's output text
    fn on_stage_complete(&self, stage: usize, total_stages: usize, role: &str, output_len: usize) {
        let _ = (stage, total_stages, role, output_len);
    }

    /// Called once after the final stage completed. Not called on failure —
    /// a failed stage aborts the run and the error propagates instead.
    fn on_pipeline_complete(&self, total_stages: usize) {
        let _ = total_stages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        finished: AtomicUsize,
    }

    impl PipelineProgressCallback for TrackingCallback {
        fn on_stage_start(&self, _stage: usize, _total: usize, _role: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_stage_complete(&self, _stage: usize, _total: usize, _role: &str, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_pipeline_complete(&self, total: usize) {
            self.finished.store(total, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_pipeline_start(5);
        cb.on_stage_start(1, 5, "Paper Analyst");
        cb.on_stage_complete(1, 5, "Paper Analyst", 42);
        cb.on_pipeline_complete(5);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        };
        cb.on_pipeline_start(5);
        for stage in 1..=5 {
            cb.on_stage_start(stage, 5, "role");
            cb.on_stage_complete(stage, 5, "role", 100);
        }
        cb.on_pipeline_complete(5);
        assert_eq!(cb.starts.load(Ordering::SeqCst), 5);
        assert_eq!(cb.completes.load(Ordering::SeqCst), 5);
        assert_eq!(cb.finished.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn PipelineProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_pipeline_start(5);
        cb.on_stage_start(1, 5, "Paper Analyst");
    }
}
