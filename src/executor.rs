//! Sequential stage execution against the LLM provider.
//!
//! This module is intentionally thin: all prompt engineering lives in
//! [`crate::prompts`] and [`crate::tasks`], so stage wording can change
//! without touching the call mechanics here.
//!
//! ## Context threading
//!
//! The original design relied on the execution engine's hidden conversation
//! context to carry stage outputs forward. Here the threading is explicit:
//! the executor keeps an accumulator of (role, output) pairs and renders it
//! into a context message for every later stage. What a stage sees is exactly
//! what the accumulator holds — nothing hidden, nothing implicit.
//!
//! ## No retry, no timeout
//!
//! Every stage gets exactly one LLM call. A provider failure aborts the run
//! and propagates as [`PipelineError::StageFailed`]; a slow call blocks the
//! run until the provider itself gives up.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::StageResult;
use crate::tasks::TaskSpec;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// The message parts of one stage's LLM request, before provider encoding.
///
/// Built by `build_stage_request`; the backend turns it into provider
/// messages. Keeping it as plain strings lets tests assert on exactly what
/// each stage was sent.
#[derive(Debug, Clone)]
pub(crate) struct StageRequest {
    /// The stage role's persona (system message).
    pub system: String,
    /// All earlier stage outputs rendered by
    /// [`crate::prompts::prior_results_context`]. `None` for stage 1.
    pub context: Option<String>,
    /// The task instruction plus its expected-output note (user message).
    pub user: String,
}

/// What one stage's LLM call produced.
pub(crate) struct StageOutcome {
    pub content: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// The slice of provider behaviour the executor needs: one chat call per
/// stage. Implemented for `Arc<dyn LLMProvider>`; tests substitute a
/// scripted backend.
pub(crate) trait ChatBackend {
    async fn run_stage(
        &self,
        request: &StageRequest,
        options: &CompletionOptions,
    ) -> Result<StageOutcome, String>;
}

impl ChatBackend for Arc<dyn LLMProvider> {
    async fn run_stage(
        &self,
        request: &StageRequest,
        options: &CompletionOptions,
    ) -> Result<StageOutcome, String> {
        let mut messages = vec![ChatMessage::system(request.system.clone())];
        if let Some(ref context) = request.context {
            messages.push(ChatMessage::system(context.clone()));
        }
        messages.push(ChatMessage::user(request.user.clone()));

        let response = self
            .chat(&messages, Some(options))
            .await
            .map_err(|e| e.to_string())?;

        Ok(StageOutcome {
            content: response.content,
            prompt_tokens: response.prompt_tokens as u64,
            completion_tokens: response.completion_tokens as u64,
        })
    }
}

/// Run the task sequence strictly in order, one blocking LLM call per stage.
///
/// ## Message Layout
///
/// Each stage's request contains (in order):
/// 1. **System message** — the stage role's persona
/// 2. **Context message** *(stages 2–5)* — all earlier stage outputs,
///    rendered by [`crate::prompts::prior_results_context`]
/// 3. **User message** — the task instruction plus its expected-output note
///
/// Returns all five stage results in execution order; the caller extracts
/// the final stage's output as the report.
pub async fn run_tasks(
    provider: &Arc<dyn LLMProvider>,
    tasks: &[TaskSpec],
    config: &PipelineConfig,
) -> Result<Vec<StageResult>, PipelineError> {
    run_tasks_with(provider, tasks, config).await
}

/// Generic core of [`run_tasks`], parameterised over the backend so the
/// sequencing and context threading are testable without a live provider.
pub(crate) async fn run_tasks_with<B: ChatBackend>(
    backend: &B,
    tasks: &[TaskSpec],
    config: &PipelineConfig,
) -> Result<Vec<StageResult>, PipelineError> {
    let total = tasks.len();
    let options = build_options(config);

    let mut results: Vec<StageResult> = Vec::with_capacity(total);
    let mut carried: Vec<(String, String)> = Vec::with_capacity(total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_start(total);
    }

    for (idx, task) in tasks.iter().enumerate() {
        let stage = idx + 1;
        info!("Stage {}/{}: {}", stage, total, task.role.name);
        if let Some(ref cb) = config.progress_callback {
            cb.on_stage_start(stage, total, task.role.name);
        }

        let request = build_stage_request(task, &carried);

        let start = Instant::now();
        let outcome =
            backend
                .run_stage(&request, &options)
                .await
                .map_err(|detail| PipelineError::StageFailed {
                    stage,
                    role: task.role.name,
                    detail,
                })?;
        let duration = start.elapsed();

        debug!(
            "Stage {}: {} input tokens, {} output tokens, {:?}",
            stage, outcome.prompt_tokens, outcome.completion_tokens, duration
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_stage_complete(stage, total, task.role.name, outcome.content.len());
        }

        carried.push((task.role.name.to_string(), outcome.content.clone()));
        results.push(StageResult {
            stage,
            role: task.role.name.to_string(),
            output: outcome.content,
            input_tokens: outcome.prompt_tokens,
            output_tokens: outcome.completion_tokens,
            duration_ms: duration.as_millis() as u64,
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_complete(total);
    }

    Ok(results)
}

/// Assemble one stage's request from its task and the accumulated earlier
/// outputs. Stage 1 (empty accumulator) carries no context message.
fn build_stage_request(task: &TaskSpec, carried: &[(String, String)]) -> StageRequest {
    StageRequest {
        system: task.role.system_prompt(),
        context: if carried.is_empty() {
            None
        } else {
            Some(crate::prompts::prior_results_context(carried))
        },
        user: format!(
            "{}\n\nExpected output: {}",
            task.description, task.expected_output
        ),
    }
}

/// Build `CompletionOptions` from the pipeline config.
fn build_options(config: &PipelineConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::create_tasks;
    use std::sync::Mutex;

    /// Scripted backend: answers each call with "stage-N output", records
    /// every request, and optionally fails at one stage.
    struct ScriptedBackend {
        calls: Mutex<Vec<StageRequest>>,
        fail_at: Option<usize>,
    }

    impl ScriptedBackend {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: None,
            }
        }

        fn failing_at(stage: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: Some(stage),
            }
        }
    }

    impl ChatBackend for ScriptedBackend {
        async fn run_stage(
            &self,
            request: &StageRequest,
            _options: &CompletionOptions,
        ) -> Result<StageOutcome, String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            let stage = calls.len();

            if self.fail_at == Some(stage) {
                return Err("simulated provider failure".to_string());
            }
            Ok(StageOutcome {
                content: format!("stage-{stage} output"),
                prompt_tokens: 100,
                completion_tokens: 50,
            })
        }
    }

    const ROLE_ORDER: [&str; 5] = [
        "Paper Analyst",
        "Market Mapper",
        "Business Designer",
        "Technical Architect",
        "MVP Planner & Pitch Writer",
    ];

    fn five_tasks() -> Vec<TaskSpec> {
        create_tasks(
            "a short paper about sparse attention",
            &PipelineConfig::default(),
        )
    }

    #[tokio::test]
    async fn runs_five_stages_in_role_order() {
        let backend = ScriptedBackend::new();
        let config = PipelineConfig::default();
        let results = run_tasks_with(&backend, &five_tasks(), &config)
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 5);

        for (call, role) in calls.iter().zip(ROLE_ORDER) {
            assert!(
                call.system.contains(role),
                "system prompt should name {role}, got: {}",
                call.system
            );
        }
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.stage, i + 1);
            assert_eq!(result.role, ROLE_ORDER[i]);
            assert_eq!(result.output, format!("stage-{} output", i + 1));
        }
    }

    #[tokio::test]
    async fn first_stage_gets_no_context_message() {
        let backend = ScriptedBackend::new();
        let config = PipelineConfig::default();
        run_tasks_with(&backend, &five_tasks(), &config)
            .await
            .unwrap();

        let calls = backend.calls.lock().unwrap();
        assert!(calls[0].context.is_none(), "stage 1 must see no context");
        for (i, call) in calls.iter().enumerate().skip(1) {
            assert!(call.context.is_some(), "stage {} must carry context", i + 1);
        }
    }

    #[tokio::test]
    async fn each_stage_sees_all_earlier_outputs_in_order() {
        let backend = ScriptedBackend::new();
        let config = PipelineConfig::default();
        run_tasks_with(&backend, &five_tasks(), &config)
            .await
            .unwrap();

        let calls = backend.calls.lock().unwrap();
        for (i, call) in calls.iter().enumerate() {
            let ctx = call.context.as_deref().unwrap_or("");
            // Exactly the outputs of stages 1..=i, in order, nothing later.
            let mut last_pos = 0;
            for prior in 1..=i {
                let needle = format!("stage-{prior} output");
                let pos = ctx.find(&needle).unwrap_or_else(|| {
                    panic!("stage {} context missing output of stage {prior}", i + 1)
                });
                assert!(pos >= last_pos, "context outputs out of order");
                last_pos = pos;
            }
            for later in (i + 1)..=5 {
                assert!(
                    !ctx.contains(&format!("stage-{later} output")),
                    "stage {} context leaked a later stage's output",
                    i + 1
                );
            }
        }
    }

    #[tokio::test]
    async fn context_names_the_producing_roles() {
        let backend = ScriptedBackend::new();
        let config = PipelineConfig::default();
        run_tasks_with(&backend, &five_tasks(), &config)
            .await
            .unwrap();

        let calls = backend.calls.lock().unwrap();
        let final_ctx = calls[4].context.as_deref().unwrap();
        for role in &ROLE_ORDER[..4] {
            assert!(
                final_ctx.contains(&format!("### {role}")),
                "final stage context should attribute output to {role}"
            );
        }
    }

    #[tokio::test]
    async fn failure_aborts_the_run_at_that_stage() {
        let backend = ScriptedBackend::failing_at(3);
        let config = PipelineConfig::default();
        let err = run_tasks_with(&backend, &five_tasks(), &config).await;

        match err {
            Err(PipelineError::StageFailed {
                stage,
                role,
                detail,
            }) => {
                assert_eq!(stage, 3);
                assert_eq!(role, "Business Designer");
                assert!(detail.contains("simulated provider failure"));
            }
            other => panic!("expected StageFailed, got {other:?}"),
        }
        // No call after the failing stage: the run stops dead.
        assert_eq!(backend.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn build_options_defaults() {
        let config = PipelineConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, Some(4096));
    }
}
