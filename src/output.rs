//! Output types: per-stage results, run statistics, and the final report.

use serde::{Deserialize, Serialize};

/// The result of one pipeline stage's LLM call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// 1-indexed stage number (1 = analysis … 5 = MVP/pitch).
    pub stage: usize,
    /// Role name of the persona that ran the stage.
    pub role: String,
    /// The stage's raw output text.
    pub output: String,
    /// Prompt tokens consumed by the stage's call.
    pub input_tokens: u64,
    /// Completion tokens produced by the stage's call.
    pub output_tokens: u64,
    /// Wall-clock duration of the stage's call.
    pub duration_ms: u64,
}

/// Aggregate statistics for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Number of stages executed (always 5 on success; a failed run returns
    /// an error instead of partial stats).
    pub stages: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    /// End-to-end wall-clock time, including non-LLM work.
    pub total_duration_ms: u64,
    /// Time spent inside LLM calls only.
    pub llm_duration_ms: u64,
}

/// Everything a pipeline run produces.
///
/// `report` is the cleaned final-stage output — the single markdown document
/// most callers want. `stages` keeps the intermediate outputs for callers
/// that render the full trail (the CLI's `--json` mode, for instance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// The final business report in markdown.
    pub report: String,
    /// All five stage results in execution order.
    pub stages: Vec<StageResult>,
    pub stats: PipelineStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serialises_and_round_trips() {
        let out = PipelineOutput {
            report: "# Report\n".into(),
            stages: vec![StageResult {
                stage: 1,
                role: "Paper Analyst".into(),
                output: "summary".into(),
                input_tokens: 120,
                output_tokens: 80,
                duration_ms: 900,
            }],
            stats: PipelineStats {
                stages: 1,
                total_input_tokens: 120,
                total_output_tokens: 80,
                total_duration_ms: 950,
                llm_duration_ms: 900,
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        let back: PipelineOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.report, out.report);
        assert_eq!(back.stages.len(), 1);
        assert_eq!(back.stats.total_input_tokens, 120);
    }
}
