//! Task pipeline builder: five fixed task specifications per run.
//!
//! A [`TaskSpec`] binds one stage's instruction text to its role identity and
//! an advisory expected-output description. The expected output is prose for
//! the model, not a schema — nothing here validates what the LLM eventually
//! returns.
//!
//! Stage 1 is the only task with the paper text folded in, bounded to
//! `config.excerpt_chars` characters. Stages 2–5 rely on the executor's
//! explicit carry-forward of earlier outputs.

use crate::config::PipelineConfig;
use crate::prompts;
use crate::roles::{self, RoleIdentity};

/// One stage's instruction, assigned role, and expected-output description.
///
/// Five instances are created per run, in fixed order, and consumed exactly
/// once by the executor.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Full instruction text sent as the stage's user message.
    pub description: String,
    /// The persona that runs the stage.
    pub role: &'static RoleIdentity,
    /// Advisory description of the desired output shape.
    pub expected_output: &'static str,
}

/// Build the five task specifications for one pipeline run.
///
/// The order is fixed and non-negotiable: analysis → market mapping →
/// product design → architecture → MVP/pitch. When `config.industry` is set,
/// the literal line `Target Industry: {hint}` plus a blank line is prepended
/// to the paper text before the excerpt is cut, so the hint survives
/// truncation and leads the analyst prompt.
pub fn create_tasks(paper_text: &str, config: &PipelineConfig) -> Vec<TaskSpec> {
    let hinted;
    let text = match config.industry.as_deref() {
        Some(hint) if !hint.is_empty() => {
            hinted = format!("Target Industry: {hint}\n\n{paper_text}");
            hinted.as_str()
        }
        _ => paper_text,
    };
    let excerpt = truncate_chars(text, config.excerpt_chars);

    vec![
        TaskSpec {
            description: prompts::analysis_instruction(excerpt),
            role: &roles::PAPER_ANALYST,
            expected_output: prompts::ANALYSIS_EXPECTED_OUTPUT,
        },
        TaskSpec {
            description: prompts::MARKET_MAPPING_INSTRUCTION.to_string(),
            role: &roles::MARKET_MAPPER,
            expected_output: prompts::MARKET_MAPPING_EXPECTED_OUTPUT,
        },
        TaskSpec {
            description: prompts::PRODUCT_DESIGN_INSTRUCTION.to_string(),
            role: &roles::BUSINESS_DESIGNER,
            expected_output: prompts::PRODUCT_DESIGN_EXPECTED_OUTPUT,
        },
        TaskSpec {
            description: prompts::ARCHITECTURE_INSTRUCTION.to_string(),
            role: &roles::TECHNICAL_ARCHITECT,
            expected_output: prompts::ARCHITECTURE_EXPECTED_OUTPUT,
        },
        TaskSpec {
            description: prompts::MVP_REPORT_INSTRUCTION.to_string(),
            role: &roles::MVP_PLANNER,
            expected_output: prompts::MVP_REPORT_EXPECTED_OUTPUT,
        },
    ]
}

/// Truncate to at most `max_chars` characters, on a char boundary.
///
/// The cut is a strict prefix — no reordering, no ellipsis.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn exactly_five_tasks_in_fixed_order() {
        let tasks = create_tasks("some paper text", &default_config());
        assert_eq!(tasks.len(), 5);
        let names: Vec<&str> = tasks.iter().map(|t| t.role.name).collect();
        assert_eq!(
            names,
            vec![
                "Paper Analyst",
                "Market Mapper",
                "Business Designer",
                "Technical Architect",
                "MVP Planner & Pitch Writer",
            ]
        );
    }

    #[test]
    fn stage_one_embeds_paper_text_verbatim() {
        let tasks = create_tasks("Hello\nWorld", &default_config());
        assert!(tasks[0].description.contains("Hello\nWorld"));
        // Later stages never see the paper directly.
        for task in &tasks[1..] {
            assert!(!task.description.contains("Hello\nWorld"));
        }
    }

    #[test]
    fn industry_hint_leads_the_paper_text() {
        let config = PipelineConfig::builder()
            .industry("healthcare")
            .build()
            .unwrap();
        let tasks = create_tasks("paper body", &config);
        let desc = &tasks[0].description;
        let hint_pos = desc.find("Target Industry: healthcare").unwrap();
        let body_pos = desc.find("paper body").unwrap();
        assert!(hint_pos < body_pos, "hint must precede the paper text");
    }

    #[test]
    fn no_hint_means_no_target_industry_line() {
        let tasks = create_tasks("paper body", &default_config());
        assert!(!tasks[0].description.contains("Target Industry:"));
    }

    #[test]
    fn excerpt_is_a_bounded_prefix() {
        let long_text = "a".repeat(9000) + "TAIL_MARKER";
        let tasks = create_tasks(&long_text, &default_config());
        let desc = &tasks[0].description;
        assert!(desc.contains(&"a".repeat(8000)));
        assert!(!desc.contains(&"a".repeat(8001)));
        assert!(!desc.contains("TAIL_MARKER"));
    }

    #[test]
    fn hint_counts_toward_the_excerpt_budget() {
        // Prefix is applied before truncation, so the hint plus the first
        // slice of the paper fill the budget together.
        let config = PipelineConfig::builder()
            .industry("fintech")
            .excerpt_chars(30)
            .build()
            .unwrap();
        let tasks = create_tasks(&"x".repeat(100), &config);
        let desc = &tasks[0].description;
        assert!(desc.contains("Target Industry: fintech"));
        // "Target Industry: fintech\n\n" is 26 chars, leaving 4 for the paper.
        assert!(desc.contains("xxxx"));
        assert!(!desc.contains("xxxxx"));
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        let s = "héllo wörld";
        assert_eq!(truncate_chars(s, 4), "héll");
        assert_eq!(truncate_chars(s, 100), s);
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn empty_text_still_yields_five_tasks() {
        let tasks = create_tasks("", &default_config());
        assert_eq!(tasks.len(), 5);
        assert!(tasks[0].description.contains("Research paper text:"));
    }
}
