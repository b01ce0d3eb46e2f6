//! Instruction templates for the five pipeline stages.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking what a stage asks for (e.g. the
//!    number of product ideas) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the templates directly without
//!    a live LLM, making prompt regressions easy to catch.
//!
//! Stage 1 is the only template with a dynamic substitution (the paper-text
//! excerpt). Stages 2–5 are fixed strings that rely on the executor passing
//! earlier stage outputs forward as context — see
//! [`prior_results_context`].

/// Stage 1: understand the research paper.
///
/// `excerpt` must already be truncated by the caller; this function does not
/// bound its length.
pub fn analysis_instruction(excerpt: &str) -> String {
    format!(
        "You are given the raw text of a research paper.\n\n\
         1. Identify the likely title (if visible).\n\
         2. Identify the domain/field (e.g., NLP, computer vision, healthcare, finance, etc.).\n\
         3. Explain the core problem the paper is trying to solve.\n\
         4. Summarize the main method/approach.\n\
         5. List the key contributions in bullet points.\n\
         6. Mention any assumptions or limitations if visible.\n\n\
         Research paper text:\n{excerpt}"
    )
}

pub const ANALYSIS_EXPECTED_OUTPUT: &str =
    "A structured markdown summary with sections: Title, Domain, Problem, Method, \
     Contributions, Limitations.";

/// Stage 2: map research insights to markets and problems.
pub const MARKET_MAPPING_INSTRUCTION: &str =
    "Using the analysis from the Paper Analyst, identify 3\u{2013}5 real-world \
     industries and concrete problems that this research could help solve. \
     For each industry, provide:\n\
     - Industry name\n\
     - Specific problem / pain point\n\
     - Who experiences this problem (user persona)\n\
     - Why the research method is relevant here";

pub const MARKET_MAPPING_EXPECTED_OUTPUT: &str =
    "A markdown list of 3\u{2013}5 potential use-cases grouped by industry.";

/// Stage 3: turn use-cases into product ideas.
pub const PRODUCT_DESIGN_INSTRUCTION: &str =
    "Using the identified industries and problems, design 3 concrete product ideas. \
     For each product, provide:\n\
     - Product name\n\
     - Target users\n\
     - Core features\n\
     - Value proposition (why it is useful)\n\
     - How it is different from naive or existing approaches";

pub const PRODUCT_DESIGN_EXPECTED_OUTPUT: &str =
    "A markdown section listing 3 detailed product ideas.";

/// Stage 4: design an architecture for the best product. The stage itself
/// picks the most promising idea — caller code never chooses.
pub const ARCHITECTURE_INSTRUCTION: &str =
    "Choose the single most promising product idea from the previous step and design \
     a realistic technical architecture for it.\n\n\
     Include:\n\
     - Overall high-level description\n\
     - Main components/services (e.g., frontend, backend, databases, ML services)\n\
     - Data flow between components\n\
     - Suggested tech stack (frameworks, languages, databases, cloud services)\n\
     - Any scalability or security considerations if relevant";

pub const ARCHITECTURE_EXPECTED_OUTPUT: &str =
    "A markdown section titled 'Technical Architecture' with bullet points and \
     short paragraphs.";

/// Stage 5: combine everything into the final report and pitch.
pub const MVP_REPORT_INSTRUCTION: &str =
    "Using all previous analyses (paper summary, market mapping, product ideas, and \
     architecture), create a final report with the following sections in markdown:\n\n\
     ## 1. Research Paper Summary\n\
     Short, non-technical summary (5\u{2013}8 lines).\n\n\
     ## 2. Market Opportunities & Use-Cases\n\
     List the best industries and problems this research can solve.\n\n\
     ## 3. Selected Product Concept\n\
     Describe the chosen product in more detail.\n\n\
     ## 4. Technical Architecture Overview\n\
     Summarize the planned system architecture and stack.\n\n\
     ## 5. MVP Roadmap (4\u{2013}6 weeks)\n\
     Create 3\u{2013}4 milestones to build an MVP version.\n\n\
     ## 6. Short Pitch (for LinkedIn / investors)\n\
     Write a concise 6\u{2013}10 line pitch explaining the idea and impact.";

pub const MVP_REPORT_EXPECTED_OUTPUT: &str =
    "A single, well-structured markdown report with these sections.";

/// Build the context message carrying earlier stage outputs into a later
/// stage's LLM call.
///
/// Sent as a separate system message so the stage instruction stays a clean
/// user turn. `results` is (role name, stage output) in execution order.
pub fn prior_results_context(results: &[(String, String)]) -> String {
    let mut ctx = String::from(
        "Results from the earlier pipeline stages, in order. \
         Build on them; do not repeat them verbatim.\n",
    );
    for (role, output) in results {
        ctx.push_str("\n### ");
        ctx.push_str(role);
        ctx.push('\n');
        ctx.push_str(output);
        ctx.push('\n');
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_instruction_embeds_excerpt_verbatim() {
        let text = "Attention Is All You Need\nWe propose the Transformer.";
        let instr = analysis_instruction(text);
        assert!(instr.contains(text));
        assert!(instr.ends_with(text));
    }

    #[test]
    fn later_stages_reference_prior_work_not_paper_text() {
        // Stages 2–5 must not carry a text placeholder; they rely on context.
        for template in [
            MARKET_MAPPING_INSTRUCTION,
            PRODUCT_DESIGN_INSTRUCTION,
            ARCHITECTURE_INSTRUCTION,
            MVP_REPORT_INSTRUCTION,
        ] {
            assert!(!template.contains("{"), "unexpected placeholder: {template}");
        }
        assert!(MARKET_MAPPING_INSTRUCTION.contains("Paper Analyst"));
        assert!(ARCHITECTURE_INSTRUCTION.contains("previous step"));
        assert!(MVP_REPORT_INSTRUCTION.contains("all previous analyses"));
    }

    #[test]
    fn prior_results_context_lists_roles_in_order() {
        let results = vec![
            ("Paper Analyst".to_string(), "summary here".to_string()),
            ("Market Mapper".to_string(), "markets here".to_string()),
        ];
        let ctx = prior_results_context(&results);
        let analyst = ctx.find("### Paper Analyst").unwrap();
        let mapper = ctx.find("### Market Mapper").unwrap();
        assert!(analyst < mapper);
        assert!(ctx.contains("summary here"));
        assert!(ctx.contains("markets here"));
    }
}
