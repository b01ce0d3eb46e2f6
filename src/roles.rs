//! The five fixed agent personas, one per pipeline stage.
//!
//! Role identities are static, process-wide configuration: constructed once at
//! compile time, never mutated, shared by reference across every pipeline run.
//! Centralising them here keeps persona wording in one reviewable place, the
//! same way prompt templates live in [`crate::prompts`].

use serde::Serialize;

/// A fixed behavioural persona assigned to exactly one pipeline stage.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleIdentity {
    /// Short display name, e.g. "Market Mapper".
    pub name: &'static str,
    /// One-line functional description of the role.
    pub role: &'static str,
    /// What the role is trying to achieve across the run.
    pub goal: &'static str,
    /// Backstory framing that steers the model's register.
    pub backstory: &'static str,
}

impl RoleIdentity {
    /// Render the persona as a system prompt for the stage's LLM call.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {name}, acting as: {role}\n\nYour goal: {goal}\n\nBackground: {backstory}",
            name = self.name,
            role = self.role,
            goal = self.goal,
            backstory = self.backstory,
        )
    }
}

/// Stage 1 — reads the paper.
pub const PAPER_ANALYST: RoleIdentity = RoleIdentity {
    name: "Paper Analyst",
    role: "Research Expert & Startup Strategist",
    goal: "Extract insights from research and map them to real-world business use cases.",
    backstory: "You are an expert at reading complex research papers and explaining \
                the core problem, methods, and contributions clearly.",
};

/// Stage 2 — maps research insights to markets.
pub const MARKET_MAPPER: RoleIdentity = RoleIdentity {
    name: "Market Mapper",
    role: "Strategic analyst of the competitive and talent landscape of a given market",
    goal: "Act as the company's external intelligence unit: translate complex market \
           dynamics into clear, actionable insights that drive strategic decision-making.",
    backstory: "You are an expert at analysing market trends, competitive landscapes, \
                and identifying business opportunities from research insights.",
};

/// Stage 3 — turns use-cases into products.
pub const BUSINESS_DESIGNER: RoleIdentity = RoleIdentity {
    name: "Business Designer",
    role: "Designer and validator of new business offerings built on research insights",
    goal: "Ensure long-term profitability by creating a detailed business model and \
           validating whether the offering can actually be delivered.",
    backstory: "You design business models starting from empathy (design), ensuring \
                viability (business), and validating feasibility (operations & strategy).",
};

/// Stage 4 — designs the system.
pub const TECHNICAL_ARCHITECT: RoleIdentity = RoleIdentity {
    name: "Technical Architect",
    role: "Translator of business needs into actionable technical requirements",
    goal: "Design scalable, secure, and cost-efficient system architectures aligned \
           with the business strategy.",
    backstory: "You are a senior architect who aligns cloud and ML architecture with \
                business goals.",
};

/// Stage 5 — plans the MVP and writes the pitch.
pub const MVP_PLANNER: RoleIdentity = RoleIdentity {
    name: "MVP Planner & Pitch Writer",
    role: "Startup Mentor",
    goal: "Create a realistic 4\u{2013}6 week MVP roadmap, a final report, and a \
           stakeholder-friendly pitch.",
    backstory: "You convert product and architecture plans into execution-ready \
                milestones and crisp pitches.",
};

/// All five roles, in pipeline execution order. The order is fixed: later
/// stages' prompts textually assume the earlier roles already ran.
pub fn all() -> [&'static RoleIdentity; 5] {
    [
        &PAPER_ANALYST,
        &MARKET_MAPPER,
        &BUSINESS_DESIGNER,
        &TECHNICAL_ARCHITECT,
        &MVP_PLANNER,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_roles_in_fixed_order() {
        let roles = all();
        let names: Vec<&str> = roles.iter().map(|r| r.name).collect();
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
    fn system_prompt_contains_persona_fields() {
        let p = TECHNICAL_ARCHITECT.system_prompt();
        assert!(p.contains("Technical Architect"));
        assert!(p.contains(TECHNICAL_ARCHITECT.goal));
        assert!(p.contains("senior architect"));
    }

    #[test]
    fn role_names_are_unique() {
        let roles = all();
        for (i, a) in roles.iter().enumerate() {
            for b in roles.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
