//! Worked-scenario generation for topic answers.

use lexassist_core::{KnowledgeSource, Scenario, ScenarioTemplate};

pub const PERSONAL_TITLE: &str = "Your Scenario Analysis";

const PERSONAL_ADVICE: &str =
    "Given the situation you described, here's what the law says and what actions you can consider.";

/// Pick the scenario section for an answer.
///
/// A described personal situation always gets the scaffold echoing the
/// user's question, even when a canned template exists. Otherwise the
/// topic's template is returned verbatim, or nothing.
pub fn generate(
    kb: &dyn KnowledgeSource,
    topic_key: Option<&str>,
    raw_query: &str,
    scenario_described: bool,
) -> Option<Scenario> {
    if scenario_described {
        return Some(personal(raw_query));
    }
    topic_key.and_then(|key| kb.scenario(key)).map(from_template)
}

/// Scaffold that treats the user's own question as the scenario.
pub fn personal(raw_query: &str) -> Scenario {
    Scenario::Personal {
        title: PERSONAL_TITLE.to_string(),
        user_question: raw_query.to_string(),
        analysis: format!(
            "Based on your question \"{raw_query}\", let's analyze the legal implications step by step."
        ),
        advice: PERSONAL_ADVICE.to_string(),
    }
}

fn from_template(t: &ScenarioTemplate) -> Scenario {
    Scenario::Example {
        title: t.title.clone(),
        situation: t.situation.clone(),
        question: t.question.clone(),
        analysis: t.analysis.clone(),
        outcome: t.outcome.clone(),
    }
}
