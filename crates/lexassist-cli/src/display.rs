//! Vertical card display for assistant answers.
//!
//! Renders a [`Response`] as a grouped, human-readable card. Every section
//! is optional; a section with nothing to show is skipped entirely.

use std::fmt::Write;

use lexassist_core::{
    CodedSection, KnowledgeBase, KnowledgeSource, LegalException, LegalReference, Response,
    Scenario,
};
use lexassist_host::SessionStats;

const MAX_LIST_ITEMS: usize = 10;
const LABEL_WIDTH: usize = 14;

// ── Public API ──

/// Render a response as a vertical card.
pub fn render_response(r: &Response) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", r.query);
    let _ = writeln!(
        out,
        "{} · {} confidence{}",
        r.level,
        r.confidence.as_str(),
        if r.cached { " · cached" } else { "" }
    );
    let _ = writeln!(out);

    if let Some(quick) = &r.quick_answer {
        section(&mut out, "Quick Answer", |out| paragraphs(out, quick));
    }
    if let Some(body) = &r.content {
        section(&mut out, "Answer", |out| paragraphs(out, body));
    }
    if let Some(body) = &r.comprehensive_answer {
        section(&mut out, "Explanation", |out| paragraphs(out, body));
    }
    if let Some(reference) = &r.legal_reference {
        section(&mut out, "Legal Reference", |out| legal_reference(out, reference));
    }
    if let Some(exceptions) = r.exceptions.as_deref().filter(|e| !e.is_empty()) {
        section(&mut out, "Exceptions", |out| exception_list(out, exceptions));
    }
    if let Some(defs) = r.definitions.as_deref().filter(|d| !d.is_empty()) {
        section(&mut out, "Definitions", |out| {
            for d in defs.iter().take(MAX_LIST_ITEMS) {
                let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", d.term, d.definition);
            }
        });
    }
    if let Some(s) = &r.scenario {
        section(&mut out, s.title(), |out| scenario(out, s));
    }
    if let Some(questions) = r.suggested_questions.as_deref().filter(|q| !q.is_empty()) {
        section(&mut out, "Suggested Questions", |out| {
            for (i, q) in questions.iter().enumerate() {
                let _ = writeln!(out, "  [{}] {}", i + 1, q);
            }
        });
    }

    section(&mut out, "Metrics", |out| {
        field(out, "level", r.level.as_str());
        field(out, "confidence", r.confidence.as_str());
        field(out, "cost", &format!("${:.4}", r.cost));
        field(out, "latency", &format!("{} ms", r.latency_ms));
        field(out, "cached", if r.cached { "yes" } else { "no" });
    });
    out
}

/// Render session counters for the end of a chat.
pub fn render_stats(stats: &SessionStats) -> String {
    let mut out = String::new();
    section(&mut out, "Session", |out| {
        field(out, "L1 direct", &stats.direct.to_string());
        field(out, "L2 cached", &stats.cached.to_string());
        field(out, "L3 fallback", &stats.fallback.to_string());
        field(out, "total", &stats.total.to_string());
        field(out, "cost", &format!("${:.4}", stats.cost));
    });
    out
}

/// Render one coded section as a card.
pub fn render_section(s: &CodedSection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Section {} {} ===", s.number, s.code);
    let _ = writeln!(out, "{}", s.title);
    let _ = writeln!(out);
    section(&mut out, "Description", |out| paragraphs(out, &s.description));
    section(&mut out, "Punishment", |out| paragraphs(out, &s.punishment));
    if !s.related_cases.is_empty() {
        section(&mut out, "Related Cases", |out| {
            for case in s.related_cases.iter().take(MAX_LIST_ITEMS) {
                let _ = writeln!(out, "  • {case}");
            }
        });
    }
    out
}

/// Render the knowledge base contents: topics, sections, concepts, guidance.
pub fn render_catalogue(kb: &KnowledgeBase) -> String {
    let mut out = String::new();
    section(&mut out, "Topics", |out| {
        for t in kb.topics() {
            let scenario = if kb.scenario(&t.key).is_some() {
                "scenario"
            } else {
                ""
            };
            let _ = writeln!(out, "  {:<20} {scenario}", t.key);
        }
    });
    section(&mut out, "Coded Sections", |out| {
        for s in kb.sections() {
            let _ = writeln!(out, "  {:<6} {:<5} {}", s.number, s.code, s.title);
        }
    });
    section(&mut out, "Concepts", |out| {
        for c in kb.concepts() {
            let _ = writeln!(out, "  {}", c.term);
        }
    });
    section(&mut out, "Guidance", |out| {
        for g in kb.guidance() {
            let _ = writeln!(out, "  {:<20} {}", g.id, g.keywords.join(", "));
        }
    });
    out
}

// ── Section rendering ──

fn section(out: &mut String, header: &str, body: impl FnOnce(&mut String)) {
    let mut content = String::new();
    body(&mut content);
    if content.trim().is_empty() {
        return;
    }
    let _ = writeln!(out, "{header}");
    out.push_str(&content);
    let _ = writeln!(out);
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$} {value}");
}

/// Indent text, keeping blank-line paragraph breaks and dropping `**`
/// emphasis markers.
fn paragraphs(out: &mut String, text: &str) {
    for line in text.replace("**", "").lines() {
        if line.trim().is_empty() {
            let _ = writeln!(out);
        } else {
            let _ = writeln!(out, "  {}", line.trim_end());
        }
    }
}

fn legal_reference(out: &mut String, r: &LegalReference) {
    let _ = writeln!(out, "  {}", r.primary_law.name);
    let _ = writeln!(out, "    {}", r.primary_law.full_text);
    if let Some(url) = &r.primary_law.url {
        let _ = writeln!(out, "    {url}");
    }

    if !r.supporting_laws.is_empty() {
        let _ = writeln!(out, "  Supporting laws ({}):", r.supporting_laws.len());
        for law in r.supporting_laws.iter().take(MAX_LIST_ITEMS) {
            let _ = writeln!(out, "    {:<30} {}", law.name, law.citation);
            let _ = writeln!(out, "      {}", law.summary);
        }
    }

    if !r.case_law.is_empty() {
        let _ = writeln!(out, "  Case law ({}):", r.case_law.len());
        for case in r.case_law.iter().take(MAX_LIST_ITEMS) {
            let _ = writeln!(out, "    {} ({})", case.name, case.citation);
            let _ = writeln!(out, "      {}", case.holding);
            if !case.key_quote.is_empty() {
                let _ = writeln!(out, "      \"{}\"", case.key_quote);
            }
        }
    }
}

fn exception_list(out: &mut String, exceptions: &[LegalException]) {
    let show = exceptions.len().min(MAX_LIST_ITEMS);
    for (i, e) in exceptions.iter().take(show).enumerate() {
        let _ = writeln!(out, "  {}. {}: {}", i + 1, e.title, e.short_desc);
        let _ = writeln!(out, "     {}", e.full_desc);
        let _ = writeln!(out, "     Basis: {}", e.legal_basis);
        if !e.requirements.is_empty() {
            let _ = writeln!(out, "     Requires: {}", e.requirements.join("; "));
        }
        if let Some(example) = &e.example {
            let _ = writeln!(out, "     Example: {example}");
        }
    }
    if exceptions.len() > show {
        let _ = writeln!(out, "  ... and {} more", exceptions.len() - show);
    }
}

fn scenario(out: &mut String, s: &Scenario) {
    match s {
        Scenario::Example {
            situation,
            question,
            analysis,
            outcome,
            ..
        } => {
            field(out, "Situation", situation);
            field(out, "Question", question);
            field(out, "Analysis", analysis);
            field(out, "Outcome", outcome);
        }
        Scenario::Personal {
            user_question,
            analysis,
            advice,
            ..
        } => {
            field(out, "You asked", &format!("\"{user_question}\""));
            field(out, "Analysis", analysis);
            field(out, "Advice", advice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexassist_core::{Level, ResponseKind};

    #[test]
    fn fallback_card_skips_absent_sections() {
        let mut r = Response::new("xyz", ResponseKind::General, Level::Fallback);
        r.comprehensive_answer = Some("No answer.".into());
        let card = render_response(&r);
        assert!(card.starts_with("=== xyz ===\nL3"));
        assert!(card.contains("Explanation\n  No answer."));
        assert!(!card.contains("Legal Reference"));
        assert!(!card.contains("Suggested Questions"));
        assert!(card.contains("cached         no"));
    }

    #[test]
    fn suggested_questions_are_numbered() {
        let mut r = Response::new("q", ResponseKind::Topic, Level::Direct);
        r.suggested_questions = Some(vec!["First?".into(), "Second?".into()]);
        let card = render_response(&r);
        assert!(card.contains("  [1] First?\n  [2] Second?"));
    }

    #[test]
    fn emphasis_markers_are_stripped() {
        let mut r = Response::new("q", ResponseKind::Concept, Level::Direct);
        r.content = Some("**Bail**\n\nRelease pending trial.".into());
        let card = render_response(&r);
        assert!(card.contains("  Bail\n\n  Release pending trial."));
    }

    #[test]
    fn personal_scenario_quotes_question() {
        let mut r = Response::new("Can I sue?", ResponseKind::Topic, Level::Direct);
        r.scenario = Some(Scenario::Personal {
            title: "Your Scenario Analysis".into(),
            user_question: "Can I sue?".into(),
            analysis: "a".into(),
            advice: "b".into(),
        });
        let card = render_response(&r);
        assert!(card.contains("Your Scenario Analysis\n"));
        assert!(card.contains("\"Can I sue?\""));
    }

    #[test]
    fn stats_card() {
        let stats = SessionStats {
            direct: 2,
            cached: 1,
            fallback: 1,
            total: 4,
            cost: 0.0001,
        };
        let card = render_stats(&stats);
        assert!(card.contains("L2 cached      1"));
        assert!(card.contains("$0.0001"));
    }

    #[test]
    fn catalogue_lists_everything() {
        let kb = KnowledgeBase::bundled().unwrap();
        let card = render_catalogue(&kb);
        assert!(card.contains("rude behavior"));
        assert!(card.contains("420"));
        assert!(card.contains("anticipatory bail"));
        assert!(card.contains("tenant rights"));
    }
}
