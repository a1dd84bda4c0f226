//! Knowledge records: topic entries, coded sections, glossary concepts,
//! keyword guidance notes and canned scenario templates.

use serde::{Deserialize, Serialize};

/// A curated legal topic, matched by the words of its `key`.
///
/// `key` is lowercase and may hold several words ("eviction notice"); each
/// word is an independent match keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEntry {
    pub key: String,
    pub quick_answer: String,
    /// Long-form answer. Paragraphs are separated by blank lines and may
    /// carry `**emphasis**` markers.
    pub comprehensive_answer: String,
    pub legal_reference: LegalReference,
    #[serde(default)]
    pub exceptions: Vec<LegalException>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

impl TopicEntry {
    /// Match keywords derived from the key.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.key.split_whitespace()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalReference {
    pub primary_law: PrimaryLaw,
    #[serde(default)]
    pub supporting_laws: Vec<SupportingLaw>,
    #[serde(default)]
    pub case_law: Vec<CaseLaw>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryLaw {
    pub name: String,
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingLaw {
    pub name: String,
    pub citation: String,
    pub summary: String,
}

/// A landmark decision cited in support of a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseLaw {
    pub name: String,
    pub citation: String,
    pub holding: String,
    pub key_quote: String,
}

/// A carve-out from a topic's general answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalException {
    pub title: String,
    pub short_desc: String,
    pub full_desc: String,
    pub legal_basis: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub definition: String,
}

/// Canned illustrative scenario for a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTemplate {
    pub key: String,
    pub title: String,
    pub situation: String,
    pub question: String,
    pub analysis: String,
    pub outcome: String,
}

/// A numbered statutory section, e.g. IPC 420.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodedSection {
    /// All-digit section identifier.
    pub number: String,
    /// Short code name, e.g. `IPC`.
    pub code: String,
    pub title: String,
    pub description: String,
    pub punishment: String,
    #[serde(default)]
    pub related_cases: Vec<String>,
}

impl CodedSection {
    /// Render the section as a formatted answer body.
    pub fn render(&self) -> String {
        let mut out = format!(
            "**Section {} {}: {}**\n\n{}\n\nPunishment: {}",
            self.number, self.code, self.title, self.description, self.punishment
        );
        if !self.related_cases.is_empty() {
            out.push_str("\n\nRelated cases:");
            for case in &self.related_cases {
                out.push_str("\n• ");
                out.push_str(case);
            }
        }
        out
    }
}

/// Glossary term with a plain-language definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub term: String,
    pub definition: String,
}

impl Concept {
    /// Render with the term capitalised as a heading.
    pub fn render(&self) -> String {
        let mut chars = self.term.chars();
        let heading = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("**{}**\n\n{}", heading, self.definition)
    }
}

/// Short general guidance triggered by any of its keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceNote {
    pub id: String,
    pub keywords: Vec<String>,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_420() -> CodedSection {
        CodedSection {
            number: "420".into(),
            code: "IPC".into(),
            title: "Cheating and dishonestly inducing delivery of property".into(),
            description: "Whoever cheats...".into(),
            punishment: "Up to 7 years imprisonment and fine".into(),
            related_cases: vec!["State of Maharashtra v. Balakrishna".into()],
        }
    }

    #[test]
    fn section_render_includes_title_and_punishment() {
        let body = section_420().render();
        assert!(body.starts_with("**Section 420 IPC: Cheating"));
        assert!(body.contains("Punishment: Up to 7 years imprisonment and fine"));
        assert!(body.contains("• State of Maharashtra v. Balakrishna"));
    }

    #[test]
    fn section_render_without_cases() {
        let mut s = section_420();
        s.related_cases.clear();
        assert!(!s.render().contains("Related cases"));
    }

    #[test]
    fn concept_render_capitalises_heading() {
        let c = Concept {
            term: "anticipatory bail".into(),
            definition: "Bail before arrest.".into(),
        };
        assert_eq!(c.render(), "**Anticipatory bail**\n\nBail before arrest.");
    }

    #[test]
    fn exception_optional_example_omitted() {
        let e = LegalException {
            title: "T".into(),
            short_desc: "s".into(),
            full_desc: "f".into(),
            legal_basis: "b".into(),
            requirements: vec![],
            example: None,
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(!json.contains("example"));
        assert!(json.contains("shortDesc"));
    }
}
