//! The structured answer handed to the presentation layer.
//!
//! Every field beyond `query`, `kind`, `level`, `confidence`, `cost`,
//! `latency_ms` and `cached` is optional and omitted from serialised output
//! when absent.

use serde::{Deserialize, Serialize};

use crate::entry::{Definition, LegalException, LegalReference};

/// Where an answer came from.
///
/// Doubles as the telemetry bucket label (`L1`/`L2`/`L3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Direct knowledge-base or coded-section match.
    #[serde(rename = "L1")]
    Direct,
    /// Replayed from the response cache.
    #[serde(rename = "L2")]
    Cached,
    /// Nothing matched; generic fallback.
    #[serde(rename = "L3")]
    Fallback,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "L1",
            Self::Cached => "L2",
            Self::Fallback => "L3",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much the answer should be trusted. Independent of [`Level`]: a cache
/// replay keeps the confidence of the answer it replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

/// Which shape of answer the response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Full multi-section answer from a topic entry.
    Topic,
    /// Formatted statutory section in `content`.
    CodedSection,
    /// Glossary definition in `content`.
    Concept,
    /// Short keyword guidance in `content`.
    Guidance,
    /// Nothing matched.
    General,
}

/// Worked scenario attached to a topic answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Scenario {
    /// Canned template from the knowledge base.
    Example {
        title: String,
        situation: String,
        question: String,
        analysis: String,
        outcome: String,
    },
    /// Scaffold echoing the user's own question.
    Personal {
        title: String,
        user_question: String,
        analysis: String,
        advice: String,
    },
}

impl Scenario {
    pub fn title(&self) -> &str {
        match self {
            Self::Example { title, .. } | Self::Personal { title, .. } => title,
        }
    }

    /// The user's verbatim question, for personalised scenarios.
    pub fn user_question(&self) -> Option<&str> {
        match self {
            Self::Personal { user_question, .. } => Some(user_question),
            Self::Example { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The query exactly as submitted.
    pub query: String,
    pub kind: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comprehensive_answer: Option<String>,
    /// Pre-formatted body for section, concept and guidance answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_reference: Option<LegalReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<Vec<LegalException>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<Definition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_questions: Option<Vec<String>>,
    pub level: Level,
    /// Simulated cost of producing the answer.
    pub cost: f64,
    /// Simulated lookup latency in milliseconds.
    pub latency_ms: u32,
    pub confidence: Confidence,
    pub cached: bool,
}

impl Response {
    /// A bare response of the given kind with no optional sections.
    pub fn new(query: impl Into<String>, kind: ResponseKind, level: Level) -> Self {
        Self {
            query: query.into(),
            kind,
            quick_answer: None,
            comprehensive_answer: None,
            content: None,
            legal_reference: None,
            exceptions: None,
            definitions: None,
            scenario: None,
            suggested_questions: None,
            level,
            cost: 0.0,
            latency_ms: 0,
            confidence: Confidence::High,
            cached: false,
        }
    }

    /// Mark a stored response as a cache replay.
    pub fn replayed(mut self) -> Self {
        self.cached = true;
        self.level = Level::Cached;
        self
    }

    /// Whether two responses carry the same answer, ignoring provenance
    /// (`level`, `cached`) and simulated metrics.
    pub fn same_content(&self, other: &Self) -> bool {
        self.query == other.query
            && self.kind == other.kind
            && self.quick_answer == other.quick_answer
            && self.comprehensive_answer == other.comprehensive_answer
            && self.content == other.content
            && self.legal_reference == other.legal_reference
            && self.exceptions == other.exceptions
            && self.definitions == other.definitions
            && self.scenario == other.scenario
            && self.suggested_questions == other.suggested_questions
            && self.confidence == other.confidence
    }
}
