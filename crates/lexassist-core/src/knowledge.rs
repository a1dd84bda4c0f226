//! The curated knowledge base.
//!
//! Built once from a [`KnowledgeData`] document, validated, and shared
//! read-only for the life of the process. Topics keep their registration
//! order so keyword matching is deterministic.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entry::{CodedSection, Concept, GuidanceNote, ScenarioTemplate, TopicEntry};
use crate::error::KnowledgeError;

/// Knowledge data compiled into the binary.
pub const BUNDLED_JSON: &str = include_str!("../data/knowledge_base.json");

/// Serialised knowledge document, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeData {
    #[serde(default)]
    pub topics: Vec<TopicEntry>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioTemplate>,
    #[serde(default)]
    pub coded_sections: Vec<CodedSection>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub guidance: Vec<GuidanceNote>,
}

/// Read access to knowledge tables.
///
/// The classifier and assembler only see this trait, so a richer backing
/// store can replace [`KnowledgeBase`] without touching matching logic.
pub trait KnowledgeSource: Send + Sync {
    /// All topics, in registration order.
    fn topics(&self) -> &[TopicEntry];
    fn topic(&self, key: &str) -> Option<&TopicEntry>;
    fn scenario(&self, key: &str) -> Option<&ScenarioTemplate>;
    fn section(&self, number: &str) -> Option<&CodedSection>;
    /// Glossary concepts, in registration order.
    fn concepts(&self) -> &[Concept];
    fn concept(&self, term: &str) -> Option<&Concept>;
    /// Guidance notes, in registration order.
    fn guidance(&self) -> &[GuidanceNote];
    fn guidance_note(&self, id: &str) -> Option<&GuidanceNote>;
}

/// Validated, immutable knowledge tables.
#[derive(Debug)]
pub struct KnowledgeBase {
    topics: Vec<TopicEntry>,
    topic_index: HashMap<String, usize>,
    scenarios: HashMap<String, ScenarioTemplate>,
    sections: Vec<CodedSection>,
    section_index: HashMap<String, usize>,
    concepts: Vec<Concept>,
    concept_index: HashMap<String, usize>,
    guidance: Vec<GuidanceNote>,
    guidance_index: HashMap<String, usize>,
}

/// Table sizes, for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    pub topics: usize,
    pub scenarios: usize,
    pub coded_sections: usize,
    pub concepts: usize,
    pub guidance: usize,
}

impl KnowledgeBase {
    /// Load the knowledge data bundled with the crate.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json_str(BUNDLED_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let data: KnowledgeData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load and validate a knowledge document from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, KnowledgeError> {
        if !path.exists() {
            return Err(KnowledgeError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        let kb = Self::from_json_str(&json)?;
        info!(path = %path.display(), "loaded knowledge file");
        Ok(kb)
    }

    /// Validate a knowledge document and build lookup indexes.
    ///
    /// Rejects duplicate keys, scenarios without a topic, non-lowercase topic
    /// keys, non-numeric section numbers and empty required fields.
    pub fn from_data(data: KnowledgeData) -> Result<Self, KnowledgeError> {
        let result = Self::build(data);
        if let Err(e) = &result {
            warn!(error = %e, "knowledge validation failed");
        }
        result
    }

    fn build(data: KnowledgeData) -> Result<Self, KnowledgeError> {
        let mut topic_index = HashMap::with_capacity(data.topics.len());
        for (i, topic) in data.topics.iter().enumerate() {
            require("topic", &topic.key, "key", &topic.key)?;
            if topic.key != topic.key.to_lowercase() || topic.key != topic.key.trim() {
                return Err(KnowledgeError::KeyNotLowercase(topic.key.clone()));
            }
            require("topic", &topic.key, "quickAnswer", &topic.quick_answer)?;
            require(
                "topic",
                &topic.key,
                "comprehensiveAnswer",
                &topic.comprehensive_answer,
            )?;
            if topic_index.insert(topic.key.clone(), i).is_some() {
                return Err(KnowledgeError::Duplicate {
                    kind: "topic",
                    key: topic.key.clone(),
                });
            }
        }

        let mut scenarios = HashMap::with_capacity(data.scenarios.len());
        for scenario in data.scenarios {
            if !topic_index.contains_key(&scenario.key) {
                return Err(KnowledgeError::OrphanScenario(scenario.key));
            }
            let key = scenario.key.clone();
            if scenarios.insert(key.clone(), scenario).is_some() {
                return Err(KnowledgeError::Duplicate {
                    kind: "scenario",
                    key,
                });
            }
        }

        let mut section_index = HashMap::with_capacity(data.coded_sections.len());
        for (i, section) in data.coded_sections.iter().enumerate() {
            if section.number.is_empty() || !section.number.bytes().all(|b| b.is_ascii_digit()) {
                return Err(KnowledgeError::InvalidSectionNumber(section.number.clone()));
            }
            require("section", &section.number, "title", &section.title)?;
            if section_index.insert(section.number.clone(), i).is_some() {
                return Err(KnowledgeError::Duplicate {
                    kind: "section",
                    key: section.number.clone(),
                });
            }
        }

        let mut concept_index = HashMap::with_capacity(data.concepts.len());
        for (i, concept) in data.concepts.iter().enumerate() {
            require("concept", &concept.term, "term", &concept.term)?;
            require("concept", &concept.term, "definition", &concept.definition)?;
            if concept_index.insert(concept.term.to_lowercase(), i).is_some() {
                return Err(KnowledgeError::Duplicate {
                    kind: "concept",
                    key: concept.term.clone(),
                });
            }
        }

        let mut guidance_index = HashMap::with_capacity(data.guidance.len());
        for (i, note) in data.guidance.iter().enumerate() {
            require("guidance", &note.id, "id", &note.id)?;
            require("guidance", &note.id, "content", &note.content)?;
            if note.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(KnowledgeError::EmptyField {
                    kind: "guidance",
                    key: note.id.clone(),
                    field: "keywords",
                });
            }
            if guidance_index.insert(note.id.clone(), i).is_some() {
                return Err(KnowledgeError::Duplicate {
                    kind: "guidance",
                    key: note.id.clone(),
                });
            }
        }

        let kb = Self {
            topics: data.topics,
            topic_index,
            scenarios,
            sections: data.coded_sections,
            section_index,
            concepts: data.concepts,
            concept_index,
            guidance: data.guidance,
            guidance_index,
        };

        let s = kb.summary();
        info!(
            topics = s.topics,
            scenarios = s.scenarios,
            sections = s.coded_sections,
            concepts = s.concepts,
            guidance = s.guidance,
            "knowledge base ready"
        );
        Ok(kb)
    }

    pub fn summary(&self) -> KnowledgeSummary {
        KnowledgeSummary {
            topics: self.topics.len(),
            scenarios: self.scenarios.len(),
            coded_sections: self.sections.len(),
            concepts: self.concepts.len(),
            guidance: self.guidance.len(),
        }
    }

    /// Coded sections, in registration order.
    pub fn sections(&self) -> &[CodedSection] {
        &self.sections
    }
}

impl KnowledgeSource for KnowledgeBase {
    fn topics(&self) -> &[TopicEntry] {
        &self.topics
    }

    fn topic(&self, key: &str) -> Option<&TopicEntry> {
        self.topic_index.get(key).map(|&i| &self.topics[i])
    }

    fn scenario(&self, key: &str) -> Option<&ScenarioTemplate> {
        self.scenarios.get(key)
    }

    fn section(&self, number: &str) -> Option<&CodedSection> {
        self.section_index.get(number).map(|&i| &self.sections[i])
    }

    fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    fn concept(&self, term: &str) -> Option<&Concept> {
        self.concept_index
            .get(&term.to_lowercase())
            .map(|&i| &self.concepts[i])
    }

    fn guidance(&self) -> &[GuidanceNote] {
        &self.guidance
    }

    fn guidance_note(&self, id: &str) -> Option<&GuidanceNote> {
        self.guidance_index.get(id).map(|&i| &self.guidance[i])
    }
}

fn require(
    kind: &'static str,
    key: &str,
    field: &'static str,
    value: &str,
) -> Result<(), KnowledgeError> {
    if value.trim().is_empty() {
        return Err(KnowledgeError::EmptyField {
            kind,
            key: key.to_string(),
            field,
        });
    }
    Ok(())
}
