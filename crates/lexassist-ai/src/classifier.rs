//! Rule-based query classification.
//!
//! A query is run through an ordered list of [`Matcher`] strategies; each
//! either names a match target or has no opinion, and the first definite
//! match wins. The default order puts structured patterns before generic
//! keyword containment so a section number is never swallowed by an
//! unrelated keyword:
//!
//! 1. [`CodedSectionMatcher`]: `section 420`, `ipc 420`, `420 ipc`
//! 2. [`TopicKeywordMatcher`]: any word of a topic key, as a substring
//! 3. [`ConceptMatcher`]: a glossary term, as whole words
//! 4. [`GuidanceMatcher`]: any guidance keyword, as a substring
//!
//! Independently of the match, the query is checked for scenario markers.

use std::sync::{Arc, LazyLock};

use lexassist_core::{KnowledgeSource, Level, contains_phrase, words};
use regex::Regex;
use tracing::debug;

use crate::markers::describes_scenario;

static SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)section\s*(\d+)|ipc\s*(\d+)|(\d+)\s*ipc").expect("section pattern is valid")
});

/// What a query matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTarget {
    /// Section number in the coded-section table.
    CodedSection(String),
    /// Topic key.
    Topic(String),
    /// Glossary term.
    Concept(String),
    /// Guidance note id.
    Guidance(String),
}

impl MatchTarget {
    /// The topic key, if this is a topic match.
    pub fn topic_key(&self) -> Option<&str> {
        match self {
            Self::Topic(key) => Some(key),
            _ => None,
        }
    }
}

/// Result of classifying one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The query exactly as submitted.
    pub query: String,
    pub target: Option<MatchTarget>,
    /// [`Level::Direct`] on a match, [`Level::Fallback`] otherwise.
    pub level: Level,
    /// The user appears to describe their own situation.
    pub scenario_described: bool,
}

impl Classification {
    pub fn is_match(&self) -> bool {
        self.target.is_some()
    }
}

/// A query prepared once for all matchers.
#[derive(Debug, Clone)]
pub struct QueryText<'a> {
    pub raw: &'a str,
    /// Lower-cased, trimmed.
    pub normalized: String,
    pub words: Vec<String>,
}

impl<'a> QueryText<'a> {
    pub fn new(raw: &'a str) -> Self {
        let normalized = raw.trim().to_lowercase();
        let words = words(&normalized);
        Self {
            raw,
            normalized,
            words,
        }
    }
}

/// One classification strategy.
pub trait Matcher: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Return a definite match, or `None` for "no opinion".
    fn try_match(&self, query: &QueryText<'_>, kb: &dyn KnowledgeSource) -> Option<MatchTarget>;
}

/// Extracts statutory section numbers and checks them against the
/// coded-section table. Unknown numbers are not an error; the matcher
/// simply has no opinion.
pub struct CodedSectionMatcher;

impl CodedSectionMatcher {
    /// All section numbers referenced in the text, in order of appearance.
    pub fn extract(text: &str) -> Vec<&str> {
        SECTION_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
            })
            .collect()
    }
}

impl Matcher for CodedSectionMatcher {
    fn name(&self) -> &'static str {
        "coded_section"
    }

    fn try_match(&self, query: &QueryText<'_>, kb: &dyn KnowledgeSource) -> Option<MatchTarget> {
        Self::extract(&query.normalized)
            .into_iter()
            .find(|number| kb.section(number).is_some())
            .map(|number| MatchTarget::CodedSection(number.to_string()))
    }
}

/// Matches the first topic (in registration order) having any key word
/// contained in the query.
pub struct TopicKeywordMatcher;

impl Matcher for TopicKeywordMatcher {
    fn name(&self) -> &'static str {
        "topic_keyword"
    }

    fn try_match(&self, query: &QueryText<'_>, kb: &dyn KnowledgeSource) -> Option<MatchTarget> {
        kb.topics()
            .iter()
            .find(|topic| topic.keywords().any(|kw| query.normalized.contains(kw)))
            .map(|topic| MatchTarget::Topic(topic.key.clone()))
    }
}

/// Matches the first glossary term occurring as whole words.
pub struct ConceptMatcher;

impl Matcher for ConceptMatcher {
    fn name(&self) -> &'static str {
        "concept"
    }

    fn try_match(&self, query: &QueryText<'_>, kb: &dyn KnowledgeSource) -> Option<MatchTarget> {
        kb.concepts()
            .iter()
            .find(|c| contains_phrase(&query.words, &c.term))
            .map(|c| MatchTarget::Concept(c.term.clone()))
    }
}

/// Matches the first guidance note with a keyword contained in the query.
pub struct GuidanceMatcher;

impl Matcher for GuidanceMatcher {
    fn name(&self) -> &'static str {
        "guidance"
    }

    fn try_match(&self, query: &QueryText<'_>, kb: &dyn KnowledgeSource) -> Option<MatchTarget> {
        kb.guidance()
            .iter()
            .find(|note| {
                note.keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .any(|k| !k.is_empty() && query.normalized.contains(&k))
            })
            .map(|note| MatchTarget::Guidance(note.id.clone()))
    }
}

/// The default strategy order.
pub fn default_matchers() -> Vec<Box<dyn Matcher>> {
    vec![
        Box::new(CodedSectionMatcher),
        Box::new(TopicKeywordMatcher),
        Box::new(ConceptMatcher),
        Box::new(GuidanceMatcher),
    ]
}

/// Classifies raw queries against a knowledge source.
pub struct Classifier {
    kb: Arc<dyn KnowledgeSource>,
    matchers: Vec<Box<dyn Matcher>>,
}

impl Classifier {
    /// Build a classifier with the [`default_matchers`] order.
    pub fn new(kb: Arc<dyn KnowledgeSource>) -> Self {
        Self::with_matchers(kb, default_matchers())
    }

    /// Build a classifier with a custom strategy order.
    pub fn with_matchers(kb: Arc<dyn KnowledgeSource>, matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { kb, matchers }
    }

    pub fn knowledge(&self) -> &Arc<dyn KnowledgeSource> {
        &self.kb
    }

    /// Names of the strategies, in evaluation order.
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    pub fn classify(&self, raw: &str) -> Classification {
        let query = QueryText::new(raw);
        let scenario_described = describes_scenario(&query.normalized);

        for matcher in &self.matchers {
            if let Some(target) = matcher.try_match(&query, self.kb.as_ref()) {
                debug!(matcher = matcher.name(), ?target, scenario_described, "query matched");
                return Classification {
                    query: raw.to_string(),
                    target: Some(target),
                    level: Level::Direct,
                    scenario_described,
                };
            }
        }

        debug!(scenario_described, "query matched nothing");
        Classification {
            query: raw.to_string(),
            target: None,
            level: Level::Fallback,
            scenario_described,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexassist_core::{
        KnowledgeBase, KnowledgeData, LegalReference, PrimaryLaw, TopicEntry,
    };

    fn bundled() -> Classifier {
        Classifier::new(Arc::new(KnowledgeBase::bundled().unwrap()))
    }

    fn topic(key: &str) -> TopicEntry {
        TopicEntry {
            key: key.into(),
            quick_answer: "q".into(),
            comprehensive_answer: "c".into(),
            legal_reference: LegalReference {
                primary_law: PrimaryLaw {
                    name: "n".into(),
                    full_text: "t".into(),
                    url: None,
                },
                supporting_laws: vec![],
                case_law: vec![],
            },
            exceptions: vec![],
            definitions: vec![],
            suggested_questions: vec![],
        }
    }

    fn classifier_with_topics(keys: &[&str]) -> Classifier {
        let data = KnowledgeData {
            topics: keys.iter().map(|k| topic(k)).collect(),
            ..Default::default()
        };
        Classifier::new(Arc::new(KnowledgeBase::from_data(data).unwrap()))
    }

    #[test]
    fn extract_all_three_forms() {
        assert_eq!(CodedSectionMatcher::extract("what is section 420 ipc?"), vec!["420"]);
        assert_eq!(CodedSectionMatcher::extract("explain ipc 302"), vec!["302"]);
        assert_eq!(CodedSectionMatcher::extract("376 IPC punishment"), vec!["376"]);
        assert_eq!(CodedSectionMatcher::extract("Section420"), vec!["420"]);
        assert!(CodedSectionMatcher::extract("no numbers here").is_empty());
    }

    #[test]
    fn extract_multiple_in_order() {
        assert_eq!(
            CodedSectionMatcher::extract("section 999 or section 302"),
            vec!["999", "302"]
        );
    }

    #[test]
    fn section_420_is_coded_section() {
        let c = bundled().classify("What is Section 420 IPC?");
        assert_eq!(c.target, Some(MatchTarget::CodedSection("420".into())));
        assert_eq!(c.level, Level::Direct);
    }

    #[test]
    fn second_known_section_wins_over_unknown_first() {
        let c = bundled().classify("section 999 or section 302");
        assert_eq!(c.target, Some(MatchTarget::CodedSection("302".into())));
    }

    #[test]
    fn section_beats_keyword() {
        // "notice" would hit the eviction topic if keywords ran first.
        let c = bundled().classify("notice under section 420");
        assert_eq!(c.target, Some(MatchTarget::CodedSection("420".into())));
    }

    #[test]
    fn unknown_section_falls_through_to_keyword() {
        let c = bundled().classify("Does section 999 cover rude remarks?");
        assert_eq!(c.target, Some(MatchTarget::Topic("rude behavior".into())));
    }

    #[test]
    fn unknown_section_without_keyword_is_fallback() {
        let c = bundled().classify("section 12345678901234567890");
        assert_eq!(c.target, None);
        assert_eq!(c.level, Level::Fallback);
    }

    #[test]
    fn eviction_query() {
        let q = "Can my landlord evict me without notice?";
        let c = bundled().classify(q);
        assert_eq!(c.target, Some(MatchTarget::Topic("eviction notice".into())));
        assert!(c.scenario_described);
        assert_eq!(c.query, q);
    }

    #[test]
    fn rude_query() {
        let c = bundled().classify("Someone talks rude to me, can I charge them a legal case?");
        assert_eq!(c.target, Some(MatchTarget::Topic("rude behavior".into())));
        assert!(c.scenario_described);
    }

    #[test]
    fn every_key_word_matches_its_topic() {
        let clf = bundled();
        for (word, key) in [
            ("rude", "rude behavior"),
            ("behavior", "rude behavior"),
            ("eviction", "eviction notice"),
            ("notice", "eviction notice"),
        ] {
            let c = clf.classify(&format!("tell me about {word} please"));
            assert_eq!(c.target, Some(MatchTarget::Topic(key.into())), "word {word}");
        }
    }

    #[test]
    fn keyword_matches_as_substring() {
        let c = bundled().classify("They were RUDELY dismissive");
        assert_eq!(c.target, Some(MatchTarget::Topic("rude behavior".into())));
    }

    #[test]
    fn first_registered_topic_wins() {
        let clf = classifier_with_topics(&["late rent", "rent increase"]);
        let c = clf.classify("my rent is late");
        assert_eq!(c.target, Some(MatchTarget::Topic("late rent".into())));

        let clf = classifier_with_topics(&["rent increase", "late rent"]);
        let c = clf.classify("my rent is late");
        assert_eq!(c.target, Some(MatchTarget::Topic("rent increase".into())));
    }

    #[test]
    fn concept_matches_whole_words() {
        let clf = bundled();
        let c = clf.classify("How do I get anticipatory bail?");
        assert_eq!(c.target, Some(MatchTarget::Concept("anticipatory bail".into())));

        let c = clf.classify("what is a writ");
        assert_eq!(c.target, Some(MatchTarget::Concept("writ".into())));
    }

    #[test]
    fn written_is_not_writ() {
        let c = bundled().classify("Is a written agreement binding?");
        assert_eq!(c.target, Some(MatchTarget::Guidance("contract basics".into())));
    }

    #[test]
    fn guidance_catches_tenant_questions() {
        let c = bundled().classify("What are my rights as a tenant in India?");
        assert_eq!(c.target, Some(MatchTarget::Guidance("tenant rights".into())));
    }

    #[test]
    fn pronoun_inside_word_sets_flag() {
        let c = bundled().classify("What is the notice period for eviction?");
        assert_eq!(c.target, Some(MatchTarget::Topic("eviction notice".into())));
        assert!(c.scenario_described);
    }

    #[test]
    fn gibberish_is_fallback() {
        let c = bundled().classify("xyz123 unrelated gibberish");
        assert!(!c.is_match());
        assert_eq!(c.level, Level::Fallback);
        assert!(!c.scenario_described);
    }

    #[test]
    fn scenario_flag_does_not_change_target() {
        let clf = bundled();
        let plain = clf.classify("eviction rules");
        let personal = clf.classify("my eviction rules");
        assert_eq!(plain.target, personal.target);
        assert!(!plain.scenario_described);
        assert!(personal.scenario_described);
    }

    #[test]
    fn custom_matcher_order() {
        let kb: Arc<dyn KnowledgeSource> = Arc::new(KnowledgeBase::bundled().unwrap());
        let clf = Classifier::with_matchers(
            kb,
            vec![Box::new(TopicKeywordMatcher), Box::new(CodedSectionMatcher)],
        );
        let c = clf.classify("notice under section 420");
        assert_eq!(c.target, Some(MatchTarget::Topic("eviction notice".into())));
        assert_eq!(clf.matcher_names(), vec!["topic_keyword", "coded_section"]);
    }

    #[test]
    fn default_order_is_documented_order() {
        assert_eq!(
            bundled().matcher_names(),
            vec!["coded_section", "topic_keyword", "concept", "guidance"]
        );
    }
}
