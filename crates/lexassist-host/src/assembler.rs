//! Response assembly: classifier → knowledge lookup → scenario → cache.
//!
//! Per query the assembler moves through
//! `Idle → Classifying → CacheCheck → Searching → Found|NotFound → Cached`.
//! Blank input never leaves `Idle`. A cache hit jumps straight from
//! `CacheCheck` to `Cached`.

use std::sync::Arc;

use lexassist_ai::{Classification, Classifier, MatchTarget, scenario};
use lexassist_core::{Confidence, KnowledgeSource, Level, Response, ResponseKind};
use lexassist_store::{ResponseCache, cache_key};
use tracing::debug;

/// Simulated latency reported for direct matches.
pub const DIRECT_LATENCY_MS: u32 = 15;
/// Simulated latency reported for fallback answers.
pub const FALLBACK_LATENCY_MS: u32 = 45;
/// Simulated cost charged for a fallback answer.
pub const FALLBACK_COST: f64 = 0.0001;

pub const FALLBACK_ANSWER: &str = "This question requires deeper legal analysis. In a production system with full legal database, this would search thousands of statutes, regulations, and case precedents to provide a comprehensive answer.";

/// Pipeline position for the most recent query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Classifying,
    CacheCheck,
    Searching,
    Found,
    NotFound,
    Cached,
}

pub struct Assembler {
    classifier: Classifier,
    cache: ResponseCache,
    stage: Stage,
}

impl Assembler {
    pub fn new(kb: Arc<dyn KnowledgeSource>, cache: ResponseCache) -> Self {
        Self::with_classifier(Classifier::new(kb), cache)
    }

    pub fn with_classifier(classifier: Classifier, cache: ResponseCache) -> Self {
        Self {
            classifier,
            cache,
            stage: Stage::Idle,
        }
    }

    /// Answer a query synchronously, with no simulated delay.
    ///
    /// Returns `None` for blank input; nothing is classified or cached.
    pub fn assemble(&mut self, raw: &str) -> Option<Response> {
        let key = self.begin(raw)?;
        if let Some(hit) = self.check_cache(&key) {
            return Some(hit);
        }
        Some(self.search(raw, key))
    }

    /// Start a query: `Idle → Classifying`. Returns the cache key, or `None`
    /// (with no state change) for blank input.
    pub fn begin(&mut self, raw: &str) -> Option<String> {
        let key = cache_key(raw)?;
        self.transition(Stage::Classifying);
        Some(key)
    }

    /// `Classifying → CacheCheck`, then `→ Cached` on a hit.
    ///
    /// A hit is returned marked as a replay (`cached`, [`Level::Cached`]);
    /// the stored entry itself is left untouched.
    pub fn check_cache(&mut self, key: &str) -> Option<Response> {
        self.transition(Stage::CacheCheck);
        let hit = self.cache.get(key).cloned()?;
        self.transition(Stage::Cached);
        Some(hit.replayed())
    }

    /// `CacheCheck → Searching → Found|NotFound → Cached`: classify, build a
    /// fresh response and store it under `key`.
    pub fn search(&mut self, raw: &str, key: String) -> Response {
        self.transition(Stage::Searching);
        let classification = self.classifier.classify(raw);
        let response = self.build(&classification);
        self.transition(match response.level {
            Level::Fallback => Stage::NotFound,
            _ => Stage::Found,
        });
        self.cache.put(key, response.clone());
        self.transition(Stage::Cached);
        response
    }

    /// Build the response for a classification without touching the cache.
    pub fn build(&self, c: &Classification) -> Response {
        let kb = self.classifier.knowledge().as_ref();
        let built = match &c.target {
            Some(MatchTarget::Topic(key)) => kb.topic(key).map(|entry| {
                let mut r = direct(&c.query, ResponseKind::Topic);
                r.quick_answer = Some(entry.quick_answer.clone());
                r.comprehensive_answer = Some(entry.comprehensive_answer.clone());
                r.legal_reference = Some(entry.legal_reference.clone());
                r.exceptions = non_empty(&entry.exceptions);
                r.definitions = non_empty(&entry.definitions);
                r.scenario = scenario::generate(kb, Some(key), &c.query, c.scenario_described);
                r.suggested_questions = non_empty(&entry.suggested_questions);
                r
            }),
            Some(MatchTarget::CodedSection(number)) => kb.section(number).map(|section| {
                let mut r = direct(&c.query, ResponseKind::CodedSection);
                r.content = Some(section.render());
                r
            }),
            Some(MatchTarget::Concept(term)) => kb.concept(term).map(|concept| {
                let mut r = direct(&c.query, ResponseKind::Concept);
                r.content = Some(concept.render());
                r
            }),
            Some(MatchTarget::Guidance(id)) => kb.guidance_note(id).map(|note| {
                let mut r = direct(&c.query, ResponseKind::Guidance);
                r.content = Some(note.content.clone());
                r
            }),
            None => None,
        };
        built.unwrap_or_else(|| fallback(&c.query))
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn transition(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "pipeline stage");
        self.stage = next;
    }
}

fn direct(query: &str, kind: ResponseKind) -> Response {
    let mut r = Response::new(query, kind, Level::Direct);
    r.latency_ms = DIRECT_LATENCY_MS;
    r.confidence = Confidence::High;
    r
}

/// Empty lists are omitted from a response rather than sent as `[]`.
fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

fn fallback(query: &str) -> Response {
    let mut r = Response::new(query, ResponseKind::General, Level::Fallback);
    r.comprehensive_answer = Some(FALLBACK_ANSWER.to_string());
    r.cost = FALLBACK_COST;
    r.latency_ms = FALLBACK_LATENCY_MS;
    r.confidence = Confidence::Low;
    r
}
