//! Query understanding: rule-based classification and scenario generation.

pub mod classifier;
pub mod markers;
pub mod scenario;

pub use classifier::{
    Classification, Classifier, CodedSectionMatcher, ConceptMatcher, GuidanceMatcher,
    MatchTarget, Matcher, QueryText, TopicKeywordMatcher, default_matchers,
};
pub use markers::{SCENARIO_MARKERS, describes_scenario};
