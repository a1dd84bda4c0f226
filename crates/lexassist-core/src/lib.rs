//! Core types for lexassist: knowledge records, the knowledge base and the
//! structured response handed to callers.

pub mod entry;
pub mod error;
pub mod knowledge;
pub mod normalize;
pub mod response;

pub use entry::{
    CaseLaw, CodedSection, Concept, Definition, GuidanceNote, LegalException, LegalReference,
    PrimaryLaw, ScenarioTemplate, SupportingLaw, TopicEntry,
};
pub use error::KnowledgeError;
pub use knowledge::{KnowledgeBase, KnowledgeData, KnowledgeSource, KnowledgeSummary};
pub use normalize::{contains_phrase, normalize_query, words};
pub use response::{Confidence, Level, Response, ResponseKind, Scenario};
