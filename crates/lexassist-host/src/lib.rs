//! Query pipeline host: response assembly, response caching and the async
//! session that paces answers with simulated latency.

pub mod assembler;
pub mod config;
pub mod session;

pub use assembler::{Assembler, FALLBACK_ANSWER, Stage};
pub use config::AssistantConfig;
pub use session::{Assistant, SessionStats, SharedAssistant};
