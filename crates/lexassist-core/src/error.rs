use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} key: {key}")]
    Duplicate { kind: &'static str, key: String },

    #[error("scenario '{0}' has no matching topic")]
    OrphanScenario(String),

    #[error("{kind} '{key}' has empty field '{field}'")]
    EmptyField {
        kind: &'static str,
        key: String,
        field: &'static str,
    },

    #[error("topic key '{0}' must be lowercase")]
    KeyNotLowercase(String),

    #[error("section number '{0}' must be all digits")]
    InvalidSectionNumber(String),
}
