/// Errors surfaced by the prosody engine.
///
/// Checking and ranking only ever fail with [`ProsodyError::UnknownForm`];
/// everything else comes from loading dictionaries, forms, or configuration.
#[derive(thiserror::Error, Debug)]
pub enum ProsodyError {
    #[error("Unknown form '{name}'. Available: {available}")]
    UnknownForm { name: String, available: String },
    #[error("Form '{0}' is built in and cannot be replaced")]
    BuiltinForm(String),
    #[error("Invalid form definition: {0}")]
    InvalidForm(String),
    #[error("Failed to parse pronunciation dictionary at line {line}: {reason}")]
    DictionaryParse { line: usize, reason: String },
    #[error("Invalid engine config: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
