pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Tree node id must not be empty (label: {label:?})")]
    EmptyNodeId { label: String },

    #[error("Duplicate tree node id: {id}")]
    DuplicateNodeId { id: String },

    #[error("Unknown chapter: {id}")]
    UnknownChapter { id: String },

    #[error("Unsupported language code: {code}")]
    UnsupportedLanguage { code: String },

    #[error("Bundled asset {name} is invalid: {source}")]
    Asset {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration ({origin}): {message}")]
    Config { origin: String, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
