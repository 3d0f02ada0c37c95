use fixmyroad_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a key in the backend failed.
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A domain rule rejected the write.
    #[error(transparent)]
    Core(#[from] CoreError),
}
