use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown chromosome: {0}")]
    UnknownChromosome(String),

    #[error("Condition index {index} out of range ({len} conditions)")]
    ConditionOutOfRange { index: usize, len: usize },

    #[error("Npy storage requires a cache directory")]
    CacheDirRequired,

    #[error("Cache manifest at {path} does not match the requested array: {reason}")]
    ManifestMismatch { path: String, reason: String },

    #[error("Can't read npy track: {0}")]
    NpyRead(String),

    #[error("Can't write npy track: {0}")]
    NpyWrite(String),

    #[error(transparent)]
    Manifest(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
