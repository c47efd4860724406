use thiserror::Error;

/// The object snapshot could not be read as a list of records.
///
/// Always fatal: no catalog is built from a malformed snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("object snapshot is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("object snapshot must be a list of records or an object with an 'objects' list, found {found}")]
    UnexpectedShape { found: &'static str },

    #[error("object record {index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
#[error("invalid resolver config: {0}")]
pub struct ConfigError(#[from] serde_json::Error);
