use thiserror::Error;

use crate::{ConfigError, SnapshotError, TableError};

/// Unified error type covering snapshot, rule table and configuration
/// loading, plus I/O.
///
/// Returned by convenience methods like
/// [`Catalog::from_file()`](crate::Catalog::from_file) and
/// [`RuleTable::from_file()`](crate::RuleTable::from_file).
#[derive(Debug, Error)]
pub enum RuleviewError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
