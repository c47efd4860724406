mod cell;
mod config;
mod diagnostic;
mod error;
mod kind;
mod record;
mod resolved;
mod rule;

pub use cell::{Cell, MemberValue, Reference, ValueStyle, EMPTY_MARKER, SIMPLE_SEPARATOR};
pub use config::{
    DetailLevel, FieldDelimiters, RefField, ResolverConfig, ResolverConfigBuilder, ANY,
};
pub use diagnostic::Diagnostic;
pub use error::{ConfigError, SnapshotError};
pub use kind::{MemberCategory, ObjectKind};
pub use record::ObjectRecord;
pub use resolved::{Group, ResolvedObject};
pub use rule::{FieldView, RuleRecord, RuleView};
