//! Resolve firewall policy objects and render rule tables against them.
//!
//! An object snapshot is classified and flattened once into an immutable
//! [`Catalog`]. Rule rows from a [`RuleTable`] are then normalized into
//! [`RuleView`]s, with every uid reference replaced by a simple and a
//! detailed rendering.
//!
//! ```
//! use ruleview::{Catalog, ResolverConfig, RuleTable};
//!
//! let catalog = Catalog::from_json(r#"[
//!     { "uid": "h1", "type": "host", "name": "web1", "ipv4-address": "10.0.0.1" },
//!     { "uid": "s1", "type": "service-tcp", "name": "https", "port": 443 },
//!     { "uid": "g1", "type": "group", "name": "servers", "members": ["h1"] }
//! ]"#).unwrap();
//!
//! let table = RuleTable::from_csv(
//!     "RuleNo,Source,Destination,Service,Action\n1,ANY,g1,s1,accept\n",
//! ).unwrap();
//! let views = table.views(&catalog, &ResolverConfig::default());
//!
//! assert_eq!(views[0].destination.detailed.to_string(), "servers\n  10.0.0.1");
//! assert_eq!(views[0].service.simple.to_string(), "https");
//! ```

mod catalog;
mod classify;
mod error;
mod normalize;
mod resolve;
mod snapshot;
mod table;
mod translate;
mod types;

#[cfg(feature = "binary-cache")]
pub mod serial;

pub use catalog::Catalog;
pub use classify::{classify, Classification};
pub use error::RuleviewError;
pub use normalize::{normalize, normalize_all};
pub use resolve::flatten_group;
pub use snapshot::parse_objects;
pub use table::{RuleTable, TableError};
pub use translate::{split_tokens, Translator};
pub use types::{
    Cell, ConfigError, DetailLevel, Diagnostic, FieldDelimiters, FieldView, Group, MemberCategory,
    MemberValue, ObjectKind, ObjectRecord, RefField, Reference, ResolvedObject, ResolverConfig,
    ResolverConfigBuilder, RuleRecord, RuleView, SnapshotError, ValueStyle, ANY, EMPTY_MARKER,
    SIMPLE_SEPARATOR,
};
