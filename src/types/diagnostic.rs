use std::fmt;

use super::kind::{MemberCategory, ObjectKind};

/// A non-fatal finding recorded while building a [`Catalog`](crate::Catalog).
///
/// Diagnostics never stop the build. They are also emitted through `tracing`
/// as they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A group member whose kind does not belong in the group's category.
    /// The member was excluded from the flattened membership.
    IncompatibleGroupMember {
        group: String,
        category: MemberCategory,
        member: String,
        kind: ObjectKind,
    },
    /// Expansion re-entered a group already on the active path. The path
    /// starts and ends with the repeated group uid.
    CircularGroupReference { path: Vec<String> },
    /// A later record reused a uid; the first record was kept.
    DuplicateUid { uid: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IncompatibleGroupMember {
                group,
                category,
                member,
                kind,
            } => write!(
                f,
                "invalid member '{member}' ({kind}) in {category} group '{group}'"
            ),
            Diagnostic::CircularGroupReference { path } => {
                write!(f, "circular group reference: {}", path.join(" -> "))
            }
            Diagnostic::DuplicateUid { uid } => {
                write!(f, "duplicate uid '{uid}'; keeping the first record")
            }
        }
    }
}
