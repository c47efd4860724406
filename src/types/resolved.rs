use std::fmt;

use super::kind::MemberCategory;

/// A catalog value: a classified leaf, a flattened group, or a placeholder for
/// a reference that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedObject {
    Host { name: String, address: String },
    Network { name: String, cidr: String },
    /// TCP, UDP, ICMP and other-protocol services.
    Service { name: String, descriptor: String },
    Range { name: String, bounds: String },
    Action { name: String },
    Other { name: String, value: String },
    Group(Group),
    Unresolved { uid: String },
}

/// A group whose membership has been flattened to leaves and placeholders.
///
/// `members` never contains a [`ResolvedObject::Group`]; nested groups are
/// spliced in at the position they were declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub category: MemberCategory,
    pub name: String,
    pub members: Vec<ResolvedObject>,
}

impl ResolvedObject {
    /// The display name. Unresolved placeholders display their uid.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ResolvedObject::Host { name, .. }
            | ResolvedObject::Network { name, .. }
            | ResolvedObject::Service { name, .. }
            | ResolvedObject::Range { name, .. }
            | ResolvedObject::Action { name }
            | ResolvedObject::Other { name, .. } => name.as_str(),
            ResolvedObject::Group(group) => group.name.as_str(),
            ResolvedObject::Unresolved { uid } => uid.as_str(),
        }
    }

    /// The underlying display value of a leaf. Groups have no single value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            ResolvedObject::Host { address: v, .. }
            | ResolvedObject::Network { cidr: v, .. }
            | ResolvedObject::Service { descriptor: v, .. }
            | ResolvedObject::Range { bounds: v, .. }
            | ResolvedObject::Other { value: v, .. }
            | ResolvedObject::Action { name: v }
            | ResolvedObject::Unresolved { uid: v } => Some(v.as_str()),
            ResolvedObject::Group(_) => None,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            ResolvedObject::Group(_) | ResolvedObject::Unresolved { .. }
        )
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            ResolvedObject::Group(group) => Some(group),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, ResolvedObject::Unresolved { .. })
    }
}

impl Group {
    /// Member values in membership order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.members.iter().filter_map(ResolvedObject::value)
    }
}

impl fmt::Display for ResolvedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedObject::Group(group) => write!(
                f,
                "{} ({} group, {} members)",
                group.name,
                group.category,
                group.members.len()
            ),
            ResolvedObject::Unresolved { uid } => write!(f, "(unresolved) {uid}"),
            ResolvedObject::Action { name } => f.write_str(name),
            leaf => write!(f, "{} [{}]", leaf.name(), leaf.value().unwrap_or_default()),
        }
    }
}
