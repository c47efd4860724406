use std::fmt;

use serde::Serialize;

use super::config::{DetailLevel, ANY};

/// Styling hint for a rendered value, so a presentation layer can colour
/// addresses and services differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueStyle {
    Address,
    Service,
    Other,
}

/// One expanded group member in a detailed rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberValue {
    Value { value: String, style: ValueStyle },
    Unresolved { uid: String },
}

/// The rendering of a single reference token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reference {
    /// A configured "match anything" sentinel.
    Any,
    /// A token with no catalog entry, kept verbatim.
    Unresolved { uid: String },
    /// A leaf object. `value` is only present in detailed renderings.
    Leaf {
        name: String,
        value: Option<String>,
        style: ValueStyle,
    },
    /// A group. `members` is only populated in detailed renderings.
    Group {
        name: String,
        members: Vec<MemberValue>,
    },
}

/// The translated content of one reference-bearing rule field.
///
/// An empty cell is distinct from a cell holding references: it means the
/// field named no references at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    detail: DetailLevel,
    refs: Vec<Reference>,
}

/// Separator between references in a simple rendering.
pub const SIMPLE_SEPARATOR: &str = ", ";

/// Placeholder text of an empty cell.
pub const EMPTY_MARKER: &str = "-";

impl Cell {
    #[must_use]
    pub fn empty(detail: DetailLevel) -> Self {
        Self {
            detail,
            refs: Vec::new(),
        }
    }

    pub(crate) fn new(detail: DetailLevel, refs: Vec<Reference>) -> Self {
        Self { detail, refs }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    #[must_use]
    pub fn detail(&self) -> DetailLevel {
        self.detail
    }

    #[must_use]
    pub fn refs(&self) -> &[Reference] {
        &self.refs
    }

    /// Uids that did not resolve, including unresolved group members.
    #[must_use]
    pub fn unresolved(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for reference in &self.refs {
            match reference {
                Reference::Unresolved { uid } => out.push(uid.as_str()),
                Reference::Group { members, .. } => {
                    out.extend(members.iter().filter_map(|m| match m {
                        MemberValue::Unresolved { uid } => Some(uid.as_str()),
                        MemberValue::Value { .. } => None,
                    }));
                }
                Reference::Any | Reference::Leaf { .. } => {}
            }
        }
        out
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Any => f.write_str(ANY),
            Reference::Unresolved { uid } => write!(f, "(unresolved) {uid}"),
            Reference::Leaf { name, value, .. } => {
                f.write_str(name)?;
                if let Some(value) = value {
                    write!(f, "\n  {value}")?;
                }
                Ok(())
            }
            Reference::Group { name, members } => {
                f.write_str(name)?;
                for member in members {
                    match member {
                        MemberValue::Value { value, .. } => write!(f, "\n  {value}")?,
                        MemberValue::Unresolved { uid } => write!(f, "\n  (unresolved) {uid}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Plain-text rendering: simple cells join references with
/// [`SIMPLE_SEPARATOR`], detailed cells put each reference on its own lines
/// with values indented beneath the name.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.refs.is_empty() {
            return f.write_str(EMPTY_MARKER);
        }
        let separator = match self.detail {
            DetailLevel::Simple => SIMPLE_SEPARATOR,
            DetailLevel::Detailed => "\n",
        };
        for (i, reference) in self.refs.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{reference}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, value: Option<&str>) -> Reference {
        Reference::Leaf {
            name: name.into(),
            value: value.map(str::to_owned),
            style: ValueStyle::Address,
        }
    }

    #[test]
    fn empty_cell_displays_marker() {
        let cell = Cell::empty(DetailLevel::Detailed);
        assert!(cell.is_empty());
        assert_eq!(cell.to_string(), "-");
    }

    #[test]
    fn simple_cell_joins_names() {
        let cell = Cell::new(
            DetailLevel::Simple,
            vec![
                leaf("web1", None),
                Reference::Any,
                Reference::Unresolved { uid: "beef".into() },
            ],
        );
        assert_eq!(cell.to_string(), "web1, ANY, (unresolved) beef");
    }

    #[test]
    fn detailed_cell_indents_values() {
        let cell = Cell::new(
            DetailLevel::Detailed,
            vec![
                leaf("web1", Some("10.0.0.1")),
                Reference::Group {
                    name: "dns".into(),
                    members: vec![
                        MemberValue::Value {
                            value: "UDP 53".into(),
                            style: ValueStyle::Service,
                        },
                        MemberValue::Unresolved { uid: "gone".into() },
                    ],
                },
            ],
        );
        assert_eq!(
            cell.to_string(),
            "web1\n  10.0.0.1\ndns\n  UDP 53\n  (unresolved) gone"
        );
    }

    #[test]
    fn unresolved_collects_members_too() {
        let cell = Cell::new(
            DetailLevel::Detailed,
            vec![
                Reference::Unresolved { uid: "a".into() },
                Reference::Group {
                    name: "g".into(),
                    members: vec![MemberValue::Unresolved { uid: "b".into() }],
                },
            ],
        );
        assert_eq!(cell.unresolved(), vec!["a", "b"]);
    }

    #[test]
    fn serializes_with_kind_tags() {
        let cell = Cell::new(DetailLevel::Simple, vec![Reference::Any]);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "detail": "simple", "refs": [{ "kind": "any" }] })
        );
    }
}
