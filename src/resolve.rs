use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::classify::{classify, Classification};
use crate::{Diagnostic, MemberCategory, ObjectRecord, ResolvedObject};

/// Pass-1 state: every record reachable by uid, plus the classified leaves.
pub(crate) struct ObjectIndex<'a> {
    records: HashMap<&'a str, &'a ObjectRecord>,
    pub(crate) leaves: HashMap<&'a str, ResolvedObject>,
    /// Groups in snapshot order, waiting for pass 2.
    pub(crate) groups: Vec<(&'a str, &'a ObjectRecord, MemberCategory)>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

/// The flattened membership of one group.
#[derive(Debug, Default)]
pub(crate) struct Expansion {
    pub(crate) members: Vec<ResolvedObject>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> ObjectIndex<'a> {
    pub(crate) fn build(records: &'a [ObjectRecord]) -> Self {
        let mut index = ObjectIndex {
            records: HashMap::with_capacity(records.len()),
            leaves: HashMap::with_capacity(records.len()),
            groups: Vec::new(),
            diagnostics: Vec::new(),
        };

        for (position, record) in records.iter().enumerate() {
            let Some(uid) = record.uid() else {
                debug!(position, "skipping object record without uid");
                continue;
            };
            if index.records.contains_key(uid) {
                warn!(uid, position, "duplicate object uid, keeping the first record");
                index
                    .diagnostics
                    .push(Diagnostic::DuplicateUid { uid: uid.to_owned() });
                continue;
            }
            index.records.insert(uid, record);

            match classify(record) {
                Classification::Leaf(obj) => {
                    index.leaves.insert(uid, obj);
                }
                Classification::Deferred(category) => index.groups.push((uid, record, category)),
                Classification::Skipped => {}
            }
        }

        index
    }

    /// Flatten one group's membership. The visited set is scoped to this call,
    /// so repeated calls are independent and yield identical results.
    pub(crate) fn flatten(&self, group: &'a ObjectRecord, category: MemberCategory) -> Expansion {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut out = Expansion::default();
        self.expand(group, category, &mut visited, &mut path, &mut out);
        out
    }

    fn expand(
        &self,
        group: &'a ObjectRecord,
        category: MemberCategory,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        out: &mut Expansion,
    ) {
        let Some(uid) = group.uid() else {
            return;
        };

        if !visited.insert(uid) {
            // Either a cycle back into the active path, or a group already
            // expanded through another branch. Both contribute nothing more.
            if let Some(pos) = path.iter().position(|&p| p == uid) {
                debug!(group = uid, "breaking circular group reference");
                out.diagnostics.push(Diagnostic::CircularGroupReference {
                    path: closed_cycle(&path[pos..]),
                });
            }
            return;
        }
        path.push(uid);

        for member_uid in &group.members {
            let Some(&member) = self.records.get(member_uid.as_str()) else {
                out.members.push(ResolvedObject::Unresolved {
                    uid: member_uid.clone(),
                });
                continue;
            };

            let kind = member.kind();
            if !kind.fits(category) {
                warn!(
                    group = group.display_name(),
                    member = member.display_name(),
                    %kind,
                    %category,
                    "excluding incompatible group member"
                );
                out.diagnostics.push(Diagnostic::IncompatibleGroupMember {
                    group: group.display_name().to_owned(),
                    category,
                    member: member.display_name().to_owned(),
                    kind,
                });
                continue;
            }

            match kind.group_category() {
                Some(nested) => self.expand(member, nested, visited, path, out),
                None => out.members.push(
                    self.leaves
                        .get(member_uid.as_str())
                        .cloned()
                        .unwrap_or_else(|| ResolvedObject::Unresolved {
                            uid: member_uid.clone(),
                        }),
                ),
            }
        }

        path.pop();
    }
}

/// Close a cycle for reporting. The ring is rotated to start at its smallest
/// uid, so every entry point into the same cycle reports the same path.
fn closed_cycle(ring: &[&str]) -> Vec<String> {
    let start = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, uid)| *uid)
        .map_or(0, |(i, _)| i);
    let mut cycle: Vec<String> = ring[start..]
        .iter()
        .chain(&ring[..start])
        .map(|&uid| uid.to_owned())
        .collect();
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}

/// Flatten the group with uid `group_uid` against `records`.
///
/// Returns `None` if no group record has that uid. Member order follows
/// declaration order, with nested groups spliced in place.
///
/// ```
/// use ruleview::{flatten_group, ObjectRecord};
///
/// let records = vec![
///     ObjectRecord::new("h1", "host").with_name("web1").with_address("10.0.0.1"),
///     ObjectRecord::new("inner", "group").with_members(["h1"]),
///     ObjectRecord::new("outer", "group").with_members(["inner", "missing"]),
/// ];
///
/// let members = flatten_group(&records, "outer").unwrap();
/// let values: Vec<_> = members.iter().filter_map(|m| m.value()).collect();
/// assert_eq!(values, vec!["10.0.0.1", "missing"]);
/// ```
#[must_use]
pub fn flatten_group(records: &[ObjectRecord], group_uid: &str) -> Option<Vec<ResolvedObject>> {
    let index = ObjectIndex::build(records);
    let &(_, record, category) = index.groups.iter().find(|(uid, _, _)| *uid == group_uid)?;
    Some(index.flatten(record, category).members)
}
