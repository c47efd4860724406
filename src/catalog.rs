use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::resolve::ObjectIndex;
use crate::{Diagnostic, Group, ObjectRecord, ResolvedObject};

/// The resolved uid → object mapping for one object snapshot.
///
/// Built once, in two passes: leaves are classified first, then every group
/// is flattened against the completed leaf set. A built catalog is immutable
/// and can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use ruleview::{Catalog, ObjectRecord};
///
/// let catalog = Catalog::build(&[
///     ObjectRecord::new("h1", "host").with_name("web1").with_address("10.0.0.1"),
///     ObjectRecord::new("n1", "network").with_name("lan").with_subnet("10.0.0.0", "24"),
///     ObjectRecord::new("g1", "group").with_name("servers").with_members(["h1", "n1"]),
/// ]);
///
/// assert_eq!(catalog.len(), 3);
/// let group = catalog.get("g1").and_then(|o| o.as_group()).unwrap();
/// assert_eq!(group.values().collect::<Vec<_>>(), vec!["10.0.0.1", "10.0.0.0/24"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub(crate) objects: HashMap<String, ResolvedObject>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Catalog {
    /// Build a catalog from raw records.
    ///
    /// Records without a uid are skipped. When a uid repeats, the first record
    /// wins and a [`Diagnostic::DuplicateUid`] is recorded.
    #[must_use]
    pub fn build(records: &[ObjectRecord]) -> Self {
        let _span = tracing::debug_span!("catalog_build", records = records.len()).entered();

        let index = ObjectIndex::build(records);
        let mut diagnostics = index.diagnostics.clone();

        let mut groups = Vec::with_capacity(index.groups.len());
        for &(uid, record, category) in &index.groups {
            let expansion = index.flatten(record, category);
            for diagnostic in expansion.diagnostics {
                if !diagnostics.contains(&diagnostic) {
                    diagnostics.push(diagnostic);
                }
            }
            groups.push((
                uid.to_owned(),
                ResolvedObject::Group(Group {
                    category,
                    name: record.display_name().to_owned(),
                    members: expansion.members,
                }),
            ));
        }

        let mut objects: HashMap<String, ResolvedObject> = index
            .leaves
            .into_iter()
            .map(|(uid, obj)| (uid.to_owned(), obj))
            .collect();
        objects.extend(groups);

        debug!(
            objects = objects.len(),
            diagnostics = diagnostics.len(),
            "catalog built"
        );
        Self {
            objects,
            diagnostics,
        }
    }

    /// Parse an object snapshot and build a catalog from it.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`](crate::SnapshotError) if the snapshot is malformed.
    pub fn from_json(input: &str) -> Result<Self, crate::SnapshotError> {
        let records = crate::snapshot::parse_objects(input)?;
        Ok(Self::build(&records))
    }

    /// Read an object snapshot file and build a catalog from it.
    ///
    /// # Errors
    ///
    /// Returns [`RuleviewError`](crate::RuleviewError) on I/O or snapshot failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RuleviewError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    #[must_use]
    pub fn get(&self, uid: &str) -> Option<&ResolvedObject> {
        self.objects.get(uid)
    }

    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.objects.contains_key(uid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of group entries.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.objects.values().filter(|o| o.as_group().is_some()).count()
    }

    /// Iterate over all (uid, object) entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedObject)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Findings recorded during the build, in the order they occurred.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog({} objects, {} groups)",
            self.len(),
            self.group_count()
        )
    }
}

#[cfg(feature = "binary-cache")]
impl Catalog {
    /// Serialize this catalog to a byte vector.
    ///
    /// The optional `source_text` (typically the object snapshot) is hashed
    /// with BLAKE3 and embedded, so a stale cache can be detected with
    /// [`cache_matches`](Self::cache_matches).
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Restore a catalog from bytes produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Whether a cached blob was built from exactly `source_text`.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) if the
    /// blob itself is unreadable.
    pub fn cache_matches(
        bytes: &[u8],
        source_text: &str,
    ) -> Result<bool, crate::serial::DeserializeError> {
        crate::serial::source_matches(bytes, source_text)
    }

    /// Serialize this catalog and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and restore the catalog it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
