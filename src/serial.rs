//! Binary serialization and deserialization of resolved catalogs.
//!
//! Building a [`Catalog`](crate::Catalog) from a large object snapshot means
//! parsing JSON and flattening every group. This module persists the result in
//! a stable binary format: a 32-byte fixed header followed by a
//! bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RVCT"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.
//!
//! ## Staleness
//!
//! When a source text is supplied at encode time its full BLAKE3 digest is
//! stored in the payload metadata. [`source_matches`] compares it against a
//! fresh snapshot without rebuilding anything.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Catalog, Diagnostic, Group, MemberCategory, ObjectKind, ResolvedObject};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"RVCT";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`Catalog`](crate::Catalog) to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode catalog: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a [`Catalog`](crate::Catalog) from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a ruleview catalog: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedCatalog {
    metadata: CatalogMetadata,
    objects: Vec<(String, SerializedObject)>,
    diagnostics: Vec<SerializedDiagnostic>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogMetadata {
    object_count: usize,
    group_count: usize,
    diagnostic_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedObject {
    Host { name: String, address: String },
    Network { name: String, cidr: String },
    Service { name: String, descriptor: String },
    Range { name: String, bounds: String },
    Action { name: String },
    Other { name: String, value: String },
    Group {
        category: SerializedCategory,
        name: String,
        members: Vec<SerializedObject>,
    },
    Unresolved { uid: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum SerializedCategory {
    Network,
    Service,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedDiagnostic {
    IncompatibleGroupMember {
        group: String,
        category: SerializedCategory,
        member: String,
        /// Raw type name; empty for untyped records.
        kind: String,
    },
    CircularGroupReference { path: Vec<String> },
    DuplicateUid { uid: String },
}

// ---------------------------------------------------------------------------
// Category conversion
// ---------------------------------------------------------------------------

fn serialize_category(category: MemberCategory) -> SerializedCategory {
    match category {
        MemberCategory::Network => SerializedCategory::Network,
        MemberCategory::Service => SerializedCategory::Service,
    }
}

fn deserialize_category(category: SerializedCategory) -> MemberCategory {
    match category {
        SerializedCategory::Network => MemberCategory::Network,
        SerializedCategory::Service => MemberCategory::Service,
    }
}

// ---------------------------------------------------------------------------
// Object conversion
// ---------------------------------------------------------------------------

fn serialize_object(object: &ResolvedObject) -> SerializedObject {
    match object {
        ResolvedObject::Host { name, address } => SerializedObject::Host {
            name: name.clone(),
            address: address.clone(),
        },
        ResolvedObject::Network { name, cidr } => SerializedObject::Network {
            name: name.clone(),
            cidr: cidr.clone(),
        },
        ResolvedObject::Service { name, descriptor } => SerializedObject::Service {
            name: name.clone(),
            descriptor: descriptor.clone(),
        },
        ResolvedObject::Range { name, bounds } => SerializedObject::Range {
            name: name.clone(),
            bounds: bounds.clone(),
        },
        ResolvedObject::Action { name } => SerializedObject::Action { name: name.clone() },
        ResolvedObject::Other { name, value } => SerializedObject::Other {
            name: name.clone(),
            value: value.clone(),
        },
        ResolvedObject::Group(group) => SerializedObject::Group {
            category: serialize_category(group.category),
            name: group.name.clone(),
            members: group.members.iter().map(serialize_object).collect(),
        },
        ResolvedObject::Unresolved { uid } => SerializedObject::Unresolved { uid: uid.clone() },
    }
}

fn deserialize_object(object: SerializedObject) -> ResolvedObject {
    match object {
        SerializedObject::Host { name, address } => ResolvedObject::Host { name, address },
        SerializedObject::Network { name, cidr } => ResolvedObject::Network { name, cidr },
        SerializedObject::Service { name, descriptor } => {
            ResolvedObject::Service { name, descriptor }
        }
        SerializedObject::Range { name, bounds } => ResolvedObject::Range { name, bounds },
        SerializedObject::Action { name } => ResolvedObject::Action { name },
        SerializedObject::Other { name, value } => ResolvedObject::Other { name, value },
        SerializedObject::Group {
            category,
            name,
            members,
        } => ResolvedObject::Group(Group {
            category: deserialize_category(category),
            name,
            members: members.into_iter().map(deserialize_object).collect(),
        }),
        SerializedObject::Unresolved { uid } => ResolvedObject::Unresolved { uid },
    }
}

// ---------------------------------------------------------------------------
// Diagnostic conversion
// ---------------------------------------------------------------------------

fn kind_name(kind: &ObjectKind) -> String {
    match kind {
        ObjectKind::Unknown(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn serialize_diagnostic(diagnostic: &Diagnostic) -> SerializedDiagnostic {
    match diagnostic {
        Diagnostic::IncompatibleGroupMember {
            group,
            category,
            member,
            kind,
        } => SerializedDiagnostic::IncompatibleGroupMember {
            group: group.clone(),
            category: serialize_category(*category),
            member: member.clone(),
            kind: kind_name(kind),
        },
        Diagnostic::CircularGroupReference { path } => {
            SerializedDiagnostic::CircularGroupReference { path: path.clone() }
        }
        Diagnostic::DuplicateUid { uid } => SerializedDiagnostic::DuplicateUid { uid: uid.clone() },
    }
}

fn deserialize_diagnostic(diagnostic: SerializedDiagnostic) -> Diagnostic {
    match diagnostic {
        SerializedDiagnostic::IncompatibleGroupMember {
            group,
            category,
            member,
            kind,
        } => Diagnostic::IncompatibleGroupMember {
            group,
            category: deserialize_category(category),
            member,
            kind: ObjectKind::parse(&kind),
        },
        SerializedDiagnostic::CircularGroupReference { path } => {
            Diagnostic::CircularGroupReference { path }
        }
        SerializedDiagnostic::DuplicateUid { uid } => Diagnostic::DuplicateUid { uid },
    }
}

// ---------------------------------------------------------------------------
// Catalog -> SerializedCatalog
// ---------------------------------------------------------------------------

fn catalog_to_serialized(catalog: &Catalog, source_text: Option<&str>) -> SerializedCatalog {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    // Sort by uid for deterministic output
    let mut objects: Vec<(String, SerializedObject)> = catalog
        .iter()
        .map(|(uid, object)| (uid.to_owned(), serialize_object(object)))
        .collect();
    objects.sort_by(|(a, _), (b, _)| a.cmp(b));

    SerializedCatalog {
        metadata: CatalogMetadata {
            object_count: catalog.len(),
            group_count: catalog.group_count(),
            diagnostic_count: catalog.diagnostics().len(),
            source_digest,
        },
        objects,
        diagnostics: catalog.diagnostics().iter().map(serialize_diagnostic).collect(),
    }
}

// ---------------------------------------------------------------------------
// SerializedCatalog -> Catalog
// ---------------------------------------------------------------------------

fn serialized_to_catalog(ser: SerializedCatalog) -> Result<Catalog, DeserializeError> {
    validate(&ser)?;

    let objects: HashMap<String, ResolvedObject> = ser
        .objects
        .into_iter()
        .map(|(uid, object)| (uid, deserialize_object(object)))
        .collect();
    let diagnostics = ser
        .diagnostics
        .into_iter()
        .map(deserialize_diagnostic)
        .collect();

    Ok(Catalog {
        objects,
        diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedCatalog) -> Result<(), DeserializeError> {
    // Metadata consistency
    if ser.metadata.object_count != ser.objects.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} objects but payload has {}",
            ser.metadata.object_count,
            ser.objects.len()
        )));
    }
    let group_count = ser
        .objects
        .iter()
        .filter(|(_, o)| matches!(o, SerializedObject::Group { .. }))
        .count();
    if ser.metadata.group_count != group_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} groups but payload has {}",
            ser.metadata.group_count, group_count
        )));
    }
    if ser.metadata.diagnostic_count != ser.diagnostics.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} diagnostics but payload has {}",
            ser.metadata.diagnostic_count,
            ser.diagnostics.len()
        )));
    }

    let mut seen = HashSet::with_capacity(ser.objects.len());
    for (uid, object) in &ser.objects {
        if !seen.insert(uid.as_str()) {
            return Err(DeserializeError::Validation(format!(
                "uid '{uid}' appears more than once"
            )));
        }
        validate_object(uid, object)?;
    }

    for diagnostic in &ser.diagnostics {
        if let SerializedDiagnostic::CircularGroupReference { path } = diagnostic {
            if path.len() < 2 || path.first() != path.last() {
                return Err(DeserializeError::Validation(format!(
                    "circular reference path {path:?} does not close"
                )));
            }
        }
    }

    Ok(())
}

fn validate_object(uid: &str, object: &SerializedObject) -> Result<(), DeserializeError> {
    match object {
        SerializedObject::Group { members, .. } => {
            if members
                .iter()
                .any(|m| matches!(m, SerializedObject::Group { .. }))
            {
                return Err(DeserializeError::Validation(format!(
                    "group '{uid}' has a nested group member"
                )));
            }
            Ok(())
        }
        SerializedObject::Unresolved { .. } => Err(DeserializeError::Validation(format!(
            "catalog entry '{uid}' is an unresolved placeholder"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

/// Check the header and checksum, returning the verified payload.
fn verified_payload(bytes: &[u8]) -> Result<&[u8], DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }
    Ok(payload)
}

fn decode_payload(bytes: &[u8]) -> Result<SerializedCatalog, DeserializeError> {
    let payload = verified_payload(bytes)?;
    let (serialized, _): (SerializedCatalog, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(serialized)
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(
    catalog: &Catalog,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = catalog_to_serialized(catalog, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Catalog, DeserializeError> {
    serialized_to_catalog(decode_payload(bytes)?)
}

/// Whether `bytes` was encoded with exactly `source_text` as its source.
/// Blobs encoded without a source never match.
pub(crate) fn source_matches(bytes: &[u8], source_text: &str) -> Result<bool, DeserializeError> {
    let serialized = decode_payload(bytes)?;
    let digest = *blake3::hash(source_text.as_bytes()).as_bytes();
    Ok(serialized.metadata.source_digest == Some(digest))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(object_count: usize, group_count: usize) -> CatalogMetadata {
        CatalogMetadata {
            object_count,
            group_count,
            diagnostic_count: 0,
            source_digest: None,
        }
    }

    fn host(name: &str) -> SerializedObject {
        SerializedObject::Host {
            name: name.to_owned(),
            address: "10.0.0.1".to_owned(),
        }
    }

    // -- Object conversion --

    #[test]
    fn group_conversion_keeps_members() {
        let group = ResolvedObject::Group(Group {
            category: MemberCategory::Service,
            name: "web".into(),
            members: vec![
                ResolvedObject::Service {
                    name: "https".into(),
                    descriptor: "TCP 443".into(),
                },
                ResolvedObject::Unresolved { uid: "gone".into() },
            ],
        });
        assert_eq!(deserialize_object(serialize_object(&group)), group);
    }

    #[test]
    fn untyped_kind_survives_conversion() {
        let d = Diagnostic::IncompatibleGroupMember {
            group: "g".into(),
            category: MemberCategory::Network,
            member: "m".into(),
            kind: ObjectKind::Unknown(String::new()),
        };
        assert_eq!(deserialize_diagnostic(serialize_diagnostic(&d)), d);

        let d = Diagnostic::IncompatibleGroupMember {
            group: "g".into(),
            category: MemberCategory::Service,
            member: "a".into(),
            kind: ObjectKind::RulebaseAction,
        };
        assert_eq!(deserialize_diagnostic(serialize_diagnostic(&d)), d);
    }

    // -- Header round-trip --

    #[test]
    fn header_round_trip() {
        let payload = b"test payload data";
        let mut buf = Vec::new();
        write_header(&mut buf, payload);
        assert_eq!(buf.len(), HEADER_SIZE);

        let (format_version, payload_len, hash) = read_header(&buf).unwrap();
        assert_eq!(format_version, FORMAT_VERSION);
        assert_eq!(payload_len as usize, payload.len());

        let expected_hash = blake3::hash(payload);
        assert_eq!(&hash, &expected_hash.as_bytes()[..16]);
    }

    #[test]
    fn header_bad_magic() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"OORO");
        assert!(matches!(read_header(&buf), Err(DeserializeError::BadMagic)));
    }

    #[test]
    fn header_too_short() {
        let buf = vec![0u8; 10];
        assert!(matches!(
            read_header(&buf),
            Err(DeserializeError::LengthMismatch { .. })
        ));
    }

    // -- Validation --

    #[test]
    fn validate_nested_group_rejected() {
        let nested = SerializedObject::Group {
            category: SerializedCategory::Network,
            name: "inner".into(),
            members: vec![host("h")],
        };
        let ser = SerializedCatalog {
            metadata: metadata(1, 1),
            objects: vec![(
                "outer".into(),
                SerializedObject::Group {
                    category: SerializedCategory::Network,
                    name: "outer".into(),
                    members: vec![nested],
                },
            )],
            diagnostics: vec![],
        };
        assert!(matches!(validate(&ser), Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn validate_count_mismatch_rejected() {
        let ser = SerializedCatalog {
            metadata: metadata(2, 0),
            objects: vec![("h".into(), host("h"))],
            diagnostics: vec![],
        };
        assert!(matches!(validate(&ser), Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn validate_duplicate_uid_rejected() {
        let ser = SerializedCatalog {
            metadata: metadata(2, 0),
            objects: vec![("h".into(), host("a")), ("h".into(), host("b"))],
            diagnostics: vec![],
        };
        assert!(matches!(validate(&ser), Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn validate_top_level_unresolved_rejected() {
        let ser = SerializedCatalog {
            metadata: metadata(1, 0),
            objects: vec![("x".into(), SerializedObject::Unresolved { uid: "x".into() })],
            diagnostics: vec![],
        };
        assert!(matches!(validate(&ser), Err(DeserializeError::Validation(_))));
    }

    #[test]
    fn validate_open_cycle_path_rejected() {
        let ser = SerializedCatalog {
            metadata: CatalogMetadata {
                diagnostic_count: 1,
                ..metadata(0, 0)
            },
            objects: vec![],
            diagnostics: vec![SerializedDiagnostic::CircularGroupReference {
                path: vec!["a".into(), "b".into()],
            }],
        };
        assert!(matches!(validate(&ser), Err(DeserializeError::Validation(_))));
    }
}
