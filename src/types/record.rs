use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::kind::ObjectKind;

/// One raw object record from an object snapshot.
///
/// Only `uid` and `type` are common to every record; the remaining fields
/// are type-specific and optional. Scalar fields accept JSON strings, numbers
/// and booleans, since management exports are inconsistent about quoting ports
/// and ICMP types.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObjectRecord {
    #[serde(deserialize_with = "scalar")]
    pub uid: Option<String>,
    #[serde(rename = "type", deserialize_with = "scalar")]
    pub type_name: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub comments: Option<String>,
    #[serde(rename = "ipv4-address", deserialize_with = "scalar")]
    pub address: Option<String>,
    #[serde(rename = "subnet4", deserialize_with = "scalar")]
    pub subnet: Option<String>,
    #[serde(rename = "mask-length4", deserialize_with = "scalar")]
    pub mask_length: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub port: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub protocol: Option<String>,
    #[serde(rename = "icmp-type", deserialize_with = "scalar")]
    pub icmp_type: Option<String>,
    #[serde(rename = "range-start", deserialize_with = "scalar")]
    pub range_start: Option<String>,
    #[serde(rename = "range-end", deserialize_with = "scalar")]
    pub range_end: Option<String>,
    #[serde(deserialize_with = "member_uids")]
    pub members: Vec<String>,
}

impl ObjectRecord {
    /// Start a record with the given uid and raw type string.
    #[must_use]
    pub fn new(uid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_subnet(
        mut self,
        subnet: impl Into<String>,
        mask_length: impl Into<String>,
    ) -> Self {
        self.subnet = Some(subnet.into());
        self.mask_length = Some(mask_length.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    #[must_use]
    pub fn with_icmp_type(mut self, icmp_type: impl Into<String>) -> Self {
        self.icmp_type = Some(icmp_type.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.range_start = Some(start.into());
        self.range_end = Some(end.into());
        self
    }

    #[must_use]
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// The record's uid, treating an empty string as absent.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref().filter(|uid| !uid.is_empty())
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        ObjectKind::parse(self.type_name.as_deref().unwrap_or_default())
    }

    /// Display name: the `name` field, or the uid when the record is unnamed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.uid.as_deref())
            .unwrap_or_default()
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| scalar_text(&v)))
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Members are usually bare uid strings, but expanded exports inline each
/// member as an object carrying its own `uid`. An inline member without a uid
/// keeps its name, which later renders as an unresolved reference.
fn member_uids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<JsonValue>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .iter()
        .enumerate()
        .filter_map(|(position, v)| {
            let token = match v {
                JsonValue::Object(map) => map
                    .get("uid")
                    .and_then(scalar_text)
                    .or_else(|| map.get("name").and_then(scalar_text)),
                other => scalar_text(other),
            };
            if token.is_none() {
                debug!(position, member = %v, "dropping group member without uid or name");
            }
            token
        })
        .collect())
}
