use serde_json::{Map, Value};
use tracing::debug;

use super::TableError;
use crate::snapshot::describe;
use crate::{FieldDelimiters, RuleRecord};

/// Flatten an access rulebase document into rule rows.
///
/// Sections carry their own nested `rulebase` and are walked in order. Any
/// other entry without a `rule-number` is skipped.
pub(super) fn rules(
    input: &str,
    delimiters: &FieldDelimiters,
) -> Result<Vec<RuleRecord>, TableError> {
    let document: Value = serde_json::from_str(input).map_err(TableError::InvalidRulebase)?;
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("rulebase") {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(TableError::UnexpectedRulebaseShape {
                    found: describe(&other),
                })
            }
            None => {
                return Err(TableError::UnexpectedRulebaseShape {
                    found: "an object without a 'rulebase' key",
                })
            }
        },
        other => {
            return Err(TableError::UnexpectedRulebaseShape {
                found: describe(&other),
            })
        }
    };

    let mut out = Vec::new();
    collect(&entries, delimiters, &mut out);
    Ok(out)
}

fn collect(entries: &[Value], delimiters: &FieldDelimiters, out: &mut Vec<RuleRecord>) {
    for entry in entries {
        let Value::Object(entry) = entry else {
            continue;
        };
        if let Some(Value::Array(nested)) = entry.get("rulebase") {
            collect(nested, delimiters, out);
            continue;
        }
        let Some(rule_no) = entry.get("rule-number").and_then(scalar) else {
            let uid = entry.get("uid").and_then(serde_json::Value::as_str);
            debug!(uid, "skipping rulebase entry without rule-number");
            continue;
        };

        out.push(RuleRecord {
            rule_no,
            name: text(entry, "name"),
            source: uid_list(entry.get("source"), &delimiters.source),
            destination: uid_list(entry.get("destination"), &delimiters.destination),
            service: uid_list(entry.get("service"), &delimiters.service),
            action: action(entry.get("action")),
            comments: text(entry, "comments"),
        });
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(entry: &Map<String, Value>, key: &str) -> String {
    entry.get(key).and_then(scalar).unwrap_or_default()
}

/// A reference is either a bare uid or an inlined object carrying one.
fn reference_uid(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("uid").and_then(scalar),
        other => scalar(other),
    }
}

fn uid_list(value: Option<&Value>, delimiter: &str) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(reference_uid)
            .collect::<Vec<_>>()
            .join(delimiter),
        Some(other) => reference_uid(other).unwrap_or_default(),
        None => String::new(),
    }
}

/// Inlined action objects are named directly; bare uids are left for the
/// normalizer to look up.
fn action(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(scalar)
            .or_else(|| map.get("uid").and_then(scalar))
            .unwrap_or_default(),
        Some(other) => scalar(other).unwrap_or_default(),
        None => String::new(),
    }
}
