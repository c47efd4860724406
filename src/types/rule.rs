use serde::Serialize;

use super::cell::Cell;
use super::config::RefField;

/// One raw rule row, before any reference is resolved.
///
/// `source`, `destination` and `service` hold delimited uid lists exactly as
/// they appear in the rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRecord {
    pub rule_no: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub service: String,
    pub action: String,
    pub comments: String,
}

impl RuleRecord {
    #[must_use]
    pub fn field(&self, field: RefField) -> &str {
        match field {
            RefField::Source => self.source.as_str(),
            RefField::Destination => self.destination.as_str(),
            RefField::Service => self.service.as_str(),
        }
    }
}

/// Both renderings of one reference-bearing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub simple: Cell,
    pub detailed: Cell,
}

/// A fully dereferenced rule, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleView {
    pub rule_no: String,
    pub name: String,
    pub source: FieldView,
    pub destination: FieldView,
    pub service: FieldView,
    pub action: String,
    pub comments: String,
}

impl RuleView {
    #[must_use]
    pub fn field(&self, field: RefField) -> &FieldView {
        match field {
            RefField::Source => &self.source,
            RefField::Destination => &self.destination,
            RefField::Service => &self.service,
        }
    }
}
