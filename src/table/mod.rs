mod error;
mod grammar;
mod rulebase;

use tracing::debug;

pub use error::TableError;

use crate::{Catalog, FieldDelimiters, ResolverConfig, RuleRecord, RuleView};

/// An ordered collection of raw rule rows.
///
/// Rows are loaded from a CSV rule table or an access rulebase export and
/// turned into [`RuleView`]s with [`RuleTable::views`].
///
/// ```
/// use ruleview::{Catalog, ObjectRecord, ResolverConfig, RuleTable};
///
/// let catalog = Catalog::build(&[
///     ObjectRecord::new("h1", "host").with_name("web1").with_address("10.0.0.1"),
/// ]);
/// let table = RuleTable::from_csv(
///     "RuleNo,Name,Source,Destination,Service,Action,Comments\n\
///      1,web,ANY,h1,ANY,accept,\n",
/// ).unwrap();
///
/// let views = table.views(&catalog, &ResolverConfig::default());
/// assert_eq!(views[0].destination.simple.to_string(), "web1");
/// assert_eq!(views[0].action, "ACCEPT");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<RuleRecord>,
}

impl RuleTable {
    #[must_use]
    pub fn new(rules: Vec<RuleRecord>) -> Self {
        Self { rules }
    }

    /// Parse a CSV rule table.
    ///
    /// The first row is the header. Columns are matched by their trimmed
    /// names `Name`, `Source`, `Destination`, `Service`, `Action` and
    /// `Comments`; the rule number comes from `RuleNo`, or from the first
    /// column when there is no such header. Missing columns and short rows
    /// default to empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Syntax`] on an unterminated quoted field, which
    /// would otherwise swallow every following row. Text after a closing
    /// quote is kept as part of the field.
    pub fn from_csv(input: &str) -> Result<Self, TableError> {
        use winnow::Parser;
        let rows = grammar::table
            .parse(input)
            .map_err(|e| TableError::syntax(e.to_string()))?;

        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Self::default());
        };
        let columns = Columns::locate(&header);
        let rules: Vec<RuleRecord> = rows.map(|row| columns.record(&row)).collect();
        debug!(rules = rules.len(), "rule table loaded");
        Ok(Self { rules })
    }

    /// Read and parse a CSV rule table file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleviewError`](crate::RuleviewError) on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RuleviewError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_csv(&input)?)
    }

    /// Convert an access rulebase export into rule rows, joining each
    /// reference list with its field's delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the input is not JSON or has no rulebase list.
    pub fn from_rulebase_json(
        input: &str,
        delimiters: &FieldDelimiters,
    ) -> Result<Self, TableError> {
        let rules = rulebase::rules(input, delimiters)?;
        debug!(rules = rules.len(), "rulebase converted");
        Ok(Self { rules })
    }

    #[must_use]
    pub fn records(&self) -> &[RuleRecord] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Normalize every row against `catalog`, preserving row order.
    #[must_use]
    pub fn views(&self, catalog: &Catalog, config: &ResolverConfig) -> Vec<RuleView> {
        crate::normalize::normalize_all(&self.rules, catalog, config)
    }
}

impl FromIterator<RuleRecord> for RuleTable {
    fn from_iter<I: IntoIterator<Item = RuleRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Header positions of the known columns.
struct Columns {
    rule_no: Option<usize>,
    name: Option<usize>,
    source: Option<usize>,
    destination: Option<usize>,
    service: Option<usize>,
    action: Option<usize>,
    comments: Option<usize>,
}

impl Columns {
    fn locate(header: &[String]) -> Self {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        Self {
            rule_no: find("RuleNo").or(Some(0)),
            name: find("Name"),
            source: find("Source"),
            destination: find("Destination"),
            service: find("Service"),
            action: find("Action"),
            comments: find("Comments"),
        }
    }

    fn record(&self, row: &[String]) -> RuleRecord {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map_or_else(String::new, |v| v.trim().to_owned())
        };
        RuleRecord {
            rule_no: cell(self.rule_no),
            name: cell(self.name),
            source: cell(self.source),
            destination: cell(self.destination),
            service: cell(self.service),
            action: cell(self.action),
            comments: cell(self.comments),
        }
    }
}
