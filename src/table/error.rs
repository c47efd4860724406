use thiserror::Error;

/// A rule table could not be read.
///
/// Row-level gaps (missing or short columns) are not errors; only input that
/// cannot be split into rows at all is rejected.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("rule table parse error: {message}")]
    Syntax { message: String },

    #[error("rulebase is not valid JSON: {0}")]
    InvalidRulebase(#[source] serde_json::Error),

    #[error("rulebase must be a list of entries or an object with a 'rulebase' list, found {found}")]
    UnexpectedRulebaseShape { found: &'static str },
}

impl TableError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }
}
