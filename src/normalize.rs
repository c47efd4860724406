use crate::translate::Translator;
use crate::{Catalog, DetailLevel, FieldView, RefField, ResolverConfig, RuleRecord, RuleView};

/// Turn one raw rule row into a fully dereferenced [`RuleView`].
///
/// Each reference field is split on its configured delimiter and translated
/// twice, once per detail level. The action is looked up in the catalog by
/// uid, then in the configured action map, and otherwise upper-cased.
#[must_use]
pub fn normalize(rule: &RuleRecord, catalog: &Catalog, config: &ResolverConfig) -> RuleView {
    let translator = Translator::new(catalog, config);
    let field = |which: RefField| {
        let raw = rule.field(which);
        FieldView {
            simple: translator.translate_field(raw, which, DetailLevel::Simple),
            detailed: translator.translate_field(raw, which, DetailLevel::Detailed),
        }
    };

    RuleView {
        rule_no: rule.rule_no.trim().to_owned(),
        name: rule.name.trim().to_owned(),
        source: field(RefField::Source),
        destination: field(RefField::Destination),
        service: field(RefField::Service),
        action: action_name(rule.action.trim(), catalog, config),
        comments: flatten_comment(&rule.comments),
    }
}

/// Normalize a batch of rules in order.
#[must_use]
pub fn normalize_all(
    rules: &[RuleRecord],
    catalog: &Catalog,
    config: &ResolverConfig,
) -> Vec<RuleView> {
    rules.iter().map(|rule| normalize(rule, catalog, config)).collect()
}

fn action_name(raw: &str, catalog: &Catalog, config: &ResolverConfig) -> String {
    if let Some(object) = catalog.get(raw) {
        return object.name().to_owned();
    }
    config
        .action_name(raw)
        .map_or_else(|| raw.to_uppercase(), str::to_owned)
}

/// Comments end up in a single table cell: separators and line breaks become
/// spaces.
fn flatten_comment(raw: &str) -> String {
    raw.replace([',', '\n', '\r'], " ").trim().to_owned()
}
