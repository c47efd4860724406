use crate::{
    Catalog, Cell, DetailLevel, MemberCategory, MemberValue, RefField, Reference, ResolvedObject,
    ResolverConfig, ValueStyle,
};

/// Renders uid token lists against a [`Catalog`].
///
/// Translation never fails: unknown tokens become unresolved markers and an
/// empty token list becomes an empty cell.
///
/// ```
/// use ruleview::{Catalog, DetailLevel, ObjectRecord, ResolverConfig, Translator};
///
/// let catalog = Catalog::build(&[
///     ObjectRecord::new("h1", "host").with_name("web1").with_address("10.0.0.1"),
/// ]);
/// let config = ResolverConfig::default();
/// let translator = Translator::new(&catalog, &config);
///
/// let cell = translator.translate(["h1", "ANY", "beef"], DetailLevel::Simple);
/// assert_eq!(cell.to_string(), "web1, ANY, (unresolved) beef");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    config: &'a ResolverConfig,
}

impl<'a> Translator<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, config: &'a ResolverConfig) -> Self {
        Self { catalog, config }
    }

    /// Translate tokens in order. Blank tokens are skipped; if nothing is
    /// left the result is the empty cell.
    pub fn translate<'t, I>(&self, tokens: I, detail: DetailLevel) -> Cell
    where
        I: IntoIterator<Item = &'t str>,
    {
        let refs = tokens
            .into_iter()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| self.reference(token, detail))
            .collect();
        Cell::new(detail, refs)
    }

    /// Split a raw rule field on its configured delimiter, then translate it.
    pub fn translate_field(&self, raw: &str, field: RefField, detail: DetailLevel) -> Cell {
        self.translate(split_tokens(raw, self.config.delimiter(field)), detail)
    }

    fn reference(&self, token: &str, detail: DetailLevel) -> Reference {
        if self.config.is_sentinel(token) {
            return Reference::Any;
        }
        let Some(object) = self.catalog.get(token) else {
            return Reference::Unresolved {
                uid: token.to_owned(),
            };
        };

        match object {
            ResolvedObject::Group(group) => Reference::Group {
                name: group.name.clone(),
                members: match detail {
                    DetailLevel::Simple => Vec::new(),
                    DetailLevel::Detailed => {
                        let style = category_style(group.category);
                        group.members.iter().map(|m| member_value(m, style)).collect()
                    }
                },
            },
            ResolvedObject::Unresolved { uid } => Reference::Unresolved { uid: uid.clone() },
            leaf => Reference::Leaf {
                name: leaf.name().to_owned(),
                value: match detail {
                    DetailLevel::Simple => None,
                    DetailLevel::Detailed => leaf.value().map(str::to_owned),
                },
                style: leaf_style(leaf),
            },
        }
    }
}

/// Split a delimited uid list, trimming each token and dropping blanks.
///
/// An empty delimiter yields the whole trimmed input as a single token.
pub fn split_tokens<'s>(raw: &'s str, delimiter: &'s str) -> impl Iterator<Item = &'s str> + 's {
    let parts: Box<dyn Iterator<Item = &'s str> + 's> = if delimiter.is_empty() {
        Box::new(std::iter::once(raw))
    } else {
        Box::new(raw.split(delimiter))
    };
    parts.map(str::trim).filter(|token| !token.is_empty())
}

fn leaf_style(object: &ResolvedObject) -> ValueStyle {
    match object {
        ResolvedObject::Host { .. }
        | ResolvedObject::Network { .. }
        | ResolvedObject::Range { .. } => ValueStyle::Address,
        ResolvedObject::Service { .. } => ValueStyle::Service,
        _ => ValueStyle::Other,
    }
}

fn category_style(category: MemberCategory) -> ValueStyle {
    match category {
        MemberCategory::Network => ValueStyle::Address,
        MemberCategory::Service => ValueStyle::Service,
    }
}

fn member_value(member: &ResolvedObject, style: ValueStyle) -> MemberValue {
    match member {
        ResolvedObject::Unresolved { uid } => MemberValue::Unresolved { uid: uid.clone() },
        other => MemberValue::Value {
            value: other.value().unwrap_or_else(|| other.name()).to_owned(),
            style,
        },
    }
}
