
use proptest::prelude::*;
use ruleview::{
    flatten_group, Catalog, DetailLevel, Diagnostic, MemberCategory, Reference, ResolvedObject,
    ResolverConfig, Translator,
};
use strategies::{arb_snapshot, arb_tokens, GenSnapshot};

fn snapshot_with_tokens() -> impl Strategy<Value = (GenSnapshot, Vec<String>)> {
    arb_snapshot().prop_flat_map(|snapshot| {
        let tokens = arb_tokens(&snapshot);
        (Just(snapshot), tokens)
    })
}

// ---------------------------------------------------------------------------
// Invariant 1: Coverage
//
// Every record with a uid has exactly one catalog entry, and nothing else
// does, no matter how the groups nest.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn one_entry_per_uid(snapshot in arb_snapshot()) {
        let catalog = Catalog::build(&snapshot.records);
        prop_assert_eq!(catalog.len(), snapshot.records.len());
        for uid in snapshot.uids() {
            prop_assert!(catalog.contains(uid), "missing {}", uid);
        }
        prop_assert_eq!(catalog.group_count(), snapshot.group_uids.len());
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Flat, well-typed membership
//
// Group members are never groups, and every resolved member belongs to the
// group's category.
// ---------------------------------------------------------------------------

fn fits(member: &ResolvedObject, category: MemberCategory) -> bool {
    match member {
        ResolvedObject::Unresolved { .. } => true,
        ResolvedObject::Host { .. }
        | ResolvedObject::Network { .. }
        | ResolvedObject::Range { .. } => category == MemberCategory::Network,
        ResolvedObject::Service { .. } => category == MemberCategory::Service,
        _ => false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn members_are_flat_and_fit(snapshot in arb_snapshot()) {
        let catalog = Catalog::build(&snapshot.records);
        for uid in &snapshot.group_uids {
            let group = catalog.get(uid).and_then(ResolvedObject::as_group);
            prop_assert!(group.is_some(), "{} is not a group", uid);
            let group = group.unwrap();
            for member in &group.members {
                prop_assert!(member.as_group().is_none());
                prop_assert!(
                    fits(member, group.category),
                    "{:?} in {:?} group",
                    member,
                    group.category
                );
            }
        }
    }

    #[test]
    fn cycle_paths_close(snapshot in arb_snapshot()) {
        let catalog = Catalog::build(&snapshot.records);
        for diagnostic in catalog.diagnostics() {
            if let Diagnostic::CircularGroupReference { path } = diagnostic {
                prop_assert!(path.len() >= 2);
                prop_assert_eq!(path.first(), path.last());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Determinism and idempotence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn build_is_deterministic(snapshot in arb_snapshot()) {
        let first = Catalog::build(&snapshot.records);
        let second = Catalog::build(&snapshot.records);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn flatten_matches_catalog_and_repeats(snapshot in arb_snapshot()) {
        let catalog = Catalog::build(&snapshot.records);
        for uid in &snapshot.group_uids {
            let once = flatten_group(&snapshot.records, uid);
            let twice = flatten_group(&snapshot.records, uid);
            prop_assert_eq!(&once, &twice);
            let members = catalog
                .get(uid)
                .and_then(ResolvedObject::as_group)
                .map(|g| g.members.clone());
            prop_assert_eq!(once, members);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Translation
//
// One reference per token, in order; the sentinel always renders as ANY and
// unknown tokens are kept verbatim.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn translation_preserves_tokens((snapshot, tokens) in snapshot_with_tokens()) {
        let catalog = Catalog::build(&snapshot.records);
        let config = ResolverConfig::default();
        let translator = Translator::new(&catalog, &config);

        for detail in [DetailLevel::Simple, DetailLevel::Detailed] {
            let cell = translator.translate(tokens.iter().map(String::as_str), detail);
            prop_assert_eq!(cell.refs().len(), tokens.len());
            prop_assert_eq!(cell.is_empty(), tokens.is_empty());
            for (token, reference) in tokens.iter().zip(cell.refs()) {
                match token.as_str() {
                    "ANY" => prop_assert_eq!(reference, &Reference::Any),
                    "not-a-uid" => prop_assert_eq!(
                        reference,
                        &Reference::Unresolved { uid: token.clone() }
                    ),
                    uid => {
                        let object = catalog.get(uid).unwrap();
                        let name = match reference {
                            Reference::Leaf { name, .. } | Reference::Group { name, .. } => name,
                            other => panic!("unexpected {other:?} for {uid}"),
                        };
                        prop_assert_eq!(name.as_str(), object.name());
                    }
                }
            }
        }
    }
}
