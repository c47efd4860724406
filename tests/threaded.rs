use std::sync::Arc;
use std::thread;

use ruleview::{normalize, Catalog, ObjectRecord, ResolverConfig, RuleRecord};

fn catalog() -> Catalog {
    let mut records = vec![
        ObjectRecord::new("s1", "service-tcp").with_name("https").with_port("443"),
        ObjectRecord::new("svc", "service-group").with_name("web").with_members(["s1"]),
    ];
    for i in 0..16 {
        records.push(
            ObjectRecord::new(format!("h{i}"), "host")
                .with_name(format!("web{i}"))
                .with_address(format!("10.0.0.{i}")),
        );
    }
    Catalog::build(&records)
}

#[test]
fn normalize_across_threads() {
    let catalog = Arc::new(catalog());
    let config = Arc::new(ResolverConfig::default());

    let mut handles = vec![];
    for i in 0..8 {
        let catalog = Arc::clone(&catalog);
        let config = Arc::clone(&config);
        handles.push(thread::spawn(move || {
            let rule = RuleRecord {
                rule_no: i.to_string(),
                source: format!("h{i};h{}", i + 8),
                destination: "ANY".into(),
                service: "svc".into(),
                action: "accept".into(),
                ..RuleRecord::default()
            };
            normalize(&rule, &catalog, &config)
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let view = handle.join().unwrap();
        assert_eq!(view.rule_no, i.to_string());
        assert_eq!(view.source.simple.to_string(), format!("web{i}, web{}", i + 8));
        assert_eq!(view.destination.simple.to_string(), "ANY");
        assert_eq!(view.service.detailed.to_string(), "web\n  TCP 443");
        assert_eq!(view.action, "ACCEPT");
    }
}

#[test]
fn shared_catalog_gives_identical_views() {
    let catalog = Arc::new(catalog());
    let rule = Arc::new(RuleRecord {
        source: "h1;h2;missing".into(),
        service: "svc".into(),
        ..RuleRecord::default()
    });

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            let rule = Arc::clone(&rule);
            thread::spawn(move || normalize(&rule, &catalog, &ResolverConfig::default()))
        })
        .collect();

    let views: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(views.windows(2).all(|w| w[0] == w[1]));
}
