use std::sync::Arc;
use std::thread;

use ruleview::{normalize, Catalog, ObjectRecord, ResolverConfig, RuleRecord};

fn main() {
    let catalog = Arc::new(Catalog::build(&[
        ObjectRecord::new("h1", "host").with_name("web1").with_address("10.0.0.1"),
        ObjectRecord::new("h2", "host").with_name("web2").with_address("10.0.0.2"),
        ObjectRecord::new("s1", "service-tcp").with_name("https").with_port("443"),
    ]));
    let config = Arc::new(ResolverConfig::default());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let catalog = Arc::clone(&catalog);
            let config = Arc::clone(&config);
            thread::spawn(move || {
                // Each rule is translated independently against the shared catalog
                let rule = RuleRecord {
                    rule_no: i.to_string(),
                    source: "ANY".to_owned(),
                    destination: if i % 2 == 0 { "h1" } else { "h1;h2" }.to_owned(),
                    service: "s1".to_owned(),
                    action: "accept".to_owned(),
                    ..RuleRecord::default()
                };
                let view = normalize(&rule, &catalog, &config);
                println!(
                    "Thread {i}: rule {} {} -> {} via {} ({})",
                    view.rule_no,
                    view.source.simple,
                    view.destination.simple,
                    view.service.simple,
                    view.action
                );
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
