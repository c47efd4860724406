use ruleview::{Catalog, DetailLevel, ObjectRecord, ResolverConfig, Translator};

fn main() {
    // Classify and flatten a small object snapshot
    let catalog = Catalog::build(&[
        ObjectRecord::new("h1", "host").with_name("web1").with_address("10.0.0.1"),
        ObjectRecord::new("h2", "host").with_name("web2").with_address("10.0.0.2"),
        ObjectRecord::new("s1", "service-tcp").with_name("https").with_port("443"),
        ObjectRecord::new("web", "group").with_name("web-servers").with_members(["h1", "h2"]),
        ObjectRecord::new("svc", "service-group")
            .with_name("web-services")
            .with_members(["s1", "h1"]),
    ]);

    println!("{catalog}");
    for diagnostic in catalog.diagnostics() {
        println!("  warning: {diagnostic}");
    }

    // Render a reference list both ways
    let config = ResolverConfig::default();
    let translator = Translator::new(&catalog, &config);
    let tokens = ["web", "ANY", "deadbeef"];

    println!("simple:   {}", translator.translate(tokens, DetailLevel::Simple));
    println!("detailed:\n{}", translator.translate(tokens, DetailLevel::Detailed));
}
