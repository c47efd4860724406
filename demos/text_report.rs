//! Load an object snapshot and a rule table from disk and print a plain-text
//! report.
//!
//! ```text
//! cargo run --example text_report -- objects.json rules.csv [config.json]
//! ```
//!
//! Set `RUST_LOG=ruleview=debug` to see resolution diagnostics as they occur.

use std::process::ExitCode;

use ruleview::{Catalog, ResolverConfig, RuleTable, RuleviewError};
use tracing_subscriber::EnvFilter;

fn run(objects: &str, rules: &str, config: Option<&str>) -> Result<(), RuleviewError> {
    let catalog = Catalog::from_file(objects)?;
    let table = RuleTable::from_file(rules)?;
    let config = match config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::default(),
    };

    println!("{catalog}, {} rules", table.len());
    for diagnostic in catalog.diagnostics() {
        println!("warning: {diagnostic}");
    }

    for view in table.views(&catalog, &config) {
        println!();
        println!("Rule {} {}", view.rule_no, view.name);
        println!("  Source:      {}", view.source.simple);
        println!("  Destination: {}", view.destination.simple);
        println!("  Service:     {}", view.service.simple);
        println!("  Action:      {}", view.action);
        if !view.comments.is_empty() {
            println!("  Comments:    {}", view.comments);
        }
        for cell in [&view.source.detailed, &view.destination.detailed, &view.service.detailed] {
            if !cell.is_empty() {
                for line in cell.to_string().lines() {
                    println!("    | {line}");
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(objects), Some(rules)) = (args.first(), args.get(1)) else {
        eprintln!("usage: text_report <objects.json> <rules.csv> [config.json]");
        return ExitCode::FAILURE;
    };

    match run(objects, rules, args.get(2).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
