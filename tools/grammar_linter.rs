/// Grammar Linter — validates a generator definition and flags quality issues.
///
/// Usage: grammar_linter <definition.{toml,ron,json}> [-v]

use anyhow::{Context, Result};
use clap::Parser;
use rustc_hash::FxHashSet;
use std::path::PathBuf;
use std::process;

use phrasegen::core::grammar::{scan_placeholders, Grammar};
use phrasegen::schema::config::{GeneratorConfig, START_SYMBOL};

#[derive(Parser)]
#[command(name = "grammar_linter", about = "Check a generator definition", version)]
struct Cli {
    /// Definition file; the format is taken from the extension
    path: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = GeneratorConfig::load(&cli.path)
        .with_context(|| format!("loading {}", cli.path.display()))?;

    println!(
        "Loaded {} pools and {} variables",
        config.templates.len(),
        config.variables.len()
    );

    let (errors, warnings) = lint(&config);

    println!("\n=== Grammar Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
    Ok(())
}

fn lint(config: &GeneratorConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = config.validate() {
        errors.push(e.to_string());
    }

    let grammar = Grammar::from_config(config);
    let variable_ids: FxHashSet<&str> = config.variables.iter().map(|v| v.id.as_str()).collect();
    let mut used_variables: FxHashSet<&str> = FxHashSet::default();

    for (name, pool) in &config.templates {
        // Low variety warning
        if pool.len() == 1 {
            warnings.push(format!(
                "Pool '{}' has a single template and always renders the same way",
                name
            ));
        }

        for template in pool {
            for ph in scan_placeholders(template) {
                if grammar.contains(ph.name) {
                    continue;
                }
                if variable_ids.contains(ph.name) {
                    used_variables.insert(ph.name);
                } else {
                    warnings.push(format!(
                        "Pool '{}' uses '{{{}}}', which is neither a pool nor a variable and will appear literally",
                        name, ph.name
                    ));
                }
            }
        }

        // Every template recurses into this pool: always cut off at the depth cap
        if !pool.is_empty()
            && pool.iter().all(|t| {
                scan_placeholders(t)
                    .iter()
                    .any(|ph| ph.name == name.as_str())
            })
        {
            warnings.push(format!(
                "Pool '{}' has no non-recursive template; its output is always truncated",
                name
            ));
        }
    }

    for var in config.shadowed_variables() {
        warnings.push(format!(
            "Variable '{}' has the same name as a pool; '{{{}}}' always expands the pool",
            var.id, var.id
        ));
    }

    for var in &config.variables {
        if grammar.contains(&var.id) {
            continue;
        }
        if !used_variables.contains(var.id.as_str()) {
            warnings.push(format!("Variable '{}' is never used by any template", var.id));
        }
    }

    // Reachability from the start symbol
    if grammar.contains(START_SYMBOL) {
        let mut reached: FxHashSet<&str> = FxHashSet::default();
        let mut stack = vec![START_SYMBOL];
        while let Some(key) = stack.pop() {
            if reached.insert(key) {
                stack.extend(grammar.references(key));
            }
        }
        for key in grammar.keys() {
            if !reached.contains(key) {
                warnings.push(format!("Pool '{}' is unreachable from '{}'", key, START_SYMBOL));
            }
        }
    }

    (errors, warnings)
}
