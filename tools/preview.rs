/// Preview — interactive shell for trying out a generator definition.
///
/// Usage: preview <definition.{toml,ron,json}> [--seed <n>]
///
/// Commands:
///   regen | r            — draw a new phrase
///   set <id> <value>     — override a variable
///   clear <id>           — drop a variable override
///   vars                 — list variables and their current values
///   plain | html         — show the current phrase in that mode
///   bulk <n>             — draw n phrases and report variety
///   seed <n>             — rebuild the generator with a new seed
///   help                 — list commands
///   quit                 — exit

use anyhow::{Context, Result};
use clap::Parser;
use rustc_hash::FxHashSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use phrasegen::core::renderer::Generator;
use phrasegen::core::substitute::RenderMode;
use phrasegen::schema::config::GeneratorConfig;

#[derive(Parser)]
#[command(name = "preview", about = "Interactive generator preview", version)]
struct Cli {
    /// Definition file; the format is taken from the extension
    path: PathBuf,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

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

    let mut generator = build_generator(config.clone(), cli.seed)?;

    println!("Loaded {} pools", config.templates.len());
    println!("Seed: {}", cli.seed);
    println!("Type 'help' for commands.\n");
    println!("{}", generator.content(RenderMode::Plain));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match cmd.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" => print_help(),
            "regen" | "r" => {
                generator.regenerate();
                println!("{}", generator.content(RenderMode::Plain));
            }
            "plain" => println!("{}", generator.content(RenderMode::Plain)),
            "html" => println!("{}", generator.content(RenderMode::Decorated)),
            "vars" => {
                for var in generator.variables() {
                    println!(
                        "  {:<16} {:<24} = {}",
                        var.id,
                        var.description,
                        var.effective_value()
                    );
                }
            }
            "set" => {
                let (id, value) = rest.split_once(' ').unwrap_or((rest, ""));
                match generator.set_variable(id, value) {
                    Ok(()) => println!("{}", generator.content(RenderMode::Plain)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "clear" => match generator.clear_variable(rest) {
                Ok(()) => println!("{}", generator.content(RenderMode::Plain)),
                Err(e) => println!("Error: {}", e),
            },
            "seed" => match rest.parse::<u64>() {
                Ok(seed) => {
                    generator = build_generator(config.clone(), seed)?;
                    println!("Seed set to {}", seed);
                    println!("{}", generator.content(RenderMode::Plain));
                }
                Err(_) => println!("Usage: seed <n>"),
            },
            "bulk" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => bulk(&mut generator, n),
                _ => println!("Usage: bulk <n>"),
            },
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    Ok(())
}

fn build_generator(config: GeneratorConfig, seed: u64) -> Result<Generator> {
    Generator::builder()
        .config(config)
        .seed(seed)
        .build()
        .context("building generator")
}

fn bulk(generator: &mut Generator, n: usize) {
    let mut distinct = FxHashSet::default();
    let mut total_len = 0usize;
    for i in 0..n {
        generator.regenerate();
        let text = generator.content(RenderMode::Plain);
        total_len += text.chars().count();
        println!("{:>4}. {}", i + 1, text);
        distinct.insert(text);
    }
    println!(
        "\n{} phrases, {} distinct ({:.0}%), average length {} chars",
        n,
        distinct.len(),
        distinct.len() as f64 * 100.0 / n as f64,
        total_len / n
    );
}

fn print_help() {
    println!("Commands:");
    println!("  regen | r            draw a new phrase");
    println!("  set <id> <value>     override a variable");
    println!("  clear <id>           drop a variable override");
    println!("  vars                 list variables");
    println!("  plain | html         show the current phrase");
    println!("  bulk <n>             draw n phrases and report variety");
    println!("  seed <n>             rebuild with a new seed");
    println!("  quit                 exit");
}
