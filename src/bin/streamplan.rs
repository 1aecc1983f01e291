//! streamplan CLI - check stream files and run them to an optimistic fixpoint.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use streamplan::atom::{format_atom, format_fact};
use streamplan::fixpoint::{run_fixpoint, FixpointConfig, Outcome};
use streamplan::optimistic::OptimisticEvaluator;
use streamplan::parser::{parse_facts, parse_streams};
use streamplan::stream::format_instance;
use streamplan::{Fact, Instantiator, ObjectStore, StreamDecl, StreamInstance, SymbolStore};

#[derive(Parser, Debug)]
#[command(name = "streamplan")]
#[command(about = "Incremental stream instantiation for task planning.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and validate a stream file
    Check {
        /// Stream file in PDDL stream syntax
        streams: PathBuf,
    },
    /// Instantiate streams over a fact file, evaluating optimistically
    ///
    /// Every enabled instance is evaluated by minting placeholder outputs,
    /// and the certified facts are fed back until nothing new is enabled.
    Run {
        /// Stream file in PDDL stream syntax
        streams: PathBuf,
        /// Initial facts, optionally wrapped in (:init ...)
        facts: PathBuf,
        /// Stop after this many evaluations
        #[arg(short = 'n', long, default_value_t = FixpointConfig::default().max_evaluations)]
        max_evaluations: usize,
        /// Deepest placeholder level to mint
        #[arg(short = 'l', long, default_value_t = FixpointConfig::default().max_level)]
        max_level: u32,
        /// Print only the summary
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() {
    streamplan::trace::init_subscriber();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { streams } => check_command(&streams),
        Commands::Run {
            streams,
            facts,
            max_evaluations,
            max_level,
            quiet,
        } => run_command(
            &streams,
            &facts,
            &FixpointConfig {
                max_evaluations,
                max_level,
            },
            quiet,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_streams(
    path: &Path,
    symbols: &SymbolStore,
    objects: &ObjectStore,
) -> Result<Vec<StreamDecl>> {
    let text = read(path)?;
    parse_streams(&text, symbols, objects)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn check_command(path: &Path) -> Result<()> {
    let symbols = SymbolStore::new();
    let objects = ObjectStore::new();
    let decls = load_streams(path, &symbols, &objects)?;

    let engine = Instantiator::new(decls, [])
        .with_context(|| format!("invalid stream declarations in {}", path.display()))?;

    for decl in engine.streams() {
        let domain: Vec<String> = decl
            .domain
            .iter()
            .map(|fact| format_fact(fact, &decl.params, &objects, &symbols))
            .collect();
        println!(
            "{:<24} inputs={} outputs={} domain={}",
            decl.label,
            decl.inputs.len(),
            decl.outputs.len(),
            domain.join(" ")
        );
    }
    println!("{} streams ok", engine.streams().len());
    Ok(())
}

fn run_command(
    streams_path: &Path,
    facts_path: &Path,
    config: &FixpointConfig,
    quiet: bool,
) -> Result<()> {
    let symbols = SymbolStore::new();
    let objects = ObjectStore::new();
    let decls = load_streams(streams_path, &symbols, &objects)?;

    let text = read(facts_path)?;
    let facts = parse_facts(&text, &symbols, &objects)
        .with_context(|| format!("failed to parse {}", facts_path.display()))?;

    let mut engine = Instantiator::new(decls, [])
        .with_context(|| format!("invalid stream declarations in {}", streams_path.display()))?;
    for warning in submit_init(&mut engine, &facts, &objects, &symbols) {
        eprintln!("warning: {}", warning);
    }

    let optimistic = OptimisticEvaluator::new(&objects).with_max_level(config.max_level);
    let mut step = 0usize;
    let mut evaluator = |instance: &StreamInstance, decl: &StreamDecl| {
        let certified = optimistic.evaluate(decl, &instance.inputs);
        step += 1;
        if !quiet {
            println!(
                "[{}] {}",
                step,
                format_instance(instance, decl, &objects, &symbols)
            );
            for atom in &certified {
                println!("      {}", format_atom(atom, &objects, &symbols));
            }
        }
        certified
    };

    let report = run_fixpoint(&mut engine, &mut evaluator, config.max_evaluations);

    match report.outcome {
        Outcome::Exhausted => println!("exhausted after {} evaluations", report.evaluated.len()),
        Outcome::BudgetExhausted => println!(
            "budget exhausted after {} evaluations, {} pending",
            report.evaluated.len(),
            engine.len()
        ),
    }
    println!("{} new facts, {} objects", report.new_facts, objects.len());
    print!("{}", report.stats);
    Ok(())
}

/// Submit initial facts, describing each one the engine rejected. Repeated
/// facts are not rejections.
fn submit_init(
    engine: &mut Instantiator,
    facts: &[Fact],
    objects: &ObjectStore,
    symbols: &SymbolStore,
) -> Vec<String> {
    let mut warnings = Vec::new();
    for fact in facts {
        let rejected = engine.stats().rejected;
        engine.submit_fact(fact);
        if engine.stats().rejected > rejected {
            let reason = if fact.is_ground() {
                "arity mismatch"
            } else {
                "not ground"
            };
            warnings.push(format!(
                "ignored fact {} ({})",
                format_fact(fact, &[], objects, symbols),
                reason
            ));
        }
    }
    warnings
}
