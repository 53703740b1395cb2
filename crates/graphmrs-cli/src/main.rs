//! graphmrs CLI
//!
//! - `convert`: scene graphs to SimpleMRS, with per-node/edge evaluation and
//!   optional surface generation through an external generator
//! - `check-lexicon`: load a lexicon and validate its recipes against the
//!   composition table

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;

use graphmrs_algebra::{encode, Composer, Layout, SynopsisTable};
use graphmrs_convert::evaluation::{
    edge_table, generation_table, graph_coverage, node_table, summary_table,
};
use graphmrs_convert::{
    convert_and_finish, CompositionTable, EvalInfo, GenerationInfo, Lexicon, SceneGraph, Summary,
};

mod config;
mod generator;
mod logging;

use config::{Config, Overrides};
use generator::{CommandGenerator, Generator};

#[derive(Parser)]
#[command(name = "graphmrs")]
#[command(
    author,
    version,
    about = "Convert scene graphs into MRS for grammar-based generation"
)]
struct Cli {
    /// JSON config file naming the synopsis, lexicon, table and generator
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Predicate signature table (JSON)
    #[arg(long, global = true)]
    synopsis: Option<PathBuf>,
    /// Lexicon (JSON)
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,
    /// Composition-type table (JSON); the built-in table is used otherwise
    #[arg(long = "composition-table", global = true)]
    composition_table: Option<PathBuf>,
    /// Debug logging (GRAPHMRS_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert scene graphs to MRS and report what made it in.
    Convert {
        /// Graph files (JSON)
        #[arg(required = true)]
        graphs: Vec<PathBuf>,
        /// Print a JSON report instead of tables
        #[arg(long)]
        json: bool,
        /// Print each MRS on one line
        #[arg(long)]
        compact: bool,
        /// Run the configured generator on each MRS
        #[arg(long)]
        generate: bool,
        /// Generator command line (implies --generate)
        #[arg(long)]
        generator: Option<String>,
        /// Quantifier for bare noun phrases
        #[arg(long)]
        quantifier: Option<String>,
    },

    /// Load a lexicon and check every recipe against the composition table.
    CheckLexicon,
}

#[derive(Debug, Serialize)]
struct GraphReport {
    name: String,
    path: PathBuf,
    mrs: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    results: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation: Option<GenerationInfo>,
    evaluation: EvalInfo,
    summary: Summary,
}

#[derive(Debug, Serialize)]
struct RunReport {
    graphs: Vec<GraphReport>,
    summary: Summary,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    generation: BTreeMap<String, GenerationInfo>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut overrides = Overrides {
        synopsis: cli.synopsis,
        lexicon: cli.lexicon,
        composition_table: cli.composition_table,
        ..Overrides::default()
    };

    match cli.command {
        Commands::Convert {
            graphs,
            json,
            compact,
            generate,
            generator,
            quantifier,
        } => {
            let run_generator = generate || generator.is_some();
            overrides.generator = generator;
            overrides.default_quantifier = quantifier;
            let config = load_config(cli.config.as_deref(), overrides)?;
            let layout = if compact { Layout::Compact } else { Layout::Indented };
            cmd_convert(&config, &graphs, json, layout, run_generator)?;
        }
        Commands::CheckLexicon => {
            let config = load_config(cli.config.as_deref(), overrides)?;
            cmd_check_lexicon(&config)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(config.apply(overrides))
}

fn load_table(config: &Config) -> Result<CompositionTable> {
    match &config.composition_table {
        Some(path) => CompositionTable::from_json_file(path)
            .with_context(|| format!("failed to load composition table {}", path.display())),
        None => Ok(CompositionTable::default()),
    }
}

fn load_lexicon(config: &Config, table: &CompositionTable) -> Result<Lexicon> {
    let path = config.lexicon_path()?;
    Lexicon::from_json_file(path, table)
        .with_context(|| format!("failed to load lexicon {}", path.display()))
}

fn cmd_check_lexicon(config: &Config) -> Result<()> {
    let table = load_table(config)?;
    let lexicon = load_lexicon(config, &table)?;
    println!(
        "{} lexicon {} ({} node entries, {} edge entries)",
        "ok".green().bold(),
        config.lexicon_path()?.display(),
        lexicon.node_count(),
        lexicon.edge_count()
    );
    Ok(())
}

fn cmd_convert(
    config: &Config,
    graph_paths: &[PathBuf],
    json: bool,
    layout: Layout,
    run_generator: bool,
) -> Result<()> {
    let synopsis_path = config.synopsis_path()?;
    let synopses = SynopsisTable::from_json_file(synopsis_path)
        .with_context(|| format!("failed to load synopsis table {}", synopsis_path.display()))?;
    let table = load_table(config)?;
    let lexicon = load_lexicon(config, &table)?;

    let generator: Option<Box<dyn Generator>> = if run_generator {
        let Some(gen_config) = &config.generator else {
            bail!("--generate needs a generator (use --generator or the config file)");
        };
        Some(Box::new(CommandGenerator::new(gen_config)))
    } else {
        None
    };

    let mut reports = Vec::new();
    for path in graph_paths {
        let report = convert_one(
            path,
            &synopses,
            &lexicon,
            config,
            layout,
            generator.as_deref(),
        )?;
        if !json {
            print_graph_report(&report);
        }
        reports.push(report);
    }

    let mut all = EvalInfo::new();
    let mut generation = BTreeMap::new();
    for report in &reports {
        all.merge_prefixed(&report.name, &report.evaluation);
        if let Some(info) = &report.generation {
            generation.insert(report.name.clone(), info.clone());
        }
    }
    let run = RunReport {
        summary: all.summary(),
        graphs: reports,
        generation,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else if run.graphs.len() > 1 {
        print_run_summary(&run, &all);
    }
    Ok(())
}

fn convert_one(
    path: &Path,
    synopses: &SynopsisTable,
    lexicon: &Lexicon,
    config: &Config,
    layout: Layout,
    generator: Option<&dyn Generator>,
) -> Result<GraphReport> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let graph = SceneGraph::from_json_file(path)
        .with_context(|| format!("failed to load graph {}", path.display()))?;

    if graph.has_cycle() {
        tracing::warn!(graph = %name, "graph contains cycles, skipped");
        return Ok(skipped(name, path, GenerationInfo::cyclic()));
    }
    if graph.find_root().is_err() {
        tracing::warn!(graph = %name, "graph has no root node, skipped");
        return Ok(skipped(name, path, GenerationInfo::no_root()));
    }

    // One composer per graph: variable names restart for every representation.
    let mut composer = Composer::new(synopses);
    if let Some(q) = &config.default_quantifier {
        composer = composer.with_default_quantifier(q.clone());
    }
    let (finished, evaluation) = convert_and_finish(&graph, lexicon, &mut composer)
        .with_context(|| format!("failed to convert graph {}", path.display()))?;

    let mrs = finished.as_ref().map(|f| encode(f, layout));
    let mut results = Vec::new();
    let generation = match (&finished, generator) {
        (None, _) => Some(GenerationInfo::not_produced()),
        (Some(fragment), Some(generator)) => {
            results = generator.generate(&encode(fragment, Layout::Compact))?;
            tracing::info!(graph = %name, results = results.len(), "generated");
            Some(GenerationInfo::from_results(results.len()))
        }
        (Some(_), None) => None,
    };

    Ok(GraphReport {
        name,
        path: path.to_path_buf(),
        mrs,
        results,
        generation,
        summary: evaluation.summary(),
        evaluation,
    })
}

/// Report for a graph that never reached conversion.
fn skipped(name: String, path: &Path, generation: GenerationInfo) -> GraphReport {
    GraphReport {
        name,
        path: path.to_path_buf(),
        mrs: None,
        results: Vec::new(),
        generation: Some(generation),
        evaluation: EvalInfo::new(),
        summary: Summary::default(),
    }
}

fn print_graph_report(report: &GraphReport) {
    println!(
        "{} {} ({})",
        "graph".cyan().bold(),
        report.name.bold(),
        report.path.display()
    );
    match (&report.mrs, &report.generation) {
        (Some(mrs), _) => println!("{mrs}"),
        (None, Some(info)) => println!("  {} {}", "→".yellow(), info.reason),
        (None, None) => {}
    }
    if let Some(info) = &report.generation {
        if report.mrs.is_some() {
            println!("  {} {} ({} results)", "→".yellow(), info.reason, info.results);
        }
    }
    for r in &report.results {
        println!("  {r}");
    }
    if report.evaluation.nodes.is_empty() {
        println!();
        return;
    }
    println!();
    print!("{}", node_table(&report.evaluation));
    println!();
    print!("{}", edge_table(&report.evaluation));
    println!();
    print!("{}", summary_table(&report.summary));
    println!();
}

fn print_run_summary(run: &RunReport, all: &EvalInfo) {
    println!("{}", "EVALUATION SUMMARY".bold());
    println!();
    if !run.generation.is_empty() {
        let coverage = graph_coverage(&run.generation);
        println!(
            "graphs generated from: {}/{} ({:.3})",
            coverage.produced,
            coverage.total,
            coverage.produced_ratio()
        );
        println!();
        print!("{}", generation_table(&run.generation));
        println!();
    }
    print!("{}", summary_table(&run.summary));
    println!();
    print!("{}", node_table(all));
    println!();
    print!("{}", edge_table(all));
}
