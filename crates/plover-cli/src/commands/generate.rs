// Command handler for: Generate

use std::fs;
use std::path::Path;

use miette::IntoDiagnostic;
use serde::Serialize;

use plover_engine::{
    build_generator, shared_rng, CegarOptions, GeneratorKind, PatternInformation, SeedStrategy,
};

use super::helpers::{load_task, parse_output_format, write_json_artifact, OutputFormat};
use crate::cli::GenerateArgs;

const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct GenerateReport<'a> {
    schema_version: u32,
    task: String,
    options: &'a CegarOptions,
    result: &'a PatternInformation,
}

/// Options from `--options` (or the defaults), overridden by explicit flags.
fn resolve_options(args: &GenerateArgs) -> miette::Result<CegarOptions> {
    let mut options = match &args.options {
        Some(path) => read_options_file(path)?,
        None => CegarOptions::default(),
    };
    if let Some(max_pdb_size) = args.max_pdb_size {
        options.max_pdb_size = max_pdb_size;
    }
    if args.max_time.is_some() {
        options.max_time = args.max_time;
    }
    if args.no_wildcard {
        options.use_wildcard_plans = false;
    }
    if args.seed.is_some() {
        options.random_seed = args.seed;
    }
    if args.max_refinements.is_some() {
        options.max_refinements = args.max_refinements;
    }
    if !args.blacklist.is_empty() {
        options.blacklist = args.blacklist.clone();
    }
    if let Some(var) = args.seed_variable {
        options.seed_strategy = SeedStrategy::Variable(var);
    }
    options.validate().map_err(|e| miette::miette!("{e}"))?;
    Ok(options)
}

fn read_options_file(path: &Path) -> miette::Result<CegarOptions> {
    let source = fs::read_to_string(path)
        .map_err(|e| miette::miette!("Cannot read options file {}: {e}", path.display()))?;
    serde_json::from_str(&source)
        .map_err(|e| miette::miette!("Invalid options file {}: {e}", path.display()))
}

pub(crate) fn run_generate_command(args: GenerateArgs) -> miette::Result<()> {
    let output_format = parse_output_format(&args.format)?;
    let kind: GeneratorKind = args
        .generator
        .parse()
        .map_err(|e: String| miette::miette!("{e}"))?;
    let options = resolve_options(&args)?;
    let task = load_task(&args.task)?;

    let rng = shared_rng(options.random_seed);
    let generator = build_generator(kind, &options, rng);
    let info = generator.generate(&task).into_diagnostic()?;

    let report = GenerateReport {
        schema_version: REPORT_SCHEMA_VERSION,
        task: args.task.display().to_string(),
        options: &options,
        result: &info,
    };
    let report_json = serde_json::to_value(&report).into_diagnostic()?;

    if let Some(path) = &args.out {
        write_json_artifact(path, &report_json)?;
        eprintln!("Report written to {}", path.display());
    }

    match output_format {
        OutputFormat::Text => println!("{info}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report_json).into_diagnostic()?
        ),
    }
    Ok(())
}
