use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;

use crate::catalog::ConverterCatalog;
use crate::cli::OutputFormat;
use crate::dispatch::batch::{parse_jobs, run_batch, BatchOutcome};
use crate::dispatch::Dispatcher;

#[derive(Args)]
pub struct BatchArgs {
    /// Job list: one `input<TAB>output[<TAB>method]` per line, `#` for comments
    #[arg(required = true)]
    pub jobs: PathBuf,

    /// Maximum number of conversions running at once
    #[arg(short = 'j', long = "jobs", default_value = "4")]
    pub max_parallel: usize,
}

pub fn run(args: BatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.jobs)
        .with_context(|| format!("Failed to read job list {}", args.jobs.display()))?;
    let base_dir = args.jobs.parent().unwrap_or_else(|| Path::new("."));
    let jobs = parse_jobs(&text, base_dir)?;

    if verbose {
        eprintln!(
            "Running {} conversions, {} at a time",
            jobs.len(),
            args.max_parallel.max(1)
        );
    }

    let dispatcher = Dispatcher::new(ConverterCatalog::builtin()?);
    let runtime = tokio::runtime::Runtime::new()?;
    let outcomes = runtime.block_on(run_batch(dispatcher, jobs, args.max_parallel));

    match format {
        OutputFormat::Text => print_text(&outcomes),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputFormat::Tsv => print_tsv(&outcomes),
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        bail!("{failed} of {} conversions failed", outcomes.len());
    }
    Ok(())
}

fn print_text(outcomes: &[BatchOutcome]) {
    for outcome in outcomes {
        match (&outcome.report, &outcome.error) {
            (Some(report), _) => println!(
                "OK    {} -> {} ({} via {})",
                outcome.input.display(),
                outcome.output.display(),
                report.converter,
                report.method
            ),
            (None, error) => println!(
                "FAIL  {} -> {}: {}",
                outcome.input.display(),
                outcome.output.display(),
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    let ok = outcomes.iter().filter(|o| o.is_success()).count();
    println!("\n{ok}/{} conversions succeeded", outcomes.len());
}

fn print_tsv(outcomes: &[BatchOutcome]) {
    println!("input\toutput\tstatus\tconverter\tmethod\terror");
    for outcome in outcomes {
        let (converter, method) = outcome
            .report
            .as_ref()
            .map_or(("", ""), |r| (r.converter.as_str(), r.method.as_str()));
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            outcome.input.display(),
            outcome.output.display(),
            if outcome.is_success() { "ok" } else { "failed" },
            converter,
            method,
            outcome.error.as_deref().unwrap_or("")
        );
    }
}
