//! Many conversions on a bounded worker pool.
//!
//! Each job runs as one blocking task; a semaphore caps how many run at once.
//! A failing job does not stop the others. Jobs writing to the same output
//! path are not serialized.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::core::options::ConversionOptions;
use crate::dispatch::{ConversionReport, Dispatcher};

/// One conversion in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub method: Option<String>,
    pub options: ConversionOptions,
}

impl BatchJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            method: None,
            options: ConversionOptions::new(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Result of one batch job
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ConversionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn failed(input: PathBuf, output: PathBuf, error: String) -> Self {
        Self {
            input,
            output,
            report: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run every job, at most `max_parallel` at a time, and return the outcomes in job order.
///
/// Conversion failures, including a panicking method, are reported per job
/// and never stop the other jobs.
pub async fn run_batch(dispatcher: Dispatcher, jobs: Vec<BatchJob>, max_parallel: usize) -> Vec<BatchOutcome> {
    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut tasks = JoinSet::new();
    let paths: Vec<(PathBuf, PathBuf)> = jobs
        .iter()
        .map(|job| (job.input.clone(), job.output.clone()))
        .collect();

    for (index, job) in jobs.into_iter().enumerate() {
        let dispatcher = dispatcher.clone();
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let (input, output) = (job.input.clone(), job.output.clone());
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    match tokio::task::spawn_blocking(move || run_job(&dispatcher, job)).await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!("Conversion of {} did not finish: {e}", input.display());
                            BatchOutcome::failed(input, output, format!("conversion task failed: {e}"))
                        }
                    }
                }
                Err(e) => BatchOutcome::failed(input, output, e.to_string()),
            };
            (index, outcome)
        });
    }

    let mut outcomes: Vec<Option<BatchOutcome>> = (0..paths.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(e) => warn!("Batch worker failed: {e}"),
        }
    }

    outcomes
        .into_iter()
        .zip(paths)
        .map(|(outcome, (input, output))| {
            outcome.unwrap_or_else(|| BatchOutcome::failed(input, output, "batch worker did not report".to_string()))
        })
        .collect()
}

fn run_job(dispatcher: &Dispatcher, job: BatchJob) -> BatchOutcome {
    debug!("Batch job {} -> {}", job.input.display(), job.output.display());

    match dispatcher.convert(&job.input, &job.output, job.method.as_deref(), &job.options) {
        Ok(report) => BatchOutcome {
            input: job.input,
            output: job.output,
            report: Some(report),
            error: None,
        },
        Err(e) => {
            warn!("Failed to convert {}: {e}", job.input.display());
            BatchOutcome::failed(job.input, job.output, e.to_string())
        }
    }
}

/// Parse a job list: `input<TAB>output[<TAB>method]` per line.
///
/// Blank lines and lines starting with `#` are skipped. Relative paths are
/// resolved against `base_dir`.
///
/// # Errors
///
/// Returns an error naming the line number of a malformed line.
pub fn parse_jobs(text: &str, base_dir: &Path) -> anyhow::Result<Vec<BatchJob>> {
    let mut jobs = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let job = match fields.as_slice() {
            [input, output] => BatchJob::new(base_dir.join(input), base_dir.join(output)),
            [input, output, method] if !method.is_empty() => {
                BatchJob::new(base_dir.join(input), base_dir.join(output)).with_method(*method)
            }
            _ => bail!(
                "Line {}: expected 'input<TAB>output[<TAB>method]', found {} fields",
                line_num + 1,
                fields.len()
            ),
        };
        jobs.push(job);
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ConverterCatalog;
    use crate::core::converter::{Conversion, Converter};
    use crate::core::error::ConvertError;
    use crate::core::method::MethodRegistry;
    use tempfile::tempdir;

    struct Exploding;

    impl Converter for Exploding {
        const ID: &'static str = "boom2out";
        const INPUT_EXT: &'static [&'static str] = &[".boom"];
        const OUTPUT_EXT: &'static [&'static str] = &[".out"];

        fn register_methods(methods: &mut MethodRegistry) -> Result<(), ConvertError> {
            methods.register(
                Self::ID,
                "native",
                |_: &Conversion<'_>, _: &ConversionOptions| -> anyhow::Result<()> {
                    panic!("converter blew up")
                },
                None,
                true,
            )
        }
    }

    #[test]
    fn test_parse_jobs() {
        let text = "# input\toutput\n\na.fa\ta.fq\n/abs/b.fq\tb.fasta\tseqtk\n";
        let jobs = parse_jobs(text, Path::new("/data")).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0], BatchJob::new("/data/a.fa", "/data/a.fq"));
        assert_eq!(jobs[1].input, PathBuf::from("/abs/b.fq"));
        assert_eq!(jobs[1].method.as_deref(), Some("seqtk"));
    }

    #[test]
    fn test_parse_jobs_rejects_bad_lines() {
        let err = parse_jobs("a.fa\ta.fq\nonly-one-field\n", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let dir = tempdir().unwrap();
        let mut jobs = Vec::new();
        for i in 0..6 {
            let input = dir.path().join(format!("in{i}.fa"));
            std::fs::write(&input, format!(">r{i}\nACGT\n")).unwrap();
            jobs.push(BatchJob::new(input, dir.path().join(format!("out{i}.fq"))));
        }
        jobs.insert(3, BatchJob::new(dir.path().join("missing.fa"), dir.path().join("x.fq")));

        let dispatcher = Dispatcher::new(ConverterCatalog::builtin().unwrap());
        let outcomes = run_batch(dispatcher, jobs, 2).await;

        assert_eq!(outcomes.len(), 7);
        assert!(!outcomes[3].is_success());
        assert!(outcomes[3].error.as_deref().unwrap().contains("not found"));
        for (i, outcome) in outcomes.iter().enumerate().filter(|(i, _)| *i != 3) {
            assert!(outcome.is_success(), "job {i} failed: {:?}", outcome.error);
        }
        assert_eq!(outcomes[4].input, dir.path().join("in3.fa"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out5.fq")).unwrap(),
            "@r5\nACGT\n+\nIIII\n"
        );
    }

    #[tokio::test]
    async fn test_panicking_job_does_not_abandon_others() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.fa");
        std::fs::write(&good, ">g\nAC\n").unwrap();
        let bad = dir.path().join("bad.boom");
        std::fs::write(&bad, "x").unwrap();

        let jobs = vec![
            BatchJob::new(&good, dir.path().join("a.fq")),
            BatchJob::new(&bad, dir.path().join("bad.out")),
            BatchJob::new(&good, dir.path().join("b.fq")),
        ];

        let mut catalog = ConverterCatalog::builtin().unwrap();
        catalog.register_converter::<Exploding>().unwrap();
        let outcomes = run_batch(Dispatcher::new(catalog), jobs, 1).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert_eq!(outcomes[1].input, bad);
        assert!(outcomes[1].error.as_deref().unwrap().contains("conversion task failed"));
        assert!(outcomes[2].is_success());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("b.fq")).unwrap(),
            "@g\nAC\n+\nII\n"
        );
    }
}
