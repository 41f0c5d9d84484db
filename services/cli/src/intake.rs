use crate::infra::InMemoryCandidateStore;
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talent_intake::error::AppError;
use talent_intake::workflows::intake::{
    validate_candidate, Candidate, CandidateInput, CandidateIntakeService, CandidateRepository,
    IntakeError,
};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// JSON file holding one candidate object or an array of them; `-` reads stdin
    pub(crate) input: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Submissions {
    Batch(Vec<CandidateInput>),
    Single(Box<CandidateInput>),
}

pub(crate) fn read_submissions(path: &Path) -> Result<Vec<CandidateInput>, AppError> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };
    parse_submissions(&raw)
}

pub(crate) fn parse_submissions(raw: &str) -> Result<Vec<CandidateInput>, AppError> {
    Ok(match serde_json::from_str(raw)? {
        Submissions::Batch(inputs) => inputs,
        Submissions::Single(input) => vec![*input],
    })
}

/// Outcome of pushing a batch through the intake service, in input order.
#[derive(Debug, Default)]
pub(crate) struct SubmitReport {
    pub(crate) stored: Vec<Candidate>,
    pub(crate) failures: Vec<(usize, IntakeError)>,
}

impl SubmitReport {
    fn total(&self) -> usize {
        self.stored.len() + self.failures.len()
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::Rejected {
                failed: self.failures.len(),
                total: self.total(),
            })
        }
    }
}

/// Records are submitted one after another; a failure does not stop the rest of the batch.
pub(crate) async fn submit_all<R>(
    service: &CandidateIntakeService<R>,
    inputs: Vec<CandidateInput>,
) -> SubmitReport
where
    R: CandidateRepository + 'static,
{
    let mut report = SubmitReport::default();
    for (index, input) in inputs.into_iter().enumerate() {
        match service.add_candidate(input).await {
            Ok(candidate) => report.stored.push(candidate),
            Err(err) => {
                warn!(index, error = %err, "candidate record rejected");
                report.failures.push((index, err));
            }
        }
    }
    report
}

pub(crate) async fn run_submit(args: InputArgs) -> Result<(), AppError> {
    let inputs = read_submissions(&args.input)?;
    let service = CandidateIntakeService::new(Arc::new(InMemoryCandidateStore::default()));

    let report = submit_all(&service, inputs).await;
    for candidate in &report.stored {
        println!("{}", serde_json::to_string_pretty(candidate)?);
    }
    for (index, err) in &report.failures {
        eprintln!("record {index}: {err}");
    }

    info!(
        stored = report.stored.len(),
        rejected = report.failures.len(),
        "submission batch finished"
    );
    report.into_result()
}

/// One line per record: `ok`, or the offending field path and message.
pub(crate) fn verdicts(inputs: &[CandidateInput]) -> Vec<Result<(), String>> {
    inputs
        .iter()
        .map(|input| validate_candidate(input).map_err(|err| format!("{}: {}", err.field(), err)))
        .collect()
}

pub(crate) fn run_validate(args: InputArgs) -> Result<(), AppError> {
    let inputs = read_submissions(&args.input)?;
    let verdicts = verdicts(&inputs);

    let mut failed = 0;
    for verdict in &verdicts {
        match verdict {
            Ok(()) => println!("ok"),
            Err(line) => {
                failed += 1;
                println!("{line}");
            }
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(AppError::Rejected {
            failed,
            total: verdicts.len(),
        })
    }
}
