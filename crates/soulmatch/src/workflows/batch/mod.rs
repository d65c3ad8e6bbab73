//! Scores every couple listed in a CSV export.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::compatibility::{AnalysisResult, BirthRecord, CompatibilityEngine, ValidationError};

pub use parser::FieldError;

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read couples file: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid couples CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Why a single row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowRejection {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("person {person}: {source}")]
    Invalid {
        person: u8,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Scored(AnalysisResult),
    Rejected(RowRejection),
}

/// One data row; `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub row: usize,
    pub person1_name: Option<String>,
    pub person2_name: Option<String>,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
}

impl BatchReport {
    pub fn scored(&self) -> impl Iterator<Item = (&BatchRow, &AnalysisResult)> {
        self.rows.iter().filter_map(|row| match &row.outcome {
            BatchOutcome::Scored(result) => Some((row, result)),
            BatchOutcome::Rejected(_) => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = (&BatchRow, &RowRejection)> {
        self.rows.iter().filter_map(|row| match &row.outcome {
            BatchOutcome::Rejected(reason) => Some((row, reason)),
            BatchOutcome::Scored(_) => None,
        })
    }

    pub fn summary(&self) -> BatchSummary {
        let scores: Vec<f64> = self
            .scored()
            .map(|(_, result)| result.compatibility_score)
            .collect();
        let average_score = if scores.is_empty() {
            None
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        };
        BatchSummary {
            total_rows: self.rows.len(),
            scored: scores.len(),
            rejected: self.rows.len() - scores.len(),
            average_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub scored: usize,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
}

pub struct BatchAnalyzer;

impl BatchAnalyzer {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        engine: &CompatibilityEngine,
    ) -> Result<BatchReport, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, engine)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        engine: &CompatibilityEngine,
    ) -> Result<BatchReport, BatchImportError> {
        let mut report = BatchReport::default();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let row_number = index + 1;
            let (person1_name, person2_name) = row.names();
            let outcome = match row.partners() {
                Ok((person1, person2)) => score_pair(engine, &person1.birth, &person2.birth),
                Err(err) => BatchOutcome::Rejected(err.into()),
            };
            if let BatchOutcome::Rejected(reason) = &outcome {
                debug!(row = row_number, reason = %reason, "batch row rejected");
            }
            report.rows.push(BatchRow {
                row: row_number,
                person1_name,
                person2_name,
                outcome,
            });
        }

        let summary = report.summary();
        info!(
            total = summary.total_rows,
            scored = summary.scored,
            rejected = summary.rejected,
            "batch scoring finished"
        );
        Ok(report)
    }
}

fn score_pair(
    engine: &CompatibilityEngine,
    birth1: &BirthRecord,
    birth2: &BirthRecord,
) -> BatchOutcome {
    if let Err(source) = birth1.validate() {
        return BatchOutcome::Rejected(RowRejection::Invalid { person: 1, source });
    }
    if let Err(source) = birth2.validate() {
        return BatchOutcome::Rejected(RowRejection::Invalid { person: 2, source });
    }
    BatchOutcome::Scored(engine.analyze(birth1, birth2))
}
