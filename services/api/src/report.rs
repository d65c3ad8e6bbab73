use crate::infra::parse_birth;
use clap::Args;
use serde_json::json;
use soulmatch::compatibility::{AnalysisResult, BirthRecord, CompatibilityEngine, TRAIT_SLOTS};
use soulmatch::error::AppError;
use soulmatch::workflows::batch::{BatchAnalyzer, BatchOutcome, BatchReport};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// First person as YYYY-MM-DD[THH],gender (e.g. 1995-05-15T14,male)
    #[arg(long, value_parser = parse_birth)]
    pub(crate) person1: BirthRecord,
    /// Second person as YYYY-MM-DD[THH],gender
    #[arg(long, value_parser = parse_birth)]
    pub(crate) person2: BirthRecord,
    /// Print the raw analysis as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with person1_*/person2_* columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print results as JSON lines instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        person1,
        person2,
        json,
    } = args;

    for (person, birth) in [(1, &person1), (2, &person2)] {
        if let Err(err) = birth.validate() {
            eprintln!("warning: person {person}: {err}; scoring anyway");
        }
    }

    let result = CompatibilityEngine::default().analyze(&person1, &person2);
    if json {
        println!("{}", render_json(&result));
    } else {
        print!("{}", render_analysis(&person1, &person2, &result));
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let report = BatchAnalyzer::from_path(&args.csv, &CompatibilityEngine::default())?;
    if args.json {
        for line in render_batch_json(&report) {
            println!("{line}");
        }
    } else {
        print!("{}", render_batch(&report));
    }
    Ok(())
}

fn render_json(result: &AnalysisResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

pub(crate) fn render_analysis(
    person1: &BirthRecord,
    person2: &BirthRecord,
    result: &AnalysisResult,
) -> String {
    let mut out = String::new();
    out.push_str("Compatibility analysis\n");
    out.push_str(&format!(
        "  Person 1: {:04}-{:02}-{:02} {:02}h ({}) pillars {:?}\n",
        person1.year,
        person1.month,
        person1.day,
        person1.hour,
        person1.gender,
        result.pillars_person1.as_array()
    ));
    out.push_str(&format!(
        "  Person 2: {:04}-{:02}-{:02} {:02}h ({}) pillars {:?}\n",
        person2.year,
        person2.month,
        person2.day,
        person2.hour,
        person2.gender,
        result.pillars_person2.as_array()
    ));
    out.push_str(&format!(
        "  Sky {:.2} | Earth {:.2}\n",
        result.sky_score, result.earth_score
    ));
    for (label, traits) in [
        ("Person 1", &result.trait_penalties_person1),
        ("Person 2", &result.trait_penalties_person2),
    ] {
        let fired: Vec<String> = (0..TRAIT_SLOTS)
            .filter(|slot| traits.slot(*slot) > 0.0)
            .map(|slot| format!("slot {slot}: -{:.1}", traits.slot(slot)))
            .collect();
        if !fired.is_empty() {
            out.push_str(&format!("  {label} penalties: {}\n", fired.join(", ")));
        }
    }
    out.push_str(&format!(
        "  Score {:.2} ({})\n  {}\n",
        result.compatibility_score,
        result.tier.label(),
        result.interpretation
    ));
    out
}

pub(crate) fn render_batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for row in &report.rows {
        let names = format!(
            "{} & {}",
            row.person1_name.as_deref().unwrap_or("?"),
            row.person2_name.as_deref().unwrap_or("?")
        );
        match &row.outcome {
            BatchOutcome::Scored(result) => out.push_str(&format!(
                "{:>4}  {:<32} {:>6.2}  {}\n",
                row.row,
                names,
                result.compatibility_score,
                result.tier.label()
            )),
            BatchOutcome::Rejected(reason) => out.push_str(&format!(
                "{:>4}  {:<32} rejected: {}\n",
                row.row, names, reason
            )),
        }
    }

    let summary = report.summary();
    out.push_str(&format!(
        "{} rows, {} scored, {} rejected",
        summary.total_rows, summary.scored, summary.rejected
    ));
    if let Some(average) = summary.average_score {
        out.push_str(&format!(", average {average:.2}"));
    }
    out.push('\n');
    out
}

fn render_batch_json(report: &BatchReport) -> Vec<String> {
    report
        .rows
        .iter()
        .map(|row| {
            let value = match &row.outcome {
                BatchOutcome::Scored(result) => json!({
                    "row": row.row,
                    "person1_name": row.person1_name,
                    "person2_name": row.person2_name,
                    "result": result,
                }),
                BatchOutcome::Rejected(reason) => json!({
                    "row": row.row,
                    "person1_name": row.person1_name,
                    "person2_name": row.person2_name,
                    "rejected": reason.to_string(),
                }),
            };
            value.to_string()
        })
        .chain(std::iter::once(json!({ "summary": report.summary() }).to_string()))
        .collect()
}
