//! CSV batch evaluation.
//!
//! Input rows are states with the header `q1,q2,q1dot,q2dot`. Every row is
//! evaluated with the same bound evaluator and mode, and written out as
//! `row,mode,y0,y1,y2,y3,degenerate`.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::dynamics::Formulation;
use crate::error::{WalkerError, WalkerResult};
use crate::evaluator::{is_degenerate, DynamicsEvaluator, Mode};
use crate::state::WalkerState;

pub const OUTPUT_HEADER: [&str; 7] = ["row", "mode", "y0", "y1", "y2", "y3", "degenerate"];

/// Counts reported after a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub mode: Mode,
    pub formulation: Formulation,
    pub rows: usize,
    pub degenerate_rows: usize,
}

fn fmt_f64(v: f64) -> String {
    // shortest representation that round-trips
    format!("{v:?}")
}

/// Evaluate every state in `input` and stream the results to `output`.
///
/// With `strict` set, the first degenerate row aborts the run with
/// [`WalkerError::NumericDegenerate`]; otherwise degenerate rows are written,
/// flagged and counted.
pub fn evaluate_csv<R: Read, W: Write>(
    input: R,
    output: W,
    evaluator: &DynamicsEvaluator,
    mode: Mode,
    strict: bool,
) -> WalkerResult<BatchSummary> {
    let mut rdr = csv::Reader::from_reader(input);
    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(OUTPUT_HEADER)?;

    info!(
        %mode,
        formulation = %evaluator.formulation(),
        strict,
        "starting batch evaluation"
    );

    let mut summary = BatchSummary {
        mode,
        formulation: evaluator.formulation(),
        rows: 0,
        degenerate_rows: 0,
    };

    for (row, record) in rdr.deserialize::<WalkerState>().enumerate() {
        let state = record?;
        let values = evaluator
            .evaluate(state, mode)
            .map_err(|err| match err {
                WalkerError::InvalidState { field, value } => WalkerError::InvalidState {
                    field: format!("row {row}: {field}"),
                    value,
                },
                other => other,
            })?;

        let degenerate = is_degenerate(&values);
        if degenerate {
            warn!(row, ?state, output = ?values, "degenerate output");
            if strict {
                return Err(WalkerError::NumericDegenerate {
                    mode,
                    output: values,
                });
            }
            summary.degenerate_rows += 1;
        }

        wtr.write_record([
            row.to_string(),
            mode.to_string(),
            fmt_f64(values[0]),
            fmt_f64(values[1]),
            fmt_f64(values[2]),
            fmt_f64(values[3]),
            degenerate.to_string(),
        ])?;
        summary.rows += 1;
    }

    wtr.flush()?;
    info!(
        rows = summary.rows,
        degenerate_rows = summary.degenerate_rows,
        "batch evaluation complete"
    );
    Ok(summary)
}

/// Batch-evaluate one CSV file into another.
pub fn evaluate_csv_file(
    input: &Path,
    output: &Path,
    evaluator: &DynamicsEvaluator,
    mode: Mode,
    strict: bool,
) -> WalkerResult<BatchSummary> {
    let reader = fs::File::open(input)?;
    let writer = fs::File::create(output)?;
    evaluate_csv(reader, writer, evaluator, mode, strict)
}

pub fn write_summary_json(path: &Path, summary: &BatchSummary) -> WalkerResult<()> {
    let payload = serde_json::to_string_pretty(summary)?;
    fs::write(path, payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WalkerParams;

    const STATES: &str = "q1,q2,q1dot,q2dot\n0.3,-0.3,0.0,0.0\n0.3,-0.3,1.0,0.0\n0.1,0.1,0.5,0.5\n";

    fn evaluator(mp: f64) -> DynamicsEvaluator {
        DynamicsEvaluator::new(WalkerParams::new(0.0, 1.0, mp, 9.81, 1.0, 0.0, 0.0)).unwrap()
    }

    fn run(input: &str, mp: f64, mode: Mode, strict: bool) -> (WalkerResult<BatchSummary>, String) {
        let mut out = Vec::new();
        let result = evaluate_csv(input.as_bytes(), &mut out, &evaluator(mp), mode, strict);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_batch_rows_and_header() {
        let (result, out) = run(STATES, 0.5, Mode::Derivative, false);
        let summary = result.unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.degenerate_rows, 0);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "row,mode,y0,y1,y2,y3,degenerate");
        assert!(lines[2].starts_with("1,derivative,1.0,0.0,"));
        assert!(lines[3].ends_with(",false"));
    }

    #[test]
    fn test_batch_matches_single_evaluation() {
        let (result, out) = run(STATES, 0.5, Mode::Impact, false);
        result.unwrap();

        let expected = evaluator(0.5)
            .evaluate(WalkerState::new(0.3, -0.3, 1.0, 0.0), Mode::Impact)
            .unwrap();
        let fields: Vec<&str> = out.lines().nth(2).unwrap().split(',').collect();
        for (i, value) in expected.iter().enumerate() {
            let parsed: f64 = fields[2 + i].parse().unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_batch_counts_degenerate_rows() {
        // mp = 0 with coincident legs hits the impact singularity
        let (result, out) = run(STATES, 0.0, Mode::Impact, false);
        let summary = result.unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.degenerate_rows, 1);
        assert!(out.lines().nth(3).unwrap().ends_with(",true"));
    }

    #[test]
    fn test_batch_strict_aborts() {
        let (result, _) = run(STATES, 0.0, Mode::Impact, true);
        assert!(matches!(
            result,
            Err(WalkerError::NumericDegenerate {
                mode: Mode::Impact,
                ..
            })
        ));
    }

    #[test]
    fn test_batch_rejects_non_finite_row() {
        let input = "q1,q2,q1dot,q2dot\n0.3,-0.3,0.0,0.0\n0.3,NaN,0.0,0.0\n";
        let (result, _) = run(input, 0.5, Mode::Derivative, false);
        match result {
            Err(WalkerError::InvalidState { field, .. }) => assert_eq!(field, "row 1: q2"),
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_rejects_malformed_row() {
        let input = "q1,q2,q1dot,q2dot\n0.3,-0.3,zero,0.0\n";
        let (result, _) = run(input, 0.5, Mode::Derivative, false);
        assert!(matches!(result, Err(WalkerError::Csv(_))));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = BatchSummary {
            mode: Mode::Impact,
            formulation: Formulation::Passive,
            rows: 2,
            degenerate_rows: 0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["mode"], "impact");
        assert_eq!(json["formulation"], "passive");
        assert_eq!(json["rows"], 2);
    }
}
