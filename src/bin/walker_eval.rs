use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pointfoot_walker::batch::{evaluate_csv_file, write_summary_json};
use pointfoot_walker::{DynamicsEvaluator, Formulation, Mode, WalkerParams, WalkerState};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "walker-eval")]
#[command(about = "Evaluate point-foot walker dynamics or heel-strike impact")]
struct Cli {
    /// TOML file with k, m, mp, g, l, c and slope
    #[arg(long)]
    params: PathBuf,

    /// derivative (s) or impact (i)
    #[arg(long)]
    mode: String,

    /// passive or actuated
    #[arg(long, default_value = "passive")]
    formulation: String,

    /// Single state as q1,q2,q1dot,q2dot
    #[arg(long, allow_hyphen_values = true, conflicts_with = "input")]
    state: Option<String>,

    /// CSV of states with header q1,q2,q1dot,q2dot
    #[arg(long, requires = "output")]
    input: Option<PathBuf>,

    /// Output CSV for batch evaluation
    #[arg(long, conflicts_with = "state")]
    output: Option<PathBuf>,

    /// Optional JSON summary of a batch run
    #[arg(long, requires = "input")]
    summary: Option<PathBuf>,

    /// Fail on the first inf/NaN output instead of flagging it
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Debug, Serialize)]
struct SingleOutput {
    mode: Mode,
    formulation: Formulation,
    output: [f64; 4],
}

fn parse_state(raw: &str) -> Result<WalkerState> {
    let values = raw
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid state component {v:?}"))
        })
        .collect::<Result<Vec<f64>>>()?;
    let values: [f64; 4] = values
        .try_into()
        .map_err(|v: Vec<f64>| anyhow::anyhow!("state needs 4 components, got {}", v.len()))?;
    Ok(WalkerState::from(values))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mode: Mode = cli.mode.parse()?;
    let formulation: Formulation = cli.formulation.parse()?;
    let params = WalkerParams::from_toml_file(&cli.params)
        .with_context(|| format!("failed to load parameters: {}", cli.params.display()))?;
    let evaluator = DynamicsEvaluator::new(params)?.with_formulation(formulation);

    match (cli.state.as_deref(), cli.input.as_deref(), cli.output.as_deref()) {
        (Some(raw), None, _) => {
            let state = parse_state(raw)?;
            let output = if cli.strict {
                evaluator.evaluate_finite(state, mode)?
            } else {
                evaluator.evaluate(state, mode)?
            };
            let payload = SingleOutput {
                mode,
                formulation,
                output,
            };
            println!("{}", serde_json::to_string(&payload)?);
        }
        (None, Some(input), Some(output)) => {
            let summary = evaluate_csv_file(input, output, &evaluator, mode, cli.strict)
                .with_context(|| format!("batch evaluation of {} failed", input.display()))?;
            if let Some(path) = &cli.summary {
                write_summary_json(path, &summary)
                    .with_context(|| format!("failed to write summary: {}", path.display()))?;
            }
            println!(
                "Rows: {} | Degenerate: {} | Output: {}",
                summary.rows,
                summary.degenerate_rows,
                output.display()
            );
        }
        _ => bail!("provide either --state or --input with --output"),
    }

    Ok(())
}
