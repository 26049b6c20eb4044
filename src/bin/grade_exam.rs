// Exam grading CLI
//
// Purpose: grade one request file (answer key + student answers) and print
// the JSON report
// Usage: cargo run --features cli --bin grade_exam -- --request exam.json

use anyhow::Context;
use clap::Parser;
use exam_grader_rust::{ExamGrader, ExamReport, GradingConfig, GradingRequest, JsonFormatter};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "grade_exam", about = "Grade an exam request and print the JSON report")]
struct Args {
    /// Request JSON: `mode` (free_text | dual), `key` and `answers`
    #[arg(long)]
    request: PathBuf,

    /// Grading config JSON; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the grading scale
    #[arg(long, env = "GRADING_SCALE")]
    scale: Option<f64>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exam_grader_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GradingConfig::load(path)?,
        None => GradingConfig::default(),
    };
    if let Some(scale) = args.scale {
        config = config.with_scale(scale);
    }

    tracing::info!("Configuration:");
    tracing::info!("  scale: {}", config.scale);
    tracing::info!("  strategy: {:?}", config.strategy);
    tracing::info!("  free_text_policy: {:?}", config.free_text_policy);

    let grader = ExamGrader::new(config)?;

    let contents = fs::read_to_string(&args.request)
        .with_context(|| format!("Failed to read request: {:?}", args.request))?;
    let request: GradingRequest = serde_json::from_str(&contents)
        .with_context(|| "Failed to parse request JSON")?;

    let exam = grader.grade_request(&request)?;
    let report = ExamReport::from(&exam);

    let output = if args.compact {
        JsonFormatter::format_compact(&report)?
    } else {
        JsonFormatter::format(&report)?
    };
    println!("{}", output);

    Ok(())
}
