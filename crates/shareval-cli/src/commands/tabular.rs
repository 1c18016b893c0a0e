use clap::{Args, ValueEnum};
use serde_json::Value;
use std::fs;

use shareval_core::projection::growth::{run_projection, ProjectionRequest, ProjectionResult};
use shareval_core::tabular;
use shareval_core::tax::derivation::{derive_taxes, TaxDetail};
use shareval_core::valuation::engine::ValuationResult;
use shareval_core::valuation::request::EvaluationRequest;

use super::projection::GrowthArgs;
use super::valuation::{load_request, RequestArgs};
use crate::input;

/// Which record a spreadsheet file holds
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RecordKind {
    /// The evaluation inputs
    Request,
    /// The current valuation
    Valuation,
    /// The valuation at the projection horizon
    Projection,
    /// Taxes on the current valuation
    Taxes,
}

impl RecordKind {
    fn name(self) -> &'static str {
        match self {
            RecordKind::Request => "request",
            RecordKind::Valuation => "valuation",
            RecordKind::Projection => "projection",
            RecordKind::Taxes => "taxes",
        }
    }
}

/// Arguments for exporting a record to CSV
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub growth: GrowthArgs,

    /// Record to export
    #[arg(long, value_enum, default_value = "valuation")]
    pub kind: RecordKind,

    /// Destination CSV file
    #[arg(long)]
    pub out: String,
}

/// Arguments for reading a record back from CSV
#[derive(Args)]
pub struct ImportArgs {
    /// CSV file written by `export`
    #[arg(long)]
    pub file: String,

    /// Record the file holds
    #[arg(long, value_enum, default_value = "request")]
    pub kind: RecordKind,

    /// Re-run the valuation on an imported request
    #[arg(long)]
    pub evaluate: bool,
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.request)?;

    let (bytes, warnings) = match args.kind {
        RecordKind::Request => (tabular::to_csv(&request)?, Vec::new()),
        RecordKind::Valuation => {
            let out = request.evaluate()?;
            (tabular::to_csv(&out.result)?, out.warnings)
        }
        RecordKind::Projection => {
            let out = run_projection(&ProjectionRequest {
                request,
                growth_rate_pct: args.growth.growth_rate,
                years: args.growth.years,
            })?;
            (tabular::to_csv(&out.result)?, out.warnings)
        }
        RecordKind::Taxes => {
            let current = request.evaluate()?;
            let out = derive_taxes(
                &current.result,
                request.owned_shares,
                request.financials.par_value,
            )?;
            (tabular::to_csv(&out.result)?, out.warnings)
        }
    };

    fs::write(&args.out, &bytes)
        .map_err(|e| format!("Failed to write '{}': {}", args.out, e))?;

    log::debug!("wrote {} record to {}", args.kind.name(), args.out);
    Ok(serde_json::json!({
        "result": {
            "kind": args.kind.name(),
            "file": args.out,
            "bytes": bytes.len(),
        },
        "warnings": warnings,
    }))
}

pub fn run_import(args: ImportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.evaluate && !matches!(args.kind, RecordKind::Request) {
        return Err("--evaluate applies only to an imported request".into());
    }
    let file = input::file::open(&args.file)?;

    let value = match args.kind {
        RecordKind::Request => {
            let request: EvaluationRequest = tabular::from_reader(file)?;
            if args.evaluate {
                serde_json::to_value(request.evaluate()?)?
            } else {
                serde_json::to_value(request)?
            }
        }
        RecordKind::Valuation => {
            serde_json::to_value(tabular::from_reader::<ValuationResult, _>(file)?)?
        }
        RecordKind::Projection => {
            serde_json::to_value(tabular::from_reader::<ProjectionResult, _>(file)?)?
        }
        RecordKind::Taxes => serde_json::to_value(tabular::from_reader::<TaxDetail, _>(file)?)?,
    };

    Ok(value)
}
