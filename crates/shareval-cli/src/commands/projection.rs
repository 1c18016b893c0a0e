use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use shareval_core::projection::growth::{run_projection, ProjectionRequest};
use shareval_core::projection::sweep::{self, SweepRequest};
use shareval_core::session::EvaluationSession;

use super::tag_warnings;
use super::valuation::{load_request, RequestArgs};

/// Constant growth assumption applied to equity and earnings
#[derive(Args)]
pub struct GrowthArgs {
    /// Annual growth rate in percent (e.g. 10 for 10%)
    #[arg(long, default_value = "10", allow_hyphen_values = true)]
    pub growth_rate: Decimal,

    /// Projection horizon in years
    #[arg(long, default_value = "5")]
    pub years: u32,
}

/// Arguments for a growth projection
#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub growth: GrowthArgs,

    /// Report current-vs-projected changes instead of the projected valuation
    #[arg(long)]
    pub compare: bool,
}

/// Arguments for a growth-rate × horizon sweep
#[derive(Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Comma-separated growth rates in percent (default 5,10,15,20,25)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub rates: Option<Vec<Decimal>>,

    /// Longest horizon in years; every year from 1 is projected
    #[arg(long, default_value = "5")]
    pub years: u32,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.request)?;

    if !args.compare {
        let input = ProjectionRequest {
            request,
            growth_rate_pct: args.growth.growth_rate,
            years: args.growth.years,
        };
        let result = run_projection(&input)?;
        return Ok(serde_json::to_value(result)?);
    }

    let mut session = EvaluationSession::new();
    let valuation = session.evaluate(request)?;
    let projection = session.project(args.growth.growth_rate, args.growth.years)?;
    let comparison = session.projection_comparison()?;

    let mut warnings = tag_warnings("valuation", &valuation.warnings);
    warnings.extend(tag_warnings("projection", &projection.warnings));

    Ok(serde_json::json!({
        "result": comparison,
        "methodology": projection.methodology,
        "warnings": warnings,
    }))
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = SweepRequest {
        request: load_request(&args.request)?,
        growth_rates: args.rates,
        horizon_years: args.years,
    };
    let result = sweep::run_sweep(&input)?;
    Ok(serde_json::to_value(result)?)
}
