use clap::Args;
use serde_json::Value;

use shareval_core::session::EvaluationSession;
use shareval_core::tax::derivation::derive_taxes;

use super::tag_warnings;
use super::projection::GrowthArgs;
use super::valuation::{load_request, RequestArgs};

/// Arguments for taxes at a projection horizon
#[derive(Args)]
pub struct FutureTaxArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub growth: GrowthArgs,
}

pub fn run_taxes(args: RequestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args)?;
    let current = request.evaluate()?;
    let mut taxes = derive_taxes(
        &current.result,
        request.owned_shares,
        request.financials.par_value,
    )?;
    let mut warnings = tag_warnings("valuation", &current.warnings);
    warnings.append(&mut taxes.warnings);
    taxes.warnings = warnings;
    Ok(serde_json::to_value(taxes)?)
}

/// Current taxes, taxes at the horizon, and the change between them.
pub fn run_future_taxes(args: FutureTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args.request)?;

    let mut session = EvaluationSession::new();
    let valuation = session.evaluate(request)?;
    let projection = session.project(args.growth.growth_rate, args.growth.years)?;
    let current = session.current_taxes()?;
    let future = session.future_taxes()?;
    let comparison = session.tax_comparison()?;

    let mut warnings = tag_warnings("valuation", &valuation.warnings);
    warnings.extend(tag_warnings("projection", &projection.warnings));
    warnings.extend(tag_warnings("current taxes", &current.warnings));
    warnings.extend(tag_warnings("future taxes", &future.warnings));

    Ok(serde_json::json!({
        "result": comparison,
        "current_taxes": current.result,
        "future_taxes": future.result,
        "growth_rate_pct": args.growth.growth_rate,
        "years": args.growth.years,
        "methodology": "Illustrative taxes on the current and projected stake value",
        "warnings": warnings,
    }))
}
