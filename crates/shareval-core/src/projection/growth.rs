use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ShareValError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Shares};
use crate::valuation::engine::{appraise, validate_financials, CompanyFinancials, ValuationResult};
use crate::valuation::method::ValuationMethod;
use crate::valuation::request::EvaluationRequest;
use crate::ShareValResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Valuation re-run on compounded equity and earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    #[serde(flatten)]
    pub valuation: ValuationResult,
    /// Annual growth rate in percentage points
    pub growth_rate_pct: Percent,
    /// Projection horizon in whole years
    pub years: u32,
    pub projected_equity: Money,
    pub projected_weighted_income: Money,
}

/// An evaluation request plus the growth assumption to project it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    #[serde(flatten)]
    pub request: EvaluationRequest,
    pub growth_rate_pct: Percent,
    pub years: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project a valuation `years` ahead at a constant annual growth rate.
///
/// Equity and weighted income both grow by the same compounding factor; share
/// count, capitalization rate, stake and method are held constant. A zero
/// horizon reproduces the input valuation.
pub fn project(
    valuation: &ValuationResult,
    financials: &CompanyFinancials,
    owned_shares: Shares,
    method: ValuationMethod,
    growth_rate_pct: Percent,
    years: u32,
) -> ShareValResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_financials(financials, owned_shares)?;
    if valuation.total_shares != financials.total_shares {
        warnings.push(format!(
            "Valuation was computed for {} shares but financials state {}; using {}",
            valuation.total_shares, financials.total_shares, financials.total_shares
        ));
    }

    let factor = growth_factor(growth_rate_pct, years)?;
    let projected_equity = financials
        .total_equity
        .checked_mul(factor)
        .ok_or_else(|| ShareValError::overflow("Projected equity"))?;
    let projected_weighted_income = valuation
        .weighted_income
        .checked_mul(factor)
        .ok_or_else(|| ShareValError::overflow("Projected weighted income"))?;

    let projected = appraise(
        projected_equity,
        projected_weighted_income,
        financials,
        method,
        owned_shares,
        &mut warnings,
    )?;

    log::debug!(
        "projected {years}y at {growth_rate_pct}%: factor {factor}, final {} per share",
        projected.final_value
    );

    let result = ProjectionResult {
        valuation: projected,
        growth_rate_pct,
        years,
        projected_equity,
        projected_weighted_income,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound-growth projection of statutory share valuation",
        &serde_json::json!({
            "growth_rate_pct": growth_rate_pct,
            "years": years,
            "growth_factor": factor,
            "base_equity": financials.total_equity,
            "base_weighted_income": valuation.weighted_income,
            "method": method,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Evaluate a request and project the result in one step.
pub fn run_projection(
    input: &ProjectionRequest,
) -> ShareValResult<ComputationOutput<ProjectionResult>> {
    let current = input.request.evaluate()?;
    let mut projected = project(
        &current.result,
        &input.request.financials,
        input.request.owned_shares,
        input.request.method,
        input.growth_rate_pct,
        input.years,
    )?;

    let mut warnings: Vec<String> = current
        .warnings
        .iter()
        .map(|w| format!("[valuation] {w}"))
        .collect();
    warnings.append(&mut projected.warnings);
    projected.warnings = warnings;

    Ok(projected)
}

/// `(1 + g/100) ^ years`
pub fn growth_factor(growth_rate_pct: Percent, years: u32) -> ShareValResult<Decimal> {
    if growth_rate_pct < dec!(-100) {
        return Err(ShareValError::invalid(
            "growth_rate_pct",
            "Growth rate cannot be below -100%",
        ));
    }
    let base = Decimal::ONE + growth_rate_pct / dec!(100);
    base.checked_powi(i64::from(years)).ok_or_else(|| {
        ShareValError::FinancialImpossibility(format!(
            "Compounding {growth_rate_pct}% over {years} years overflows"
        ))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
