use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ShareValError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Shares};
use crate::valuation::engine::{validate_financials, CompanyFinancials, ValuationResult};
use crate::valuation::method::ValuationMethod;
use crate::valuation::request::EvaluationRequest;
use crate::ShareValResult;

use super::growth::project;

/// Growth rates swept when the caller does not supply any.
pub const DEFAULT_SWEEP_RATES: [Decimal; 5] = [dec!(5), dec!(10), dec!(15), dec!(20), dec!(25)];

/// Projected values over a grid of growth rates and horizons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSweep {
    pub growth_rates: Vec<Percent>,
    /// Horizons 1..=N
    pub years: Vec<u32>,
    /// `final_values[i][j]` = final per-share value at `growth_rates[i]` after `years[j]`
    pub final_values: Vec<Vec<Money>>,
    /// Owned-stake values on the same grid
    pub owned_values: Vec<Vec<Money>>,
}

/// Evaluation request plus the sweep grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRequest {
    #[serde(flatten)]
    pub request: EvaluationRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rates: Option<Vec<Percent>>,
    pub horizon_years: u32,
}

/// Project a valuation at every growth rate for every horizon up to `horizon_years`.
///
/// A grid point that fails to project is recorded as a warning and left at
/// zero, so one bad rate does not discard the whole grid.
pub fn growth_sweep(
    valuation: &ValuationResult,
    financials: &CompanyFinancials,
    owned_shares: Shares,
    method: ValuationMethod,
    growth_rates: &[Percent],
    horizon_years: u32,
) -> ShareValResult<ComputationOutput<GrowthSweep>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_financials(financials, owned_shares)?;
    if growth_rates.is_empty() {
        return Err(ShareValError::invalid(
            "growth_rates",
            "At least one growth rate is required",
        ));
    }
    if horizon_years < 1 {
        return Err(ShareValError::invalid(
            "horizon_years",
            "Horizon must be at least one year",
        ));
    }

    let years: Vec<u32> = (1..=horizon_years).collect();
    let mut final_values = Vec::with_capacity(growth_rates.len());
    let mut owned_values = Vec::with_capacity(growth_rates.len());

    for rate in growth_rates {
        let mut final_row = Vec::with_capacity(years.len());
        let mut owned_row = Vec::with_capacity(years.len());
        for year in &years {
            match project(valuation, financials, owned_shares, method, *rate, *year) {
                Ok(out) => {
                    final_row.push(out.result.valuation.final_value);
                    owned_row.push(out.result.valuation.owned_value);
                }
                Err(e) => {
                    warnings.push(format!("Projection failed at ({rate}%, {year}y): {e}"));
                    final_row.push(Decimal::ZERO);
                    owned_row.push(Decimal::ZERO);
                }
            }
        }
        final_values.push(final_row);
        owned_values.push(owned_row);
    }

    log::debug!(
        "swept {} growth rates over {horizon_years} years ({} failures)",
        growth_rates.len(),
        warnings.len()
    );

    let output = GrowthSweep {
        growth_rates: growth_rates.to_vec(),
        years,
        final_values,
        owned_values,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Growth-rate × horizon projection grid",
        &serde_json::json!({
            "growth_rates": growth_rates,
            "horizon_years": horizon_years,
            "method": method,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Evaluate a request and sweep it, falling back to the default growth rates.
pub fn run_sweep(input: &SweepRequest) -> ShareValResult<ComputationOutput<GrowthSweep>> {
    let current = input.request.evaluate()?;
    let rates = input
        .growth_rates
        .clone()
        .unwrap_or_else(|| DEFAULT_SWEEP_RATES.to_vec());
    growth_sweep(
        &current.result,
        &input.request.financials,
        input.request.owned_shares,
        input.request.method,
        &rates,
        input.horizon_years,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::engine::evaluate;

    fn sample_financials() -> CompanyFinancials {
        CompanyFinancials {
            total_equity: dec!(1002804000),
            net_income_1: dec!(386650000),
            net_income_2: dec!(163401000),
            net_income_3: dec!(75794000),
            total_shares: 4000,
            par_value: dec!(5000),
            interest_rate_pct: dec!(10),
        }
    }

    #[test]
    fn test_grid_shape() {
        let f = sample_financials();
        let v = evaluate(&f, ValuationMethod::General, 2000).unwrap().result;
        let out = growth_sweep(&v, &f, 2000, ValuationMethod::General, &DEFAULT_SWEEP_RATES, 5)
            .unwrap();
        let grid = &out.result;
        assert_eq!(grid.years, vec![1, 2, 3, 4, 5]);
        assert_eq!(grid.final_values.len(), 5);
        assert!(grid.final_values.iter().all(|row| row.len() == 5));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_cells_match_single_projection() {
        let f = sample_financials();
        let v = evaluate(&f, ValuationMethod::RealEstateHeavy, 2000).unwrap().result;
        let out = growth_sweep(&v, &f, 2000, ValuationMethod::RealEstateHeavy, &[dec!(15)], 3)
            .unwrap();
        let direct = project(&v, &f, 2000, ValuationMethod::RealEstateHeavy, dec!(15), 3)
            .unwrap()
            .result;
        assert_eq!(out.result.final_values[0][2], direct.valuation.final_value);
        assert_eq!(out.result.owned_values[0][2], direct.valuation.owned_value);
    }

    #[test]
    fn test_rows_increase_with_horizon_and_rate() {
        let f = sample_financials();
        let v = evaluate(&f, ValuationMethod::General, 2000).unwrap().result;
        let out = growth_sweep(&v, &f, 2000, ValuationMethod::General, &DEFAULT_SWEEP_RATES, 4)
            .unwrap();
        let grid = &out.result.final_values;
        for row in grid {
            assert!(row.windows(2).all(|w| w[1] > w[0]));
        }
        for col in 0..4 {
            assert!(grid.windows(2).all(|rows| rows[1][col] > rows[0][col]));
        }
    }

    #[test]
    fn test_bad_rate_recorded_as_warning() {
        let f = sample_financials();
        let v = evaluate(&f, ValuationMethod::General, 2000).unwrap().result;
        let out = growth_sweep(&v, &f, 2000, ValuationMethod::General, &[dec!(-150), dec!(10)], 2)
            .unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.result.final_values[0], vec![Decimal::ZERO, Decimal::ZERO]);
        assert!(out.result.final_values[1][0] > Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_cells_become_warnings() {
        let f = CompanyFinancials {
            total_equity: dec!(1000000000000),
            net_income_1: dec!(100000000000),
            net_income_2: dec!(100000000000),
            net_income_3: dec!(100000000000),
            total_shares: 1000,
            par_value: dec!(5000),
            interest_rate_pct: dec!(10),
        };
        let v = evaluate(&f, ValuationMethod::General, 500).unwrap().result;
        let out = growth_sweep(&v, &f, 500, ValuationMethod::General, &[dec!(100), dec!(10)], 60)
            .unwrap();
        let grid = &out.result;

        assert!(!out.warnings.is_empty());
        assert!(out.warnings.iter().all(|w| w.contains("(100%")));
        assert_eq!(grid.final_values[0][59], Decimal::ZERO);
        assert_eq!(grid.owned_values[0][59], Decimal::ZERO);
        assert!(grid.final_values[0][0] > Decimal::ZERO);
        assert!(grid.final_values[1].iter().all(|v| *v > Decimal::ZERO));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let f = sample_financials();
        let v = evaluate(&f, ValuationMethod::General, 2000).unwrap().result;
        assert!(growth_sweep(&v, &f, 2000, ValuationMethod::General, &[], 5).is_err());
        assert!(growth_sweep(&v, &f, 2000, ValuationMethod::General, &[dec!(5)], 0).is_err());
    }

    #[test]
    fn test_run_sweep_uses_default_rates() {
        let input = SweepRequest {
            request: EvaluationRequest {
                company_name: None,
                financials: sample_financials(),
                owned_shares: 2000,
                method: ValuationMethod::General,
            },
            growth_rates: None,
            horizon_years: 3,
        };
        let out = run_sweep(&input).unwrap();
        assert_eq!(out.result.growth_rates, DEFAULT_SWEEP_RATES.to_vec());
        assert_eq!(out.result.years.len(), 3);
    }
}
