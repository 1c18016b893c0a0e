use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ShareValError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Shares};
use crate::ShareValResult;

use super::method::ValuationMethod;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recency weights for the three most recent years of net income.
const INCOME_WEIGHTS: [Decimal; 3] = [dec!(3), dec!(2), dec!(1)];
const INCOME_WEIGHT_TOTAL: Decimal = dec!(6);

/// Share of weighted income treated as the excess-earnings base.
const EXCESS_EARNINGS_SHARE: Decimal = dec!(0.5);

/// Fixed-period annuity factor used to capitalise excess earnings.
pub const ANNUITY_FACTOR: Decimal = dec!(3.7908);

/// Range of capitalization rates the statutory tables contemplate.
const TYPICAL_RATE_MIN: Decimal = dec!(1);
const TYPICAL_RATE_MAX: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Book figures for the company being valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    /// Total shareholders' equity (book value)
    pub total_equity: Money,
    /// Net income for the most recent year
    pub net_income_1: Money,
    /// Net income two years back
    pub net_income_2: Money,
    /// Net income three years back
    pub net_income_3: Money,
    /// Total issued shares
    pub total_shares: Shares,
    /// Par value per share, the acquisition cost basis for transfer gains
    pub par_value: Money,
    /// Capitalization interest rate in percentage points (10 = 10%)
    pub interest_rate_pct: Percent,
}

impl CompanyFinancials {
    /// 3:2:1 recency-weighted average of the three net income figures.
    pub fn weighted_income(&self) -> ShareValResult<Money> {
        let incomes = [self.net_income_1, self.net_income_2, self.net_income_3];
        let mut weighted = Decimal::ZERO;
        for (income, weight) in incomes.iter().zip(INCOME_WEIGHTS.iter()) {
            weighted = income
                .checked_mul(*weight)
                .and_then(|term| weighted.checked_add(term))
                .ok_or_else(|| ShareValError::overflow("Weighted net income"))?;
        }
        Ok(weighted / INCOME_WEIGHT_TOTAL)
    }
}

/// Per-share valuation of the company and the subject shareholder's stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub method: ValuationMethod,
    pub method_label: String,
    pub net_asset_per_share: Money,
    /// Capitalised excess earnings per share, never negative
    pub goodwill: Money,
    pub asset_value_with_goodwill: Money,
    pub income_value: Money,
    pub final_value: Money,
    pub total_value: Money,
    pub owned_value: Money,
    /// Final value as a rounded percentage of net asset value; `None` when
    /// net asset value is zero
    pub increase_percentage: Option<Decimal>,
    /// 3:2:1 weighted net income, carried forward for projections
    pub weighted_income: Money,
    pub total_shares: Shares,
    pub owned_shares: Shares,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value the company's shares under the selected blend method.
pub fn evaluate(
    financials: &CompanyFinancials,
    method: ValuationMethod,
    owned_shares: Shares,
) -> ShareValResult<ComputationOutput<ValuationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_financials(financials, owned_shares)?;
    input_warnings(financials, &mut warnings);

    let weighted_income = financials.weighted_income()?;
    let result = appraise(
        financials.total_equity,
        weighted_income,
        financials,
        method,
        owned_shares,
        &mut warnings,
    )?;

    log::debug!(
        "evaluated {} shares with {:?}: final {} per share, owned {}",
        financials.total_shares,
        method,
        result.final_value,
        result.owned_value
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Statutory unlisted share valuation (3:2:1 weighted earnings, capitalised goodwill)",
        &serde_json::json!({
            "financials": financials,
            "method": method,
            "owned_shares": owned_shares,
            "annuity_factor": ANNUITY_FACTOR,
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Reject inputs the formulas cannot handle.
pub(crate) fn validate_financials(
    financials: &CompanyFinancials,
    owned_shares: Shares,
) -> ShareValResult<()> {
    if financials.interest_rate_pct <= Decimal::ZERO {
        return Err(ShareValError::invalid(
            "interest_rate_pct",
            "Capitalization rate must be positive",
        ));
    }
    if financials.total_shares < 1 {
        return Err(ShareValError::invalid(
            "total_shares",
            "At least one share must be issued",
        ));
    }
    if owned_shares > financials.total_shares {
        return Err(ShareValError::invalid(
            "owned_shares",
            format!(
                "Owned shares ({owned_shares}) exceed issued shares ({})",
                financials.total_shares
            ),
        ));
    }
    if financials.par_value < Decimal::ZERO {
        return Err(ShareValError::invalid(
            "par_value",
            "Par value cannot be negative",
        ));
    }
    Ok(())
}

fn input_warnings(financials: &CompanyFinancials, warnings: &mut Vec<String>) {
    if financials.total_equity < Decimal::ZERO {
        warnings.push(format!(
            "Total equity is negative ({}); net asset value per share will be negative",
            financials.total_equity
        ));
    }
    let rate = financials.interest_rate_pct;
    if rate < TYPICAL_RATE_MIN || rate > TYPICAL_RATE_MAX {
        warnings.push(format!(
            "Capitalization rate {rate}% is outside the usual 1–20% range"
        ));
    }
}

/// Per-share valuation from an equity figure and an already-weighted income.
///
/// Used by both the current valuation and the projection so the two paths
/// cannot drift apart. Any figure that leaves the decimal range is reported
/// as `FinancialImpossibility`.
pub(crate) fn appraise(
    total_equity: Money,
    weighted_income: Money,
    financials: &CompanyFinancials,
    method: ValuationMethod,
    owned_shares: Shares,
    warnings: &mut Vec<String>,
) -> ShareValResult<ValuationResult> {
    let shares = Decimal::from(financials.total_shares);
    let rate = financials.interest_rate_pct;

    // Dividing by at least one share cannot overflow
    let net_asset_per_share = total_equity / shares;
    let weighted_income_per_share = weighted_income / shares;

    let equity_return = total_equity
        .checked_mul(rate / dec!(100))
        .ok_or_else(|| ShareValError::overflow("Required return on equity"))?
        / shares;
    let goodwill = (weighted_income_per_share * EXCESS_EARNINGS_SHARE)
        .checked_sub(equity_return)
        .and_then(|excess| excess.checked_mul(ANNUITY_FACTOR))
        .ok_or_else(|| ShareValError::overflow("Goodwill"))?
        .max(Decimal::ZERO);

    let asset_value_with_goodwill = net_asset_per_share
        .checked_add(goodwill)
        .ok_or_else(|| ShareValError::overflow("Asset value with goodwill"))?;
    let income_value = dec!(100)
        .checked_div(rate)
        .and_then(|multiple| weighted_income_per_share.checked_mul(multiple))
        .ok_or_else(|| ShareValError::overflow("Income value"))?;

    let final_value = method.blend(net_asset_per_share, asset_value_with_goodwill, income_value);
    let total_value = final_value
        .checked_mul(shares)
        .ok_or_else(|| ShareValError::overflow("Total value"))?;
    let owned_value = final_value
        .checked_mul(Decimal::from(owned_shares))
        .ok_or_else(|| ShareValError::overflow("Owned value"))?;

    let increase_percentage = if net_asset_per_share.is_zero() {
        warnings.push(
            "Net asset value per share is zero; increase percentage is undefined".into(),
        );
        None
    } else {
        let ratio = final_value
            .checked_div(net_asset_per_share)
            .and_then(|r| r.checked_mul(dec!(100)))
            .ok_or_else(|| ShareValError::overflow("Increase percentage"))?;
        Some(ratio.round())
    };

    if final_value < Decimal::ZERO {
        warnings.push(format!(
            "Final value per share is negative ({final_value}); derived taxes will be negative"
        ));
    }

    Ok(ValuationResult {
        method,
        method_label: method.label().to_string(),
        net_asset_per_share,
        goodwill,
        asset_value_with_goodwill,
        income_value,
        final_value,
        total_value,
        owned_value,
        increase_percentage,
        weighted_income,
        total_shares: financials.total_shares,
        owned_shares,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

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
    fn test_weighted_income_three_two_one() {
        let f = sample_financials();
        // (1159950000 + 326802000 + 75794000) / 6 = 1562546000 / 6
        assert_eq!(f.weighted_income().unwrap(), dec!(1562546000) / dec!(6));
    }

    #[test]
    fn test_net_asset_per_share() {
        let out = evaluate(&sample_financials(), ValuationMethod::General, 2000).unwrap();
        assert_eq!(out.result.net_asset_per_share, dec!(250701));
    }

    #[test]
    fn test_goodwill_positive_for_sample() {
        let out = evaluate(&sample_financials(), ValuationMethod::General, 2000).unwrap();
        let r = &out.result;
        // income/share = 65106.083..., half = 32553.041..., return = 25070.1
        let per_share = dec!(1562546000) / dec!(6) / dec!(4000);
        let expected = (per_share * dec!(0.5) - dec!(25070.1)) * dec!(3.7908);
        assert_eq!(r.goodwill, expected);
        assert!(r.goodwill > Decimal::ZERO);
        assert_eq!(r.asset_value_with_goodwill, dec!(250701) + expected);
    }

    #[test]
    fn test_goodwill_floored_on_losses() {
        let mut f = sample_financials();
        f.net_income_1 = dec!(-500000000);
        f.net_income_2 = dec!(-10000000);
        f.net_income_3 = dec!(1000000);
        let out = evaluate(&f, ValuationMethod::General, 2000).unwrap();
        assert_eq!(out.result.goodwill, Decimal::ZERO);
        assert!(out.result.weighted_income < Decimal::ZERO);
        // Income value goes negative, so the 80% floor binds
        assert_eq!(out.result.final_value, dec!(250701) * dec!(0.8));
    }

    #[test]
    fn test_income_value_capitalises_at_rate() {
        let out = evaluate(&sample_financials(), ValuationMethod::General, 2000).unwrap();
        let per_share = dec!(1562546000) / dec!(6) / dec!(4000);
        assert_eq!(out.result.income_value, per_share * dec!(10));
    }

    #[test]
    fn test_totals_scale_with_share_counts() {
        let out = evaluate(&sample_financials(), ValuationMethod::RealEstateHeavy, 1500).unwrap();
        let r = &out.result;
        assert_eq!(r.total_value, r.final_value * dec!(4000));
        assert_eq!(r.owned_value, r.final_value * dec!(1500));
        assert_eq!(r.owned_shares, 1500);
        assert_eq!(r.total_shares, 4000);
    }

    #[test]
    fn test_zero_interest_rate_rejected() {
        let mut f = sample_financials();
        f.interest_rate_pct = Decimal::ZERO;
        let err = evaluate(&f, ValuationMethod::General, 2000).unwrap_err();
        match err {
            ShareValError::InvalidInput { field, .. } => assert_eq!(field, "interest_rate_pct"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_shares_rejected() {
        let mut f = sample_financials();
        f.total_shares = 0;
        assert!(evaluate(&f, ValuationMethod::General, 0).is_err());
    }

    #[test]
    fn test_owned_exceeding_issued_rejected() {
        assert!(evaluate(&sample_financials(), ValuationMethod::General, 4001).is_err());
        assert!(evaluate(&sample_financials(), ValuationMethod::General, 4000).is_ok());
        assert!(evaluate(&sample_financials(), ValuationMethod::General, 0).is_ok());
    }

    #[test]
    fn test_negative_par_value_rejected() {
        let mut f = sample_financials();
        f.par_value = dec!(-1);
        assert!(evaluate(&f, ValuationMethod::General, 2000).is_err());
    }

    #[test]
    fn test_zero_equity_ratio_undefined() {
        let mut f = sample_financials();
        f.total_equity = Decimal::ZERO;
        let out = evaluate(&f, ValuationMethod::General, 2000).unwrap();
        assert!(out.result.increase_percentage.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("undefined")));
    }

    #[test]
    fn test_negative_equity_net_asset_only_warns() {
        let mut f = sample_financials();
        f.total_equity = dec!(-400000);
        let out = evaluate(&f, ValuationMethod::NetAssetOnly, 2000).unwrap();
        assert_eq!(out.result.final_value, dec!(-100));
        assert!(out.warnings.iter().any(|w| w.contains("Total equity is negative")));
        assert!(out.warnings.iter().any(|w| w.contains("Final value per share is negative")));
    }

    #[test]
    fn test_unusual_rate_warns() {
        let mut f = sample_financials();
        f.interest_rate_pct = dec!(25);
        let out = evaluate(&f, ValuationMethod::General, 2000).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("1–20%")));
    }

    #[test]
    fn test_method_label_carried() {
        let out = evaluate(&sample_financials(), ValuationMethod::NetAssetOnly, 2000).unwrap();
        assert_eq!(out.result.method_label, "Net asset value only");
        assert_eq!(out.result.method, ValuationMethod::NetAssetOnly);
    }

    #[test]
    fn test_income_overflow_is_reported() {
        let mut f = sample_financials();
        f.net_income_1 = dec!(70000000000000000000000000000);
        let err = evaluate(&f, ValuationMethod::General, 2000).unwrap_err();
        assert!(matches!(err, ShareValError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_tiny_rate_overflow_is_reported() {
        let mut f = sample_financials();
        f.interest_rate_pct = dec!(0.0000000000000000000000000001);
        let err = evaluate(&f, ValuationMethod::General, 2000).unwrap_err();
        assert!(matches!(err, ShareValError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_capitalised_income_overflow_is_reported() {
        // Weighted income of 1e28 on one share capitalised at 10% is 1e29
        let f = CompanyFinancials {
            total_equity: dec!(1000),
            net_income_1: dec!(10000000000000000000000000000),
            net_income_2: dec!(10000000000000000000000000000),
            net_income_3: dec!(10000000000000000000000000000),
            total_shares: 1,
            par_value: Decimal::ZERO,
            interest_rate_pct: dec!(10),
        };
        let err = evaluate(&f, ValuationMethod::General, 1).unwrap_err();
        match err {
            ShareValError::FinancialImpossibility(msg) => assert!(msg.contains("Income value")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_large_equity_within_range_evaluates() {
        let f = CompanyFinancials {
            total_equity: dec!(70000000000000000000000000000),
            net_income_1: Decimal::ZERO,
            net_income_2: Decimal::ZERO,
            net_income_3: Decimal::ZERO,
            total_shares: 1,
            par_value: Decimal::ZERO,
            interest_rate_pct: dec!(10),
        };
        let out = evaluate(&f, ValuationMethod::NetAssetOnly, 1).unwrap();
        assert_eq!(out.result.owned_value, dec!(70000000000000000000000000000));
    }
}
