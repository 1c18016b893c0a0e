use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ShareValError;
use crate::types::{Money, Percent};
use crate::ShareValResult;
use crate::valuation::engine::{CompanyFinancials, ValuationResult};

use super::growth::ProjectionResult;

/// One figure today and at the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    pub current: Money,
    pub projected: Money,
    pub change: Money,
    /// Change relative to the current figure, in percent; `None` when the
    /// current figure is zero or the ratio is out of decimal range
    pub change_pct: Option<Percent>,
}

impl ValueChange {
    fn between(current: Money, projected: Money) -> ShareValResult<Self> {
        let change = projected
            .checked_sub(current)
            .ok_or_else(|| ShareValError::overflow("Projected change"))?;
        let change_pct = if current.is_zero() {
            None
        } else {
            change
                .checked_div(current.abs())
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
        };
        Ok(ValueChange {
            current,
            projected,
            change,
            change_pct,
        })
    }
}

/// Side-by-side view of a valuation and its projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionComparison {
    pub growth_rate_pct: Percent,
    pub years: u32,
    pub total_equity: ValueChange,
    pub weighted_income: ValueChange,
    pub net_asset_per_share: ValueChange,
    pub income_value: ValueChange,
    pub final_value: ValueChange,
    pub total_value: ValueChange,
    pub owned_value: ValueChange,
}

pub fn compare_projection(
    financials: &CompanyFinancials,
    current: &ValuationResult,
    projected: &ProjectionResult,
) -> ShareValResult<ProjectionComparison> {
    let future = &projected.valuation;
    Ok(ProjectionComparison {
        growth_rate_pct: projected.growth_rate_pct,
        years: projected.years,
        total_equity: ValueChange::between(financials.total_equity, projected.projected_equity)?,
        weighted_income: ValueChange::between(
            current.weighted_income,
            projected.projected_weighted_income,
        )?,
        net_asset_per_share: ValueChange::between(
            current.net_asset_per_share,
            future.net_asset_per_share,
        )?,
        income_value: ValueChange::between(current.income_value, future.income_value)?,
        final_value: ValueChange::between(current.final_value, future.final_value)?,
        total_value: ValueChange::between(current.total_value, future.total_value)?,
        owned_value: ValueChange::between(current.owned_value, future.owned_value)?,
    })
}

impl ProjectionComparison {
    /// Whether every compared figure is unchanged, as happens at a zero horizon.
    pub fn is_unchanged(&self) -> bool {
        [
            &self.total_equity,
            &self.weighted_income,
            &self.net_asset_per_share,
            &self.income_value,
            &self.final_value,
            &self.total_value,
            &self.owned_value,
        ]
        .iter()
        .all(|c| c.change == Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::growth::project;
    use crate::valuation::engine::evaluate;
    use crate::valuation::method::ValuationMethod;

    fn sample_financials() -> CompanyFinancials {
        CompanyFinancials {
            total_equity: dec!(1000000),
            net_income_1: dec!(600000),
            net_income_2: dec!(600000),
            net_income_3: dec!(600000),
            total_shares: 100,
            par_value: dec!(5000),
            interest_rate_pct: dec!(10),
        }
    }

    #[test]
    fn test_ten_percent_for_one_year() {
        let f = sample_financials();
        let current = evaluate(&f, ValuationMethod::General, 40).unwrap().result;
        let projected = project(&current, &f, 40, ValuationMethod::General, dec!(10), 1)
            .unwrap()
            .result;
        let cmp = compare_projection(&f, &current, &projected).unwrap();

        assert_eq!(cmp.total_equity.projected, dec!(1100000));
        assert_eq!(cmp.total_equity.change, dec!(100000));
        assert_eq!(cmp.total_equity.change_pct, Some(dec!(10)));
        assert_eq!(cmp.final_value.change_pct, Some(dec!(10)));
        assert_eq!(cmp.years, 1);
        assert!(!cmp.is_unchanged());
    }

    #[test]
    fn test_zero_horizon_is_unchanged() {
        let f = sample_financials();
        let current = evaluate(&f, ValuationMethod::RealEstateHeavy, 40).unwrap().result;
        let projected = project(&current, &f, 40, ValuationMethod::RealEstateHeavy, dec!(10), 0)
            .unwrap()
            .result;
        assert!(compare_projection(&f, &current, &projected)
            .unwrap()
            .is_unchanged());
    }

    #[test]
    fn test_zero_base_has_no_percentage() {
        let change = ValueChange::between(Decimal::ZERO, dec!(5)).unwrap();
        assert_eq!(change.change, dec!(5));
        assert!(change.change_pct.is_none());
    }

    #[test]
    fn test_negative_base_percentage_uses_magnitude() {
        let change = ValueChange::between(dec!(-100), dec!(-50)).unwrap();
        assert_eq!(change.change_pct, Some(dec!(50)));
    }

    #[test]
    fn test_change_out_of_range_is_reported() {
        let max = Decimal::MAX;
        let err = ValueChange::between(-max, max).unwrap_err();
        assert!(matches!(err, ShareValError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_unbounded_percentage_is_none() {
        let change = ValueChange::between(dec!(0.0000000000000000000000000001), dec!(1)).unwrap();
        assert!(change.change_pct.is_none());
    }
}
