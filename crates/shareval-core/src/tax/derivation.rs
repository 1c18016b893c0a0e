use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ShareValError;
use crate::types::{with_metadata, ComputationOutput, Money, Shares};
use crate::valuation::engine::ValuationResult;
use crate::ShareValResult;

// ---------------------------------------------------------------------------
// Flat illustrative rates
// ---------------------------------------------------------------------------

pub const INHERITANCE_TAX_RATE: Decimal = dec!(0.40);
pub const TRANSFER_TAX_RATE: Decimal = dec!(0.22);
pub const CORPORATE_TAX_RATE: Decimal = dec!(0.25);
/// Dividend tax on what the shareholder receives after corporate tax.
pub const DIVIDEND_TAX_RATE: Decimal = dec!(0.154);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Illustrative taxes on the subject shareholder's stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDetail {
    /// Gift / inheritance tax on the stake value
    pub inheritance_tax: Money,
    /// Capital-gains tax on a sale, zero when there is no gain
    pub transfer_tax: Money,
    /// Corporate-level tax on liquidation
    pub corporate_tax: Money,
    /// Dividend tax on the post-corporate-tax distribution
    pub liquidation_tax: Money,
    /// Cost basis: owned shares × par value
    pub acquisition_value: Money,
    /// Stake value less cost basis; may be negative
    pub transfer_profit: Money,
    /// Stake value left after corporate tax
    pub after_tax_value: Money,
    /// Corporate tax plus dividend tax
    pub total_liquidation_tax: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive gift, transfer, and liquidation-path taxes from a valuation.
pub fn derive_taxes(
    valuation: &ValuationResult,
    owned_shares: Shares,
    par_value: Money,
) -> ShareValResult<ComputationOutput<TaxDetail>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if par_value < Decimal::ZERO {
        return Err(ShareValError::invalid(
            "par_value",
            "Par value cannot be negative",
        ));
    }
    if owned_shares > valuation.total_shares {
        return Err(ShareValError::invalid(
            "owned_shares",
            format!(
                "Owned shares ({owned_shares}) exceed issued shares ({})",
                valuation.total_shares
            ),
        ));
    }
    if owned_shares != valuation.owned_shares {
        warnings.push(format!(
            "Owned shares ({owned_shares}) differ from the valuation's stake ({}); cost basis uses {owned_shares}",
            valuation.owned_shares
        ));
    }

    let owned_value = valuation.owned_value;
    if owned_value < Decimal::ZERO {
        warnings.push(format!(
            "Owned stake value is negative ({owned_value}); inheritance and liquidation taxes are negative"
        ));
    }

    let inheritance_tax = owned_value * INHERITANCE_TAX_RATE;

    let acquisition_value = par_value
        .checked_mul(Decimal::from(owned_shares))
        .ok_or_else(|| ShareValError::overflow("Acquisition value"))?;
    let transfer_profit = owned_value
        .checked_sub(acquisition_value)
        .ok_or_else(|| ShareValError::overflow("Transfer profit"))?;
    let transfer_tax = if transfer_profit > Decimal::ZERO {
        transfer_profit * TRANSFER_TAX_RATE
    } else {
        Decimal::ZERO
    };

    let corporate_tax = owned_value * CORPORATE_TAX_RATE;
    let after_tax_value = owned_value - corporate_tax;
    let liquidation_tax = after_tax_value * DIVIDEND_TAX_RATE;
    let total_liquidation_tax = corporate_tax + liquidation_tax;

    log::debug!(
        "taxes on stake {owned_value}: inheritance {inheritance_tax}, transfer {transfer_tax}, liquidation {total_liquidation_tax}"
    );

    let detail = TaxDetail {
        inheritance_tax,
        transfer_tax,
        corporate_tax,
        liquidation_tax,
        acquisition_value,
        transfer_profit,
        after_tax_value,
        total_liquidation_tax,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Illustrative flat-rate taxes (gift 40%, transfer 22%, corporate 25% + dividend 15.4%)",
        &serde_json::json!({
            "owned_value": owned_value,
            "owned_shares": owned_shares,
            "par_value": par_value,
            "inheritance_tax_rate": INHERITANCE_TAX_RATE,
            "transfer_tax_rate": TRANSFER_TAX_RATE,
            "corporate_tax_rate": CORPORATE_TAX_RATE,
            "dividend_tax_rate": DIVIDEND_TAX_RATE,
        }),
        warnings,
        elapsed,
        detail,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
