use serde::{Deserialize, Serialize};

use crate::types::Money;

use super::derivation::TaxDetail;

/// One tax figure now and at the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxChange {
    pub current: Money,
    pub future: Money,
    pub change: Money,
}

impl TaxChange {
    fn between(current: Money, future: Money) -> Self {
        TaxChange {
            current,
            future,
            change: future - current,
        }
    }
}

/// Current-versus-future view of the three headline taxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxComparison {
    pub inheritance_tax: TaxChange,
    pub transfer_tax: TaxChange,
    pub total_liquidation_tax: TaxChange,
}

pub fn compare_taxes(current: &TaxDetail, future: &TaxDetail) -> TaxComparison {
    TaxComparison {
        inheritance_tax: TaxChange::between(current.inheritance_tax, future.inheritance_tax),
        transfer_tax: TaxChange::between(current.transfer_tax, future.transfer_tax),
        total_liquidation_tax: TaxChange::between(
            current.total_liquidation_tax,
            future.total_liquidation_tax,
        ),
    }
}
