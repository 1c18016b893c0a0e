use serde::{Deserialize, Serialize};

use crate::types::{ComputationOutput, Shares};
use crate::ShareValResult;

use super::engine::{evaluate, CompanyFinancials, ValuationResult};
use super::method::ValuationMethod;

/// Everything needed to run one valuation, in the shape it is saved and reloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(flatten)]
    pub financials: CompanyFinancials,
    /// Shares held by the subject shareholder
    pub owned_shares: Shares,
    #[serde(default)]
    pub method: ValuationMethod,
}

impl EvaluationRequest {
    pub fn evaluate(&self) -> ShareValResult<ComputationOutput<ValuationResult>> {
        evaluate(&self.financials, self.method, self.owned_shares)
    }
}
