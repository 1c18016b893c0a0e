use crate::error::ShareValError;
use crate::projection::comparison::{compare_projection, ProjectionComparison};
use crate::projection::growth::{project, ProjectionResult};
use crate::tax::comparison::{compare_taxes, TaxComparison};
use crate::tax::derivation::{derive_taxes, TaxDetail};
use crate::types::{ComputationOutput, Percent};
use crate::valuation::engine::ValuationResult;
use crate::valuation::request::EvaluationRequest;
use crate::ShareValResult;

/// Results carried between the steps of one evaluation run.
///
/// The caller owns the session; it holds at most one valuation and at most one
/// projection. A new evaluation discards any projection of the previous one,
/// and a failed step leaves the session as it was.
#[derive(Debug, Clone, Default)]
pub struct EvaluationSession {
    request: Option<EvaluationRequest>,
    valuation: Option<ValuationResult>,
    projection: Option<ProjectionResult>,
}

impl EvaluationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> Option<&EvaluationRequest> {
        self.request.as_ref()
    }

    pub fn valuation(&self) -> Option<&ValuationResult> {
        self.valuation.as_ref()
    }

    pub fn projection(&self) -> Option<&ProjectionResult> {
        self.projection.as_ref()
    }

    /// Value the request and make it the session's current valuation.
    pub fn evaluate(
        &mut self,
        request: EvaluationRequest,
    ) -> ShareValResult<ComputationOutput<ValuationResult>> {
        let out = request.evaluate()?;
        self.request = Some(request);
        self.valuation = Some(out.result.clone());
        self.projection = None;
        Ok(out)
    }

    /// Project the current valuation and keep the projection.
    pub fn project(
        &mut self,
        growth_rate_pct: Percent,
        years: u32,
    ) -> ShareValResult<ComputationOutput<ProjectionResult>> {
        let (request, valuation) = self.current()?;
        let out = project(
            valuation,
            &request.financials,
            request.owned_shares,
            request.method,
            growth_rate_pct,
            years,
        )?;
        self.projection = Some(out.result.clone());
        Ok(out)
    }

    /// Taxes on the current valuation.
    pub fn current_taxes(&self) -> ShareValResult<ComputationOutput<TaxDetail>> {
        let (request, valuation) = self.current()?;
        derive_taxes(valuation, request.owned_shares, request.financials.par_value)
    }

    /// Taxes at the projection horizon.
    pub fn future_taxes(&self) -> ShareValResult<ComputationOutput<TaxDetail>> {
        let (request, _) = self.current()?;
        let projection = self.projected()?;
        derive_taxes(
            &projection.valuation,
            request.owned_shares,
            request.financials.par_value,
        )
    }

    pub fn tax_comparison(&self) -> ShareValResult<TaxComparison> {
        let current = self.current_taxes()?;
        let future = self.future_taxes()?;
        Ok(compare_taxes(&current.result, &future.result))
    }

    pub fn projection_comparison(&self) -> ShareValResult<ProjectionComparison> {
        let (request, valuation) = self.current()?;
        let projection = self.projected()?;
        compare_projection(&request.financials, valuation, projection)
    }

    /// Drop the valuation and projection together.
    pub fn reset(&mut self) {
        self.request = None;
        self.valuation = None;
        self.projection = None;
    }

    fn current(&self) -> ShareValResult<(&EvaluationRequest, &ValuationResult)> {
        match (&self.request, &self.valuation) {
            (Some(request), Some(valuation)) => Ok((request, valuation)),
            _ => Err(ShareValError::invalid(
                "valuation",
                "No valuation has been evaluated in this session",
            )),
        }
    }

    fn projected(&self) -> ShareValResult<&ProjectionResult> {
        self.projection.as_ref().ok_or_else(|| {
            ShareValError::invalid("projection", "No projection has been run in this session")
        })
    }
}
