use napi::Result as NapiResult;
use napi_derive::napi;

use shareval_core::projection::growth::{run_projection, ProjectionRequest};
use shareval_core::projection::sweep::{run_sweep, SweepRequest};
use shareval_core::tax::derivation::derive_taxes;
use shareval_core::valuation::request::EvaluationRequest;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_shares(input_json: String) -> NapiResult<String> {
    let request: EvaluationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = request.evaluate().map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Taxes
// ---------------------------------------------------------------------------

/// Value the request, then derive taxes on its owned stake.
#[napi]
pub fn derive_share_taxes(input_json: String) -> NapiResult<String> {
    let request: EvaluationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let current = request.evaluate().map_err(to_napi_error)?;
    let mut output = derive_taxes(
        &current.result,
        request.owned_shares,
        request.financials.par_value,
    )
    .map_err(to_napi_error)?;

    let mut warnings: Vec<String> = current
        .warnings
        .iter()
        .map(|w| format!("[valuation] {w}"))
        .collect();
    warnings.append(&mut output.warnings);
    output.warnings = warnings;

    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_shares(input_json: String) -> NapiResult<String> {
    let input: ProjectionRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = run_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sweep_growth(input_json: String) -> NapiResult<String> {
    let input: SweepRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = run_sweep(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
