pub mod projection;
pub mod tabular;
pub mod tax;
pub mod valuation;

/// Prefix an earlier step's warnings so they stay attributable in a later step's output.
pub(crate) fn tag_warnings(step: &str, warnings: &[String]) -> Vec<String> {
    warnings.iter().map(|w| format!("[{step}] {w}")).collect()
}
