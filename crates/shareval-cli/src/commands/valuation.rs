use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use shareval_core::valuation::engine::CompanyFinancials;
use shareval_core::valuation::method::ValuationMethod;
use shareval_core::valuation::request::EvaluationRequest;

use crate::input;

/// Company figures and stake for one valuation
#[derive(Args)]
pub struct RequestArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Company name, carried into exports
    #[arg(long)]
    pub company_name: Option<String>,

    /// Book equity at the valuation date
    #[arg(long, allow_hyphen_values = true)]
    pub total_equity: Option<Decimal>,

    /// Net income, most recent year
    #[arg(long, allow_hyphen_values = true)]
    pub net_income_1: Option<Decimal>,

    /// Net income, one year earlier
    #[arg(long, allow_hyphen_values = true)]
    pub net_income_2: Option<Decimal>,

    /// Net income, two years earlier
    #[arg(long, allow_hyphen_values = true)]
    pub net_income_3: Option<Decimal>,

    /// Issued shares
    #[arg(long)]
    pub total_shares: Option<u64>,

    /// Shares held by the subject shareholder
    #[arg(long)]
    pub owned_shares: Option<u64>,

    /// Par value per share (cost basis)
    #[arg(long, default_value = "5000")]
    pub par_value: Decimal,

    /// Capitalization rate in percent (e.g. 10 for 10%)
    #[arg(long, default_value = "10")]
    pub interest_rate: Decimal,

    /// Blend method: general, real-estate-heavy, net-asset-only
    #[arg(long)]
    pub method: Option<ValuationMethod>,
}

/// Build the request from `--input`, piped stdin, or the individual flags.
pub fn load_request(args: &RequestArgs) -> Result<EvaluationRequest, Box<dyn std::error::Error>> {
    let request: EvaluationRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        EvaluationRequest {
            company_name: args.company_name.clone(),
            financials: CompanyFinancials {
                total_equity: args
                    .total_equity
                    .ok_or("--total-equity is required (or provide --input)")?,
                net_income_1: args
                    .net_income_1
                    .ok_or("--net-income-1 is required (or provide --input)")?,
                net_income_2: args
                    .net_income_2
                    .ok_or("--net-income-2 is required (or provide --input)")?,
                net_income_3: args
                    .net_income_3
                    .ok_or("--net-income-3 is required (or provide --input)")?,
                total_shares: args
                    .total_shares
                    .ok_or("--total-shares is required (or provide --input)")?,
                par_value: args.par_value,
                interest_rate_pct: args.interest_rate,
            },
            owned_shares: args
                .owned_shares
                .ok_or("--owned-shares is required (or provide --input)")?,
            method: args.method.unwrap_or_default(),
        }
    };

    log::debug!(
        "loaded request for {} ({} method)",
        request.company_name.as_deref().unwrap_or("unnamed company"),
        request.method
    );
    Ok(request)
}

pub fn run_evaluate(args: RequestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = load_request(&args)?;
    let result = request.evaluate()?;
    Ok(serde_json::to_value(result)?)
}
