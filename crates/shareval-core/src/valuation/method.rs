use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShareValError;
use crate::types::Money;

/// Weight of the dominant component in either blended method.
const PRIMARY_WEIGHT: Decimal = dec!(0.6);
/// Weight of the secondary component in either blended method.
const SECONDARY_WEIGHT: Decimal = dec!(0.4);
/// Blended values may not fall below this share of net asset value.
pub const NET_ASSET_FLOOR: Decimal = dec!(0.8);

/// Policy used to combine asset-based and income-based per-share values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationMethod {
    /// Ordinary operating company: income value × 0.6 + asset value × 0.4
    #[default]
    General,
    /// Company whose assets are mostly real estate: asset value × 0.6 + income value × 0.4
    RealEstateHeavy,
    /// Net asset value alone, no blend and no floor
    NetAssetOnly,
}

impl ValuationMethod {
    pub const ALL: [ValuationMethod; 3] = [
        ValuationMethod::General,
        ValuationMethod::RealEstateHeavy,
        ValuationMethod::NetAssetOnly,
    ];

    /// Human-readable description of the blend formula.
    pub fn label(&self) -> &'static str {
        match self {
            ValuationMethod::General => "General: (income value × 0.6 + asset value × 0.4)",
            ValuationMethod::RealEstateHeavy => {
                "Real-estate heavy: (asset value × 0.6 + income value × 0.4)"
            }
            ValuationMethod::NetAssetOnly => "Net asset value only",
        }
    }

    /// Final per-share value for this method.
    ///
    /// `asset_value` is net asset value plus goodwill. Both blended methods are
    /// floored at 80% of net asset value; `NetAssetOnly` returns the net asset
    /// value untouched, even when it is negative.
    pub fn blend(&self, net_asset_per_share: Money, asset_value: Money, income_value: Money) -> Money {
        let blended = match self {
            ValuationMethod::NetAssetOnly => return net_asset_per_share,
            ValuationMethod::RealEstateHeavy => {
                asset_value * PRIMARY_WEIGHT + income_value * SECONDARY_WEIGHT
            }
            ValuationMethod::General => {
                income_value * PRIMARY_WEIGHT + asset_value * SECONDARY_WEIGHT
            }
        };
        blended.max(net_asset_per_share * NET_ASSET_FLOOR)
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValuationMethod::General => "general",
            ValuationMethod::RealEstateHeavy => "real-estate-heavy",
            ValuationMethod::NetAssetOnly => "net-asset-only",
        };
        f.write_str(name)
    }
}

impl FromStr for ValuationMethod {
    type Err = ShareValError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "general" => Ok(ValuationMethod::General),
            "real-estate-heavy" | "real-estate" => Ok(ValuationMethod::RealEstateHeavy),
            "net-asset-only" | "net-asset" => Ok(ValuationMethod::NetAssetOnly),
            _ => Err(ShareValError::invalid(
                "method",
                format!("Unknown valuation method '{s}' (expected general, real-estate-heavy or net-asset-only)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_weights_income() {
        let v = ValuationMethod::General.blend(dec!(100), dec!(120), dec!(200));
        // 200*0.6 + 120*0.4 = 120 + 48
        assert_eq!(v, dec!(168));
    }

    #[test]
    fn test_real_estate_weights_assets() {
        let v = ValuationMethod::RealEstateHeavy.blend(dec!(100), dec!(120), dec!(200));
        // 120*0.6 + 200*0.4 = 72 + 80
        assert_eq!(v, dec!(152));
    }

    #[test]
    fn test_blend_floor_at_eighty_percent() {
        let v = ValuationMethod::General.blend(dec!(1000), dec!(1000), dec!(-500));
        // 1000*0.4 - 500*0.6 = 100, floor is 800
        assert_eq!(v, dec!(800));
    }

    #[test]
    fn test_net_asset_only_ignores_floor() {
        let v = ValuationMethod::NetAssetOnly.blend(dec!(-50), dec!(10), dec!(10));
        assert_eq!(v, dec!(-50));
    }

    #[test]
    fn test_parse_method_names() {
        assert_eq!(
            "REAL_ESTATE_HEAVY".parse::<ValuationMethod>().unwrap(),
            ValuationMethod::RealEstateHeavy
        );
        assert_eq!(
            "net-asset-only".parse::<ValuationMethod>().unwrap(),
            ValuationMethod::NetAssetOnly
        );
        assert_eq!(
            "General".parse::<ValuationMethod>().unwrap(),
            ValuationMethod::General
        );
        assert!("sum-of-parts".parse::<ValuationMethod>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for method in ValuationMethod::ALL {
            assert_eq!(method.to_string().parse::<ValuationMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ValuationMethod::NetAssetOnly).unwrap();
        assert_eq!(json, "\"NET_ASSET_ONLY\"");
        let parsed: ValuationMethod = serde_json::from_str("\"GENERAL\"").unwrap();
        assert_eq!(parsed, ValuationMethod::General);
    }
}
