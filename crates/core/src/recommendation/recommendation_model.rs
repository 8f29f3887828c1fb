//! Recommendation snapshot models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::RATIO_SUM_TOLERANCE;
use crate::errors::{Error, Result};
use crate::products::ProductType;

/// One product of the recommended mix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub product_type: ProductType,
    /// Share of the monthly amount, in percent.
    pub investment_ratio: Decimal,
    pub investment_amount: i64,
    pub monthly_amount: i64,
    pub expected_return_rate: Decimal,
    #[serde(default)]
    pub recommendation_reason: String,
}

/// The recommendation engine's one-time output for a goal draft.
///
/// Immutable once fetched and consumed exactly once when the goal is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSnapshot {
    pub monthly_amount: i64,
    pub total_expected_return: Decimal,
    pub achievement_probability: Decimal,
    pub total_risk_score: Decimal,
    #[serde(default)]
    pub risk_assessment: String,
    #[serde(default)]
    pub ai_explanation: String,
    #[serde(default)]
    pub recommended_products: Vec<RecommendedProduct>,
}

impl RecommendationSnapshot {
    pub fn ratio_sum(&self) -> Decimal {
        self.recommended_products
            .iter()
            .map(|p| p.investment_ratio)
            .sum()
    }

    /// Checks the snapshot is usable: at least one product, and ratios adding up
    /// to 100 within [`RATIO_SUM_TOLERANCE`].
    pub fn validate(&self) -> Result<()> {
        if self.recommended_products.is_empty() {
            return Err(Error::InvalidResponse(
                "recommendation contains no products".to_string(),
            ));
        }
        let deviation = (self.ratio_sum() - Decimal::ONE_HUNDRED).abs();
        if deviation > RATIO_SUM_TOLERANCE {
            return Err(Error::InvalidResponse(format!(
                "recommended ratios add up to {}, expected 100",
                self.ratio_sum()
            )));
        }
        Ok(())
    }
}
