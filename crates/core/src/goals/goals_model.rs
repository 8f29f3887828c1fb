//! Goals domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::products::Product;
use crate::recommendation::{RecommendationSnapshot, RecommendedProduct};

/// Durable, server-issued goal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub i64);

impl std::fmt::Display for GoalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wizard-local goal input. Discarded on commit or abandonment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub goal_title: String,
    #[serde(default)]
    pub detailed_goal: String,
    /// Target amount in KRW.
    pub target_amount: i64,
    /// Target period in months.
    pub target_period: i32,
}

impl GoalDraft {
    pub fn new(
        goal_title: impl Into<String>,
        detailed_goal: impl Into<String>,
        target_amount: i64,
        target_period: i32,
    ) -> Self {
        Self {
            goal_title: goal_title.into(),
            detailed_goal: detailed_goal.into(),
            target_amount,
            target_period,
        }
    }

    /// Local checks required before a recommendation may be requested.
    pub fn validate(&self) -> Result<()> {
        if self.goal_title.trim().is_empty() {
            return Err(ValidationError::MissingField("goalTitle".to_string()).into());
        }
        if self.target_amount <= 0 {
            return Err(ValidationError::NotPositive {
                field: "targetAmount".to_string(),
            }
            .into());
        }
        if self.target_period <= 0 {
            return Err(ValidationError::NotPositive {
                field: "targetPeriod".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Create-goal request: the draft together with the recommendation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub goal_title: String,
    pub detailed_goal: String,
    pub target_amount: i64,
    pub target_period: i32,
    pub monthly_amount: i64,
    pub total_expected_return: Decimal,
    pub achievement_probability: Decimal,
    pub total_risk_score: Decimal,
    pub risk_assessment: String,
    pub ai_explanation: String,
    pub recommended_products: Vec<RecommendedProduct>,
}

impl NewGoal {
    pub fn from_plan(draft: &GoalDraft, snapshot: &RecommendationSnapshot) -> Self {
        Self {
            goal_title: draft.goal_title.trim().to_string(),
            detailed_goal: draft.detailed_goal.clone(),
            target_amount: draft.target_amount,
            target_period: draft.target_period,
            monthly_amount: snapshot.monthly_amount,
            total_expected_return: snapshot.total_expected_return,
            achievement_probability: snapshot.achievement_probability,
            total_risk_score: snapshot.total_risk_score,
            risk_assessment: snapshot.risk_assessment.clone(),
            ai_explanation: snapshot.ai_explanation.clone(),
            recommended_products: snapshot.recommended_products.clone(),
        }
    }
}

/// A goal as owned by the goal service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub goal_id: GoalId,
    pub goal_name: String,
    #[serde(default)]
    pub detailed_goal: Option<String>,
    pub target_amount: i64,
    pub target_period: i32,
    pub monthly_amount: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default)]
    pub achievement_probability: Option<Decimal>,
    #[serde(default)]
    pub total_expected_return: Option<Decimal>,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, ErrorKind};
    use crate::testing::snapshot_with_ratios;
    use rust_decimal_macros::dec;

    #[test]
    fn test_draft_validation() {
        assert!(GoalDraft::new("신혼집", "", 50_000_000, 24).validate().is_ok());

        let err = GoalDraft::new("", "", 50_000_000, 24).validate().unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::MissingField("goalTitle".to_string()))
        );
        assert_eq!(
            GoalDraft::new("신혼집", "", -1, 24).validate().unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert!(GoalDraft::new("신혼집", "", 1, 0).validate().is_err());
    }

    #[test]
    fn test_new_goal_carries_draft_and_snapshot() {
        let draft = GoalDraft::new(" 신혼집 ", "전세 보증금", 50_000_000, 24);
        let snapshot = snapshot_with_ratios(&[dec!(60), dec!(40)]);
        let new_goal = NewGoal::from_plan(&draft, &snapshot);

        assert_eq!(new_goal.goal_title, "신혼집");
        assert_eq!(new_goal.target_period, 24);
        assert_eq!(new_goal.monthly_amount, snapshot.monthly_amount);
        assert_eq!(new_goal.recommended_products.len(), 2);

        let json = serde_json::to_value(&new_goal).unwrap();
        assert_eq!(json["goalTitle"], "신혼집");
        assert_eq!(json["recommendedProducts"][0]["productType"], "SAVINGS");
    }

    #[test]
    fn test_goal_parses_detail_payload() {
        let json = r#"{
            "goalId": 42,
            "goalName": "신혼집",
            "targetAmount": 50000000,
            "targetPeriod": 24,
            "monthlyAmount": 1000000,
            "status": "ACTIVE",
            "maturityDate": "2028-10-16",
            "products": [
                {"productId": 1, "productType": "SAVINGS", "investmentRatio": 60,
                 "monthlyAmount": 600000, "subscribed": true, "accountNumber": "333-01-000001",
                 "totalDeposit": 1200000, "profit": 8100, "baseRate": 3.5}
            ]
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.goal_id, GoalId(42));
        assert_eq!(goal.products[0].settlement_account(), Some("333-01-000001"));
        assert_eq!(goal.maturity_date, NaiveDate::from_ymd_opt(2028, 10, 16));
    }
}
