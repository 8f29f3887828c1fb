//! Product domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of financial product a goal allocates money to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Savings,
    Deposit,
    Bond,
    Etf,
    Fund,
}

/// Which rate field describes a product's yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBasis {
    /// Fixed interest rate offered by the bank (`baseRate`).
    Base,
    /// Realized or expected profit rate of a market product (`profitRate`).
    Profit,
}

impl ProductType {
    pub fn rate_basis(&self) -> RateBasis {
        match self {
            ProductType::Savings | ProductType::Deposit => RateBasis::Base,
            ProductType::Bond | ProductType::Etf | ProductType::Fund => RateBasis::Profit,
        }
    }

    /// Korean display label.
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Savings => "적금",
            ProductType::Deposit => "예금",
            ProductType::Bond => "채권",
            ProductType::Etf => "ETF",
            ProductType::Fund => "펀드",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wire = match self {
            ProductType::Savings => "SAVINGS",
            ProductType::Deposit => "DEPOSIT",
            ProductType::Bond => "BOND",
            ProductType::Etf => "ETF",
            ProductType::Fund => "FUND",
        };
        write!(f, "{}", wire)
    }
}

/// A product embedded in a goal.
///
/// `subscribed` flips from `false` to `true` exactly once, server side, after a
/// successful subscription. `account_number` is the product's settlement account
/// and is only present once subscribed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub product_type: ProductType,
    pub investment_ratio: Decimal,
    pub monthly_amount: i64,
    #[serde(default)]
    pub subscribed: bool,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub total_deposit: Option<i64>,
    #[serde(default)]
    pub profit: Option<i64>,
    #[serde(default)]
    pub return_rate: Option<Decimal>,
    #[serde(default)]
    pub base_rate: Option<Decimal>,
    #[serde(default)]
    pub profit_rate: Option<Decimal>,
}

impl Product {
    /// The settlement account number, ignoring blank values.
    pub fn settlement_account(&self) -> Option<&str> {
        self.account_number
            .as_deref()
            .map(str::trim)
            .filter(|account| !account.is_empty())
    }

    /// The rate shown for this product, chosen by its type.
    pub fn display_rate(&self) -> Option<Decimal> {
        let preferred = match self.product_type.rate_basis() {
            RateBasis::Base => self.base_rate,
            RateBasis::Profit => self.profit_rate,
        };
        preferred.or(self.return_rate)
    }

    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| format!("{} #{}", self.product_type.label(), self.product_id))
    }
}
