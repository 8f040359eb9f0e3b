// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown kind '{}', expected income|expense", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountContext {
    Personal,
    Business,
}

impl fmt::Display for AccountContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountContext::Personal => write!(f, "personal"),
            AccountContext::Business => write!(f, "business"),
        }
    }
}

impl FromStr for AccountContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(AccountContext::Personal),
            "business" => Ok(AccountContext::Business),
            other => Err(format!(
                "Unknown account context '{}', expected personal|business",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Pending => write!(f, "pending"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "completed" => Ok(TransactionStatus::Completed),
            "pending" => Ok(TransactionStatus::Pending),
            other => Err(format!(
                "Unknown status '{}', expected completed|pending",
                other
            )),
        }
    }
}

/// Fixed category set. Income vs expense subsets are a convention the CLI
/// suggests, not something the engine enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Health,
    #[serde(rename = "Business Operations")]
    BusinessOperations,
    Marketing,
    Salary,
    Equipment,
    Software,
    Investment,
    Income,
    Transfer,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Housing => "Housing",
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::BusinessOperations => "Business Operations",
            Category::Marketing => "Marketing",
            Category::Salary => "Salary",
            Category::Equipment => "Equipment",
            Category::Software => "Software",
            Category::Investment => "Investment",
            Category::Income => "Income",
            Category::Transfer => "Transfer",
        }
    }

    /// Categories the CLI suggests for income entries.
    pub fn income_set() -> &'static [Category] {
        &[Category::Salary, Category::Investment, Category::Income]
    }

    /// Categories the CLI suggests for expense entries.
    pub fn expense_set() -> &'static [Category] {
        &[
            Category::Software,
            Category::Housing,
            Category::Food,
            Category::Transportation,
            Category::Utilities,
            Category::Marketing,
            Category::Entertainment,
            Category::BusinessOperations,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "housing" => Ok(Category::Housing),
            "food" => Ok(Category::Food),
            "transportation" => Ok(Category::Transportation),
            "utilities" => Ok(Category::Utilities),
            "entertainment" => Ok(Category::Entertainment),
            "health" => Ok(Category::Health),
            "businessoperations" | "business" => Ok(Category::BusinessOperations),
            "marketing" => Ok(Category::Marketing),
            "salary" => Ok(Category::Salary),
            "equipment" => Ok(Category::Equipment),
            "software" => Ok(Category::Software),
            "investment" => Ok(Category::Investment),
            "income" => Ok(Category::Income),
            "transfer" => Ok(Category::Transfer),
            other => Err(format!("Unknown category '{}'", other)),
        }
    }
}

/// A single financial event. `id` is assigned by the remote store on
/// creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: String,
    pub occurred_at: NaiveDate,
    pub account_context: AccountContext,
    pub is_recurring: bool,
    pub status: TransactionStatus,
}

/// Creation payload: everything except `id` and `status`. New entries are
/// always created completed.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: String,
    pub occurred_at: NaiveDate,
    pub account_context: AccountContext,
    pub is_recurring: bool,
}

/// Partial update payload; every field except `id` is mutable.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_context: Option<AccountContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.kind.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.occurred_at.is_none()
            && self.account_context.is_none()
            && self.is_recurring.is_none()
            && self.status.is_none()
    }

    /// Merge this patch into a local record; untouched fields keep their
    /// current values.
    pub fn apply_to(&self, tx: &mut Transaction) {
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(ref description) = self.description {
            tx.description = description.clone();
        }
        if let Some(occurred_at) = self.occurred_at {
            tx.occurred_at = occurred_at;
        }
        if let Some(account_context) = self.account_context {
            tx.account_context = account_context;
        }
        if let Some(is_recurring) = self.is_recurring {
            tx.is_recurring = is_recurring;
        }
        if let Some(status) = self.status {
            tx.status = status;
        }
    }
}

/// Per-user recurring revenue figures: the baseline MRR tracked outside
/// individual transactions, and the MRR goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSettings {
    pub baseline: Decimal,
    pub target: Decimal,
}

/// A hypothetical subscription price point used for goal projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub id: String,
    pub price: Decimal,
}

impl PricingTier {
    pub fn new(price: Decimal) -> Self {
        PricingTier {
            id: Uuid::new_v4().to_string(),
            price,
        }
    }
}
