//! Bill model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Expense category for bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillCategory {
    Housing,
    Utilities,
    Transportation,
    Groceries,
    Entertainment,
    Health,
    Other,
}

impl BillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillCategory::Housing => "housing",
            BillCategory::Utilities => "utilities",
            BillCategory::Transportation => "transportation",
            BillCategory::Groceries => "groceries",
            BillCategory::Entertainment => "entertainment",
            BillCategory::Health => "health",
            BillCategory::Other => "other",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "housing" => BillCategory::Housing,
            "utilities" => BillCategory::Utilities,
            "transportation" => BillCategory::Transportation,
            "groceries" => BillCategory::Groceries,
            "entertainment" => BillCategory::Entertainment,
            "health" => BillCategory::Health,
            _ => BillCategory::Other,
        }
    }
}

/// A tracked recurring or one-off expense.
///
/// Invariant: `amount` is strictly positive; inputs are validated before a
/// bill is ever constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub bill_id: Uuid,
    pub description: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub category: BillCategory,
    pub is_paid: bool,
    pub reminders: bool,
}

/// Input for creating a bill.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBill {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,

    pub due_date: NaiveDate,
    pub category: BillCategory,

    #[serde(default)]
    pub is_paid: bool,

    #[serde(default = "default_reminders")]
    pub reminders: bool,
}

fn default_reminders() -> bool {
    true
}

/// Input for updating a bill. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBill {
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: Option<f64>,

    pub due_date: Option<NaiveDate>,
    pub category: Option<BillCategory>,
    pub is_paid: Option<bool>,
    pub reminders: Option<bool>,
}

/// Dashboard rollup over the bill collection.
///
/// Bills due today count as neither upcoming nor overdue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillSummary {
    pub total_outstanding: f64,
    pub upcoming_count: usize,
    pub overdue_count: usize,
}
