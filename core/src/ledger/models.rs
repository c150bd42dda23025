//! Ledger records and derived reports

use serde::{Deserialize, Serialize};

/// Income recorded for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncome {
    pub id: i64,
    pub year_month: String,
    pub amount: f64,
    pub description: Option<String>,
}

/// A recurring monthly expense such as rent or a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub category: Option<String>,
    pub is_active: bool,
}

/// Savings target and actual savings for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPlan {
    pub id: i64,
    pub year_month: String,
    pub target_amount: f64,
    pub actual_amount: f64,
}

impl SavingsPlan {
    /// Percentage of the target reached, 0 when there is no target
    pub fn progress(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.actual_amount / self.target_amount * 100.0
        } else {
            0.0
        }
    }
}

/// A single day-to-day expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpense {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year_month: String,
    pub total_income: f64,
    pub total_fixed_expenses: f64,
    pub total_daily_expenses: f64,
    pub total_expenses: f64,
    pub savings_target: f64,
    pub savings_actual: f64,
    /// income - expenses - actual savings
    pub remaining_budget: f64,
}

/// Spending within one category for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total_amount: f64,
    pub count: u32,
    /// Share of the month's daily spending, rounded to one decimal
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    Good,
    Warning,
    OverBudget,
}

impl BudgetHealth {
    /// Classify the remaining budget against income
    pub fn classify(remaining: f64, total_income: f64) -> Self {
        if remaining < 0.0 {
            BudgetHealth::OverBudget
        } else if remaining < total_income * 0.1 {
            BudgetHealth::Warning
        } else {
            BudgetHealth::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetHealth::Good => "good",
            BudgetHealth::Warning => "warning",
            BudgetHealth::OverBudget => "over_budget",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub year_month: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub remaining: f64,
    pub savings_progress: f64,
    pub status: BudgetHealth,
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
