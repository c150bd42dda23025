//! Personal budget ledger: income, fixed expenses, savings and daily expenses

pub mod models;
pub mod store;

pub use models::{
    BudgetHealth, BudgetStatus, CategoryBreakdown, DailyExpense, FixedExpense, MonthlyIncome,
    MonthlySummary, SavingsPlan,
};
pub use store::{validate_date, validate_year_month, Ledger, LedgerResult};
