//! Budget tools backed by the ledger

pub mod analysis;
pub mod daily_expenses;
pub mod fixed_expenses;
pub mod income;
pub mod savings;

pub use analysis::{BudgetStatusTool, CategoryAnalysisTool, MonthlySummaryTool};
pub use daily_expenses::{AddDailyExpenseTool, ExpensesByDateTool, ExpensesByPeriodTool};
pub use fixed_expenses::{AddFixedExpenseTool, ListFixedExpensesTool, RemoveFixedExpenseTool};
pub use income::{GetMonthlyIncomeTool, SetMonthlyIncomeTool};
pub use savings::{SetSavingsPlanTool, UpdateSavingsTool};

use crate::ledger::Ledger;
use crate::tools::{ParameterType, ToolParameter, ToolRegistry};
use std::sync::Arc;

/// Build the catalog holding every budget tool, all sharing one ledger
pub fn create_budget_registry(ledger: Ledger) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(SetMonthlyIncomeTool::new(ledger.clone())));
    registry.register(Arc::new(GetMonthlyIncomeTool::new(ledger.clone())));
    registry.register(Arc::new(AddFixedExpenseTool::new(ledger.clone())));
    registry.register(Arc::new(ListFixedExpensesTool::new(ledger.clone())));
    registry.register(Arc::new(RemoveFixedExpenseTool::new(ledger.clone())));
    registry.register(Arc::new(SetSavingsPlanTool::new(ledger.clone())));
    registry.register(Arc::new(UpdateSavingsTool::new(ledger.clone())));
    registry.register(Arc::new(AddDailyExpenseTool::new(ledger.clone())));
    registry.register(Arc::new(ExpensesByDateTool::new(ledger.clone())));
    registry.register(Arc::new(ExpensesByPeriodTool::new(ledger.clone())));
    registry.register(Arc::new(MonthlySummaryTool::new(ledger.clone())));
    registry.register(Arc::new(CategoryAnalysisTool::new(ledger.clone())));
    registry.register(Arc::new(BudgetStatusTool::new(ledger)));

    registry
}

pub(crate) fn year_month_parameter() -> ToolParameter {
    ToolParameter::required(
        "year_month",
        ParameterType::String,
        "Year and month (format: YYYY-MM, e.g. 2024-01)",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolArguments;
    use serde_json::json;

    fn args(value: serde_json::Value) -> ToolArguments {
        match value {
            serde_json::Value::Object(map) => map.into(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_registry_holds_all_budget_tools() {
        let registry = create_budget_registry(Ledger::in_memory().unwrap());
        assert_eq!(
            registry.list_tools(),
            vec![
                "set_monthly_income",
                "get_monthly_income",
                "add_fixed_expense",
                "list_fixed_expenses",
                "remove_fixed_expense",
                "set_savings_plan",
                "update_savings",
                "add_daily_expense",
                "get_expenses_by_date",
                "get_expenses_by_period",
                "get_monthly_summary",
                "get_category_analysis",
                "get_budget_status",
            ]
        );

        for definition in registry.get_tool_definitions() {
            assert_eq!(definition.tool_type, "function");
            assert_eq!(definition.function.parameters["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_tools_share_one_ledger() {
        let registry = create_budget_registry(Ledger::in_memory().unwrap());

        registry
            .execute(
                "set_monthly_income",
                &args(json!({"year_month": "2024-01", "amount": 3000000})),
            )
            .await;
        let output = registry
            .execute("get_monthly_income", &args(json!({"year_month": "2024-01"})))
            .await;

        assert_eq!(output, "Monthly income for 2024-01: ₩3,000,000");
    }

    #[tokio::test]
    async fn test_missing_argument_becomes_error_text() {
        let registry = create_budget_registry(Ledger::in_memory().unwrap());
        let output = registry
            .execute("get_monthly_income", &ToolArguments::default())
            .await;

        assert!(output.starts_with("Error executing tool 'get_monthly_income':"));
        assert!(output.contains("year_month"));
    }

    #[tokio::test]
    async fn test_invalid_date_becomes_error_text() {
        let registry = create_budget_registry(Ledger::in_memory().unwrap());
        let output = registry
            .execute(
                "add_daily_expense",
                &args(json!({"date": "yesterday", "amount": 5000, "category": "food"})),
            )
            .await;

        assert!(output.starts_with("Error executing tool 'add_daily_expense':"));
        assert!(output.contains("YYYY-MM-DD"));
    }
}
