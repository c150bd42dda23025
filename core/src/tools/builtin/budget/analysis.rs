//! Monthly summary, category analysis and budget status tools

use super::year_month_parameter;
use crate::error::Result;
use crate::ledger::{BudgetHealth, Ledger};
use crate::tools::builtin::format_amount;
use crate::tools::{Tool, ToolArguments, ToolParameter};
use async_trait::async_trait;

const RULE: &str = "==============================";

pub struct MonthlySummaryTool {
    ledger: Ledger,
}

impl MonthlySummaryTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for MonthlySummaryTool {
    fn name(&self) -> &str {
        "get_monthly_summary"
    }

    fn description(&self) -> &str {
        "Show a monthly summary of income, expenses and savings."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![year_month_parameter()]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;
        let summary = self.ledger.monthly_summary(&year_month)?;

        let lines = [
            format!("📊 Monthly summary for {}", year_month),
            RULE.to_string(),
            format!("💰 Total income: {}", format_amount(summary.total_income)),
            String::new(),
            "📤 Expenses:".to_string(),
            format!("  - Fixed: {}", format_amount(summary.total_fixed_expenses)),
            format!("  - Variable: {}", format_amount(summary.total_daily_expenses)),
            format!("  - Total: {}", format_amount(summary.total_expenses)),
            String::new(),
            "💎 Savings:".to_string(),
            format!("  - Target: {}", format_amount(summary.savings_target)),
            format!("  - Actual: {}", format_amount(summary.savings_actual)),
            String::new(),
            RULE.to_string(),
            format!("💵 Remaining budget: {}", format_amount(summary.remaining_budget)),
        ];

        Ok(lines.join("\n"))
    }
}

pub struct CategoryAnalysisTool {
    ledger: Ledger,
}

impl CategoryAnalysisTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for CategoryAnalysisTool {
    fn name(&self) -> &str {
        "get_category_analysis"
    }

    fn description(&self) -> &str {
        "Break down a month's spending by category."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![year_month_parameter()]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;
        let analysis = self.ledger.category_analysis(&year_month)?;

        if analysis.is_empty() {
            return Ok(format!("No expenses recorded for {}.", year_month));
        }

        let total: f64 = analysis.iter().map(|c| c.total_amount).sum();
        let mut lines = vec![
            format!("📈 Spending by category for {}", year_month),
            RULE.to_string(),
        ];

        for item in &analysis {
            // 20 blocks at 100%
            let bar = "█".repeat((item.percentage / 5.0) as usize);
            lines.push(format!(
                "{}: {} ({} items)",
                item.category,
                format_amount(item.total_amount),
                item.count
            ));
            lines.push(format!("  {} {}%", bar, item.percentage));
        }

        lines.push(RULE.to_string());
        lines.push(format!("Total spent: {}", format_amount(total)));

        Ok(lines.join("\n"))
    }
}

pub struct BudgetStatusTool {
    ledger: Ledger,
}

impl BudgetStatusTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for BudgetStatusTool {
    fn name(&self) -> &str {
        "get_budget_status"
    }

    fn description(&self) -> &str {
        "Check how the month is tracking against the budget."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![year_month_parameter()]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;
        let status = self.ledger.budget_status(&year_month)?;

        let (emoji, label) = match status.status {
            BudgetHealth::Good => ("✅", "Good"),
            BudgetHealth::Warning => ("⚠️", "Needs attention"),
            BudgetHealth::OverBudget => ("🚨", "Over budget"),
        };

        let mut lines = vec![
            format!("💰 Budget status for {} {}", year_month, emoji),
            RULE.to_string(),
            format!("Income: {}", format_amount(status.total_income)),
            format!("Expenses: {}", format_amount(status.total_expenses)),
            format!("Remaining: {}", format_amount(status.remaining)),
            String::new(),
            format!("Savings progress: {:.1}%", status.savings_progress),
            String::new(),
            format!("Status: {}", label),
        ];

        match status.status {
            BudgetHealth::OverBudget => lines.push(
                "\n💡 Tip: cut back on spending or adjust your savings target.".to_string(),
            ),
            BudgetHealth::Warning => lines.push(
                "\n💡 Tip: only a little budget is left. Watch your spending.".to_string(),
            ),
            BudgetHealth::Good => {}
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn month(year_month: &str) -> ToolArguments {
        match json!({ "year_month": year_month }) {
            serde_json::Value::Object(map) => map.into(),
            _ => unreachable!(),
        }
    }

    fn seeded_ledger() -> Ledger {
        let ledger = Ledger::in_memory().unwrap();
        ledger.set_monthly_income("2024-01", 1_000_000.0, None).unwrap();
        ledger.add_fixed_expense("rent", 600_000.0, Some("housing")).unwrap();
        ledger.add_daily_expense("2024-01-05", 300_000.0, "food", None).unwrap();
        ledger.add_daily_expense("2024-01-06", 200_000.0, "shopping", None).unwrap();
        ledger
    }

    #[tokio::test]
    async fn test_monthly_summary_text() {
        let output = MonthlySummaryTool::new(seeded_ledger())
            .execute(&month("2024-01"))
            .await
            .unwrap();

        assert!(output.starts_with("📊 Monthly summary for 2024-01"));
        assert!(output.contains("  - Fixed: ₩600,000"));
        assert!(output.contains("  - Variable: ₩500,000"));
        assert!(output.ends_with("💵 Remaining budget: ₩-100,000"));
    }

    #[tokio::test]
    async fn test_category_analysis_bars() {
        let output = CategoryAnalysisTool::new(seeded_ledger())
            .execute(&month("2024-01"))
            .await
            .unwrap();

        assert!(output.contains("food: ₩300,000 (1 items)\n  ████████████ 60%"));
        assert!(output.contains("shopping: ₩200,000 (1 items)\n  ████████ 40%"));
        assert!(output.ends_with("Total spent: ₩500,000"));

        let empty = CategoryAnalysisTool::new(seeded_ledger())
            .execute(&month("2024-02"))
            .await
            .unwrap();
        assert_eq!(empty, "No expenses recorded for 2024-02.");
    }

    #[tokio::test]
    async fn test_budget_status_over_budget() {
        let output = BudgetStatusTool::new(seeded_ledger())
            .execute(&month("2024-01"))
            .await
            .unwrap();

        assert!(output.starts_with("💰 Budget status for 2024-01 🚨"));
        assert!(output.contains("Status: Over budget"));
        assert!(output.contains("Tip: cut back"));
    }

    #[tokio::test]
    async fn test_budget_status_good_has_no_tip() {
        let ledger = Ledger::in_memory().unwrap();
        ledger.set_monthly_income("2024-03", 2_000_000.0, None).unwrap();

        let output = BudgetStatusTool::new(ledger)
            .execute(&month("2024-03"))
            .await
            .unwrap();
        assert!(output.contains("Status: Good"));
        assert!(!output.contains("Tip"));
    }
}
