//! Day-to-day expense tools

use crate::error::Result;
use crate::ledger::{DailyExpense, Ledger};
use crate::tools::builtin::format_amount;
use crate::tools::{ParameterType, Tool, ToolArguments, ToolParameter};
use async_trait::async_trait;

fn expense_line(expense: &DailyExpense) -> String {
    let mut line = format!("  - {}: {}", expense.category, format_amount(expense.amount));
    if let Some(description) = &expense.description {
        line.push_str(&format!(" ({})", description));
    }
    line
}

pub struct AddDailyExpenseTool {
    ledger: Ledger,
}

impl AddDailyExpenseTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for AddDailyExpenseTool {
    fn name(&self) -> &str {
        "add_daily_expense"
    }

    fn description(&self) -> &str {
        "Record a daily expense."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            ToolParameter::required(
                "date",
                ParameterType::String,
                "Date (format: YYYY-MM-DD, e.g. 2024-01-15)",
            ),
            ToolParameter::required("amount", ParameterType::Number, "Amount spent (KRW)"),
            ToolParameter::required(
                "category",
                ParameterType::String,
                "Category (e.g. food, transport, shopping, leisure, medical, education, other)",
            ),
            ToolParameter::optional(
                "description",
                ParameterType::String,
                "What the money was spent on (optional)",
            ),
        ]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let date: String = arguments.get("date")?;
        let amount: f64 = arguments.get("amount")?;
        let category: String = arguments.get("category")?;
        let description: Option<String> = arguments.get_optional("description")?;

        let expense =
            self.ledger
                .add_daily_expense(&date, amount, &category, description.as_deref())?;

        let mut output = format!(
            "Recorded a {} expense of {} on {}.",
            expense.category,
            format_amount(expense.amount),
            expense.date
        );
        if let Some(description) = &expense.description {
            output.push_str(&format!(" (details: {})", description));
        }
        Ok(output)
    }
}

pub struct ExpensesByDateTool {
    ledger: Ledger,
}

impl ExpensesByDateTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for ExpensesByDateTool {
    fn name(&self) -> &str {
        "get_expenses_by_date"
    }

    fn description(&self) -> &str {
        "Get all expenses recorded on a specific date."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::required(
            "date",
            ParameterType::String,
            "Date (format: YYYY-MM-DD, e.g. 2024-01-15)",
        )]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let date: String = arguments.get("date")?;

        let expenses = self.ledger.expenses_by_date(&date)?;
        if expenses.is_empty() {
            return Ok(format!("No expenses recorded on {}.", date));
        }

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let mut lines = vec![format!("📅 Expenses on {}:", date)];
        lines.extend(expenses.iter().map(expense_line));
        lines.push(format!("\nTotal spent: {}", format_amount(total)));

        Ok(lines.join("\n"))
    }
}

pub struct ExpensesByPeriodTool {
    ledger: Ledger,
}

impl ExpensesByPeriodTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for ExpensesByPeriodTool {
    fn name(&self) -> &str {
        "get_expenses_by_period"
    }

    fn description(&self) -> &str {
        "Get expenses recorded within a date range."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            ToolParameter::required("start_date", ParameterType::String, "Start date (format: YYYY-MM-DD)"),
            ToolParameter::required("end_date", ParameterType::String, "End date (format: YYYY-MM-DD)"),
        ]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let start_date: String = arguments.get("start_date")?;
        let end_date: String = arguments.get("end_date")?;

        let expenses = self.ledger.expenses_by_period(&start_date, &end_date)?;
        if expenses.is_empty() {
            return Ok(format!(
                "No expenses recorded between {} and {}.",
                start_date, end_date
            ));
        }

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let mut lines = vec![format!("📅 Expenses from {} to {}:", start_date, end_date)];

        let mut current_date: Option<&str> = None;
        for expense in &expenses {
            if current_date != Some(expense.date.as_str()) {
                current_date = Some(expense.date.as_str());
                lines.push(format!("\n[{}]", expense.date));
            }
            lines.push(expense_line(expense));
        }
        lines.push(format!(
            "\nTotal spent: {} ({} items)",
            format_amount(total),
            expenses.len()
        ));

        Ok(lines.join("\n"))
    }
}
