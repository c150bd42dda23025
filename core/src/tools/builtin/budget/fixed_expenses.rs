//! Fixed (recurring) expense tools

use crate::error::Result;
use crate::ledger::Ledger;
use crate::tools::builtin::format_amount;
use crate::tools::{ParameterType, Tool, ToolArguments, ToolParameter};
use async_trait::async_trait;

pub struct AddFixedExpenseTool {
    ledger: Ledger,
}

impl AddFixedExpenseTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for AddFixedExpenseTool {
    fn name(&self) -> &str {
        "add_fixed_expense"
    }

    fn description(&self) -> &str {
        "Add a fixed monthly expense (e.g. rent, phone bill, insurance, subscriptions)."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            ToolParameter::required(
                "name",
                ParameterType::String,
                "Name of the fixed expense (e.g. rent, phone, Netflix)",
            ),
            ToolParameter::required("amount", ParameterType::Number, "Amount (KRW)"),
            ToolParameter::optional(
                "category",
                ParameterType::String,
                "Category (e.g. housing, telecom, insurance, subscription, transport, other)",
            ),
        ]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let name: String = arguments.get("name")?;
        let amount: f64 = arguments.get("amount")?;
        let category: Option<String> = arguments.get_optional("category")?;

        let expense = self
            .ledger
            .add_fixed_expense(&name, amount, category.as_deref())?;

        let mut output = format!(
            "Fixed expense '{}' added at {}.",
            expense.name,
            format_amount(expense.amount)
        );
        if let Some(category) = &expense.category {
            output.push_str(&format!(" (category: {})", category));
        }
        output.push_str(&format!(" [ID: {}]", expense.id));
        Ok(output)
    }
}

pub struct ListFixedExpensesTool {
    ledger: Ledger,
}

impl ListFixedExpensesTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for ListFixedExpensesTool {
    fn name(&self) -> &str {
        "list_fixed_expenses"
    }

    fn description(&self) -> &str {
        "List all active fixed expenses."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        Vec::new()
    }

    async fn execute(&self, _arguments: &ToolArguments) -> Result<String> {
        let expenses = self.ledger.list_fixed_expenses()?;
        if expenses.is_empty() {
            return Ok("No fixed expenses registered.".to_string());
        }

        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let mut lines = vec!["📋 Fixed expenses:".to_string()];
        for expense in &expenses {
            let mut line = format!(
                "  - [{}] {}: {}",
                expense.id,
                expense.name,
                format_amount(expense.amount)
            );
            if let Some(category) = &expense.category {
                line.push_str(&format!(" ({})", category));
            }
            lines.push(line);
        }
        lines.push(format!("\nTotal fixed expenses: {}", format_amount(total)));

        Ok(lines.join("\n"))
    }
}

pub struct RemoveFixedExpenseTool {
    ledger: Ledger,
}

impl RemoveFixedExpenseTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for RemoveFixedExpenseTool {
    fn name(&self) -> &str {
        "remove_fixed_expense"
    }

    fn description(&self) -> &str {
        "Remove a fixed expense. Use the ID shown by list_fixed_expenses."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::required(
            "expense_id",
            ParameterType::Integer,
            "ID of the fixed expense to remove",
        )]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let expense_id: i64 = arguments.get("expense_id")?;

        if self.ledger.remove_fixed_expense(expense_id)? {
            Ok(format!("Fixed expense ID {} removed.", expense_id))
        } else {
            Ok(format!("No fixed expense found with ID {}.", expense_id))
        }
    }
}
