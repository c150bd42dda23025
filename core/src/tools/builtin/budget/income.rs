//! Monthly income tools

use super::year_month_parameter;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::tools::builtin::format_amount;
use crate::tools::{ParameterType, Tool, ToolArguments, ToolParameter};
use async_trait::async_trait;

/// Set or update the income of a month
pub struct SetMonthlyIncomeTool {
    ledger: Ledger,
}

impl SetMonthlyIncomeTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for SetMonthlyIncomeTool {
    fn name(&self) -> &str {
        "set_monthly_income"
    }

    fn description(&self) -> &str {
        "Set the monthly income. If income for that month already exists, it is updated."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            year_month_parameter(),
            ToolParameter::required("amount", ParameterType::Number, "Monthly income amount (KRW)"),
            ToolParameter::optional(
                "description",
                ParameterType::String,
                "Description of the income (optional)",
            ),
        ]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;
        let amount: f64 = arguments.get("amount")?;
        let description: Option<String> = arguments.get_optional("description")?;

        let income = self
            .ledger
            .set_monthly_income(&year_month, amount, description.as_deref())?;

        let mut output = format!(
            "Monthly income for {} set to {}.",
            year_month,
            format_amount(income.amount)
        );
        if let Some(description) = income.description {
            output.push_str(&format!(" (description: {})", description));
        }
        Ok(output)
    }
}

/// Look up the income of a month
pub struct GetMonthlyIncomeTool {
    ledger: Ledger,
}

impl GetMonthlyIncomeTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for GetMonthlyIncomeTool {
    fn name(&self) -> &str {
        "get_monthly_income"
    }

    fn description(&self) -> &str {
        "Get the income recorded for a specific month."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![year_month_parameter()]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;

        match self.ledger.get_monthly_income(&year_month)? {
            Some(income) => {
                let mut output = format!(
                    "Monthly income for {}: {}",
                    year_month,
                    format_amount(income.amount)
                );
                if let Some(description) = income.description {
                    output.push_str(&format!(" (description: {})", description));
                }
                Ok(output)
            }
            None => Ok(format!("No income recorded for {}.", year_month)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> ToolArguments {
        match value {
            serde_json::Value::Object(map) => map.into(),
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_set_and_get_income() {
        let ledger = Ledger::in_memory().unwrap();
        let set = SetMonthlyIncomeTool::new(ledger.clone());
        let get = GetMonthlyIncomeTool::new(ledger);

        let output = set
            .execute(&args(json!({
                "year_month": "2024-01",
                "amount": 3500000,
                "description": "salary"
            })))
            .await
            .unwrap();
        assert_eq!(
            output,
            "Monthly income for 2024-01 set to ₩3,500,000. (description: salary)"
        );

        let output = get
            .execute(&args(json!({"year_month": "2024-01"})))
            .await
            .unwrap();
        assert_eq!(output, "Monthly income for 2024-01: ₩3,500,000 (description: salary)");
    }

    #[tokio::test]
    async fn test_get_missing_income() {
        let get = GetMonthlyIncomeTool::new(Ledger::in_memory().unwrap());
        let output = get
            .execute(&args(json!({"year_month": "2030-12"})))
            .await
            .unwrap();
        assert_eq!(output, "No income recorded for 2030-12.");
    }
}
