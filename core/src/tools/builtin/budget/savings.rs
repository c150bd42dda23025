//! Savings plan tools

use super::year_month_parameter;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::tools::builtin::format_amount;
use crate::tools::{ParameterType, Tool, ToolArguments, ToolParameter};
use async_trait::async_trait;

pub struct SetSavingsPlanTool {
    ledger: Ledger,
}

impl SetSavingsPlanTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for SetSavingsPlanTool {
    fn name(&self) -> &str {
        "set_savings_plan"
    }

    fn description(&self) -> &str {
        "Set the savings target for a month."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            year_month_parameter(),
            ToolParameter::required(
                "target_amount",
                ParameterType::Number,
                "Savings target amount (KRW)",
            ),
        ]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;
        let target_amount: f64 = arguments.get("target_amount")?;

        let plan = self.ledger.set_savings_plan(&year_month, target_amount)?;

        Ok(format!(
            "Savings target for {} set to {}. (saved so far: {})",
            year_month,
            format_amount(plan.target_amount),
            format_amount(plan.actual_amount)
        ))
    }
}

pub struct UpdateSavingsTool {
    ledger: Ledger,
}

impl UpdateSavingsTool {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for UpdateSavingsTool {
    fn name(&self) -> &str {
        "update_savings"
    }

    fn description(&self) -> &str {
        "Update the amount actually saved in a month."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            year_month_parameter(),
            ToolParameter::required("amount", ParameterType::Number, "Amount actually saved (KRW)"),
        ]
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<String> {
        let year_month: String = arguments.get("year_month")?;
        let amount: f64 = arguments.get("amount")?;

        match self.ledger.update_savings(&year_month, amount)? {
            Some(plan) => Ok(format!(
                "Savings for {} updated to {}. (target: {}, progress: {:.1}%)",
                year_month,
                format_amount(plan.actual_amount),
                format_amount(plan.target_amount),
                plan.progress()
            )),
            None => Ok(format!(
                "There is no savings plan for {}. Set a savings target with set_savings_plan first.",
                year_month
            )),
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
    async fn test_update_requires_plan() {
        let ledger = Ledger::in_memory().unwrap();
        let set = SetSavingsPlanTool::new(ledger.clone());
        let update = UpdateSavingsTool::new(ledger);

        let output = update
            .execute(&args(json!({"year_month": "2024-02", "amount": 100000})))
            .await
            .unwrap();
        assert!(output.contains("set_savings_plan"));

        let output = set
            .execute(&args(json!({"year_month": "2024-02", "target_amount": 400000})))
            .await
            .unwrap();
        assert_eq!(
            output,
            "Savings target for 2024-02 set to ₩400,000. (saved so far: ₩0)"
        );

        let output = update
            .execute(&args(json!({"year_month": "2024-02", "amount": 100000})))
            .await
            .unwrap();
        assert_eq!(
            output,
            "Savings for 2024-02 updated to ₩100,000. (target: ₩400,000, progress: 25.0%)"
        );
    }
}
