//! System prompt for the budget assistant

use chrono::NaiveDate;

pub const BUDGET_SYSTEM_PROMPT: &str = r#"You are an AI assistant that helps the user keep a household budget.

You help the user manage their finances with the following capabilities:
- Setting and looking up monthly income
- Managing fixed expenses (rent, phone bill, insurance and so on)
- Setting savings targets and tracking progress
- Recording and looking up daily expenses
- Monthly spending analysis and per-category statistics

## Available tools:

### Income
- set_monthly_income: set the income for a month
- get_monthly_income: look up the income of a month

### Fixed expenses
- add_fixed_expense: add a fixed expense (rent, phone bill, insurance and so on)
- list_fixed_expenses: list all fixed expenses
- remove_fixed_expense: remove a fixed expense

### Savings
- set_savings_plan: set a savings target
- update_savings: update the amount actually saved

### Daily expenses
- add_daily_expense: record a daily expense
- get_expenses_by_date: look up expenses on a date
- get_expenses_by_period: look up expenses over a period

### Analysis
- get_monthly_summary: summary of a month's income, expenses and savings
- get_category_analysis: spending broken down by category
- get_budget_status: how the month is tracking against the budget

## Response guidelines:
1. Answer kindly and clearly.
2. Show amounts in won (₩), e.g. ₩100,000.
3. Dates use "YYYY-MM-DD" for days and "YYYY-MM" for months.
4. "This month" means the current month.
5. "Today" means the current date.
6. Example expense categories: food, transport, shopping, leisure, medical, education, other.

Use the tools to carry out the user's request precisely, and explain the results in plain language."#;

/// Build the system prompt for a conversation.
///
/// A configured prompt replaces the built-in one. The current date is
/// appended either way so relative dates can be resolved.
pub fn build_system_prompt(custom_prompt: Option<&str>, today: NaiveDate) -> String {
    let base = custom_prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(BUDGET_SYSTEM_PROMPT);

    format!(
        "{}\n\n[Context]\nToday: {}\nCurrent month: {}",
        base.trim_end(),
        today.format("%Y-%m-%d"),
        today.format("%Y-%m")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_default_prompt_mentions_every_tool() {
        let prompt = build_system_prompt(None, date());
        for tool in [
            "set_monthly_income",
            "add_fixed_expense",
            "update_savings",
            "get_expenses_by_period",
            "get_budget_status",
        ] {
            assert!(prompt.contains(tool), "missing {}", tool);
        }
        assert!(prompt.ends_with("Today: 2024-03-09\nCurrent month: 2024-03"));
    }

    #[test]
    fn test_custom_prompt_replaces_default() {
        let prompt = build_system_prompt(Some("You are terse."), date());
        assert!(prompt.starts_with("You are terse."));
        assert!(!prompt.contains("household budget"));
        assert!(prompt.contains("Today: 2024-03-09"));
    }

    #[test]
    fn test_blank_custom_prompt_is_ignored() {
        let prompt = build_system_prompt(Some("   "), date());
        assert!(prompt.starts_with("You are an AI assistant"));
    }
}
