//! SQLite-backed ledger

use super::models::{
    round1, BudgetHealth, BudgetStatus, CategoryBreakdown, DailyExpense, FixedExpense,
    MonthlyIncome, MonthlySummary, SavingsPlan,
};
use crate::error::LedgerError;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS monthly_income (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year_month TEXT NOT NULL UNIQUE,
    amount REAL NOT NULL,
    description TEXT,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS fixed_expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS savings_plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year_month TEXT NOT NULL UNIQUE,
    target_amount REAL NOT NULL,
    actual_amount REAL NOT NULL DEFAULT 0,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS daily_expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    description TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_daily_expenses_date ON daily_expenses(date);
";

/// Personal budget ledger.
///
/// Cloning is cheap; clones share one connection.
#[derive(Clone)]
pub struct Ledger {
    connection: Arc<Mutex<Connection>>,
}

impl Ledger {
    /// Open (or create) a ledger database file
    pub fn open(db_path: &Path) -> LedgerResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| LedgerError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }
        Self::from_connection(Connection::open(db_path)?)
    }

    /// A throwaway ledger living in memory
    pub fn in_memory() -> LedgerResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> LedgerResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> LedgerResult<MutexGuard<'_, Connection>> {
        self.connection.lock().map_err(|_| LedgerError::Poisoned)
    }

    // ---- income ----

    /// Set or replace the income of a month
    pub fn set_monthly_income(
        &self,
        year_month: &str,
        amount: f64,
        description: Option<&str>,
    ) -> LedgerResult<MonthlyIncome> {
        validate_year_month(year_month)?;
        validate_amount("amount", amount)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO monthly_income (year_month, amount, description) VALUES (?1, ?2, ?3)
             ON CONFLICT(year_month) DO UPDATE SET
                amount = excluded.amount,
                description = excluded.description,
                updated_at = CURRENT_TIMESTAMP",
            params![year_month, amount, description],
        )?;

        Ok(conn.query_row(
            "SELECT id, year_month, amount, description FROM monthly_income WHERE year_month = ?1",
            params![year_month],
            income_from_row,
        )?)
    }

    pub fn get_monthly_income(&self, year_month: &str) -> LedgerResult<Option<MonthlyIncome>> {
        validate_year_month(year_month)?;
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, year_month, amount, description FROM monthly_income WHERE year_month = ?1",
                params![year_month],
                income_from_row,
            )
            .optional()?)
    }

    // ---- fixed expenses ----

    pub fn add_fixed_expense(
        &self,
        name: &str,
        amount: f64,
        category: Option<&str>,
    ) -> LedgerResult<FixedExpense> {
        validate_not_blank("name", name)?;
        validate_amount("amount", amount)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO fixed_expenses (name, amount, category) VALUES (?1, ?2, ?3)",
            params![name, amount, category],
        )?;

        Ok(FixedExpense {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            amount,
            category: category.map(str::to_string),
            is_active: true,
        })
    }

    /// Active fixed expenses in insertion order
    pub fn list_fixed_expenses(&self) -> LedgerResult<Vec<FixedExpense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, amount, category, is_active FROM fixed_expenses
             WHERE is_active = 1 ORDER BY id",
        )?;
        let rows = stmt.query_map([], fixed_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Deactivate a fixed expense. Returns false if the id is unknown.
    pub fn remove_fixed_expense(&self, expense_id: i64) -> LedgerResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE fixed_expenses SET is_active = 0 WHERE id = ?1",
            params![expense_id],
        )?;
        Ok(changed > 0)
    }

    pub fn total_fixed_expenses(&self) -> LedgerResult<f64> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM fixed_expenses WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?)
    }

    // ---- savings ----

    /// Set the savings target of a month, keeping any recorded actual savings
    pub fn set_savings_plan(&self, year_month: &str, target_amount: f64) -> LedgerResult<SavingsPlan> {
        validate_year_month(year_month)?;
        validate_amount("target_amount", target_amount)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO savings_plans (year_month, target_amount) VALUES (?1, ?2)
             ON CONFLICT(year_month) DO UPDATE SET
                target_amount = excluded.target_amount,
                updated_at = CURRENT_TIMESTAMP",
            params![year_month, target_amount],
        )?;

        Ok(conn.query_row(
            "SELECT id, year_month, target_amount, actual_amount FROM savings_plans WHERE year_month = ?1",
            params![year_month],
            savings_from_row,
        )?)
    }

    /// Record actual savings. Returns `None` when the month has no plan.
    pub fn update_savings(&self, year_month: &str, amount: f64) -> LedgerResult<Option<SavingsPlan>> {
        validate_year_month(year_month)?;
        validate_amount("amount", amount)?;

        let changed = self.conn()?.execute(
            "UPDATE savings_plans SET actual_amount = ?2, updated_at = CURRENT_TIMESTAMP
             WHERE year_month = ?1",
            params![year_month, amount],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_savings_plan(year_month)
    }

    pub fn get_savings_plan(&self, year_month: &str) -> LedgerResult<Option<SavingsPlan>> {
        validate_year_month(year_month)?;
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                "SELECT id, year_month, target_amount, actual_amount FROM savings_plans WHERE year_month = ?1",
                params![year_month],
                savings_from_row,
            )
            .optional()?)
    }

    // ---- daily expenses ----

    pub fn add_daily_expense(
        &self,
        date: &str,
        amount: f64,
        category: &str,
        description: Option<&str>,
    ) -> LedgerResult<DailyExpense> {
        validate_date("date", date)?;
        validate_amount("amount", amount)?;
        validate_not_blank("category", category)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO daily_expenses (date, amount, category, description) VALUES (?1, ?2, ?3, ?4)",
            params![date, amount, category, description],
        )?;

        Ok(DailyExpense {
            id: conn.last_insert_rowid(),
            date: date.to_string(),
            amount,
            category: category.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub fn expenses_by_date(&self, date: &str) -> LedgerResult<Vec<DailyExpense>> {
        validate_date("date", date)?;
        self.query_daily(
            "SELECT id, date, amount, category, description FROM daily_expenses
             WHERE date = ?1 ORDER BY id",
            params![date],
        )
    }

    /// Expenses between two dates, both inclusive, ordered by date
    pub fn expenses_by_period(&self, start_date: &str, end_date: &str) -> LedgerResult<Vec<DailyExpense>> {
        validate_date("start_date", start_date)?;
        validate_date("end_date", end_date)?;
        self.query_daily(
            "SELECT id, date, amount, category, description FROM daily_expenses
             WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
            params![start_date, end_date],
        )
    }

    pub fn monthly_daily_expenses(&self, year_month: &str) -> LedgerResult<Vec<DailyExpense>> {
        validate_year_month(year_month)?;
        self.query_daily(
            "SELECT id, date, amount, category, description FROM daily_expenses
             WHERE date LIKE ?1 || '%' ORDER BY date, id",
            params![year_month],
        )
    }

    pub fn total_daily_expenses(&self, year_month: &str) -> LedgerResult<f64> {
        validate_year_month(year_month)?;
        let conn = self.conn()?;
        Ok(conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM daily_expenses WHERE date LIKE ?1 || '%'",
            params![year_month],
            |row| row.get(0),
        )?)
    }

    fn query_daily<P: rusqlite::Params>(&self, sql: &str, params: P) -> LedgerResult<Vec<DailyExpense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, daily_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ---- analysis ----

    pub fn monthly_summary(&self, year_month: &str) -> LedgerResult<MonthlySummary> {
        let income = self.get_monthly_income(year_month)?;
        let savings = self.get_savings_plan(year_month)?;

        let total_income = income.map(|i| i.amount).unwrap_or(0.0);
        let total_fixed_expenses = self.total_fixed_expenses()?;
        let total_daily_expenses = self.total_daily_expenses(year_month)?;
        let savings_target = savings.as_ref().map(|s| s.target_amount).unwrap_or(0.0);
        let savings_actual = savings.as_ref().map(|s| s.actual_amount).unwrap_or(0.0);

        let total_expenses = total_fixed_expenses + total_daily_expenses;

        Ok(MonthlySummary {
            year_month: year_month.to_string(),
            total_income,
            total_fixed_expenses,
            total_daily_expenses,
            total_expenses,
            savings_target,
            savings_actual,
            remaining_budget: total_income - total_expenses - savings_actual,
        })
    }

    /// Daily spending per category, largest first
    pub fn category_analysis(&self, year_month: &str) -> LedgerResult<Vec<CategoryBreakdown>> {
        let expenses = self.monthly_daily_expenses(year_month)?;

        let mut breakdown: Vec<CategoryBreakdown> = Vec::new();
        let mut total = 0.0;
        for expense in &expenses {
            total += expense.amount;
            match breakdown.iter_mut().find(|b| b.category == expense.category) {
                Some(entry) => {
                    entry.total_amount += expense.amount;
                    entry.count += 1;
                }
                None => breakdown.push(CategoryBreakdown {
                    category: expense.category.clone(),
                    total_amount: expense.amount,
                    count: 1,
                    percentage: 0.0,
                }),
            }
        }

        for entry in &mut breakdown {
            entry.percentage = if total > 0.0 {
                round1(entry.total_amount / total * 100.0)
            } else {
                0.0
            };
        }
        breakdown.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));

        Ok(breakdown)
    }

    pub fn budget_status(&self, year_month: &str) -> LedgerResult<BudgetStatus> {
        let summary = self.monthly_summary(year_month)?;

        let savings_progress = if summary.savings_target > 0.0 {
            summary.savings_actual / summary.savings_target * 100.0
        } else {
            0.0
        };

        Ok(BudgetStatus {
            year_month: summary.year_month,
            total_income: summary.total_income,
            total_expenses: summary.total_expenses,
            remaining: summary.remaining_budget,
            savings_progress: round1(savings_progress),
            status: BudgetHealth::classify(summary.remaining_budget, summary.total_income),
        })
    }
}

fn income_from_row(row: &Row<'_>) -> rusqlite::Result<MonthlyIncome> {
    Ok(MonthlyIncome {
        id: row.get(0)?,
        year_month: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
    })
}

fn fixed_from_row(row: &Row<'_>) -> rusqlite::Result<FixedExpense> {
    Ok(FixedExpense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        is_active: row.get(4)?,
    })
}

fn savings_from_row(row: &Row<'_>) -> rusqlite::Result<SavingsPlan> {
    Ok(SavingsPlan {
        id: row.get(0)?,
        year_month: row.get(1)?,
        target_amount: row.get(2)?,
        actual_amount: row.get(3)?,
    })
}

fn daily_from_row(row: &Row<'_>) -> rusqlite::Result<DailyExpense> {
    Ok(DailyExpense {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
    })
}

fn invalid(field: &str, message: impl Into<String>) -> LedgerError {
    LedgerError::InvalidInput {
        field: field.to_string(),
        message: message.into(),
    }
}

/// `YYYY-MM`
pub fn validate_year_month(year_month: &str) -> LedgerResult<()> {
    let well_formed = year_month.len() == 7
        && NaiveDate::parse_from_str(&format!("{}-01", year_month), "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(invalid(
            "year_month",
            format!("expected YYYY-MM, got '{}'", year_month),
        ))
    }
}

/// `YYYY-MM-DD`
pub fn validate_date(field: &str, date: &str) -> LedgerResult<()> {
    let well_formed = date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(invalid(field, format!("expected YYYY-MM-DD, got '{}'", date)))
    }
}

fn validate_amount(field: &str, amount: f64) -> LedgerResult<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a non-negative number, got {}", amount)))
    }
}

fn validate_not_blank(field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        Err(invalid(field, "must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ledger() -> Ledger {
        Ledger::in_memory().unwrap()
    }

    #[test]
    fn test_income_upsert() {
        let ledger = ledger();
        ledger
            .set_monthly_income("2024-01", 3_000_000.0, Some("salary"))
            .unwrap();
        let updated = ledger.set_monthly_income("2024-01", 3_200_000.0, None).unwrap();

        assert_eq!(updated.amount, 3_200_000.0);
        assert_eq!(updated.description, None);
        assert!(ledger.get_monthly_income("2024-02").unwrap().is_none());
    }

    #[test]
    fn test_fixed_expense_soft_delete() {
        let ledger = ledger();
        let rent = ledger.add_fixed_expense("rent", 500_000.0, Some("housing")).unwrap();
        ledger.add_fixed_expense("phone", 50_000.0, None).unwrap();

        assert!(ledger.remove_fixed_expense(rent.id).unwrap());
        assert!(!ledger.remove_fixed_expense(999).unwrap());

        let active = ledger.list_fixed_expenses().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "phone");
        assert_eq!(ledger.total_fixed_expenses().unwrap(), 50_000.0);
    }

    #[test]
    fn test_savings_plan_keeps_actual_on_retarget() {
        let ledger = ledger();
        assert!(ledger.update_savings("2024-01", 10.0).unwrap().is_none());

        ledger.set_savings_plan("2024-01", 500_000.0).unwrap();
        ledger.update_savings("2024-01", 200_000.0).unwrap();
        let plan = ledger.set_savings_plan("2024-01", 400_000.0).unwrap();

        assert_eq!(plan.target_amount, 400_000.0);
        assert_eq!(plan.actual_amount, 200_000.0);
        assert_eq!(plan.progress(), 50.0);
    }

    #[test]
    fn test_daily_expense_queries() {
        let ledger = ledger();
        ledger.add_daily_expense("2024-01-15", 12_000.0, "food", Some("lunch")).unwrap();
        ledger.add_daily_expense("2024-01-10", 3_000.0, "transport", None).unwrap();
        ledger.add_daily_expense("2024-02-01", 9_000.0, "food", None).unwrap();

        assert_eq!(ledger.expenses_by_date("2024-01-15").unwrap().len(), 1);

        let period = ledger.expenses_by_period("2024-01-01", "2024-01-31").unwrap();
        let dates: Vec<_> = period.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-10", "2024-01-15"]);

        assert_eq!(ledger.total_daily_expenses("2024-01").unwrap(), 15_000.0);
        assert_eq!(ledger.monthly_daily_expenses("2024-02").unwrap().len(), 1);
    }

    #[test]
    fn test_summary_and_status() {
        let ledger = ledger();
        ledger.set_monthly_income("2024-01", 1_000_000.0, None).unwrap();
        ledger.add_fixed_expense("rent", 500_000.0, None).unwrap();
        ledger.add_daily_expense("2024-01-03", 350_000.0, "shopping", None).unwrap();
        ledger.set_savings_plan("2024-01", 100_000.0).unwrap();
        ledger.update_savings("2024-01", 80_000.0).unwrap();

        let summary = ledger.monthly_summary("2024-01").unwrap();
        assert_eq!(summary.total_expenses, 850_000.0);
        assert_eq!(summary.remaining_budget, 70_000.0);

        let status = ledger.budget_status("2024-01").unwrap();
        assert_eq!(status.status, BudgetHealth::Warning);
        assert_eq!(status.savings_progress, 80.0);
    }

    #[test]
    fn test_category_analysis_sorted_with_percentages() {
        let ledger = ledger();
        ledger.add_daily_expense("2024-03-01", 1_000.0, "transport", None).unwrap();
        ledger.add_daily_expense("2024-03-02", 2_000.0, "food", None).unwrap();
        ledger.add_daily_expense("2024-03-03", 3_000.0, "food", None).unwrap();

        let analysis = ledger.category_analysis("2024-03").unwrap();
        assert_eq!(analysis[0].category, "food");
        assert_eq!(analysis[0].count, 2);
        assert_eq!(analysis[0].percentage, 83.3);
        assert_eq!(analysis[1].percentage, 16.7);

        assert!(ledger.category_analysis("2024-04").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_input() {
        let ledger = ledger();
        assert!(matches!(
            ledger.set_monthly_income("2024-13", 1.0, None),
            Err(LedgerError::InvalidInput { .. })
        ));
        assert!(ledger.add_daily_expense("2024/01/01", 1.0, "food", None).is_err());
        assert!(ledger.add_daily_expense("2024-01-01", -5.0, "food", None).is_err());
        assert!(ledger.add_fixed_expense("  ", 1.0, None).is_err());
    }

    #[test]
    fn test_file_ledger_persists_between_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("budget.db");

        Ledger::open(&path)
            .unwrap()
            .set_monthly_income("2024-05", 42.0, None)
            .unwrap();

        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(
            reopened.get_monthly_income("2024-05").unwrap().unwrap().amount,
            42.0
        );
    }

    #[test]
    fn test_unwritable_location_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").unwrap();

        let result = Ledger::open(&blocker.join("sub").join("budget.db"));
        assert!(matches!(result, Err(LedgerError::CreateDir { .. })));
    }
}
