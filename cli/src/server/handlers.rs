//! HTTP route handlers

use super::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use budgie_core::error::LedgerError;
use budgie_core::ledger::{BudgetStatus, CategoryBreakdown, FixedExpense};
use budgie_core::{Error, ResetOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
    pub conversation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ResetResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub year_month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IncomeData {
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FixedExpensesData {
    pub items: Vec<FixedExpense>,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct SavingsData {
    pub target: f64,
    pub actual: f64,
    pub progress_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub year_month: String,
    pub income: Option<IncomeData>,
    pub fixed_expenses: FixedExpensesData,
    pub savings: Option<SavingsData>,
    pub budget_status: BudgetStatus,
    pub category_analysis: Vec<CategoryBreakdown>,
}

/// Error body: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn processing(e: Error) -> Self {
        error!("Error processing chat: {}", e);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("Error processing message: {}", e),
        }
    }

    fn from_ledger(e: LedgerError) -> Self {
        let status = match e {
            LedgerError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Dashboard query failed: {}", e);
        }
        Self {
            status,
            detail: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// POST /api/v1/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(
        "Received chat request: {}",
        request.content.chars().take(100).collect::<String>()
    );

    let (agent, conversation_id) = state
        .sessions
        .get_or_create(request.conversation_id.as_deref())
        .await
        .map_err(ApiError::processing)?;

    let content = agent
        .lock()
        .await
        .run(&request.content)
        .await
        .map_err(ApiError::processing)?;

    Ok(Json(ChatResponse {
        content,
        conversation_id,
    }))
}

/// POST /api/v1/chat/reset?conversation_id=...
pub async fn reset_chat(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Json<ResetResponse> {
    let response = match state.sessions.reset(query.conversation_id.as_deref()).await {
        ResetOutcome::Reset(conversation_id) => ResetResponse {
            status: "reset",
            conversation_id: Some(conversation_id),
        },
        ResetOutcome::NotFound => ResetResponse {
            status: "no_conversation_found",
            conversation_id: None,
        },
    };
    Json(response)
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.clone(),
        base_url: state.base_url.clone(),
    })
}

/// GET /api/v1/dashboard?year_month=YYYY-MM (defaults to the current month)
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let year_month = query
        .year_month
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m").to_string());
    let ledger = &state.ledger;

    let income = ledger
        .get_monthly_income(&year_month)
        .map_err(ApiError::from_ledger)?
        .map(|income| IncomeData {
            amount: income.amount,
            description: income.description,
        });

    let fixed_expenses = FixedExpensesData {
        items: ledger.list_fixed_expenses().map_err(ApiError::from_ledger)?,
        total: ledger.total_fixed_expenses().map_err(ApiError::from_ledger)?,
    };

    let savings = ledger
        .get_savings_plan(&year_month)
        .map_err(ApiError::from_ledger)?
        .map(|plan| SavingsData {
            target: plan.target_amount,
            actual: plan.actual_amount,
            progress_percentage: (plan.progress() * 10.0).round() / 10.0,
        });

    let budget_status = ledger
        .budget_status(&year_month)
        .map_err(ApiError::from_ledger)?;
    let category_analysis = ledger
        .category_analysis(&year_month)
        .map_err(ApiError::from_ledger)?;

    Ok(Json(DashboardResponse {
        year_month,
        income,
        fixed_expenses,
        savings,
        budget_status,
        category_analysis,
    }))
}
