use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::terminal::normalize_symbol;
use crate::types::{ChartSnapshot, Quote, Timeframe};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Selected instrument.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionBody {
    pub symbol: String,
}

/// Period preference update.
#[derive(Debug, Deserialize)]
pub struct TimeframeRequest {
    pub timeframe: String,
}

#[derive(Debug, Serialize)]
pub struct TimeframeResponse {
    pub timeframe: Timeframe,
    pub label: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(get_quotes))
        .route("/quotes/:symbol", get(get_quote))
        .route("/chart", get(get_chart))
        .route("/selection", get(get_selection).put(put_selection))
        .route("/timeframe", put(put_timeframe))
}

/// GET /api/market/quotes
async fn get_quotes(State(state): State<AppState>) -> Json<ApiResponse<Vec<Quote>>> {
    Json(ApiResponse {
        data: state.terminal.quotes().await,
    })
}

/// GET /api/market/quotes/:symbol
async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Quote>>> {
    let symbol = normalize_symbol(&symbol)
        .ok_or_else(|| AppError::BadRequest("symbol is required".to_string()))?;
    let quote = state
        .terminal
        .quote(&symbol)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Unknown symbol: {}", symbol)))?;
    Ok(Json(ApiResponse { data: quote }))
}

/// GET /api/market/chart
async fn get_chart(State(state): State<AppState>) -> Json<ApiResponse<ChartSnapshot>> {
    Json(ApiResponse {
        data: state.terminal.chart().await,
    })
}

/// GET /api/market/selection
async fn get_selection(State(state): State<AppState>) -> Json<ApiResponse<SelectionBody>> {
    Json(ApiResponse {
        data: SelectionBody {
            symbol: state.terminal.selected(),
        },
    })
}

/// PUT /api/market/selection
async fn put_selection(
    State(state): State<AppState>,
    Json(body): Json<SelectionBody>,
) -> Result<Json<ApiResponse<SelectionBody>>> {
    let symbol = state
        .terminal
        .select(&body.symbol)
        .ok_or_else(|| AppError::BadRequest("symbol is required".to_string()))?;
    Ok(Json(ApiResponse {
        data: SelectionBody { symbol },
    }))
}

/// PUT /api/market/timeframe
async fn put_timeframe(
    State(state): State<AppState>,
    Json(request): Json<TimeframeRequest>,
) -> Result<Json<ApiResponse<TimeframeResponse>>> {
    let timeframe = Timeframe::from_str(&request.timeframe).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown timeframe: {}", request.timeframe))
    })?;
    state.terminal.set_timeframe(timeframe);
    Ok(Json(ApiResponse {
        data: TimeframeResponse {
            timeframe,
            label: timeframe.label(),
        },
    }))
}
