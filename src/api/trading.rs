use crate::api::ApiResponse;
use crate::error::Result;
use crate::types::{OrderAck, OrderTicket, PositionsSnapshot};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub id: String,
    pub removed: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/positions", get(get_positions))
        .route("/positions/:id", delete(close_position))
        .route("/orders", post(submit_order))
}

/// GET /api/trading/positions
async fn get_positions(State(state): State<AppState>) -> Json<ApiResponse<PositionsSnapshot>> {
    Json(ApiResponse {
        data: state.terminal.positions().await,
    })
}

/// DELETE /api/trading/positions/:id
///
/// Succeeds whether or not the position was open.
async fn close_position(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<CloseResponse>> {
    let removed = state.terminal.close_position(&id).await;
    Json(ApiResponse {
        data: CloseResponse { id, removed },
    })
}

/// POST /api/trading/orders
async fn submit_order(
    State(state): State<AppState>,
    Json(ticket): Json<OrderTicket>,
) -> Result<Json<ApiResponse<OrderAck>>> {
    let ack = state.orders.submit(ticket).await?;
    Ok(Json(ApiResponse { data: ack }))
}
