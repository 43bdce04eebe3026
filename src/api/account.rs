use crate::api::ApiResponse;
use crate::error::Result;
use crate::types::{AccountInfo, LoginRequest, LoginResponse};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/account", get(get_account))
        .route("/api/account/login", post(login))
}

/// GET /api/account
async fn get_account(State(state): State<AppState>) -> Json<ApiResponse<AccountInfo>> {
    Json(ApiResponse {
        data: state.account.account().clone(),
    })
}

/// POST /api/account/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let response = state.account.login(request).await?;
    Ok(Json(ApiResponse { data: response }))
}
