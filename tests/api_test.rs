//! Integration tests for API endpoints

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use tradepro::config::Config;
use tradepro::{app, AppState};

fn state() -> AppState {
    AppState::new(Config {
        login_delay: Duration::ZERO,
        ..Config::default()
    })
}

async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let state = state();
    let (status, body) = send(&state, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["selected"], "BTC");
}

#[tokio::test]
async fn test_quotes_in_seed_order() {
    let state = state();
    let (status, body) = send(&state, Method::GET, "/api/market/quotes", None).await;

    assert_eq!(status, StatusCode::OK);
    let symbols: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(
        symbols,
        vec!["BTC", "XAUUSD", "AAPL", "EURUSD", "GBPUSD", "USDJPY", "USTEC", "USOIL"]
    );
    assert_eq!(body["data"][0]["displayName"], "Bitcoin");
}

#[tokio::test]
async fn test_single_quote() {
    let state = state();

    let (status, body) = send(&state, Method::GET, "/api/market/quotes/eurusd", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bid"], 1.1651);

    let (status, body) = send(&state, Method::GET, "/api/market/quotes/DOGE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Unknown symbol: DOGE");
}

#[tokio::test]
async fn test_chart_for_selection() {
    let state = state();
    let (status, body) = send(&state, Method::GET, "/api/market/chart", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["symbol"], "BTC");
    assert_eq!(body["data"]["timeframe"], "15m");
    assert_eq!(body["data"]["candles"].as_array().unwrap().len(), 31);
    assert_eq!(
        body["data"]["currentPrice"],
        body["data"]["candles"][30]["close"]
    );
}

#[tokio::test]
async fn test_selection_round_trip() {
    let state = state();

    let (status, body) = send(
        &state,
        Method::PUT,
        "/api/market/selection",
        Some(json!({"symbol": "xauusd"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["symbol"], "XAUUSD");

    let (_, body) = send(&state, Method::GET, "/api/market/selection", None).await;
    assert_eq!(body["data"]["symbol"], "XAUUSD");

    let (status, _) = send(
        &state,
        Method::PUT,
        "/api/market/selection",
        Some(json!({"symbol": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_timeframe() {
    let state = state();

    let (status, body) = send(
        &state,
        Method::PUT,
        "/api/market/timeframe",
        Some(json!({"timeframe": "1h"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["timeframe"], "1h");
    assert_eq!(body["data"]["label"], "1H");

    let (status, body) = send(
        &state,
        Method::PUT,
        "/api/market/timeframe",
        Some(json!({"timeframe": "2w"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown timeframe: 2w");

    let (_, body) = send(&state, Method::GET, "/api/market/chart", None).await;
    assert_eq!(body["data"]["timeframe"], "1h");
}

#[tokio::test]
async fn test_positions_and_close() {
    let state = state();

    let (status, body) = send(&state, Method::GET, "/api/trading/positions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["positions"][0]["id"], "1");
    assert_eq!(body["data"]["positions"][0]["profitLoss"], -0.26);
    assert_eq!(body["data"]["totalProfitLoss"], -0.26);

    let (status, body) = send(&state, Method::DELETE, "/api/trading/positions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);

    let (status, body) = send(&state, Method::DELETE, "/api/trading/positions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], false);

    let (_, body) = send(&state, Method::GET, "/api/trading/positions", None).await;
    assert!(body["data"]["positions"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["totalProfitLoss"], 0.0);
}

#[tokio::test]
async fn test_order_ticket() {
    let state = state();

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/trading/orders",
        Some(json!({
            "symbol": "AAPL",
            "side": "sell",
            "orderType": "limit",
            "quantity": 5.0,
            "price": 240.0,
            "takeProfit": 220.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["side"], "sell");
    assert_eq!(body["data"]["referencePrice"], 240.0);
    assert!(body["data"]["intentId"].is_string());

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/trading/orders",
        Some(json!({"symbol": "AAPL", "side": "buy"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid order: quantity must be greater than zero");

    let (_, body) = send(&state, Method::GET, "/api/trading/positions", None).await;
    assert_eq!(body["data"]["positions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_account_and_login() {
    let state = state();

    let (status, body) = send(&state, Method::GET, "/api/account", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], 9999.24);
    assert_eq!(body["data"]["freeMargin"], 9996.52);
    assert_eq!(body["data"]["marginLevel"], 367615.12);

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/account/login",
        Some(json!({"username": "trader", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], 50000.0);

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/account/login",
        Some(json!({"username": "trader"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please fill in all fields");
}
