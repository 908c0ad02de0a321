use analytics::AnalyticsEngine;
use anyhow::Context;
use api_client::{MarketDataProvider, YahooClient};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::{AnalysisSettings, Config};
use database::HistoryRepository;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod telemetry;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub history: HistoryRepository,
    pub market_data: Arc<dyn MarketDataProvider>,
    pub engine: AnalyticsEngine,
    pub analysis: AnalysisSettings,
}

/// Builds the API routes around the shared state.
pub fn router(state: Arc<AppState>, body_limit_mb: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/data", post(handlers::get_market_data))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/history", get(handlers::list_history))
        .route(
            "/api/history/:id",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .route("/api/history/:id/replay", post(handlers::replay_history))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        // Trade files are uploaded inline in the request body.
        .layer(DefaultBodyLimit::max(body_limit_mb * 1024 * 1024))
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialized by the caller.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.history.database_url)
        .await
        .context("Failed to open the history database")?;
    database::run_migrations(&db_pool).await?;
    let history = HistoryRepository::new(db_pool, config.history.limit);

    let market_data = YahooClient::new(&config.market_data)?;

    let app_state = Arc::new(AppState {
        history,
        market_data: Arc::new(market_data),
        engine: AnalyticsEngine::new(),
        analysis: config.analysis.clone(),
    });
    let app = router(app_state, config.server.body_limit_mb);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Web server started and listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::error::ApiError;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use core_types::MarketDataPoint;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct StubProvider {
        points: Vec<MarketDataPoint>,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn fetch_daily(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<MarketDataPoint>, ApiError> {
            if self.points.is_empty() {
                return Err(ApiError::NoData {
                    symbol: symbol.to_string(),
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            Ok(self.points.clone())
        }
    }

    fn bar(day: &str, benchmark_pct: rust_decimal::Decimal) -> MarketDataPoint {
        MarketDataPoint {
            time: day.into(),
            open: dec!(100),
            high: dec!(101),
            low: dec!(99),
            close: dec!(100),
            benchmark_pct,
        }
    }

    async fn app(points: Vec<MarketDataPoint>) -> Router {
        let pool = database::connect_in_memory().await.unwrap();
        database::run_migrations(&pool).await.unwrap();
        let state = Arc::new(AppState {
            history: HistoryRepository::new(pool, 10),
            market_data: Arc::new(StubProvider { points }),
            engine: AnalyticsEngine::new(),
            analysis: AnalysisSettings::default(),
        });
        router(state, 1)
    }

    fn three_days() -> Vec<MarketDataPoint> {
        vec![
            bar("2024-01-02", dec!(0)),
            bar("2024-01-03", dec!(1)),
            bar("2024-01-04", dec!(2)),
        ]
    }

    fn analyze_body() -> Value {
        json!({
            "symbol": "AAPL",
            "startDate": "2024-01-02",
            "endDate": "2024-01-04",
            "capital": 1000,
            "trades": {"trades": [
                {"entryTime": "2024-01-02", "exitTime": "2024-01-03", "entryPrice": 100, "exitPrice": 110, "shares": 2}
            ]}
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_check() {
        let app = app(vec![]).await;
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn analyze_fetches_market_data_and_saves_history() {
        let app = app(three_days()).await;

        let (status, body) = send(&app, "POST", "/api/analyze", Some(analyze_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["finalCapital"], "1020.00");
        assert_eq!(body["report"]["numberOfTrades"], 1);
        assert_eq!(body["report"]["benchmark"], "2.00");
        assert_eq!(body["report"]["equityCurve"].as_array().unwrap().len(), 3);

        let (status, history) = send(&app, "GET", "/api/history", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["id"], body["id"]);
        assert_eq!(history[0]["totalReturn"], "2.00");
        assert_eq!(history[0]["dateRange"], "2024-01-02 - 2024-01-04");
    }

    #[tokio::test]
    async fn analyze_accepts_inline_market_data() {
        // No provider data: the request must not reach it.
        let app = app(vec![]).await;
        let mut body = analyze_body();
        body["marketData"] = serde_json::to_value(three_days()).unwrap();

        let (status, response) = send(&app, "POST", "/api/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["report"]["finalCapital"], "1020.00");
    }

    #[tokio::test]
    async fn malformed_trades_are_rejected_and_not_saved() {
        let app = app(three_days()).await;
        let mut body = analyze_body();
        body["trades"] = json!([{"exitTime": "2024-01-03", "exitPrice": 110}]);

        let (status, response) = send(&app, "POST", "/api/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().contains("entryPrice"));
        let (_, history) = send(&app, "GET", "/api/history", None).await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_positive_capital_is_a_bad_request() {
        let app = app(three_days()).await;
        let mut body = analyze_body();
        body["capital"] = json!(0);

        let (status, _) = send(&app, "POST", "/api/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_arithmetic_is_a_server_error_and_not_saved() {
        let app = app(three_days()).await;
        let mut body = analyze_body();
        body["trades"] = json!([
            {"exitTime": "2024-01-03", "entryPrice": 0, "exitPrice": 1e20, "shares": 1e10}
        ]);

        let (status, response) = send(&app, "POST", "/api/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response["error"].is_string());
        let (_, history) = send(&app, "GET", "/api/history", None).await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_market_data_is_not_found() {
        let app = app(vec![]).await;
        let body = json!({"symbol": "NOPE", "startDate": "2024-01-02", "endDate": "2024-01-04"});

        let (status, response) = send(&app, "POST", "/api/data", Some(body)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(response["error"].as_str().unwrap().contains("NOPE"));
    }

    #[tokio::test]
    async fn reversed_range_is_a_bad_request() {
        let app = app(three_days()).await;
        let body = json!({"startDate": "2024-02-01", "endDate": "2024-01-01"});

        let (status, _) = send(&app, "POST", "/api/data", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn history_entry_can_be_shown_replayed_and_deleted() {
        let app = app(three_days()).await;
        let (_, analyzed) = send(&app, "POST", "/api/analyze", Some(analyze_body())).await;
        let id = analyzed["id"].as_str().unwrap().to_string();

        let (status, details) = send(&app, "GET", &format!("/api/history/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(details["entry"]["symbol"], "AAPL");
        assert_eq!(details["trades"].as_array().unwrap().len(), 1);
        assert_eq!(details["trades"][0]["entryPrice"].as_f64(), Some(100.0));
        assert_eq!(details["trades"][0]["exitPrice"].as_f64(), Some(110.0));

        let (status, replayed) =
            send(&app, "POST", &format!("/api/history/{}/replay", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replayed["report"], analyzed["report"]);

        let (status, _) = send(&app, "DELETE", &format!("/api/history/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/history/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_history_id_is_not_found() {
        let app = app(vec![]).await;
        let uri = format!("/api/history/{}", uuid::Uuid::new_v4());

        let (status, body) = send(&app, "DELETE", &uri, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }
}
