use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    models::{Alert, ChartRange, ChartType, Coin, Currency},
    Error as CommonError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::{
    derived::{AlertStatus, DashboardSnapshot, MarketStats},
    Action, AlertInput, ChartState, HoldingInput,
};
use tracing::{debug, warn};

use crate::service::{DashboardService, PortfolioView};

pub type SharedService = Arc<DashboardService>;

// Wrapper so common::Error can be returned from handlers
pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CommonError::NotFound(_) => StatusCode::NOT_FOUND,
            CommonError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CommonError::Network(_) | CommonError::Http { .. } | CommonError::Parse(_) => {
                StatusCode::BAD_GATEWAY
            }
            CommonError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }

        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn get_state(State(service): State<SharedService>) -> Json<DashboardSnapshot> {
    Json(service.snapshot().await)
}

// Filtered and sorted coins for the current search/sort
pub async fn list_coins(State(service): State<SharedService>) -> Json<Vec<Coin>> {
    Json(service.snapshot().await.coins)
}

pub async fn get_stats(State(service): State<SharedService>) -> Json<MarketStats> {
    Json(service.stats().await)
}

pub async fn get_watchlist(State(service): State<SharedService>) -> Json<Vec<Coin>> {
    Json(service.watchlist().await)
}

pub async fn dispatch_action(
    State(service): State<SharedService>,
    Json(action): Json<Action>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    debug!("Client action {}", action.name());
    Ok(Json(service.dispatch(action).await?))
}

pub async fn refresh(State(service): State<SharedService>) -> Json<DashboardSnapshot> {
    Json(service.refresh().await)
}

#[derive(Debug, Deserialize)]
pub struct CurrencyRequest {
    pub currency: Currency,
}

pub async fn set_currency(
    State(service): State<SharedService>,
    Json(request): Json<CurrencyRequest>,
) -> Json<DashboardSnapshot> {
    Json(service.change_currency(request.currency).await)
}

pub async fn get_portfolio(State(service): State<SharedService>) -> Json<PortfolioView> {
    Json(service.portfolio().await)
}

pub async fn upsert_holding(
    State(service): State<SharedService>,
    Json(input): Json<HoldingInput>,
) -> Result<Json<PortfolioView>, ApiError> {
    Ok(Json(service.upsert_holding(input).await?))
}

pub async fn delete_holding(
    State(service): State<SharedService>,
    Path(coin_id): Path<String>,
) -> Json<PortfolioView> {
    Json(service.delete_holding(&coin_id).await)
}

pub async fn get_alerts(State(service): State<SharedService>) -> Json<Vec<AlertStatus>> {
    Json(service.alerts().await)
}

pub async fn add_alert(
    State(service): State<SharedService>,
    Json(input): Json<AlertInput>,
) -> Result<(StatusCode, Json<Alert>), ApiError> {
    let alert = service.add_alert(input).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn delete_alert(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Json<Vec<AlertStatus>> {
    Json(service.delete_alert(&id).await)
}

pub async fn get_chart(State(service): State<SharedService>) -> Json<ChartState> {
    Json(service.chart().await)
}

/// Body of `POST /api/v1/chart`. A coin id (re)opens the chart; a range on
/// its own switches the open chart.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub coin_id: Option<String>,
    pub range: Option<ChartRange>,
    pub chart_type: Option<ChartType>,
}

pub async fn update_chart(
    State(service): State<SharedService>,
    Json(request): Json<ChartRequest>,
) -> Result<Json<ChartState>, ApiError> {
    if let Some(chart_type) = request.chart_type {
        service.set_chart_type(chart_type).await;
    }

    let chart = match (request.coin_id, request.range) {
        (Some(coin_id), range) => {
            service
                .open_chart(&coin_id, range.unwrap_or_default())
                .await?
        }
        (None, Some(range)) => service.set_chart_range(range).await?,
        (None, None) => service.chart().await,
    };
    Ok(Json(chart))
}

pub async fn close_chart(State(service): State<SharedService>) -> StatusCode {
    service.close_chart().await;
    StatusCode::NO_CONTENT
}
