use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapter::driver::request_dto::{
    CreateTicketRequest, StockAdjustmentRequest, UpdateTicketRequest,
};
use crate::adapter::driver::response_dto::{
    CreateTicketResponse, StockAdjustmentResponse, TicketResponse,
};
use crate::application::service::{
    InventoryControlConfig, InventoryController, TicketLifecycleService,
};
use crate::application::ApplicationError;
use crate::domain::model::{EventId, TicketId};
use crate::domain::port::TicketRepository;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
#[derive(Clone)]
pub struct AppState {
    pub inventory_controller: Arc<InventoryController>,
    pub ticket_service: Arc<TicketLifecycleService>,
}

impl AppState {
    /// 1つのリポジトリを共有するサービス群を組み立てる
    pub fn new(ticket_repository: Arc<dyn TicketRepository>, config: InventoryControlConfig) -> Self {
        Self {
            inventory_controller: Arc::new(InventoryController::new(
                ticket_repository.clone(),
                config,
            )),
            ticket_service: Arc::new(TicketLifecycleService::new(ticket_repository)),
        }
    }
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/tickets", post(create_ticket))
        .route(
            "/tickets/:ticket_id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .route("/tickets/:ticket_id/sell", post(sell_ticket))
        .route("/tickets/:ticket_id/refund", post(refund_ticket))
        .route("/events/:event_id/tickets", get(list_event_tickets))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "event-ticket-inventory",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// チケット作成エンドポイント
async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTicketResponse>), (StatusCode, Json<ApiError>)> {
    let Json(request) = payload.map_err(map_rejection)?;

    match state
        .ticket_service
        .create_ticket(
            request.price,
            request.ticket_type,
            request.quantity_available,
            EventId::new(request.event_id),
        )
        .await
    {
        Ok(ticket_id) => Ok((
            StatusCode::CREATED,
            Json(CreateTicketResponse {
                ticket_id: ticket_id.value(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// チケット詳細取得エンドポイント
async fn get_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TicketResponse>, (StatusCode, Json<ApiError>)> {
    let Path(ticket_id) = path.map_err(map_rejection)?;

    match state.ticket_service.get_ticket(TicketId::new(ticket_id)).await {
        Ok(ticket) => Ok(Json(TicketResponse::from_ticket(&ticket))),
        Err(err) => Err(map_application_error(err)),
    }
}

// チケット詳細更新エンドポイント（価格・種別のみ）
async fn update_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTicketRequest>, JsonRejection>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let Path(ticket_id) = path.map_err(map_rejection)?;
    let Json(request) = payload.map_err(map_rejection)?;

    match state
        .ticket_service
        .update_ticket_details(TicketId::new(ticket_id), request.price, request.ticket_type)
        .await
    {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(map_application_error(err)),
    }
}

// チケット削除エンドポイント
async fn delete_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let Path(ticket_id) = path.map_err(map_rejection)?;

    match state.ticket_service.delete_ticket(TicketId::new(ticket_id)).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(err)),
    }
}

// チケット販売エンドポイント
async fn sell_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> Result<Json<StockAdjustmentResponse>, (StatusCode, Json<ApiError>)> {
    let Path(ticket_id) = path.map_err(map_rejection)?;
    let Json(request) = payload.map_err(map_rejection)?;

    match state
        .inventory_controller
        .sell(TicketId::new(ticket_id), request.quantity)
        .await
    {
        Ok(adjustment) => Ok(Json(StockAdjustmentResponse::from_adjustment(&adjustment))),
        Err(err) => Err(map_application_error(err)),
    }
}

// チケット払い戻しエンドポイント
async fn refund_ticket(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StockAdjustmentRequest>, JsonRejection>,
) -> Result<Json<StockAdjustmentResponse>, (StatusCode, Json<ApiError>)> {
    let Path(ticket_id) = path.map_err(map_rejection)?;
    let Json(request) = payload.map_err(map_rejection)?;

    match state
        .inventory_controller
        .refund(TicketId::new(ticket_id), request.quantity)
        .await
    {
        Ok(adjustment) => Ok(Json(StockAdjustmentResponse::from_adjustment(&adjustment))),
        Err(err) => Err(map_application_error(err)),
    }
}

// イベント別チケット一覧エンドポイント
async fn list_event_tickets(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TicketResponse>>, (StatusCode, Json<ApiError>)> {
    let Path(event_id) = path.map_err(map_rejection)?;

    match state
        .ticket_service
        .list_tickets_for_event(EventId::new(event_id))
        .await
    {
        Ok(tickets) => Ok(Json(tickets.iter().map(TicketResponse::from_ticket).collect())),
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
        ApplicationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ApplicationError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationError::Conflict { .. } => StatusCode::CONFLICT,
        ApplicationError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ApplicationError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ApplicationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ApiError {
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
}

// 解析できないパスやリクエストボディを入力エラーとして返す
fn map_rejection(rejection: impl std::fmt::Display) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: rejection.to_string(),
            code: "INVALID_ARGUMENT".to_string(),
        }),
    )
}
