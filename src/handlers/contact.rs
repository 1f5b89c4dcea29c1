//! 联系表单的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::contact::{ContactMessageRequest, QuotationRequest, Submission, SubmissionKind},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 报价单
pub async fn submit_quotation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuotationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let submission = Submission::try_from(req)?;

    let receipt = state.contact_service.submit(submission).await?;

    Ok(Json(receipt))
}

/// 页脚联系留言
pub async fn submit_contact_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let submission = Submission::try_from(req)?;

    let receipt = state.contact_service.submit(submission).await?;

    Ok(Json(receipt))
}

/// 报价单列表（主存储 + 本地备份）
pub async fn list_quotations(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let listing = state.contact_service.list(SubmissionKind::Quotation).await?;
    Ok(Json(listing))
}

/// 页脚留言列表（主存储 + 本地备份）
pub async fn list_contact_messages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let listing = state.contact_service.list(SubmissionKind::ContactMessage).await?;
    Ok(Json(listing))
}

/// 存储概览
pub async fn storage_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.contact_service.summary().await?))
}
