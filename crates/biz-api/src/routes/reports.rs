//! Report routes

use crate::auth::VerifiedUser;
use crate::error::ApiResult;
use crate::extract::{ApiPath, ApiQuery, OptionalJson};
use crate::models::{
    CreateReportRequest, DownloadQuery, ReportGenerateResponse, ReportListResponse, ReportResponse,
};
use crate::services;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use biz_core::report::ReportFormat;
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(idea_id): ApiPath<Uuid>,
    OptionalJson(body): OptionalJson<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<ReportGenerateResponse>)> {
    let report_type = body.and_then(|b| b.report_type).unwrap_or_default();
    let report = services::reports::create(&state, &user, idea_id, report_type).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportGenerateResponse {
            report_id: report.id,
            idea_id: report.idea_id,
            status: report.status,
            recommendation: report.recommendation,
        }),
    ))
}

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(idea_id): ApiPath<Uuid>,
) -> ApiResult<Json<ReportListResponse>> {
    let reports = services::reports::list(&state, &user, idea_id).await?;
    let total = reports.len();
    Ok(Json(ReportListResponse {
        reports: reports.into_iter().map(ReportResponse::from).collect(),
        total,
    }))
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ReportResponse>> {
    let (report, _) = services::reports::get(&state, &user, id).await?;
    Ok(Json(report.into()))
}

pub async fn download_report(
    State(state): State<Arc<AppState>>,
    VerifiedUser(user): VerifiedUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<DownloadQuery>,
) -> ApiResult<Response> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ReportFormat>()?,
        None => ReportFormat::default(),
    };
    let body = services::reports::render(&state, &user, id, format).await?;
    let filename = format!("business_report_{}.{}", id, format.extension());

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((StatusCode::OK, headers, body).into_response())
}
