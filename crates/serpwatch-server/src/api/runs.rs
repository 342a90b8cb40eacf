use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Local;
use serde::Serialize;
use serpwatch_core::{JobRequest, RunStatus, TimeFilter};
use serpwatch_monitor::MonitorError;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalysisStarted {
    status: &'static str,
    keywords: Vec<String>,
    target_count: usize,
    time_filter: TimeFilter,
}

pub(super) async fn start_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AnalysisStarted>>), ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let settings = request
        .validate(
            state.config.default_target_count,
            state.config.max_target_count,
        )
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let data = AnalysisStarted {
        status: "started",
        keywords: settings.keywords.clone(),
        target_count: settings.target_count,
        time_filter: settings.time_filter,
    };

    match state.manager.start(settings).await {
        Ok(_ticket) => {
            tracing::info!(keywords = data.keywords.len(), "analysis started via api");
            Ok((
                StatusCode::ACCEPTED,
                Json(ApiResponse {
                    data,
                    meta: ResponseMeta::new(req_id.0),
                }),
            ))
        }
        Err(MonitorError::Busy) => Err(ApiError::new(
            req_id.0,
            "conflict",
            "a monitoring run is already in progress",
        )),
        Err(e) => {
            tracing::error!(error = %e, "failed to start analysis");
            Err(ApiError::new(req_id.0, "internal_error", "failed to start analysis"))
        }
    }
}

pub(super) async fn run_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RunStatus>> {
    Json(ApiResponse {
        data: state.manager.status().snapshot().await,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn download_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state.config.report_path();
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                "no report available yet",
            ));
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read report");
            return Err(ApiError::new(
                req_id.0,
                "internal_error",
                "failed to read report",
            ));
        }
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_filename(Local::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

fn download_filename(day: chrono::NaiveDate) -> String {
    format!("serp_report_{}.xlsx", day.format("%Y%m%d"))
}
