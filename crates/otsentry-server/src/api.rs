use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use otsentry_common::types::{SeverityBreakdown, ThreatReport};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// API 错误响应
#[derive(Serialize, ToSchema)]
pub struct ApiError {
    /// 错误码
    pub err_code: i32,
    /// 错误信息
    pub err_msg: String,
    /// 链路追踪 ID
    pub trace_id: String,
}

/// API 统一响应包裹
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// 错误码（成功时为 0）
    pub err_code: i32,
    /// 错误信息（成功时为 success）
    pub err_msg: String,
    /// 链路追踪 ID
    pub trace_id: String,
    /// 业务数据（暂无报告时为 null）
    pub data: Option<T>,
}

pub fn success_response<T>(status: StatusCode, trace_id: &str, data: Option<T>) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            err_code: 0,
            err_msg: "success".to_string(),
            trace_id: trace_id.to_string(),
            data,
        }),
    )
        .into_response()
}

pub fn error_response(status: StatusCode, trace_id: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: status.as_u16() as i32,
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

/// 健康检查数据
#[derive(Serialize, ToSchema)]
struct HealthInfo {
    status: &'static str,
    /// 服务运行时长（秒）
    uptime_secs: i64,
}

#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "服务健康状态", body = HealthInfo)
    )
)]
async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let uptime_secs = (Utc::now() - state.start_time).num_seconds();
    success_response(
        StatusCode::OK,
        &trace_id,
        Some(HealthInfo {
            status: "ok",
            uptime_secs,
        }),
    )
}

#[utoipa::path(
    get,
    path = "/v1/report",
    tag = "Report",
    responses(
        (status = 200, description = "最新威胁报告；尚未生成时 data 为 null", body = ThreatReport),
        (status = 500, description = "报告文件读取失败", body = ApiError)
    )
)]
async fn get_report(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // 每次请求都重新读取报告文件
    match state.store.load() {
        Ok(report) => success_response::<ThreatReport>(StatusCode::OK, &trace_id, report),
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Failed to read report file");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "failed to read report file",
            )
        }
    }
}

/// 报告概要（不含威胁明细）
#[derive(Serialize, ToSchema)]
struct ReportSummary {
    generated_at: String,
    total_threats: usize,
    severity_breakdown: SeverityBreakdown,
}

#[utoipa::path(
    get,
    path = "/v1/report/summary",
    tag = "Report",
    responses(
        (status = 200, description = "报告概要；尚未生成时 data 为 null", body = ReportSummary),
        (status = 500, description = "报告文件读取失败", body = ApiError)
    )
)]
async fn get_report_summary(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.store.load() {
        Ok(report) => {
            let summary = report.map(|r| ReportSummary {
                generated_at: r.generated_at,
                total_threats: r.total_threats,
                severity_breakdown: r.severity_breakdown,
            });
            success_response(StatusCode::OK, &trace_id, summary)
        }
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Failed to read report file");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "failed to read report file",
            )
        }
    }
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(get_report))
        .routes(routes!(get_report_summary))
}
