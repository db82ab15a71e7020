use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "otsentry API",
        description = "otsentry OT/ICS 威胁情报只读 API",
    ),
    tags(
        (name = "Health", description = "服务健康检查"),
        (name = "Report", description = "威胁报告查询")
    )
)]
struct ApiDoc;

pub fn build_http_app(state: AppState) -> Router {
    let (router, api_spec) = api::routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(api_spec);

    // 只读 API，放开跨域便于独立部署的前端访问
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", merged_spec))
        .layer(middleware::from_fn(logging::request_logging))
        .layer(cors)
        .with_state(state)
}
