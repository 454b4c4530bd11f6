// ==========================================
// 校园服务聚合网关 - HTTP 路由
// ==========================================
// 职责: actix-web 路由、会话头解析、错误响应、访问日志
// 红线: 路由层不含业务逻辑，只做 HTTP 与 API 层之间的转换
// ==========================================

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::middleware::Next;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::Instrument;

use crate::api::ApiError;
use crate::app::state::AppState;
use crate::upstream::UpstreamSession;

/// 认证层写入的一卡通号
pub const CARD_NUMBER_HEADER: &str = "x-card-number";
/// 认证层写入的上游会话 Cookie
pub const UPSTREAM_COOKIE_HEADER: &str = "x-upstream-cookie";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub error_code: String,

    /// 错误消息
    pub error_msg: String,

    /// 完整错误链（仅 debug 模式）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurriculumQuery {
    pub term: Option<String>,
}

/// 注册 /api 下的所有路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("", web::get().to(api_index))
            .route("/curriculum", web::get().to(get_curriculum))
            .route("/lecture", web::get().to(get_lecture)),
    );
}

// ==========================================
// 访问日志中间件
// ==========================================

/// 每个请求一个带 request_id 的 span，结束时记录一行访问日志
pub async fn access_log(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = req.method().to_string();
    let path = req.path().to_string();
    let span = tracing::info_span!("request", request_id = %request_id, method = %method, path = %path);

    let start = Instant::now();
    let mut res = next.call(req).instrument(span.clone()).await?;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    span.in_scope(|| {
        tracing::info!(
            target: "access",
            status = res.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "{} {}",
            method,
            path
        );
    });
    Ok(res)
}

// ==========================================
// 公共工具：会话解析、错误映射
// ==========================================

/// 从认证层写入的请求头中取出上游会话；任一缺失即视为未登录
pub fn session_from_request(req: &HttpRequest) -> Result<UpstreamSession, ApiError> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    match (header(CARD_NUMBER_HEADER), header(UPSTREAM_COOKIE_HEADER)) {
        (Some(identifier), Some(cookie)) => Ok(UpstreamSession::new(identifier, cookie)),
        _ => Err(ApiError::SessionExpired("缺少认证信息".to_string())),
    }
}

/// 将ApiError转换为HTTP响应
pub fn error_response(err: &ApiError, debug: bool) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error_code = err.code(), error = ?err, "请求失败");
    } else {
        tracing::warn!(error_code = err.code(), error = %err, "请求被拒绝");
    }

    HttpResponse::build(status).json(ErrorResponse {
        error_code: err.code().to_string(),
        error_msg: err.to_string(),
        debug: debug.then(|| format!("{:?}", err)),
    })
}

// ==========================================
// 路由处理
// ==========================================

async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": crate::APP_NAME,
        "version": crate::VERSION,
        "endpoints": [
            { "method": "GET", "path": "/api/curriculum", "params": ["term"], "desc": "课表查询" },
            { "method": "GET", "path": "/api/lecture", "params": [], "desc": "人文讲座打卡记录" },
        ],
    }))
}

async fn get_curriculum(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<CurriculumQuery>,
) -> HttpResponse {
    let session = match session_from_request(&req) {
        Ok(session) => session,
        Err(e) => return error_response(&e, state.debug_enabled()),
    };

    match state
        .curriculum_api
        .get_curriculum(&session, query.term.as_deref())
        .await
    {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => error_response(&e, state.debug_enabled()),
    }
}

async fn get_lecture(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let session = match session_from_request(&req) {
        Ok(session) => session,
        Err(e) => return error_response(&e, state.debug_enabled()),
    };

    match state.lecture_api.get_lectures(&session).await {
        Ok(lectures) => HttpResponse::Ok().json(lectures),
        Err(e) => error_response(&e, state.debug_enabled()),
    }
}
