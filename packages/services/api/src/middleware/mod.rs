//! API 미들웨어
//!
//! 요청 추적용 request id를 붙입니다. 인증은 미들웨어가 아니라
//! 핸들러 시그니처의 [crate::guard::CurrentUser] 추출기로 처리합니다.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 현재 요청의 request id (에러 응답 본문에 포함)
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}
