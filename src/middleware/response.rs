use bytes::Bytes;
use http_body_util::Full;
use hyper::header::LOCATION;
use hyper::StatusCode;
use tracing::error;

use super::{MiddlewareError, Response};

/// 상태 코드를 본문에 표준 상태 메시지를 담은 응답으로 렌더링합니다.
pub fn status_response(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("Unknown");

    hyper::Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            error!(error = %e, "상태 응답 생성 실패");
            hyper::Response::new(Full::new(Bytes::from("Internal Server Error")))
        })
}

/// Location 헤더를 포함한 리다이렉트 응답을 렌더링합니다.
pub fn redirect_response(status: StatusCode, location: &str) -> Response {
    let message = status.canonical_reason().unwrap_or("Redirect");

    hyper::Response::builder()
        .status(status)
        .header(LOCATION, location)
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            error!(error = %e, location, "리다이렉트 응답 생성 실패");
            status_response(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// 미들웨어 에러를 HTTP 응답으로 변환합니다.
///
/// 내장 서버가 호스트 프레임워크의 에러 경로 역할을 할 때 사용합니다.
pub fn handle_middleware_error(err: MiddlewareError) -> Response {
    status_response(err.status_code())
}
