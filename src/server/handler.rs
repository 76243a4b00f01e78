use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use uuid::Uuid;

use crate::logging::{log_request, RequestLog};
use crate::middleware::{
    handle_middleware_error, ChainOutcome, MiddlewareManager, RequestContext, Response,
};

/// 체인을 모두 통과한 요청을 처리하는 후속 핸들러
///
/// 호스트 프레임워크의 라우터/정적 파일 서버가 이 자리에 들어갑니다.
#[async_trait]
pub trait FallbackHandler: Send + Sync {
    async fn handle(&self, ctx: &RequestContext) -> Response;
}

/// 기본 폴백: 404
pub struct NotFound;

#[async_trait]
impl FallbackHandler for NotFound {
    async fn handle(&self, _ctx: &RequestContext) -> Response {
        let mut response = hyper::Response::new(Full::new(Bytes::from("Not Found")));
        *response.status_mut() = StatusCode::NOT_FOUND;
        response
    }
}

pub struct RequestHandler {
    manager: MiddlewareManager,
    fallback: Arc<dyn FallbackHandler>,
    logger: bool,
}

impl RequestHandler {
    pub fn new(
        manager: MiddlewareManager,
        fallback: Arc<dyn FallbackHandler>,
        logger: bool,
    ) -> Self {
        Self {
            manager,
            fallback,
            logger,
        }
    }

    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response, std::convert::Infallible> {
        let start = Instant::now();
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(&req);

        let mut ctx = RequestContext::from_request(&req);

        // 1. 체인 실행: 헤더 정책, 변환 레이어 순서대로
        let mut response = match self.manager.handle(&mut ctx).await {
            Ok(ChainOutcome::Served(response)) => response,
            // 2. 통과한 요청은 폴백으로
            Ok(ChainOutcome::Fallthrough) => self.fallback.handle(&ctx).await,
            // 3. 체인이 직접 렌더링하지 않는 코드는 에러 경로로
            Err(e) => {
                log.with_error(&e);
                handle_middleware_error(e)
            }
        };

        // 4. 전송 직전 훅. Content-Type이 확정된 뒤 헤더 정책 적용
        ctx.finalize(&mut response);

        log.with_response(response.status());
        if let Some(cache) = response.headers().get("x-cache").and_then(|v| v.to_str().ok()) {
            log.with_cache_status(cache);
        }
        log.duration_ms = start.elapsed().as_millis() as u64;
        if self.logger {
            log_request(&log);
        }

        Ok(response)
    }

    pub async fn handle_connection<I>(
        &self,
        io: I,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(io, service_fn(|req| self.handle_request(req)))
            .await
            .map_err(|e| e.into())
    }
}
