//! 요청 컨텍스트
//!
//! 한 요청이 살아있는 동안만 존재하며, 레이어들이 공유하는 URL 상태와
//! 전송 직전에 실행할 헤더 훅을 담습니다.

use hyper::header::{HOST, USER_AGENT};
use hyper::HeaderMap;

use super::Response;

/// 헤더가 전송되기 직전에 실행되는 훅
///
/// 다운스트림 생성기가 Content-Type을 먼저 정할 수 있도록,
/// 헤더 정책은 이 확장 지점에 등록되어 마지막에 실행됩니다.
pub type PreSendHook = Box<dyn FnOnce(&mut HeaderMap) + Send>;

pub struct RequestContext {
    /// 원본 요청 URL (로깅/리다이렉트용, 쿼리 포함)
    pub base_url: String,

    /// 유효 조회 URL (캐시 버스팅 토큰이 제거될 수 있음)
    pub url: String,

    pub host: String,
    pub user_agent: String,

    hooks: Vec<PreSendHook>,
}

impl RequestContext {
    pub fn new(url: impl Into<String>, host: impl Into<String>, user_agent: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            base_url: url.clone(),
            url,
            host: host.into(),
            user_agent: user_agent.into(),
            hooks: Vec::new(),
        }
    }

    pub fn from_request<B>(req: &hyper::Request<B>) -> Self {
        let url = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let host = req
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self::new(url, host, user_agent)
    }

    /// 유효 URL의 경로 부분 (쿼리 제외)
    pub fn pathname(&self) -> &str {
        let path = self.url.split('?').next().unwrap_or("");
        if path.is_empty() {
            "/"
        } else {
            path
        }
    }

    /// 유효 조회 URL을 바꿉니다. 원본 URL은 유지됩니다.
    pub fn rewrite_url(&mut self, url: String) {
        self.url = url;
    }

    /// 전송 직전 훅을 등록합니다. 등록 순서대로 실행됩니다.
    pub fn on_send<F>(&mut self, hook: F)
    where
        F: FnOnce(&mut HeaderMap) + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// 등록된 훅을 응답 헤더에 적용합니다.
    pub fn finalize(&mut self, response: &mut Response) {
        for hook in self.hooks.drain(..) {
            hook(response.headers_mut());
        }
    }
}
