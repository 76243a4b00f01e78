use async_trait::async_trait;
use hyper::header::{HeaderValue, CONNECTION, CONTENT_TYPE, ETAG};
use hyper::{HeaderMap, StatusCode};
use regex_lite::Regex;
use tracing::debug;

use crate::middleware::{Layer, LayerResult, MiddlewareError, RequestContext};
use crate::mime::{self, Category};
use crate::settings::{ServerKind, WwwPolicy};
use super::config::HeaderPolicyConfig;

/// 캐시 유지 시간 (초)
const ONE_HOUR: u32 = 60 * 60;
const ONE_WEEK: u32 = ONE_HOUR * 24 * 7;
const ONE_MONTH: u32 = ONE_WEEK * 4;
const ONE_YEAR: u32 = ONE_MONTH * 12;

const ALLOW_ALL_ORIGINS: &str = "*";

/// 헤더 정책 레이어
///
/// 차단/리다이렉트/재작성은 체인 안에서 즉시 수행하고,
/// Content-Type에 의존하는 정책은 전송 직전 훅으로 등록합니다.
/// 다운스트림 생성기가 정한 타입이 캐시 정책을 결정해야 하기 때문입니다.
pub struct HeadersLayer {
    config: HeaderPolicyConfig,
    hidden: Regex,
    srcbak: Regex,
    bust: Regex,
}

impl HeadersLayer {
    pub fn new(config: HeaderPolicyConfig) -> Self {
        Self {
            config,
            // 이름이 마침표로 시작하는 파일/디렉토리 (버전 관리 디렉토리 등)
            hidden: Regex::new(r"(^|/)\.").unwrap(),
            // 편집기가 남기는 백업/소스 파일 접미사
            srcbak: Regex::new(r"\.(?:bak|config|sql|fla|psd|ini|log|sh|inc|swp|dist)$|~$")
                .unwrap(),
            // 파일명 기반 캐시 버스팅: style.20230101.css -> style.css
            bust: Regex::new(r"^(.+)\.(\d+)\.(js|css|png|jpg|gif)$").unwrap(),
        }
    }

    fn www_redirect(&self, ctx: &RequestContext) -> Option<String> {
        if ctx.host.is_empty() {
            return None;
        }

        match self.config.www {
            Some(WwwPolicy::Strip) => ctx
                .host
                .strip_prefix("www.")
                .map(|host| format!("//{}{}", host, ctx.base_url)),
            Some(WwwPolicy::Enforce) if !ctx.host.starts_with("www.") => {
                Some(format!("//www.{}{}", ctx.host, ctx.base_url))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Layer for HeadersLayer {
    fn name(&self) -> &str {
        "headers"
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<LayerResult, MiddlewareError> {
        let pathname = ctx.pathname().to_string();

        // 숨김 파일 차단
        if !self.config.dotfiles && self.hidden.is_match(&pathname) {
            return Ok(LayerResult::Reject(StatusCode::FORBIDDEN));
        }

        // 백업/소스 파일 차단 (무조건)
        if self.srcbak.is_match(&pathname) {
            return Ok(LayerResult::Reject(StatusCode::FORBIDDEN));
        }

        // www 정규화: 같은 내용이 두 URL로 제공되면 안 됩니다
        if let Some(location) = self.www_redirect(ctx) {
            return Ok(LayerResult::Redirect(StatusCode::MOVED_PERMANENTLY, location));
        }

        // 캐시 버스팅 재작성 (요청당 한 번)
        if self.bust.is_match(&pathname) {
            let rewritten = self.bust.replace(&pathname, "${1}.${3}").into_owned();
            let query = ctx.url[pathname.len()..].to_string();
            debug!(from = %pathname, to = %rewritten, "캐시 버스팅 재작성");
            ctx.rewrite_url(format!("{}{}", rewritten, query));
        }

        // 나머지 정책은 Content-Type이 확정된 뒤에 적용되어야 합니다
        let config = self.config;
        let pathname = ctx.pathname().to_string();
        let user_agent = ctx.user_agent.clone();
        ctx.on_send(move |headers| apply_policy(&config, &pathname, &user_agent, headers));

        Ok(LayerResult::Continue)
    }
}

/// 전송 직전에 실행되는 헤더 정책 본체
fn apply_policy(
    config: &HeaderPolicyConfig,
    pathname: &str,
    user_agent: &str,
    headers: &mut HeaderMap,
) {
    // Content-Type 결정: 다운스트림 생성기가 정한 값을 우선하고,
    // 없으면 확장자로 유도합니다. 디렉토리 형태 URL은 건드리지 않습니다.
    let declared = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let content_type = match declared {
        Some(declared) => declared,
        None if !pathname.ends_with('/') => match mime::lookup(pathname) {
            Some(derived) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(derived));
                derived.to_string()
            }
            None => String::new(),
        },
        None => String::new(),
    };

    let bare_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    // 구형 IE가 IE7 모드로 떨어지지 않도록 최신 렌더링을 강제
    if user_agent.contains("MSIE") && content_type.contains("text/html") {
        headers.insert("x-ua-compatible", HeaderValue::from_static("IE=Edge"));
    }

    // 전역 CORS
    if config.cors {
        headers.insert(
            "access-control-allow-origin",
            HeaderValue::from_static(ALLOW_ALL_ORIGINS),
        );
    }

    // 이미지(@crossorigin)와 웹폰트는 전역 설정과 무관하게 CORS 허용
    if mime::is_image(&bare_type) || mime::is_font(&bare_type) || pathname == "/font.css" {
        headers.insert(
            "access-control-allow-origin",
            HeaderValue::from_static(ALLOW_ALL_ORIGINS),
        );
    }

    // 분류별 Cache-Control. 파일명 기반 캐시 버스팅을 전제로 한
    // 먼 미래의 만료 시간입니다.
    let max_age = match mime::classify(&content_type) {
        Category::Unknown | Category::Data => 0,
        Category::Feed => ONE_HOUR,
        Category::Favicon => ONE_WEEK,
        Category::Media => ONE_MONTH,
        Category::ScriptStyle => ONE_YEAR,
        Category::Other => ONE_MONTH,
    };

    // no-transform: 일부 통신사가 3G에서 콘텐츠를 변조하는 것을 막습니다
    let cache_control = format!("public,max-age={},no-transform", max_age);
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        headers.insert("cache-control", value);
    }

    // 먼 미래 만료와 ETag 재검증은 같이 쓸 이유가 없습니다
    headers.remove(ETAG);

    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    // 서버 종류 광고 제거
    if config.server == ServerKind::Embedded {
        headers.remove("x-powered-by");
    }
}
