use std::path::PathBuf;
use bytes::Bytes;
use async_trait::async_trait;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use tracing::{debug, error};

use crate::middleware::{Layer, LayerResult, MiddlewareError, RequestContext, Response};
use crate::settings::{Processor, ResourceConfig, ResourceKind, Settings};
use super::cache::{CachedArtifact, ResourceCache};
use super::compiler::{CommandCompiler, Compiler};
use super::minify::{CommandMinifier, Minifier};

/// 리소스 종류 하나(스크립트 또는 스타일시트)의 변환 레이어
///
/// 허용 목록에 있는 URL만 처리하고 나머지는 다음 레이어로 넘깁니다.
/// 캐시 버스팅과 함께 쓰는 것을 전제로 합니다.
pub struct TransformLayer {
    kind: ResourceKind,
    files: Vec<String>,
    root: PathBuf,
    processor: Processor,
    minify: bool,
    compiler: Box<dyn Compiler>,
    minifier: Option<Box<dyn Minifier>>,
    cache: ResourceCache,
}

impl TransformLayer {
    /// 검증된 리소스 설정으로 레이어를 만듭니다.
    ///
    /// production 환경에서는 minify가 묵시적으로 켜집니다.
    pub fn from_config(settings: &Settings, config: ResourceConfig) -> Self {
        let minify = settings.effective_minify(&config);
        let minifier: Option<Box<dyn Minifier>> = if minify {
            Some(Box::new(CommandMinifier::for_kind(config.kind)))
        } else {
            None
        };

        Self::with_capabilities(
            settings,
            config.clone(),
            Box::new(CommandCompiler::for_processor(config.processor, config.source_map)),
            minifier,
        )
    }

    /// 컴파일러/압축기를 주입하는 생성자.
    pub fn with_capabilities(
        settings: &Settings,
        config: ResourceConfig,
        compiler: Box<dyn Compiler>,
        minifier: Option<Box<dyn Minifier>>,
    ) -> Self {
        let minify = settings.effective_minify(&config);
        Self {
            kind: config.kind,
            files: config.files,
            root: settings.root.clone(),
            processor: config.processor,
            minify,
            compiler,
            minifier,
            cache: ResourceCache::new(settings.live_mode()),
        }
    }

    /// 캐시 키는 (정규화된 URL, minify 모드) 쌍마다 유일합니다.
    fn cache_key(&self, url: &str) -> String {
        if self.minify {
            format!("{}#min", url)
        } else {
            url.to_string()
        }
    }

    fn respond(&self, artifact: &CachedArtifact, cache_header: &'static str) -> Response {
        let mut response = hyper::Response::new(Full::new(artifact.content.clone()));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(artifact.content_type));
        response
            .headers_mut()
            .insert("x-cache", HeaderValue::from_static(cache_header));
        response
    }

    fn compile_error(&self, message: impl std::fmt::Display) -> MiddlewareError {
        error!(layer = self.name(), error = %message, "컴파일 실패");
        MiddlewareError::Compile {
            layer: self.name().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Layer for TransformLayer {
    fn name(&self) -> &str {
        self.processor.as_str()
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<LayerResult, MiddlewareError> {
        // 쿼리와 선행 슬래시 제거 후 허용 목록과 비교
        let url = ctx.pathname().trim_start_matches('/').to_string();
        if !self.files.iter().any(|file| *file == url) {
            return Ok(LayerResult::Continue);
        }

        let key = self.cache_key(&url);

        if let Some(entry) = self.cache.get(&key).await {
            debug!(%url, "캐시 히트");
            return Ok(LayerResult::Serve(self.respond(&entry, "HIT")));
        }

        // 싱글 플라이트: 같은 키의 동시 미스는 한 번만 컴파일
        let guard = self.cache.flight_guard(&key).await;
        let _flight = guard.lock().await;
        if let Some(entry) = self.cache.get(&key).await {
            debug!(%url, "대기 중 캐시 충족");
            return Ok(LayerResult::Serve(self.respond(&entry, "HIT")));
        }

        let source = self.processor.source_path(&self.root, &url);
        let content = self
            .compiler
            .compile(&source)
            .await
            .map_err(|e| self.compile_error(e))?;

        let content = match &self.minifier {
            Some(minifier) => minifier
                .minify(content)
                .await
                .map_err(|e| self.compile_error(e))?,
            None => content,
        };

        let artifact = CachedArtifact {
            content: Bytes::from(content),
            content_type: self.kind.content_type(),
        };
        let artifact = self.cache.put(key, artifact).await;

        debug!(%url, "캐시 미스, 컴파일 완료");
        Ok(LayerResult::Serve(self.respond(&artifact, "MISS")))
    }
}
