use tracing::debug;

use crate::settings::{Settings, SettingsError};
use super::headers::{HeaderPolicyConfig, HeadersLayer};
use super::transform::TransformLayer;
use super::{ChainOutcome, LayerChain, MiddlewareError, RequestContext};

/// 설정으로부터 레이어 체인을 구성하고 실행하는 진입점
///
/// 헤더 레이어가 항상 먼저 오고, 그 뒤에 설정된 변환 레이어들이
/// 선언 순서(스크립트, 스타일시트)대로 이어집니다.
pub struct MiddlewareManager {
    chain: LayerChain,
}

impl MiddlewareManager {
    /// 설정을 검증하며 체인을 만듭니다. 설정 오류는 여기서 치명적입니다.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let mut chain = LayerChain::new();

        chain.add(HeadersLayer::new(HeaderPolicyConfig::from(settings)));

        for config in settings.resource_configs()? {
            debug!(kind = %config.kind, processor = %config.processor, "변환 레이어 추가");
            chain.add(TransformLayer::from_config(settings, config));
        }

        Ok(Self { chain })
    }

    /// 테스트나 임베딩 환경을 위해 체인을 직접 받습니다.
    pub fn with_chain(chain: LayerChain) -> Self {
        Self { chain }
    }

    pub async fn handle(&self, ctx: &mut RequestContext) -> Result<ChainOutcome, MiddlewareError> {
        self.chain.execute(ctx).await
    }
}
