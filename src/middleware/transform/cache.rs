//! 리소스 캐시
//!
//! 키(논리 URL + minify 모드)당 렌더링된 산출물 하나를 보관합니다.
//! 키 공간이 설정된 리소스 목록으로 제한되므로 퇴출 정책은 없습니다.

use std::collections::HashMap;
use std::sync::Arc;
use bytes::Bytes;
use tokio::sync::{Mutex, RwLock};

/// 캐시된 렌더링 산출물
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    pub content: Bytes,
    pub content_type: &'static str,
}

/// 미들웨어 인스턴스가 소유하는 캐시
///
/// live 모드(development)에서는 `get`이 항상 미스를 보고하여
/// 매 요청마다 새로 컴파일됩니다. 수정-새로고침 워크플로를 위한
/// 의도된 동작입니다.
pub struct ResourceCache {
    live: bool,
    entries: RwLock<HashMap<String, Arc<CachedArtifact>>>,
    flights: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ResourceCache {
    pub fn new(live: bool) -> Self {
        Self {
            live,
            entries: RwLock::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<CachedArtifact>> {
        if self.live {
            return None;
        }
        self.entries.read().await.get(key).cloned()
    }

    /// 산출물을 저장하고 저장된 참조를 돌려줍니다.
    ///
    /// 실패한 컴파일은 절대 여기까지 오면 안 됩니다.
    /// 호출자는 성공한 산출물만 저장합니다.
    pub async fn put(&self, key: String, artifact: CachedArtifact) -> Arc<CachedArtifact> {
        let artifact = Arc::new(artifact);
        self.entries.write().await.insert(key, artifact.clone());
        artifact
    }

    /// 키별 싱글 플라이트 가드
    ///
    /// 같은 키의 동시 미스는 이 뮤텍스를 잡고 캐시를 다시 확인하여
    /// 중복 컴파일을 피합니다.
    pub async fn flight_guard(&self, key: &str) -> Arc<Mutex<()>> {
        self.flights
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }
}
