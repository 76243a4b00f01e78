//! 내장 서버
//!
//! 설정 하나로 미들웨어 체인과 리스너를 묶는 편의 팩토리입니다.
//! 체인을 모두 통과한 요청은 트레일링 폴백 핸들러가 받습니다.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::middleware::MiddlewareManager;
use crate::settings::Settings;

mod handler;
mod listener;

pub use handler::{FallbackHandler, NotFound, RequestHandler};
pub use listener::Listener;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct Server {
    handler: Arc<RequestHandler>,
    listener: Listener,
}

impl Server {
    /// 설정과 선택적 폴백 핸들러로 서버를 만듭니다.
    pub async fn new(
        settings: Settings,
        fallback: Option<Arc<dyn FallbackHandler>>,
    ) -> Result<Self> {
        let manager = MiddlewareManager::from_settings(&settings)?;
        let listener = Listener::bind(&settings.listen).await?;

        if settings.compress {
            // 내장 서버는 압축하지 않습니다. 임베딩 프레임워크 몫입니다.
            info!("압축은 호스트 프레임워크에 위임됩니다");
        }

        let fallback = fallback.unwrap_or_else(|| Arc::new(NotFound));
        let handler = Arc::new(RequestHandler::new(manager, fallback, settings.logger));

        Ok(Self { handler, listener })
    }

    /// 바인딩된 주소. 테스트에서 포트 0으로 띄울 때 사용합니다.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> Result<()> {
        self.listener.run(self.handler).await
    }
}
