use async_trait::async_trait;
use hyper::StatusCode;

use super::{MiddlewareError, RequestContext, Response};

/// 레이어 하나의 처리 결과
#[derive(Debug)]
pub enum LayerResult {
    /// 다음 레이어로 계속
    Continue,

    /// 응답을 직접 제공하고 체인을 종료
    Serve(Response),

    /// Location으로 리다이렉트 (301/302). 체인이 직접 렌더링합니다
    Redirect(StatusCode, String),

    /// 상태 코드로 거부. 301/302/403은 직접 렌더링되고
    /// 그 외의 코드는 에러로 전환되어 호스트 프레임워크로 전달됩니다.
    Reject(StatusCode),
}

/// 미들웨어 레이어 트레이트
///
/// 각 레이어는 요청 컨텍스트를 검사/수정하고 처리 결과를 반환합니다.
#[async_trait]
pub trait Layer: Send + Sync {
    /// 레이어의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// 요청 하나를 처리합니다.
    async fn handle(&self, ctx: &mut RequestContext) -> Result<LayerResult, MiddlewareError>;
}
