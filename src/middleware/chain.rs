use hyper::StatusCode;
use tracing::debug;

use super::response::{redirect_response, status_response};
use super::{Layer, LayerResult, MiddlewareError, RequestContext, Response};

/// 체인 실행 결과
#[derive(Debug)]
pub enum ChainOutcome {
    /// 어떤 레이어가 응답을 확정함
    Served(Response),

    /// 모든 레이어가 통과. 호스트 프레임워크/폴백이 처리합니다
    Fallthrough,
}

/// 레이어들을 설정된 순서대로 실행하는 워터폴 체인
#[derive(Default)]
pub struct LayerChain {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerChain {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn add<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push(Box::new(layer));
    }

    pub fn add_boxed(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 레이어를 순서대로 실행합니다.
    ///
    /// 301/302/403은 여기서 직접 렌더링되어 체인을 끝냅니다.
    /// 그 외의 실패 코드는 `MiddlewareError::Status`로 전환되어
    /// 호출자(호스트 프레임워크의 에러 경로)로 올라갑니다.
    pub async fn execute(&self, ctx: &mut RequestContext) -> Result<ChainOutcome, MiddlewareError> {
        for layer in &self.layers {
            match layer.handle(ctx).await? {
                LayerResult::Continue => {
                    debug!(layer = layer.name(), "레이어 통과");
                }
                LayerResult::Serve(response) => {
                    debug!(layer = layer.name(), status = %response.status(), "레이어가 응답 제공");
                    return Ok(ChainOutcome::Served(response));
                }
                LayerResult::Redirect(status, location) => {
                    debug!(layer = layer.name(), %status, location, "리다이렉트");
                    return Ok(ChainOutcome::Served(redirect_response(status, &location)));
                }
                LayerResult::Reject(status) => {
                    debug!(layer = layer.name(), %status, "요청 거부");
                    if is_terminal(status) {
                        return Ok(ChainOutcome::Served(status_response(status)));
                    }
                    return Err(MiddlewareError::Status(status));
                }
            }
        }

        Ok(ChainOutcome::Fallthrough)
    }
}

/// 체인이 직접 렌더링하는 코드: 리다이렉트와 403 (403이 404보다 우선)
fn is_terminal(status: StatusCode) -> bool {
    status == StatusCode::MOVED_PERMANENTLY
        || status == StatusCode::FOUND
        || status == StatusCode::FORBIDDEN
}
