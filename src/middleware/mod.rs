//! 요청 처리 미들웨어
//!
//! 헤더 정책 레이어와 변환 파이프라인 레이어를 워터폴로 연결합니다.

pub mod chain;
pub mod context;
pub mod error;
pub mod headers;
pub mod manager;
pub mod response;
pub mod traits;
pub mod transform;

pub use chain::{ChainOutcome, LayerChain};
pub use context::RequestContext;
pub use error::MiddlewareError;
pub use manager::MiddlewareManager;
pub use response::handle_middleware_error;
pub use traits::{Layer, LayerResult};

/// 미들웨어가 생성하는 응답 타입
pub type Response = hyper::Response<http_body_util::Full<bytes::Bytes>>;
