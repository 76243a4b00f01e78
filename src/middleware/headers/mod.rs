//! 헤더 정책 레이어
//!
//! 숨김/백업 파일 차단, www 정규화, 캐시 버스팅 재작성을 먼저 수행하고
//! 나머지 헤더 정책(캐시, CORS, IE 호환 등)은 전송 직전 훅으로 미룹니다.

mod config;
mod middleware;

pub use config::HeaderPolicyConfig;
pub use middleware::HeadersLayer;
