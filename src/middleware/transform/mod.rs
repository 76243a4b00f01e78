//! 변환 파이프라인
//!
//! 설정된 스크립트/스타일시트 URL을 외부 컴파일러로 빌드하고
//! 인스턴스 소유 캐시에 저장하여 제공합니다.

mod cache;
mod compiler;
mod middleware;
mod minify;

pub use cache::{CachedArtifact, ResourceCache};
pub use compiler::{CommandCompiler, CompileError, Compiler};
pub use middleware::TransformLayer;
pub use minify::{CommandMinifier, Minifier};
