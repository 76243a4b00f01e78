//! h5bp_server는 모범 사례 응답 헤더 정책과 스크립트/스타일시트
//! 온더플라이 컴파일을 제공하는 HTTP 미들웨어입니다.
//!
//! # 주요 기능
//!
//! - MIME 분류 기반 Cache-Control 정책
//! - 숨김/백업 파일 차단, www 정규화, 캐시 버스팅
//! - 외부 컴파일러를 통한 번들 컴파일과 인스턴스 캐시
//!
//! # 예제
//!
//! ```
//! use h5bp_server::settings::Settings;
//! use h5bp_server::middleware::MiddlewareManager;
//!
//! let settings = Settings::default();
//! let manager = MiddlewareManager::from_settings(&settings).unwrap();
//! ```
//!
//! # 리소스 설정
//!
//! ```
//! use h5bp_server::settings::Settings;
//!
//! let settings = Settings::from_toml(r#"
//!     environment = "production"
//!     cors = true
//!
//!     [scripts]
//!     files = "js/app.js"
//!     processor = "commonjs"
//!
//!     [stylesheets]
//!     files = ["css/style.css"]
//! "#).unwrap();
//!
//! let configs = settings.resource_configs().unwrap();
//! assert_eq!(configs.len(), 2);
//! ```

pub mod logging;
pub mod mime;
pub mod middleware;
pub mod server;
pub mod settings;
