use hyper::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    /// 레이어가 직접 렌더링하지 않는 상태 코드.
    /// 호스트 프레임워크의 에러 경로로 전달됩니다.
    #[error("상태 코드 {0}")]
    Status(StatusCode),

    /// 외부 컴파일러/번들러 실패. 캐시되지 않습니다.
    #[error("{layer} 레이어 컴파일 실패: {message}")]
    Compile { layer: String, message: String },

    #[error(transparent)]
    Hyper(#[from] hyper::Error),
}

impl MiddlewareError {
    /// 에러를 렌더링할 때 사용할 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            MiddlewareError::Status(code) => *code,
            MiddlewareError::Compile { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            MiddlewareError::Hyper(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
