use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive(Level::INFO.into())
            .add_directive("h5bp_server=debug".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub host: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub cache_status: Option<String>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            host: String::new(),
            status_code: 0,
            duration_ms: 0,
            cache_status: None,
            error: None,
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();
        if let Some(host) = req.headers().get(hyper::header::HOST) {
            self.host = host.to_str().unwrap_or_default().to_string();
        }

        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            host = %self.host,
            "요청 수신"
        );
    }

    pub fn with_response(&mut self, status: hyper::StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn with_cache_status(&mut self, status: impl Into<String>) {
        self.cache_status = Some(status.into());
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        let error_msg = error.to_string();
        error!(
            request_id = %self.request_id,
            error = %error_msg,
            "요청 처리 오류"
        );
        self.error = Some(error_msg);
    }
}

pub fn log_request(log: &RequestLog) {
    if log.error.is_some() {
        error!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            host = %log.host,
            status = %log.status_code,
            duration_ms = %log.duration_ms,
            error = ?log.error,
            "요청 실패"
        );
    } else if log.status_code >= 400 {
        warn!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            host = %log.host,
            status = %log.status_code,
            duration_ms = %log.duration_ms,
            "요청 완료 (경고)"
        );
    } else {
        info!(
            request_id = %log.request_id,
            method = %log.method,
            path = %log.path,
            host = %log.host,
            status = %log.status_code,
            duration_ms = %log.duration_ms,
            cache = ?log.cache_status,
            "요청 완료"
        );
    }
}
