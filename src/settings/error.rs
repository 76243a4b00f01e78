use crate::settings::resource::ResourceKind;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("환경 변수 {var_name} 값 {value} 오류: {reason}")]
    EnvVarInvalid {
        var_name: String,
        value: String,
        reason: String,
    },

    #[error("설정 파일 {path} 오류: {error}")]
    FileError {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("설정 파싱 오류: {source}")]
    ParseError {
        #[from]
        source: toml::de::Error,
    },

    /// 리소스 타입에 처리할 파일 목록이 없는 경우
    #[error("{kind}: 처리할 파일이 없습니다")]
    MissingFiles { kind: ResourceKind },

    /// 허용되지 않는 프로세서가 지정된 경우
    #[error("{kind} 프로세서 '{value}'은(는) 유효하지 않습니다 (가능한 값: {choices})")]
    InvalidProcessor {
        kind: ResourceKind,
        value: String,
        choices: String,
    },
}
