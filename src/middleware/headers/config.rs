use crate::settings::{ServerKind, Settings, WwwPolicy};

/// 헤더 정책에 필요한 설정의 스냅샷
///
/// 전송 직전 훅 클로저로 복사되어 들어가므로 값 타입으로 유지합니다.
#[derive(Debug, Clone, Copy)]
pub struct HeaderPolicyConfig {
    pub server: ServerKind,
    pub cors: bool,
    pub dotfiles: bool,
    pub www: Option<WwwPolicy>,
}

impl From<&Settings> for HeaderPolicyConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            server: settings.server,
            cors: settings.cors,
            dotfiles: settings.dotfiles,
            www: settings.www,
        }
    }
}
