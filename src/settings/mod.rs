//! 미들웨어/서버 설정
//!
//! `H5BP_CONFIG_FILE` 환경 변수가 가리키는 TOML 파일을 읽거나,
//! 개별 `H5BP_*` 환경 변수로부터 설정을 구성합니다.
//! 설정은 생성 시점에 검증되어 이후에는 불변으로 취급됩니다.

use std::{env, path::PathBuf, str::FromStr};
use serde::{Deserialize, Deserializer};
use tracing::debug;

mod error;
pub mod resource;

pub use error::SettingsError;
pub use resource::{FileList, Processor, ResourceConfig, ResourceKind, ResourceSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;

/// 미들웨어가 어디에 장착되는지
///
/// `Embedded`는 `X-Powered-By`를 찍는 호스트 프레임워크 안에
/// 장착되었다는 의미로, 헤더 정책이 해당 헤더를 제거합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    #[default]
    Builtin,
    Embedded,
}

/// 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(format!("알 수 없는 환경: {}", s)),
        }
    }
}

/// www 강제 정책
///
/// `www = true`는 `www.` 강제, `www = false`는 `www.` 제거.
/// 단일 옵션이므로 두 정책이 동시에 켜지는 상태는 표현 자체가 불가능합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WwwPolicy {
    Enforce,
    Strip,
}

fn www_from_bool<'de, D>(deserializer: D) -> std::result::Result<Option<WwwPolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<bool>::deserialize(deserializer)?;
    Ok(value.map(|enforce| {
        if enforce {
            WwwPolicy::Enforce
        } else {
            WwwPolicy::Strip
        }
    }))
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 장착 형태 (builtin | embedded)
    #[serde(default)]
    pub server: ServerKind,

    /// 실행 환경 (development | production | test)
    #[serde(default)]
    pub environment: Environment,

    /// 모든 응답에 CORS 허용
    #[serde(default)]
    pub cors: bool,

    /// 숨김 파일(.git 등) 접근 허용
    #[serde(default)]
    pub dotfiles: bool,

    /// www 강제 정책 (true = 강제, false = 제거, 없으면 미적용)
    #[serde(default, deserialize_with = "www_from_bool")]
    pub www: Option<WwwPolicy>,

    /// 소스 파일을 찾는 루트 디렉토리
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// 내장 서버 바인드 주소
    #[serde(default = "default_listen")]
    pub listen: String,

    /// 요청 로깅 여부
    #[serde(default = "default_true")]
    pub logger: bool,

    /// 압축은 호스트 프레임워크 몫으로 넘기는 패스스루 토글
    #[serde(default = "default_true")]
    pub compress: bool,

    #[serde(default)]
    pub scripts: Option<ResourceSettings>,

    #[serde(default)]
    pub stylesheets: Option<ResourceSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerKind::default(),
            environment: Environment::default(),
            cors: false,
            dotfiles: false,
            www: None,
            root: default_root(),
            listen: default_listen(),
            logger: true,
            compress: true,
            scripts: None,
            stylesheets: None,
        }
    }
}

impl Settings {
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("H5BP_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env()
        }
    }

    pub async fn from_toml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| SettingsError::FileError {
                    path: path.as_ref().to_string_lossy().to_string(),
                    error: e,
                })?;

        let settings = Self::from_toml(&content)?;
        debug!(path = %path.as_ref().display(), "설정 파일 로드 완료");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Some(environment) = parse_env_var::<Environment>("H5BP_ENV")? {
            settings.environment = environment;
        }
        if let Some(cors) = parse_env_var::<bool>("H5BP_CORS")? {
            settings.cors = cors;
        }
        if let Some(dotfiles) = parse_env_var::<bool>("H5BP_DOTFILES")? {
            settings.dotfiles = dotfiles;
        }
        if let Some(www) = parse_env_var::<bool>("H5BP_WWW")? {
            settings.www = Some(if www { WwwPolicy::Enforce } else { WwwPolicy::Strip });
        }
        if let Ok(root) = env::var("H5BP_ROOT") {
            settings.root = PathBuf::from(root);
        }
        if let Ok(listen) = env::var("H5BP_LISTEN") {
            settings.listen = listen;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    ///
    /// 리소스 설정의 오류는 서버가 요청을 받기 전에 드러나야 합니다.
    pub fn validate(&self) -> Result<()> {
        self.resource_configs()?;
        Ok(())
    }

    /// 선언 순서(스크립트, 스타일시트)대로 검증된 리소스 설정을 돌려줍니다.
    pub fn resource_configs(&self) -> Result<Vec<ResourceConfig>> {
        let mut configs = Vec::new();
        if let Some(scripts) = &self.scripts {
            configs.push(scripts.clone().validate(ResourceKind::Scripts)?);
        }
        if let Some(stylesheets) = &self.stylesheets {
            configs.push(stylesheets.clone().validate(ResourceKind::Stylesheets)?);
        }
        Ok(configs)
    }

    /// production 환경이면 minify를 묵시적으로 켭니다.
    pub fn effective_minify(&self, config: &ResourceConfig) -> bool {
        config.minify || self.environment == Environment::Production
    }

    /// development 환경에서는 캐시를 항상 우회합니다.
    pub fn live_mode(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// 환경 변수를 파싱합니다. 없으면 `None`, 형식이 틀리면 오류.
pub fn parse_env_var<T: FromStr>(var_name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(var_name) {
        Err(_) => Ok(None),
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| SettingsError::EnvVarInvalid {
                var_name: var_name.to_string(),
                value,
                reason: e.to_string(),
            }),
    }
}
