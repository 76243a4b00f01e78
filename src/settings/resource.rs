//! 스크립트/스타일시트 리소스 설정
//!
//! 설정 시점에 한 번 검증되어 불변의 `ResourceConfig`로 변환됩니다.
//! 검증 실패는 서버가 뜨기 전에 `SettingsError`로 종료시킵니다.

use std::fmt;
use std::path::{Path, PathBuf};
use serde::Deserialize;

use super::SettingsError;

/// 변환 파이프라인이 다루는 리소스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Scripts,
    Stylesheets,
}

impl ResourceKind {
    /// 해당 종류에 허용되는 프로세서 목록
    pub fn processors(&self) -> &'static [Processor] {
        match self {
            ResourceKind::Scripts => &[Processor::CommonJs, Processor::Amd],
            ResourceKind::Stylesheets => &[Processor::Sass, Processor::Less, Processor::Stylus],
        }
    }

    /// 프로세서를 지정하지 않았을 때의 기본값
    pub fn default_processor(&self) -> Processor {
        match self {
            ResourceKind::Scripts => Processor::CommonJs,
            ResourceKind::Stylesheets => Processor::Sass,
        }
    }

    /// 컴파일 결과물의 Content-Type
    pub fn content_type(&self) -> &'static str {
        match self {
            ResourceKind::Scripts => "application/javascript; charset=utf-8",
            ResourceKind::Stylesheets => "text/css; charset=utf-8",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Scripts => write!(f, "scripts"),
            ResourceKind::Stylesheets => write!(f, "stylesheets"),
        }
    }
}

/// 외부 컴파일러/번들러 선택
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processor {
    CommonJs,
    Amd,
    Sass,
    Less,
    Stylus,
}

impl Processor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Processor::CommonJs => "commonjs",
            Processor::Amd => "amd",
            Processor::Sass => "sass",
            Processor::Less => "less",
            Processor::Stylus => "stylus",
        }
    }

    /// 요청 URL을 실제 소스 파일 경로로 변환합니다.
    ///
    /// CSS 전처리기는 요청된 `.css` 확장자를 소스 확장자로 바꿉니다.
    pub fn source_path(&self, root: &Path, url: &str) -> PathBuf {
        let source = match self {
            Processor::CommonJs | Processor::Amd => url.to_string(),
            Processor::Sass => swap_css_suffix(url, "scss"),
            Processor::Less => swap_css_suffix(url, "less"),
            Processor::Stylus => swap_css_suffix(url, "styl"),
        };
        root.join(source)
    }
}

/// 끝의 `.css` 확장자만 소스 확장자로 교체합니다.
fn swap_css_suffix(url: &str, ext: &str) -> String {
    match url.strip_suffix(".css") {
        Some(stem) => format!("{}.{}", stem, ext),
        None => url.to_string(),
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `files = "app.js"` 혹은 `files = ["a.js", "b.js"]` 둘 다 허용
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileList {
    One(String),
    Many(Vec<String>),
}

impl FileList {
    fn into_vec(self) -> Vec<String> {
        match self {
            FileList::One(file) => vec![file],
            FileList::Many(files) => files,
        }
    }
}

/// TOML/환경에서 읽힌 그대로의 리소스 설정 (검증 전)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSettings {
    #[serde(default)]
    pub files: Option<FileList>,

    #[serde(default)]
    pub processor: Option<String>,

    #[serde(default)]
    pub minify: bool,

    #[serde(default)]
    pub source_map: bool,
}

impl ResourceSettings {
    /// 설정을 검증하고 불변 리소스 설정으로 변환합니다.
    pub fn validate(self, kind: ResourceKind) -> Result<ResourceConfig, SettingsError> {
        let files: Vec<String> = self
            .files
            .map(FileList::into_vec)
            .unwrap_or_default()
            .into_iter()
            // 선행 슬래시는 제거하여 정규화
            .map(|entry| entry.trim_start_matches('/').to_string())
            .filter(|entry| !entry.is_empty())
            .collect();

        if files.is_empty() {
            return Err(SettingsError::MissingFiles { kind });
        }

        let processor = match self.processor {
            None => kind.default_processor(),
            Some(value) => kind
                .processors()
                .iter()
                .copied()
                .find(|p| p.as_str() == value)
                .ok_or_else(|| SettingsError::InvalidProcessor {
                    kind,
                    value,
                    choices: kind
                        .processors()
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })?,
        };

        Ok(ResourceConfig {
            kind,
            files,
            processor,
            minify: self.minify,
            source_map: self.source_map,
        })
    }
}

/// 검증이 끝난 불변 리소스 설정
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub kind: ResourceKind,
    /// 정규화된(선행 슬래시 제거) 논리 URL 목록
    pub files: Vec<String>,
    pub processor: Processor,
    pub minify: bool,
    pub source_map: bool,
}
