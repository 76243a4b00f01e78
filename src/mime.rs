//! MIME 분류기
//!
//! 응답의 Content-Type(또는 확장자)을 캐시 정책 선택에 사용하는
//! 대분류(Category)로 변환합니다.

/// 캐시 정책 선택에 사용되는 MIME 대분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// HTML, XML, JSON, cache-manifest 등 문서/데이터
    Data,
    /// RSS/Atom 피드
    Feed,
    /// 파비콘 (이름을 바꿀 수 없으므로 별도 정책)
    Favicon,
    /// 이미지, 비디오, 오디오, 웹폰트, HTC
    Media,
    /// CSS와 JavaScript
    ScriptStyle,
    /// 알려진 타입이지만 별도 분류가 없는 경우
    Other,
    /// 타입이 없거나 MIME 테이블에서 찾을 수 없는 경우
    Unknown,
}

/// Content-Type 문자열을 대분류로 변환합니다.
///
/// 세미콜론 이후의 파라미터(charset 등)는 무시합니다.
/// 분류 순서가 결과를 결정하므로 (폰트 타입은 Media와 겹칩니다)
/// 먼저 매칭되는 분류가 우선합니다.
pub fn classify(content_type: &str) -> Category {
    let bare = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if bare.is_empty() || !is_resolvable(&bare) {
        return Category::Unknown;
    }

    match bare.as_str() {
        "text/cache-manifest" | "text/html" | "text/xml" | "application/xml"
        | "application/rdf+xml" | "application/json" => return Category::Data,
        "application/rss+xml" | "application/atom+xml" => return Category::Feed,
        "image/x-icon" => return Category::Favicon,
        "text/x-component" => return Category::Media,
        "text/css" | "application/javascript" | "text/javascript" => {
            return Category::ScriptStyle
        }
        _ => {}
    }

    if is_image(&bare)
        || is_font(&bare)
        || bare.starts_with("video/")
        || bare.starts_with("audio/")
    {
        return Category::Media;
    }

    Category::Other
}

/// 확장자로부터 Content-Type을 추정합니다.
///
/// 디렉토리 형태의 URL(trailing slash)은 호출자가 걸러야 합니다.
pub fn lookup(path: &str) -> Option<&'static str> {
    mime_guess::from_path(path).first_raw()
}

pub fn is_image(bare_type: &str) -> bool {
    bare_type.starts_with("image/")
}

pub fn is_font(bare_type: &str) -> bool {
    matches!(
        bare_type,
        "application/font-woff"
            | "application/x-font-ttf"
            | "application/vnd.ms-fontobject"
            | "font/opentype"
    ) || bare_type.starts_with("font/")
}

/// 선언된 타입이 MIME 테이블에 존재하는지 확인합니다.
///
/// 테이블에 없는 타입은 빈 타입과 동일하게 취급합니다.
/// 명시적으로 분류하는 타입들은 테이블 유무와 무관하게 인정합니다.
fn is_resolvable(bare_type: &str) -> bool {
    const ALWAYS_KNOWN: &[&str] = &[
        "text/cache-manifest",
        "text/x-component",
        "application/rdf+xml",
        "application/font-woff",
        "application/x-font-ttf",
        "application/vnd.ms-fontobject",
        "font/opentype",
    ];

    ALWAYS_KNOWN.contains(&bare_type)
        || mime_guess::get_mime_extensions_str(bare_type).is_some()
}
