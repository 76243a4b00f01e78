use bytes::Bytes;
use http_body_util::Full;
use hyper::header::CONTENT_TYPE;
use hyper::{HeaderMap, StatusCode};

use h5bp_server::middleware::headers::{HeaderPolicyConfig, HeadersLayer};
use h5bp_server::middleware::{Layer, LayerResult, RequestContext, Response};
use h5bp_server::settings::{ServerKind, Settings, WwwPolicy};

fn layer(settings: &Settings) -> HeadersLayer {
    HeadersLayer::new(HeaderPolicyConfig::from(settings))
}

fn ctx(url: &str) -> RequestContext {
    RequestContext::new(url, "example.com", "Mozilla/5.0")
}

fn assert_forbidden(result: LayerResult) {
    match result {
        LayerResult::Reject(code) => assert_eq!(code, StatusCode::FORBIDDEN),
        other => panic!("403 거부여야 함: {:?}", other),
    }
}

/// 레이어를 실행하고 훅이 적용된 응답 헤더를 돌려줍니다.
async fn run_policy(
    settings: &Settings,
    mut ctx: RequestContext,
    content_type: Option<&str>,
) -> HeaderMap {
    let result = layer(settings).handle(&mut ctx).await.unwrap();
    assert!(matches!(result, LayerResult::Continue));

    let mut response: Response = hyper::Response::new(Full::new(Bytes::new()));
    if let Some(ct) = content_type {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, ct.parse().unwrap());
    }
    ctx.finalize(&mut response);
    response.headers().clone()
}

#[tokio::test]
async fn test_hidden_files_blocked() {
    let settings = Settings::default();
    let result = layer(&settings).handle(&mut ctx("/.git")).await.unwrap();
    assert_forbidden(result);

    let result = layer(&settings)
        .handle(&mut ctx("/sub/.htaccess"))
        .await
        .unwrap();
    assert_forbidden(result);
}

#[tokio::test]
async fn test_hidden_files_allowed_with_dotfiles() {
    let settings = Settings {
        dotfiles: true,
        ..Default::default()
    };
    let result = layer(&settings).handle(&mut ctx("/.git")).await.unwrap();
    assert!(matches!(result, LayerResult::Continue));
}

#[tokio::test]
async fn test_backup_files_blocked_unconditionally() {
    let settings = Settings {
        dotfiles: true,
        ..Default::default()
    };

    for path in ["/db.sql", "/site.bak", "/app.ini", "/deploy.sh", "/style.css.swp", "/file~"] {
        let result = layer(&settings).handle(&mut ctx(path)).await.unwrap();
        assert_forbidden(result);
    }
}

#[tokio::test]
async fn test_www_strip_redirect() {
    let settings = Settings {
        www: Some(WwwPolicy::Strip),
        ..Default::default()
    };
    let mut ctx = RequestContext::new("/path/page?q=1", "www.example.com", "");
    let result = layer(&settings).handle(&mut ctx).await.unwrap();

    match result {
        LayerResult::Redirect(status, location) => {
            assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
            assert_eq!(location, "//example.com/path/page?q=1");
        }
        other => panic!("리다이렉트여야 함: {:?}", other),
    }
}

#[tokio::test]
async fn test_www_enforce_redirect() {
    let settings = Settings {
        www: Some(WwwPolicy::Enforce),
        ..Default::default()
    };
    let mut ctx = RequestContext::new("/path?q=1", "example.com", "");
    let result = layer(&settings).handle(&mut ctx).await.unwrap();

    match result {
        LayerResult::Redirect(status, location) => {
            assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
            assert_eq!(location, "//www.example.com/path?q=1");
        }
        other => panic!("리다이렉트여야 함: {:?}", other),
    }
}

#[tokio::test]
async fn test_www_policy_no_redirect_when_already_normalized() {
    let settings = Settings {
        www: Some(WwwPolicy::Strip),
        ..Default::default()
    };
    let result = layer(&settings).handle(&mut ctx("/path")).await.unwrap();
    assert!(matches!(result, LayerResult::Continue));
}

#[tokio::test]
async fn test_cache_busting_rewrite() {
    let settings = Settings::default();
    let mut ctx = RequestContext::new("/css/style.20230101.css?v=2", "example.com", "");
    let result = layer(&settings).handle(&mut ctx).await.unwrap();

    assert!(matches!(result, LayerResult::Continue));
    assert_eq!(ctx.url, "/css/style.css?v=2");
    assert_eq!(ctx.base_url, "/css/style.20230101.css?v=2");
}

#[tokio::test]
async fn test_cache_busting_only_known_extensions() {
    let settings = Settings::default();
    let mut ctx = RequestContext::new("/report.20230101.pdf", "example.com", "");
    layer(&settings).handle(&mut ctx).await.unwrap();
    assert_eq!(ctx.url, "/report.20230101.pdf");
}

#[tokio::test]
async fn test_cache_control_table() {
    let settings = Settings::default();

    let cases = [
        (Some("text/html"), "public,max-age=0,no-transform"),
        (Some("application/json"), "public,max-age=0,no-transform"),
        (Some("application/rss+xml"), "public,max-age=3600,no-transform"),
        (Some("image/x-icon"), "public,max-age=604800,no-transform"),
        (Some("image/png"), "public,max-age=2419200,no-transform"),
        (Some("text/css"), "public,max-age=29030400,no-transform"),
        (Some("application/javascript"), "public,max-age=29030400,no-transform"),
        // 분류 없는 타입은 기본값으로
        (Some("application/pdf"), "public,max-age=2419200,no-transform"),
    ];

    for (content_type, expected) in cases {
        let headers = run_policy(&settings, ctx("/resource"), content_type).await;
        assert_eq!(
            headers.get("cache-control").unwrap(),
            expected,
            "content-type {:?}",
            content_type
        );
    }
}

#[tokio::test]
async fn test_unknown_type_gets_zero_max_age() {
    let settings = Settings::default();
    let headers = run_policy(&settings, ctx("/no-extension"), None).await;
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "public,max-age=0,no-transform"
    );
}

#[tokio::test]
async fn test_content_type_derived_from_extension() {
    let settings = Settings::default();
    let headers = run_policy(&settings, ctx("/js/app.js"), None).await;
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/javascript");
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "public,max-age=29030400,no-transform"
    );
}

#[tokio::test]
async fn test_directory_url_not_sniffed() {
    let settings = Settings::default();
    let headers = run_policy(&settings, ctx("/docs/"), None).await;
    assert!(headers.get(CONTENT_TYPE).is_none());
}

#[tokio::test]
async fn test_declared_content_type_wins() {
    // 다운스트림 생성기가 정한 타입을 덮어쓰면 안 됩니다
    let settings = Settings::default();
    let headers = run_policy(&settings, ctx("/page.js"), Some("text/html")).await;
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/html");
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "public,max-age=0,no-transform"
    );
}

#[tokio::test]
async fn test_etag_removed() {
    let settings = Settings::default();
    let layer = layer(&settings);
    let mut ctx = ctx("/img/logo.png");
    layer.handle(&mut ctx).await.unwrap();

    let mut response: Response = hyper::Response::new(Full::new(Bytes::new()));
    response
        .headers_mut()
        .insert("etag", "\"abc123\"".parse().unwrap());
    ctx.finalize(&mut response);

    assert!(response.headers().get("etag").is_none());
}

#[tokio::test]
async fn test_keep_alive_always_set() {
    let settings = Settings::default();
    let headers = run_policy(&settings, ctx("/"), None).await;
    assert_eq!(headers.get("connection").unwrap(), "keep-alive");
}

#[tokio::test]
async fn test_msie_compatibility_header() {
    let settings = Settings::default();

    let msie = RequestContext::new("/", "example.com", "Mozilla/4.0 (compatible; MSIE 8.0)");
    let headers = run_policy(&settings, msie, Some("text/html")).await;
    assert_eq!(headers.get("x-ua-compatible").unwrap(), "IE=Edge");

    // HTML이 아니면 적용되지 않음
    let msie = RequestContext::new("/", "example.com", "Mozilla/4.0 (compatible; MSIE 8.0)");
    let headers = run_policy(&settings, msie, Some("image/png")).await;
    assert!(headers.get("x-ua-compatible").is_none());

    // MSIE가 아니면 적용되지 않음
    let headers = run_policy(&settings, ctx("/"), Some("text/html")).await;
    assert!(headers.get("x-ua-compatible").is_none());
}

#[tokio::test]
async fn test_global_cors() {
    let settings = Settings {
        cors: true,
        ..Default::default()
    };
    let headers = run_policy(&settings, ctx("/page"), Some("text/html")).await;
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_cors_disabled_by_default() {
    let settings = Settings::default();
    let headers = run_policy(&settings, ctx("/page"), Some("text/html")).await;
    assert!(headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_images_and_fonts_always_cors() {
    let settings = Settings::default();

    let headers = run_policy(&settings, ctx("/img/logo.png"), Some("image/png")).await;
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");

    let headers = run_policy(&settings, ctx("/fonts/a.woff"), Some("font/woff")).await;
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");

    // 리터럴 경로 font.css도 허용
    let headers = run_policy(&settings, ctx("/font.css"), Some("text/css")).await;
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_powered_by_removed_when_embedded() {
    let settings = Settings {
        server: ServerKind::Embedded,
        ..Default::default()
    };
    let layer = layer(&settings);
    let mut ctx = ctx("/page");
    layer.handle(&mut ctx).await.unwrap();

    let mut response: Response = hyper::Response::new(Full::new(Bytes::new()));
    response
        .headers_mut()
        .insert("x-powered-by", "Express".parse().unwrap());
    ctx.finalize(&mut response);

    assert!(response.headers().get("x-powered-by").is_none());
}
