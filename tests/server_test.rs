use std::sync::Arc;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;

use h5bp_server::middleware::{RequestContext, Response};
use h5bp_server::server::{FallbackHandler, Server};
use h5bp_server::settings::{Environment, Settings, WwwPolicy};

/// 고정된 HTML 페이지를 돌려주는 폴백 (호스트 프레임워크 역할)
struct StaticPage;

#[async_trait]
impl FallbackHandler for StaticPage {
    async fn handle(&self, _ctx: &RequestContext) -> Response {
        let mut response = hyper::Response::new(Full::new(Bytes::from("<html></html>")));
        response
            .headers_mut()
            .insert("content-type", "text/html".parse().unwrap());
        // 다운스트림 생성기가 붙인 ETag는 정책이 제거해야 함
        response
            .headers_mut()
            .insert("etag", "\"abc\"".parse().unwrap());
        response
    }
}

async fn spawn_server(settings: Settings, fallback: Option<Arc<dyn FallbackHandler>>) -> String {
    let server = Server::new(settings, fallback).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    format!("http://{}", addr)
}

fn test_settings() -> Settings {
    Settings {
        environment: Environment::Test,
        listen: "127.0.0.1:0".to_string(),
        logger: false,
        ..Default::default()
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_policy_headers_applied_end_to_end() {
    let base = spawn_server(test_settings(), Some(Arc::new(StaticPage))).await;

    let res = client().get(format!("{}/page", base)).send().await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers().get("cache-control").unwrap(),
        "public,max-age=0,no-transform"
    );
    assert!(res.headers().get("etag").is_none());
}

#[tokio::test]
async fn test_hidden_file_forbidden_end_to_end() {
    let base = spawn_server(test_settings(), None).await;

    let res = client()
        .get(format!("{}/.htaccess", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 403);
    assert_eq!(res.text().await.unwrap(), "Forbidden");
}

#[tokio::test]
async fn test_backup_file_forbidden_end_to_end() {
    let base = spawn_server(test_settings(), None).await;

    let res = client()
        .get(format!("{}/dump.sql", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 403);
}

#[tokio::test]
async fn test_www_redirect_end_to_end() {
    let settings = Settings {
        www: Some(WwwPolicy::Enforce),
        ..test_settings()
    };
    let base = spawn_server(settings, None).await;

    let res = client()
        .get(format!("{}/page?q=1", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 301);
    let location = res.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("//www."));
    assert!(location.ends_with("/page?q=1"));
}

#[tokio::test]
async fn test_fallback_404_when_nothing_matches() {
    let base = spawn_server(test_settings(), None).await;

    let res = client()
        .get(format!("{}/missing.png", base))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 404);
    // 폴백 응답에도 헤더 정책이 적용됨 (확장자로 유도된 타입 → Media)
    assert_eq!(
        res.headers().get("cache-control").unwrap(),
        "public,max-age=2419200,no-transform"
    );
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
