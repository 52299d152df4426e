//! In-process router tests; no upstream is ever contacted.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use pncp_proxy::config::ProxyConfig;
use pncp_proxy::http::HttpServer;

fn router() -> axum::Router {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = "http://127.0.0.1:9/api/consulta/v1/".into();
    HttpServer::new(config).unwrap().router()
}

async fn call(method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let res = router()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

#[tokio::test]
async fn test_root_is_invalid_path() {
    let (status, headers, body) = call(Method::GET, "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Invalid path");
    assert_eq!(body["got"]["path"], "/");
    assert_eq!(body["got"]["upstreamPath"], "");
}

#[tokio::test]
async fn test_invalid_path_echoes_query() {
    let (status, _, body) = call(Method::GET, "/pncp/?pagina=2&uf=SP&uf=RJ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["got"]["query"], "pagina=2&uf=SP&uf=RJ");
}

#[tokio::test]
async fn test_preflight_on_any_path() {
    let (status, headers, body) = call(Method::OPTIONS, "/whatever/../x").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET,OPTIONS");
}

#[tokio::test]
async fn test_request_id_generated() {
    let (_, headers, _) = call(Method::GET, "/nope").await;
    let id = headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
}

#[tokio::test]
async fn test_original_path_header_fallback_is_reported() {
    let res = router()
        .oneshot(
            Request::builder()
                .uri("/.netlify/functions/other")
                .header("x-nf-original-path", "/api/consulta/v1/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["got"]["originalPath"], "/api/consulta/v1/");
    assert_eq!(body["got"]["upstreamPath"], "");
}
