//! End-to-end checks of the login pipeline: the recovery gate on `login_init`
//! and the suppressor on `gettext`, driven through the router.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::LOCATION, Request, StatusCode},
    Router,
};
use recovery_gate::{
    api::{router, AppState},
    gate::{PostId, RecoveryGate, Resolver, SiteUrls, TargetType},
    store::{MemoryContentStore, Store},
};
use std::collections::HashSet;
use tower::ServiceExt;

fn app(site_url: &str, login_path: &str, posts: &[i64], target: TargetType) -> Result<Router> {
    let urls = SiteUrls::new(site_url, login_path, "/?p={id}")?;
    let store = Store::Memory(MemoryContentStore::new(
        posts.iter().copied().map(PostId::new),
    ));
    let gate = RecoveryGate::new(Resolver::new(store, urls)).with_target(target);

    router(AppState::new(gate))
}

async fn get(app: Router, uri: &str) -> Result<axum::response::Response> {
    Ok(app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?)
}

fn location(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn recovery_actions_redirect_to_published_posts() -> Result<()> {
    let app = app("https://example.com", "login", &[1, 2, 3], TargetType::RandomPost)?;

    let mut seen = HashSet::new();
    for _ in 0..200 {
        for action in ["lostpassword", "retrievepassword"] {
            let response = get(app.clone(), &format!("/login?action={action}")).await?;
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);

            let location = location(&response).unwrap_or_default();
            assert!(location.starts_with("https://example.com/?p="), "{location}");
            seen.insert(location);
        }
    }

    assert_eq!(seen.len(), 3);
    Ok(())
}

#[tokio::test]
async fn escaped_and_padded_actions_are_still_disabled() -> Result<()> {
    let app = app("https://example.com", "login", &[9], TargetType::RandomPost)?;

    for query in [
        "action=%20lostpassword%0A",
        "action=lost%5Cpassword",
        "action=%3Cb%3Eretrievepassword%3C%2Fb%3E",
        "action=login&action=lostpassword",
    ] {
        let response = get(app.clone(), &format!("/login?{query}")).await?;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY, "{query}");
        assert_eq!(location(&response).as_deref(), Some("https://example.com/?p=9"));
    }

    Ok(())
}

#[tokio::test]
async fn other_requests_reach_the_login_form() -> Result<()> {
    let app = app("https://example.com", "login", &[9], TargetType::RandomPost)?;

    for uri in ["/login", "/login?action=logout", "/login?action=LOSTPASSWORD", "/login?loggedout=true"] {
        let response = get(app.clone(), uri).await?;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let html = String::from_utf8(body.to_vec())?;
        assert!(html.contains("loginform"));
        assert!(!html.contains("Lost your password?"));
    }

    Ok(())
}

#[tokio::test]
async fn empty_store_redirects_home() -> Result<()> {
    let app = app("https://example.com/blog", "wp-login.php", &[], TargetType::RandomPost)?;

    let response = get(app, "/blog/wp-login.php?action=lostpassword").await?;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response).as_deref(), Some("https://example.com/blog/"));

    Ok(())
}

#[tokio::test]
async fn login_target_redirects_to_login_form() -> Result<()> {
    let app = app("https://example.com", "login", &[9], TargetType::Login)?;

    let response = get(app, "/login?action=retrievepassword").await?;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response).as_deref(), Some("https://example.com/login"));

    Ok(())
}

#[tokio::test]
async fn redirect_has_no_body() -> Result<()> {
    let app = app("https://example.com", "login", &[9], TargetType::RandomPost)?;

    let response = get(app, "/login?action=lostpassword").await?;
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(body.is_empty());

    Ok(())
}
