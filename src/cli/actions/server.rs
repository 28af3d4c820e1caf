use crate::{
    api,
    cli::telemetry,
    gate::{PostId, RecoveryGate, Resolver, SiteUrls, TargetType},
    store::{MemoryContentStore, PgContentStore, Store},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<SecretString>,
    pub published_posts: Vec<i64>,
    pub site_url: String,
    pub login_path: String,
    pub permalink_template: String,
    pub redirect_target: String,
}

/// Build the content store from the arguments.
///
/// # Errors
/// Returns an error if the database cannot be reached.
pub async fn store(dsn: Option<&SecretString>, published_posts: &[i64]) -> Result<Store> {
    if let Some(dsn) = dsn {
        return Ok(Store::Postgres(PgContentStore::connect(dsn).await?));
    }

    if published_posts.is_empty() {
        warn!("No content store configured, password recovery requests will be sent to the home URL");
    }

    Ok(Store::Memory(MemoryContentStore::new(
        published_posts.iter().copied().map(PostId::new),
    )))
}

/// Execute the server action.
/// # Errors
/// Returns an error if the site configuration is invalid, the database cannot
/// be reached, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let urls = SiteUrls::new(&args.site_url, &args.login_path, &args.permalink_template)
        .context("Invalid site configuration")?;
    api::check_routes(&urls).context("Invalid site configuration")?;

    let target = TargetType::from(args.redirect_target.as_str());

    let store = store(args.dsn.as_ref(), &args.published_posts).await?;

    info!(
        "Login form at {}, recovery requests redirect to {} using the {} content store",
        urls.login(),
        target,
        store.kind()
    );

    let gate = RecoveryGate::new(Resolver::new(store, urls)).with_target(target);

    let result = api::new(args.port, api::AppState::new(gate)).await;

    telemetry::shutdown_tracer();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ContentStore;

    #[tokio::test]
    async fn test_memory_store_without_dsn() {
        let store = store(None, &[7]).await.unwrap();
        assert_eq!(store.kind(), "memory");
        assert_eq!(store.random_published().await.unwrap(), Some(PostId::new(7)));
    }

    #[tokio::test]
    async fn test_empty_memory_store() {
        let store = store(None, &[]).await.unwrap();
        assert_eq!(store.random_published().await.unwrap(), None);
    }

    fn args(site_url: &str, login_path: &str) -> Args {
        Args {
            port: 0,
            dsn: None,
            published_posts: Vec::new(),
            site_url: site_url.to_string(),
            login_path: login_path.to_string(),
            permalink_template: "/?p={id}".to_string(),
            redirect_target: "RANDOM_POST".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_site_url_fails_before_serving() {
        let err = execute(args("not a url", "login")).await.unwrap_err();
        assert!(err.to_string().contains("Invalid site configuration"));
    }

    #[tokio::test]
    async fn test_unroutable_login_path_fails_before_serving() {
        for login_path in ["health", "login/:id", "login/*rest"] {
            let err = execute(args("https://example.com", login_path))
                .await
                .unwrap_err();
            assert!(
                err.to_string().contains("Invalid site configuration"),
                "{login_path}: {err}"
            );
        }
    }
}
