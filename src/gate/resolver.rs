//! Redirect target resolution.
//!
//! Given a [`TargetType`] the [`Resolver`] produces the URL a recovery request
//! is sent to. Content lookups go through a [`ContentStore`], URLs are built by
//! [`SiteUrls`]. Resolution never fails: anything the store cannot answer falls
//! back to the home URL.

use anyhow::{anyhow, Context, Result};
use std::{fmt, future::Future};
use tracing::{debug, instrument, warn};
use url::Url;

/// Placeholder replaced by the post id in a permalink template.
pub const PERMALINK_ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_PERMALINK_TEMPLATE: &str = "/?p={id}";

pub const DEFAULT_LOGIN_PATH: &str = "login";

/// Characters a router reads as path parameters or wildcards.
const ROUTE_PATTERN_CHARS: [char; 2] = [':', '*'];

/// Where a disabled recovery request is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetType {
    /// Permanent link of a random published post.
    #[default]
    RandomPost,
    /// The login form.
    Login,
    /// The home URL, also used for unrecognized tokens.
    Home,
}

impl TargetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RandomPost => "RANDOM_POST",
            Self::Login => "LOGIN",
            Self::Home => "HOME",
        }
    }
}

impl From<&str> for TargetType {
    fn from(token: &str) -> Self {
        match token {
            "RANDOM_POST" => Self::RandomPost,
            "LOGIN" => Self::Login,
            _ => Self::Home,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(i64);

impl PostId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only access to published content.
pub trait ContentStore: Send + Sync {
    /// One published post chosen at random, id only.
    fn random_published(&self) -> impl Future<Output = Result<Option<PostId>>> + Send;

    /// Check that the store can answer queries.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;
}

/// URL builder for the fixed site locations and post permalinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    home: Url,
    login: Url,
    permalink_template: String,
}

impl SiteUrls {
    /// # Errors
    /// Returns an error if the site URL is not absolute, the login path cannot
    /// be joined to it, resolves to the home URL or contains route pattern
    /// characters, or the permalink template lacks `{id}`.
    pub fn new(site_url: &str, login_path: &str, permalink_template: &str) -> Result<Self> {
        let mut home =
            Url::parse(site_url).with_context(|| format!("Invalid site URL: {site_url}"))?;

        if home.cannot_be_a_base() || home.host_str().is_none() {
            return Err(anyhow!("Site URL must be absolute: {site_url}"));
        }

        // Relative joins must keep the site path, e.g. https://example.com/blog
        if !home.path().ends_with('/') {
            let path = format!("{}/", home.path());
            home.set_path(&path);
        }

        let login = home
            .join(login_path.trim_start_matches('/'))
            .with_context(|| format!("Invalid login path: {login_path}"))?;

        if login.path() == home.path() {
            return Err(anyhow!("Login path must not be the site home: {login_path}"));
        }

        if login.path().contains(ROUTE_PATTERN_CHARS) {
            return Err(anyhow!(
                "Login path must not contain any of {}: {login_path}",
                ROUTE_PATTERN_CHARS.iter().collect::<String>()
            ));
        }

        if !permalink_template.contains(PERMALINK_ID_PLACEHOLDER) {
            return Err(anyhow!(
                "Permalink template must contain {PERMALINK_ID_PLACEHOLDER}: {permalink_template}"
            ));
        }

        home.join(
            permalink_template
                .replace(PERMALINK_ID_PLACEHOLDER, "0")
                .trim_start_matches('/'),
        )
        .with_context(|| format!("Invalid permalink template: {permalink_template}"))?;

        Ok(Self {
            home,
            login,
            permalink_template: permalink_template.to_string(),
        })
    }

    #[must_use]
    pub fn home(&self) -> &Url {
        &self.home
    }

    #[must_use]
    pub fn login(&self) -> &Url {
        &self.login
    }

    #[must_use]
    pub fn permalink(&self, id: PostId) -> Url {
        let relative = self
            .permalink_template
            .replace(PERMALINK_ID_PLACEHOLDER, &id.to_string());

        self.home
            .join(relative.trim_start_matches('/'))
            .unwrap_or_else(|_| self.home.clone())
    }

    /// True when `url` points at the same scheme, host and port as the site.
    #[must_use]
    pub fn is_local(&self, url: &Url) -> bool {
        url.scheme() == self.home.scheme()
            && url.host_str() == self.home.host_str()
            && url.port_or_known_default() == self.home.port_or_known_default()
    }
}

#[derive(Debug)]
pub struct Resolver<S> {
    store: S,
    urls: SiteUrls,
}

impl<S: ContentStore> Resolver<S> {
    #[must_use]
    pub fn new(store: S, urls: SiteUrls) -> Self {
        Self { store, urls }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn urls(&self) -> &SiteUrls {
        &self.urls
    }

    /// Resolve `target` into a destination URL.
    #[instrument(skip(self))]
    pub async fn resolve(&self, target: TargetType) -> Url {
        match target {
            TargetType::RandomPost => match self.store.random_published().await {
                Ok(Some(id)) => {
                    debug!("selected published post {}", id);
                    self.urls.permalink(id)
                }
                Ok(None) => {
                    debug!("no published posts, falling back to home URL");
                    self.urls.home.clone()
                }
                Err(err) => {
                    warn!("content store query failed, falling back to home URL: {err:#}");
                    self.urls.home.clone()
                }
            },
            TargetType::Login => self.urls.login.clone(),
            TargetType::Home => self.urls.home.clone(),
        }
    }
}
