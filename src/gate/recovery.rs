//! Password recovery gate.
//!
//! Requests naming a disabled action are answered with a permanent redirect
//! to the resolved target, so the recovery form is never rendered.

use crate::gate::{
    resolver::{ContentStore, Resolver, TargetType},
    sanitize::{sanitize_text_field, unslash},
};
use axum::http::StatusCode;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Hook fired before any login form is rendered.
pub const LOGIN_INIT: &str = "login_init";

/// Query parameter naming the requested login action.
pub const ACTION_PARAM: &str = "action";

pub const DISABLED_ACTIONS: [&str; 2] = ["lostpassword", "retrievepassword"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: Url,
    status: StatusCode,
}

impl Redirect {
    /// `301 Moved Permanently` to `location`.
    #[must_use]
    pub fn permanent(location: Url) -> Self {
        Self {
            location,
            status: StatusCode::MOVED_PERMANENTLY,
        }
    }

    #[must_use]
    pub fn location(&self) -> &Url {
        &self.location
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Continue the normal login lifecycle.
    NoOp,
    /// Stop processing and redirect.
    Redirect(Redirect),
}

/// True when the raw `action` value names a disabled action once sanitized.
#[must_use]
pub fn is_disabled_action(raw: &str) -> bool {
    let action = sanitize_text_field(&unslash(raw));
    DISABLED_ACTIONS.contains(&action.as_str())
}

#[derive(Debug)]
pub struct RecoveryGate<S> {
    resolver: Resolver<S>,
    target: TargetType,
}

impl<S: ContentStore> RecoveryGate<S> {
    /// Gate redirecting to a random published post.
    #[must_use]
    pub fn new(resolver: Resolver<S>) -> Self {
        Self {
            resolver,
            target: TargetType::default(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetType) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver<S> {
        &self.resolver
    }

    #[must_use]
    pub fn target(&self) -> TargetType {
        self.target
    }

    /// Decide what to do with a login request carrying `action`.
    ///
    /// An absent parameter or one that is not disabled is a no-op. A disabled
    /// action resolves the configured target and yields a permanent redirect.
    /// Targets outside the site are replaced by the home URL; the recovery
    /// form is never a destination.
    #[instrument(skip(self))]
    pub async fn handle_request(&self, action: Option<&str>) -> GateOutcome {
        let Some(raw) = action else {
            return GateOutcome::NoOp;
        };

        if !is_disabled_action(raw) {
            debug!("login action is allowed");
            return GateOutcome::NoOp;
        }

        let urls = self.resolver.urls();
        let resolved = self.resolver.resolve(self.target).await;

        let location = if urls.is_local(&resolved) {
            resolved
        } else {
            warn!("Refusing off-site redirect to {}, using home URL", resolved);
            urls.home().clone()
        };

        info!(
            redirect_target = %self.target,
            location = %location,
            "password recovery is disabled, redirecting"
        );

        GateOutcome::Redirect(Redirect::permanent(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::resolver::{
        tests::{site_urls, FailingStore, FixedStore},
        PostId, SiteUrls,
    };

    fn gate(store: FixedStore) -> RecoveryGate<FixedStore> {
        RecoveryGate::new(Resolver::new(store, site_urls()))
    }

    fn expect_redirect(outcome: GateOutcome) -> Redirect {
        match outcome {
            GateOutcome::Redirect(redirect) => redirect,
            GateOutcome::NoOp => panic!("expected a redirect"),
        }
    }

    #[test]
    fn test_is_disabled_action() {
        assert!(is_disabled_action("lostpassword"));
        assert!(is_disabled_action("retrievepassword"));
        assert!(is_disabled_action(" lostpassword\n"));
        assert!(is_disabled_action(r"lost\password"));
        assert!(is_disabled_action("<b>retrievepassword</b>"));
        assert!(!is_disabled_action("LostPassword"));
        assert!(!is_disabled_action("login"));
        assert!(!is_disabled_action("rp"));
        assert!(!is_disabled_action(""));
    }

    #[tokio::test]
    async fn test_absent_action_is_noop() {
        assert_eq!(gate(FixedStore(Some(42))).handle_request(None).await, GateOutcome::NoOp);
    }

    #[tokio::test]
    async fn test_other_action_is_noop() {
        let gate = gate(FixedStore(Some(42)));
        assert_eq!(gate.handle_request(Some("some-other-action")).await, GateOutcome::NoOp);
        assert_eq!(gate.handle_request(Some("logout")).await, GateOutcome::NoOp);
        assert_eq!(gate.handle_request(Some("")).await, GateOutcome::NoOp);
    }

    #[tokio::test]
    async fn test_disabled_actions_redirect_permanently_to_random_post() {
        let gate = gate(FixedStore(Some(42)));
        let expected = site_urls().permalink(PostId::new(42));

        for action in DISABLED_ACTIONS {
            let redirect = expect_redirect(gate.handle_request(Some(action)).await);
            assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(redirect.location(), &expected);
        }
    }

    #[tokio::test]
    async fn test_redirect_without_posts_goes_home() {
        let redirect = expect_redirect(gate(FixedStore(None)).handle_request(Some("lostpassword")).await);
        assert_eq!(redirect.location(), site_urls().home());
    }

    #[tokio::test]
    async fn test_redirect_on_store_error_goes_home() {
        let gate = RecoveryGate::new(Resolver::new(FailingStore, site_urls()));
        let redirect = expect_redirect(gate.handle_request(Some("retrievepassword")).await);
        assert_eq!(redirect.location(), site_urls().home());
    }

    #[tokio::test]
    async fn test_configured_target() {
        let gate = gate(FixedStore(Some(42))).with_target(TargetType::Login);
        assert_eq!(gate.target(), TargetType::Login);

        let redirect = expect_redirect(gate.handle_request(Some("lostpassword")).await);
        assert_eq!(redirect.location(), site_urls().login());
    }

    #[tokio::test]
    async fn test_off_site_target_goes_home() {
        let urls =
            SiteUrls::new("https://example.com", "login", "https://evil.example/?p={id}").unwrap();
        let gate = RecoveryGate::new(Resolver::new(FixedStore(Some(1)), urls.clone()));

        let redirect = expect_redirect(gate.handle_request(Some("lostpassword")).await);
        assert_eq!(redirect.location(), urls.home());
    }
}
