use crate::{
    gate::{Hooks, RecoveryGate, SiteUrls},
    store::Store,
};
use anyhow::{anyhow, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, error, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;
mod login_init;

pub const HEALTH_PATH: &str = "/health";

/// Paths served regardless of the site configuration.
pub const RESERVED_PATHS: [&str; 1] = [HEALTH_PATH];

/// Shared request state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub hooks: Arc<Hooks>,
    pub gate: Arc<RecoveryGate<Store>>,
}

impl AppState {
    /// State with the default hooks registered around `gate`.
    #[must_use]
    pub fn new(gate: RecoveryGate<Store>) -> Self {
        let gate = Arc::new(gate);
        let hooks = Arc::new(Hooks::with_defaults(Arc::clone(&gate)));

        Self { hooks, gate }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health::health, handlers::home::home, handlers::login::login),
    components(schemas(handlers::health::Health)),
    tags(
        (name = "health", description = "Service health"),
        (name = "home", description = "Site home page, served at the path of --site-url"),
        (name = "login", description = "Login form with password recovery disabled. Documented at /login, served at the path given by --login-path relative to --site-url"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Check that the configured home and login paths can be routed next to the
/// reserved paths.
///
/// # Errors
/// Returns an error if the login or home path is one of [`RESERVED_PATHS`].
pub fn check_routes(urls: &SiteUrls) -> Result<()> {
    for path in [urls.login().path(), urls.home().path()] {
        if RESERVED_PATHS.contains(&path) {
            return Err(anyhow!("Path {path} is reserved, choose another --login-path"));
        }
    }

    Ok(())
}

/// Build the router.
///
/// The home page is served at the path of the site URL. The login route is
/// served at the path of the configured login URL and is wrapped by the
/// `login_init` middleware, which may answer the request before the form
/// handler runs.
///
/// # Errors
/// Returns an error if the configured paths collide with a reserved path.
pub fn router(state: AppState) -> Result<Router> {
    let urls = state.gate.resolver().urls();
    check_routes(urls)?;

    let home_path = urls.home().path().to_string();
    let login_path = urls.login().path().to_string();

    let login = Router::new()
        .route(
            &login_path,
            get(handlers::login::login).post(handlers::login::login),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_init::login_init,
        ));

    Ok(Router::new()
        .route(
            HEALTH_PATH,
            get(handlers::health::health).options(handlers::health::health),
        )
        .route(&home_path, get(handlers::home::home))
        .merge(login)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span)),
        )
        .with_state(state))
}

/// Serve the router until Ctrl-C or SIGTERM.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails
pub async fn new(port: u16, state: AppState) -> Result<()> {
    let app = router(state)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
