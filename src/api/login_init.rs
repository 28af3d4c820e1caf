use crate::{
    api::AppState,
    gate::{recovery::LOGIN_INIT, Flow, LoginRequest, Redirect},
};
use axum::{
    extract::{Request, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Run the `login_init` actions before the login route.
///
/// Only the request's own query string is consulted. A halting action answers
/// the request; the wrapped handler is not called.
pub async fn login_init(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let login_request = LoginRequest::from_query(request.uri().query());

    match state.hooks.run_actions(LOGIN_INIT, &login_request).await {
        Flow::Continue => next.run(request).await,
        Flow::Halt(redirect) => redirect.into_response(),
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        match HeaderValue::from_str(self.location().as_str()) {
            Ok(location) => (self.status(), [(LOCATION, location)]).into_response(),
            Err(err) => {
                error!("Invalid redirect location {}: {}", self.location(), err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
