use crate::{
    api::{handlers::escape_html, AppState},
    gate::{
        recovery::ACTION_PARAM,
        text::{gettext, DEFAULT_DOMAIN, LOST_PASSWORD_TEXT},
        Hooks, SiteUrls,
    },
};
use axum::{extract::State, response::Html};

#[utoipa::path(
    get,
    path = "/login",
    params(
        ("action" = Option<String>, Query, description = "Login action; lostpassword and retrievepassword are disabled"),
    ),
    responses(
        (status = 200, description = "Login form"),
        (status = 301, description = "Password recovery is disabled, redirect to a published post or the home URL"),
    ),
    tag = "login",
)]
/// Render the login form. Every string goes through `gettext`.
///
/// The form posts back to the login URL, which answers POST the same way as
/// GET; credentials are not checked here.
pub async fn login(State(state): State<AppState>) -> Html<String> {
    Html(render_login_form(&state.hooks, state.gate.resolver().urls()))
}

#[must_use]
pub fn render_login_form(hooks: &Hooks, urls: &SiteUrls) -> String {
    let t = |text: &str| escape_html(&gettext(hooks, text, DEFAULT_DOMAIN));

    let form_action = escape_html(urls.login().as_str());

    // An empty translation drops the whole link
    let lost_password = t(LOST_PASSWORD_TEXT);
    let nav = if lost_password.is_empty() {
        String::new()
    } else {
        let mut lost_password_url = urls.login().clone();
        lost_password_url
            .query_pairs_mut()
            .append_pair(ACTION_PARAM, "lostpassword");

        format!(
            "\n  <p id=\"nav\"><a href=\"{}\">{lost_password}</a></p>",
            escape_html(lost_password_url.as_str())
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body class="login">
  <form name="loginform" id="loginform" action="{form_action}" method="post">
    <p><label for="user_login">{username}</label>
    <input type="text" name="log" id="user_login" autocomplete="username"></p>
    <p><label for="user_pass">{password}</label>
    <input type="password" name="pwd" id="user_pass" autocomplete="current-password"></p>
    <p><label><input name="rememberme" type="checkbox" value="forever"> {remember}</label></p>
    <p><input type="submit" name="submit" id="submit" value="{log_in}"></p>
  </form>{nav}
  <p id="backtoblog"><a href="{home}">{back}</a></p>
</body>
</html>
"#,
        title = t("Log In"),
        username = t("Username or Email Address"),
        password = t("Password"),
        remember = t("Remember Me"),
        log_in = t("Log In"),
        home = escape_html(urls.home().as_str()),
        back = t("Go to site"),
    )
}
