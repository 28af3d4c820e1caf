use crate::{
    api::{handlers::escape_html, AppState},
    gate::{
        text::{gettext, DEFAULT_DOMAIN},
        Hooks, SiteUrls,
    },
};
use axum::{extract::State, response::Html};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Site home page"),
    ),
    tag = "home",
)]
/// Render the home page, served at the path of the site URL.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    Html(render_home(&state.hooks, state.gate.resolver().urls()))
}

#[must_use]
pub fn render_home(hooks: &Hooks, urls: &SiteUrls) -> String {
    let t = |text: &str| escape_html(&gettext(hooks, text, DEFAULT_DOMAIN));

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body class="home">
  <h1><a href="{home}">{title}</a></h1>
  <p><a href="{login}">{log_in}</a></p>
</body>
</html>
"#,
        title = t("Home"),
        home = escape_html(urls.home().as_str()),
        login = escape_html(urls.login().as_str()),
        log_in = t("Log In"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_links_login_form() {
        let urls = SiteUrls::new("https://example.com/blog", "wp-login.php", "/?p={id}").unwrap();
        let html = render_home(&Hooks::new(), &urls);
        assert!(html.contains(r#"href="https://example.com/blog/wp-login.php""#));
        assert!(html.contains(">Log In<"));
    }

    #[test]
    fn test_home_strings_go_through_gettext() {
        let mut hooks = Hooks::new();
        hooks.add_text_filter("gettext", 10, |translation, text, _| {
            if text == "Home" {
                "Inicio".to_string()
            } else {
                translation.to_string()
            }
        });

        let urls = SiteUrls::new("https://example.com", "login", "/?p={id}").unwrap();
        let html = render_home(&hooks, &urls);
        assert!(html.contains("<title>Inicio</title>"));
    }
}
