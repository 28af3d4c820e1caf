use crate::gate::hooks::Hooks;

/// Hook fired for every translatable string.
pub const GETTEXT: &str = "gettext";

/// Text domain of the host's own strings.
pub const DEFAULT_DOMAIN: &str = "default";

pub const LOST_PASSWORD_TEXT: &str = "Lost your password?";

/// Domains whose strings may be suppressed.
pub const ALLOWED_DOMAINS: [&str; 1] = [DEFAULT_DOMAIN];

/// Runs after suppressors registered at the default priority.
pub const SUPPRESSOR_PRIORITY: i32 = 20;

/// Remove the lost password text from the rendered output.
///
/// Returns an empty string when `domain` is allowed and `source_text` equals
/// [`LOST_PASSWORD_TEXT`] ignoring ASCII case; otherwise `translation` is
/// returned unchanged. The comparison is made against the untranslated text so
/// that localized sites are covered too.
#[must_use]
pub fn suppress(translation: &str, source_text: &str, domain: &str) -> String {
    if ALLOWED_DOMAINS.contains(&domain) && source_text.eq_ignore_ascii_case(LOST_PASSWORD_TEXT) {
        return String::new();
    }

    translation.to_string()
}

/// Translate `text` within `domain` and pass the result through the `gettext`
/// filters.
///
/// Only the identity catalog ships with the service, so the initial
/// translation is the source text itself.
#[must_use]
pub fn gettext(hooks: &Hooks, text: &str, domain: &str) -> String {
    hooks.apply_text_filters(GETTEXT, text, text, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_matching_text() {
        assert_eq!(suppress("x", "Lost your password?", "default"), "");
        assert_eq!(suppress("x", "LOST YOUR PASSWORD?", "default"), "");
        assert_eq!(suppress("¿Perdiste tu contraseña?", "lost your password?", "default"), "");
    }

    #[test]
    fn test_suppress_other_domain() {
        assert_eq!(suppress("x", "Lost your password?", "other-domain"), "x");
        assert_eq!(suppress("x", "Lost your password?", "Default"), "x");
        assert_eq!(suppress("x", "Lost your password?", ""), "x");
    }

    #[test]
    fn test_suppress_compares_source_text_only() {
        // The translation matching the phrase is irrelevant
        assert_eq!(
            suppress("Lost your password?", "Password", "default"),
            "Lost your password?"
        );
        assert_eq!(suppress("x", "Lost your password", "default"), "x");
        assert_eq!(suppress("x", " Lost your password?", "default"), "x");
    }

    #[test]
    fn test_suppress_idempotent() {
        let once = suppress("x", "Lost your password?", "default");
        assert_eq!(suppress(&once, "Lost your password?", "default"), once);

        let once = suppress("Log In", "Log In", "default");
        assert_eq!(suppress(&once, "Log In", "default"), "Log In");
    }

    #[test]
    fn test_gettext_without_filters_is_identity() {
        let hooks = Hooks::new();
        assert_eq!(gettext(&hooks, LOST_PASSWORD_TEXT, DEFAULT_DOMAIN), LOST_PASSWORD_TEXT);
    }

    #[test]
    fn test_gettext_with_suppressor() {
        let mut hooks = Hooks::new();
        hooks.add_text_filter(GETTEXT, SUPPRESSOR_PRIORITY, suppress);

        assert_eq!(gettext(&hooks, LOST_PASSWORD_TEXT, DEFAULT_DOMAIN), "");
        assert_eq!(gettext(&hooks, LOST_PASSWORD_TEXT, "theme"), LOST_PASSWORD_TEXT);
        assert_eq!(gettext(&hooks, "Log In", DEFAULT_DOMAIN), "Log In");
    }
}
