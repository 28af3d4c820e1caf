//! # Recovery Gate
//!
//! `recovery-gate` fronts a site's login form and makes password recovery
//! unreachable:
//!
//! - The "Lost your password?" string is suppressed in the `default` text
//!   domain, so the login form renders without the recovery link.
//! - Requests to `/login?action=lostpassword` or `?action=retrievepassword`
//!   are answered with `301 Moved Permanently` to a random published post,
//!   falling back to the home URL when nothing is published.
//!
//! Both behaviors are registered on a small hook table ([`gate::Hooks`]) that
//! the HTTP pipeline in [`api`] drives for every request.

pub mod api;
pub mod cli;
pub mod gate;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
