//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to run, currently only the server.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{site, ARG_DSN, ARG_PORT, ARG_PUBLISHED_POSTS};
use anyhow::Result;
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .filter(|dsn| !dsn.trim().is_empty())
        .map(|dsn| SecretString::from(dsn.clone()));

    let published_posts = matches
        .get_many::<i64>(ARG_PUBLISHED_POSTS)
        .map(|ids| ids.copied().collect())
        .unwrap_or_default();

    let site_opts = site::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        published_posts,
        site_url: site_opts.site_url,
        login_path: site_opts.login_path,
        permalink_template: site_opts.permalink_template,
        redirect_target: site_opts.redirect_target,
    }))
}
