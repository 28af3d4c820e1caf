use crate::gate::resolver::{DEFAULT_LOGIN_PATH, DEFAULT_PERMALINK_TEMPLATE};
use clap::{Arg, ArgMatches, Command};

pub const ARG_SITE_URL: &str = "site-url";
pub const ARG_LOGIN_PATH: &str = "login-path";
pub const ARG_PERMALINK_TEMPLATE: &str = "permalink-template";
pub const ARG_REDIRECT_TARGET: &str = "redirect-target";

#[derive(Debug, Clone)]
pub struct Options {
    pub site_url: String,
    pub login_path: String,
    pub permalink_template: String,
    pub redirect_target: String,
}

impl Options {
    /// Parse site arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the site URL is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read = |id: &str| -> Option<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            site_url: read(ARG_SITE_URL)
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_SITE_URL}"))?,
            login_path: read(ARG_LOGIN_PATH).unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            permalink_template: read(ARG_PERMALINK_TEMPLATE)
                .unwrap_or_else(|| DEFAULT_PERMALINK_TEMPLATE.to_string()),
            redirect_target: read(ARG_REDIRECT_TARGET).unwrap_or_else(|| "RANDOM_POST".to_string()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SITE_URL)
                .short('s')
                .long(ARG_SITE_URL)
                .help("Public site URL, used as the home URL and as the base for every redirect")
                .env("RECOVERY_GATE_SITE_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_PATH)
                .long(ARG_LOGIN_PATH)
                .help("Path of the login form relative to the site URL")
                .default_value(DEFAULT_LOGIN_PATH)
                .env("RECOVERY_GATE_LOGIN_PATH"),
        )
        .arg(
            Arg::new(ARG_PERMALINK_TEMPLATE)
                .long(ARG_PERMALINK_TEMPLATE)
                .help("Permalink of a post relative to the site URL, {id} is replaced by the post id")
                .default_value(DEFAULT_PERMALINK_TEMPLATE)
                .env("RECOVERY_GATE_PERMALINK_TEMPLATE"),
        )
        .arg(
            Arg::new(ARG_REDIRECT_TARGET)
                .long(ARG_REDIRECT_TARGET)
                .help("Where recovery requests go: RANDOM_POST, LOGIN, anything else means the home URL")
                .default_value("RANDOM_POST")
                .env("RECOVERY_GATE_REDIRECT_TARGET"),
        )
}
