pub mod logging;
pub mod site;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_DSN: &str = "dsn";
pub const ARG_PUBLISHED_POSTS: &str = "published-posts";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("recovery-gate")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("RECOVERY_GATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Database connection string of the content store")
                .long_help(
                    "Database connection string of the content store. Without it recovery requests are sent to the published posts given by --published-posts, or to the home URL.",
                )
                .env("RECOVERY_GATE_DSN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_PUBLISHED_POSTS)
                .long(ARG_PUBLISHED_POSTS)
                .help("Comma separated ids of published posts, used when no database is configured")
                .env("RECOVERY_GATE_PUBLISHED_POSTS")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(i64))
                .conflicts_with(ARG_DSN),
        );

    let command = site::with_args(command);
    logging::with_args(command)
}
