use caphub::features::identity::DEFAULT_ITERATIONS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";

/// Terminal client for the Capabilities Hub.
#[derive(Debug, Parser)]
#[command(name = "caphub", version, about)]
pub struct Cli {
    /// Base URL of the Capabilities Hub server
    #[arg(short, long, global = true, env = "CAPHUB_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Where the session token is kept between invocations
    #[arg(long, global = true, env = "CAPHUB_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Log requests to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show every capability with its roster
    List,
    /// Sign in and remember the session
    Login {
        username: String,
        #[arg(long, env = "CAPHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Register a consultant (consultants get a pending request for themselves)
    Register { capability: String, email: String },
    /// Remove a consultant from a capability (practice leads only)
    Unregister { capability: String, email: String },
    /// List pending registration requests (practice leads only)
    Requests,
    /// Approve a pending registration request
    Approve { capability: String, email: String },
    /// Reject a pending registration request
    Reject { capability: String, email: String },
    /// Print a credentials-file hash for a password
    HashPassword {
        password: String,
        #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,
    },
}

impl Command {
    /// Whether the command changes rosters or requests on the server.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Register { .. } | Self::Unregister { .. } | Self::Approve { .. } | Self::Reject { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn capability_names_with_spaces_are_one_argument() {
        let cli = Cli::try_parse_from([
            "caphub",
            "--server",
            "http://hub:8000",
            "register",
            "UX/UI Design",
            "consultant.user@slalom.com",
        ])
        .unwrap();

        assert_eq!(cli.server, "http://hub:8000");
        let Command::Register { capability, email } = cli.command else { panic!("not register") };
        assert_eq!(capability, "UX/UI Design");
        assert_eq!(email, "consultant.user@slalom.com");
    }

    #[test]
    fn hash_password_defaults_the_iterations() {
        let cli = Cli::try_parse_from(["caphub", "hash-password", "secret"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::HashPassword { iterations: DEFAULT_ITERATIONS, .. }
        ));
        assert!(!cli.command.is_mutation());
    }
}
