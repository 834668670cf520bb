use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_HOST, ENV_JWT_SECRET, ENV_PAGE_SIZE, ENV_PORT};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version, about = "Storefront catalog, reviews and orders API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable authentication (every request runs as a local admin)
    #[arg(long, global = true)]
    pub no_auth: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Secret used to sign and verify bearer tokens
    #[arg(long, global = true, env = ENV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Default number of products per listing page
    #[arg(long, global = true, env = ENV_PAGE_SIZE)]
    pub page_size: Option<u32>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Register a user (or refresh an existing one) and print a signed token
    Token {
        /// User ID placed in the token subject
        #[arg(long)]
        user_id: String,

        /// Display name stored for the user and shown on reviews
        #[arg(long)]
        name: String,

        /// Contact email stored for the user
        #[arg(long)]
        email: Option<String>,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub config: Option<PathBuf>,
    pub jwt_secret: Option<String>,
    pub page_size: Option<u32>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        no_auth: cli.no_auth,
        config: cli.config,
        jwt_secret: cli.jwt_secret,
        page_size: cli.page_size,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_token_subcommand() {
        let cli = Cli::try_parse_from([
            "storefront",
            "token",
            "--user-id",
            "u1",
            "--name",
            "Ada",
            "--admin",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Token {
                user_id,
                name,
                email,
                admin,
            }) => {
                assert_eq!(user_id, "u1");
                assert_eq!(name, "Ada");
                assert_eq!(email, None);
                assert!(admin);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["storefront", "start", "--port", "9000", "--no-auth"])
            .unwrap();
        assert_eq!(cli.port, Some(9000));
        assert!(cli.no_auth);
    }
}
