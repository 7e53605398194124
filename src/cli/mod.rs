//! # CLI Module
//!
//! Command-line interface for the Link Archive service.
//!
//! ## Commands
//!
//! - `start`: Validate the environment and launch the web server
//! - `routes`: Print the route table in registration order, which is also
//!   the order requests are matched in
//! - `check-env`: Validate the environment variables and print the result
//! - `env-example`: Print an example `.env` file
//!
//! ## Usage Example
//!
//! ```bash
//! # Serve assets from ./public while working on them
//! LINKARCHIVE_ENV=development linkarchive start
//!
//! # Show which handler a path reaches first
//! linkarchive routes
//! ```

use clap::{Parser, Subcommand};
use std::process;

use crate::env::{generate_env_example, print_validation_results, validate_environment};
use crate::logging;
use crate::logging::errors::{ErrorContext, ErrorSeverity, log_error};
use crate::routing::create_route_table;
use crate::server;

///////////////////////////////////////////////////////////////////////////////
//****                        Private Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Parser)]
#[command(name = "linkarchive")]
#[command(about = "The Link Archive web service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

///////////////////////////////////////////////////////////////////////////////
//****                         Private Types                             ****//
///////////////////////////////////////////////////////////////////////////////

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the Link Archive web server
    #[command(name = "start")]
    Start,
    /// List the route table in match order
    #[command(name = "routes")]
    Routes,
    /// Validate environment variables and show the resulting configuration
    #[command(name = "check-env")]
    CheckEnv,
    /// Print an example environment file
    #[command(name = "env-example")]
    EnvExample,
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub async fn parse_cli_commands() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let config = match validate_environment() {
                Ok(config) => config,
                Err(errors) => {
                    print_validation_results(&Err(errors));
                    process::exit(1);
                }
            };

            logging::init_tracing(&config.log_level);

            if let Err(e) = server::start_server(config).await {
                log_error(
                    ErrorSeverity::Critical,
                    format!("Link Archive failed: {}", e),
                    &ErrorContext::new().with_field("command", "start"),
                    file!(),
                    line!(),
                );
                process::exit(1);
            }
        }
        Commands::Routes => match create_route_table() {
            Ok(table) => print!("{}", table),
            Err(e) => {
                eprintln!("Invalid route table: {}", e);
                process::exit(1);
            }
        },
        Commands::CheckEnv => {
            let result = validate_environment();
            print_validation_results(&result);
            if result.is_err() {
                process::exit(1);
            }
        }
        Commands::EnvExample => {
            print!("{}", generate_env_example());
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cases = [
            ("start", Commands::Start),
            ("routes", Commands::Routes),
            ("check-env", Commands::CheckEnv),
            ("env-example", Commands::EnvExample),
        ];

        for (arg, expected) in cases {
            let cli = Cli::try_parse_from(["linkarchive", arg]).unwrap();
            assert_eq!(cli.command, expected);
        }
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["linkarchive", "add-route"]).is_err());
        assert!(Cli::try_parse_from(["linkarchive"]).is_err());
    }
}
