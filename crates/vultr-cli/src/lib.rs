//! # Vultr CLI
//!
//! Command-line interface for managing Vultr servers.
//! This crate provides the CLI structure, argument parsing, and command routing.

pub mod commands;
pub mod config;
pub mod display;

// Re-export common types
pub use config::Config;

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Application-level errors for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("API error: {0}")]
    Api(#[from] vultr_api::ApiError),

    #[error("Utils error: {0}")]
    Utils(#[from] vultr_utils::UtilsError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Other(format!("Input error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Main CLI struct
#[derive(Parser)]
#[command(name = "vultr")]
#[command(about = "A CLI tool for managing Vultr servers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// All available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Server management
    Server {
        #[command(subcommand)]
        action: ServerCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// List servers
    List {
        /// Only servers carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Only running servers
        #[arg(long, conflicts_with = "tag")]
        running: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one server
    Show {
        /// SUBID or label
        target: String,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Create a new server
    Create(commands::server::CreateArgs),
    /// Change a server's label
    Rename {
        /// Server SUBID
        id: String,
        /// New label
        name: String,
    },
    /// Power on a server
    Start {
        /// Server SUBID
        id: String,
    },
    /// Power off a server
    Halt {
        /// Server SUBID
        id: String,
    },
    /// Reboot a server
    Reboot {
        /// Server SUBID
        id: String,
    },
    /// Reinstall the operating system (wipes the disk)
    Reinstall {
        /// Server SUBID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Destroy a server
    Delete {
        /// Server SUBID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Switch a server to another operating system
    OsChange {
        /// Server SUBID
        id: String,
        /// Target OSID (see `os-list`)
        os_id: i64,
    },
    /// List the operating systems a server can switch to
    OsList {
        /// Server SUBID
        id: String,
    },
    /// Attach an ISO image
    IsoAttach {
        /// Server SUBID
        id: String,
        /// ISOID to mount
        iso_id: i64,
    },
    /// Detach the current ISO image
    IsoDetach {
        /// Server SUBID
        id: String,
    },
    /// Show the mounted ISO image
    IsoStatus {
        /// Server SUBID
        id: String,
    },
    /// Show daily bandwidth usage
    Bandwidth {
        /// Server SUBID
        id: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Get configuration value
    Get {
        /// Configuration key (api.api_key, api.base_url)
        key: String,
    },
    /// Set configuration value
    Set {
        /// Configuration key (api.api_key, api.base_url)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Remove configuration value
    Unset {
        /// Configuration key
        key: String,
    },
    /// Show configuration file path
    Path,
}

/// Main CLI runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::new()?;

    match cli.command {
        Commands::Server { action } => commands::server::handle(action, &config).await,
        Commands::Config { action } => commands::config::handle(action, &mut config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_server_list() {
        match parse(&["vultr", "server", "list", "--tag", "web", "--json"]).command {
            Commands::Server {
                action: ServerCommands::List { tag, running, json },
            } => {
                assert_eq!(tag.as_deref(), Some("web"));
                assert!(!running);
                assert!(json);
            }
            _ => panic!("expected server list"),
        }

        assert!(Cli::try_parse_from(["vultr", "server", "list", "--tag", "web", "--running"]).is_err());
    }

    #[test]
    fn test_parse_power_commands() {
        for name in ["start", "halt", "reboot"] {
            let cli = parse(&["vultr", "server", name, "576965"]);
            let id = match cli.command {
                Commands::Server {
                    action:
                        ServerCommands::Start { id } | ServerCommands::Halt { id } | ServerCommands::Reboot { id },
                } => id,
                _ => panic!("expected {}", name),
            };
            assert_eq!(id, "576965");
        }
    }

    #[test]
    fn test_parse_destructive_commands() {
        match parse(&["vultr", "server", "delete", "576965", "-y"]).command {
            Commands::Server {
                action: ServerCommands::Delete { id, yes },
            } => {
                assert_eq!(id, "576965");
                assert!(yes);
            }
            _ => panic!("expected server delete"),
        }

        match parse(&["vultr", "server", "reinstall", "576965"]).command {
            Commands::Server {
                action: ServerCommands::Reinstall { yes, .. },
            } => assert!(!yes),
            _ => panic!("expected server reinstall"),
        }
    }

    #[test]
    fn test_parse_os_and_iso_commands() {
        match parse(&["vultr", "server", "os-change", "576965", "127"]).command {
            Commands::Server {
                action: ServerCommands::OsChange { id, os_id },
            } => {
                assert_eq!(id, "576965");
                assert_eq!(os_id, 127);
            }
            _ => panic!("expected os-change"),
        }

        assert!(matches!(
            parse(&["vultr", "server", "iso-attach", "576965", "24"]).command,
            Commands::Server {
                action: ServerCommands::IsoAttach { iso_id: 24, .. }
            }
        ));
        assert!(Cli::try_parse_from(["vultr", "server", "iso-attach", "576965", "abc"]).is_err());
    }

    #[test]
    fn test_parse_config_commands() {
        match parse(&["vultr", "config", "set", "api.api_key", "KEY"]).command {
            Commands::Config {
                action: ConfigCommands::Set { key, value },
            } => {
                assert_eq!(key, "api.api_key");
                assert_eq!(value, "KEY");
            }
            _ => panic!("expected config set"),
        }

        assert!(matches!(
            parse(&["vultr", "config", "path"]).command,
            Commands::Config {
                action: ConfigCommands::Path
            }
        ));
    }
}
