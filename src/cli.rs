use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "calcapi")]
#[command(about = "Calculator and user account HTTP service")]
pub struct Cli {
    /// Force debug logging regardless of RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the database tables
    InitDb,
    /// Drop the database tables
    DropDb,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["calcapi"]);
        assert!(!cli.verbose);
        assert!(matches!(
            cli.into_command(),
            Command::Serve {
                host: None,
                port: None
            }
        ));
    }

    #[test]
    fn parses_db_commands() {
        let cli = Cli::parse_from(["calcapi", "init-db"]);
        assert!(matches!(cli.into_command(), Command::InitDb));
        let cli = Cli::parse_from(["calcapi", "--verbose", "drop-db"]);
        assert!(cli.verbose);
        assert!(matches!(cli.into_command(), Command::DropDb));
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::parse_from(["calcapi", "serve", "--port", "9000"]);
        match cli.into_command() {
            Command::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
