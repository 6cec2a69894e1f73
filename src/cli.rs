use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nutrition-log", about = "Food catalog and food log service")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Apply pending migrations, then serve the HTTP API (default)
    Serve {
        /// Serve against the schema as it is, without applying migrations
        #[arg(long)]
        skip_migrations: bool,
    },
    /// Apply pending migrations and exit
    Migrate,
}

impl Cli {
    pub(crate) fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve {
            skip_migrations: false,
        })
    }
}
