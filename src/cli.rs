use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jobboard", about = "Job postings HTTP service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Print a signed bearer token for local use
    Token {
        #[arg(long)]
        username: String,

        #[arg(long, default_value_t = false)]
        admin: bool,
    },
}
