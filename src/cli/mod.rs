//! CLI module for the book catalog
//!
//! - `serve`: HTTP API server
//! - `seed`: insert the sample books

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

/// Book Catalog - book records enriched with Google Books metadata
#[derive(Parser)]
#[command(name = "book-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Insert the sample books that are not stored yet
    Seed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::try_parse_from(["book-catalog", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));

        let cli = Cli::try_parse_from(["book-catalog", "seed"]).unwrap();
        assert!(matches!(cli.command, Command::Seed));
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["book-catalog"]).is_err());
    }
}
