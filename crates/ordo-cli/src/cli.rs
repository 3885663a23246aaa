//! CLI argument definitions for Ordo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ordo",
    version,
    about = "Order dependency-bearing steps",
    long_about = "Ordo reads a plan of named steps, each declaring the capabilities it \
                  provides and requires, and prints an order in which every step runs \
                  after the steps it depends on."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a plan and print the execution order
    Plan {
        /// Path to the plan manifest
        file: PathBuf,
        /// Report missing requirements as warnings instead of failing
        #[arg(long)]
        warn_on_missing: bool,
        /// Show each step's direct dependencies
        #[arg(long)]
        tree: bool,
    },

    /// Check that a plan resolves without printing the order
    Check {
        /// Path to the plan manifest
        file: PathBuf,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
