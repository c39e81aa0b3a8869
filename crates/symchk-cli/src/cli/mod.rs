//! CLI for symchk.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use symchk_core::config::{self, DEFAULT_OUTPUT_DIRECTORY};
use symchk_core::resolver::Resolver;
use symchk_core::retrieve::SymbolStore;

use commands::{run_from_dir, run_from_metadata, run_from_pe};

/// Top-level CLI for symchk.
#[derive(Debug, Parser)]
#[command(name = "symchk")]
#[command(about = "Fetch debugging symbols for Windows PE images from symbol servers", long_about = None)]
pub struct Cli {
    /// Symbol cache directory (`<dir>/<file>/<id>/<file>`).
    #[arg(
        short = 'o',
        long,
        global = true,
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIRECTORY
    )]
    pub output_directory: PathBuf,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the symbols of a single executable.
    FromPe {
        /// PE image (.exe, .dll, .sys, ...).
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Fetch the symbols of every executable under a directory, recursively.
    FromDir {
        /// Root of the tree to scan.
        #[arg(short, long, value_name = "DIR")]
        dir: PathBuf,
    },

    /// Fetch symbols for a known identifier and file name.
    FromMetadata {
        /// Identifier: GUID+age (RSDS), timestamp+age (NB10) or timestamp+size.
        #[arg(short, long, value_name = "ID")]
        guid: String,

        /// Artifact name on the server, e.g. ntdll.pdb.
        #[arg(short, long, value_name = "NAME")]
        pdb: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let out = cli.output_directory;

        match cli.command {
            CliCommand::FromPe { file } => {
                let resolver = Resolver::from_config(&cfg);
                run_from_pe(&resolver, &file, &out);
            }
            CliCommand::FromDir { dir } => {
                let resolver = Resolver::from_config(&cfg);
                run_from_dir(resolver, &dir, &out, cfg.worker_count());
            }
            CliCommand::FromMetadata { guid, pdb } => {
                run_from_metadata(&SymbolStore::from_config(&cfg), &guid, &pdb, &out);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
