// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use buildfs::HashFunction;
use clap::{Parser, Subcommand};

use cmd::commands;
use cmd::common::FsContext;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bfs")]
struct Cli {
    /// Host directory to use as the filesystem root
    #[arg(short, long, global = true, default_value = "/")]
    root: PathBuf,

    /// Digest function, MD5 or SHA1 (overrides BUILDFS_DIGEST_FUNCTION)
    #[arg(long, global = true, value_parser = parse_hash_function)]
    digest_function: Option<HashFunction>,

    /// Mount table consulted by fstype (overrides BUILDFS_MOUNT_TABLE)
    #[arg(long, global = true)]
    mount_table: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of a path
    Stat {
        /// Follow a final symlink
        #[arg(short = 'L', long)]
        dereference: bool,
        path: String,
    },
    /// List a directory
    Ls {
        /// Type entries through their symlinks
        #[arg(short = 'L', long)]
        dereference: bool,
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a path with every symlink expanded
    Realpath { path: String },
    /// Print the content digest of a file
    Digest { path: String },
    /// Print the type of the filesystem holding a path
    Fstype { path: String },
    /// Set owner permissions from an octal mode
    Chmod { mode: String, path: String },
    /// Create a hard link, or a symlink with -s
    Ln {
        #[arg(short, long)]
        symbolic: bool,
        original: String,
        link: String,
    },
}

fn parse_hash_function(value: &str) -> std::result::Result<HashFunction, String> {
    value.parse()
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}

fn main() -> Result<()> {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    let mut ctx = FsContext::new(cli.root, cli.digest_function);
    if let Some(mount_table) = cli.mount_table {
        ctx = ctx.with_mount_table(mount_table);
    }

    match cli.command {
        Commands::Stat { dereference, path } => {
            commands::stat::stat_command(&ctx, &path, dereference, print_line)
        }
        Commands::Ls { dereference, path } => {
            commands::ls::ls_command(&ctx, &path, dereference, print_line)
        }
        Commands::Realpath { path } => {
            commands::realpath::realpath_command(&ctx, &path, print_line)
        }
        Commands::Digest { path } => commands::digest::digest_command(&ctx, &path, print_line),
        Commands::Fstype { path } => commands::fstype::fstype_command(&ctx, &path, print_line),
        Commands::Chmod { mode, path } => commands::chmod::chmod_command(&ctx, &mode, &path),
        Commands::Ln {
            symbolic,
            original,
            link,
        } => commands::ln::ln_command(&ctx, &original, &link, symbolic),
    }
}
