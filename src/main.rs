//! Bloggy - a single-document markdown blog post generator with live preview.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod document;
mod embed;
mod logger;
mod serve;
mod template;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{Config, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Init { name } => {
            let root = name.clone().unwrap_or_else(|| std::path::PathBuf::from("."));
            cli::init::new_project(&root)
        }
        Commands::Build { build_args } => {
            let config = init_config(Config::load_or_default(&cli.config)?);
            let options = cli::build::BuildOptions::from_args(build_args);
            cli::build::generate(&build_args.input, &config, &options).map(|_| ())
        }
        Commands::Watch {
            build_args,
            port,
            no_server,
        } => {
            let _ = init_config(Config::load_or_default(&cli.config)?);
            watch::run(watch::WatchOptions {
                input: build_args.input.clone(),
                port: *port,
                no_server: *no_server,
                build: cli::build::BuildOptions::from_args(build_args),
            })
        }
    }
}
