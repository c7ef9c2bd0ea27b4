//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Bloggy markdown-to-HTML blog post generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: bloggy.toml)
    #[arg(short = 'C', long, global = true, default_value = "bloggy.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new project with a sample post, template and config
    #[command(visible_alias = "i")]
    Init {
        /// Project directory (defaults to the current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,
    },

    /// Generate HTML from a markdown document
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Watch the document, template and config; regenerate on change and
    /// serve a live-reloading preview
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Port number for the preview server
        #[arg(short, long)]
        port: Option<u16>,

        /// Watch and rebuild without starting the preview server
        #[arg(long)]
        no_server: bool,
    },
}

/// Shared build arguments for Build and Watch commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Markdown document to convert
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Skip lint checks on the document body
    #[arg(long)]
    pub no_validate: bool,

    /// Hide lint errors
    #[arg(long)]
    pub no_errors: bool,

    /// Hide lint warnings
    #[arg(long)]
    pub no_warns: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_parses_input() {
        let cli = Cli::parse_from(["bloggy", "build", "post.md"]);
        match cli.command {
            Commands::Build { build_args } => {
                assert_eq!(build_args.input, PathBuf::from("post.md"));
                assert!(!build_args.no_validate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_watch_flags() {
        let cli = Cli::parse_from([
            "bloggy",
            "watch",
            "post.md",
            "--port",
            "8080",
            "--no-server",
            "--no-validate",
        ]);
        match cli.command {
            Commands::Watch {
                build_args,
                port,
                no_server,
            } => {
                assert_eq!(port, Some(8080));
                assert!(no_server);
                assert!(build_args.no_validate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["bloggy", "build", "post.md", "-C", "custom.toml"]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_command_definition_is_consistent() {
        // Catches flag collisions (e.g. a short option clashing with the
        // auto-generated -V/--version) that clap only reports at build time.
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_long_only() {
        let cli = Cli::parse_from(["bloggy", "--verbose", "build", "post.md"]);
        assert!(cli.verbose);

        // -V stays reserved for --version
        let err = Cli::try_parse_from(["bloggy", "-V", "build", "post.md"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
