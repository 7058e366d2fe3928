/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * pulse-tex CLI entry point.
 */

//! pulse-tex CLI - Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulse_compile::{BibEngine, LatexEngine, PulseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pulse-tex")]
#[command(version)]
#[command(about = "Compile LaTeX projects and map between source lines and PDF positions", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Root directory of per-project outputs (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    projects_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a project directory and publish its document
    Compile {
        /// Directory holding the project's sources
        dir: PathBuf,

        /// Project id (defaults to the directory name)
        #[arg(long)]
        id: Option<String>,

        /// Main file, relative to the project directory
        #[arg(long, default_value = pulse_compile::DEFAULT_MAIN_FILE)]
        main: String,

        /// TeX engine (tectonic, pdflatex, xelatex, lualatex)
        #[arg(long)]
        engine: Option<LatexEngine>,

        /// Bibliography resolver (biber, bibtex)
        #[arg(long)]
        bib: Option<BibEngine>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find where a source line ends up in the published document
    Forward {
        /// Project id
        project_id: String,

        /// Source line (1-based)
        #[arg(long)]
        line: u32,

        /// Source file shown in the editor
        #[arg(long)]
        file: Option<String>,

        /// Print the position as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the source line behind a position in the published document
    Reverse {
        /// Project id
        project_id: String,

        /// Page (1-based)
        #[arg(long)]
        page: u32,

        /// Horizontal position
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Vertical position
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },

    /// Summarize a SyncTeX file
    Inspect {
        /// Path to a `.synctex` or `.synctex.gz` file
        path: PathBuf,
    },

    /// List TeX engines and bibliography resolvers and where they resolve
    Tools,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_tex=info,pulse_compile=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config =
        PulseConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.projects_dir {
        config.projects_dir = dir;
    }

    match cli.command {
        Commands::Compile {
            dir,
            id,
            main,
            engine,
            bib,
            json,
        } => commands::compile::execute(
            &config,
            commands::compile::CompileArgs {
                dir,
                id,
                main,
                engine,
                bib,
                json,
            },
        ),
        Commands::Forward {
            project_id,
            line,
            file,
            json,
        } => commands::forward::execute(
            &config,
            commands::forward::ForwardArgs {
                project_id,
                line,
                file,
                json,
            },
        ),
        Commands::Reverse {
            project_id,
            page,
            x,
            y,
        } => commands::reverse::execute(
            &config,
            commands::reverse::ReverseArgs {
                project_id,
                page,
                x,
                y,
            },
        ),
        Commands::Inspect { path } => commands::inspect::execute(&path),
        Commands::Tools => commands::tools::execute(),
    }
}
