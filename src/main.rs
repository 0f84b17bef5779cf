// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! ciconf - CircleCI configuration builder
//!
//! Write a starter pipeline, validate configuration documents and graph
//! workflow dependencies.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ciconf::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ciconf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    match cli.command {
        Commands::Init { output, force } => ciconf::cli::init::run(output, force, cli.verbose).await,
        Commands::Validate { file } => ciconf::cli::validate::run(file, cli.verbose).await,
        Commands::Graph {
            file,
            workflow,
            format,
        } => ciconf::cli::graph::run(file, workflow, format, cli.verbose).await,
    }
}
