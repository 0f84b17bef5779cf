// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for ciconf.

pub mod graph;
pub mod init;
pub mod validate;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::DEFAULT_OUTPUT_LOCATION;

/// CircleCI configuration builder
///
/// Write a starter pipeline, then check and inspect configuration documents.
#[derive(Parser, Debug)]
#[clap(
    name = "ciconf",
    version,
    about = "Compose, validate and inspect CircleCI pipeline configuration",
    long_about = None,
    after_help = "Examples:\n\
        ciconf init                          Write .circleci/config.yml\n\
        ciconf validate                      Check the configuration document\n\
        ciconf graph --format mermaid        Show workflow dependencies\n\n\
        See 'ciconf <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter build-and-test pipeline
    Init {
        /// Where to write the document
        #[clap(short, long, default_value = DEFAULT_OUTPUT_LOCATION)]
        output: PathBuf,

        /// Overwrite an existing document
        #[clap(short, long)]
        force: bool,
    },

    /// Validate a configuration document
    Validate {
        /// Document to validate
        #[clap(default_value = DEFAULT_OUTPUT_LOCATION)]
        file: PathBuf,
    },

    /// Show a workflow's job dependencies as a graph
    Graph {
        /// Document to read
        #[clap(default_value = DEFAULT_OUTPUT_LOCATION)]
        file: PathBuf,

        /// Workflow to render (defaults to every workflow)
        #[clap(short, long)]
        workflow: Option<String>,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = GraphFormat::Text)]
        format: GraphFormat,
    },
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}
