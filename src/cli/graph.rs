// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Graph command - visualize workflow dependencies

use miette::Result;
use std::path::PathBuf;

use super::GraphFormat;
use crate::document::{Document, WorkflowGraph};

/// Run the graph command
pub async fn run(
    file: PathBuf,
    workflow: Option<String>,
    format: GraphFormat,
    _verbose: bool,
) -> Result<()> {
    if !file.exists() {
        return Err(miette::miette!(
            "Configuration file not found: {}\n\n\
             Run 'ciconf init' to write a starter pipeline.",
            file.display()
        ));
    }

    let document = Document::from_file(&file)
        .map_err(|e| miette::miette!("Failed to load configuration: {}", e))?;

    let workflows = match workflow {
        Some(name) => vec![document.workflow(&name)?],
        None => document.workflows()?,
    };

    if workflows.is_empty() {
        return Err(miette::miette!(
            "{} defines no workflows",
            file.display()
        ));
    }

    let mut rendered = Vec::with_capacity(workflows.len());
    for entry in &workflows {
        let graph = WorkflowGraph::build(entry)?;
        rendered.push(match format {
            GraphFormat::Text => graph.to_text()?,
            GraphFormat::Dot => graph.to_dot(),
            GraphFormat::Mermaid => graph.to_mermaid(),
        });
    }

    println!("{}", rendered.join("\n"));

    Ok(())
}
