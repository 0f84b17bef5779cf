// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Validate command - check a configuration document

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::document::{Document, DocumentValidator};

/// Run the validate command
pub async fn run(file: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating configuration...".bold());
    println!();

    if !file.exists() {
        return Err(miette::miette!(
            "Configuration file not found: {}\n\n\
             Run 'ciconf init' to write a starter pipeline.",
            file.display()
        ));
    }

    let document = match Document::from_file(&file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("  {} Failed to parse configuration", "✗".red());
            eprintln!();
            return Err(miette::miette!("Parse error: {}", e));
        }
    };

    println!("  {} Configuration file is valid YAML", "✓".green());

    let validation = DocumentValidator::validate(&document);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if validation.has_warnings() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    if verbose {
        print_summary(&document);
    }

    println!();

    if !validation.is_valid() {
        Err(miette::miette!("Configuration validation failed"))
    } else if validation.has_warnings() {
        println!(
            "{}",
            "Configuration is valid but has warnings.".yellow().bold()
        );
        Ok(())
    } else {
        println!("{}", "Configuration is valid!".green().bold());
        Ok(())
    }
}

fn print_summary(document: &Document) {
    println!();
    println!("{}:", "Configuration summary".bold());
    println!(
        "  Version: {}",
        document.version().unwrap_or_else(|| "-".to_string())
    );

    if let Ok(workflows) = document.workflows() {
        println!("  Workflows: {}", workflows.len());
        for workflow in &workflows {
            let triggers = if workflow.triggers == 0 {
                String::new()
            } else {
                format!(" [triggers: {}]", workflow.triggers)
            };
            println!(
                "    - {} ({} jobs){}",
                workflow.name,
                workflow.jobs.len(),
                triggers.dimmed()
            );
        }
    }

    if let Ok(jobs) = document.jobs() {
        println!("  Jobs: {}", jobs.len());
        for job in &jobs {
            let steps = job
                .step_count()
                .map_or_else(|| "no steps".to_string(), |n| format!("{} steps", n));
            println!(
                "    - {} ({}, {})",
                job.name,
                job.executor().unwrap_or("no executor"),
                steps
            );
        }
    }
}
