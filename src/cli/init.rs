// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Init command - write a starter pipeline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::ConfigResult;
use crate::executors::{Docker, Executor};
use crate::pipeline::{Config, Job, JobEdge, Workflow};

const DEPENDENCY_CACHE: &str = r#"v1-deps-{{ checksum "yarn.lock" }}"#;
const REPOSITORY_CACHE: &str = "v1-repo-{{ .Revision }}";
const NODE_IMAGE: &str = "circleci/node:latest";

/// Build the starter pipeline: `build` installs dependencies and caches the
/// checkout, `test` and `lint` restore it and run in parallel.
pub fn starter_config() -> ConfigResult<Config> {
    let exec = Arc::new(Executor::from(Docker::with_image(NODE_IMAGE)));

    let build = Job::new("build")
        .shared_executor(&exec)
        .checkout()
        .progressive_restore_cache(DEPENDENCY_CACHE, None)?
        .run("yarn install --frozen-lockfile")
        .save_cache(REPOSITORY_CACHE, ["~/project"])
        .save_cache(DEPENDENCY_CACHE, ["~/project/node_modules"]);

    let test = Job::new("test")
        .shared_executor(&exec)
        .restore_cache(REPOSITORY_CACHE)
        .run("yarn jest");

    let lint = Job::new("lint")
        .shared_executor(&exec)
        .restore_cache(REPOSITORY_CACHE)
        .run("yarn lint");

    let workflow = Workflow::new("build-and-test")
        .job(&build)
        .edge(JobEdge::new(&test).requires(&[&build]))
        .edge(JobEdge::new(&lint).requires(&[&build]));

    Ok(Config::new().workflow(&workflow))
}

/// Run the init command
pub async fn run(output: PathBuf, force: bool, verbose: bool) -> Result<()> {
    println!("{}", "Writing starter pipeline...".bold());
    println!();

    if output.exists() && !force {
        return Err(miette::miette!(
            "{} already exists. Use --force to overwrite.",
            output.display()
        ));
    }

    let config = starter_config()?.output_location(&output);
    let written = config.write().await?;

    println!("  {} Created {}", "✓".green(), output.display());

    if verbose {
        println!();
        println!("{}:", "Pipeline summary".bold());
        for workflow in config.workflows() {
            println!("  Workflow: {}", workflow.name());
            for edge in workflow.edges() {
                let deps = if edge.required_names().is_empty() {
                    String::new()
                } else {
                    format!(" [requires: {}]", edge.required_names().join(", "))
                };
                println!(
                    "    - {} ({} steps){}",
                    edge.job().name(),
                    edge.job().steps().len(),
                    deps.dimmed()
                );
            }
        }
        println!("  Path: {}", written.display());
    }

    println!();
    println!("{}", "Pipeline written!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Adjust the jobs to your project's commands");
    println!("  2. Run {} to check the document", "ciconf validate".cyan());
    println!("  3. Run {} to review job ordering", "ciconf graph".cyan());
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentValidator, WorkflowGraph};

    #[test]
    fn test_starter_config_is_valid() {
        let config = starter_config().unwrap();
        let document = Document::from_value(config.compose().unwrap()).unwrap();
        let result = DocumentValidator::validate(&document);

        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(!result.has_warnings(), "{:?}", result.warnings);
    }

    #[test]
    fn test_starter_config_shape() {
        let config = starter_config().unwrap();
        let document = Document::from_value(config.compose().unwrap()).unwrap();

        let names: Vec<String> = document.jobs().unwrap().into_iter().map(|j| j.name).collect();
        assert_eq!(names, vec!["build", "test", "lint"]);

        let workflow = document.workflow("build-and-test").unwrap();
        let graph = WorkflowGraph::build(&workflow).unwrap();
        assert!(graph.depends_on("lint", "build"));
        assert!(!graph.depends_on("lint", "test"));
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "existing").unwrap();

        assert!(run(path.clone(), false, false).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");

        run(path.clone(), true, false).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("build-and-test"));
    }
}
