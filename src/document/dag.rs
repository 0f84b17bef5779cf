// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Workflow dependency graphs
//!
//! Builds a DAG from a workflow's `requires` edges to order jobs, detect
//! cycles and render the graph for humans.

use petgraph::algo::{has_path_connecting, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

use super::WorkflowEntry;
use crate::errors::{ConfigError, ConfigResult};

/// Dependency graph of one workflow's jobs
#[derive(Debug)]
pub struct WorkflowGraph {
    workflow: String,
    graph: DiGraph<String, ()>,
    name_to_index: HashMap<String, NodeIndex>,
    external: Vec<String>,
}

impl WorkflowGraph {
    /// Build the graph, failing if the `requires` edges form a cycle
    ///
    /// A required job that is not part of the workflow still becomes a
    /// node; it is reported by [`WorkflowGraph::external_jobs`].
    pub fn build(workflow: &WorkflowEntry) -> ConfigResult<Self> {
        let mut builder = Self {
            workflow: workflow.name.clone(),
            graph: DiGraph::new(),
            name_to_index: HashMap::new(),
            external: Vec::new(),
        };

        for edge in &workflow.jobs {
            builder.node(&edge.name);
        }

        for edge in &workflow.jobs {
            let job_node = builder.name_to_index[&edge.name];
            for required in &edge.requires {
                if !builder.name_to_index.contains_key(required) {
                    builder.external.push(required.clone());
                }
                let required_node = builder.node(required);
                if !builder.graph.contains_edge(required_node, job_node) {
                    builder.graph.add_edge(required_node, job_node, ());
                }
            }
        }

        builder.validate_acyclic()?;
        Ok(builder)
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(index) = self.name_to_index.get(name) {
            return *index;
        }
        let index = self.graph.add_node(name.to_string());
        self.name_to_index.insert(name.to_string(), index);
        index
    }

    fn validate_acyclic(&self) -> ConfigResult<()> {
        let cycle = tarjan_scc(&self.graph).into_iter().find(|component| {
            component.len() > 1 || self.graph.contains_edge(component[0], component[0])
        });

        match cycle {
            None => Ok(()),
            Some(mut component) => {
                component.sort();
                Err(ConfigError::CircularDependency {
                    workflow: self.workflow.clone(),
                    jobs: component
                        .into_iter()
                        .map(|node| self.graph[node].clone())
                        .collect(),
                })
            }
        }
    }

    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    /// Required jobs that the workflow itself never lists
    pub fn external_jobs(&self) -> &[String] {
        &self.external
    }

    /// Job names in an order that satisfies every `requires` edge
    pub fn topological_order(&self) -> ConfigResult<Vec<String>> {
        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|n| self.graph[n].clone()).collect())
            .map_err(|_| ConfigError::CircularDependency {
                workflow: self.workflow.clone(),
                jobs: Vec::new(),
            })
    }

    /// Jobs that must finish before `job` starts
    pub fn dependencies(&self, job: &str) -> Option<Vec<String>> {
        self.neighbors(job, Direction::Incoming)
    }

    /// Jobs waiting on `job`
    pub fn dependents(&self, job: &str) -> Option<Vec<String>> {
        self.neighbors(job, Direction::Outgoing)
    }

    fn neighbors(&self, job: &str, direction: Direction) -> Option<Vec<String>> {
        let node = self.name_to_index.get(job)?;
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(*node, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        Some(names)
    }

    /// Whether `job` requires `other`, directly or transitively
    pub fn depends_on(&self, job: &str, other: &str) -> bool {
        let (Some(job), Some(other)) = (self.name_to_index.get(job), self.name_to_index.get(other))
        else {
            return false;
        };
        job != other && has_path_connecting(&self.graph, *other, *job, None)
    }

    /// Numbered execution order with dependencies
    pub fn to_text(&self) -> ConfigResult<String> {
        let mut out = format!("{}\n", self.workflow);

        for (i, name) in self.topological_order()?.iter().enumerate() {
            out.push_str(&format!("  {}. {}", i + 1, name));

            let deps = self.dependencies(name).unwrap_or_default();
            if !deps.is_empty() {
                out.push_str(&format!(" [requires: {}]", deps.join(", ")));
            }
            if self.external.contains(name) {
                out.push_str(" (not in workflow)");
            }

            out.push('\n');
        }

        Ok(out)
    }

    /// Graphviz DOT rendering
    pub fn to_dot(&self) -> String {
        let mut out = format!("digraph \"{}\" {{\n", self.workflow);
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for node in self.graph.node_indices() {
            out.push_str(&format!("    \"{}\";\n", self.graph[node]));
        }
        for edge in self.graph.raw_edges() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                self.graph[edge.source()],
                self.graph[edge.target()]
            ));
        }

        out.push_str("}\n");
        out
    }

    /// Mermaid flowchart rendering
    ///
    /// Node ids are positional since job names may contain characters
    /// Mermaid does not accept in ids.
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph LR\n");

        for node in self.graph.node_indices() {
            out.push_str(&format!("    n{}[\"{}\"]\n", node.index(), self.graph[node]));
        }
        for edge in self.graph.raw_edges() {
            out.push_str(&format!(
                "    n{} --> n{}\n",
                edge.source().index(),
                edge.target().index()
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EdgeEntry;

    fn workflow(jobs: Vec<(&str, Vec<&str>)>) -> WorkflowEntry {
        WorkflowEntry {
            name: "test".into(),
            jobs: jobs
                .into_iter()
                .map(|(name, requires)| EdgeEntry {
                    name: name.into(),
                    requires: requires.into_iter().map(String::from).collect(),
                    job_type: None,
                })
                .collect(),
            triggers: 0,
        }
    }

    #[test]
    fn test_linear_graph() {
        let graph = WorkflowGraph::build(&workflow(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["b"]),
        ]))
        .unwrap();

        assert_eq!(graph.topological_order().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_graph() {
        let graph = WorkflowGraph::build(&workflow(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec!["b", "c"]),
        ]))
        .unwrap();
        let order = graph.topological_order().unwrap();

        assert_eq!(order[0], "a");
        assert_eq!(order[3], "d");
        assert_eq!(graph.dependencies("d").unwrap(), vec!["b", "c"]);
        assert_eq!(graph.dependents("a").unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn test_cycle_detection() {
        let result = WorkflowGraph::build(&workflow(vec![("a", vec!["b"]), ("b", vec!["a"])]));
        match result {
            Err(ConfigError::CircularDependency { workflow, jobs }) => {
                assert_eq!(workflow, "test");
                assert_eq!(jobs, vec!["a", "b"]);
            }
            other => panic!("Expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_self_requirement_is_a_cycle() {
        let result = WorkflowGraph::build(&workflow(vec![("a", vec!["a"])]));
        assert!(matches!(result, Err(ConfigError::CircularDependency { .. })));
    }

    #[test]
    fn test_external_requirement_becomes_node() {
        let graph = WorkflowGraph::build(&workflow(vec![("deploy", vec!["build"])])).unwrap();

        assert_eq!(graph.external_jobs(), ["build".to_string()]);
        assert!(graph.depends_on("deploy", "build"));
        assert!(graph.to_text().unwrap().contains("build (not in workflow)"));
    }

    #[test]
    fn test_depends_on() {
        let graph = WorkflowGraph::build(&workflow(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["b"]),
        ]))
        .unwrap();

        assert!(graph.depends_on("c", "a"));
        assert!(graph.depends_on("b", "a"));
        assert!(!graph.depends_on("a", "c"));
        assert!(!graph.depends_on("a", "a"));
        assert!(!graph.depends_on("a", "missing"));
    }

    #[test]
    fn test_renderings() {
        let graph = WorkflowGraph::build(&workflow(vec![
            ("build-app", vec![]),
            ("test", vec!["build-app"]),
        ]))
        .unwrap();

        let mermaid = graph.to_mermaid();
        assert!(mermaid.starts_with("graph LR\n"));
        assert!(mermaid.contains("n0[\"build-app\"]"));
        assert!(mermaid.contains("n0 --> n1"));

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph \"test\" {"));
        assert!(dot.contains("\"build-app\" -> \"test\";"));

        let text = graph.to_text().unwrap();
        assert_eq!(text, "test\n  1. build-app\n  2. test [requires: build-app]\n");
    }
}
