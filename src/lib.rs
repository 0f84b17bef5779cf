// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! # ciconf - CircleCI configuration builder
//!
//! `ciconf` composes CircleCI 2.0 pipeline configuration from immutable
//! builder values.
//!
//! ## Features
//!
//! - **Immutable builders** - every setter returns a new value
//! - **Typed executors** - Docker images, machine VMs and macOS hosts
//! - **Progressive caches** - fallback restore keys derived from one key
//! - **Inspection** - validate documents and graph workflow dependencies
//!
//! ## Quick Start
//!
//! ```no_run
//! use ciconf::{Config, Docker, Job, JobEdge, Workflow};
//!
//! # async fn write() -> ciconf::ConfigResult<()> {
//! let build = Job::new("build")
//!     .executor(Docker::with_image("circleci/node:latest"))
//!     .checkout()
//!     .run("yarn install");
//! let test = Job::new("test")
//!     .executor(Docker::with_image("circleci/node:latest"))
//!     .run("yarn test");
//!
//! let workflow = Workflow::new("build-and-test")
//!     .job(&build)
//!     .edge(JobEdge::new(&test).requires(&[&build]));
//!
//! Config::new().workflow(&workflow).write().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod document;
pub mod errors;
pub mod executors;
pub mod output;
pub mod pipeline;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigResult};
pub use executors::{Docker, Executor, MacOs, Machine, XcodeVersion};
pub use pipeline::{Config, Filter, Job, JobEdge, JobType, Patterns, RunConfig, Workflow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
