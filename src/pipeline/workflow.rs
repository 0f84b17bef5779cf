// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Workflow builder
//!
//! A workflow orders jobs into a graph through `requires` edges and can be
//! triggered on a cron schedule. Jobs and schedules keep insertion order.

use serde_yaml::{Mapping, Value};

use super::filter::Filter;
use super::job::{Job, JobType};

/// A job's entry in a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEdge {
    job: Job,
    requires: Vec<String>,
    filter: Option<Filter>,
    job_type: Option<JobType>,
    context: Option<String>,
}

impl JobEdge {
    pub fn new(job: &Job) -> Self {
        Self {
            job: job.clone(),
            requires: Vec::new(),
            filter: None,
            job_type: None,
            context: None,
        }
    }

    /// Run only after `jobs` have succeeded
    ///
    /// Jobs are referenced by name and are not required to be part of the
    /// same workflow.
    pub fn requires(mut self, jobs: &[&Job]) -> Self {
        self.requires
            .extend(jobs.iter().map(|job| job.name().to_string()));
        self
    }

    pub fn filter(mut self, filter: &Filter) -> Self {
        self.filter = Some(filter.clone());
        self
    }

    /// Override the job type for this workflow only
    ///
    /// Prefer [`Job::job_type`]; setting both logs a deprecation warning.
    pub fn job_type(mut self, job_type: JobType) -> Self {
        self.job_type = Some(job_type);
        self
    }

    /// Name of the shared context whose secrets the job receives
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn required_names(&self) -> &[String] {
        &self.requires
    }

    fn effective_type(&self) -> Option<JobType> {
        self.job_type.or_else(|| self.job.declared_type())
    }

    fn compose(&self) -> Value {
        let job_type = self.effective_type();
        if self.requires.is_empty()
            && self.filter.is_none()
            && job_type.is_none()
            && self.context.is_none()
        {
            return Value::from(self.job.name());
        }

        let mut body = Mapping::new();
        if !self.requires.is_empty() {
            body.insert(Value::from("requires"), Value::from(self.requires.clone()));
        }
        if let Some(filter) = &self.filter {
            body.insert(Value::from("filters"), Value::Mapping(filter.compose()));
        }
        if let Some(job_type) = job_type {
            body.insert(Value::from("type"), Value::from(job_type.as_str()));
        }
        if let Some(context) = &self.context {
            body.insert(Value::from("context"), Value::from(context.as_str()));
        }

        let mut edge = Mapping::new();
        edge.insert(Value::from(self.job.name()), Value::Mapping(body));
        Value::Mapping(edge)
    }
}

/// A cron trigger for a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    cron: String,
    filter: Filter,
}

impl Schedule {
    pub fn cron(&self) -> &str {
        &self.cron
    }

    fn compose(&self) -> Value {
        let mut schedule = Mapping::new();
        schedule.insert(Value::from("cron"), Value::from(self.cron.as_str()));
        schedule.insert(Value::from("filters"), Value::Mapping(self.filter.compose()));

        let mut trigger = Mapping::new();
        trigger.insert(Value::from("schedule"), Value::Mapping(schedule));
        Value::Mapping(trigger)
    }
}

/// A named graph of jobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    name: String,
    edges: Vec<JobEdge>,
    schedules: Vec<Schedule>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edges: Vec::new(),
            schedules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self) -> &[JobEdge] {
        &self.edges
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Jobs in the order they were added
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.edges.iter().map(JobEdge::job)
    }

    /// Add a job with no dependencies or filters
    #[must_use]
    pub fn job(&self, job: &Job) -> Self {
        self.edge(JobEdge::new(job))
    }

    /// Add a configured job entry
    #[must_use]
    pub fn edge(&self, edge: JobEdge) -> Self {
        if edge.job_type.is_some() && edge.job.declared_type().is_some() {
            tracing::warn!(
                job = %edge.job.name(),
                "[Deprecated] Set the type on the job instead of on the workflow entry"
            );
        }

        let mut item = self.clone();
        item.edges.push(edge);
        item
    }

    /// Trigger the workflow on `cron` for the branches and tags in `filter`
    ///
    /// The cron expression is passed through unvalidated.
    #[must_use]
    pub fn schedule(&self, cron: impl Into<String>, filter: &Filter) -> Self {
        let mut item = self.clone();
        item.schedules.push(Schedule {
            cron: cron.into(),
            filter: filter.clone(),
        });
        item
    }

    /// Produce `{name: {triggers?, jobs}}`
    pub fn compose(&self) -> Mapping {
        let mut body = Mapping::new();
        if !self.schedules.is_empty() {
            let triggers = self.schedules.iter().map(Schedule::compose).collect();
            body.insert(Value::from("triggers"), Value::Sequence(triggers));
        }
        let jobs = self.edges.iter().map(JobEdge::compose).collect();
        body.insert(Value::from("jobs"), Value::Sequence(jobs));

        let mut fragment = Mapping::new();
        fragment.insert(Value::from(self.name.as_str()), Value::Mapping(body));
        fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(workflow: &Workflow) -> Value {
        workflow.compose()[workflow.name()].clone()
    }

    #[test]
    fn test_simple_workflow() {
        let workflow = Workflow::new("test-workflow").job(&Job::new("build"));
        let body = body(&workflow);

        assert_eq!(body["jobs"], Value::from(vec!["build"]));
        assert!(body.get("triggers").is_none());
    }

    #[test]
    fn test_requires_renders_names() {
        let required = Job::new("required-by-test-job").checkout();
        let job = Job::new("test-job");
        let workflow = Workflow::new("test-workflow")
            .edge(JobEdge::new(&job).requires(&[&required]));
        let jobs = body(&workflow)["jobs"].clone();

        assert_eq!(
            jobs[0]["test-job"]["requires"],
            Value::from(vec!["required-by-test-job"])
        );
    }

    #[test]
    fn test_dangling_requires_pass_through() {
        let ghost = Job::new("ghost");
        let workflow = Workflow::new("w").edge(JobEdge::new(&Job::new("real")).requires(&[&ghost]));
        assert_eq!(
            body(&workflow)["jobs"][0]["real"]["requires"],
            Value::from(vec!["ghost"])
        );
    }

    #[test]
    fn test_triggers() {
        let filter = Filter::new().only(["test-branch"]);
        let workflow = Workflow::new("test-workflow").schedule("* * * * *", &filter);
        let body = body(&workflow);
        let schedule = &body["triggers"][0]["schedule"];

        assert_eq!(schedule["cron"], Value::from("* * * * *"));
        assert_eq!(
            schedule["filters"]["branches"]["only"],
            Value::from(vec!["test-branch"])
        );
        assert_eq!(body["jobs"], Value::Sequence(vec![]));
    }

    #[test]
    fn test_malformed_cron_passes_through() {
        let workflow = Workflow::new("nightly").schedule("not a cron", &Filter::new());
        assert_eq!(
            body(&workflow)["triggers"][0]["schedule"]["cron"],
            Value::from("not a cron")
        );
    }

    #[test]
    fn test_edge_with_everything() {
        let build = Job::new("build");
        let hold = Job::new("hold");
        let workflow = Workflow::new("deploy").edge(
            JobEdge::new(&hold)
                .requires(&[&build])
                .filter(&Filter::new().only(["main"]))
                .job_type(JobType::Approval)
                .context("org-global"),
        );
        let edge = body(&workflow)["jobs"][0]["hold"].clone();
        let keys: Vec<&str> = edge
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();

        assert_eq!(keys, vec!["requires", "filters", "type", "context"]);
        assert_eq!(edge["type"], Value::from("approval"));
        assert_eq!(edge["context"], Value::from("org-global"));
    }

    #[test]
    fn test_job_type_on_job_renders_edge() {
        let hold = Job::new("hold").job_type(JobType::Approval);
        let workflow = Workflow::new("w").job(&hold);
        assert_eq!(
            body(&workflow)["jobs"][0]["hold"]["type"],
            Value::from("approval")
        );
    }

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base = Workflow::new("w").job(&Job::new("a"));
        let extended = base
            .job(&Job::new("b"))
            .schedule("0 0 * * *", &Filter::new());

        assert_eq!(base.edges().len(), 1);
        assert!(base.schedules().is_empty());
        assert_eq!(extended.edges().len(), 2);
        assert_eq!(extended.schedules()[0].cron(), "0 0 * * *");
    }

    #[test]
    fn test_job_order_preserved() {
        let workflow = ["c", "a", "b"]
            .iter()
            .fold(Workflow::new("w"), |w, name| w.job(&Job::new(*name)));
        let names: Vec<&str> = workflow.jobs().map(Job::name).collect();

        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(body(&workflow)["jobs"], Value::from(vec!["c", "a", "b"]));
    }
}
