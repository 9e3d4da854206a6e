//! State of a play page: which result view is shown, and which kinetics jobs still have
//! a live update channel open.
//!
//! A job is registered explicitly when it is submitted and torn down explicitly when it
//! completes, fails or is cancelled. Finished jobs leave a [`JobOutcome`] behind so the
//! page can still show their logs.
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("job '{0}' is already running")]
    DuplicateJob(String),
    #[error("job '{0}' is not running")]
    UnknownJob(String),
}

/// result view shown for every job tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewType {
    #[default]
    Info,
    Combined,
    Individual,
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewType::Info => "info",
            ViewType::Combined => "combined",
            ViewType::Individual => "individual",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Completed { temperature: f64 },
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub status: JobStatus,
    pub log: Vec<String>,
}

/// live update channel of one running job
#[derive(Debug, Clone, Default, PartialEq)]
struct JobListener {
    log: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlaySession {
    view: ViewType,
    listeners: HashMap<String, JobListener>,
    finished: HashMap<String, JobOutcome>,
}

impl PlaySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewType {
        self.view
    }

    pub fn set_view(&mut self, view: ViewType) {
        info!("view type changed to {}", view);
        self.view = view;
    }

    pub fn is_running(&self, job_id: &str) -> bool {
        self.listeners.contains_key(job_id)
    }

    pub fn running_jobs(&self) -> Vec<&str> {
        let mut jobs: Vec<&str> = self.listeners.keys().map(String::as_str).collect();
        jobs.sort_unstable();
        jobs
    }

    pub fn outcome(&self, job_id: &str) -> Option<&JobOutcome> {
        self.finished.get(job_id)
    }

    /// Opens the update channel of a new job; the page switches to the log view.
    pub fn submit_job(&mut self, job_id: &str) -> Result<(), SessionError> {
        if self.listeners.contains_key(job_id) {
            return Err(SessionError::DuplicateJob(job_id.to_string()));
        }
        self.listeners.insert(job_id.to_string(), JobListener::default());
        self.finished.remove(job_id);
        self.view = ViewType::Info;
        info!("job '{}' submitted", job_id);
        Ok(())
    }

    pub fn append_log(&mut self, job_id: &str, line: &str) -> Result<(), SessionError> {
        let listener = self
            .listeners
            .get_mut(job_id)
            .ok_or_else(|| SessionError::UnknownJob(job_id.to_string()))?;
        listener.log.push(line.to_string());
        Ok(())
    }

    /// Closes the channel of a finished job; plots are shown combined.
    pub fn complete_job(&mut self, job_id: &str, temperature: f64) -> Result<(), SessionError> {
        self.teardown(job_id, JobStatus::Completed { temperature })?;
        self.view = ViewType::Combined;
        Ok(())
    }

    pub fn fail_job(&mut self, job_id: &str) -> Result<(), SessionError> {
        warn!("job '{}' failed", job_id);
        self.teardown(job_id, JobStatus::Failed)
    }

    pub fn cancel_job(&mut self, job_id: &str) -> Result<(), SessionError> {
        self.teardown(job_id, JobStatus::Cancelled)
    }

    fn teardown(&mut self, job_id: &str, status: JobStatus) -> Result<(), SessionError> {
        let listener = self
            .listeners
            .remove(job_id)
            .ok_or_else(|| SessionError::UnknownJob(job_id.to_string()))?;
        info!("job '{}' closed: {:?}", job_id, status);
        self.finished.insert(
            job_id.to_string(),
            JobOutcome {
                status,
                log: listener.log,
            },
        );
        Ok(())
    }
}
