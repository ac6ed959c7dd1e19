//! In-memory job store
//!
//! Bounded, process-lifetime table of pipeline jobs shared by every
//! in-flight run. Records age out past a TTL; above the capacity limit the
//! oldest records by start time are dropped first. Eviction is invoked
//! lazily by the orchestrator at the start of each run, so there is no
//! background task to manage.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use scribe_core::{JobId, PipelineJob};

/// Retention limits for the store
#[derive(Debug, Clone)]
pub struct JobStoreConfig {
    /// Maximum age of a record before it is evicted.
    pub ttl: Duration,
    /// Maximum number of retained records.
    pub max_jobs: usize,
}

impl Default for JobStoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_jobs: 100,
        }
    }
}

/// In-memory job store
///
/// Lookups and eviction cannot fail; a `get` on an unknown id is `None`.
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, PipelineJob>>,
    config: JobStoreConfig,
}

impl InMemoryJobStore {
    pub fn new(config: JobStoreConfig) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Add or replace the record under its id.
    pub async fn insert(&self, job: PipelineJob) {
        self.jobs.write().await.insert(job.id.clone(), job);
    }

    /// Look up one record.
    pub async fn get(&self, id: &JobId) -> Option<PipelineJob> {
        self.jobs.read().await.get(id).cloned()
    }

    /// All retained records, most recently started first.
    pub async fn list_all(&self) -> Vec<PipelineJob> {
        let mut jobs: Vec<PipelineJob> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        jobs
    }

    /// Drop records older than the TTL, then the oldest records by start
    /// time while the store is at capacity, keeping a slot free for the run
    /// the caller is about to insert.
    ///
    /// Idempotent for a fixed `now`.
    pub async fn evict(&self, now: DateTime<Utc>) {
        let ttl = chrono::Duration::from_std(self.config.ttl).unwrap_or(chrono::Duration::MAX);

        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| now - job.started_at <= ttl);

        if jobs.len() >= self.config.max_jobs {
            let mut by_start: Vec<(JobId, DateTime<Utc>)> = jobs
                .iter()
                .map(|(id, job)| (id.clone(), job.started_at))
                .collect();
            by_start.sort_by_key(|(_, started_at)| *started_at);

            let excess = jobs.len() + 1 - self.config.max_jobs;
            for (id, _) in by_start.into_iter().take(excess) {
                jobs.remove(&id);
            }
        }

        let dropped = before - jobs.len();
        if dropped > 0 {
            debug!(dropped, retained = jobs.len(), "evicted pipeline jobs");
        }
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
