//! In-process adapters
//!
//! Concrete infrastructure for the orchestrator: the bounded in-memory job
//! store shared by all in-flight pipeline runs.

pub mod job_store;

pub use crate::job_store::{InMemoryJobStore, JobStoreConfig};
