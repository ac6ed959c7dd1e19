//! Ports - Abstraction Layer
//!
//! This crate defines the interfaces the application layer needs from the
//! outside world. The only collaborator with real behavior is the agent
//! executor that performs one pipeline step.

pub mod agent_executor;

pub use crate::agent_executor::{AgentContext, AgentExecutor, AgentExecutorError};
