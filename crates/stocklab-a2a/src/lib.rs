//! A2A (Agent-to-Agent) protocol client for stocklab
//!
//! Delegates stock analysis to a remote agent over JSON-RPC 2.0 on HTTP:
//! submit a task, poll it to a terminal state, extract and validate the
//! structured report.

pub mod client;
pub mod error;
pub mod extract;
pub mod poll;
pub mod protocol;
pub mod tool;

pub use client::{A2aClient, ClientOptions, ReportSchema};
pub use error::A2aError;
pub use poll::{Observation, PollState};
pub use protocol::{AgentCard, Task, TaskRequest, TaskState};
pub use tool::{StockAnalysisTool, ToolHandler};
