//! apichain - chained API scenario testing
//!
//! A scenario is a set of registered API request templates, an interaction
//! graph saying which response fields feed which requests, and a list of
//! test case inputs per API. The engine resolves each request against the
//! latest responses, sends it, and stores what came back.

pub mod cli;
pub mod commands;
pub mod common;
pub mod engine;
pub mod http;
pub mod project;
pub mod results;

// Re-export commonly used types for tests
pub use common::{CallFailure, Error, Result};
pub use engine::{resolve, RunReport, SequenceExecutor, WorkingGraph};
pub use http::{RawResponse, Transport};
pub use project::{Project, Scenario};
pub use results::{CapturedResponse, ResultStore};
