//! Request/response core of the interview administration tool.
//!
//! - [`backend`]: query encoding, the request dispatcher, per-table clients
//!   and the count estimator for the row-level-secured REST backend.
//! - [`summary`]: the summarization gateway served by the `interview-api`
//!   binary, plus the caller-side transport for it.

pub mod backend;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod summary;
