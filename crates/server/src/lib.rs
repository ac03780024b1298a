//! checkdecode server: HTTP API for decoding filled-in checklists.
//!
//! This crate wraps the decoding pipeline in an axum service. Users upload a
//! `.docx` checklist, the server extracts the ticked items, resolves each one
//! against the loaded reference data and answers with the decode result and
//! a Markdown report.
//!
//! # Features
//!
//! - **Decoding**: multipart upload, parsing on the blocking pool
//! - **Reference snapshots**: immutable index swapped atomically on reload
//! - **Middleware**: compression, CORS, request ID tracking, structured logging
//! - **Configuration**: optional `server.{toml,yaml,json}` plus `CHECKDECODE_SERVER__*`
//!   environment overrides
//! - **Metrics**: Prometheus exposition on `/metrics`
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe with reference summary
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//! - `POST /decode` - Decode an uploaded checklist (multipart field `file`)
//! - `POST /reference/reload` - Reload reference data from disk

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
