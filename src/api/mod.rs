//! Horarios API Server module
//!
//! HTTP endpoint the upload form posts workbooks to, plus read access to the
//! last parsed schedule. Run with `horarios-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
