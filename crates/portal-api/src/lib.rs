//! # Portal API
//!
//! HTTP handlers, extractors and the router for the feedback portal.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
