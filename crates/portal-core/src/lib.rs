//! # Portal Core
//!
//! Domain entities, services, and repository traits for the employee
//! feedback portal. The protocol and receipt generator lives in
//! [`services::protocol`] and [`services::receipt`].

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
