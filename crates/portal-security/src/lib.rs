//! # Portal Security
//!
//! Password hashing, access tokens and the server-side session registry.

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
pub use session::{SessionContext, SessionStore};
