//! User-service API library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! business logic) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
