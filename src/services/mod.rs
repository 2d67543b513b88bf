//! Gateway operations.
//!
//! Services hold the logic behind each endpoint, separated from HTTP
//! handlers: one remote call (or a short fixed sequence), one extracted
//! field, one failure sentinel.

pub mod identity_service;
pub mod payments_service;
