//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, session cookie)
//! 2. Calls one gateway operation
//! 3. Returns the extracted value, or the operation's failure sentinel

/// Liveness endpoint
pub mod health;
/// Sign-in, sign-up, current user and logout endpoints
pub mod identity;
/// Customer, funding source, authorization and transfer endpoints
pub mod payments;
