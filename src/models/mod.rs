//! Request and response shapes exchanged with callers and the two providers.

/// Identity provider sessions, users and sign-in/up requests
pub mod identity;
/// Payments network customers, funding sources and transfers
pub mod payments;
