// Profile persistence: one normalized profile per user, keyed by email.
// Validation runs at the HTTP boundary; normalization runs on every write and read.

pub mod handlers;
pub mod normalize;
pub mod store;
pub mod validation;
