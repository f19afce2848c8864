// ABOUTME: Validator module - rate-limited phone line-type validation.
// ABOUTME: Batches lookups, paces them, and maps failures to error strings.

mod batch;
mod lookup;
mod rate_limiter;

pub use batch::{BatchValidator, ERROR_PREFIX, Pacing};
pub use lookup::*;
pub use rate_limiter::RateLimiter;
