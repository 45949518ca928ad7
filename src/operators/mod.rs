//! Reliability operators: generic wrapper [`Stage`](crate::pipeline::Stage)s
//! that take an inner stage and return a new one with the same contract.
//!
//! Each operator is its own module; composition is nesting, e.g.
//! `Retry::new(Backoff::new(Terminal::new(provider), ..), ..)`.

pub mod backoff;
pub mod circuit_breaker;
pub mod debug;
pub mod error_handler;
pub mod fallback;
pub mod rate_limit;
pub mod retry;
pub mod timeout;

pub use backoff::{Backoff, BackoffConfig};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
pub use debug::Debug;
pub use error_handler::ErrorHandler;
pub use fallback::Fallback;
pub use rate_limit::{RateLimit, RateLimitConfig};
pub use retry::{Retry, RetryConfig};
pub use timeout::Timeout;
