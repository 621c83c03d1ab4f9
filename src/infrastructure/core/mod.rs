pub mod circuit_breaker;
pub mod http_client;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerError, UpstreamTier};
pub use http_client::build_client;
