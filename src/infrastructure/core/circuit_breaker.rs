use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::domain::errors::UpstreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Which provider tier a breaker guards, so a tripped breaker or inner
/// failure can be attributed to the right `UpstreamError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamTier {
    Primary,
    Secondary,
}

/// Protects a candle/ticker provider from hammering an upstream that's
/// already failing. Opens after `failure_threshold` consecutive failures,
/// probes again after `timeout`, and needs `success_threshold` consecutive
/// successes in `HalfOpen` before fully closing.
pub struct CircuitBreaker {
    state: Arc<RwLock<CircuitBreakerState>>,
    failure_threshold: usize,
    success_threshold: usize,
    timeout: Duration,
    name: String,
    tier: UpstreamTier,
}

struct CircuitBreakerState {
    state: CircuitState,
    failure_count: usize,
    success_count: usize,
    last_failure_time: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, tier: UpstreamTier, failure_threshold: usize, success_threshold: usize, timeout: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(CircuitBreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_time: None,
            })),
            failure_threshold,
            success_threshold,
            timeout,
            name: name.into(),
            tier,
        }
    }

    pub async fn call<F, T, E>(&self, f: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: std::future::Future<Output = Result<T, E>>,
    {
        {
            let mut state = self.state.write().await;
            if state.state == CircuitState::Open {
                if let Some(last_failure) = state.last_failure_time {
                    if last_failure.elapsed() > self.timeout {
                        info!(breaker = %self.name, "transitioning Open -> HalfOpen");
                        state.state = CircuitState::HalfOpen;
                        state.success_count = 0;
                    } else {
                        return Err(CircuitBreakerError::Open(format!(
                            "circuit breaker [{}] open, retry in {:?}",
                            self.name,
                            self.timeout - last_failure.elapsed()
                        )));
                    }
                }
            }
        }

        match f.await {
            Ok(result) => {
                self.on_success().await;
                Ok(result)
            }
            Err(e) => {
                self.on_failure().await;
                Err(CircuitBreakerError::Inner(e))
            }
        }
    }

    /// Runs `fut` under both the per-call deadline and breaker protection,
    /// translating a tripped breaker or inner failure into this crate's own
    /// `UpstreamError` taxonomy (attributed to `self.tier`) instead of a bare
    /// anyhow string, and folding the timeout bookkeeping in here so callers
    /// stop re-deriving it per provider.
    pub async fn call_upstream<F, T>(&self, symbol: &str, interval: &str, deadline: Duration, fut: F) -> anyhow::Result<T>
    where
        F: std::future::Future<Output = anyhow::Result<T>>,
    {
        let outcome = self
            .call(async move {
                match tokio::time::timeout(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("request exceeded {:?} deadline", deadline)),
                }
            })
            .await;

        outcome.map_err(|e| anyhow::Error::from(self.to_upstream_error(symbol, interval, e)))
    }

    fn to_upstream_error(&self, symbol: &str, interval: &str, err: CircuitBreakerError<anyhow::Error>) -> UpstreamError {
        let reason = match err {
            CircuitBreakerError::Open(msg) => msg,
            CircuitBreakerError::Inner(e) => e.to_string(),
        };
        match self.tier {
            UpstreamTier::Primary => UpstreamError::PrimaryFailed { symbol: symbol.to_string(), interval: interval.to_string(), reason },
            UpstreamTier::Secondary => UpstreamError::SecondaryFailed { symbol: symbol.to_string(), interval: interval.to_string(), reason },
        }
    }

    async fn on_success(&self) {
        let mut state = self.state.write().await;
        match state.state {
            CircuitState::HalfOpen => {
                state.success_count += 1;
                if state.success_count >= self.success_threshold {
                    info!(breaker = %self.name, "transitioning HalfOpen -> Closed");
                    state.state = CircuitState::Closed;
                    state.failure_count = 0;
                    state.success_count = 0;
                }
            }
            CircuitState::Closed => state.failure_count = 0,
            CircuitState::Open => warn!(breaker = %self.name, "success recorded while Open"),
        }
    }

    async fn on_failure(&self) {
        let mut state = self.state.write().await;
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());

        match state.state {
            CircuitState::Closed => {
                if state.failure_count >= self.failure_threshold {
                    error!(breaker = %self.name, failures = state.failure_count, "transitioning Closed -> Open");
                    state.state = CircuitState::Open;
                }
            }
            CircuitState::HalfOpen => {
                warn!(breaker = %self.name, "transitioning HalfOpen -> Open");
                state.state = CircuitState::Open;
                state.success_count = 0;
            }
            CircuitState::Open => {}
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.state.read().await.state
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    #[error("circuit breaker open: {0}")]
    Open(String),
    #[error(transparent)]
    Inner(E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_after_failure_threshold() {
        let cb = CircuitBreaker::new("test", UpstreamTier::Primary, 3, 2, Duration::from_secs(60));
        for _ in 0..3 {
            let _ = cb.call(async { Err::<(), &str>("boom") }).await;
        }
        assert_eq!(cb.state().await, CircuitState::Open);
        let result = cb.call(async { Ok::<(), &str>(()) }).await;
        assert!(matches!(result, Err(CircuitBreakerError::Open(_))));
    }

    #[tokio::test]
    async fn closes_after_recovery() {
        let cb = CircuitBreaker::new("test", UpstreamTier::Primary, 1, 1, Duration::from_millis(10));
        let _ = cb.call(async { Err::<(), &str>("boom") }).await;
        assert_eq!(cb.state().await, CircuitState::Open);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let _ = cb.call(async { Ok::<(), &str>(()) }).await;
        assert_eq!(cb.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn open_breaker_surfaces_as_primary_failed() {
        let cb = CircuitBreaker::new("kraken", UpstreamTier::Primary, 1, 1, Duration::from_secs(60));
        let _ = cb.call_upstream("BTCUSD", "1h", Duration::from_millis(50), async { Err::<(), anyhow::Error>(anyhow::anyhow!("boom")) }).await;
        let err = cb
            .call_upstream("BTCUSD", "1h", Duration::from_millis(50), async { Ok::<(), anyhow::Error>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<UpstreamError>(), Some(UpstreamError::PrimaryFailed { .. })));
    }

    #[tokio::test]
    async fn inner_failure_attributes_to_secondary() {
        let cb = CircuitBreaker::new("secondary", UpstreamTier::Secondary, 5, 2, Duration::from_secs(30));
        let err = cb
            .call_upstream("ETHUSD", "ticker", Duration::from_secs(5), async { Err::<(), anyhow::Error>(anyhow::anyhow!("connection reset")) })
            .await
            .unwrap_err();
        match err.downcast_ref::<UpstreamError>() {
            Some(UpstreamError::SecondaryFailed { symbol, interval, reason }) => {
                assert_eq!(symbol, "ETHUSD");
                assert_eq!(interval, "ticker");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("expected SecondaryFailed, got {other:?}"),
        }
    }
}
