//! The Circuit Breaker operator: trips open after consecutive
//! circuit-eligible failures and short-circuits calls until a cooldown
//! elapses.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::warn;

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::pipeline::{Stage, StageContext};
use crate::provider::ProviderResponse;

/// Configuration for [`CircuitBreaker`].
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    /// Consecutive circuit-eligible failures required to trip the breaker
    /// open.
    pub failure_threshold: u32,
    /// How long the breaker stays open before allowing a single
    /// half-open probe call through.
    pub open_duration: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_duration: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    Closed,
    Open,
    /// Cooldown has elapsed and exactly one probe call has been admitted;
    /// every other caller fails fast until that probe resolves.
    HalfOpenProbing,
}

struct Trip {
    state: BreakerState,
    opened_at: Option<Instant>,
}

/// Wraps an inner [`Stage`] with a Closed -> Open -> Half-Open state
/// machine. While Open, calls fail fast with
/// [`OrchestratorError::CircuitOpen`] without ever reaching `inner`. No
/// lock is held across the inner call -- state transitions only take the
/// lock briefly before and after.
pub struct CircuitBreaker<S> {
    inner: S,
    config: CircuitBreakerConfig,
    consecutive_failures: AtomicU32,
    trip: Mutex<Trip>,
}

impl<S: Stage> CircuitBreaker<S> {
    /// Wrap `inner` with the given breaker policy, starting Closed.
    pub fn new(inner: S, config: CircuitBreakerConfig) -> Self {
        Self {
            inner,
            config,
            consecutive_failures: AtomicU32::new(0),
            trip: Mutex::new(Trip {
                state: BreakerState::Closed,
                opened_at: None,
            }),
        }
    }

    /// `true` if the breaker is currently refusing calls.
    pub fn is_open(&self) -> bool {
        matches!(
            self.trip.lock().unwrap().state,
            BreakerState::Open | BreakerState::HalfOpenProbing
        )
    }

    /// Admits exactly one caller per Open -> Half-Open transition: the
    /// first call observed after the cooldown elapses flips the state to
    /// `HalfOpenProbing` and is let through; every other caller, including
    /// ones racing in on the same tick, sees `HalfOpenProbing` already set
    /// and fails fast until the probe resolves via `record_success` or
    /// `record_failure`.
    fn admit(&self) -> Result<(), ()> {
        let mut trip = self.trip.lock().unwrap();
        match trip.state {
            BreakerState::Closed => Ok(()),
            BreakerState::HalfOpenProbing => Err(()),
            BreakerState::Open => {
                let opened_at = trip.opened_at.expect("Open state always has opened_at");
                if opened_at.elapsed() >= self.config.open_duration {
                    trip.state = BreakerState::HalfOpenProbing;
                    Ok(())
                } else {
                    Err(())
                }
            }
        }
    }

    fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        let mut trip = self.trip.lock().unwrap();
        trip.state = BreakerState::Closed;
        trip.opened_at = None;
    }

    fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        let mut trip = self.trip.lock().unwrap();
        if trip.state == BreakerState::HalfOpenProbing {
            trip.state = BreakerState::Open;
            trip.opened_at = Some(Instant::now());
            warn!("circuit breaker probe failed, reopening");
            return;
        }
        if failures >= self.config.failure_threshold {
            trip.state = BreakerState::Open;
            trip.opened_at = Some(Instant::now());
            warn!(failures, "circuit breaker tripped open");
        }
    }
}

#[async_trait]
impl<S: Stage> Stage for CircuitBreaker<S> {
    type Error = S::Error;

    async fn call(
        &self,
        ctx: &StageContext<'_>,
        messages: &[Message],
        temperature: f32,
    ) -> Result<ProviderResponse, OrchestratorError<Self::Error>> {
        if self.admit().is_err() {
            return Err(OrchestratorError::CircuitOpen);
        }

        match self.inner.call(ctx, messages, temperature).await {
            Ok(resp) => {
                self.record_success();
                Ok(resp)
            }
            Err(e) => {
                if e.is_circuit_eligible() {
                    self.record_failure();
                }
                Err(e)
            }
        }
    }
}
