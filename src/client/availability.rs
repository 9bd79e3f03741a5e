//! Debounced availability checking for booking forms
//!
//! The watcher checks availability 500 ms after the last input change.
//! Every input change bumps a generation counter and immediately resets the
//! state to `Checking`, so an answer for the previous inputs can no longer
//! enable booking. A response is only published if its generation is still
//! the latest, so a slow answer for an old date range never overwrites the
//! answer for the current one. Failed checks fail closed: the vehicle is
//! reported unavailable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::api::{ClientError, FlexCarsClient};
use crate::interfaces::http::modules::reservations::{AvailabilityDto, CheckAvailabilityRequest};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

const FAIL_CLOSED_MESSAGE: &str = "Unable to verify availability, please try again";

/// Anything that can answer an availability query
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn check(&self, request: &CheckAvailabilityRequest) -> Result<AvailabilityDto, ClientError>;
}

#[async_trait]
impl AvailabilitySource for FlexCarsClient {
    async fn check(&self, request: &CheckAvailabilityRequest) -> Result<AvailabilityDto, ClientError> {
        self.check_availability(request).await
    }
}

/// Form inputs that drive a check
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityInput {
    pub vehicle_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Set when editing an existing reservation
    pub exclude_reservation_id: Option<String>,
}

impl AvailabilityInput {
    fn to_request(&self) -> CheckAvailabilityRequest {
        CheckAvailabilityRequest {
            vehicle_id: self.vehicle_id.clone(),
            start_datetime: self.start,
            end_datetime: self.end,
            exclude_reservation_id: self.exclude_reservation_id.clone(),
        }
    }
}

/// Inputs tagged with the generation they were set under
#[derive(Debug, Clone, Default)]
struct Pending {
    generation: u64,
    input: Option<AvailabilityInput>,
}

#[derive(Debug, Clone)]
pub enum AvailabilityState {
    /// No complete input yet
    Idle,
    Checking { generation: u64 },
    Ready { generation: u64, result: AvailabilityDto },
}

impl AvailabilityState {
    /// Booking is only allowed on a positive answer
    pub fn can_book(&self) -> bool {
        matches!(self, AvailabilityState::Ready { result, .. } if result.is_available)
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            AvailabilityState::Idle => None,
            AvailabilityState::Checking { generation } | AvailabilityState::Ready { generation, .. } => {
                Some(*generation)
            }
        }
    }
}

pub struct AvailabilityWatcher {
    inputs: watch::Sender<Pending>,
    state: Arc<watch::Sender<AvailabilityState>>,
    results: watch::Receiver<AvailabilityState>,
    generation: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl AvailabilityWatcher {
    pub fn spawn(source: Arc<dyn AvailabilitySource>) -> Self {
        Self::with_debounce(source, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(source: Arc<dyn AvailabilitySource>, debounce: Duration) -> Self {
        let (inputs, input_rx) = watch::channel(Pending::default());
        let (result_tx, results) = watch::channel(AvailabilityState::Idle);
        let state = Arc::new(result_tx);
        let generation = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(run(
            source,
            input_rx,
            state.clone(),
            generation.clone(),
            debounce,
        ));

        Self {
            inputs,
            state,
            results,
            generation,
            task,
        }
    }

    /// Replace the inputs. Any check still in flight becomes stale and the
    /// state drops back to `Checking` until the new answer arrives.
    pub fn set_input(&self, input: AvailabilityInput) {
        let generation = self.publish(Some(input));
        self.reset_state(generation, AvailabilityState::Checking { generation });
    }

    pub fn clear(&self) {
        let generation = self.publish(None);
        self.reset_state(generation, AvailabilityState::Idle);
    }

    /// The counter is bumped under the channel lock so the input and its
    /// generation always travel together.
    fn publish(&self, input: Option<AvailabilityInput>) -> u64 {
        let mut generation = 0;
        self.inputs.send_modify(|pending| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *pending = Pending { generation, input };
        });
        generation
    }

    fn reset_state(&self, generation: u64, next: AvailabilityState) {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        });
    }

    pub fn current(&self) -> AvailabilityState {
        self.results.borrow().clone()
    }

    /// True only for a positive answer to the latest inputs
    pub fn can_book(&self) -> bool {
        let state = self.results.borrow();
        state.can_book() && state.generation() == Some(self.generation.load(Ordering::SeqCst))
    }

    pub fn subscribe(&self) -> watch::Receiver<AvailabilityState> {
        self.results.clone()
    }
}

impl Drop for AvailabilityWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    source: Arc<dyn AvailabilitySource>,
    mut inputs: watch::Receiver<Pending>,
    results: Arc<watch::Sender<AvailabilityState>>,
    generation: Arc<AtomicU64>,
    debounce: Duration,
) {
    loop {
        if inputs.changed().await.is_err() {
            return;
        }
        // restart the quiet period on every further change
        loop {
            tokio::select! {
                changed = inputs.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        let Pending {
            generation: current,
            input,
        } = inputs.borrow_and_update().clone();
        if generation.load(Ordering::SeqCst) != current {
            continue;
        }
        let Some(input) = input else {
            continue;
        };

        let source = source.clone();
        let results = results.clone();
        let generation = generation.clone();
        tokio::spawn(async move {
            let result = match source.check(&input.to_request()).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(vehicle_id = %input.vehicle_id, error = %e, "Availability check failed");
                    AvailabilityDto {
                        is_available: false,
                        conflicts: Vec::new(),
                        message: Some(FAIL_CLOSED_MESSAGE.to_string()),
                    }
                }
            };
            let published = results.send_if_modified(|state| {
                if generation.load(Ordering::SeqCst) != current {
                    return false;
                }
                *state = AvailabilityState::Ready {
                    generation: current,
                    result,
                };
                true
            });
            if !published {
                debug!(generation = current, "Dropped stale availability response");
            }
        });
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const DEBOUNCE: Duration = Duration::from_millis(40);

    /// Answers after a per-vehicle delay: vehicle "slow" is available,
    /// everything else is not.
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AvailabilitySource for FakeSource {
        async fn check(&self, request: &CheckAvailabilityRequest) -> Result<AvailabilityDto, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Transport("connection refused".into()));
            }
            let slow = request.vehicle_id == "slow";
            if slow {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            Ok(AvailabilityDto {
                is_available: slow,
                conflicts: Vec::new(),
                message: Some(request.vehicle_id.clone()),
            })
        }
    }

    fn input(vehicle: &str) -> AvailabilityInput {
        let start = Utc::now() + chrono::Duration::days(1);
        AvailabilityInput {
            vehicle_id: vehicle.to_string(),
            start,
            end: start + chrono::Duration::days(2),
            exclude_reservation_id: None,
        }
    }

    fn message(state: &AvailabilityState) -> Option<String> {
        match state {
            AvailabilityState::Ready { result, .. } => result.message.clone(),
            _ => None,
        }
    }

    #[tokio::test]
    async fn rapid_changes_are_checked_once() {
        let source = Arc::new(FakeSource::default());
        let watcher = AvailabilityWatcher::with_debounce(source.clone(), DEBOUNCE);

        watcher.set_input(input("a"));
        watcher.set_input(input("b"));
        watcher.set_input(input("c"));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(message(&watcher.current()).as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_one() {
        let source = Arc::new(FakeSource::default());
        let watcher = AvailabilityWatcher::with_debounce(source.clone(), DEBOUNCE);

        watcher.set_input(input("slow"));
        // let the slow check start
        tokio::time::sleep(Duration::from_millis(100)).await;
        watcher.set_input(input("fast"));
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        let state = watcher.current();
        assert_eq!(message(&state).as_deref(), Some("fast"));
        assert!(!state.can_book());
    }

    #[tokio::test]
    async fn new_inputs_revoke_previous_answer() {
        let source = Arc::new(FakeSource::default());
        let watcher = AvailabilityWatcher::with_debounce(source, DEBOUNCE);

        watcher.set_input(input("slow"));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(watcher.current().can_book());
        assert!(watcher.can_book());

        // still inside the debounce window for the new inputs
        watcher.set_input(input("fast"));
        assert!(matches!(watcher.current(), AvailabilityState::Checking { .. }));
        assert!(!watcher.can_book());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(message(&watcher.current()).as_deref(), Some("fast"));
        assert!(!watcher.can_book());
    }

    #[tokio::test]
    async fn transport_errors_fail_closed() {
        let source = Arc::new(FakeSource {
            fail: true,
            ..FakeSource::default()
        });
        let watcher = AvailabilityWatcher::with_debounce(source, DEBOUNCE);

        watcher.set_input(input("a"));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let state = watcher.current();
        assert!(!state.can_book());
        assert_eq!(message(&state).as_deref(), Some(FAIL_CLOSED_MESSAGE));
    }

    #[tokio::test]
    async fn clearing_inputs_returns_to_idle() {
        let source = Arc::new(FakeSource::default());
        let watcher = AvailabilityWatcher::with_debounce(source, DEBOUNCE);

        watcher.set_input(input("a"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        watcher.clear();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(matches!(watcher.current(), AvailabilityState::Idle));
    }
}
