//! Cancellable validation pulse gating the save action.
//!
//! One pulse lives from a save trigger until it auto-clears or is
//! superseded by a later pulse or a draft edit. Consumers only ever observe
//! the newest pulse's transitions; a superseded pulse's timer must not fire
//! any further observable transition.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};

use super::draft::DraftAggregator;
use crate::config::EngineConfig;

/// Snapshot of the currently active pulse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseRecord {
    /// Generation id; later pulses carry larger ids.
    pub id: u64,
    pub triggered_at: DateTime<Utc>,
    /// Validation verdict fixed at trigger time.
    pub invalid: bool,
    /// Auto-clear deadline.
    pub live_until: DateTime<Utc>,
}

struct PulseState {
    generation: u64,
    active: Option<PulseRecord>,
}

/// Timer-driven `Idle -> Active -> Idle` machine around the save action.
///
/// Observable output is a boolean sequence on a watch channel: the
/// `invalid` verdict at trigger time, then `false` on auto-clear or
/// supersession. The last value wins as the current validation state.
pub struct ValidationPulse {
    state: Arc<Mutex<PulseState>>,
    output_tx: watch::Sender<bool>,
    // Keeps the channel's receiver count non-zero so `output_tx.send` always
    // stores the value (a send with no receivers is dropped silently).
    _output_rx: watch::Receiver<bool>,
    ttl: Duration,
}

impl ValidationPulse {
    pub fn new(ttl: Duration) -> Self {
        let (output_tx, _output_rx) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(PulseState {
                generation: 0,
                active: None,
            })),
            output_tx,
            _output_rx,
            ttl,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.validation_ttl())
    }

    /// Handles a save action: computes the verdict, emits a new pulse, and
    /// schedules its auto-clear.
    ///
    /// `invalid` is true when the latest submitted text has no non-empty
    /// lines or the last completed total is below 1. The line check reads
    /// the freshest text; the total may lag a pending recompute.
    ///
    /// Triggering immediately supersedes any still-active older pulse; its
    /// timer and edit listener are discarded without emitting.
    pub async fn trigger(&self, aggregator: &DraftAggregator) -> bool {
        let no_lines = !aggregator
            .latest_text()
            .await
            .split('\n')
            .any(|line| !line.is_empty());
        let invalid = no_lines || aggregator.current_total().await < 1.0;

        // Subscribed before the pulse goes live so the first edit strictly
        // after the trigger is the one that supersedes it.
        let mut edits = aggregator.subscribe_edits();

        let now = Utc::now();
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.active = Some(PulseRecord {
                id: state.generation,
                triggered_at: now,
                invalid,
                live_until: now
                    + chrono::Duration::from_std(self.ttl)
                        .unwrap_or_else(|_| chrono::Duration::zero()),
            });
            let _ = self.output_tx.send(invalid);
            state.generation
        };

        let state = Arc::clone(&self.state);
        let output_tx = self.output_tx.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(ttl) => {}
                _ = edits.changed() => {}
            }

            let mut state = state.lock().await;
            if state.generation != generation {
                // Superseded by a newer pulse; emit nothing.
                return;
            }
            state.active = None;
            let _ = output_tx.send(false);
        });

        invalid
    }

    /// Current validation state; last emitted value wins.
    pub fn current(&self) -> bool {
        *self.output_tx.borrow()
    }

    /// The active pulse, or `None` when idle.
    pub async fn active_pulse(&self) -> Option<PulseRecord> {
        self.state.lock().await.active.clone()
    }

    /// Subscribes to the pulse's boolean output sequence.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.output_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, advance, sleep};

    const TTL: Duration = Duration::from_millis(1000);
    const QUIET: Duration = Duration::from_millis(300);

    async fn tick() {
        sleep(Duration::from_millis(1)).await;
    }

    fn engine() -> (DraftAggregator, ValidationPulse) {
        // Default timings are the ones under test: 300ms quiet, 1000ms TTL.
        let config = EngineConfig::default();
        (
            DraftAggregator::from_config(&config),
            ValidationPulse::from_config(&config),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn empty_draft_triggers_invalid_then_auto_clears() {
        let (aggregator, pulse) = engine();

        assert!(pulse.trigger(&aggregator).await);
        assert!(pulse.current());
        assert!(pulse.active_pulse().await.is_some());

        // Let the auto-clear task arm its timer before the clock jumps.
        tokio::task::yield_now().await;
        advance(TTL + Duration::from_millis(10)).await;
        tick().await;

        assert!(!pulse.current());
        assert!(pulse.active_pulse().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn funded_draft_triggers_valid() {
        let (aggregator, pulse) = engine();
        aggregator.submit("2.5 lei").await;
        // Let the debounce task arm its timer before the clock jumps.
        tokio::task::yield_now().await;
        advance(QUIET + Duration::from_millis(10)).await;
        tick().await;

        assert!(!pulse.trigger(&aggregator).await);
    }

    #[tokio::test(start_paused = true)]
    async fn sub_unit_total_is_invalid() {
        let (aggregator, pulse) = engine();
        aggregator.submit(",20 lei").await;
        advance(QUIET + Duration::from_millis(10)).await;
        tick().await;

        // 0.2 < 1
        assert!(pulse.trigger(&aggregator).await);
    }

    #[tokio::test(start_paused = true)]
    async fn first_edit_after_trigger_supersedes_before_ttl() {
        let (aggregator, pulse) = engine();
        let mut output = pulse.subscribe();

        assert!(pulse.trigger(&aggregator).await);
        output.changed().await.unwrap();
        assert!(*output.borrow_and_update());

        advance(Duration::from_millis(100)).await;
        aggregator.submit("editing").await;
        tick().await;

        // Cleared well before the 1000ms deadline.
        output.changed().await.unwrap();
        assert!(!*output.borrow_and_update());
        assert!(pulse.active_pulse().await.is_none());

        // The original timer never fires: no further emission at the
        // deadline.
        advance(TTL).await;
        tick().await;
        assert!(!output.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn edits_before_the_trigger_are_irrelevant() {
        let (aggregator, pulse) = engine();
        aggregator.submit("4 lei").await;
        advance(QUIET + Duration::from_millis(10)).await;
        tick().await;

        pulse.trigger(&aggregator).await;
        tick().await;

        // Still active; only a post-trigger edit supersedes.
        assert!(pulse.active_pulse().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn new_trigger_silences_the_old_pulse() {
        let (aggregator, pulse) = engine();
        let mut output = pulse.subscribe();

        pulse.trigger(&aggregator).await;
        // Let the first pulse's timer arm at t=0 before the clock jumps.
        tokio::task::yield_now().await;
        advance(Duration::from_millis(500)).await;
        pulse.trigger(&aggregator).await;

        // Two trigger emissions observed so far.
        output.changed().await.unwrap();
        output.borrow_and_update();

        // Let the second pulse's timer arm at t=500 before the clock jumps.
        tokio::task::yield_now().await;
        // At t=1000 the first pulse's deadline passes; it was superseded,
        // so nothing is emitted until the second pulse clears at t=1500.
        advance(Duration::from_millis(510)).await;
        tick().await;
        assert!(pulse.active_pulse().await.is_some());
        assert!(!output.has_changed().unwrap());

        advance(Duration::from_millis(500)).await;
        tick().await;
        assert!(!pulse.current());
        assert!(pulse.active_pulse().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn pulse_record_carries_the_verdict_and_deadline() {
        let (aggregator, pulse) = engine();
        pulse.trigger(&aggregator).await;

        let record = pulse.active_pulse().await.unwrap();
        assert!(record.invalid);
        assert!(record.live_until > record.triggered_at);
    }
}
