//! Ledger draft model and the debounced aggregator that keeps it current.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, watch};

use super::grammar::{self, MonetaryToken};
use crate::config::EngineConfig;

/// The live, uncommitted multi-line text a user is editing, parsed into
/// monetary line items and a running total.
///
/// `total_sum` is always the pure, deterministic product of `raw_text` at
/// the moment it was last computed; it is never hand-mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDraft {
    /// The full multi-line buffer.
    pub raw_text: String,
    /// Non-empty lines of `raw_text`, in order.
    pub lines: Vec<String>,
    /// Amount tokens matched by the grammar, in order.
    pub matched_tokens: Vec<MonetaryToken>,
    /// Sum of all matched amounts; lei and ron add together undistinguished.
    pub total_sum: f64,
}

impl LedgerDraft {
    /// Parses `raw_text` in one pass.
    ///
    /// The grammar runs over the concatenation of all non-empty lines with
    /// no separator, so a token can span what were originally two lines.
    pub fn parse(raw_text: &str) -> Self {
        let lines: Vec<String> = raw_text
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let joined = lines.concat();
        let matched_tokens = grammar::scan(&joined);
        let total_sum = grammar::total(&matched_tokens);

        Self {
            raw_text: raw_text.to_string(),
            lines,
            matched_tokens,
            total_sum,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct DraftState {
    /// Bumped on every submit; a scheduled recompute that wakes to a newer
    /// generation returns without effect.
    generation: u64,
    /// Most recent submitted text, possibly not yet recomputed.
    latest_text: String,
    /// Result of the last completed recompute.
    computed: LedgerDraft,
}

/// Owns the current free-text draft and recomputes its parse under a
/// debounce window, shielding callers from per-keystroke recomputes.
///
/// `submit` never blocks and never parses inline; readers observe the last
/// completed recompute, which may lag the most recent submission. Recompute
/// results are observed in submission order and never go backward.
pub struct DraftAggregator {
    state: Arc<RwLock<DraftState>>,
    edits_tx: watch::Sender<u64>,
    // Keeps the channel's receiver count non-zero so `edits_tx.send` always
    // stores the value (a send with no receivers is dropped silently).
    _edits_rx: watch::Receiver<u64>,
    quiet_period: Duration,
}

impl DraftAggregator {
    pub fn new(quiet_period: Duration) -> Self {
        let (edits_tx, _edits_rx) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(DraftState {
                generation: 0,
                latest_text: String::new(),
                computed: LedgerDraft::default(),
            })),
            edits_tx,
            _edits_rx,
            quiet_period,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.draft_debounce())
    }

    /// Records a new draft version and schedules a recompute after the
    /// quiet period. A submission arriving during the quiet period restarts
    /// the window and discards the pending recompute, so at most one
    /// recompute executes per window and it always sees the newest text.
    pub async fn submit(&self, raw_text: impl Into<String>) {
        let raw_text = raw_text.into();

        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.latest_text = raw_text;
            state.generation
        };

        // Draft-edit notification; the validation pulse listens for the
        // first edit after its trigger.
        let _ = self.edits_tx.send(generation);

        let state = Arc::clone(&self.state);
        let quiet_period = self.quiet_period;
        tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;

            let mut state = state.write().await;
            if state.generation != generation {
                // A newer submission restarted the window.
                return;
            }
            state.computed = LedgerDraft::parse(&state.latest_text);
        });
    }

    /// The last completed recompute.
    pub async fn current_draft(&self) -> LedgerDraft {
        self.state.read().await.computed.clone()
    }

    /// Total of the last completed recompute.
    pub async fn current_total(&self) -> f64 {
        self.state.read().await.computed.total_sum
    }

    /// Matched tokens of the last completed recompute.
    pub async fn current_items(&self) -> Vec<MonetaryToken> {
        self.state.read().await.computed.matched_tokens.clone()
    }

    /// The most recent submitted text, ahead of any pending recompute.
    pub async fn latest_text(&self) -> String {
        self.state.read().await.latest_text.clone()
    }

    /// Subscribes to draft-edit notifications. Receivers see only edits
    /// that happen after subscription.
    pub fn subscribe_edits(&self) -> watch::Receiver<u64> {
        self.edits_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, advance, sleep};

    const QUIET: Duration = Duration::from_millis(300);

    async fn settle() {
        // Let the spawned recompute task get polled so it arms its timer at
        // the current (pre-advance) instant; otherwise, under paused time,
        // the debounce deadline would be measured from the post-advance clock.
        tokio::task::yield_now().await;
        // Past the quiet window, plus a tick for the task to run.
        advance(QUIET + Duration::from_millis(10)).await;
        sleep(Duration::from_millis(1)).await;
    }

    #[test]
    fn parse_splits_filters_and_totals() {
        let draft = LedgerDraft::parse("2.5 lei\ncoffee\n1,20 lei");
        assert_eq!(draft.lines, vec!["2.5 lei", "coffee", "1,20 lei"]);
        assert_eq!(draft.matched_tokens.len(), 2);
        assert!((draft.matched_tokens[0].amount - 2.5).abs() < 1e-9);
        assert!((draft.matched_tokens[1].amount - 1.2).abs() < 1e-9);
        assert!((draft.total_sum - 3.7).abs() < 1e-9);
    }

    #[test]
    fn parse_empty_text_is_empty_draft() {
        let draft = LedgerDraft::parse("");
        assert!(draft.is_empty());
        assert!(draft.matched_tokens.is_empty());
        assert_eq!(draft.total_sum, 0.0);
    }

    #[test]
    fn token_spans_line_concatenation() {
        // Non-empty lines are joined with no separator before matching, so
        // "12." and "50 lei" on adjacent lines splice into a single 12.5
        // token. Sharp edge, but it is the contract.
        let draft = LedgerDraft::parse("12.\n50 lei");
        assert_eq!(draft.matched_tokens.len(), 1);
        assert!((draft.matched_tokens[0].amount - 12.5).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn recompute_waits_for_the_quiet_window() {
        let aggregator = DraftAggregator::new(QUIET);
        aggregator.submit("4 lei").await;

        assert_eq!(aggregator.current_total().await, 0.0);

        settle().await;
        assert!((aggregator.current_total().await - 4.0).abs() < 1e-9);

        let items = aggregator.current_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].raw, "4 lei");
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_submissions_in_one_window_recompute_once() {
        let aggregator = DraftAggregator::new(QUIET);
        for _ in 0..5 {
            aggregator.submit("2.5 lei\ncoffee\n1,20 lei").await;
        }

        settle().await;

        let draft = aggregator.current_draft().await;
        assert!((draft.total_sum - 3.7).abs() < 1e-9);
        assert_eq!(draft, LedgerDraft::parse("2.5 lei\ncoffee\n1,20 lei"));
    }

    #[tokio::test(start_paused = true)]
    async fn intermediate_submission_is_never_observed() {
        let aggregator = DraftAggregator::new(QUIET);
        aggregator.submit("1 lei").await;

        // Inside the quiet window the first recompute is discarded.
        advance(Duration::from_millis(150)).await;
        aggregator.submit("2 lei").await;

        advance(Duration::from_millis(200)).await;
        sleep(Duration::from_millis(1)).await;
        // 350ms after the first submit, 200ms after the second: the first
        // timer would have fired by now were it still alive.
        assert_eq!(aggregator.current_total().await, 0.0);

        settle().await;
        assert!((aggregator.current_total().await - 2.0).abs() < 1e-9);
        assert_eq!(aggregator.current_draft().await.raw_text, "2 lei");
    }

    #[tokio::test(start_paused = true)]
    async fn latest_text_leads_the_recompute() {
        let aggregator = DraftAggregator::new(QUIET);
        aggregator.submit("9 ron").await;

        assert_eq!(aggregator.latest_text().await, "9 ron");
        assert_eq!(aggregator.current_draft().await.raw_text, "");
    }

    #[tokio::test(start_paused = true)]
    async fn edit_subscribers_see_only_later_edits() {
        let aggregator = DraftAggregator::new(QUIET);
        aggregator.submit("before").await;

        let mut edits = aggregator.subscribe_edits();
        assert!(!edits.has_changed().unwrap());

        aggregator.submit("after").await;
        assert!(edits.has_changed().unwrap());
    }
}
