//! Submission driver tying the form, the decision client and the UI state
//! together.

pub mod render;
pub mod state;

use std::{collections::VecDeque, sync::Arc};

use fourthdown_client::RecommendationClient;
use fourthdown_types::{
    config::ApplyPolicy,
    events::{DashboardEvent, EventKind},
    form::{coerce, CoercionAnomaly, RawForm},
    recommendation::Recommendation,
    Result,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use render::{render, RenderedRecommendation};
pub use state::DashboardState;

pub const MAX_ACTIVITY_ENTRIES: usize = 120;

/// Outcome of one request, posted back to the UI task when it resolves.
#[derive(Debug)]
pub struct Completion {
    pub ticket: u64,
    pub outcome: Result<Recommendation>,
}

/// Receipt for a submission that has been handed to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: u64,
    pub anomalies: Vec<CoercionAnomaly>,
}

/// Owns `DashboardState` and is the only place it is mutated.
///
/// Each submission runs on its own task; nothing is cancelled or
/// deduplicated. Completions are applied in the order they resolve.
pub struct Dashboard<C>
where
    C: RecommendationClient + 'static,
{
    client: Arc<C>,
    state: DashboardState,
    policy: ApplyPolicy,
    last_ticket: u64,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    activity: VecDeque<DashboardEvent>,
}

impl<C> Dashboard<C>
where
    C: RecommendationClient + 'static,
{
    pub fn new(client: C, policy: ApplyPolicy) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            state: DashboardState::new(),
            policy,
            last_ticket: 0,
            completions_tx,
            completions_rx,
            activity: VecDeque::with_capacity(MAX_ACTIVITY_ENTRIES),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn policy(&self) -> ApplyPolicy {
        self.policy
    }

    /// Oldest first.
    pub fn activity(&self) -> impl DoubleEndedIterator<Item = &DashboardEvent> {
        self.activity.iter()
    }

    /// Coerce the form and dispatch a request. Must be called inside a tokio
    /// runtime. Overlapping submissions are allowed.
    pub fn submit(&mut self, form: &RawForm) -> Submission {
        let coerced = coerce(form);
        self.last_ticket += 1;
        let ticket = self.last_ticket;

        for anomaly in &coerced.anomalies {
            warn!(
                ticket,
                field = anomaly.field.name(),
                raw = %anomaly.raw,
                "non-numeric input sent as NaN"
            );
            self.record(DashboardEvent::new(
                EventKind::Anomaly,
                ticket,
                format!("{} = {:?} sent as NaN", anomaly.field.name(), anomaly.raw),
            ));
        }

        self.state.begin_submit();
        self.record(DashboardEvent::new(
            EventKind::Submitted,
            ticket,
            "request dispatched",
        ));
        info!(ticket, "submitting game state");

        let client = Arc::clone(&self.client);
        let tx = self.completions_tx.clone();
        let game_state = coerced.state;
        tokio::spawn(async move {
            let outcome = client.recommend(&game_state).await;
            // The receiver lives as long as the dashboard.
            let _ = tx.send(Completion { ticket, outcome });
        });

        Submission {
            ticket,
            anomalies: coerced.anomalies,
        }
    }

    /// Apply every completion that has already resolved. Returns how many
    /// were drained.
    pub fn poll_completions(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            drained += 1;
        }
        drained
    }

    /// Wait for the next completion to resolve and apply it.
    pub async fn next_completion(&mut self) -> Option<u64> {
        let completion = self.completions_rx.recv().await?;
        let ticket = completion.ticket;
        self.apply(completion);
        Some(ticket)
    }

    pub fn apply(&mut self, completion: Completion) {
        let Completion { ticket, outcome } = completion;

        if self.policy == ApplyPolicy::LatestSubmission && ticket < self.last_ticket {
            debug!(ticket, latest = self.last_ticket, "discarding superseded response");
            self.record(DashboardEvent::new(
                EventKind::Discarded,
                ticket,
                format!("superseded by #{}", self.last_ticket),
            ));
            return;
        }

        match outcome {
            Ok(recommendation) => {
                info!(
                    ticket,
                    action = %recommendation.recommended_action,
                    version = %recommendation.version,
                    "recommendation received"
                );
                self.record(DashboardEvent::new(
                    EventKind::Resolved,
                    ticket,
                    format!(
                        "{} ({})",
                        recommendation.recommended_action, recommendation.version
                    ),
                ));
                self.state.resolve_success(recommendation);
            }
            Err(err) => {
                let message = err.user_message();
                warn!(ticket, "recommendation failed: {message}");
                self.record(DashboardEvent::new(EventKind::Failed, ticket, message.clone()));
                self.state.resolve_failure(message);
            }
        }
    }

    fn record(&mut self, event: DashboardEvent) {
        if self.activity.len() == MAX_ACTIVITY_ENTRIES {
            self.activity.pop_front();
        }
        self.activity.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use async_trait::async_trait;
    use fourthdown_types::{
        game::{GameState, NumericField},
        recommendation::{FourthDownAction, Uncertainty},
        FourthDownError,
    };
    use tokio::sync::oneshot;

    type Reply = Result<Recommendation>;

    /// Client whose responses are released by the test, keyed by the
    /// submitted `ydstogo` so resolution order is under test control.
    #[derive(Default)]
    struct ScriptedClient {
        replies: Mutex<HashMap<Option<i64>, oneshot::Receiver<Reply>>>,
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<GameState>>>,
    }

    impl ScriptedClient {
        fn script(&self, yards_to_go: i64) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.replies
                .lock()
                .unwrap()
                .insert(Some(yards_to_go), rx);
            tx
        }
    }

    #[async_trait]
    impl RecommendationClient for ScriptedClient {
        async fn recommend(&self, state: &GameState) -> Result<Recommendation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(*state);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .remove(&state.yards_to_go.value());
            match reply {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(FourthDownError::Request("reply dropped".into()))),
                None => Err(FourthDownError::Request("unscripted request".into())),
            }
        }
    }

    fn form(yards_to_go: &str) -> RawForm {
        let mut form = RawForm::with_defaults();
        form.set("ydstogo", yards_to_go);
        form
    }

    fn recommendation(action: FourthDownAction, version: &str) -> Recommendation {
        Recommendation {
            recommended_action: action,
            delta_win_probability: 0.034,
            delta_expected_points: 1.2,
            alternatives: vec![],
            rationale: vec!["short yardage".into()],
            uncertainty: Uncertainty {
                standard_deviation: 0.02,
                method: "bootstrap".into(),
            },
            version: version.into(),
        }
    }

    #[tokio::test]
    async fn successful_submission_updates_state() {
        let client = ScriptedClient::default();
        let reply = client.script(2);
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LastResolved);

        let submission = dashboard.submit(&form("2"));
        assert_eq!(submission.ticket, 1);
        assert!(submission.anomalies.is_empty());
        assert!(dashboard.state().in_flight);
        assert!(!dashboard.state().can_submit());

        reply
            .send(Ok(recommendation(FourthDownAction::Go, "v1")))
            .unwrap();
        assert_eq!(dashboard.next_completion().await, Some(1));

        let state = dashboard.state();
        assert!(!state.in_flight);
        assert_eq!(state.last_error, None);
        assert_eq!(
            state.rendered().map(|r| r.delta_wp),
            Some("Delta WP: 3.4%".to_string())
        );
    }

    #[tokio::test]
    async fn last_response_to_resolve_wins() {
        let client = ScriptedClient::default();
        let first_reply = client.script(1);
        let second_reply = client.script(2);
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LastResolved);

        let first = dashboard.submit(&form("1"));
        let second = dashboard.submit(&form("2"));

        second_reply
            .send(Ok(recommendation(FourthDownAction::Punt, "second")))
            .unwrap();
        assert_eq!(dashboard.next_completion().await, Some(second.ticket));

        first_reply
            .send(Ok(recommendation(FourthDownAction::Go, "first")))
            .unwrap();
        assert_eq!(dashboard.next_completion().await, Some(first.ticket));

        assert_eq!(
            dashboard.state().last_result,
            Some(recommendation(FourthDownAction::Go, "first"))
        );
    }

    #[tokio::test]
    async fn latest_submission_policy_discards_stale_response() {
        let client = ScriptedClient::default();
        let first_reply = client.script(1);
        let second_reply = client.script(2);
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LatestSubmission);
        assert_eq!(dashboard.policy(), ApplyPolicy::LatestSubmission);

        dashboard.submit(&form("1"));
        dashboard.submit(&form("2"));

        second_reply
            .send(Ok(recommendation(FourthDownAction::Punt, "second")))
            .unwrap();
        dashboard.next_completion().await;
        first_reply
            .send(Ok(recommendation(FourthDownAction::Go, "first")))
            .unwrap();
        dashboard.next_completion().await;

        assert_eq!(
            dashboard.state().last_result,
            Some(recommendation(FourthDownAction::Punt, "second"))
        );
        assert!(dashboard
            .activity()
            .any(|event| event.kind == EventKind::Discarded && event.ticket == 1));
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let client = ScriptedClient::default();
        let ok_reply = client.script(2);
        let failing_reply = client.script(5);
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LastResolved);

        dashboard.submit(&form("2"));
        ok_reply
            .send(Ok(recommendation(FourthDownAction::Fg, "v1")))
            .unwrap();
        dashboard.next_completion().await;

        dashboard.submit(&form("5"));
        failing_reply
            .send(Err(FourthDownError::Request("connection refused".into())))
            .unwrap();
        dashboard.next_completion().await;

        let state = dashboard.state();
        assert!(!state.in_flight);
        assert_eq!(state.last_error.as_deref(), Some("connection refused"));
        assert_eq!(
            state.last_result,
            Some(recommendation(FourthDownAction::Fg, "v1"))
        );
    }

    #[tokio::test]
    async fn identical_submissions_issue_independent_requests() {
        let client = ScriptedClient::default();
        let calls = Arc::clone(&client.calls);
        let seen = Arc::clone(&client.seen);
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LastResolved);

        // Nothing scripted for 9 yards: both requests fail fast.
        let first = dashboard.submit(&form("9"));
        let second = dashboard.submit(&form("9"));
        assert_ne!(first.ticket, second.ticket);

        dashboard.next_completion().await;
        dashboard.next_completion().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], seen[1]);
    }

    #[tokio::test]
    async fn non_numeric_input_is_still_sent() {
        let client = ScriptedClient::default();
        let seen = Arc::clone(&client.seen);
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LastResolved);

        let mut bad = form("3");
        bad.set("qtr", "");
        let submission = dashboard.submit(&bad);
        assert_eq!(submission.anomalies.len(), 1);

        dashboard.next_completion().await;
        assert_eq!(seen.lock().unwrap()[0].quarter, NumericField::NotANumber);
        assert!(dashboard
            .activity()
            .any(|event| event.kind == EventKind::Anomaly));
    }

    #[tokio::test]
    async fn poll_drains_resolved_completions() {
        let client = ScriptedClient::default();
        let mut dashboard = Dashboard::new(client, ApplyPolicy::LastResolved);
        assert_eq!(dashboard.poll_completions(), 0);

        dashboard.submit(&form("7"));
        // Let the unscripted request fail.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(dashboard.poll_completions(), 1);
        assert!(dashboard.state().last_error.is_some());
    }

    #[test]
    fn activity_log_is_bounded() {
        let mut dashboard = Dashboard::new(ScriptedClient::default(), ApplyPolicy::LastResolved);
        for ticket in 0..(MAX_ACTIVITY_ENTRIES as u64 + 10) {
            dashboard.apply(Completion {
                ticket,
                outcome: Err(FourthDownError::Request("boom".into())),
            });
        }
        assert_eq!(dashboard.activity().count(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(dashboard.activity().next().map(|e| e.ticket), Some(10));
    }
}
