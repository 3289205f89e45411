use fourthdown_types::recommendation::Recommendation;

use crate::render::{render, RenderedRecommendation};

/// Three independently settable pieces of UI state.
///
/// A stale result stays visible while a new request is in flight and after a
/// failed one; only a newer success replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub last_result: Option<Recommendation>,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the error, never the result.
    pub fn begin_submit(&mut self) {
        self.in_flight = true;
        self.last_error = None;
    }

    pub fn resolve_success(&mut self, recommendation: Recommendation) {
        self.last_result = Some(recommendation);
        self.in_flight = false;
    }

    pub fn resolve_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.in_flight = false;
    }

    /// The submit control is disabled only while a request is in flight.
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    pub fn rendered(&self) -> Option<RenderedRecommendation> {
        self.last_result.as_ref().map(render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fourthdown_types::recommendation::{FourthDownAction, Uncertainty};

    fn recommendation(action: FourthDownAction, version: &str) -> Recommendation {
        Recommendation {
            recommended_action: action,
            delta_win_probability: 0.01,
            delta_expected_points: 0.5,
            alternatives: vec![],
            rationale: vec![],
            uncertainty: Uncertainty {
                standard_deviation: 0.0,
                method: "none".into(),
            },
            version: version.into(),
        }
    }

    #[test]
    fn submit_clears_error_but_keeps_result() {
        let mut state = DashboardState::new();
        state.resolve_success(recommendation(FourthDownAction::Punt, "v1"));
        state.resolve_failure("boom");

        state.begin_submit();
        assert!(state.in_flight);
        assert!(!state.can_submit());
        assert_eq!(state.last_error, None);
        assert_eq!(
            state.last_result.as_ref().map(|r| r.recommended_action),
            Some(FourthDownAction::Punt)
        );
    }

    #[test]
    fn failure_leaves_previous_result_visible() {
        let mut state = DashboardState::new();
        state.begin_submit();
        state.resolve_success(recommendation(FourthDownAction::Go, "v1"));
        state.begin_submit();
        state.resolve_failure("connection refused");

        assert!(!state.in_flight);
        assert_eq!(state.last_error.as_deref(), Some("connection refused"));
        assert_eq!(
            state.last_result,
            Some(recommendation(FourthDownAction::Go, "v1"))
        );
    }

    #[test]
    fn success_replaces_whole_result() {
        let mut state = DashboardState::new();
        state.resolve_success(recommendation(FourthDownAction::Go, "v1"));
        state.resolve_success(recommendation(FourthDownAction::Fg, "v2"));
        assert_eq!(
            state.last_result,
            Some(recommendation(FourthDownAction::Fg, "v2"))
        );
        assert!(state.can_submit());
    }

    #[test]
    fn nothing_rendered_before_first_result() {
        let mut state = DashboardState::new();
        assert!(state.rendered().is_none());
        state.resolve_failure("boom");
        assert!(state.rendered().is_none());
    }
}
