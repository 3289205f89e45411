//! Display strings for a recommendation.

use fourthdown_types::recommendation::{Alternative, Recommendation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecommendation {
    pub action: String,
    pub delta_wp: String,
    pub delta_ep: String,
    pub alternatives: Vec<String>,
    pub rationale: Vec<String>,
    pub version: String,
}

pub fn render(rec: &Recommendation) -> RenderedRecommendation {
    RenderedRecommendation {
        action: rec.recommended_action.to_string(),
        delta_wp: format!("Delta WP: {}", format_percent(rec.delta_win_probability)),
        delta_ep: format!("Delta EP: {}", format_points(rec.delta_expected_points)),
        alternatives: rec.alternatives.iter().map(render_alternative).collect(),
        rationale: rec.rationale.clone(),
        version: rec.version.clone(),
    }
}

pub fn render_alternative(alt: &Alternative) -> String {
    format!(
        "{}: WP {} · EP {}",
        alt.action,
        format_percent(alt.win_probability),
        format_points(alt.expected_points)
    )
}

/// Fraction to a one-decimal percentage: `0.034` -> `3.4%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", fixed(fraction * 100.0, 1))
}

pub fn format_points(points: f64) -> String {
    fixed(points, 2)
}

/// Ties round away from zero (`0.125` -> `0.13`); formatting only pads.
fn fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    format!("{rounded:.decimals$}")
}
