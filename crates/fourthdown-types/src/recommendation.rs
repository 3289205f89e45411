use std::fmt;

use serde::{Deserialize, Serialize};

/// The three mutually exclusive fourth-down choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FourthDownAction {
    Go,
    Punt,
    Fg,
}

impl FourthDownAction {
    pub fn as_str(self) -> &'static str {
        match self {
            FourthDownAction::Go => "GO",
            FourthDownAction::Punt => "PUNT",
            FourthDownAction::Fg => "FG",
        }
    }
}

impl fmt::Display for FourthDownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub action: String,
    #[serde(rename = "wp")]
    pub win_probability: f64,
    #[serde(rename = "ep")]
    pub expected_points: f64,
}

/// Spread of the service's estimate. Carried for forward compatibility; the
/// renderer ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uncertainty {
    #[serde(rename = "std")]
    pub standard_deviation: f64,
    pub method: String,
}

/// Decision service response for one `GameState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "recommendation")]
    pub recommended_action: FourthDownAction,
    /// Fractional: 0.034 means 3.4 percentage points.
    #[serde(rename = "delta_wp")]
    pub delta_win_probability: f64,
    #[serde(rename = "delta_ep")]
    pub delta_expected_points: f64,
    /// Server order is preserved.
    pub alternatives: Vec<Alternative>,
    pub rationale: Vec<String>,
    pub uncertainty: Uncertainty,
    pub version: String,
}
