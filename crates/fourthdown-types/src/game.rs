use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer form value that may have failed to parse.
///
/// A failed parse is not an error: the `NotANumber` sentinel travels into the
/// outbound request as the literal text `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericField {
    Value(i64),
    NotANumber,
}

impl NumericField {
    pub fn value(self) -> Option<i64> {
        match self {
            NumericField::Value(v) => Some(v),
            NumericField::NotANumber => None,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, NumericField::NotANumber)
    }
}

impl From<i64> for NumericField {
    fn from(value: i64) -> Self {
        NumericField::Value(value)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Value(v) => write!(f, "{v}"),
            NumericField::NotANumber => f.write_str("NaN"),
        }
    }
}

/// Fourth-down situation submitted to the decision service.
///
/// Range hints (down 1-4, yards to go 1-100, yardline 1-99, quarter 1-5,
/// timeouts 0-3) are not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub down: NumericField,
    pub yards_to_go: NumericField,
    /// Distance to the opponent's goal line.
    pub yardline_100: NumericField,
    pub time_remaining_seconds: NumericField,
    pub quarter: NumericField,
    /// Offense score minus defense score.
    pub score_differential: NumericField,
    pub offense_timeouts: NumericField,
    pub defense_timeouts: NumericField,
    pub is_home_team: bool,
}

impl GameState {
    /// Query parameters in wire order, values already rendered as text.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("down", self.down.to_string()),
            ("ydstogo", self.yards_to_go.to_string()),
            ("yardline_100", self.yardline_100.to_string()),
            ("time_remaining", self.time_remaining_seconds.to_string()),
            ("qtr", self.quarter.to_string()),
            ("score_diff", self.score_differential.to_string()),
            ("offense_timeouts", self.offense_timeouts.to_string()),
            ("defense_timeouts", self.defense_timeouts.to_string()),
            ("home", self.is_home_team.to_string()),
        ]
    }
}
