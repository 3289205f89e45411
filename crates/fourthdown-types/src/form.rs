use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::game::{GameState, NumericField};

/// Input fields of the situation form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Down,
    YardsToGo,
    Yardline100,
    TimeRemaining,
    Quarter,
    ScoreDiff,
    OffenseTimeouts,
    DefenseTimeouts,
    Home,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Down,
        FormField::YardsToGo,
        FormField::Yardline100,
        FormField::TimeRemaining,
        FormField::Quarter,
        FormField::ScoreDiff,
        FormField::OffenseTimeouts,
        FormField::DefenseTimeouts,
        FormField::Home,
    ];

    /// Form key; identical to the query parameter name.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Down => "down",
            FormField::YardsToGo => "ydstogo",
            FormField::Yardline100 => "yardline_100",
            FormField::TimeRemaining => "time_remaining",
            FormField::Quarter => "qtr",
            FormField::ScoreDiff => "score_diff",
            FormField::OffenseTimeouts => "offense_timeouts",
            FormField::DefenseTimeouts => "defense_timeouts",
            FormField::Home => "home",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Down => "Down",
            FormField::YardsToGo => "Yards to go",
            FormField::Yardline100 => "Yardline (to opp. goal)",
            FormField::TimeRemaining => "Time remaining (s)",
            FormField::Quarter => "Quarter",
            FormField::ScoreDiff => "Score differential",
            FormField::OffenseTimeouts => "Offense timeouts",
            FormField::DefenseTimeouts => "Defense timeouts",
            FormField::Home => "Home team",
        }
    }

    /// Inclusive range the input widget suggests. Never enforced.
    pub fn range_hint(self) -> Option<(i64, i64)> {
        match self {
            FormField::Down => Some((1, 4)),
            FormField::YardsToGo => Some((1, 100)),
            FormField::Yardline100 => Some((1, 99)),
            FormField::Quarter => Some((1, 5)),
            FormField::OffenseTimeouts | FormField::DefenseTimeouts => Some((0, 3)),
            FormField::TimeRemaining | FormField::ScoreDiff | FormField::Home => None,
        }
    }
}

/// Snapshot of the form's raw text values, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    values: HashMap<String, String>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values the dashboard form starts with.
    pub fn with_defaults() -> Self {
        let mut form = Self::new();
        for (field, value) in [
            (FormField::Down, "4"),
            (FormField::YardsToGo, "2"),
            (FormField::Yardline100, "48"),
            (FormField::TimeRemaining, "900"),
            (FormField::Quarter, "2"),
            (FormField::ScoreDiff, "-3"),
            (FormField::OffenseTimeouts, "3"),
            (FormField::DefenseTimeouts, "3"),
            (FormField::Home, "true"),
        ] {
            form.set(field.name(), value);
        }
        form
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Missing keys read as empty input.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn field(&self, field: FormField) -> &str {
        self.get(field.name())
    }
}

impl<K, V> FromIterator<(K, V)> for RawForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (name, value) in iter {
            form.set(name, value);
        }
        form
    }
}

/// A numeric field that fell back to the not-a-number sentinel. Diagnostic
/// only: the request is still sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionAnomaly {
    pub field: FormField,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coerced {
    pub state: GameState,
    pub anomalies: Vec<CoercionAnomaly>,
}

/// Convert a form snapshot into a `GameState`. Never fails.
pub fn coerce(form: &RawForm) -> Coerced {
    let mut anomalies = Vec::new();
    let mut numeric = |field: FormField| {
        let raw = form.field(field);
        let parsed = parse_numeric(raw);
        if parsed.is_nan() {
            anomalies.push(CoercionAnomaly {
                field,
                raw: raw.to_string(),
            });
        }
        parsed
    };

    let state = GameState {
        down: numeric(FormField::Down),
        yards_to_go: numeric(FormField::YardsToGo),
        yardline_100: numeric(FormField::Yardline100),
        time_remaining_seconds: numeric(FormField::TimeRemaining),
        quarter: numeric(FormField::Quarter),
        score_differential: numeric(FormField::ScoreDiff),
        offense_timeouts: numeric(FormField::OffenseTimeouts),
        defense_timeouts: numeric(FormField::DefenseTimeouts),
        is_home_team: parse_home(form.field(FormField::Home)),
    };

    Coerced { state, anomalies }
}

pub fn parse_numeric(raw: &str) -> NumericField {
    raw.trim()
        .parse::<i64>()
        .map(NumericField::Value)
        .unwrap_or(NumericField::NotANumber)
}

/// Exact match only: `"TRUE"`, `" true"` and `"1"` are all `false`.
pub fn parse_home(raw: &str) -> bool {
    raw == "true"
}
