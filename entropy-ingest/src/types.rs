use serde::{Deserialize, Serialize};

/// A scalar the store may hand back as either a number or a string
/// (REST responses use numbers, CSV exports use text). Anything else lands
/// in `Other` so one bad cell never rejects the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Loose {
    /// Numeric value, parsing text if needed. Blank text counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => Some(*n),
            Loose::Text(s) if s.trim().is_empty() => None,
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Other(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Loose::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            Loose::Number(n) => Some(n.to_string()),
            Loose::Text(s) if s.trim().is_empty() => None,
            Loose::Text(s) => Some(s.trim().to_string()),
            Loose::Other(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Loose::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for Loose {
    fn from(s: &str) -> Self {
        Loose::Text(s.to_string())
    }
}

/// Embedded project columns (`projects(name, tier, decay_threshold_days)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProjectRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tier: Option<Loose>,
    #[serde(default)]
    pub decay_threshold_days: Option<Loose>,
    #[serde(default)]
    pub last_touched_at: Option<String>,
}

/// Task row as stored; every column optional and loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTaskRow {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<Loose>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, alias = "duration")]
    pub est_duration_minutes: Option<Loose>,
    #[serde(default, alias = "energy")]
    pub energy_tag: Option<String>,
    #[serde(default)]
    pub last_touched_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub recurrence_interval_days: Option<Loose>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub projects: Option<RawProjectRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProjectRow {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tier: Option<Loose>,
    #[serde(default)]
    pub decay_threshold_days: Option<Loose>,
    #[serde(default)]
    pub last_touched_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawActivityRow {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub task_id: Option<Loose>,
    #[serde(default)]
    pub project_id: Option<Loose>,
    #[serde(default)]
    pub duration_minutes: Option<Loose>,
    #[serde(default)]
    pub session_mode: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}
