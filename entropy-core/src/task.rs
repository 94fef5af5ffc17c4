//! Canonical task model consumed by the urgency engine.
//!
//! Rows coming out of the table store are loosely typed; `entropy-ingest` maps
//! them into this shape with every default already applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default decay threshold for projects that don't set one.
pub const DEFAULT_DECAY_THRESHOLD_DAYS: f64 = 15.0;

/// Default effort estimate (minutes).
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Grouping used for tasks without a project.
pub const INBOX_PROJECT_NAME: &str = "Inbox";

/// Project priority class ("Boat" tier). Lower number = more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProjectTier {
    /// Critical
    T1 = 1,
    T2 = 2,
    #[default]
    T3 = 3,
    /// Icebox
    T4 = 4,
}

impl ProjectTier {
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::T1),
            2 => Some(Self::T2),
            3 => Some(Self::T3),
            4 => Some(Self::T4),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ProjectTier {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n as i64).ok_or_else(|| format!("project tier must be 1..=4, got {n}"))
    }
}

impl From<ProjectTier> for u8 {
    fn from(t: ProjectTier) -> Self {
        t.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EnergyTag {
    /// High focus, linear (coding, spreadsheets, logistics).
    Grind,
    /// High focus, non-linear (design, writing, R&D).
    Creative,
    /// Low focus, quick (email, calls, admin).
    #[default]
    Shallow,
}

impl FromStr for EnergyTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grind" => Ok(Self::Grind),
            "creative" => Ok(Self::Creative),
            "shallow" => Ok(Self::Shallow),
            other => Err(format!("unknown energy tag: {other}")),
        }
    }
}

impl fmt::Display for EnergyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Grind => "Grind",
            Self::Creative => "Creative",
            Self::Shallow => "Shallow",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskState {
    #[default]
    Active,
    Waiting,
    Blocked,
    #[serde(alias = "Done")]
    Completed,
    Decayed,
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "waiting" => Ok(Self::Waiting),
            "blocked" => Ok(Self::Blocked),
            "completed" | "done" => Ok(Self::Completed),
            "decayed" => Ok(Self::Decayed),
            other => Err(format!("unknown task state: {other}")),
        }
    }
}

/// The user's declared working context for a triage pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionMode {
    #[default]
    #[serde(rename = "Deep Work")]
    DeepWork,
    #[serde(rename = "Low Energy")]
    LowEnergy,
    Creative,
    Admin,
}

impl SessionMode {
    pub const ALL: [SessionMode; 4] = [
        SessionMode::DeepWork,
        SessionMode::LowEnergy,
        SessionMode::Creative,
        SessionMode::Admin,
    ];

    /// Energy tags that are congruent with this mode.
    pub fn compatible_tags(self) -> &'static [EnergyTag] {
        match self {
            Self::DeepWork => &[EnergyTag::Creative, EnergyTag::Grind],
            Self::LowEnergy => &[EnergyTag::Shallow],
            Self::Creative => &[EnergyTag::Creative],
            Self::Admin => &[EnergyTag::Shallow],
        }
    }

    pub fn is_compatible(self, tag: EnergyTag) -> bool {
        self.compatible_tags().contains(&tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DeepWork => "Deep Work",
            Self::LowEnergy => "Low Energy",
            Self::Creative => "Creative",
            Self::Admin => "Admin",
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match norm.as_str() {
            "deepwork" | "deep" => Ok(Self::DeepWork),
            "lowenergy" | "low" => Ok(Self::LowEnergy),
            "creative" => Ok(Self::Creative),
            "admin" => Ok(Self::Admin),
            _ => Err(format!(
                "unknown session mode '{s}' (expected Deep Work, Low Energy, Creative or Admin)"
            )),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Engine-facing task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    pub project_id: Option<String>,
    pub project_name: String,
    pub project_tier: ProjectTier,

    /// Last interaction with the task or its project (UTC).
    pub last_touched_at: DateTime<Utc>,

    /// Days of inactivity before the owning project is at risk. Must be > 0.
    pub decay_threshold_days: f64,

    /// Optional hard deadline (UTC).
    pub due_date: Option<DateTime<Utc>>,

    pub energy_tag: EnergyTag,

    /// Minutes.
    pub duration_minutes: u32,

    /// Completing the task spawns a successor this many days out.
    pub recurrence_interval_days: Option<u32>,

    pub state: TaskState,

    #[serde(default)]
    pub description: String,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, last_touched_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            project_id: None,
            project_name: INBOX_PROJECT_NAME.to_string(),
            project_tier: ProjectTier::default(),
            last_touched_at,
            decay_threshold_days: DEFAULT_DECAY_THRESHOLD_DAYS,
            due_date: None,
            energy_tag: EnergyTag::default(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            recurrence_interval_days: None,
            state: TaskState::Active,
            description: String::new(),
        }
    }

    pub fn with_project(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self.project_name = name.into();
        self
    }

    pub fn with_tier(mut self, tier: ProjectTier) -> Self {
        self.project_tier = tier;
        self
    }

    pub fn with_decay_threshold(mut self, days: f64) -> Self {
        self.decay_threshold_days = days;
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_energy(mut self, tag: EnergyTag) -> Self {
        self.energy_tag = tag;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_recurrence(mut self, days: u32) -> Self {
        self.recurrence_interval_days = Some(days);
        self
    }

    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state == TaskState::Active
    }
}
