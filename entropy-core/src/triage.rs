//! Triage pipeline: time-budget filter → rank → focus/admin split.
//!
//! Everything here is pure. `now` is passed in (or sampled once by
//! [`triage_now`]) so every task in a pass is scored against the same instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScoreError;
use crate::scoring::score;
use crate::task::{SessionMode, Task};

/// Tasks strictly shorter than this go to the admin batch.
pub const ADMIN_BATCH_MAX_MINUTES: u32 = 10;

/// Explicit per-call context (mode + optional time budget).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TriageRequest {
    pub mode: SessionMode,
    /// Minutes available; `None` means unconstrained.
    pub time_available: Option<u32>,
}

impl TriageRequest {
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            time_available: None,
        }
    }

    pub fn with_time_available(mut self, minutes: Option<u32>) -> Self {
        self.time_available = minutes;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triage {
    pub focus: Vec<Task>,
    pub admin: Vec<Task>,
}

impl Triage {
    pub fn len(&self) -> usize {
        self.focus.len() + self.admin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.focus.is_empty() && self.admin.is_empty()
    }

    /// The single "what should I do next" pick.
    pub fn next_focus(&self) -> Option<&Task> {
        self.focus.first()
    }
}

/// Keep tasks that fit into the available time.
pub fn filter_by_time_budget(tasks: &[Task], time_available: Option<u32>) -> Vec<Task> {
    match time_available {
        None => tasks.to_vec(),
        Some(budget) => tasks
            .iter()
            .filter(|t| t.duration_minutes <= budget)
            .cloned()
            .collect(),
    }
}

/// Stable sort by descending urgency. Each task is scored once.
///
/// Equal scores keep their input order.
pub fn rank(tasks: &[Task], mode: SessionMode, now: DateTime<Utc>) -> Result<Vec<Task>, ScoreError> {
    let mut scored: Vec<(f64, &Task)> = tasks
        .iter()
        .map(|t| score(t, mode, now).map(|s| (s, t)))
        .collect::<Result<_, _>>()?;

    // slice::sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    Ok(scored.into_iter().map(|(_, t)| t.clone()).collect())
}

/// Partition a ranked list into focus work and the quick admin batch.
pub fn split(ranked: Vec<Task>) -> Triage {
    let (admin, focus): (Vec<Task>, Vec<Task>) = ranked
        .into_iter()
        .partition(|t| t.duration_minutes < ADMIN_BATCH_MAX_MINUTES);
    Triage { focus, admin }
}

/// Full pass at a fixed `now`.
pub fn triage(tasks: &[Task], request: &TriageRequest, now: DateTime<Utc>) -> Result<Triage, ScoreError> {
    let constrained = filter_by_time_budget(tasks, request.time_available);
    let ranked = rank(&constrained, request.mode, now)?;
    let out = split(ranked);

    debug!(
        mode = %request.mode,
        input = tasks.len(),
        within_budget = constrained.len(),
        focus = out.focus.len(),
        admin = out.admin.len(),
        "triage pass"
    );

    Ok(out)
}

/// Full pass against the wall clock, sampled once.
pub fn triage_now(tasks: &[Task], request: &TriageRequest) -> Result<Triage, ScoreError> {
    triage(tasks, request, Utc::now())
}
