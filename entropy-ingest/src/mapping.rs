//! Raw store rows → canonical engine records.
//!
//! Defaults: tier 3, decay threshold 15 days, duration 30 minutes, energy
//! Shallow, state Active, project "Inbox". Missing values default quietly;
//! values that are present but malformed default with a warning.

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use entropy_core::{
    ActivityLog, DEFAULT_DECAY_THRESHOLD_DAYS, DEFAULT_DURATION_MINUTES, EnergyTag,
    INBOX_PROJECT_NAME, Project, ProjectTier, SessionMode, Task, TaskState,
};
use tracing::warn;

use crate::duration::parse_duration_label;
use crate::types::{Loose, RawActivityRow, RawProjectRow, RawTaskRow};

/// Parse the timestamp shapes the store produces:
/// RFC 3339 (REST), `YYYY-MM-DD HH:MM:SS[.f]+00` (CSV export) and bare dates.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

fn timestamp_field(row_id: &str, field: &str, raw: Option<&String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!(row = row_id, field, value = %raw, "unparseable timestamp, ignoring");
    }
    parsed
}

pub fn tier_or_default(row_id: &str, raw: Option<&Loose>) -> ProjectTier {
    let Some(raw) = raw.filter(|v| !v.is_blank()) else {
        return ProjectTier::default();
    };
    match raw.as_f64() {
        Some(n) if n.fract() == 0.0 => ProjectTier::from_number(n as i64).unwrap_or_else(|| {
            warn!(row = row_id, tier = n, "project tier out of range, using 3");
            ProjectTier::default()
        }),
        _ => {
            warn!(row = row_id, tier = ?raw, "project tier not an integer, using 3");
            ProjectTier::default()
        }
    }
}

pub fn decay_threshold_or_default(row_id: &str, raw: Option<&Loose>) -> f64 {
    let Some(raw) = raw.filter(|v| !v.is_blank()) else {
        return DEFAULT_DECAY_THRESHOLD_DAYS;
    };
    match raw.as_f64() {
        Some(d) if d.is_finite() && d > 0.0 => d,
        // zero means "unset" in the store
        Some(d) if d == 0.0 => DEFAULT_DECAY_THRESHOLD_DAYS,
        _ => {
            warn!(row = row_id, threshold = ?raw, "invalid decay threshold, using 15 days");
            DEFAULT_DECAY_THRESHOLD_DAYS
        }
    }
}

fn duration_or_default(row_id: &str, raw: Option<&Loose>) -> u32 {
    let Some(raw) = raw.filter(|v| !v.is_blank()) else {
        return DEFAULT_DURATION_MINUTES;
    };
    let minutes = match raw {
        Loose::Number(n) if n.is_finite() && *n >= 0.0 => Some(n.round() as u32),
        Loose::Number(_) => None,
        Loose::Text(s) => parse_duration_label(s),
        Loose::Other(_) => None,
    };
    match minutes {
        // zero means "no estimate"
        Some(0) => DEFAULT_DURATION_MINUTES,
        Some(m) => m,
        None => {
            warn!(row = row_id, duration = ?raw, "invalid duration, using 30 minutes");
            DEFAULT_DURATION_MINUTES
        }
    }
}

fn recurrence(row_id: &str, raw: Option<&Loose>) -> Option<u32> {
    let raw = raw.filter(|v| !v.is_blank())?;
    match raw.as_f64() {
        Some(d) if d.is_finite() && d >= 1.0 && d.fract() == 0.0 => Some(d as u32),
        _ => {
            warn!(row = row_id, recurrence = ?raw, "invalid recurrence interval, ignoring");
            None
        }
    }
}

fn energy_or_default(row_id: &str, raw: Option<&String>) -> EnergyTag {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => EnergyTag::default(),
        Some(s) => s.parse().unwrap_or_else(|e| {
            warn!(row = row_id, error = %e, "using Shallow");
            EnergyTag::default()
        }),
    }
}

fn state_or_default(row_id: &str, raw: Option<&String>) -> TaskState {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => TaskState::default(),
        Some(s) => s.parse().unwrap_or_else(|e| {
            warn!(row = row_id, error = %e, "using Active");
            TaskState::default()
        }),
    }
}

/// Map one task row (with its embedded project) to a canonical [`Task`].
///
/// `now` fills in `last_touched_at` for rows that carry no timestamps at all.
pub fn map_task_row(row: &RawTaskRow, now: DateTime<Utc>) -> Result<Task> {
    let Some(id) = row.id.as_ref().and_then(Loose::as_text) else {
        bail!("task row without id (title: {:?})", row.title);
    };
    let project = row.projects.clone().unwrap_or_default();

    let task_touch = timestamp_field(&id, "last_touched_at", row.last_touched_at.as_ref());
    let project_touch = timestamp_field(&id, "projects.last_touched_at", project.last_touched_at.as_ref());
    let created = timestamp_field(&id, "created_at", row.created_at.as_ref());

    let last_touched_at = match (task_touch, project_touch) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => created.unwrap_or(now),
    };

    let project_id = row.project_id.as_ref().and_then(Loose::as_text);
    let project_name = project
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(INBOX_PROJECT_NAME)
        .to_string();

    Ok(Task {
        title: row.title.clone().unwrap_or_default(),
        description: row.description.clone().unwrap_or_default(),
        project_id,
        project_name,
        project_tier: tier_or_default(&id, project.tier.as_ref()),
        last_touched_at,
        decay_threshold_days: decay_threshold_or_default(&id, project.decay_threshold_days.as_ref()),
        due_date: timestamp_field(&id, "due_date", row.due_date.as_ref()),
        energy_tag: energy_or_default(&id, row.energy_tag.as_ref()),
        duration_minutes: duration_or_default(&id, row.est_duration_minutes.as_ref()),
        recurrence_interval_days: recurrence(&id, row.recurrence_interval_days.as_ref()),
        state: state_or_default(&id, row.state.as_ref()),
        id,
    })
}

pub fn map_task_rows(rows: &[RawTaskRow], now: DateTime<Utc>) -> Result<Vec<Task>> {
    rows.iter().map(|r| map_task_row(r, now)).collect()
}

pub fn map_project_row(row: &RawProjectRow, now: DateTime<Utc>) -> Result<Project> {
    let Some(id) = row.id.as_ref().and_then(Loose::as_text) else {
        bail!("project row without id (name: {:?})", row.name);
    };

    let last_touched_at = timestamp_field(&id, "last_touched_at", row.last_touched_at.as_ref())
        .or_else(|| timestamp_field(&id, "created_at", row.created_at.as_ref()))
        .unwrap_or(now);

    Ok(Project {
        name: row.name.clone().unwrap_or_else(|| id.clone()),
        tier: tier_or_default(&id, row.tier.as_ref()),
        decay_threshold_days: decay_threshold_or_default(&id, row.decay_threshold_days.as_ref()),
        last_touched_at,
        id,
    })
}

/// Map an activity row. Rows without a completion time are skipped.
pub fn map_activity_row(row: &RawActivityRow) -> Option<ActivityLog> {
    let id = row.id.as_ref().and_then(Loose::as_text);
    let label = id.clone().unwrap_or_else(|| "<new>".to_string());

    let Some(completed_at) = timestamp_field(&label, "completed_at", row.completed_at.as_ref()) else {
        warn!(row = %label, "activity log without completed_at, skipping");
        return None;
    };

    let duration_minutes = match row.duration_minutes.as_ref().filter(|v| !v.is_blank()) {
        None => 0,
        Some(raw) => match raw.as_f64().filter(|m| m.is_finite() && *m >= 0.0) {
            Some(m) => m.round() as u32,
            None => {
                warn!(row = %label, duration = ?raw, "invalid activity duration, using 0");
                0
            }
        },
    };

    let session_mode = row
        .session_mode
        .as_deref()
        .and_then(|s| s.parse::<SessionMode>().ok());

    Some(ActivityLog {
        id,
        task_id: row.task_id.as_ref().and_then(Loose::as_text),
        project_id: row.project_id.as_ref().and_then(Loose::as_text),
        duration_minutes,
        session_mode,
        completed_at,
    })
}
