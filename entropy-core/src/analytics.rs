//! Per-project activity analytics over a rolling two-week window.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::task::SessionMode;

pub const ANALYTICS_WINDOW_DAYS: i64 = 14;
pub const WEEK_DAYS: i64 = 7;

/// One completed unit of work, as written when a task is fulfilled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    /// Assigned by the store; `None` until persisted.
    #[serde(default)]
    pub id: Option<String>,
    pub task_id: Option<String>,
    pub project_id: Option<String>,
    pub duration_minutes: u32,
    pub session_mode: Option<SessionMode>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectMetrics {
    /// Minutes over the last 14 days.
    pub total_minutes: u32,
    /// Minutes over the last 7 days.
    pub weekly_minutes: u32,
    pub tasks_completed_last_7_days: u32,
    /// Share of the last 14 local days with any activity (0..=100).
    pub consistency_score: u8,
    /// Share of last week's minutes spent in Deep Work (0..=100).
    pub deep_work_ratio: u8,
}

fn pct(part: f64, whole: f64) -> u8 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0).round().clamp(0.0, 100.0) as u8
}

fn clamp_minutes(minutes: u64) -> u32 {
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

pub fn project_metrics(logs: &[ActivityLog], project_id: &str, now: DateTime<Utc>, tz: Tz) -> ProjectMetrics {
    let window_start = now - Duration::days(ANALYTICS_WINDOW_DAYS);
    let week_start = now - Duration::days(WEEK_DAYS);

    let mut m = ProjectMetrics::default();
    let mut total_minutes = 0u64;
    let mut weekly_minutes = 0u64;
    let mut deep_work_minutes = 0u64;
    let mut active_days: HashSet<NaiveDate> = HashSet::new();

    for log in logs
        .iter()
        .filter(|l| l.project_id.as_deref() == Some(project_id))
        .filter(|l| l.completed_at >= window_start)
    {
        let minutes = u64::from(log.duration_minutes);
        total_minutes += minutes;
        active_days.insert(log.completed_at.with_timezone(&tz).date_naive());

        if log.completed_at >= week_start {
            weekly_minutes += minutes;
            m.tasks_completed_last_7_days = m.tasks_completed_last_7_days.saturating_add(1);
            if log.session_mode == Some(SessionMode::DeepWork) {
                deep_work_minutes += minutes;
            }
        }
    }

    m.total_minutes = clamp_minutes(total_minutes);
    m.weekly_minutes = clamp_minutes(weekly_minutes);
    m.consistency_score = pct(active_days.len() as f64, ANALYTICS_WINDOW_DAYS as f64);
    m.deep_work_ratio = pct(deep_work_minutes as f64, weekly_minutes as f64);
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 15, 18, 0, 0).unwrap()
    }

    fn log(project: &str, days_ago: i64, minutes: u32, mode: SessionMode) -> ActivityLog {
        ActivityLog {
            id: None,
            task_id: Some(format!("task-{days_ago}")),
            project_id: Some(project.to_string()),
            duration_minutes: minutes,
            session_mode: Some(mode),
            completed_at: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn metrics_split_week_and_fortnight() {
        let logs = vec![
            log("p1", 1, 60, SessionMode::DeepWork),
            log("p1", 3, 30, SessionMode::Admin),
            log("p1", 3, 30, SessionMode::DeepWork),
            log("p1", 10, 45, SessionMode::DeepWork),
            log("p1", 20, 90, SessionMode::DeepWork), // outside window
            log("p2", 1, 500, SessionMode::DeepWork), // other project
        ];

        let m = project_metrics(&logs, "p1", now(), chrono_tz::UTC);
        assert_eq!(m.total_minutes, 165);
        assert_eq!(m.weekly_minutes, 120);
        assert_eq!(m.tasks_completed_last_7_days, 3);
        // 90 of 120 minutes were deep work
        assert_eq!(m.deep_work_ratio, 75);
        // 3 distinct days out of 14
        assert_eq!(m.consistency_score, 21);
    }

    #[test]
    fn no_activity_yields_zeroes() {
        let m = project_metrics(&[], "p1", now(), chrono_tz::UTC);
        assert_eq!(m, ProjectMetrics::default());
    }

    #[test]
    fn active_days_use_local_calendar() {
        // 2026-04-15 02:00 UTC and 2026-04-14 22:00 UTC are the same evening in Chicago.
        let a = Utc.with_ymd_and_hms(2026, 4, 15, 2, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 4, 14, 22, 0, 0).unwrap();
        let mk = |at| ActivityLog {
            id: None,
            task_id: Some("t".into()),
            project_id: Some("p1".into()),
            duration_minutes: 10,
            session_mode: None,
            completed_at: at,
        };
        let logs = vec![mk(a), mk(b)];
        let utc = project_metrics(&logs, "p1", now(), chrono_tz::UTC);
        let chicago = project_metrics(&logs, "p1", now(), chrono_tz::America::Chicago);
        assert_eq!(utc.consistency_score, 14); // 2/14
        assert_eq!(chicago.consistency_score, 7); // 1/14
    }

    #[test]
    fn huge_durations_clamp_instead_of_overflowing() {
        let logs = vec![
            log("p1", 1, 4_000_000_000, SessionMode::DeepWork),
            log("p1", 2, 4_000_000_000, SessionMode::Admin),
        ];
        let m = project_metrics(&logs, "p1", now(), chrono_tz::UTC);
        assert_eq!(m.total_minutes, u32::MAX);
        assert_eq!(m.weekly_minutes, u32::MAX);
        assert_eq!(m.tasks_completed_last_7_days, 2);
        assert_eq!(m.deep_work_ratio, 50);
    }
}
