//! Task fulfillment: what changes when a task is marked done (or un-done).
//!
//! The store writes happen elsewhere; this module only computes them, so the
//! caller can apply them optimistically and roll back on failure.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::ActivityLog;
use crate::error::FulfillmentError;
use crate::task::{EnergyTag, SessionMode, Task, TaskState};

/// New task to insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub project_id: Option<String>,
    pub duration_minutes: u32,
    pub energy_tag: EnergyTag,
    pub state: TaskState,
    pub recurrence_interval_days: Option<u32>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub completed: Task,
    pub activity: ActivityLog,
    /// Project to rejuvenate, and the new last-touched time.
    pub project_touch: Option<(String, DateTime<Utc>)>,
    pub successor: Option<TaskDraft>,
}

pub fn complete_task(task: &Task, mode: SessionMode, now: DateTime<Utc>) -> Result<Completion, FulfillmentError> {
    if task.state != TaskState::Active {
        return Err(FulfillmentError::NotActive {
            task_id: task.id.clone(),
            state: task.state,
        });
    }

    let mut completed = task.clone();
    completed.state = TaskState::Completed;
    completed.last_touched_at = now;

    let activity = ActivityLog {
        id: None,
        task_id: Some(task.id.clone()),
        project_id: task.project_id.clone(),
        duration_minutes: task.duration_minutes,
        session_mode: Some(mode),
        completed_at: now,
    };

    let successor = task
        .recurrence_interval_days
        .filter(|d| *d > 0)
        .map(|days| TaskDraft {
            title: task.title.clone(),
            project_id: task.project_id.clone(),
            duration_minutes: task.duration_minutes,
            energy_tag: task.energy_tag,
            state: TaskState::Active,
            recurrence_interval_days: Some(days),
            due_date: Some(now + Duration::days(days as i64)),
        });

    Ok(Completion {
        completed,
        activity,
        project_touch: task.project_id.clone().map(|p| (p, now)),
        successor,
    })
}

/// Return a completed task to the active list and drop its activity logs.
///
/// Logs go first so analytics never count a task that is active again.
pub fn undo_completion(task: &Task, logs: &[ActivityLog]) -> Result<(Task, Vec<ActivityLog>), FulfillmentError> {
    if task.state != TaskState::Completed {
        return Err(FulfillmentError::NotCompleted {
            task_id: task.id.clone(),
        });
    }

    let kept = logs
        .iter()
        .filter(|l| l.task_id.as_deref() != Some(task.id.as_str()))
        .cloned()
        .collect();

    let mut restored = task.clone();
    restored.state = TaskState::Active;
    Ok((restored, kept))
}

/// Drop logs that lost their task (deleted tasks leave these behind).
/// Returns the kept logs and how many were removed.
pub fn prune_orphan_logs(logs: Vec<ActivityLog>) -> (Vec<ActivityLog>, usize) {
    let before = logs.len();
    let kept: Vec<ActivityLog> = logs.into_iter().filter(|l| l.task_id.is_some()).collect();
    let removed = before - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 2, 7, 30, 0).unwrap()
    }

    fn weekly_review() -> Task {
        Task::new("t1", "Weekly review", now() - Duration::days(6))
            .with_project("p1", "Ops")
            .with_duration(20)
            .with_energy(EnergyTag::Shallow)
            .with_recurrence(7)
    }

    #[test]
    fn completion_logs_activity_and_touches_project() {
        let c = complete_task(&weekly_review(), SessionMode::Admin, now()).unwrap();
        assert_eq!(c.completed.state, TaskState::Completed);
        assert_eq!(c.activity.task_id.as_deref(), Some("t1"));
        assert_eq!(c.activity.duration_minutes, 20);
        assert_eq!(c.activity.session_mode, Some(SessionMode::Admin));
        assert_eq!(c.project_touch, Some(("p1".to_string(), now())));
    }

    #[test]
    fn recurring_task_spawns_successor() {
        let c = complete_task(&weekly_review(), SessionMode::Admin, now()).unwrap();
        let next = c.successor.expect("successor");
        assert_eq!(next.title, "Weekly review");
        assert_eq!(next.state, TaskState::Active);
        assert_eq!(next.recurrence_interval_days, Some(7));
        assert_eq!(next.due_date, Some(now() + Duration::days(7)));
    }

    #[test]
    fn one_off_inbox_task_has_no_side_effects() {
        let t = Task::new("t2", "Call dentist", now()).with_duration(5);
        let c = complete_task(&t, SessionMode::LowEnergy, now()).unwrap();
        assert!(c.successor.is_none());
        assert!(c.project_touch.is_none());
    }

    #[test]
    fn only_active_tasks_complete() {
        let t = weekly_review().with_state(TaskState::Blocked);
        let err = complete_task(&t, SessionMode::Admin, now()).unwrap_err();
        assert!(matches!(err, FulfillmentError::NotActive { state: TaskState::Blocked, .. }));
    }

    #[test]
    fn undo_restores_task_and_removes_its_logs() {
        let c = complete_task(&weekly_review(), SessionMode::Admin, now()).unwrap();
        let other = ActivityLog {
            task_id: Some("t9".into()),
            ..c.activity.clone()
        };
        let logs = vec![c.activity.clone(), other.clone()];

        let (task, kept) = undo_completion(&c.completed, &logs).unwrap();
        assert_eq!(task.state, TaskState::Active);
        assert_eq!(kept, vec![other]);

        assert!(undo_completion(&task, &kept).is_err());
    }

    #[test]
    fn prune_drops_logs_without_task() {
        let c = complete_task(&weekly_review(), SessionMode::Admin, now()).unwrap();
        let orphan = ActivityLog {
            task_id: None,
            ..c.activity.clone()
        };
        let (kept, removed) = prune_orphan_logs(vec![orphan.clone(), c.activity.clone(), orphan]);
        assert_eq!(removed, 2);
        assert_eq!(kept.len(), 1);
    }
}
