//! Urgency scoring ("entropy" model).
//!
//! Score = tier_weight × entropy_ratio^1.5 × context_multiplier
//!
//! - entropy_ratio: days since last touch / project decay threshold (unbounded)
//! - tier_weight: 2.0 / 1.5 / 1.0 / 0.5 for tiers 1..=4
//! - context_multiplier: 2.0 when the energy tag suits the session mode, else 0.5
//!
//! Anything due within the next 24 hours short-circuits into the override band
//! `9999 + (24 - hours_until_due)`, which sits above every realistic decay score.
//! Overdue tasks are not escalated; they fall back to the decay formula.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::task::{ProjectTier, SessionMode, Task};

/// Floor of the deadline override band.
pub const DEADLINE_OVERRIDE_BASE: f64 = 9999.0;

/// Width of the override window (hours).
pub const DEADLINE_WINDOW_HOURS: f64 = 24.0;

pub const DECAY_EXPONENT: f64 = 1.5;
pub const CONTEXT_MATCH: f64 = 2.0;
pub const CONTEXT_MISMATCH: f64 = 0.5;

const MS_PER_HOUR: f64 = 1000.0 * 60.0 * 60.0;
const MS_PER_DAY: f64 = MS_PER_HOUR * 24.0;

pub fn tier_weight(tier: ProjectTier) -> f64 {
    match tier {
        ProjectTier::T1 => 2.0,
        ProjectTier::T2 => 1.5,
        ProjectTier::T3 => 1.0,
        ProjectTier::T4 => 0.5,
    }
}

pub fn context_multiplier(task: &Task, mode: SessionMode) -> f64 {
    if mode.is_compatible(task.energy_tag) {
        CONTEXT_MATCH
    } else {
        CONTEXT_MISMATCH
    }
}

/// Hours from `now` until the task's due date (negative when overdue).
pub fn hours_until_due(task: &Task, now: DateTime<Utc>) -> Option<f64> {
    task.due_date
        .map(|due| (due - now).num_milliseconds() as f64 / MS_PER_HOUR)
}

/// Days since the task was last touched, clamped at zero for future timestamps.
pub fn days_since_last_touch(task: &Task, now: DateTime<Utc>) -> f64 {
    let ms = (now - task.last_touched_at).num_milliseconds().max(0);
    ms as f64 / MS_PER_DAY
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Explainable scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub task_id: String,
    pub mode: SessionMode,
    /// True when the 24h deadline override produced the score.
    pub deadline_override: bool,
    pub hours_until_due: Option<f64>,
    pub days_since_last_touch: f64,
    pub entropy_ratio: f64,
    pub tier_weight: f64,
    pub context_multiplier: f64,
    pub score: f64,
}

/// Compute the full breakdown for one task at a fixed `now`.
pub fn explain(task: &Task, mode: SessionMode, now: DateTime<Utc>) -> Result<ScoreBreakdown, ScoreError> {
    let threshold = task.decay_threshold_days;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ScoreError::InvalidDecayThreshold {
            task_id: task.id.clone(),
            days: threshold,
        });
    }

    let hours = hours_until_due(task, now);
    let days = days_since_last_touch(task, now);
    let entropy_ratio = days / threshold;
    let tier_w = tier_weight(task.project_tier);
    let context = context_multiplier(task, mode);

    let (deadline_override, score) = match hours {
        Some(h) if h > 0.0 && h < DEADLINE_WINDOW_HOURS => {
            (true, DEADLINE_OVERRIDE_BASE + (DEADLINE_WINDOW_HOURS - h))
        }
        _ => (false, round4(tier_w * entropy_ratio.powf(DECAY_EXPONENT) * context)),
    };

    if !score.is_finite() {
        return Err(ScoreError::NonFiniteScore {
            task_id: task.id.clone(),
            value: score,
        });
    }

    Ok(ScoreBreakdown {
        task_id: task.id.clone(),
        mode,
        deadline_override,
        hours_until_due: hours,
        days_since_last_touch: days,
        entropy_ratio,
        tier_weight: tier_w,
        context_multiplier: context,
        score,
    })
}

/// Urgency score for `task` under `mode`, evaluated at `now`.
pub fn score(task: &Task, mode: SessionMode, now: DateTime<Utc>) -> Result<f64, ScoreError> {
    explain(task, mode, now).map(|b| b.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::EnergyTag;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn stale(days: i64) -> Task {
        Task::new("t", "stale", now() - Duration::days(days))
    }

    #[test]
    fn threshold_reached_in_matching_mode_scores_two() {
        let t = stale(15).with_energy(EnergyTag::Grind);
        assert_eq!(score(&t, SessionMode::DeepWork, now()).unwrap(), 2.0);
    }

    #[test]
    fn mismatched_mode_scores_half() {
        let t = stale(15).with_energy(EnergyTag::Grind);
        assert_eq!(score(&t, SessionMode::LowEnergy, now()).unwrap(), 0.5);
    }

    #[test]
    fn due_in_five_hours_enters_override_band() {
        let t = stale(0).with_due_date(now() + Duration::hours(5));
        let s = score(&t, SessionMode::Admin, now()).unwrap();
        assert!((s - 10018.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn overdue_task_uses_decay_formula() {
        let t = stale(15)
            .with_energy(EnergyTag::Grind)
            .with_due_date(now() - Duration::hours(3));
        let b = explain(&t, SessionMode::DeepWork, now()).unwrap();
        assert!(!b.deadline_override);
        assert_eq!(b.score, 2.0);
        assert!(b.hours_until_due.unwrap() < 0.0);
    }

    #[test]
    fn exactly_24_hours_out_is_not_overridden() {
        let t = stale(15)
            .with_energy(EnergyTag::Grind)
            .with_due_date(now() + Duration::hours(24));
        assert_eq!(score(&t, SessionMode::DeepWork, now()).unwrap(), 2.0);
    }

    #[test]
    fn future_touch_clamps_to_zero() {
        let t = Task::new("t", "skewed", now() + Duration::days(2));
        assert_eq!(score(&t, SessionMode::DeepWork, now()).unwrap(), 0.0);
    }

    #[test]
    fn zero_threshold_fails_fast() {
        let t = stale(3).with_decay_threshold(0.0);
        let err = score(&t, SessionMode::DeepWork, now()).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidDecayThreshold { .. }));

        let t = stale(3).with_decay_threshold(f64::NAN);
        assert!(score(&t, SessionMode::DeepWork, now()).is_err());
    }

    #[test]
    fn ratio_is_not_clamped_at_one() {
        let t = stale(45).with_energy(EnergyTag::Creative);
        let b = explain(&t, SessionMode::Creative, now()).unwrap();
        assert!((b.entropy_ratio - 3.0).abs() < 1e-9);
        // 1.0 * 3^1.5 * 2.0
        assert_eq!(b.score, 10.3923);
    }
}
