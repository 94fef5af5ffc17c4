use chrono::{DateTime, Duration, TimeZone, Utc};
use entropy_core::{
    EnergyTag, ProjectTier, SessionMode, Task, TriageRequest, rank, score, split, triage,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

fn stale(id: &str, days: i64) -> Task {
    Task::new(id, id, now() - Duration::days(days))
}

/// A task due within 24h beats a critical project that has rotted for 100 days.
#[test]
fn test_deadline_override_dominates_decay() {
    let due_soon = stale("due", 0)
        .with_tier(ProjectTier::T4)
        .with_energy(EnergyTag::Shallow)
        .with_due_date(now() + Duration::hours(5));
    let rotten = stale("rotten", 100)
        .with_tier(ProjectTier::T1)
        .with_energy(EnergyTag::Grind);

    let s_due = score(&due_soon, SessionMode::DeepWork, now()).unwrap();
    let s_rot = score(&rotten, SessionMode::DeepWork, now()).unwrap();

    assert!(s_due >= 10018.0 - 1e-9, "override score {s_due}");
    assert!(s_rot < 70.0, "decay score {s_rot}");
    assert!(s_due > s_rot);

    let ranked = rank(&[rotten, due_soon], SessionMode::DeepWork, now()).unwrap();
    assert_eq!(ranked[0].id, "due");
}

/// Closer deadlines rank higher inside the override band.
#[test]
fn test_override_band_orders_by_proximity() {
    let in_2h = stale("2h", 0).with_due_date(now() + Duration::hours(2));
    let in_20h = stale("20h", 0).with_due_date(now() + Duration::hours(20));
    let ranked = rank(&[in_20h, in_2h], SessionMode::Admin, now()).unwrap();
    assert_eq!(ranked[0].id, "2h");
}

#[test]
fn test_score_is_deterministic_for_fixed_now() {
    let t = stale("t", 12).with_tier(ProjectTier::T2).with_energy(EnergyTag::Creative);
    let a = score(&t, SessionMode::Creative, now()).unwrap();
    let b = score(&t, SessionMode::Creative, now()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_decay_is_monotonic() {
    let mut prev = -1.0;
    for days in 0..60 {
        let s = score(&stale("t", days), SessionMode::DeepWork, now()).unwrap();
        assert!(s >= prev, "score dropped at day {days}: {s} < {prev}");
        prev = s;
    }
}

#[test]
fn test_tier_ordering() {
    let scores: Vec<f64> = [ProjectTier::T1, ProjectTier::T2, ProjectTier::T3, ProjectTier::T4]
        .into_iter()
        .map(|tier| score(&stale("t", 20).with_tier(tier), SessionMode::Admin, now()).unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] > w[1]), "{scores:?}");
}

#[test]
fn test_context_boost_is_four_x() {
    // 30 days on a 15 day threshold: ratio 2, 2^1.5 keeps the rounding exact enough
    let t = stale("t", 30).with_energy(EnergyTag::Grind);
    let matched = score(&t, SessionMode::DeepWork, now()).unwrap();
    let mismatched = score(&t, SessionMode::LowEnergy, now()).unwrap();
    assert!((matched - 4.0 * mismatched).abs() < 1e-3, "{matched} vs {mismatched}");
}

#[test]
fn test_scenarios_from_threshold_task() {
    let t = stale("t", 15)
        .with_tier(ProjectTier::T3)
        .with_decay_threshold(15.0)
        .with_energy(EnergyTag::Grind);
    assert_eq!(score(&t, SessionMode::DeepWork, now()).unwrap(), 2.0);
    assert_eq!(score(&t, SessionMode::LowEnergy, now()).unwrap(), 0.5);
}

#[test]
fn test_reranking_is_idempotent() {
    let tasks: Vec<Task> = (0..20)
        .map(|i| {
            stale(&format!("t{i}"), (i * 7 % 23) as i64)
                .with_tier(ProjectTier::from_number((i % 4 + 1) as i64).unwrap())
                .with_energy(if i % 3 == 0 { EnergyTag::Shallow } else { EnergyTag::Grind })
        })
        .collect();

    let once = rank(&tasks, SessionMode::DeepWork, now()).unwrap();
    let twice = rank(&once, SessionMode::DeepWork, now()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_partition_is_complete() {
    let tasks: Vec<Task> = (0..25u32)
        .map(|m| stale(&format!("t{m}"), m as i64).with_duration(m))
        .collect();
    let ranked = rank(&tasks, SessionMode::DeepWork, now()).unwrap();
    let out = split(ranked);

    assert_eq!(out.focus.len() + out.admin.len(), tasks.len());
    assert!(out.admin.iter().all(|t| t.duration_minutes < 10));
    assert!(out.focus.iter().all(|t| t.duration_minutes >= 10));
    assert_eq!(out.admin.len(), 10);
}

/// Full pipeline with a realistic morning list.
#[test]
fn test_triage_morning_list() {
    let tasks = vec![
        stale("draft-chapter", 10)
            .with_project("p-thesis", "Thesis")
            .with_tier(ProjectTier::T1)
            .with_energy(EnergyTag::Creative)
            .with_duration(90),
        stale("reply-landlord", 4).with_energy(EnergyTag::Shallow).with_duration(5),
        stale("fix-ci", 3)
            .with_project("p-side", "Side project")
            .with_tier(ProjectTier::T3)
            .with_energy(EnergyTag::Grind)
            .with_duration(45),
        stale("tax-form", 1)
            .with_energy(EnergyTag::Shallow)
            .with_duration(30)
            .with_due_date(now() + Duration::hours(8)),
    ];

    let req = TriageRequest::new(SessionMode::DeepWork);
    let out = triage(&tasks, &req, now()).unwrap();

    let focus: Vec<_> = out.focus.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(focus, ["tax-form", "draft-chapter", "fix-ci"]);
    assert_eq!(out.admin[0].id, "reply-landlord");

    let short = TriageRequest::new(SessionMode::DeepWork).with_time_available(Some(30));
    let out = triage(&tasks, &short, now()).unwrap();
    assert_eq!(out.next_focus().unwrap().id, "tax-form");
    assert!(out.focus.iter().all(|t| t.duration_minutes <= 30));
}
