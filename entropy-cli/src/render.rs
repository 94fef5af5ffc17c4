//! Plain-text views for the terminal.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use entropy_core::time::format_local;
use entropy_core::{ProjectHealth, ProjectMetrics, ScoreBreakdown, Task, Triage, TriageRequest};
use entropy_ingest::format_duration_label;
use std::fmt::Write;

pub struct TriageView<'a> {
    pub triage: &'a Triage,
    pub request: &'a TriageRequest,
    pub breakdowns: &'a [ScoreBreakdown],
    pub now: DateTime<Utc>,
    pub tz: Tz,
    pub limit: usize,
    pub explain: bool,
}

fn breakdown_for<'b>(breakdowns: &'b [ScoreBreakdown], id: &str) -> Option<&'b ScoreBreakdown> {
    breakdowns.iter().find(|b| b.task_id == id)
}

fn task_line(out: &mut String, prefix: &str, t: &Task, b: Option<&ScoreBreakdown>, tz: Tz) {
    let _ = write!(
        out,
        "{prefix}[T{}] {} · {} · {}",
        t.project_tier.number(),
        t.title,
        t.project_name,
        format_duration_label(t.duration_minutes)
    );
    if let Some(due) = t.due_date {
        let _ = write!(out, " · due {}", format_local(due, tz));
    }
    if let Some(b) = b {
        let _ = write!(out, " · score {:.4}", b.score);
    }
    out.push('\n');
}

fn explain_line(out: &mut String, b: &ScoreBreakdown) {
    if b.deadline_override {
        let _ = writeln!(
            out,
            "      deadline override: due in {:.1}h",
            b.hours_until_due.unwrap_or_default()
        );
    } else {
        let _ = writeln!(
            out,
            "      {:.1}d idle · ratio {:.3} · tier ×{} · context ×{}",
            b.days_since_last_touch, b.entropy_ratio, b.tier_weight, b.context_multiplier
        );
    }
}

pub fn render_triage(v: &TriageView<'_>) -> String {
    let mut out = String::new();
    let budget = v
        .request
        .time_available
        .map(|m| format!("{} available", format_duration_label(m)))
        .unwrap_or_else(|| "no time limit".to_string());
    let _ = writeln!(
        out,
        "# Triage · {} · {} · {}\n",
        v.request.mode,
        budget,
        format_local(v.now, v.tz)
    );

    out.push_str("## Focus\n\n");
    if v.triage.focus.is_empty() {
        out.push_str("(all objectives synchronized)\n");
    }
    for (i, t) in v.triage.focus.iter().take(v.limit).enumerate() {
        let b = breakdown_for(v.breakdowns, &t.id);
        task_line(&mut out, &format!("{:>3}. ", i + 1), t, b, v.tz);
        if v.explain {
            if let Some(b) = b {
                explain_line(&mut out, b);
            }
        }
    }
    if v.triage.focus.len() > v.limit {
        let _ = writeln!(out, "     … {} more", v.triage.focus.len() - v.limit);
    }

    if !v.triage.admin.is_empty() {
        let minutes: u32 = v.triage.admin.iter().map(|t| t.duration_minutes).sum();
        let _ = writeln!(
            out,
            "\n## Admin batch ({} tasks · {})\n",
            v.triage.admin.len(),
            format_duration_label(minutes)
        );
        for t in &v.triage.admin {
            task_line(&mut out, "  - ", t, breakdown_for(v.breakdowns, &t.id), v.tz);
        }
    }

    out
}

pub fn render_portfolio(health: &[ProjectHealth]) -> String {
    let mut out = String::from("# Portfolio\n\n");
    if health.is_empty() {
        out.push_str("(no projects)\n");
    }
    for h in health {
        let _ = writeln!(
            out,
            "[T{}] {:<24} health {:>3}% · {:.1}d idle · {:?} · {:?}",
            h.tier.number(),
            h.name,
            h.health_pct,
            h.days_idle,
            h.band,
            h.status
        );
    }
    out
}

pub fn render_metrics(project_id: &str, m: &ProjectMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Analytics · {project_id}\n");
    let _ = writeln!(out, "total (14d):        {}", format_duration_label(m.total_minutes));
    let _ = writeln!(out, "this week:          {} min", m.weekly_minutes);
    let _ = writeln!(out, "tasks this week:    {}", m.tasks_completed_last_7_days);
    let _ = writeln!(out, "consistency:        {}%", m.consistency_score);
    let _ = writeln!(out, "deep work share:    {}%", m.deep_work_ratio);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use entropy_core::{EnergyTag, ProjectTier, SessionMode, explain, triage};

    #[test]
    fn triage_view_lists_focus_then_admin() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        let tasks = vec![
            Task::new("a", "Write intro", now - Duration::days(12))
                .with_project("p1", "Thesis")
                .with_tier(ProjectTier::T1)
                .with_energy(EnergyTag::Creative)
                .with_duration(90),
            Task::new("b", "Pay rent", now - Duration::days(1)).with_duration(5),
        ];
        let req = TriageRequest::new(SessionMode::DeepWork);
        let tri = triage(&tasks, &req, now).unwrap();
        let breakdowns: Vec<_> = tasks
            .iter()
            .map(|t| explain(t, req.mode, now).unwrap())
            .collect();

        let text = render_triage(&TriageView {
            triage: &tri,
            request: &req,
            breakdowns: &breakdowns,
            now,
            tz: chrono_tz::UTC,
            limit: 10,
            explain: true,
        });

        assert!(text.contains("# Triage · Deep Work · no time limit"));
        assert!(text.contains("  1. [T1] Write intro · Thesis · 1h"));
        assert!(text.contains("tier ×2"));
        assert!(text.contains("## Admin batch (1 tasks · 5m)"));
        assert!(text.contains("  - [T3] Pay rent · Inbox · 5m"));
    }
}
