//! Project ("Boat") health: how far a project has drifted toward its decay
//! threshold since it was last touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{DEFAULT_DECAY_THRESHOLD_DAYS, ProjectTier};

const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub tier: ProjectTier,
    pub last_touched_at: DateTime<Utc>,
    pub decay_threshold_days: f64,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, last_touched_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier: ProjectTier::default(),
            last_touched_at,
            decay_threshold_days: DEFAULT_DECAY_THRESHOLD_DAYS,
        }
    }

    pub fn with_tier(mut self, tier: ProjectTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_decay_threshold(mut self, days: f64) -> Self {
        self.decay_threshold_days = days;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    /// health > 50
    Stable,
    /// 30 < health <= 50
    Drifting,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    OptimalMomentum,
    MaintenanceRequired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHealth {
    pub project_id: String,
    pub name: String,
    pub tier: ProjectTier,
    pub days_idle: f64,
    /// 0..=100, 100 = just touched.
    pub health_pct: u8,
    /// 0..=100, share of the decay threshold already used up.
    pub decay_pct: f64,
    pub band: HealthBand,
    pub status: HealthStatus,
}

fn band_for(health: u8) -> HealthBand {
    match health {
        h if h > 50 => HealthBand::Stable,
        h if h > 30 => HealthBand::Drifting,
        _ => HealthBand::Critical,
    }
}

pub fn project_health(project: &Project, now: DateTime<Utc>) -> ProjectHealth {
    // Guard like the task mapping layer does.
    let threshold = if project.decay_threshold_days.is_finite() && project.decay_threshold_days > 0.0 {
        project.decay_threshold_days
    } else {
        DEFAULT_DECAY_THRESHOLD_DAYS
    };

    let ms = (now - project.last_touched_at).num_milliseconds().max(0);
    let days_idle = ms as f64 / MS_PER_DAY;
    let used = days_idle / threshold * 100.0;

    let health_pct = (100.0 - used).max(0.0).round() as u8;

    ProjectHealth {
        project_id: project.id.clone(),
        name: project.name.clone(),
        tier: project.tier,
        days_idle,
        health_pct,
        decay_pct: used.min(100.0),
        band: band_for(health_pct),
        status: if days_idle > threshold {
            HealthStatus::MaintenanceRequired
        } else {
            HealthStatus::OptimalMomentum
        },
    }
}

/// Health for every project, most important tier first (stable within a tier).
pub fn portfolio(projects: &[Project], now: DateTime<Utc>) -> Vec<ProjectHealth> {
    let mut out: Vec<ProjectHealth> = projects.iter().map(|p| project_health(p, now)).collect();
    out.sort_by_key(|h| h.tier);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn fresh_project_is_fully_healthy() {
        let p = Project::new("p1", "Thesis", now());
        let h = project_health(&p, now());
        assert_eq!(h.health_pct, 100);
        assert_eq!(h.band, HealthBand::Stable);
        assert_eq!(h.status, HealthStatus::OptimalMomentum);
    }

    #[test]
    fn health_drains_linearly_and_floors_at_zero() {
        let p = Project::new("p1", "Thesis", now() - Duration::days(9)).with_decay_threshold(15.0);
        let h = project_health(&p, now());
        assert_eq!(h.health_pct, 40);
        assert_eq!(h.band, HealthBand::Drifting);

        let p = Project::new("p2", "Garden", now() - Duration::days(40)).with_decay_threshold(15.0);
        let h = project_health(&p, now());
        assert_eq!(h.health_pct, 0);
        assert_eq!(h.decay_pct, 100.0);
        assert_eq!(h.band, HealthBand::Critical);
        assert_eq!(h.status, HealthStatus::MaintenanceRequired);
    }

    #[test]
    fn exactly_at_threshold_is_not_yet_maintenance() {
        let p = Project::new("p1", "Thesis", now() - Duration::days(15));
        let h = project_health(&p, now());
        assert_eq!(h.status, HealthStatus::OptimalMomentum);
        assert_eq!(h.health_pct, 0);
    }

    #[test]
    fn portfolio_orders_by_tier() {
        let projects = vec![
            Project::new("a", "Icebox", now()).with_tier(ProjectTier::T4),
            Project::new("b", "Main", now()).with_tier(ProjectTier::T1),
            Project::new("c", "Side", now()).with_tier(ProjectTier::T3),
            Project::new("d", "Also main", now()).with_tier(ProjectTier::T1),
        ];
        let ids: Vec<_> = portfolio(&projects, now()).into_iter().map(|h| h.project_id).collect();
        assert_eq!(ids, ["b", "d", "c", "a"]);
    }
}
