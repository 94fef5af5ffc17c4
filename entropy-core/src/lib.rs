//! entropy-core: urgency scoring and triage for the Entropy task engine.
//!
//! Tasks decay while nobody touches them. The scorer turns that decay, the
//! project tier, a near deadline and the current session mode into one number;
//! the triage pipeline ranks by it and peels off the quick admin batch.

pub mod analytics;
pub mod error;
pub mod fulfillment;
pub mod health;
pub mod scoring;
pub mod task;
pub mod time;
pub mod triage;

pub use analytics::{ActivityLog, ProjectMetrics, project_metrics};
pub use error::{FulfillmentError, ScoreError};
pub use fulfillment::{Completion, TaskDraft, complete_task, prune_orphan_logs, undo_completion};
pub use health::{HealthBand, HealthStatus, Project, ProjectHealth, portfolio, project_health};
pub use scoring::{ScoreBreakdown, explain, score};
pub use task::{
    DEFAULT_DECAY_THRESHOLD_DAYS, DEFAULT_DURATION_MINUTES, EnergyTag, INBOX_PROJECT_NAME,
    ProjectTier, SessionMode, Task, TaskState,
};
pub use triage::{Triage, TriageRequest, filter_by_time_budget, rank, split, triage, triage_now};
