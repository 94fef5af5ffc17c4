//! CSV export of the tasks table joined with its project columns.
//!
//! Expected header (any subset, any order):
//!   id,title,description,project_id,project_name,project_tier,
//!   project_decay_threshold_days,project_last_touched_at,due_date,
//!   est_duration_minutes,energy_tag,last_touched_at,created_at,
//!   recurrence_interval_days,state

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::types::{Loose, RawProjectRef, RawTaskRow};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CsvTaskRow {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    project_id: Option<String>,
    project_name: Option<String>,
    project_tier: Option<String>,
    project_decay_threshold_days: Option<String>,
    project_last_touched_at: Option<String>,
    due_date: Option<String>,
    #[serde(alias = "duration")]
    est_duration_minutes: Option<String>,
    energy_tag: Option<String>,
    last_touched_at: Option<String>,
    created_at: Option<String>,
    recurrence_interval_days: Option<String>,
    state: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn loose(v: Option<String>) -> Option<Loose> {
    non_blank(v).map(Loose::Text)
}

impl From<CsvTaskRow> for RawTaskRow {
    fn from(r: CsvTaskRow) -> Self {
        let has_project = [
            &r.project_name,
            &r.project_tier,
            &r.project_decay_threshold_days,
            &r.project_last_touched_at,
        ]
        .iter()
        .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()));

        let projects = has_project.then(|| RawProjectRef {
            name: non_blank(r.project_name),
            tier: loose(r.project_tier),
            decay_threshold_days: loose(r.project_decay_threshold_days),
            last_touched_at: non_blank(r.project_last_touched_at),
        });

        RawTaskRow {
            id: loose(r.id),
            title: non_blank(r.title),
            description: non_blank(r.description),
            project_id: loose(r.project_id),
            due_date: non_blank(r.due_date),
            est_duration_minutes: loose(r.est_duration_minutes),
            energy_tag: non_blank(r.energy_tag),
            last_touched_at: non_blank(r.last_touched_at),
            created_at: non_blank(r.created_at),
            recurrence_interval_days: loose(r.recurrence_interval_days),
            state: non_blank(r.state),
            projects,
        }
    }
}

/// Parse CSV text into raw task rows.
pub fn parse_task_rows_csv(text: &str) -> Result<Vec<RawTaskRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<CsvTaskRow>().enumerate() {
        let row = rec.with_context(|| format!("CSV row {}", i + 2))?;
        out.push(row.into());
    }
    Ok(out)
}

pub fn read_task_rows_csv(path: impl AsRef<Path>) -> Result<Vec<RawTaskRow>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_task_rows_csv(&text).with_context(|| format!("parsing {}", path.display()))
}
