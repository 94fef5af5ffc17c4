//! JSON rows as returned by the store's REST endpoint: a top-level array of
//! objects, task rows with an embedded `projects` object.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use entropy_core::{ActivityLog, Project, Task};

use crate::mapping::{map_activity_row, map_project_row, map_task_rows};
use crate::types::{RawActivityRow, RawProjectRow, RawTaskRow};

pub fn parse_task_rows_json(text: &str) -> Result<Vec<RawTaskRow>> {
    serde_json::from_str(text).context("parse task rows (expected a JSON array)")
}

pub fn parse_project_rows_json(text: &str) -> Result<Vec<RawProjectRow>> {
    serde_json::from_str(text).context("parse project rows (expected a JSON array)")
}

pub fn parse_activity_rows_json(text: &str) -> Result<Vec<RawActivityRow>> {
    serde_json::from_str(text).context("parse activity rows (expected a JSON array)")
}

pub fn load_tasks_json(text: &str, now: DateTime<Utc>) -> Result<Vec<Task>> {
    let rows = parse_task_rows_json(text)?;
    map_task_rows(&rows, now)
}

pub fn load_projects_json(text: &str, now: DateTime<Utc>) -> Result<Vec<Project>> {
    parse_project_rows_json(text)?
        .iter()
        .map(|r| map_project_row(r, now))
        .collect()
}

pub fn load_activity_logs_json(text: &str) -> Result<Vec<ActivityLog>> {
    Ok(parse_activity_rows_json(text)?
        .iter()
        .filter_map(map_activity_row)
        .collect())
}
