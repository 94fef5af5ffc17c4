//! entropy-ingest: turn loosely typed rows from the table store (REST JSON or
//! CSV export) into canonical `entropy-core` records.

pub mod duration;
pub mod mapping;
pub mod parsers;
pub mod types;

pub use duration::{format_duration_label, parse_duration_label};
pub use mapping::{map_activity_row, map_project_row, map_task_row, map_task_rows, parse_timestamp};
pub use parsers::csv_rows::{parse_task_rows_csv, read_task_rows_csv};
pub use parsers::json_rows::{
    load_activity_logs_json, load_projects_json, load_tasks_json, parse_activity_rows_json,
    parse_project_rows_json, parse_task_rows_json,
};
pub use types::{Loose, RawActivityRow, RawProjectRef, RawProjectRow, RawTaskRow};
